use chrono::NaiveDate;
use chrono_tz::Tz;

/// Strings longer than this many bytes are bound as large objects.
pub const LOB_THRESHOLD: usize = 4000;

/// Rows fetched per round-trip. The driver's default of 1 is far too small.
pub const DEFAULT_ARRAY_SIZE: usize = 100;

/// Scale reported for `NUMBER` and `FLOAT` columns without a fixed scale.
pub const FLOAT_SCALE_SENTINEL: i16 = -127;

/// `ORA-01400`: cannot insert NULL into a NOT NULL column.
pub const NULL_INTO_NOT_NULL_CODE: i32 = 1400;

/// `ORA-02091`: transaction rolled back.
pub const TRANSACTION_ROLLED_BACK_CODE: i32 = 2091;

/// Parent key not found; reported inside a 2091 when a deferred foreign key fails.
pub const PARENT_KEY_NOT_FOUND_MARKER: &str = "ORA-02291";

/// Character set used for text exchanged with the driver.
pub const CHARSET: &str = "utf-8";

/// Date used when a time-of-day has to travel as a timestamp.
pub fn time_base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or_default()
}

/// Execution context settings shared by a connection and its cursors.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Whether datetimes are time zone aware in the calling layer.
    pub use_tz: bool,
    /// Zone assumed for naive datetimes received while `use_tz` is on.
    /// Daylight saving rules apply to the local time being converted.
    pub default_timezone: Tz,
    /// Whether `RETURNING ... INTO` may be used to fetch inserted ids.
    pub use_returning_into: bool,
    /// Never zero; set through [`with_array_size`](Self::with_array_size).
    array_size: usize,
}

impl Settings {
    pub fn with_use_tz(mut self, use_tz: bool) -> Self {
        self.use_tz = use_tz;
        self
    }

    pub fn with_default_timezone(mut self, tz: Tz) -> Self {
        self.default_timezone = tz;
        self
    }

    pub fn with_use_returning_into(mut self, enabled: bool) -> Self {
        self.use_returning_into = enabled;
        self
    }

    /// Rows fetched per round-trip. Zero is raised to one.
    pub fn with_array_size(mut self, n: usize) -> Self {
        self.array_size = n.max(1);
        self
    }

    pub fn array_size(&self) -> usize {
        self.array_size
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_tz: false,
            default_timezone: Tz::UTC,
            use_returning_into: true,
            array_size: DEFAULT_ARRAY_SIZE,
        }
    }
}
