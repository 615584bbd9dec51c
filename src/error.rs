use thiserror::Error;

use crate::config::{NULL_INTO_NOT_NULL_CODE, PARENT_KEY_NOT_FOUND_MARKER, TRANSACTION_ROLLED_BACK_CODE};

/// Error reported by the underlying client driver.
///
/// The core never rewrites these: the vendor code, message and source are
/// carried through untouched, whether the error ends up reclassified or not.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DriverError {
    /// Vendor error code (e.g. `1400` for `ORA-01400`), when the driver reports one.
    pub code: Option<i32>,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_code(code: i32, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// Placeholder/parameter shape mismatches found while rewriting a statement.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RewriteError {
    #[error("missing parameter `{0}`")]
    MissingParameter(String),

    #[error("statement has {expected} placeholder(s), but {actual} parameter(s) were supplied")]
    CountMismatch { expected: usize, actual: usize },

    #[error("positional placeholder at byte {0} used with named parameters")]
    PositionalWithMapping(usize),

    #[error("named placeholder `{0}` used with positional parameters")]
    NamedWithSequence(String),

    #[error("unsupported placeholder conversion `%{conversion}` at byte {position}")]
    UnsupportedConversion { conversion: char, position: usize },

    #[error("incomplete placeholder at byte {0}")]
    IncompletePlaceholder(usize),
}

/// Error type for orars operations
#[derive(Debug, Error)]
pub enum OraRsError {
    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    /// A NULL/constraint violation reported by the driver under a generic
    /// error kind. The driver error stays reachable through `source()`.
    #[error("integrity violation: {0}")]
    IntegrityViolation(#[source] DriverError),

    /// A value carries time zone information that contradicts the
    /// time zone support setting.
    #[error("configuration contradiction: {0}")]
    ConfigurationContradiction(String),

    #[error("unsupported parameter: {0}")]
    UnsupportedParameter(String),

    #[error("failed to decode column `{column}`: {reason}")]
    Decode { column: String, reason: String },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Result type alias for orars operations
pub type Result<T> = std::result::Result<T, OraRsError>;

/// Maps a driver error to the public error kind.
///
/// Inserting NULL into a NOT NULL column (`ORA-01400`) and a commit rolled
/// back because of a missing parent key (`ORA-02091` caused by `ORA-02291`)
/// surface from the driver as generic database errors. Both are integrity
/// violations; everything else passes through unchanged.
pub(crate) fn reclassify(err: DriverError) -> OraRsError {
    match err.code {
        Some(NULL_INTO_NOT_NULL_CODE) => OraRsError::IntegrityViolation(err),
        Some(TRANSACTION_ROLLED_BACK_CODE) if err.message.contains(PARENT_KEY_NOT_FOUND_MARKER) => {
            OraRsError::IntegrityViolation(err)
        }
        _ => OraRsError::Driver(err),
    }
}
