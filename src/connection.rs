use std::sync::Arc;

use tracing::{debug, instrument};

use crate::config::Settings;
use crate::cursor::Cursor;
use crate::error::{reclassify, OraRsError, Result};
use crate::operators::OperatorSet;
use crate::params::Params;
use crate::traits::{CursorOptions, DatabaseDriver, DriverCursor};

/// Main entry point for orars.
/// Wraps an established driver session and hands out cursors.
pub struct Connection<D: DatabaseDriver> {
    driver: D,
    settings: Arc<Settings>,
    operators: OperatorSet,
}

impl<D: DatabaseDriver> Connection<D> {
    /// Prepares a freshly established session.
    ///
    /// Sets the session territory and ANSI date formats (and the UTC session
    /// time zone when `use_tz` is on), then checks which `LIKE` flavour the
    /// session supports. The outcome is kept for the connection's
    /// lifetime.
    ///
    /// # Example
    /// ```ignore
    /// let connection = Connection::open(driver, Settings::default().with_use_tz(true))?;
    /// let mut cursor = connection.cursor()?;
    /// ```
    #[instrument(level = "debug", skip_all)]
    pub fn open(driver: D, settings: Settings) -> Result<Self> {
        let mut connection = Self {
            driver,
            settings: Arc::new(settings),
            operators: OperatorSet::Standard,
        };

        let mut cursor = connection.cursor()?;
        let prepared = cursor
            .execute("ALTER SESSION SET NLS_TERRITORY = 'AMERICA'", Params::None)
            .and_then(|cursor| cursor.execute(&session_format_sql(connection.settings.use_tz), Params::None))
            .map(|_| ());
        close_after(&mut cursor, prepared)?;

        connection.operators = connection.detect_operators()?;
        debug!(operators = ?connection.operators, "connection initialized");
        Ok(connection)
    }

    /// Opens a cursor that delivers numbers as text and fetches
    /// `array_size` rows per round-trip.
    pub fn cursor(&mut self) -> Result<Cursor<D::Cursor>> {
        let options = CursorOptions {
            numbers_as_strings: true,
            array_size: self.settings.array_size(),
        };
        let inner = self.driver.cursor(options)?;
        Ok(Cursor::new(inner, Arc::clone(&self.settings)))
    }

    /// Commits the pending transaction.
    ///
    /// A commit rolled back by a deferred foreign key check is reported as
    /// [`OraRsError::IntegrityViolation`].
    pub fn commit(&mut self) -> Result<()> {
        self.driver.commit().map_err(reclassify)
    }

    /// `LIKE` operator set selected when the connection was opened.
    pub fn operators(&self) -> OperatorSet {
        self.operators
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether inserted ids can be fetched with `RETURNING ... INTO`.
    pub fn can_return_id_from_insert(&self) -> bool {
        self.settings.use_returning_into
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    fn detect_operators(&mut self) -> Result<OperatorSet> {
        let mut cursor = self.cursor()?;
        let operators = match cursor.execute(&OperatorSet::like_check_sql(), vec!["X"]) {
            Ok(_) => Ok(OperatorSet::Standard),
            Err(OraRsError::Driver(err) | OraRsError::IntegrityViolation(err)) => {
                debug!(error = %err, "standard LIKE rejected, falling back to LIKEC");
                Ok(OperatorSet::Likec)
            }
            Err(err) => Err(err),
        };
        close_after(&mut cursor, operators)
    }
}

/// Closes `cursor` whatever `result` is. The first error wins.
fn close_after<C: DriverCursor, T>(cursor: &mut Cursor<C>, result: Result<T>) -> Result<T> {
    let closed = cursor.close();
    let value = result?;
    closed?;
    Ok(value)
}

fn session_format_sql(use_tz: bool) -> String {
    let mut sql = String::from(
        "ALTER SESSION SET NLS_DATE_FORMAT = 'YYYY-MM-DD HH24:MI:SS' \
         NLS_TIMESTAMP_FORMAT = 'YYYY-MM-DD HH24:MI:SS.FF'",
    );
    if use_tz {
        sql.push_str(" TIME_ZONE = 'UTC'");
    }
    sql
}
