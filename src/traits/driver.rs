use crate::error::DriverError;
use crate::params::{BindFrame, SizeDirectives, VarKind, Variable};
use crate::types::{ColumnDescriptor, DriverValue, LobData, LobLocator, RawRow};

/// Options applied to every cursor opened through a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorOptions {
    /// Deliver exact numerics as their decimal text instead of native floats.
    pub numbers_as_strings: bool,
    /// Rows fetched per driver round-trip.
    pub array_size: usize,
}

/// Trait for database driver implementations.
/// Drivers are responsible for:
/// - Opening cursors on an established session
/// - Binding the driver scalars produced by the parameter wrapper
/// - Returning rows as [`DriverValue`]s together with column metadata
///
/// Bind variables in statement text use `:name` syntax. All calls block
/// until the driver responds.
pub trait DatabaseDriver {
    type Cursor: DriverCursor;

    fn cursor(&mut self, options: CursorOptions) -> Result<Self::Cursor, DriverError>;

    fn commit(&mut self) -> Result<(), DriverError>;
}

/// Reads the full contents behind a large object handle.
pub trait LobReader {
    fn read_lob(&mut self, locator: &LobLocator) -> Result<LobData, DriverError>;
}

/// A driver cursor. Handles returned in fetched rows stay readable through
/// [`LobReader`] until the next fetch.
pub trait DriverCursor: LobReader {
    /// Registers storage-class directives for the next execution.
    fn set_input_sizes(&mut self, sizes: &SizeDirectives) -> Result<(), DriverError>;

    /// Allocates a bind variable the driver writes into during execution.
    fn var(&mut self, kind: VarKind) -> Result<Variable, DriverError>;

    /// Current value of a variable allocated on this cursor.
    fn var_value(&self, var: &Variable) -> Result<DriverValue, DriverError>;

    fn execute(&mut self, sql: &str, params: &BindFrame) -> Result<(), DriverError>;

    fn execute_many(&mut self, sql: &str, params: &[BindFrame]) -> Result<(), DriverError>;

    /// Result columns of the last execution; empty when it produced no rows.
    fn description(&self) -> &[ColumnDescriptor];

    fn fetch_one(&mut self) -> Result<Option<RawRow>, DriverError> {
        Ok(self.fetch_many(1)?.into_iter().next())
    }

    fn fetch_many(&mut self, size: usize) -> Result<Vec<RawRow>, DriverError>;

    fn fetch_all(&mut self) -> Result<Vec<RawRow>, DriverError>;

    fn close(&mut self) -> Result<(), DriverError>;
}
