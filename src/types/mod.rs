mod column;
mod decimal;
mod driver_value;
mod field;
mod row;
mod sql_value;

pub use column::{ColumnDescriptor, TypeCode};
pub use decimal::{ExactDecimal, ParseDecimalError};
pub use driver_value::{DriverValue, LobData, LobKind, LobLocator, RawRow};
pub use field::{FieldInfo, FieldKind};
pub use row::Row;
pub use sql_value::SqlValue;
