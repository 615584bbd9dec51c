//! orars - format-style placeholders and canonical values on top of an Oracle driver
//!
//! Statements are written with `%s` / `%(name)s` placeholders and plain Rust
//! values. The cursor rewrites them into `:name` bind variables, infers the
//! storage class of large values, and decodes fetched rows (exact decimals,
//! booleans, empty strings, UTC datetimes) back into [`SqlValue`]s.
//!
//! # Example
//! ```ignore
//! use orars::{Connection, Settings, SqlValue};
//!
//! // Prepare an established driver session
//! let mut connection = Connection::open(driver, Settings::default())?;
//! let mut cursor = connection.cursor()?;
//!
//! // Execute a SELECT query
//! let row = cursor
//!     .execute("SELECT id, name FROM users WHERE name = %s", vec!["John"])?
//!     .fetchone()?
//!     .expect("user exists");
//!
//! let id = row.get("ID")?;
//! let name = row.get("NAME")?;
//! ```

pub mod config;
pub mod decoder;
pub mod drivers;
pub mod environment;
pub mod error;
pub mod operators;
pub mod output;
pub mod params;
pub mod rewrite;
pub mod traits;
pub mod types;

mod connection;
mod cursor;

// Re-export main types for convenient access
pub use config::Settings;
pub use connection::Connection;
pub use cursor::Cursor;
pub use decoder::RowDecoder;
pub use environment::init_client_environment;
pub use error::{DriverError, OraRsError, Result, RewriteError};
pub use operators::{Lookup, OperatorSet};
pub use output::returning_clause;
pub use params::{InputSize, Param, Params};
pub use traits::{CursorOptions, DatabaseDriver, DriverCursor, LobReader};
pub use types::{ColumnDescriptor, DriverValue, ExactDecimal, FieldInfo, FieldKind, Row, SqlValue, TypeCode};
