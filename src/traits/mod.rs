mod driver;

pub use driver::{CursorOptions, DatabaseDriver, DriverCursor, LobReader};
