use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// Kind of a large object handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LobKind {
    Clob,
    NClob,
    Blob,
}

/// A streaming handle to a large object in the current fetch buffer.
///
/// Handles are only valid until the next fetch on the cursor that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LobLocator {
    pub id: u64,
    pub kind: LobKind,
}

/// Fully drained contents of a large object.
#[derive(Debug, Clone, PartialEq)]
pub enum LobData {
    Text(String),
    Binary(Vec<u8>),
}

/// A scalar as the driver hands it back in a fetched row.
///
/// Cursors are opened with numbers delivered as strings, so exact numerics
/// arrive as `Number` text and are only interpreted by the row decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverValue {
    Null,
    Number(String),
    Float(f64),
    Text(String),
    /// Character data still in the cursor's character set.
    EncodedText(Vec<u8>),
    Binary(Vec<u8>),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<FixedOffset>),
    Lob(LobLocator),
    Other { type_name: String, bytes: Vec<u8> },
}

impl DriverValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DriverValue::Null)
    }
}

/// One fetched row, in column order.
pub type RawRow = Vec<DriverValue>;
