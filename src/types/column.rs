use crate::config::FLOAT_SCALE_SENTINEL;

/// Driver type code of a result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    /// `NUMBER`, `FLOAT` and numeric expression results.
    Number,
    /// `BINARY_FLOAT` / `BINARY_DOUBLE`.
    NativeFloat,
    /// `VARCHAR2` / `NVARCHAR2`.
    String,
    /// `CHAR` / `NCHAR`.
    FixedChar,
    /// `LONG`.
    LongString,
    /// `DATE`. Only the results of date truncation queries come back as this.
    DateTime,
    Timestamp,
    Clob,
    NClob,
    Blob,
    /// `RAW`.
    Binary,
    /// `LONG RAW`.
    LongBinary,
    Rowid,
    Interval,
    /// Anything the core does not know how to convert.
    Other(u16),
}

impl TypeCode {
    pub fn is_character(&self) -> bool {
        matches!(
            self,
            TypeCode::String | TypeCode::FixedChar | TypeCode::LongString
        )
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, TypeCode::Timestamp | TypeCode::DateTime)
    }
}

/// Metadata of one result column, as reported by the driver after execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub type_code: TypeCode,
    pub precision: i16,
    pub scale: i16,
    pub nullable: bool,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, type_code: TypeCode) -> Self {
        Self {
            name: name.into(),
            type_code,
            precision: 0,
            scale: 0,
            nullable: true,
        }
    }

    /// A `NUMBER(p, s)` column.
    pub fn number(name: impl Into<String>, precision: i16, scale: i16) -> Self {
        Self {
            precision,
            scale,
            ..Self::new(name, TypeCode::Number)
        }
    }

    /// A `NUMBER` column without precision, e.g. a sequence-filled key.
    pub fn unconstrained_number(name: impl Into<String>) -> Self {
        Self::number(name, 0, FLOAT_SCALE_SENTINEL)
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}
