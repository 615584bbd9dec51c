use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use num_bigint::BigInt;

use crate::types::ExactDecimal;

/// Kind of a driver-allocated variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Number,
    String,
    Timestamp,
    Clob,
    Blob,
}

/// A variable allocated by the driver on a cursor.
///
/// Bound as a parameter it is handed to the driver as-is; the driver fills
/// it in during execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable {
    id: u64,
    kind: VarKind,
}

impl Variable {
    /// Drivers call this when allocating a variable slot.
    pub fn new(id: u64, kind: VarKind) -> Self {
        Self { id, kind }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> VarKind {
        self.kind
    }
}

/// A driver-ready scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Null,
    Integer(BigInt),
    Decimal(ExactDecimal),
    Float(f64),
    Text(String),
    Binary(Vec<u8>),
    Date(NaiveDate),
    /// Always naive; the driver cannot carry a zone.
    Timestamp(NaiveDateTime),
    Variable(Variable),
}

/// Bound values for one execution, keyed the same way as the rewritten
/// statement's bind names.
#[derive(Debug, Clone, PartialEq)]
pub enum BindFrame {
    Positional(Vec<BindValue>),
    Named(BTreeMap<String, BindValue>),
}

impl BindFrame {
    pub fn empty() -> Self {
        BindFrame::Positional(Vec::new())
    }

    pub fn len(&self) -> usize {
        match self {
            BindFrame::Positional(values) => values.len(),
            BindFrame::Named(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> Box<dyn Iterator<Item = &BindValue> + '_> {
        match self {
            BindFrame::Positional(values) => Box::new(values.iter()),
            BindFrame::Named(values) => Box::new(values.values()),
        }
    }
}

/// Explicit storage class registered for a bind position before execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSize {
    /// Large text, streamed as a CLOB.
    Clob,
    /// Large binary, streamed as a BLOB.
    Blob,
    /// Timestamp with fractional seconds.
    Timestamp,
    Number,
    /// Character data of at most this many bytes.
    String(usize),
}

impl InputSize {
    pub fn is_lob(&self) -> bool {
        matches!(self, InputSize::Clob | InputSize::Blob)
    }

    /// Combines two directives seen for the same position.
    ///
    /// Large-object directives are sticky, string lengths widen to the
    /// maximum, and otherwise the directive seen first is kept.
    pub fn widen(self, other: InputSize) -> InputSize {
        match (self, other) {
            (current, _) if current.is_lob() => current,
            (_, next) if next.is_lob() => next,
            (InputSize::String(a), InputSize::String(b)) => InputSize::String(a.max(b)),
            (current, _) => current,
        }
    }
}
