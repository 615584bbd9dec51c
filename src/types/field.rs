/// Semantic type of the destination field a column is read into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Char,
    Text,
    Binary,
    Boolean,
    NullBoolean,
    Date,
    Time,
    DateTime,
    Uuid,
    Integer,
    Decimal,
    Float,
    Other,
}

/// Caller-supplied metadata about the field a result column maps to.
///
/// This cannot be derived from the column descriptor: a `NUMBER(1)` may be a
/// boolean or a small integer, and only the caller knows whether an empty
/// string is a meaningful value for the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub kind: FieldKind,
    pub empty_strings_allowed: bool,
}

impl FieldInfo {
    /// Field with the default empty-string semantics of its kind:
    /// character and binary fields accept the empty value, others do not.
    pub fn new(kind: FieldKind) -> Self {
        let empty_strings_allowed = matches!(kind, FieldKind::Char | FieldKind::Text | FieldKind::Binary);
        Self {
            kind,
            empty_strings_allowed,
        }
    }

    pub fn with_empty_strings_allowed(mut self, allowed: bool) -> Self {
        self.empty_strings_allowed = allowed;
        self
    }
}

impl From<FieldKind> for FieldInfo {
    fn from(kind: FieldKind) -> Self {
        FieldInfo::new(kind)
    }
}
