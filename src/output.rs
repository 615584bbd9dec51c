//! Late-bound output variables for server-generated values.

use crate::params::{Param, Variable};

/// Lifecycle of the insert-id variable of one cursor.
///
/// A variable is registered while parameters are bound, becomes readable once
/// the statement executes successfully and can be read exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) enum PendingOutput {
    #[default]
    Unbound,
    Registered(Variable),
    Ready(Variable),
    Consumed,
}

impl PendingOutput {
    pub(crate) fn register(&mut self, var: Variable) {
        *self = PendingOutput::Registered(var);
    }

    /// The statement that registered the variable executed successfully.
    pub(crate) fn executed(&mut self) {
        if let PendingOutput::Registered(var) = self {
            *self = PendingOutput::Ready(*var);
        }
    }

    /// The statement failed; whatever was registered is never written.
    pub(crate) fn discard(&mut self) {
        if matches!(self, PendingOutput::Registered(_)) {
            *self = PendingOutput::Unbound;
        }
    }

    /// Takes the variable for reading.
    ///
    /// # Panics
    ///
    /// Panics if no statement with an insert-id parameter has executed since
    /// the last read, or if the value was already read.
    pub(crate) fn take(&mut self) -> Variable {
        match std::mem::replace(self, PendingOutput::Consumed) {
            PendingOutput::Ready(var) => var,
            PendingOutput::Consumed => panic!("returned insert id was already read"),
            PendingOutput::Registered(_) => {
                panic!("returned insert id read before the statement was executed")
            }
            PendingOutput::Unbound => panic!("no insert id variable was bound"),
        }
    }
}

/// Returns `RETURNING "COLUMN" INTO %s` and the parameter to bind for it.
///
/// Append the clause to an `INSERT` statement and pass the parameter last.
pub fn returning_clause(column: &str) -> (String, Param) {
    (
        format!("RETURNING {} INTO %s", quote_name(column)),
        Param::insert_id(),
    )
}

/// Quotes an identifier the way unquoted names are stored: uppercased.
/// `%` is doubled so the name survives placeholder rewriting.
pub fn quote_name(name: &str) -> String {
    if name.starts_with('"') && name.ends_with('"') && name.len() > 1 {
        return name.replace('%', "%%");
    }
    format!("\"{}\"", name.to_uppercase()).replace('%', "%%")
}
