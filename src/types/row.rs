use std::sync::Arc;

use crate::error::{OraRsError, Result};

use super::sql_value::SqlValue;

/// A single decoded row.
/// Values are kept in column order and can also be looked up by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Creates a new Row from column names and values.
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<SqlValue>) -> Self {
        Self { columns, values }
    }

    /// Gets a value by column name.
    ///
    /// Unquoted identifiers come back uppercased, so an exact match is tried
    /// first and a case-insensitive one second.
    pub fn get(&self, column: &str) -> Result<&SqlValue> {
        let index = self
            .columns
            .iter()
            .position(|c| c == column)
            .or_else(|| self.columns.iter().position(|c| c.eq_ignore_ascii_case(column)))
            .ok_or_else(|| OraRsError::ColumnNotFound(column.to_string()))?;
        // The driver may hand back fewer values than it described columns.
        self.values
            .get(index)
            .ok_or_else(|| OraRsError::ColumnNotFound(column.to_string()))
    }

    /// Gets a value by position.
    pub fn value(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }

    /// Returns all column names in this row.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the number of columns in this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
