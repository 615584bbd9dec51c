//! Row decoding from driver scalars to [`SqlValue`]s.
//!
//! Each column is decoded on its own from the cursor's column metadata. When
//! the caller also supplies per-column [`FieldInfo`], field converters run on
//! top of that, and the empty-value substitution runs last of all.

use chrono::{TimeZone, Utc};
use num_bigint::BigInt;
use uuid::Uuid;

use crate::config::{CHARSET, FLOAT_SCALE_SENTINEL};
use crate::error::{OraRsError, Result};
use crate::traits::LobReader;
use crate::types::{ColumnDescriptor, DriverValue, ExactDecimal, FieldInfo, FieldKind, LobData, RawRow, SqlValue, TypeCode};

/// Decodes raw rows of one result set.
#[derive(Debug, Clone, Copy)]
pub struct RowDecoder<'a> {
    description: &'a [ColumnDescriptor],
    fields: Option<&'a [FieldInfo]>,
    use_tz: bool,
}

impl<'a> RowDecoder<'a> {
    pub fn new(description: &'a [ColumnDescriptor], use_tz: bool) -> Self {
        Self {
            description,
            fields: None,
            use_tz,
        }
    }

    /// Attaches destination field metadata, parallel to the description.
    pub fn with_fields(mut self, fields: &'a [FieldInfo]) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Decodes one row. Large objects are read to the end through `lobs`
    /// before this returns, so the row stays valid after the next fetch.
    pub fn decode<L>(&self, row: RawRow, lobs: &mut L) -> Result<Vec<SqlValue>>
    where
        L: LobReader + ?Sized,
    {
        row.into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let column = self.description.get(index);
                let value = self.decode_value(column, raw, &mut *lobs)?;
                match self.fields.and_then(|fields| fields.get(index)) {
                    Some(field) => convert_field(column_name(column, index), value, field),
                    None => Ok(value),
                }
            })
            .collect()
    }

    fn decode_value<L>(&self, column: Option<&ColumnDescriptor>, raw: DriverValue, lobs: &mut L) -> Result<SqlValue>
    where
        L: LobReader + ?Sized,
    {
        let value = match raw {
            DriverValue::Null => SqlValue::Null,
            DriverValue::Number(text) => decode_number(column, &text)?,
            DriverValue::Float(f) => SqlValue::Float(f),
            DriverValue::Text(s) => SqlValue::Text(s),
            DriverValue::EncodedText(bytes) => SqlValue::Text(String::from_utf8(bytes).map_err(|e| OraRsError::Decode {
                column: column_label(column),
                reason: format!("invalid {CHARSET} text: {e}"),
            })?),
            DriverValue::Binary(bytes) => SqlValue::Bytes(bytes),
            DriverValue::Timestamp(naive) => {
                let is_timestamp = column.map_or(true, |c| c.type_code.is_timestamp());
                if self.use_tz && is_timestamp {
                    SqlValue::DateTimeUtc(Utc.from_utc_datetime(&naive))
                } else {
                    SqlValue::DateTime(naive)
                }
            }
            // Already carries a zone; only normalized, never re-attached.
            DriverValue::TimestampTz(aware) => SqlValue::DateTimeUtc(aware.with_timezone(&Utc)),
            DriverValue::Lob(locator) => match lobs.read_lob(&locator)? {
                LobData::Text(s) => SqlValue::Text(s),
                LobData::Binary(bytes) => SqlValue::Bytes(bytes),
            },
            other @ DriverValue::Other { .. } => SqlValue::Unconverted(other),
        };
        Ok(value)
    }
}

/// Interprets the textual form of a numeric according to precision and scale.
fn decode_number(column: Option<&ColumnDescriptor>, text: &str) -> Result<SqlValue> {
    let (precision, scale, numeric) = column
        .map(|c| (c.precision, c.scale, c.type_code == TypeCode::Number))
        .unwrap_or((0, 0, false));

    let text = text.trim();
    let invalid = |reason: String| OraRsError::Decode {
        column: column_label(column),
        reason,
    };

    if numeric && scale == FLOAT_SCALE_SENTINEL && precision > 0 {
        // FLOAT(p): binary precision, never exact.
        return text
            .parse::<f64>()
            .map(SqlValue::Float)
            .map_err(|e| invalid(format!("`{text}`: {e}")));
    }

    let exact = numeric && precision > 0 && scale != FLOAT_SCALE_SENTINEL;
    let integral = if exact { scale == 0 } else { !text.contains('.') };

    if integral {
        text.parse::<BigInt>()
            .map(SqlValue::Integer)
            .map_err(|e| invalid(format!("`{text}`: {e}")))
    } else {
        text.parse::<ExactDecimal>()
            .map(SqlValue::Decimal)
            .map_err(|e| invalid(format!("`{text}`: {e}")))
    }
}

/// Applies the destination field's converter, then the empty-value fixup.
fn convert_field(column: String, value: SqlValue, field: &FieldInfo) -> Result<SqlValue> {
    let value = match (field.kind, value) {
        (FieldKind::Boolean | FieldKind::NullBoolean, SqlValue::Integer(i)) => match u8::try_from(&i) {
            Ok(0) => SqlValue::Bool(false),
            Ok(1) => SqlValue::Bool(true),
            _ => SqlValue::Integer(i),
        },
        (FieldKind::Date, SqlValue::DateTime(naive)) => SqlValue::Date(naive.date()),
        (FieldKind::Date, SqlValue::DateTimeUtc(aware)) => SqlValue::Date(aware.date_naive()),
        (FieldKind::Time, SqlValue::DateTime(naive)) => SqlValue::Time(naive.time()),
        (FieldKind::Time, SqlValue::DateTimeUtc(aware)) => SqlValue::Time(aware.time()),
        (FieldKind::Uuid, SqlValue::Text(s)) => SqlValue::Uuid(Uuid::parse_str(&s).map_err(|e| OraRsError::Decode {
            column,
            reason: e.to_string(),
        })?),
        (FieldKind::Binary, SqlValue::Null) if field.empty_strings_allowed => SqlValue::Bytes(Vec::new()),
        (_, SqlValue::Null) if field.empty_strings_allowed => SqlValue::Text(String::new()),
        (_, value) => value,
    };
    Ok(value)
}

fn column_name(column: Option<&ColumnDescriptor>, index: usize) -> String {
    column.map_or_else(|| format!("#{index}"), |c| c.name.clone())
}

fn column_label(column: Option<&ColumnDescriptor>) -> String {
    column.map_or_else(|| "<unknown>".to_string(), |c| c.name.clone())
}
