use std::collections::{BTreeMap, HashMap};

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use num_bigint::BigInt;
use tracing::warn;
use uuid::Uuid;

use crate::config::{time_base_date, Settings, LOB_THRESHOLD};
use crate::error::{OraRsError, Result};
use crate::types::{ExactDecimal, SqlValue};

use super::bind::{BindFrame, BindValue, InputSize, Variable};

/// An output variable bound in place of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputVariable {
    /// Allocated by the cursor at bind time to receive the id generated by
    /// an `INSERT ... RETURNING ... INTO`. Read it back with
    /// [`Cursor::fetch_returned_insert_id`](crate::Cursor::fetch_returned_insert_id).
    InsertId,
    /// A variable the caller already allocated with [`Cursor::var`](crate::Cursor::var).
    Allocated(Variable),
}

/// A single statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Value(SqlValue),
    /// A value with an explicit storage class that overrides size inference.
    Sized(SqlValue, InputSize),
    Output(OutputVariable),
}

impl Param {
    pub fn sized(value: impl Into<SqlValue>, size: InputSize) -> Self {
        Param::Sized(value.into(), size)
    }

    pub fn insert_id() -> Self {
        Param::Output(OutputVariable::InsertId)
    }
}

impl From<Variable> for Param {
    fn from(var: Variable) -> Self {
        Param::Output(OutputVariable::Allocated(var))
    }
}

macro_rules! param_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Param {
                fn from(value: $ty) -> Self {
                    Param::Value(value.into())
                }
            }
        )*
    };
}

param_from_value!(
    SqlValue,
    &str,
    String,
    i32,
    i64,
    i128,
    BigInt,
    bool,
    f64,
    Vec<u8>,
    &[u8],
    ExactDecimal,
    BigDecimal,
    rust_decimal::Decimal,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    Uuid,
);

impl<Tz: TimeZone> From<DateTime<Tz>> for Param {
    fn from(value: DateTime<Tz>) -> Self {
        Param::Value(value.into())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for Param {
    fn from(value: Option<T>) -> Self {
        Param::Value(value.into())
    }
}

/// Parameters supplied for one execution.
///
/// The shape (none, positional or named) decides how placeholders in the
/// statement text are rewritten.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Params {
    /// No parameters: the statement text is sent as-is.
    #[default]
    None,
    Positional(Vec<Param>),
    Named(BTreeMap<String, Param>),
}

impl Params {
    pub fn named<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Param>,
        I: IntoIterator<Item = (K, V)>,
    {
        Params::Named(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<T: Into<Param>> From<Vec<T>> for Params {
    fn from(values: Vec<T>) -> Self {
        Params::Positional(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Param>, const N: usize> From<[T; N]> for Params {
    fn from(values: [T; N]) -> Self {
        Params::Positional(values.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Param>> From<BTreeMap<K, V>> for Params {
    fn from(values: BTreeMap<K, V>) -> Self {
        Params::named(values)
    }
}

impl<K: Into<String>, V: Into<Param>> From<HashMap<K, V>> for Params {
    fn from(values: HashMap<K, V>) -> Self {
        Params::named(values)
    }
}

impl<P: Into<Params>> From<Option<P>> for Params {
    fn from(value: Option<P>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// A parameter converted for the driver, with its inferred storage class.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedParam {
    pub value: BindValue,
    pub input_size: Option<InputSize>,
}

impl WrappedParam {
    fn plain(value: BindValue) -> Self {
        Self {
            value,
            input_size: None,
        }
    }

    fn with_size(value: BindValue, size: InputSize) -> Self {
        Self {
            value,
            input_size: Some(size),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WrappedFrame {
    Positional(Vec<WrappedParam>),
    Named(BTreeMap<String, WrappedParam>),
}

impl WrappedFrame {
    pub fn into_bind_frame(self) -> BindFrame {
        match self {
            WrappedFrame::Positional(params) => {
                BindFrame::Positional(params.into_iter().map(|p| p.value).collect())
            }
            WrappedFrame::Named(params) => {
                BindFrame::Named(params.into_iter().map(|(k, p)| (k, p.value)).collect())
            }
        }
    }
}

/// Wraps every parameter of a frame.
///
/// `bind_output` hands back the driver variable for output parameters.
pub fn wrap_params<F>(params: Params, settings: &Settings, bind_output: &mut F) -> Result<WrappedFrame>
where
    F: FnMut(OutputVariable) -> Result<Variable>,
{
    match params {
        Params::None => Ok(WrappedFrame::Positional(Vec::new())),
        Params::Positional(values) => values
            .into_iter()
            .map(|p| wrap_param(p, settings, &mut *bind_output))
            .collect::<Result<Vec<_>>>()
            .map(WrappedFrame::Positional),
        Params::Named(values) => values
            .into_iter()
            .map(|(k, p)| Ok((k, wrap_param(p, settings, &mut *bind_output)?)))
            .collect::<Result<BTreeMap<_, _>>>()
            .map(WrappedFrame::Named),
    }
}

/// Converts one parameter into a driver scalar plus an optional size hint.
pub fn wrap_param<F>(param: Param, settings: &Settings, bind_output: &mut F) -> Result<WrappedParam>
where
    F: FnMut(OutputVariable) -> Result<Variable>,
{
    match param {
        Param::Value(value) => wrap_value(value, settings),
        Param::Sized(value, size) => {
            let wrapped = wrap_value(value, settings)?;
            Ok(WrappedParam::with_size(wrapped.value, size))
        }
        Param::Output(output) => Ok(WrappedParam::plain(BindValue::Variable(bind_output(output)?))),
    }
}

fn wrap_value(value: SqlValue, settings: &Settings) -> Result<WrappedParam> {
    let wrapped = match value {
        SqlValue::Null => WrappedParam::plain(BindValue::Null),
        // Native booleans are handled inconsistently across client versions.
        SqlValue::Bool(b) => WrappedParam::plain(BindValue::Integer(BigInt::from(u8::from(b)))),
        SqlValue::Integer(i) => WrappedParam::plain(BindValue::Integer(i)),
        SqlValue::Decimal(d) => WrappedParam::plain(BindValue::Decimal(d)),
        SqlValue::Float(f) => WrappedParam::plain(BindValue::Float(f)),
        SqlValue::Text(s) => {
            let size = (s.len() > LOB_THRESHOLD).then_some(InputSize::Clob);
            WrappedParam {
                value: BindValue::Text(s),
                input_size: size,
            }
        }
        SqlValue::Bytes(b) => {
            let size = (b.len() > LOB_THRESHOLD).then_some(InputSize::Blob);
            WrappedParam {
                value: BindValue::Binary(b),
                input_size: size,
            }
        }
        SqlValue::Date(d) => WrappedParam::plain(BindValue::Date(d)),
        SqlValue::Time(t) => WrappedParam::with_size(
            BindValue::Timestamp(time_base_date().and_time(t)),
            InputSize::Timestamp,
        ),
        SqlValue::DateTime(naive) => {
            let naive = if settings.use_tz {
                warn!(
                    value = %naive,
                    "received a naive datetime while time zone support is active"
                );
                settings
                    .default_timezone
                    .from_local_datetime(&naive)
                    .single()
                    .map(|aware| aware.naive_utc())
                    .ok_or_else(|| {
                        OraRsError::ConfigurationContradiction(format!(
                            "{naive} is skipped or repeated in time zone {}",
                            settings.default_timezone
                        ))
                    })?
            } else {
                naive
            };
            WrappedParam::with_size(BindValue::Timestamp(naive), InputSize::Timestamp)
        }
        SqlValue::DateTimeUtc(aware) => {
            if !settings.use_tz {
                return Err(OraRsError::ConfigurationContradiction(format!(
                    "time zone aware datetime {aware} received while time zone support is disabled"
                )));
            }
            WrappedParam::with_size(
                BindValue::Timestamp(aware.naive_utc()),
                InputSize::Timestamp,
            )
        }
        SqlValue::Uuid(u) => WrappedParam::plain(BindValue::Text(u.simple().to_string())),
        SqlValue::Unconverted(v) => {
            return Err(OraRsError::UnsupportedParameter(format!(
                "cannot bind unconverted driver value {v:?}"
            )))
        }
    };
    Ok(wrapped)
}
