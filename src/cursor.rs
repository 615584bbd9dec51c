use std::sync::Arc;

use num_bigint::BigInt;
use tracing::{debug, instrument, trace};

use crate::config::Settings;
use crate::decoder::RowDecoder;
use crate::error::{reclassify, OraRsError, Result};
use crate::output::PendingOutput;
use crate::params::{guess_input_sizes, wrap_params, OutputVariable, Params, SizeDirectives, VarKind, Variable, WrappedFrame};
use crate::rewrite::{rewrite, FrameShape};
use crate::traits::DriverCursor;
use crate::types::{ColumnDescriptor, DriverValue, FieldInfo, RawRow, Row, SqlValue};

/// Executes statements written with `%s` / `%(name)s` placeholders and
/// decodes their results.
///
/// # Example
/// ```ignore
/// let mut cursor = connection.cursor()?;
/// let rows = cursor
///     .execute("SELECT id, name FROM users WHERE name = %s", vec!["John"])?
///     .fetchall()?;
///
/// let id = rows[0].get("ID")?;
/// ```
pub struct Cursor<C: DriverCursor> {
    inner: C,
    settings: Arc<Settings>,
    array_size: usize,
    description: Arc<[ColumnDescriptor]>,
    columns: Arc<[String]>,
    fields: Option<Arc<[FieldInfo]>>,
    insert_id: PendingOutput,
}

impl<C: DriverCursor> Cursor<C> {
    pub(crate) fn new(inner: C, settings: Arc<Settings>) -> Self {
        let array_size = settings.array_size().max(1);
        Self {
            inner,
            settings,
            array_size,
            description: Arc::from(Vec::new()),
            columns: Arc::from(Vec::new()),
            fields: None,
            insert_id: PendingOutput::default(),
        }
    }

    /// Executes one statement.
    ///
    /// Driver errors for a NULL written into a NOT NULL column come back as
    /// [`OraRsError::IntegrityViolation`]; every other driver error is
    /// returned as [`OraRsError::Driver`] unchanged.
    #[instrument(level = "debug", skip_all, fields(sql = %sql))]
    pub fn execute(&mut self, sql: &str, params: impl Into<Params>) -> Result<&mut Self> {
        let params = params.into();
        let query = rewrite(sql, frame_shape(&params))?;
        self.fields = None;

        let result = self.wrap(params).and_then(|frame| {
            let sizes = guess_input_sizes(std::slice::from_ref(&frame));
            self.set_input_sizes(&sizes)?;
            debug!(statement = %query.sql, "executing");
            self.inner
                .execute(&query.sql, &frame.into_bind_frame())
                .map_err(reclassify)
        });
        self.finish(result)?;
        Ok(self)
    }

    /// Executes one statement once per parameter frame.
    ///
    /// The first frame decides how placeholders are rewritten; the rest are
    /// assumed to have the same shape. The whole batch is wrapped before
    /// anything is sent so size directives cover every row. An empty batch
    /// does nothing.
    #[instrument(level = "debug", skip_all, fields(sql = %sql))]
    pub fn executemany<I, P>(&mut self, sql: &str, batch: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<Params>,
    {
        let batch: Vec<Params> = batch.into_iter().map(Into::into).collect();
        let Some(first) = batch.first() else {
            debug!("empty batch, nothing to execute");
            return Ok(());
        };
        let query = rewrite(sql, frame_shape(first))?;
        self.fields = None;

        let rows = batch.len();
        let result = batch
            .into_iter()
            .map(|params| self.wrap(params))
            .collect::<Result<Vec<_>>>()
            .and_then(|frames| {
                let sizes = guess_input_sizes(&frames);
                self.set_input_sizes(&sizes)?;
                let frames: Vec<_> = frames.into_iter().map(WrappedFrame::into_bind_frame).collect();
                debug!(statement = %query.sql, rows, "executing batch");
                self.inner
                    .execute_many(&query.sql, &frames)
                    .map_err(reclassify)
            });
        self.finish(result)
    }

    pub fn fetchone(&mut self) -> Result<Option<Row>> {
        match self.inner.fetch_one()? {
            Some(raw) => self.decode(raw).map(Some),
            None => Ok(None),
        }
    }

    /// Fetches up to `size` rows, or [`array_size`](Self::array_size) rows
    /// when `size` is `None`.
    pub fn fetchmany(&mut self, size: Option<usize>) -> Result<Vec<Row>> {
        let raw = self.inner.fetch_many(size.unwrap_or(self.array_size))?;
        raw.into_iter().map(|row| self.decode(row)).collect()
    }

    pub fn fetchall(&mut self) -> Result<Vec<Row>> {
        let raw = self.inner.fetch_all()?;
        raw.into_iter().map(|row| self.decode(row)).collect()
    }

    /// Iterates over the remaining rows one fetch at a time.
    pub fn rows(&mut self) -> impl Iterator<Item = Result<Row>> + '_ {
        std::iter::from_fn(move || self.fetchone().transpose())
    }

    /// Column metadata of the last executed statement.
    pub fn description(&self) -> &[ColumnDescriptor] {
        &self.description
    }

    /// Attaches destination field metadata to the current result set,
    /// one entry per column.
    ///
    /// Cleared by the next execution.
    pub fn with_fields<I, F>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldInfo>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn array_size(&self) -> usize {
        self.array_size
    }

    /// Allocates a driver variable that can be bound as a parameter.
    pub fn var(&mut self, kind: VarKind) -> Result<Variable> {
        Ok(self.inner.var(kind)?)
    }

    /// Reads a variable allocated with [`var`](Self::var).
    pub fn variable_value(&mut self, var: &Variable) -> Result<SqlValue> {
        let raw = self.inner.var_value(var)?;
        let mut values = RowDecoder::new(&[], self.settings.use_tz).decode(vec![raw], &mut self.inner)?;
        Ok(values.pop().unwrap_or(SqlValue::Null))
    }

    /// Returns the id generated by the last `INSERT ... RETURNING ... INTO`
    /// executed with [`Param::insert_id`](crate::Param::insert_id).
    ///
    /// # Panics
    ///
    /// Panics if no such statement has executed since the last call, or if
    /// the id was already read.
    pub fn fetch_returned_insert_id(&mut self) -> Result<BigInt> {
        let var = self.insert_id.take();
        let invalid = |reason: String| OraRsError::Decode {
            column: "returned insert id".to_string(),
            reason,
        };
        match self.inner.var_value(&var)? {
            DriverValue::Number(text) => text
                .trim()
                .parse::<BigInt>()
                .map_err(|e| invalid(format!("`{text}`: {e}"))),
            DriverValue::Float(f) if f.fract() == 0.0 => Ok(BigInt::from(f as i128)),
            other => Err(invalid(format!("unexpected value {other:?}"))),
        }
    }

    pub fn close(&mut self) -> Result<()> {
        self.insert_id = PendingOutput::default();
        Ok(self.inner.close()?)
    }

    fn wrap(&mut self, params: Params) -> Result<WrappedFrame> {
        let settings = Arc::clone(&self.settings);
        let inner = &mut self.inner;
        let pending = &mut self.insert_id;
        let mut bind_output = |output: OutputVariable| -> Result<Variable> {
            match output {
                OutputVariable::InsertId => {
                    let var = inner.var(VarKind::Number)?;
                    pending.register(var);
                    Ok(var)
                }
                OutputVariable::Allocated(var) => Ok(var),
            }
        };
        wrap_params(params, &settings, &mut bind_output)
    }

    fn set_input_sizes(&mut self, sizes: &SizeDirectives) -> Result<()> {
        if sizes.is_empty() {
            return Ok(());
        }
        trace!(?sizes, "registering input sizes");
        self.inner.set_input_sizes(sizes).map_err(reclassify)
    }

    fn finish(&mut self, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => {
                self.insert_id.executed();
                let description: Arc<[ColumnDescriptor]> = Arc::from(self.inner.description());
                self.columns = description.iter().map(|c| c.name.clone()).collect();
                self.description = description;
                Ok(())
            }
            Err(err) => {
                self.insert_id.discard();
                Err(err)
            }
        }
    }

    fn decode(&mut self, raw: RawRow) -> Result<Row> {
        let description = Arc::clone(&self.description);
        let fields = self.fields.clone();
        let mut decoder = RowDecoder::new(&description, self.settings.use_tz);
        if let Some(fields) = fields.as_deref() {
            decoder = decoder.with_fields(fields);
        }
        let values = decoder.decode(raw, &mut self.inner)?;
        Ok(Row::new(Arc::clone(&self.columns), values))
    }
}

fn frame_shape(params: &Params) -> FrameShape<'_> {
    match params {
        Params::None => FrameShape::Unbound,
        Params::Positional(values) => FrameShape::Positional(values.len()),
        Params::Named(values) => FrameShape::Named(values.keys().map(String::as_str).collect()),
    }
}
