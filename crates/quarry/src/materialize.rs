use crate::{
    diagnostics::{self, TraceEvent},
    error::{Error, ErrorClass},
    model::{FieldKind, FieldModel},
    query::fingerprint::QueryFingerprint,
    source::RowStream,
    traits::Record,
    value::Value,
};
use std::marker::PhantomData;
use thiserror::Error as ThisError;

///
/// Materializer
///
/// Binds a row stream back into typed records. Field-to-column
/// binding is resolved once per stream by case-insensitive name
/// match; fields without a matching column keep their default value,
/// and columns without a matching field are ignored. Each pull
/// advances the underlying cursor by exactly one row.
///

// Largest integer magnitude exactly representable in an f64.
const F64_SAFE_I64: i64 = 1i64 << 53;

///
/// MaterializeError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum MaterializeError {
    #[error("result rows cannot be enumerated more than once")]
    AlreadyConsumed,

    #[error("row is {width} columns wide, bound column {index} is out of range")]
    RowWidth { index: usize, width: usize },

    #[error("field '{field}' expects {expected}, got {found}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

impl MaterializeError {
    /// Classification of the underlying failure.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::AlreadyConsumed => ErrorClass::InvalidOperation,
            Self::RowWidth { .. } => ErrorClass::ExecutionFailed,
            Self::TypeMismatch { .. } => ErrorClass::TypeMismatch,
        }
    }
}

///
/// Rows
///
/// Single-pass result sequence. The reader can be taken exactly once;
/// a second take fails without touching the row source. Re-running
/// the query (not this sequence) is the only way to read it again.
///

pub struct Rows<R: Record> {
    reader: Option<RecordReader<R>>,
}

impl<R: Record> Rows<R> {
    pub(crate) fn new(stream: Box<dyn RowStream>, fingerprint: QueryFingerprint) -> Self {
        Self {
            reader: Some(RecordReader::new(stream, fingerprint)),
        }
    }

    /// Take the one-shot record iterator.
    pub fn iter(&mut self) -> Result<RecordReader<R>, MaterializeError> {
        self.reader.take().ok_or(MaterializeError::AlreadyConsumed)
    }
}

///
/// RecordReader
///
/// Forward-only record iterator over one row stream. A row that fails
/// coercion yields its error in place; it is never skipped silently.
///

pub struct RecordReader<R: Record> {
    stream: Box<dyn RowStream>,
    binding: Vec<Option<usize>>,
    fingerprint: QueryFingerprint,
    rows: u64,
    done: bool,
    _marker: PhantomData<R>,
}

impl<R: Record> RecordReader<R> {
    fn new(stream: Box<dyn RowStream>, fingerprint: QueryFingerprint) -> Self {
        let binding = bind_fields(R::MODEL.fields, stream.columns());
        Self {
            stream,
            binding,
            fingerprint,
            rows: 0,
            done: false,
            _marker: PhantomData,
        }
    }

    fn materialize_row(&self, row: Vec<Value>) -> Result<R, Error> {
        let mut record = R::default();
        for (field, slot) in R::MODEL.fields.iter().zip(&self.binding) {
            let Some(index) = *slot else { continue };
            let Some(value) = row.get(index) else {
                return Err(MaterializeError::RowWidth {
                    index,
                    width: row.len(),
                }
                .into());
            };
            // Null marker: the field keeps its null/default representation.
            if value.is_null() {
                continue;
            }
            let coerced = coerce(field, value.clone())?;
            record.set(field.name, coerced);
        }
        Ok(record)
    }
}

impl<R: Record> Iterator for RecordReader<R> {
    type Item = Result<R, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.stream.next_row() {
            Ok(Some(row)) => {
                self.rows += 1;
                Some(self.materialize_row(row))
            }
            Ok(None) => {
                self.done = true;
                diagnostics::emit(TraceEvent::ExecuteFinish {
                    fingerprint: self.fingerprint,
                    rows: self.rows,
                });
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err.into()))
            }
        }
    }
}

/// Resolve each model field to a column index, once per stream.
/// First case-insensitive match wins; unmatched fields stay unbound.
fn bind_fields(fields: &[FieldModel], columns: &[String]) -> Vec<Option<usize>> {
    fields
        .iter()
        .map(|field| {
            columns
                .iter()
                .position(|column| column.eq_ignore_ascii_case(field.name))
        })
        .collect()
}

fn coerce(field: &FieldModel, value: Value) -> Result<Value, MaterializeError> {
    match (field.kind, value) {
        (FieldKind::Bool, value @ Value::Bool(_))
        | (FieldKind::Int, value @ Value::Int(_))
        | (FieldKind::Float, value @ Value::Float(_))
        | (FieldKind::Text, value @ Value::Text(_)) => Ok(value),
        (FieldKind::Int, Value::Float(f)) => float_to_int(field, f),
        (FieldKind::Float, Value::Int(n)) => int_to_float(field, n),
        (_, other) => Err(mismatch(field, other.type_name())),
    }
}

/// Fraction-free floats convert to integer fields; anything else is a
/// mismatch rather than a silent truncation.
fn float_to_int(field: &FieldModel, f: f64) -> Result<Value, MaterializeError> {
    if f.fract() == 0.0 {
        if let Some(n) = num_traits::cast::<f64, i64>(f) {
            return Ok(Value::Int(n));
        }
    }
    Err(mismatch(field, "float"))
}

/// Integers convert to float fields only within the exactly
/// representable range.
fn int_to_float(field: &FieldModel, n: i64) -> Result<Value, MaterializeError> {
    if (-F64_SAFE_I64..=F64_SAFE_I64).contains(&n) {
        if let Some(f) = num_traits::cast::<i64, f64>(n) {
            return Ok(Value::Float(f));
        }
    }
    Err(mismatch(field, "int"))
}

const fn mismatch(field: &FieldModel, found: &'static str) -> MaterializeError {
    MaterializeError::TypeMismatch {
        field: field.name,
        expected: field.kind.label(),
        found,
    }
}
