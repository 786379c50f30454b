use crate::{error::ErrorClass, value::Value};
use thiserror::Error as ThisError;

///
/// Row source boundary
///
/// The external collaborator that owns the connection: it receives
/// compiled query text and answers with a forward-only row stream.
/// Connection acquisition and release are entirely its concern; the
/// core performs no I/O of its own and never retries.
///

pub trait RowSource {
    /// Open a cursor over the result of `query_text`.
    fn open_cursor(&self, query_text: &str) -> Result<Box<dyn RowStream>, SourceError>;
}

///
/// RowStream
///
/// Ordered row cursor. Column names are fixed for the life of the
/// stream; each `next_row` pull advances the underlying cursor by
/// exactly one row (no buffering, no read-ahead). A row always has
/// one value per column, with `Value::Null` as the null marker.
///

pub trait RowStream {
    /// Ordered column names for every row of this stream.
    fn columns(&self) -> &[String];

    /// Pull the next row, or `None` once the stream is exhausted.
    fn next_row(&mut self) -> Result<Option<Vec<Value>>, SourceError>;
}

///
/// SourceError
///
/// Failure reported by the external row source. Propagated unchanged.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SourceError {
    #[error("row source failed: {message}")]
    Failed { message: String },
}

impl SourceError {
    /// Wrap an external failure message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Classification of the underlying failure.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        ErrorClass::ExecutionFailed
    }
}
