use crate::{
    materialize::MaterializeError, query::builder::QueryError, query::translate::TranslateError,
    source::SourceError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// ErrorClass
///
/// Stable classification for every error the crate surfaces. Callers
/// that do not care which layer failed can branch on the class alone.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Conflict,
    ExecutionFailed,
    InvalidArgument,
    InvalidOperation,
    NotFound,
    TypeMismatch,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Conflict => "conflict",
            Self::ExecutionFailed => "execution_failed",
            Self::InvalidArgument => "invalid_argument",
            Self::InvalidOperation => "invalid_operation",
            Self::NotFound => "not_found",
            Self::TypeMismatch => "type_mismatch",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// Error
///
/// Top-level error surface. Nothing is recovered locally: every
/// layer's error converts in unchanged, with no retry logic and no
/// fallback values.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("{0}")]
    Translate(#[from] TranslateError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Materialize(#[from] MaterializeError),
}

impl Error {
    /// Classification of the underlying failure.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Query(err) => err.class(),
            Self::Translate(err) => err.class(),
            Self::Source(err) => err.class(),
            Self::Materialize(err) => err.class(),
        }
    }
}
