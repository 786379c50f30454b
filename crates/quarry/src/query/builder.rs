use crate::{
    error::{Error, ErrorClass},
    materialize::Rows,
    provider::QueryProvider,
    query::{
        expr::{Expr, RowToken},
        fingerprint::{QueryFingerprint, fingerprint},
        node::QueryNode,
        translate::{QueryText, translate},
    },
    traits::Record,
    value::Value,
};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// QueryBuilder
///
/// Typed, lazy handle over a query node tree. Every operator wraps
/// the current root in a new node and returns a new builder; nothing
/// is mutated in place and nothing executes until the results are
/// consumed. Builders are cheap to clone; the provider handle and
/// the node tree are both shared.
///
/// The `Display` form is exactly the compiled query text, so a logged
/// builder can never diverge from what executes.
///

pub struct QueryBuilder<R: Record> {
    provider: QueryProvider,
    node: Arc<QueryNode>,
    _marker: PhantomData<R>,
}

impl<R: Record> QueryBuilder<R> {
    pub(crate) fn new(provider: QueryProvider) -> Self {
        Self {
            provider,
            node: QueryNode::table(R::MODEL.table),
            _marker: PhantomData,
        }
    }

    /// Current query node root.
    #[must_use]
    pub const fn node(&self) -> &Arc<QueryNode> {
        &self.node
    }

    /// Restrict the result set to rows satisfying the predicate built
    /// from the current-row placeholder. Filters compose by nesting:
    /// each call adds one more restriction layer.
    #[must_use]
    pub fn filter(mut self, predicate: impl FnOnce(&RowToken) -> Expr) -> Self {
        let predicate = predicate(&RowToken).into_node();
        self.node = QueryNode::filter(self.node, predicate);
        self
    }

    /// Cap the number of returned rows. Repeated calls are legal; the
    /// outermost (last-applied) cap is the one the translator honors.
    pub fn limit(mut self, count: i64) -> Result<Self, QueryError> {
        if count < 0 {
            return Err(QueryError::NegativeLimit(count));
        }
        self.node = QueryNode::limit(self.node, QueryNode::constant(Value::Int(count)));
        Ok(self)
    }

    /// Compile the current node tree without executing it.
    pub fn to_text(&self) -> Result<QueryText, Error> {
        self.provider.query_text(&self.node)
    }

    /// Stable fingerprint of the current node tree.
    #[must_use]
    pub fn fingerprint(&self) -> QueryFingerprint {
        fingerprint(&self.node)
    }

    /// Translate and execute, returning the lazy single-pass
    /// sequence. Calling this again re-runs the whole pipeline; the
    /// query is a description, not a cached answer.
    pub fn rows(&self) -> Result<Rows<R>, Error> {
        self.provider.execute::<R>(&self.node)
    }

    /// Execute and collect every row.
    pub fn to_vec(&self) -> Result<Vec<R>, Error> {
        let mut rows = self.rows()?;
        rows.iter()?.collect()
    }

    /// Execute and require exactly one row.
    pub fn one(&self) -> Result<R, Error> {
        let mut rows = self.rows()?;
        let mut reader = rows.iter()?;
        let Some(first) = reader.next() else {
            return Err(QueryError::NotFound {
                table: R::MODEL.table,
            }
            .into());
        };
        let first = first?;
        match reader.next() {
            None => Ok(first),
            Some(_) => Err(QueryError::NotUnique {
                table: R::MODEL.table,
            }
            .into()),
        }
    }

    /// Execute and require at most one row.
    pub fn one_opt(&self) -> Result<Option<R>, Error> {
        let mut rows = self.rows()?;
        let mut reader = rows.iter()?;
        let Some(first) = reader.next() else {
            return Ok(None);
        };
        let first = first?;
        match reader.next() {
            None => Ok(Some(first)),
            Some(_) => Err(QueryError::NotUnique {
                table: R::MODEL.table,
            }
            .into()),
        }
    }
}

impl<R: Record> Clone for QueryBuilder<R> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            node: Arc::clone(&self.node),
            _marker: PhantomData,
        }
    }
}

impl<R: Record> fmt::Display for QueryBuilder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match translate(&self.node) {
            Ok(text) => f.write_str(&text),
            Err(err) => write!(f, "<invalid query: {err}>"),
        }
    }
}

///
/// QueryError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("limit must be non-negative, got {0}")]
    NegativeLimit(i64),

    #[error("expected exactly one row, found 0 (table {table})")]
    NotFound { table: &'static str },

    #[error("expected exactly one row, found more (table {table})")]
    NotUnique { table: &'static str },
}

impl QueryError {
    /// Classification of the underlying failure.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NegativeLimit(_) => ErrorClass::InvalidArgument,
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::NotUnique { .. } => ErrorClass::Conflict,
        }
    }
}
