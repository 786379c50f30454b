//! quarry: a typed, lazy query builder and row materializer for
//! external SQL row sources.
//!
//! Queries are assembled from composable operators into an immutable
//! node tree, compiled to query text only when the results are
//! consumed, executed through an external [`source::RowSource`], and
//! materialized back into typed records by column-name binding.
//!
//! ```
//! let provider = QueryProvider::new(source);
//! let customers = provider
//!     .table::<Customer>()
//!     .filter(|c| c.field("City").eq("London") & c.field("Country").eq("UK"))
//!     .limit(2)?
//!     .to_vec()?;
//! ```
//!
//! Known limitation: string constants are embedded into query text
//! single-quoted but unescaped. Do not feed untrusted text into
//! predicate constants.

pub mod diagnostics;
pub mod error;
pub mod materialize;
pub mod model;
pub mod provider;
pub mod query;
pub mod source;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// Errors and the trace boundary are deliberately not re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{FieldKind, FieldModel, RecordModel},
        provider::QueryProvider,
        query::{Expr, QueryBuilder, RowToken, lit},
        source::{RowSource, RowStream},
        traits::Record,
        value::Value,
    };
}
