//! Query construction and translation.
//!
//! The intermediate representation (`node`), the caller-facing
//! combinators and builder (`expr`, `builder`), and the lowering to
//! query text (`translate`, `fingerprint`).

pub mod builder;
pub mod expr;
pub mod fingerprint;
pub mod node;
pub mod translate;

#[cfg(test)]
mod tests;

pub use builder::{QueryBuilder, QueryError};
pub use expr::{Expr, RowToken, lit};
pub use fingerprint::{QueryFingerprint, fingerprint};
pub use node::{BinaryOp, QueryNode};
pub use translate::{QueryText, TranslateError, translate};
