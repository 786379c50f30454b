use crate::{
    query::node::{BinaryOp, QueryNode},
    value::Value,
};
use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

///
/// Predicate combinators
///
/// The caller-facing surface for predicate construction. Instead of
/// capturing host-language expressions, predicates are assembled from
/// a symbolic current-row placeholder (`RowToken`) and a small
/// combinator vocabulary: comparisons build `Binary` nodes, `&`/`|`
/// compose conjunction and disjunction, `!` negates.
///

///
/// RowToken
///
/// Placeholder for the row currently in scope inside a filter. Field
/// accesses built from it are only meaningful within the predicate of
/// the nearest enclosing filter; the translator rejects any other
/// placement.
///

pub struct RowToken;

impl RowToken {
    /// Reference a field of the current row.
    #[must_use]
    pub fn field(&self, name: impl Into<String>) -> Expr {
        Expr(QueryNode::field(name))
    }
}

///
/// Expr
///
/// Handle over a predicate-position sub-tree.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Expr(Arc<QueryNode>);

/// Lift a plain value into a constant expression.
#[must_use]
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr(QueryNode::constant(value.into()))
}

impl Expr {
    /// Unwrap into the underlying node for translation or inspection.
    #[must_use]
    pub fn into_node(self) -> Arc<QueryNode> {
        self.0
    }

    #[must_use]
    pub fn eq(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Eq, rhs)
    }

    #[must_use]
    pub fn ne(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Ne, rhs)
    }

    #[must_use]
    pub fn lt(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Lt, rhs)
    }

    #[must_use]
    pub fn lte(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Lte, rhs)
    }

    #[must_use]
    pub fn gt(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Gt, rhs)
    }

    #[must_use]
    pub fn gte(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Gte, rhs)
    }

    fn binary(self, op: BinaryOp, rhs: impl Into<Self>) -> Self {
        Self(QueryNode::binary(self.0, op, rhs.into().0))
    }
}

impl BitAnd for Expr {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(QueryNode::binary(self.0, BinaryOp::And, rhs.0))
    }
}

impl BitOr for Expr {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(QueryNode::binary(self.0, BinaryOp::Or, rhs.0))
    }
}

impl Not for Expr {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(QueryNode::negate(self.0))
    }
}

// Value lifts double as expression lifts so comparison operands can be
// written as plain Rust literals.
macro_rules! impl_expr_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Expr {
                fn from(value: $ty) -> Self {
                    lit(value)
                }
            }
        )*
    };
}

impl_expr_from!(bool, f32, f64, i8, i16, i32, i64, u8, u16, u32, &str, String, Value);
