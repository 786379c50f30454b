use crate::value::Value;
use std::sync::Arc;

///
/// Query node AST
///
/// Immutable intermediate representation of a query. Children sit
/// behind `Arc`, so wrapping a tree in a new operator produces a new
/// root that structurally shares the old tree. Builders derived from
/// a common root share sub-trees instead of copying them.
///
/// The node set is deliberately closed: the translator is total over
/// exactly these shapes and rejects anything placed where the grammar
/// does not allow it.
///

///
/// BinaryOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum BinaryOp {
    Eq = 0x01,
    Ne = 0x02,
    Lt = 0x03,
    Lte = 0x04,
    Gt = 0x05,
    Gte = 0x06,
    And = 0x07,
    Or = 0x08,
}

impl BinaryOp {
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Fixed operator spelling in compiled query text.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

///
/// QueryNode
///

#[derive(Clone, Debug, PartialEq)]
pub enum QueryNode {
    /// Base table reference; always a leaf.
    TableRef { table: &'static str },

    /// Restriction of `source` to rows satisfying `predicate`.
    Filter {
        source: Arc<QueryNode>,
        predicate: Arc<QueryNode>,
    },

    /// Row-count cap over `source`; `count` is expected to be a
    /// 32-bit integer `Constant`.
    Limit {
        source: Arc<QueryNode>,
        count: Arc<QueryNode>,
    },

    /// Literal value.
    Constant { value: Value },

    /// Access to a field of the row currently in scope.
    Field { name: String },

    /// Binary operation, always emitted fully parenthesized.
    Binary {
        left: Arc<QueryNode>,
        op: BinaryOp,
        right: Arc<QueryNode>,
    },

    /// Logical negation.
    Not { operand: Arc<QueryNode> },
}

impl QueryNode {
    #[must_use]
    pub fn table(table: &'static str) -> Arc<Self> {
        Arc::new(Self::TableRef { table })
    }

    #[must_use]
    pub fn filter(source: Arc<Self>, predicate: Arc<Self>) -> Arc<Self> {
        Arc::new(Self::Filter { source, predicate })
    }

    #[must_use]
    pub fn limit(source: Arc<Self>, count: Arc<Self>) -> Arc<Self> {
        Arc::new(Self::Limit { source, count })
    }

    #[must_use]
    pub fn constant(value: Value) -> Arc<Self> {
        Arc::new(Self::Constant { value })
    }

    #[must_use]
    pub fn field(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::Field { name: name.into() })
    }

    #[must_use]
    pub fn binary(left: Arc<Self>, op: BinaryOp, right: Arc<Self>) -> Arc<Self> {
        Arc::new(Self::Binary { left, op, right })
    }

    #[must_use]
    pub fn negate(operand: Arc<Self>) -> Arc<Self> {
        Arc::new(Self::Not { operand })
    }

    /// Stable node-kind name used in diagnostics and translation errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TableRef { .. } => "table_ref",
            Self::Filter { .. } => "filter",
            Self::Limit { .. } => "limit",
            Self::Constant { .. } => "constant",
            Self::Field { .. } => "field_access",
            Self::Binary { .. } => "binary_op",
            Self::Not { .. } => "not",
        }
    }
}
