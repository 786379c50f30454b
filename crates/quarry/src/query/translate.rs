use crate::{error::ErrorClass, query::node::QueryNode, value::Value};
use derive_more::{Deref, Display};
use std::fmt::Write as _;
use thiserror::Error as ThisError;

///
/// Translator
///
/// Deterministic structural lowering of a query node tree into query
/// text. Children compile left-to-right, source before predicate, and
/// nothing is reordered or optimized: the emitted text mirrors the
/// tree shape exactly, so the same tree always compiles to the same
/// text. Translation is all-or-nothing: any unsupported shape aborts
/// before execution, and no partial text ever leaves this module.
///
/// Known limitation: string constants are embedded single-quoted and
/// UNESCAPED. A constant containing `'` produces broken or wrong
/// query text rather than an error. Deliberately not sanitized here;
/// callers embedding untrusted text must quote it themselves.
///

///
/// QueryText
///
/// Compiled query text. Opaque; nothing structured survives
/// translation.
///

#[derive(Clone, Debug, Deref, Display, Eq, PartialEq)]
pub struct QueryText(String);

impl QueryText {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

///
/// TranslateError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum TranslateError {
    #[error("node '{kind}' is not supported as a query source")]
    UnsupportedSource { kind: &'static str },

    #[error("node '{kind}' is not supported inside a predicate")]
    UnsupportedPredicate { kind: &'static str },

    #[error("constant of type {type_name} is not supported in query text")]
    UnsupportedConstant { type_name: &'static str },

    #[error("limit count must be a constant, got node '{kind}'")]
    LimitNotConstant { kind: &'static str },

    #[error("limit count must be a 32-bit integer, got {found}")]
    LimitNotInteger { found: &'static str },

    #[error("limit count {count} does not fit in a 32-bit integer")]
    LimitOutOfRange { count: i64 },
}

impl TranslateError {
    /// Classification of the underlying failure.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::UnsupportedSource { .. }
            | Self::UnsupportedPredicate { .. }
            | Self::UnsupportedConstant { .. }
            | Self::LimitNotConstant { .. } => ErrorClass::Unsupported,
            Self::LimitNotInteger { .. } | Self::LimitOutOfRange { .. } => ErrorClass::TypeMismatch,
        }
    }
}

/// Compile a query node tree into query text.
pub fn translate(node: &QueryNode) -> Result<QueryText, TranslateError> {
    let mut state = SqlState::default();
    let table = walk_source(node, &mut state)?;
    Ok(state.into_text(table))
}

///
/// SqlState
///
/// Accumulator for the flat SELECT this grammar lowers to: one base
/// table, an optional row cap, and zero or more restriction layers.
///

#[derive(Default)]
struct SqlState {
    top: Option<i32>,
    layers: Vec<String>,
}

impl SqlState {
    fn into_text(self, table: &str) -> QueryText {
        let mut sql = String::from("SELECT ");
        if let Some(top) = self.top {
            let _ = write!(sql, "TOP {top} ");
        }
        sql.push_str("* FROM ");
        sql.push_str(table);
        if !self.layers.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.layers.join(" AND "));
        }
        QueryText(sql)
    }
}

/// Walk the source spine of the tree. Filters append one restriction
/// layer each (innermost first); limits overwrite the cap, so with
/// nested limits the outermost (last-applied) one wins.
fn walk_source<'a>(
    node: &'a QueryNode,
    state: &mut SqlState,
) -> Result<&'a str, TranslateError> {
    match node {
        QueryNode::TableRef { table } => Ok(*table),
        QueryNode::Filter { source, predicate } => {
            let table = walk_source(source, state)?;
            let clause = emit_predicate(predicate)?;
            state.layers.push(clause);
            Ok(table)
        }
        QueryNode::Limit { source, count } => {
            let table = walk_source(source, state)?;
            state.top = Some(limit_count(count)?);
            Ok(table)
        }
        other => Err(TranslateError::UnsupportedSource { kind: other.kind() }),
    }
}

fn limit_count(count: &QueryNode) -> Result<i32, TranslateError> {
    match count {
        QueryNode::Constant {
            value: Value::Int(n),
        } => i32::try_from(*n).map_err(|_| TranslateError::LimitOutOfRange { count: *n }),
        QueryNode::Constant { value } => Err(TranslateError::LimitNotInteger {
            found: value.type_name(),
        }),
        other => Err(TranslateError::LimitNotConstant { kind: other.kind() }),
    }
}

fn emit_predicate(node: &QueryNode) -> Result<String, TranslateError> {
    match node {
        QueryNode::Field { name } => Ok(name.clone()),
        QueryNode::Constant { value } => emit_literal(value),
        QueryNode::Binary { left, op, right } => Ok(format!(
            "({} {} {})",
            emit_predicate(left)?,
            op.symbol(),
            emit_predicate(right)?
        )),
        QueryNode::Not { operand } => Ok(format!("NOT {}", emit_predicate(operand)?)),
        other => Err(TranslateError::UnsupportedPredicate { kind: other.kind() }),
    }
}

fn emit_literal(value: &Value) -> Result<String, TranslateError> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        // No escaping; see the module header.
        Value::Text(s) => Ok(format!("'{s}'")),
        Value::Bytes(_) => Err(TranslateError::UnsupportedConstant {
            type_name: value.type_name(),
        }),
    }
}
