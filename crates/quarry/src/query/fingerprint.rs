//! Deterministic query fingerprinting over the node tree.
//!
//! Fingerprints are a diagnostics aid: they identify a query across
//! trace events and tests without carrying its text around. They are
//! never used to cache results; re-enumeration always re-executes.

use crate::{query::node::QueryNode, value::Value};
use sha2::{Digest, Sha256};

///
/// QueryFingerprint
///
/// Stable, deterministic fingerprint for query node trees.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct QueryFingerprint([u8; 32]);

impl QueryFingerprint {
    #[must_use]
    pub fn as_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in self.0 {
            use std::fmt::Write as _;
            let _ = write!(out, "{byte:02x}");
        }
        out
    }
}

impl std::fmt::Display for QueryFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_hex())
    }
}

/// Compute a stable fingerprint for a query node tree.
#[must_use]
pub fn fingerprint(node: &QueryNode) -> QueryFingerprint {
    let mut hasher = Sha256::new();
    hasher.update(b"queryfp:v1");
    hash_node(&mut hasher, node);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    QueryFingerprint(out)
}

fn hash_node(hasher: &mut Sha256, node: &QueryNode) {
    match node {
        QueryNode::TableRef { table } => {
            write_tag(hasher, 0x01);
            write_str(hasher, table);
        }
        QueryNode::Filter { source, predicate } => {
            write_tag(hasher, 0x02);
            hash_node(hasher, source);
            hash_node(hasher, predicate);
        }
        QueryNode::Limit { source, count } => {
            write_tag(hasher, 0x03);
            hash_node(hasher, source);
            hash_node(hasher, count);
        }
        QueryNode::Constant { value } => {
            write_tag(hasher, 0x04);
            hash_value(hasher, value);
        }
        QueryNode::Field { name } => {
            write_tag(hasher, 0x05);
            write_str(hasher, name);
        }
        QueryNode::Binary { left, op, right } => {
            write_tag(hasher, 0x06);
            write_tag(hasher, op.tag());
            hash_node(hasher, left);
            hash_node(hasher, right);
        }
        QueryNode::Not { operand } => {
            write_tag(hasher, 0x07);
            hash_node(hasher, operand);
        }
    }
}

fn hash_value(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Null => write_tag(hasher, 0x10),
        Value::Bool(b) => {
            write_tag(hasher, 0x11);
            write_tag(hasher, u8::from(*b));
        }
        Value::Int(n) => {
            write_tag(hasher, 0x12);
            hasher.update(n.to_be_bytes());
        }
        Value::Float(f) => {
            write_tag(hasher, 0x13);
            hasher.update(f.to_bits().to_be_bytes());
        }
        Value::Text(s) => {
            write_tag(hasher, 0x14);
            write_str(hasher, s);
        }
        Value::Bytes(bytes) => {
            write_tag(hasher, 0x15);
            write_bytes(hasher, bytes);
        }
    }
}

fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}

fn write_str(hasher: &mut Sha256, s: &str) {
    write_bytes(hasher, s.as_bytes());
}

fn write_bytes(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update(u32::try_from(bytes.len()).unwrap_or(u32::MAX).to_be_bytes());
    hasher.update(bytes);
}
