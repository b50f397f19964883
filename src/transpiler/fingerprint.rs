//! Cache-key fingerprints for criteria.
//!
//! The digest covers the predicate tree, sort keys, limit and offset. It is
//! stable across processes but not collision resistant; do not use it where
//! an adversary controls the input and a collision matters.

use std::fmt::Write;

use crate::ast::{Criteria, Node, Operand, Predicate};

/// Hex MD5 over the textual form of the criteria.
pub fn fingerprint(criteria: &Criteria) -> String {
    let mut text = String::new();
    write_predicate(&mut text, &criteria.predicate);
    for key in &criteria.sort {
        let _ = write!(text, "{}", key);
    }
    let _ = write!(
        text,
        "{}{}",
        criteria.limit.unwrap_or(0),
        criteria.offset.unwrap_or(0)
    );
    format!("{:x}", md5::compute(text.as_bytes()))
}

fn write_predicate(out: &mut String, predicate: &Predicate) {
    for node in &predicate.nodes {
        match node {
            Node::Compare(cmp) => {
                let _ = write!(out, "{}{}", cmp.field, cmp.op.code());
                write_operand(out, &cmp.operand);
            }
            Node::And(sub) | Node::Or(sub) | Node::Group(sub) => {
                let _ = write!(out, "{}", node.operator().code());
                write_predicate(out, sub);
            }
        }
    }
}

fn write_operand(out: &mut String, operand: &Operand) {
    let _ = match operand {
        Operand::None => write!(out, "<nil>"),
        Operand::Literal(value) => write!(out, "{}", value),
        Operand::List(items) => {
            let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
            write!(out, "[{}]", parts.join(" "))
        }
        Operand::Column(expr) => write!(out, "{}", expr),
        Operand::Fragment(fragment) => {
            let parts: Vec<String> = fragment.params.iter().map(|v| v.to_string()).collect();
            write!(out, "{}[{}]", fragment.sql, parts.join(" "))
        }
    };
}

impl Criteria {
    /// See [`fingerprint`].
    pub fn fingerprint(&self) -> String {
        fingerprint(self)
    }
}
