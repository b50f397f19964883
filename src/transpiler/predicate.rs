//! Predicate tree compilation.
//!
//! Walks the tree in order and emits a boolean SQL fragment with `?`
//! placeholders plus the parameters in placeholder order.

use crate::ast::{Comparison, Fragment, Node, Operand, Operator, Predicate, Value};
use crate::error::MatchResult;
use crate::schema::Schema;

use super::Render;

/// Compile a predicate tree against a schema.
///
/// An empty tree yields an empty fragment; callers must then omit the
/// WHERE/HAVING keyword.
pub fn compile(schema: &Schema, predicate: &Predicate) -> MatchResult<Fragment> {
    let mut sql = String::new();
    let mut params = Vec::new();
    compile_into(schema, predicate, &mut sql, &mut params)?;
    Ok(Fragment { sql, params })
}

fn compile_into(
    schema: &Schema,
    predicate: &Predicate,
    sql: &mut String,
    params: &mut Vec<Value>,
) -> MatchResult<()> {
    for node in &predicate.nodes {
        let first = sql.is_empty();
        match node {
            Node::Compare(cmp) => {
                if !first {
                    sql.push_str(" AND ");
                }
                compile_comparison(schema, cmp, sql, params)?;
            }
            Node::And(sub) | Node::Or(sub) => {
                let inner = compile(schema, sub)?;
                if inner.is_empty() {
                    continue;
                }
                if !first {
                    sql.push(' ');
                    sql.push_str(node.operator().sql_symbol());
                    sql.push(' ');
                }
                sql.push_str(&inner.sql);
                params.extend(inner.params);
            }
            Node::Group(sub) => {
                let inner = compile(schema, sub)?;
                if inner.is_empty() {
                    continue;
                }
                if !first {
                    sql.push_str(" AND ");
                }
                sql.push('(');
                sql.push_str(&inner.sql);
                sql.push(')');
                params.extend(inner.params);
            }
        }
    }
    Ok(())
}

fn compile_comparison(
    schema: &Schema,
    cmp: &Comparison,
    sql: &mut String,
    params: &mut Vec<Value>,
) -> MatchResult<()> {
    let field = cmp.field.render(schema)?;
    let op = cmp.op.sql_symbol();
    match (&cmp.op, &cmp.operand) {
        (Operator::Null | Operator::NotNull, _) => {
            sql.push_str(&format!("{} {}", field, op));
        }
        (Operator::In, Operand::List(items)) if items.is_empty() => sql.push_str("1 = 0"),
        (Operator::NotIn, Operand::List(items)) if items.is_empty() => sql.push_str("1 = 1"),
        (_, Operand::List(items)) => {
            let placeholders = vec!["?"; items.len()].join(",");
            sql.push_str(&format!("{} {} ({})", field, op, placeholders));
            params.extend(items.iter().cloned());
        }
        (_, Operand::Fragment(fragment)) => {
            sql.push_str(&format!("{} {} ({})", field, op, fragment.sql));
            params.extend(fragment.params.iter().cloned());
        }
        (_, Operand::Column(other)) => {
            sql.push_str(&format!("{} {} {}", field, op, other.render(schema)?));
        }
        (_, Operand::Literal(value)) => {
            sql.push_str(&format!("{} {} ?", field, op));
            params.push(value.clone());
        }
        (_, Operand::None) => {
            sql.push_str(&format!("{} {} ?", field, op));
            params.push(Value::Null);
        }
    }
    Ok(())
}
