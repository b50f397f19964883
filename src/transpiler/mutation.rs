//! UPDATE and DELETE compilation.
//!
//! Both compile their predicate independently of any projection. SET
//! columns are quoted but never table-qualified.

use crate::ast::{Assignments, Fragment, Predicate};
use crate::error::{MatchError, MatchResult};
use crate::schema::Schema;

use super::predicate::compile;

/// `UPDATE <table> SET <col>=?,... [WHERE ...]`
///
/// Parameters: SET values in assignment order, then WHERE parameters.
pub fn update_fields(schema: &Schema, fields: &Assignments, predicate: &Predicate) -> MatchResult<Fragment> {
    let table = schema.require_table()?;
    if fields.is_empty() {
        return Err(MatchError::NothingToUpdate {
            table: table.to_string(),
        });
    }

    let set_clauses: Vec<String> = fields
        .columns
        .iter()
        .map(|(column, _)| format!("{}=?", schema.quote(column)))
        .collect();
    let mut params: Vec<_> = fields.columns.iter().map(|(_, value)| value.clone()).collect();

    let mut sql = format!("UPDATE {} SET {}", schema.quote(table), set_clauses.join(","));
    let filter = compile(schema, predicate)?;
    if !filter.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&filter.sql);
        params.extend(filter.params);
    }

    tracing::debug!(sql = %sql, params = params.len(), "compiled update");
    Ok(Fragment { sql, params })
}

/// `DELETE FROM <table> [WHERE ...]`
pub fn delete(schema: &Schema, predicate: &Predicate) -> MatchResult<Fragment> {
    let table = schema.require_table()?;
    let mut sql = format!("DELETE FROM {}", schema.quote(table));
    let filter = compile(schema, predicate)?;
    if !filter.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&filter.sql);
    }

    tracing::debug!(sql = %sql, params = filter.params.len(), "compiled delete");
    Ok(Fragment {
        sql,
        params: filter.params,
    })
}
