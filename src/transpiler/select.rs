//! SELECT statement compilation for query descriptors.

use crate::ast::builders::count_all;
use crate::ast::{Criteria, Fragment, Query, Shape, Value};
use crate::error::MatchResult;
use crate::schema::{resolve_table, Dialect, Schema};

use super::predicate::compile;
use super::projection::infer_columns;
use super::Render;

/// The compiled parts of a SELECT statement.
///
/// Parts are kept separate so an executor can assemble them itself;
/// [`Statement::to_sql`] and [`Statement::params`] give the assembled form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    /// Projected column list, comma separated.
    pub columns: String,
    /// Quoted source table, or a derived table with its own parameters.
    pub from: Fragment,
    /// One `<KIND> JOIN <table> ON <cond>` clause per join.
    pub joins: Vec<Fragment>,
    /// WHERE condition (without the keyword).
    pub filter: Fragment,
    pub group_by: Option<String>,
    /// HAVING condition (without the keyword).
    pub having: Fragment,
    pub order_by: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Statement {
    /// Assemble the full SELECT.
    pub fn to_sql(&self) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.columns, self.from.sql);

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.sql);
        }

        if !self.filter.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.filter.sql);
        }

        if let Some(group) = &self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(group);
        }

        if !self.having.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&self.having.sql);
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(","));
        }

        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }

        if let Some(n) = self.offset {
            sql.push_str(&format!(" OFFSET {}", n));
        }

        sql
    }

    /// All parameters in placeholder order: derived table, joins, WHERE,
    /// HAVING.
    pub fn params(&self) -> Vec<Value> {
        self.from
            .params
            .iter()
            .chain(self.joins.iter().flat_map(|j| j.params.iter()))
            .chain(self.filter.params.iter())
            .chain(self.having.params.iter())
            .cloned()
            .collect()
    }
}

impl Query {
    /// The schema formed from this query's source table.
    pub fn schema(&self, dialect: Dialect) -> Schema {
        Schema::new(dialect, self.source.clone())
    }

    /// Compile this descriptor and the caller's criteria.
    pub fn build(&self, dialect: Dialect, criteria: &Criteria) -> MatchResult<Statement> {
        let schema = self.schema(dialect);
        let columns = self.columns(&schema)?;
        self.build_with(&schema, columns, criteria)
    }

    /// Compile a `SELECT COUNT(*)` over the same source, joins and filter.
    /// Sort and pagination are dropped.
    ///
    /// A grouped query counts its groups: the grouped SELECT becomes a
    /// derived table and the outer query counts its rows.
    pub fn count(&self, dialect: Dialect, criteria: &Criteria) -> MatchResult<Statement> {
        let schema = self.schema(dialect);
        let columns = count_all().render(&schema)?;
        let criteria = Criteria::filter(criteria.predicate.clone());

        let Some(group) = &self.group else {
            return self.build_with(&schema, columns, &criteria);
        };

        let grouped = self.build_with(&schema, group.by.render(&schema)?, &criteria)?;
        let statement = Statement {
            columns,
            from: Fragment::new(format!("({}) AS grouped", grouped.to_sql()), grouped.params()),
            ..Statement::default()
        };
        tracing::debug!(sql = %statement.to_sql(), "compiled grouped count");
        Ok(statement)
    }

    fn columns(&self, schema: &Schema) -> MatchResult<String> {
        if !self.fields.is_empty() {
            let fields = self
                .fields
                .iter()
                .map(|f| f.render(schema))
                .collect::<MatchResult<Vec<String>>>()?;
            return Ok(fields.join(","));
        }
        match &self.result {
            Shape::All => Ok("*".to_string()),
            Shape::Scalar(target) => target.render(schema),
            Shape::Record(meta) => Ok(infer_columns(schema, meta)?.join(",")),
        }
    }

    fn build_with(&self, schema: &Schema, columns: String, criteria: &Criteria) -> MatchResult<Statement> {
        let from = Fragment::new(schema.quote(schema.require_table()?), vec![]);

        let mut joins = Vec::with_capacity(self.joins.len());
        for join in &self.joins {
            let target = schema.quote(&resolve_table(&join.target)?);
            let on = compile(schema, &join.on)?;
            joins.push(Fragment {
                sql: format!("{} {} ON {}", join.kind, target, on.sql),
                params: on.params,
            });
        }

        let filter = compile(schema, &criteria.predicate)?;

        let (group_by, having) = match &self.group {
            Some(group) => {
                let having = match &group.having {
                    Some(having) => compile(schema, having)?,
                    None => Fragment::default(),
                };
                (Some(group.by.render(schema)?), having)
            }
            None => (None, Fragment::default()),
        };

        let order_by = criteria
            .sort
            .iter()
            .map(|s| s.render(schema))
            .collect::<MatchResult<Vec<String>>>()?;

        let statement = Statement {
            columns,
            from,
            joins,
            filter,
            group_by,
            having,
            order_by,
            limit: criteria.limit,
            offset: criteria.offset,
        };
        tracing::debug!(sql = %statement.to_sql(), params = statement.params().len(), "compiled select");
        Ok(statement)
    }
}
