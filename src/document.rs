//! Query documents: a serde model of a query descriptor plus criteria,
//! loadable from JSON or TOML files.
//!
//! ```json
//! {
//!   "source": "books",
//!   "joins": [{ "kind": "left", "table": "users",
//!               "on": [{ "field": "author_id", "op": "eq", "column": "users.id" }] }],
//!   "filter": [
//!     { "field": "author_id", "op": "in", "value": ["1", "2", "3"] },
//!     { "or": [{ "field": "name", "op": "like", "value": "%rust%" }] }
//!   ],
//!   "sort": ["id DESC"],
//!   "limit": 10
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ast::{Criteria, Expr, JoinKind, Operator, Predicate, Query, Value};
use crate::error::{MatchError, MatchResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryDocument {
    pub source: String,
    /// Explicit projection; `*` when empty.
    pub fields: Vec<String>,
    pub joins: Vec<JoinSpec>,
    pub group: Option<GroupSpec>,
    pub filter: Vec<FilterNode>,
    pub sort: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinSpec {
    #[serde(default)]
    pub kind: JoinKind,
    pub table: String,
    pub on: Vec<FilterNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupSpec {
    pub by: String,
    #[serde(default)]
    pub having: Vec<FilterNode>,
}

/// One node of a document filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    And { and: Vec<FilterNode> },
    Or { or: Vec<FilterNode> },
    Group { group: Vec<FilterNode> },
    Compare(CompareSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareSpec {
    pub field: String,
    pub op: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Compare against another column instead of a bound value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl QueryDocument {
    /// Load a document; `.toml` files are read as TOML, anything else as JSON.
    pub fn from_path(path: &Path) -> MatchResult<Self> {
        let content = fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    pub fn from_json(content: &str) -> MatchResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml(content: &str) -> MatchResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The query descriptor part of the document.
    pub fn to_query(&self) -> MatchResult<Query> {
        if self.source.trim().is_empty() {
            return Err(MatchError::document("missing 'source'"));
        }

        let mut query = Query::table(self.source.as_str()).fields(&self.fields);

        for join in &self.joins {
            let on = build_predicate(&join.on)?;
            if on.is_empty() {
                return Err(MatchError::document(format!(
                    "join on '{}' has no 'on' condition",
                    join.table
                )));
            }
            query = query.join(join.kind, join.table.as_str(), on);
        }

        if let Some(group) = &self.group {
            query = if group.having.is_empty() {
                query.group_by(Expr::parse_field(&group.by))
            } else {
                query.group_by_having(Expr::parse_field(&group.by), build_predicate(&group.having)?)
            };
        }

        Ok(query)
    }

    /// The filter, sort and pagination part of the document.
    pub fn criteria(&self) -> MatchResult<Criteria> {
        let mut criteria = Criteria::filter(build_predicate(&self.filter)?).sort(&self.sort);
        criteria.limit = self.limit;
        criteria.offset = self.offset;
        Ok(criteria)
    }
}

fn build_predicate(nodes: &[FilterNode]) -> MatchResult<Predicate> {
    nodes.iter().try_fold(Predicate::new(), |pred, node| {
        Ok(match node {
            FilterNode::And { and } => pred.and(build_predicate(and)?),
            FilterNode::Or { or } => pred.or(build_predicate(or)?),
            FilterNode::Group { group } => pred.group(build_predicate(group)?),
            FilterNode::Compare(spec) => push_comparison(pred, spec)?,
        })
    })
}

fn push_comparison(pred: Predicate, spec: &CompareSpec) -> MatchResult<Predicate> {
    let field = Expr::parse_field(&spec.field);
    let op = spec.op;

    if op.is_combinator() {
        return Err(MatchError::document(format!(
            "'{}' is a combinator, not a comparison operator",
            op
        )));
    }

    match (&spec.value, &spec.column) {
        (Some(_), Some(_)) => Err(MatchError::document(format!(
            "comparison on '{}' has both 'value' and 'column'",
            spec.field
        ))),
        _ if matches!(op, Operator::Null) => Ok(pred.null(field)),
        _ if matches!(op, Operator::NotNull) => Ok(pred.not_null(field)),
        (None, Some(_)) if op.is_set() => Err(MatchError::document(format!(
            "'{}' on '{}' needs a value list, not a column",
            op, spec.field
        ))),
        (None, Some(column)) => Ok(pred.column(field, op, Expr::parse_field(column))),
        (None, None) => Err(MatchError::document(format!(
            "'{}' on '{}' needs a value",
            op, spec.field
        ))),
        (Some(value), None) => {
            let value = value.clone();
            let pred = match op {
                Operator::Eq => pred.eq(field, value),
                Operator::Neq => pred.neq(field, value),
                Operator::Lt => pred.lt(field, value),
                Operator::Lte => pred.lte(field, value),
                Operator::Gt => pred.gt(field, value),
                Operator::Gte => pred.gte(field, value),
                Operator::Like => pred.like(field, value),
                Operator::In => pred.is_in(field, value),
                Operator::NotIn => pred.not_in(field, value),
                other => {
                    return Err(MatchError::document(format!("unsupported operator '{}'", other)));
                }
            };
            Ok(pred)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Dialect;
    use pretty_assertions::assert_eq;

    const JSON: &str = r#"{
        "source": "books",
        "joins": [{ "kind": "left", "table": "users",
                    "on": [{ "field": "author_id", "op": "eq", "column": "users.id" }] }],
        "filter": [
            { "field": "author_id", "op": "in", "value": ["1", "2", "3"] },
            { "or": [{ "field": "name", "op": "like", "value": "%rust%" }] },
            { "field": "deleted_at", "op": "null" }
        ],
        "sort": ["id DESC"],
        "limit": 10,
        "offset": 20
    }"#;

    #[test]
    fn test_json_document() {
        let doc = QueryDocument::from_json(JSON).unwrap();
        let stmt = doc.to_query().unwrap().build(Dialect::MySql, &doc.criteria().unwrap()).unwrap();
        assert_eq!(
            stmt.to_sql(),
            "SELECT * FROM `books` LEFT JOIN `users` ON `books`.`author_id` = `users`.`id` \
             WHERE `books`.`author_id` IN (?,?,?) OR `books`.`name` LIKE ? AND `books`.`deleted_at` IS NULL \
             ORDER BY `books`.`id` DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(
            stmt.params(),
            vec![Value::from("1"), Value::from("2"), Value::from("3"), Value::from("%rust%")]
        );
    }

    #[test]
    fn test_toml_document() {
        let doc = QueryDocument::from_toml(
            r#"
            source = "books"
            fields = ["author_id", "count(id) AS books"]

            [group]
            by = "author_id"
            having = [{ field = "count(id)", op = "gte", value = 2 }]

            [[filter]]
            field = "score"
            op = "gt"
            value = 5
            "#,
        )
        .unwrap();
        let stmt = doc.to_query().unwrap().build(Dialect::Sqlite, &doc.criteria().unwrap()).unwrap();
        assert_eq!(
            stmt.to_sql(),
            "SELECT books.author_id,count(id) AS books FROM books WHERE books.score > ? \
             GROUP BY books.author_id HAVING count(id) >= ?"
        );
        assert_eq!(stmt.params(), vec![Value::Int(5), Value::Int(2)]);
    }

    #[test]
    fn test_missing_value() {
        let doc = QueryDocument::from_json(r#"{"source":"books","filter":[{"field":"id","op":"eq"}]}"#).unwrap();
        assert!(matches!(doc.criteria(), Err(MatchError::Document(_))));
    }

    #[test]
    fn test_value_and_column() {
        let doc = QueryDocument::from_json(
            r#"{"source":"books","filter":[{"field":"id","op":"eq","value":1,"column":"users.id"}]}"#,
        )
        .unwrap();
        assert!(matches!(doc.criteria(), Err(MatchError::Document(_))));
    }

    #[test]
    fn test_set_operator_with_column() {
        let doc = QueryDocument::from_json(
            r#"{"source":"books","filter":[{"field":"id","op":"in","column":"users.id"}]}"#,
        )
        .unwrap();
        assert!(matches!(doc.criteria(), Err(MatchError::Document(_))));
    }

    #[test]
    fn test_combinator_as_operator() {
        let doc =
            QueryDocument::from_json(r#"{"source":"books","filter":[{"field":"id","op":"and","value":1}]}"#)
                .unwrap();
        assert!(matches!(doc.criteria(), Err(MatchError::Document(_))));
    }

    #[test]
    fn test_missing_source_and_empty_join() {
        let doc = QueryDocument::default();
        assert!(matches!(doc.to_query(), Err(MatchError::Document(_))));

        let doc = QueryDocument::from_json(r#"{"source":"books","joins":[{"table":"users","on":[]}]}"#).unwrap();
        assert!(matches!(doc.to_query(), Err(MatchError::Document(_))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            QueryDocument::from_json(r#"{"source":"books","where":[]}"#),
            Err(MatchError::Json(_))
        ));
    }
}
