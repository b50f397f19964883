//! Database execution engine for matchql.
//!
//! Runs compiled statements against MySQL or SQLite through the sqlx `Any`
//! driver. Parameters are bound positionally in placeholder order.

use std::collections::HashMap;

use sqlx::any::{Any, AnyArguments, AnyRow};
use sqlx_core::any::AnyTypeInfoKind;
use sqlx::query::Query as SqlxQuery;
use sqlx::{AnyPool, Column, Row as _};

use crate::ast::{Assignments, Criteria, Predicate, Query, TableRef, Value};
use crate::error::{MatchError, MatchResult};
use crate::schema::{Dialect, Schema};
use crate::transpiler::{delete, update_fields, Statement};

/// A fetched row keyed by column name.
pub type Row = HashMap<String, serde_json::Value>;

/// Text form used to bind timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Executes queries and mutations for one source table.
///
/// Mutations always target `source`. Fetches compile the [`Query`] they are
/// given, which may select from another table or a join; start from
/// [`Repository::query`] to read from `source` itself.
#[derive(Clone)]
pub struct Repository {
    pool: AnyPool,
    dialect: Dialect,
    source: TableRef,
}

impl Repository {
    pub fn new(pool: AnyPool, dialect: Dialect, source: impl Into<TableRef>) -> Self {
        Self {
            pool,
            dialect,
            source: source.into(),
        }
    }

    /// Open a pool for a `mysql://` or `sqlite:` URL with the driver's
    /// default pool settings.
    pub async fn connect(url: &str, dialect: Dialect, source: impl Into<TableRef>) -> MatchResult<Self> {
        sqlx::any::install_default_drivers();

        let pool = AnyPool::connect(url).await.map_err(execution)?;

        Ok(Self::new(pool, dialect, source))
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Schema over this repository's source table.
    pub fn schema(&self) -> Schema {
        Schema::new(self.dialect, self.source.clone())
    }

    /// A `SELECT *` descriptor over this repository's source table.
    pub fn query(&self) -> Query {
        Query::table(self.source.clone())
    }

    /// Fetch every row matching the criteria.
    pub async fn find(&self, query: &Query, criteria: &Criteria) -> MatchResult<Vec<Row>> {
        let statement = query.build(self.dialect, criteria)?;
        let rows = self.fetch_all(&statement).await?;
        rows.iter().map(row_to_map).collect()
    }

    /// Fetch the first matching row.
    pub async fn first(&self, query: &Query, criteria: &Criteria) -> MatchResult<Row> {
        let criteria = criteria.clone().limit(1);
        let statement = query.build(self.dialect, &criteria)?;
        let sql = statement.to_sql();
        tracing::debug!(sql = %sql, "fetch first");

        let row = bind_params(sqlx::query(&sql), statement.params())
            .fetch_optional(&self.pool)
            .await
            .map_err(execution)?;

        match row {
            Some(row) => row_to_map(&row),
            None => Err(MatchError::RecordNotFound),
        }
    }

    /// Count the rows matching the criteria's predicate.
    pub async fn count(&self, query: &Query, criteria: &Criteria) -> MatchResult<i64> {
        let statement = query.count(self.dialect, criteria)?;
        let sql = statement.to_sql();
        tracing::debug!(sql = %sql, "count");

        let row = bind_params(sqlx::query(&sql), statement.params())
            .fetch_one(&self.pool)
            .await
            .map_err(execution)?;

        row.try_get::<i64, _>(0).map_err(execution)
    }

    /// Set columns on every row matching the predicate.
    /// Returns the number of affected rows.
    pub async fn update_fields(&self, fields: &Assignments, predicate: &Predicate) -> MatchResult<u64> {
        let fragment = update_fields(&self.schema(), fields, predicate)?;
        self.execute(&fragment.sql, fragment.params).await
    }

    /// Delete every row matching the predicate.
    /// Returns the number of affected rows.
    pub async fn delete(&self, predicate: &Predicate) -> MatchResult<u64> {
        let fragment = delete(&self.schema(), predicate)?;
        self.execute(&fragment.sql, fragment.params).await
    }

    async fn fetch_all(&self, statement: &Statement) -> MatchResult<Vec<AnyRow>> {
        let sql = statement.to_sql();
        tracing::debug!(sql = %sql, "fetch all");

        bind_params(sqlx::query(&sql), statement.params())
            .fetch_all(&self.pool)
            .await
            .map_err(execution)
    }

    async fn execute(&self, sql: &str, params: Vec<Value>) -> MatchResult<u64> {
        tracing::debug!(sql = %sql, "execute");

        let result = bind_params(sqlx::query(sql), params)
            .execute(&self.pool)
            .await
            .map_err(execution)?;

        Ok(result.rows_affected())
    }
}

fn execution(err: sqlx::Error) -> MatchError {
    MatchError::Execution(err.to_string())
}

fn bind_params<'q>(
    mut query: SqlxQuery<'q, Any, AnyArguments<'q>>,
    params: Vec<Value>,
) -> SqlxQuery<'q, Any, AnyArguments<'q>> {
    for param in params {
        query = match param {
            Value::Null => query.bind(Option::<String>::None),
            Value::Bool(v) => query.bind(v),
            Value::Int(v) => query.bind(v),
            Value::Float(v) => query.bind(v),
            Value::String(v) => query.bind(v),
            Value::Timestamp(ts) => query.bind(ts.format(TIMESTAMP_FORMAT).to_string()),
            list @ Value::List(_) => query.bind(list.to_string()),
        };
    }
    query
}

/// Decode every column into the crate's [`Value`] model, keyed by name.
fn row_to_map(row: &AnyRow) -> MatchResult<Row> {
    row.columns()
        .iter()
        .map(|column| {
            let value = decode_column(row, column.ordinal(), column.type_info().kind())?;
            Ok((column.name().to_string(), serde_json::to_value(value)?))
        })
        .collect()
}

fn decode_column(row: &AnyRow, index: usize, kind: AnyTypeInfoKind) -> MatchResult<Value> {
    let value = match kind {
        AnyTypeInfoKind::Null => None,
        AnyTypeInfoKind::Bool => row.try_get::<Option<bool>, _>(index).map_err(execution)?.map(Value::Bool),
        AnyTypeInfoKind::SmallInt | AnyTypeInfoKind::Integer | AnyTypeInfoKind::BigInt => row
            .try_get::<Option<i64>, _>(index)
            .map_err(execution)?
            .map(Value::Int),
        AnyTypeInfoKind::Real | AnyTypeInfoKind::Double => row
            .try_get::<Option<f64>, _>(index)
            .map_err(execution)?
            .map(Value::Float),
        AnyTypeInfoKind::Text => row
            .try_get::<Option<String>, _>(index)
            .map_err(execution)?
            .map(Value::String),
        AnyTypeInfoKind::Blob => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .map_err(execution)?
            .map(|bytes| Value::String(String::from_utf8_lossy(&bytes).into_owned())),
    };
    Ok(value.unwrap_or(Value::Null))
}
