use crate::ast::{Expr, JoinKind, Predicate, Record, RecordMeta, Value};

/// A logical table reference.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    /// A table name used as-is.
    Name(String),
    /// A registered record; the table name comes from its metadata.
    Record(&'static RecordMeta),
}

impl TableRef {
    /// Table reference for a registered record type.
    pub fn of<R: Record>() -> Self {
        TableRef::Record(R::meta())
    }
}

impl From<&str> for TableRef {
    fn from(name: &str) -> Self {
        TableRef::Name(name.to_string())
    }
}

impl From<String> for TableRef {
    fn from(name: String) -> Self {
        TableRef::Name(name)
    }
}

impl From<&'static RecordMeta> for TableRef {
    fn from(meta: &'static RecordMeta) -> Self {
        TableRef::Record(meta)
    }
}

/// The destination shape of a query.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Shape {
    /// SELECT *
    #[default]
    All,
    /// Columns inferred from record metadata.
    Record(&'static RecordMeta),
    /// A literal target such as COUNT(*).
    Scalar(Expr),
}

/// A join definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub target: TableRef,
    pub kind: JoinKind,
    /// Compiled against the outer query's table.
    pub on: Predicate,
}

/// GROUP BY with an optional HAVING tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub by: Expr,
    pub having: Option<Predicate>,
}

/// A query descriptor: what to select, from where, joined and grouped how.
///
/// Built fresh for each logical query and only read by the compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub source: TableRef,
    pub result: Shape,
    /// Explicit projection; when empty the result shape decides.
    pub fields: Vec<Expr>,
    pub joins: Vec<Join>,
    pub group: Option<Group>,
}

impl Query {
    /// Query over a source table, selecting `*`.
    pub fn table(source: impl Into<TableRef>) -> Self {
        Self {
            source: source.into(),
            result: Shape::All,
            fields: vec![],
            joins: vec![],
            group: None,
        }
    }

    /// Query a record type from its own table.
    pub fn of<R: Record>() -> Self {
        Self::table(TableRef::of::<R>()).into_record::<R>()
    }

    /// Infer the projection from a destination record.
    pub fn into_record<R: Record>(mut self) -> Self {
        self.result = Shape::Record(R::meta());
        self
    }

    /// Select a literal target (e.g. `COUNT(*)`) instead of inferring.
    pub fn scalar(mut self, target: impl Into<Expr>) -> Self {
        self.result = Shape::Scalar(target.into());
        self
    }

    /// Append explicit projection expressions.
    pub fn fields<I, E>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Append one explicit projection expression.
    pub fn field(mut self, field: impl Into<Expr>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// LEFT JOIN target ON ...
    pub fn left_join(self, target: impl Into<TableRef>, on: Predicate) -> Self {
        self.join(JoinKind::Left, target, on)
    }

    /// RIGHT JOIN target ON ...
    pub fn right_join(self, target: impl Into<TableRef>, on: Predicate) -> Self {
        self.join(JoinKind::Right, target, on)
    }

    /// INNER JOIN target ON ...
    pub fn inner_join(self, target: impl Into<TableRef>, on: Predicate) -> Self {
        self.join(JoinKind::Inner, target, on)
    }

    /// Add a join.
    ///
    /// # Panics
    ///
    /// Panics when `on` is empty.
    pub fn join(mut self, kind: JoinKind, target: impl Into<TableRef>, on: Predicate) -> Self {
        let target = target.into();
        assert!(!on.is_empty(), "{} {:?} requires an ON condition", kind, target);
        self.joins.push(Join { target, kind, on });
        self
    }

    /// GROUP BY expr
    pub fn group_by(mut self, by: impl Into<Expr>) -> Self {
        self.group = Some(Group {
            by: by.into(),
            having: None,
        });
        self
    }

    /// GROUP BY expr HAVING ...
    pub fn group_by_having(mut self, by: impl Into<Expr>, having: Predicate) -> Self {
        self.group = Some(Group {
            by: by.into(),
            having: Some(having),
        });
        self
    }
}

/// Ordered column assignments for bulk updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignments {
    pub columns: Vec<(String, Value)>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// column = value
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.push((column.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Assignments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Book;
    crate::record! { Book { id, name } }

    #[test]
    fn test_of_uses_record_for_both_ends() {
        let q = Query::of::<Book>();
        assert_eq!(q.source, TableRef::Record(Book::meta()));
        assert_eq!(q.result, Shape::Record(Book::meta()));
    }

    #[test]
    #[should_panic(expected = "requires an ON condition")]
    fn test_join_without_on_panics() {
        Query::table("books").left_join("users", Predicate::new());
    }
}
