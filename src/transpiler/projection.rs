//! Projection inference from registered record metadata.

use crate::ast::RecordMeta;
use crate::error::MatchResult;
use crate::schema::{to_snake_case, Schema};

/// Derive the column list for a destination record.
///
/// Every attribute becomes `<source expression> AS <snake_case name>`, in
/// declaration order. The source expression is the attribute's annotation
/// when it already looks like an expression, the annotation qualified with
/// the source table when it is a bare identifier, and otherwise the
/// attribute's own snake_case name qualified with the source table.
pub fn infer_columns(schema: &Schema, record: &RecordMeta) -> MatchResult<Vec<String>> {
    record
        .fields
        .iter()
        .map(|field| {
            let alias = to_snake_case(field.name);
            let source = match field.source {
                Some(annotation) if is_compound(annotation) => annotation.to_string(),
                Some(annotation) => schema.qualify(annotation)?,
                None => schema.qualify(&alias)?,
            };
            Ok(format!("{} AS {}", source, alias))
        })
        .collect()
}

/// Qualified names, function calls and anything with whitespace are taken
/// verbatim.
fn is_compound(annotation: &str) -> bool {
    annotation.contains('.') || annotation.contains('(') || annotation.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Record;
    use crate::schema::Dialect;

    #[allow(non_snake_case, dead_code)]
    struct Book {
        ID: String,
        Name: String,
    }
    crate::record! { Book { ID, Name } }

    struct BookWithUser;
    crate::record! {
        BookWithUser {
            ID: "id",
            Name: "name",
            AuthorID: "users.id",
            AuthorName: "users.name",
        }
    }

    struct GroupTest;
    crate::record! { GroupTest { AuthorID: "author_id", Books: "count(id)" } }

    #[test]
    fn test_plain_record() {
        let schema = Schema::new(Dialect::MySql, "books");
        let cols = infer_columns(&schema, Book::meta()).unwrap();
        assert_eq!(cols.join(","), "`books`.`id` AS id,`books`.`name` AS name");
    }

    #[test]
    fn test_annotations() {
        let schema = Schema::new(Dialect::MySql, "books");
        let cols = infer_columns(&schema, BookWithUser::meta()).unwrap();
        assert_eq!(
            cols.join(","),
            "`books`.`id` AS id,`books`.`name` AS name,users.id AS author_id,users.name AS author_name"
        );

        let cols = infer_columns(&schema, GroupTest::meta()).unwrap();
        assert_eq!(cols.join(","), "`books`.`author_id` AS author_id,count(id) AS books");
    }

    #[test]
    fn test_one_column_per_attribute() {
        let schema = Schema::new(Dialect::Sqlite, "books");
        let cols = infer_columns(&schema, BookWithUser::meta()).unwrap();
        assert_eq!(cols.len(), BookWithUser::meta().fields.len());
        assert!(cols.iter().all(|c| c.contains(" AS ")));
    }
}
