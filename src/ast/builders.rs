//! Ergonomic builder functions for expressions.
//!
//! ```
//! use matchql::ast::builders::*;
//!
//! let e = count_distinct(raw("author_id")).alias("authors");
//! assert_eq!(e.to_string(), "COUNT(DISTINCT author_id) AS authors");
//! ```

use crate::ast::expr::template_slots;
use crate::ast::{Expr, SortOrder};

/// Column reference. `"users.id"` carries its own table.
pub fn col(name: &str) -> Expr {
    Expr::parse_field(name)
}

/// Quoted identifier that is never table-qualified.
pub fn ident(name: impl Into<String>) -> Expr {
    Expr::Ident(name.into())
}

/// Raw SQL token, emitted verbatim.
pub fn raw(sql: impl Into<String>) -> Expr {
    Expr::Raw(sql.into())
}

/// Function application over a `{}` template.
///
/// # Panics
///
/// Panics when the number of `{}` slots differs from the number of
/// arguments.
pub fn func<I, E>(template: &str, args: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    let args: Vec<Expr> = args.into_iter().map(Into::into).collect();
    let slots = template_slots(template);
    assert!(
        slots == args.len(),
        "function template '{}' has {} slot(s) but {} argument(s) were given",
        template,
        slots,
        args.len()
    );
    Expr::Function {
        template: template.to_string(),
        args,
    }
}

/// COUNT(expr)
pub fn count(expr: impl Into<Expr>) -> Expr {
    func("COUNT({})", [expr.into()])
}

/// COUNT(*)
pub fn count_all() -> Expr {
    raw("COUNT(*)")
}

/// COUNT(DISTINCT expr)
pub fn count_distinct(expr: impl Into<Expr>) -> Expr {
    func("COUNT(DISTINCT {})", [expr.into()])
}

/// DISTINCT expr
pub fn distinct(expr: impl Into<Expr>) -> Expr {
    func("DISTINCT {}", [expr.into()])
}

/// MIN(expr)
pub fn min(expr: impl Into<Expr>) -> Expr {
    func("MIN({})", [expr.into()])
}

/// MAX(expr)
pub fn max(expr: impl Into<Expr>) -> Expr {
    func("MAX({})", [expr.into()])
}

/// SUM(expr)
pub fn sum(expr: impl Into<Expr>) -> Expr {
    func("SUM({})", [expr.into()])
}

/// AVG(expr)
pub fn avg(expr: impl Into<Expr>) -> Expr {
    func("AVG({})", [expr.into()])
}

/// Extension methods for anything convertible into an [`Expr`].
pub trait ExprExt: Into<Expr> + Sized {
    /// expr AS name
    fn alias(self, name: &str) -> Expr {
        Expr::Alias {
            inner: Box::new(self.into()),
            name: name.to_string(),
        }
    }

    /// expr ASC
    fn asc(self) -> Expr {
        Expr::Sorted {
            inner: Box::new(self.into()),
            order: SortOrder::Asc,
        }
    }

    /// expr DESC
    fn desc(self) -> Expr {
        Expr::Sorted {
            inner: Box::new(self.into()),
            order: SortOrder::Desc,
        }
    }
}

impl ExprExt for Expr {}
impl ExprExt for &str {}
impl ExprExt for String {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_functions() {
        let e = count(distinct(raw("author_id"))).alias("author_id");
        assert_eq!(e.to_string(), "COUNT(DISTINCT author_id) AS author_id");
    }

    #[test]
    fn test_sort_annotations() {
        assert_eq!("name".desc().to_string(), "name DESC");
        assert_eq!(col("books.id").asc().to_string(), "books.id ASC");
    }

    #[test]
    #[should_panic(expected = "has 2 slot(s) but 1 argument(s)")]
    fn test_template_mismatch_panics() {
        func("COALESCE({}, {})", [col("a")]);
    }
}
