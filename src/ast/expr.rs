use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{all_consuming, opt, recognize},
    sequence::{pair, preceded},
    IResult,
};

use crate::ast::SortOrder;

/// A renderable SQL value-producing construct.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column reference. Without an explicit table the column is
    /// qualified with the schema's table when one is known.
    Column { table: Option<String>, name: String },
    /// A quoted identifier that is never table-qualified.
    Ident(String),
    /// A literal SQL token emitted verbatim (never quoted).
    Raw(String),
    /// A function application. `template` holds one `{}` slot per argument.
    Function { template: String, args: Vec<Expr> },
    /// An aliased expression (expr AS name)
    Alias { inner: Box<Expr>, name: String },
    /// A sort-direction annotation (expr ASC|DESC)
    Sorted { inner: Box<Expr>, order: SortOrder },
}

impl Expr {
    /// Parse a field string.
    ///
    /// `name` and `table.name` (identifiers only) become column references;
    /// everything else (`count(id)`, `users.name AS author`) is kept as a raw
    /// token.
    pub fn parse_field(input: &str) -> Expr {
        let trimmed = input.trim();
        match column_ref(trimmed) {
            Ok((_, (name, None))) => Expr::Column {
                table: None,
                name: name.to_string(),
            },
            Ok((_, (table, Some(name)))) => Expr::Column {
                table: Some(table.to_string()),
                name: name.to_string(),
            },
            Err(_) => Expr::Raw(trimmed.to_string()),
        }
    }

    /// Parse a sort key such as `created_at DESC` or `books.name`.
    pub fn parse_sort(input: &str) -> Expr {
        let trimmed = input.trim();
        if let Some((head, dir)) = trimmed.rsplit_once(char::is_whitespace) {
            let order = if dir.eq_ignore_ascii_case("asc") {
                Some(SortOrder::Asc)
            } else if dir.eq_ignore_ascii_case("desc") {
                Some(SortOrder::Desc)
            } else {
                None
            };
            if let Some(order) = order {
                return Expr::Sorted {
                    inner: Box::new(Expr::parse_field(head)),
                    order,
                };
            }
        }
        Expr::parse_field(trimmed)
    }
}

/// Parse an identifier (table name, column name).
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

/// Parse `name` or `table.name` covering the whole input.
fn column_ref(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    all_consuming(pair(identifier, opt(preceded(char('.'), identifier))))(input)
}

/// Returns true when `input` is a bare identifier.
pub(crate) fn is_identifier(input: &str) -> bool {
    all_consuming(identifier)(input).is_ok()
}

/// Number of `{}` slots in a function template.
pub(crate) fn template_slots(template: &str) -> usize {
    template.matches("{}").count()
}

/// Substitute the `{}` slots of a template in order.
pub(crate) fn fill_template<I>(template: &str, args: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut out = String::with_capacity(template.len());
    let mut args = args.into_iter();
    let mut pieces = template.split("{}").peekable();
    while let Some(piece) = pieces.next() {
        out.push_str(piece);
        if pieces.peek().is_some() {
            out.push_str(&args.next().unwrap_or_default());
        }
    }
    out
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Column { table: Some(t), name } => write!(f, "{}.{}", t, name),
            Expr::Column { table: None, name } => write!(f, "{}", name),
            Expr::Ident(name) => write!(f, "{}", name),
            Expr::Raw(s) => write!(f, "{}", s),
            Expr::Function { template, args } => {
                write!(f, "{}", fill_template(template, args.iter().map(|a| a.to_string())))
            }
            Expr::Alias { inner, name } => write!(f, "{} AS {}", inner, name),
            Expr::Sorted { inner, order } => write!(f, "{} {}", inner, order),
        }
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::parse_field(s)
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::parse_field(&s)
    }
}

impl From<&String> for Expr {
    fn from(s: &String) -> Self {
        Expr::parse_field(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(
            Expr::parse_field("author_id"),
            Expr::Column { table: None, name: "author_id".to_string() }
        );
        assert_eq!(
            Expr::parse_field("users.id"),
            Expr::Column { table: Some("users".to_string()), name: "id".to_string() }
        );
        assert_eq!(Expr::parse_field("count(id)"), Expr::Raw("count(id)".to_string()));
        assert_eq!(Expr::parse_field("a.b.c"), Expr::Raw("a.b.c".to_string()));
        assert_eq!(Expr::parse_field("1st"), Expr::Raw("1st".to_string()));
    }

    #[test]
    fn test_parse_sort() {
        let e = Expr::parse_sort("created_at desc");
        assert_eq!(e.to_string(), "created_at DESC");
        assert!(matches!(e, Expr::Sorted { order: SortOrder::Desc, .. }));

        let e = Expr::parse_sort("books.name");
        assert!(matches!(e, Expr::Column { table: Some(_), .. }));
    }

    #[test]
    fn test_fill_template() {
        let s = fill_template("COALESCE({}, {})", vec!["a".to_string(), "b".to_string()]);
        assert_eq!(s, "COALESCE(a, b)");
        assert_eq!(template_slots("COUNT(DISTINCT {})"), 1);
    }
}
