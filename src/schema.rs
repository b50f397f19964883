//! Schema resolution and identifier quoting.
//!
//! A [`Schema`] binds a [`Dialect`] to an optional logical table reference.
//! The canonical table name is resolved on first use and cached for the
//! lifetime of the schema; concurrent first users all observe the same value.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::ast::expr::is_identifier;
use crate::ast::TableRef;
use crate::error::{MatchError, MatchResult};

/// Supported quoting dialects. Placeholders are `?` in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Backtick quoting.
    #[default]
    MySql,
    /// No quoting.
    Sqlite,
}

impl Dialect {
    /// The identifier quoting token.
    pub fn quote_token(&self) -> &'static str {
        match self {
            Dialect::MySql => "`",
            Dialect::Sqlite => "",
        }
    }

    /// Quote an identifier; every dot-separated part is quoted on its own
    /// and embedded quote tokens are doubled.
    pub fn quote(&self, ident: &str) -> String {
        let token = self.quote_token();
        if token.is_empty() {
            return ident.to_string();
        }
        let escaped = ident.replace(token, &format!("{token}{token}"));
        format!("{token}{}{token}", escaped.replace('.', &format!("{token}.{token}")))
    }
}

impl std::str::FromStr for Dialect {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            other => Err(MatchError::Config(format!("unknown dialect '{}'", other))),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::MySql => write!(f, "mysql"),
            Dialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// A dialect bound to an optional table, with the table name memoized.
#[derive(Debug, Clone)]
pub struct Schema {
    dialect: Dialect,
    table: Option<TableRef>,
    resolved: OnceCell<Option<String>>,
}

impl Schema {
    pub fn new(dialect: Dialect, table: impl Into<TableRef>) -> Self {
        Self {
            dialect,
            table: Some(table.into()),
            resolved: OnceCell::new(),
        }
    }

    /// A schema with no table: columns render unqualified.
    pub fn unbound(dialect: Dialect) -> Self {
        Self {
            dialect,
            table: None,
            resolved: OnceCell::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The canonical table name, or `None` for an unbound schema.
    ///
    /// Resolved at most once; a failed resolution is not cached.
    pub fn table_name(&self) -> MatchResult<Option<&str>> {
        let name = self.resolved.get_or_try_init(|| match &self.table {
            Some(table) => resolve_table(table).map(Some),
            None => Ok(None),
        })?;
        Ok(name.as_deref())
    }

    /// The canonical table name; unbound schemas are an error.
    pub fn require_table(&self) -> MatchResult<&str> {
        self.table_name()?
            .ok_or_else(|| MatchError::unresolved("schema is not bound to a table"))
    }

    pub fn quote(&self, ident: &str) -> String {
        self.dialect.quote(ident)
    }

    /// Quote a field, qualified with the table when one is known.
    pub fn qualify(&self, field: &str) -> MatchResult<String> {
        Ok(match self.table_name()? {
            Some(table) => self.quote(&format!("{}.{}", table, field)),
            None => self.quote(field),
        })
    }
}

/// Resolve a table reference to its canonical name.
pub fn resolve_table(table: &TableRef) -> MatchResult<String> {
    let name = match table {
        TableRef::Name(name) if name.trim().is_empty() => {
            return Err(MatchError::unresolved("empty table name"));
        }
        TableRef::Name(name) => name.clone(),
        TableRef::Record(meta) => match meta.table {
            Some(table) if !table.is_empty() => table.to_string(),
            _ if is_identifier(meta.name) => pluralize(&to_snake_case(meta.name)),
            _ => {
                return Err(MatchError::unresolved(format!(
                    "type name '{}' is not an identifier",
                    meta.name
                )));
            }
        },
    };
    tracing::trace!(table = %name, "resolved table name");
    Ok(name)
}

/// `AuthorID` → `author_id`, `HTTPServer` → `http_server`.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                    out.push('_');
                }
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Naive English plural used for record table names.
pub fn pluralize(word: &str) -> String {
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u');
    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{}ies", stem);
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| word.ends_with(suffix)) {
        return format!("{}es", word);
    }
    format!("{}s", word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FieldMeta, RecordMeta};

    static BOOK: RecordMeta = RecordMeta::new("Book", &[]);
    static WEIRD: RecordMeta = RecordMeta::new("Book<T>", &[]);

    #[test]
    fn test_quote() {
        assert_eq!(Dialect::MySql.quote("books.author_id"), "`books`.`author_id`");
        assert_eq!(Dialect::MySql.quote("we`ird"), "`we``ird`");
        assert_eq!(Dialect::Sqlite.quote("books.author_id"), "books.author_id");
    }

    #[test]
    fn test_naming_strategy() {
        assert_eq!(to_snake_case("AuthorID"), "author_id");
        assert_eq!(to_snake_case("ID"), "id");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("author_id"), "author_id");
        assert_eq!(pluralize("book"), "books");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("address"), "addresses");
        assert_eq!(pluralize("day"), "days");
    }

    #[test]
    fn test_qualify() {
        let schema = Schema::new(Dialect::MySql, &BOOK);
        assert_eq!(schema.table_name().unwrap(), Some("books"));
        assert_eq!(schema.qualify("author_id").unwrap(), "`books`.`author_id`");

        let unbound = Schema::unbound(Dialect::MySql);
        assert_eq!(unbound.qualify("author_id").unwrap(), "`author_id`");
        assert!(unbound.require_table().is_err());
    }

    #[test]
    fn test_resolution_errors() {
        let schema = Schema::new(Dialect::MySql, &WEIRD);
        assert!(matches!(schema.qualify("id"), Err(MatchError::UnresolvedTable(_))));
        let schema = Schema::new(Dialect::MySql, "");
        assert!(matches!(schema.table_name(), Err(MatchError::UnresolvedTable(_))));
    }

    #[test]
    fn test_explicit_table_wins() {
        static FIELDS: [FieldMeta; 1] = [FieldMeta::new("id")];
        static META: RecordMeta = RecordMeta::new("Book", &FIELDS).with_table("books_hello_world");
        let schema = Schema::new(Dialect::MySql, &META);
        assert_eq!(schema.table_name().unwrap(), Some("books_hello_world"));
    }

    #[test]
    fn test_concurrent_first_use_resolves_once() {
        let schema = Schema::new(Dialect::MySql, &BOOK);
        let addrs: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| schema.table_name().unwrap().unwrap().as_ptr() as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }
}
