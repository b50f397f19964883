//! Record metadata registration.
//!
//! A destination (or source) record describes its attributes once, in
//! declaration order, with an optional source expression per attribute.
//! The [`record!`](crate::record) macro generates the [`Record`] impl:
//!
//! ```
//! pub struct BookWithUser;
//!
//! matchql::record! {
//!     BookWithUser {
//!         ID,
//!         Name,
//!         AuthorID: "users.id",
//!         AuthorName: "users.name",
//!     }
//! }
//!
//! use matchql::ast::Record;
//! assert_eq!(BookWithUser::meta().fields.len(), 4);
//! ```

/// A single declared attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// Attribute name as declared (`AuthorID`, `author_id`).
    pub name: &'static str,
    /// Source-expression annotation (`users.id`, `count(id)`, `author_id`).
    pub source: Option<&'static str>,
}

impl FieldMeta {
    pub const fn new(name: &'static str) -> Self {
        Self { name, source: None }
    }

    pub const fn sourced(name: &'static str, source: &'static str) -> Self {
        Self {
            name,
            source: Some(source),
        }
    }
}

/// Registered shape of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordMeta {
    /// Type name, used by the table naming strategy.
    pub name: &'static str,
    /// Explicit table name, overriding the naming strategy.
    pub table: Option<&'static str>,
    /// Attributes in declaration order.
    pub fields: &'static [FieldMeta],
}

impl RecordMeta {
    pub const fn new(name: &'static str, fields: &'static [FieldMeta]) -> Self {
        Self {
            name,
            table: None,
            fields,
        }
    }

    pub const fn with_table(mut self, table: &'static str) -> Self {
        self.table = Some(table);
        self
    }
}

/// A type with registered record metadata.
pub trait Record {
    fn meta() -> &'static RecordMeta;
}

/// Implement [`Record`] for a type.
///
/// ```text
/// record! { Book { id, name, author_id } }
/// record! { Book in "books_archive" { id, name } }
/// record! { GroupTest { AuthorID: "author_id", Books: "count(id)" } }
/// ```
#[macro_export]
macro_rules! record {
    (@opt) => { ::core::option::Option::None };
    (@opt $v:literal) => { ::core::option::Option::Some($v) };
    (
        $ty:ident $(in $table:literal)? {
            $( $field:ident $(: $source:literal)? ),* $(,)?
        }
    ) => {
        impl $crate::ast::Record for $ty {
            fn meta() -> &'static $crate::ast::RecordMeta {
                static META: $crate::ast::RecordMeta = $crate::ast::RecordMeta {
                    name: stringify!($ty),
                    table: $crate::record!(@opt $($table)?),
                    fields: &[
                        $(
                            $crate::ast::FieldMeta {
                                name: stringify!($field),
                                source: $crate::record!(@opt $($source)?),
                            },
                        )*
                    ],
                };
                &META
            }
        }
    };
}
