//! # matchql
//!
//! > **Describe the rows, get the SQL.**
//!
//! matchql compiles predicate trees and query descriptors into
//! parameterized SQL with `?` placeholders, plus a stable fingerprint of the
//! caller's criteria for use as a cache key.
//!
//! ## Quick Example
//!
//! ```rust
//! use matchql::prelude::*;
//!
//! let criteria = Criteria::filter(
//!     Predicate::new()
//!         .eq("author_id", "1")
//!         .gte("score", 10),
//! );
//!
//! let stmt = Query::table("books").build(Dialect::MySql, &criteria).unwrap();
//! assert_eq!(
//!     stmt.to_sql(),
//!     "SELECT * FROM `books` WHERE `books`.`author_id` = ? AND `books`.`score` >= ?"
//! );
//! assert_eq!(stmt.params().len(), 2);
//! assert_eq!(criteria.fingerprint().len(), 32);
//! ```
//!
//! ## Operators
//!
//! | Builder          | SQL                  |
//! |------------------|----------------------|
//! | `eq` / `neq`     | `=` / `!=`           |
//! | `lt` / `lte`     | `<` / `<=`           |
//! | `gt` / `gte`     | `>` / `>=`           |
//! | `is_in`          | `IN (?,?,...)`       |
//! | `not_in`         | `NOT IN (?,?,...)`   |
//! | `null`           | `IS NULL`            |
//! | `not_null`       | `IS NOT NULL`        |
//! | `like`           | `LIKE ?`             |
//! | `and` / `or`     | `AND` / `OR` subtree |
//! | `group`          | `( subtree )`        |

pub mod ast;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod schema;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::*;
    pub use crate::config::Config;
    pub use crate::document::QueryDocument;
    pub use crate::engine::{Repository, Row};
    pub use crate::error::*;
    pub use crate::record;
    pub use crate::schema::{Dialect, Schema};
    pub use crate::transpiler::{compile, delete, fingerprint, infer_columns, update_fields, Render, Statement};
}
