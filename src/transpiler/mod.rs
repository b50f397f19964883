//! SQL compiler for matchql descriptors.
//!
//! Turns predicate trees, query descriptors and criteria into
//! parameterized SQL with `?` placeholders.

pub mod expr;
pub mod fingerprint;
pub mod mutation;
pub mod predicate;
pub mod projection;
pub mod select;

use crate::error::MatchResult;
use crate::schema::Schema;

pub use fingerprint::fingerprint;
pub use mutation::{delete, update_fields};
pub use predicate::compile;
pub use projection::infer_columns;
pub use select::Statement;

/// Trait for rendering AST nodes against a schema.
pub trait Render {
    /// Render this node as SQL text. Rendering never produces parameters.
    fn render(&self, schema: &Schema) -> MatchResult<String>;
}
