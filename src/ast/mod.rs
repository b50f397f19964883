pub mod builders;
pub mod expr;
pub mod operators;
pub mod predicate;
pub mod query;
pub mod record;
pub mod values;

pub use self::expr::Expr;
pub use self::operators::{JoinKind, Operator, SortOrder};
pub use self::predicate::{Comparison, Criteria, Fragment, Node, Operand, Predicate};
pub use self::query::{Assignments, Group, Join, Query, Shape, TableRef};
pub use self::record::{FieldMeta, Record, RecordMeta};
pub use self::values::Value;
