use crate::ast::{Expr, Operator, Value};

/// A compiled SQL fragment with its positional parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Fragment {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand (IS NULL / IS NOT NULL)
    None,
    /// A single bound value
    Literal(Value),
    /// One bound value per element (IN / NOT IN)
    List(Vec<Value>),
    /// Another column; compiles without a placeholder
    Column(Expr),
    /// A pre-built placeholder group or subquery with its own parameters
    Fragment(Fragment),
}

/// A single comparison clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub field: Expr,
    pub op: Operator,
    pub operand: Operand,
}

/// A predicate tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Compare(Comparison),
    And(Predicate),
    Or(Predicate),
    Group(Predicate),
}

impl Node {
    /// The operator this node carries.
    pub fn operator(&self) -> Operator {
        match self {
            Node::Compare(c) => c.op,
            Node::And(_) => Operator::And,
            Node::Or(_) => Operator::Or,
            Node::Group(_) => Operator::Group,
        }
    }
}

/// An ordered set of comparison clauses and logical combinators.
///
/// Sibling nodes are AND-joined in insertion order. Builder methods consume
/// and return the tree, so a finished value is never mutated again:
///
/// ```
/// use matchql::ast::Predicate;
///
/// let p = Predicate::new()
///     .eq("author_id", "1")
///     .group(Predicate::new().like("name", "%a%").or(Predicate::new().like("name", "%b%")));
/// assert_eq!(p.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    pub nodes: Vec<Node>,
}

impl Predicate {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Append a node.
    pub fn push(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Append every node of another tree, keeping their order.
    pub fn extend(mut self, other: Predicate) -> Self {
        self.nodes.extend(other.nodes);
        self
    }

    fn compare(self, field: impl Into<Expr>, op: Operator, operand: Operand) -> Self {
        self.push(Node::Compare(Comparison {
            field: field.into(),
            op,
            operand,
        }))
    }

    /// field = ?
    pub fn eq(self, field: impl Into<Expr>, value: impl Into<Value>) -> Self {
        self.compare(field, Operator::Eq, Operand::Literal(value.into()))
    }

    /// field != ?
    pub fn neq(self, field: impl Into<Expr>, value: impl Into<Value>) -> Self {
        self.compare(field, Operator::Neq, Operand::Literal(value.into()))
    }

    /// field < ?
    pub fn lt(self, field: impl Into<Expr>, value: impl Into<Value>) -> Self {
        self.compare(field, Operator::Lt, Operand::Literal(value.into()))
    }

    /// field <= ?
    pub fn lte(self, field: impl Into<Expr>, value: impl Into<Value>) -> Self {
        self.compare(field, Operator::Lte, Operand::Literal(value.into()))
    }

    /// field > ?
    pub fn gt(self, field: impl Into<Expr>, value: impl Into<Value>) -> Self {
        self.compare(field, Operator::Gt, Operand::Literal(value.into()))
    }

    /// field >= ?
    pub fn gte(self, field: impl Into<Expr>, value: impl Into<Value>) -> Self {
        self.compare(field, Operator::Gte, Operand::Literal(value.into()))
    }

    /// field LIKE ?
    pub fn like(self, field: impl Into<Expr>, pattern: impl Into<Value>) -> Self {
        self.compare(field, Operator::Like, Operand::Literal(pattern.into()))
    }

    /// field IN (?,?,...). A scalar value is treated as a one-element list.
    pub fn is_in(self, field: impl Into<Expr>, values: impl Into<Value>) -> Self {
        self.compare(field, Operator::In, Operand::List(values.into().into_items()))
    }

    /// field NOT IN (?,?,...)
    pub fn not_in(self, field: impl Into<Expr>, values: impl Into<Value>) -> Self {
        self.compare(field, Operator::NotIn, Operand::List(values.into().into_items()))
    }

    /// field IN (<fragment>)
    pub fn in_fragment(self, field: impl Into<Expr>, fragment: Fragment) -> Self {
        self.compare(field, Operator::In, Operand::Fragment(fragment))
    }

    /// field NOT IN (<fragment>)
    pub fn not_in_fragment(self, field: impl Into<Expr>, fragment: Fragment) -> Self {
        self.compare(field, Operator::NotIn, Operand::Fragment(fragment))
    }

    /// field IS NULL
    pub fn null(self, field: impl Into<Expr>) -> Self {
        self.compare(field, Operator::Null, Operand::None)
    }

    /// field IS NOT NULL
    pub fn not_null(self, field: impl Into<Expr>) -> Self {
        self.compare(field, Operator::NotNull, Operand::None)
    }

    /// Column-to-column comparison (`field <op> other`), no placeholder.
    ///
    /// # Panics
    ///
    /// Panics for operators that cannot compare two columns
    /// (IN, NOT IN, NULL, NOT NULL and the combinators).
    pub fn column(self, field: impl Into<Expr>, op: Operator, other: impl Into<Expr>) -> Self {
        assert!(
            !op.is_combinator() && !op.is_set() && !matches!(op, Operator::Null | Operator::NotNull),
            "operator {:?} cannot compare two columns",
            op
        );
        self.compare(field, op, Operand::Column(other.into()))
    }

    /// field = other (column-to-column)
    pub fn eq_column(self, field: impl Into<Expr>, other: impl Into<Expr>) -> Self {
        self.column(field, Operator::Eq, other)
    }

    /// AND <sub-tree>
    pub fn and(self, sub: Predicate) -> Self {
        self.push(Node::And(sub))
    }

    /// OR <sub-tree>
    pub fn or(self, sub: Predicate) -> Self {
        self.push(Node::Or(sub))
    }

    /// (<sub-tree>)
    pub fn group(self, sub: Predicate) -> Self {
        self.push(Node::Group(sub))
    }
}

/// A filter plus sort and pagination: everything a fetch needs besides the
/// query descriptor itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub predicate: Predicate,
    pub sort: Vec<Expr>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a filter predicate.
    pub fn filter(predicate: Predicate) -> Self {
        Self {
            predicate,
            ..Self::default()
        }
    }

    /// Replace the sort keys, parsing `"name DESC"`-style strings.
    pub fn sort<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sort = keys.into_iter().map(|k| Expr::parse_sort(k.as_ref())).collect();
        self
    }

    /// Append a sort expression.
    pub fn order_by(mut self, expr: impl Into<Expr>) -> Self {
        self.sort.push(expr.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

impl From<Predicate> for Criteria {
    fn from(predicate: Predicate) -> Self {
        Criteria::filter(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let p = Predicate::new().eq("a", 1).null("b").gte("c", 2);
        let ops: Vec<Operator> = p.nodes.iter().map(|n| n.operator()).collect();
        assert_eq!(ops, vec![Operator::Eq, Operator::Null, Operator::Gte]);
    }

    #[test]
    fn test_in_scalar_becomes_single_item_list() {
        let p = Predicate::new().is_in("id", 7);
        match &p.nodes[0] {
            Node::Compare(c) => assert_eq!(c.operand, Operand::List(vec![Value::Int(7)])),
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    #[should_panic(expected = "cannot compare two columns")]
    fn test_column_in_panics() {
        Predicate::new().column("a", Operator::In, "b");
    }

    #[test]
    fn test_criteria_sort_parsing() {
        let c = Criteria::new().sort(["id DESC", "name"]).limit(20);
        assert_eq!(c.sort.len(), 2);
        assert_eq!(c.sort[0].to_string(), "id DESC");
        assert_eq!(c.limit, Some(20));
        assert_eq!(c.offset, None);
    }
}
