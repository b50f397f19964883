use serde::{Deserialize, Serialize};

/// Predicate operators.
///
/// Comparison operators and the three logical combinators share one
/// enumeration so every node of a predicate tree carries a stable integer
/// code (see [`Operator::code`]) for fingerprinting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Equal (=)
    Eq,
    /// Not equal (!=)
    Neq,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// IN (...)
    In,
    /// NOT IN (...)
    NotIn,
    /// IS NULL
    Null,
    /// IS NOT NULL
    NotNull,
    /// OR combinator
    Or,
    /// AND combinator
    And,
    /// LIKE pattern match
    Like,
    /// Parenthesized group combinator
    Group,
}

impl Operator {
    /// Stable integer code of this operator.
    pub fn code(&self) -> u8 {
        match self {
            Operator::Eq => 0,
            Operator::Neq => 1,
            Operator::Lt => 2,
            Operator::Lte => 3,
            Operator::Gt => 4,
            Operator::Gte => 5,
            Operator::In => 6,
            Operator::NotIn => 7,
            Operator::Null => 8,
            Operator::NotNull => 9,
            Operator::Or => 10,
            Operator::And => 11,
            Operator::Like => 12,
            Operator::Group => 13,
        }
    }

    /// Returns the SQL symbol/keyword for this operator.
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Neq => "!=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Null => "IS NULL",
            Operator::NotNull => "IS NOT NULL",
            Operator::Or => "OR",
            Operator::And => "AND",
            Operator::Like => "LIKE",
            Operator::Group => "",
        }
    }

    /// Returns true for the AND/OR/GROUP combinators.
    pub fn is_combinator(&self) -> bool {
        matches!(self, Operator::Or | Operator::And | Operator::Group)
    }

    /// Returns true for operators that take a list of values.
    pub fn is_set(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Group => write!(f, "GROUP"),
            op => write!(f, "{}", op.sql_symbol()),
        }
    }
}

/// Sort order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

/// Join Type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    #[default]
    Left,
    Right,
    Inner,
}

impl std::fmt::Display for JoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinKind::Left => write!(f, "LEFT JOIN"),
            JoinKind::Right => write!(f, "RIGHT JOIN"),
            JoinKind::Inner => write!(f, "INNER JOIN"),
        }
    }
}
