//! The closed set of filter operators.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::FilterError;

/// A filter operator.
///
/// Every operator is binary except [`Operator::Not`]. Comparison operators
/// take a form and a constant; `And` and `Or` combine sub-expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    BeginsWith,
    NotBeginsWith,
    EndsWith,
    NotEndsWith,
    Contains,
    NotContains,
    Like,
    NotLike,
    And,
    Or,
    Not,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 17] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::Greater,
        Operator::GreaterEqual,
        Operator::Less,
        Operator::LessEqual,
        Operator::BeginsWith,
        Operator::NotBeginsWith,
        Operator::EndsWith,
        Operator::NotEndsWith,
        Operator::Contains,
        Operator::NotContains,
        Operator::Like,
        Operator::NotLike,
        Operator::And,
        Operator::Or,
        Operator::Not,
    ];

    /// The textual symbol, e.g. `==` or `bw`.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::BeginsWith => "bw",
            Operator::NotBeginsWith => "!bw",
            Operator::EndsWith => "ew",
            Operator::NotEndsWith => "!ew",
            Operator::Contains => "cn",
            Operator::NotContains => "!cn",
            Operator::Like => "lk",
            Operator::NotLike => "!lk",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
        }
    }

    /// The name used in the `operator` key of a serialized expression.
    pub fn expression_name(self) -> &'static str {
        match self {
            Operator::Equals => "Equals",
            Operator::NotEquals => "NotEquals",
            Operator::Greater => "Greater",
            Operator::GreaterEqual => "GreaterEqual",
            Operator::Less => "Less",
            Operator::LessEqual => "LessEqual",
            Operator::BeginsWith => "BeginsWith",
            Operator::NotBeginsWith => "NotBeginsWith",
            Operator::EndsWith => "EndsWith",
            Operator::NotEndsWith => "NotEndsWith",
            Operator::Contains => "Contains",
            Operator::NotContains => "NotContains",
            Operator::Like => "Like",
            Operator::NotLike => "NotLike",
            Operator::And => "And",
            Operator::Or => "Or",
            Operator::Not => "Not",
        }
    }

    /// Number of operands: 1 for `Not`, 2 for everything else.
    pub fn arity(self) -> usize {
        match self {
            Operator::Not => 1,
            _ => 2,
        }
    }

    pub fn is_unary(self) -> bool {
        self.arity() == 1
    }

    /// True for `And` and `Or`.
    pub fn is_logical(self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }

    /// Looks an operator up by symbol, ignoring case. `=` is accepted for `==`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        if symbol == "=" {
            return Some(Operator::Equals);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.symbol().eq_ignore_ascii_case(symbol))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s).ok_or_else(|| FilterError::unexpected_token(0, s))
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expression_name())
    }
}
