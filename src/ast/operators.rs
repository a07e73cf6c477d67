//! Comparison operators usable in a WHERE clause

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Equals,         // ==
    NotEquals,      // !=
    Less,           // <
    Greater,        // >
    LessOrEqual,    // <=
    GreaterOrEqual, // >=
}

impl CompareOp {
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Equals,
        CompareOp::NotEquals,
        CompareOp::Less,
        CompareOp::Greater,
        CompareOp::LessOrEqual,
        CompareOp::GreaterOrEqual,
    ];

    pub fn from_symbol(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == s)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Equals => "==",
            CompareOp::NotEquals => "!=",
            CompareOp::Less => "<",
            CompareOp::Greater => ">",
            CompareOp::LessOrEqual => "<=",
            CompareOp::GreaterOrEqual => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
