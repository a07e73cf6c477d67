//! WHERE clause: a flat conjunction of comparisons between capture fields and
//! literals

use super::operators::CompareOp;

/// `alias.field`, resolved against the pattern's capture table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeRef {
    pub alias: String,
    pub field: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    // always finite
    Number(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Attribute(AttributeRef),
    Literal(Literal),
}

impl Operand {
    pub fn attribute(alias: impl Into<String>, field: impl Into<String>) -> Self {
        Operand::Attribute(AttributeRef {
            alias: alias.into(),
            field: field.into(),
        })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Operand::Literal(Literal::String(value.into()))
    }

    pub fn number(value: f64) -> Self {
        Operand::Literal(Literal::Number(value))
    }

    /// The capture alias this operand refers to, if it is an attribute reference
    pub fn alias(&self) -> Option<&str> {
        match self {
            Operand::Attribute(attr) => Some(&attr.alias),
            Operand::Literal(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub lhs: Operand,
    pub op: CompareOp,
    pub rhs: Operand,
}

impl Comparison {
    pub fn new(lhs: Operand, op: CompareOp, rhs: Operand) -> Self {
        Comparison { lhs, op, rhs }
    }

    pub fn operands(&self) -> [&Operand; 2] {
        [&self.lhs, &self.rhs]
    }
}

/// Logical AND of one or more comparisons, in the order they were written
#[derive(Debug, Clone, PartialEq)]
pub struct Conjunction {
    comparisons: Vec<Comparison>,
}

impl Conjunction {
    /// Returns `None` for an empty list: a WHERE clause always holds at least
    /// one comparison.
    pub fn new(comparisons: Vec<Comparison>) -> Option<Self> {
        if comparisons.is_empty() {
            None
        } else {
            Some(Conjunction { comparisons })
        }
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Comparison> {
        self.comparisons.iter()
    }

    pub fn len(&self) -> usize {
        self.comparisons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparisons.is_empty()
    }

    /// Every capture alias referenced by any operand, in order of appearance
    pub fn referenced_aliases(&self) -> impl Iterator<Item = &str> {
        self.comparisons
            .iter()
            .flat_map(|c| c.operands())
            .filter_map(Operand::alias)
    }
}

impl<'a> IntoIterator for &'a Conjunction {
    type Item = &'a Comparison;
    type IntoIter = std::slice::Iter<'a, Comparison>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
