use std::borrow::Cow;

use chrono::Duration;

use super::lexer::Span;
use crate::ast::{
    AttributeRef, Capture, CompareOp, Comparison, GroupKind, Literal, Operand, Pattern,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCapture<'a> {
    pub event_type: &'a str,
    pub alias: &'a str,
    pub span: Span,
    // Subcomponent spans for precise error reporting
    pub event_type_span: Span,
    pub alias_span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPattern<'a> {
    Capture(RawCapture<'a>),
    Sequence {
        children: Vec<RawPattern<'a>>,
        span: Span,
        /// top-level `a b, c d` without a SEQ keyword
        implicit: bool,
    },
    Any {
        children: Vec<RawPattern<'a>>,
        span: Span,
    },
    Not {
        child: Box<RawPattern<'a>>,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue<'a> {
    Attribute {
        alias: &'a str,
        field: &'a str,
        alias_span: Span,
    },
    String(Cow<'a, str>), // quotes stripped, escapes decoded
    Number(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawOperand<'a> {
    pub value: RawValue<'a>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawComparison<'a> {
    pub lhs: RawOperand<'a>,
    pub op: CompareOp,
    pub rhs: RawOperand<'a>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawWindow<'a> {
    pub literal: &'a str,
    pub duration: Duration,
    pub span: Span,
}

/// Parsed but not yet validated query; borrows the input text
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuery<'a> {
    pub pattern: RawPattern<'a>,
    /// empty when there is no WHERE clause
    pub predicate: Vec<RawComparison<'a>>,
    pub window: Option<RawWindow<'a>>,
}

impl<'a> RawPattern<'a> {
    pub fn span(&self) -> Span {
        match self {
            RawPattern::Capture(c) => c.span,
            RawPattern::Sequence { span, .. }
            | RawPattern::Any { span, .. }
            | RawPattern::Not { span, .. } => *span,
        }
    }

    pub fn group_kind(&self) -> Option<GroupKind> {
        match self {
            RawPattern::Capture(_) => None,
            RawPattern::Sequence { .. } => Some(GroupKind::Seq),
            RawPattern::Any { .. } => Some(GroupKind::Any),
            RawPattern::Not { .. } => Some(GroupKind::Not),
        }
    }

    /// Captures in source order, walked with an explicit stack
    pub fn captures(&self) -> Vec<&RawCapture<'a>> {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                RawPattern::Capture(c) => found.push(c),
                RawPattern::Sequence { children, .. } | RawPattern::Any { children, .. } => {
                    stack.extend(children.iter().rev())
                }
                RawPattern::Not { child, .. } => stack.push(child.as_ref()),
            }
        }
        found
    }

    /// Convert into the owned pattern model
    pub fn to_pattern(&self) -> Pattern {
        match self {
            RawPattern::Capture(c) => Pattern::Capture(c.to_capture()),
            RawPattern::Sequence { children, .. } => {
                Pattern::Sequence(children.iter().map(RawPattern::to_pattern).collect())
            }
            RawPattern::Any { children, .. } => {
                Pattern::Any(children.iter().map(RawPattern::to_pattern).collect())
            }
            RawPattern::Not { child, .. } => Pattern::Not(Box::new(child.to_pattern())),
        }
    }
}

impl RawCapture<'_> {
    pub fn to_capture(&self) -> Capture {
        Capture {
            event_type: self.event_type.to_string(),
            alias: self.alias.to_string(),
        }
    }
}

impl RawOperand<'_> {
    pub fn to_operand(&self) -> Operand {
        match &self.value {
            RawValue::Attribute { alias, field, .. } => Operand::Attribute(AttributeRef {
                alias: alias.to_string(),
                field: field.to_string(),
            }),
            RawValue::String(s) => Operand::Literal(Literal::String(s.to_string())),
            RawValue::Number(n) => Operand::Literal(Literal::Number(*n)),
        }
    }
}

impl RawComparison<'_> {
    pub fn to_comparison(&self) -> Comparison {
        Comparison::new(self.lhs.to_operand(), self.op, self.rhs.to_operand())
    }
}
