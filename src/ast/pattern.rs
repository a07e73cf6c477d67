//! Pattern tree: captures combined with SEQ, ANY and negation groups

use std::fmt;

use recursion::CollapsibleExt;

use super::frame::PatternFrame;

/// A named binding of one event type within a pattern, e.g. `login a`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Capture {
    pub event_type: String,
    pub alias: String,
}

/// The grouping operators that can wrap pattern items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Seq, // SEQ(...)
    Any, // ANY(...)
    Not, // !(...)
}

impl GroupKind {
    pub fn keyword(self) -> &'static str {
        match self {
            GroupKind::Seq => "SEQ",
            GroupKind::Any => "ANY",
            GroupKind::Not => "!",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Event pattern tree.
///
/// `Sequence` children are kept in declaration order; whether that order is
/// temporal is up to the engine consuming the query. `Any` lists alternatives.
/// `Not` marks a pattern that must not occur within the enclosing group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Capture(Capture),
    Sequence(Vec<Pattern>),
    Any(Vec<Pattern>),
    Not(Box<Pattern>),
}

impl Pattern {
    pub fn capture(event_type: impl Into<String>, alias: impl Into<String>) -> Self {
        Pattern::Capture(Capture {
            event_type: event_type.into(),
            alias: alias.into(),
        })
    }

    pub fn group_kind(&self) -> Option<GroupKind> {
        match self {
            Pattern::Capture(_) => None,
            Pattern::Sequence(_) => Some(GroupKind::Seq),
            Pattern::Any(_) => Some(GroupKind::Any),
            Pattern::Not(_) => Some(GroupKind::Not),
        }
    }

    /// All captures in the tree, in the order they appear in the query text
    pub fn captures(&self) -> Vec<&Capture> {
        self.collapse_frames(|frame| match frame {
            PatternFrame::Capture(c) => vec![c],
            PatternFrame::Sequence(children) | PatternFrame::Any(children) => {
                children.into_iter().flatten().collect()
            }
            PatternFrame::Not(child) => child,
        })
    }

    /// Number of nested groups on the deepest path; a bare capture is 0
    pub fn depth(&self) -> usize {
        self.collapse_frames(|frame| match frame {
            PatternFrame::Capture(_) => 0,
            PatternFrame::Sequence(children) | PatternFrame::Any(children) => {
                1 + children.into_iter().max().unwrap_or(0)
            }
            PatternFrame::Not(child) => 1 + child,
        })
    }
}
