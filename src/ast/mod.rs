//! Owned, validated AST for event-pattern queries
//!
//! Values in this module never borrow the query text they were parsed from;
//! a [`crate::Query`] can outlive its input.

mod frame;
pub use frame::PatternFrame;

mod operators;
pub use operators::CompareOp;

mod pattern;
pub use pattern::{Capture, GroupKind, Pattern};

mod predicate;
pub use predicate::{AttributeRef, Comparison, Conjunction, Literal, Operand};
