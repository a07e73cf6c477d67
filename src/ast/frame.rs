use recursion::{Collapsible, MappableFrame, PartiallyApplied};

use super::pattern::{Capture, Pattern};

/// short-lived single layer of a borrowed Pattern, used for expressing tree
/// walks (listing captures, canonical rendering) without native recursion
pub enum PatternFrame<'a, X> {
    Capture(&'a Capture),
    Sequence(Vec<X>),
    Any(Vec<X>),
    Not(X),
}

impl<'a> MappableFrame for PatternFrame<'a, PartiallyApplied> {
    type Frame<X> = PatternFrame<'a, X>;

    fn map_frame<A, B>(input: Self::Frame<A>, mut f: impl FnMut(A) -> B) -> Self::Frame<B> {
        use PatternFrame::*;
        match input {
            Capture(c) => Capture(c),
            Sequence(xs) => Sequence(xs.into_iter().map(&mut f).collect()),
            Any(xs) => Any(xs.into_iter().map(&mut f).collect()),
            Not(x) => Not(f(x)),
        }
    }
}

impl<'a> Collapsible for &'a Pattern {
    type FrameToken = PatternFrame<'a, PartiallyApplied>;

    fn into_frame(self) -> PatternFrame<'a, Self> {
        match self {
            Pattern::Capture(c) => PatternFrame::Capture(c),
            Pattern::Sequence(xs) => PatternFrame::Sequence(xs.iter().collect()),
            Pattern::Any(xs) => PatternFrame::Any(xs.iter().collect()),
            Pattern::Not(x) => PatternFrame::Not(x.as_ref()),
        }
    }
}
