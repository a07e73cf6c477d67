//! Canonical text rendering.
//!
//! Output is normalized rather than input-preserving: single spaces, `", "`
//! between pattern items, double-quoted strings, numbers with a fractional
//! part and windows in descending units. Reparsing any rendered query yields
//! a query that renders identically.

use std::fmt;

use itertools::Itertools;
use recursion::CollapsibleExt;

use crate::{
    ast::{Comparison, Conjunction, Literal, Operand, Pattern, PatternFrame},
    parser::format_duration,
    query::Query,
};

/// `EVENT <pattern>[ WHERE <c1> AND ...][ WITHIN <duration>]`
pub fn render_query(query: &Query) -> String {
    let mut out = format!("EVENT {}", render_pattern(query.pattern()));

    if let Some(predicate) = query.predicate() {
        out.push_str(" WHERE ");
        out.push_str(&render_conjunction(predicate));
    }

    if let Some(window) = query.window_opt() {
        out.push_str(" WITHIN ");
        out.push_str(&format_duration(window));
    }

    out
}

pub fn render_pattern(pattern: &Pattern) -> String {
    pattern.collapse_frames(|frame| match frame {
        PatternFrame::Capture(c) => format!("{} {}", c.event_type, c.alias),
        PatternFrame::Sequence(children) => format!("SEQ({})", children.into_iter().join(", ")),
        PatternFrame::Any(children) => format!("ANY({})", children.into_iter().join(", ")),
        PatternFrame::Not(child) => format!("!({child})"),
    })
}

pub fn render_conjunction(conjunction: &Conjunction) -> String {
    conjunction.iter().map(render_comparison).join(" AND ")
}

pub fn render_comparison(comparison: &Comparison) -> String {
    format!(
        "{} {} {}",
        render_operand(&comparison.lhs),
        comparison.op,
        render_operand(&comparison.rhs)
    )
}

pub fn render_operand(operand: &Operand) -> String {
    match operand {
        Operand::Attribute(attr) => format!("{}.{}", attr.alias, attr.field),
        Operand::Literal(Literal::String(s)) => render_string(s),
        Operand::Literal(Literal::Number(n)) => render_number(*n),
    }
}

/// Double-quoted, with `\\ \" \n \t` escaped
pub fn render_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Shortest round-trip decimal, always with a fractional part: `1.0`, `0.25`
pub fn render_number(value: f64) -> String {
    let s = value.to_string();
    if s.contains('.') {
        s
    } else {
        format!("{s}.0")
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_pattern(self))
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_comparison(self))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_operand(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CompareOp;

    #[test]
    fn test_render_pattern() {
        let pattern = Pattern::Sequence(vec![
            Pattern::capture("a", "e1"),
            Pattern::Not(Box::new(Pattern::capture("c", "e2"))),
            Pattern::Any(vec![Pattern::capture("c", "e3"), Pattern::capture("d", "e4")]),
        ]);
        assert_eq!(
            render_pattern(&pattern),
            "SEQ(a e1, !(c e2), ANY(c e3, d e4))"
        );
        assert_eq!(render_pattern(&Pattern::capture("a", "b")), "a b");
    }

    #[test]
    fn test_render_strings() {
        assert_eq!(render_string("bar"), "\"bar\"");
        assert_eq!(render_string("it's"), "\"it's\"");
        assert_eq!(render_string("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(render_string("a\\b\tc\nd"), "\"a\\\\b\\tc\\nd\"");
        assert_eq!(render_string(""), "\"\"");
    }

    #[test]
    fn test_render_numbers() {
        assert_eq!(render_number(1.0), "1.0");
        assert_eq!(render_number(-1.0), "-1.0");
        assert_eq!(render_number(0.25), "0.25");
        assert_eq!(render_number(100.0), "100.0");
        assert_eq!(render_number(1e21), "1000000000000000000000.0");
    }

    #[test]
    fn test_render_comparison() {
        let comparison = Comparison::new(
            Operand::attribute("b", "foo"),
            CompareOp::LessOrEqual,
            Operand::number(3.5),
        );
        assert_eq!(comparison.to_string(), "b.foo <= 3.5");
        assert_eq!(Operand::string("x").to_string(), "\"x\"");
    }

    #[test]
    fn test_render_conjunction() {
        let conjunction = Conjunction::new(vec![
            Comparison::new(
                Operand::attribute("b", "foo"),
                CompareOp::Equals,
                Operand::string("bar"),
            ),
            Comparison::new(
                Operand::attribute("b", "n"),
                CompareOp::NotEquals,
                Operand::attribute("d", "n"),
            ),
        ])
        .unwrap();
        assert_eq!(
            render_conjunction(&conjunction),
            "b.foo == \"bar\" AND b.n != d.n"
        );
    }

    #[test]
    fn test_render_query() {
        let query = crate::parse("EVENT a b, c d WHERE b.x == 1 WITHIN 90m;").unwrap();
        assert_eq!(
            render_query(&query),
            "EVENT SEQ(a b, c d) WHERE b.x == 1.0 WITHIN 1h30m"
        );
    }
}
