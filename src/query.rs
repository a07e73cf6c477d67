//! Validated query model

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::Duration;

use crate::{
    ast::{Conjunction, Pattern},
    canonical,
    parser::QueryError,
};

/// A parsed and validated event-pattern query.
///
/// Only produced by [`crate::parse`]; owns everything it holds, so it can
/// outlive the text it was parsed from and be shared between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pattern: Pattern,
    predicate: Option<Conjunction>,
    window: Option<Duration>,
    captures: BTreeMap<String, String>,
}

impl Query {
    pub(crate) fn new(
        pattern: Pattern,
        predicate: Option<Conjunction>,
        window: Option<Duration>,
        captures: BTreeMap<String, String>,
    ) -> Self {
        Query {
            pattern,
            predicate,
            window,
            captures,
        }
    }

    /// Capture alias → event type
    pub fn captures(&self) -> &BTreeMap<String, String> {
        &self.captures
    }

    /// Event type bound to `alias`, if the pattern captures it
    pub fn event_type(&self, alias: &str) -> Option<&str> {
        self.captures.get(alias).map(String::as_str)
    }

    /// The WITHIN window; zero when the query has none
    pub fn window(&self) -> Duration {
        self.window.unwrap_or_else(Duration::zero)
    }

    /// The WITHIN window, `None` when the clause is absent (as opposed to an
    /// explicit `WITHIN 0s`)
    pub fn window_opt(&self) -> Option<Duration> {
        self.window
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The WHERE clause, if any
    pub fn predicate(&self) -> Option<&Conjunction> {
        self.predicate.as_ref()
    }

    /// Canonical text; parsing it yields a query with the same canonical text
    pub fn query_text(&self) -> String {
        canonical::render_query(self)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query_text())
    }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s)
    }
}
