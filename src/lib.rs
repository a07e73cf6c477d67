//! Front end for an event-pattern (SASE-style) query language.
//!
//! ```text
//! EVENT SEQ(login a, !(logout b), ANY(purchase c, refund d))
//! WHERE a.user == c.user AND c.amount > 100
//! WITHIN 1h30m
//! ```
//!
//! [`parse`] turns query text into a validated [`Query`], or a [`QueryError`]
//! carrying a labelled span into the input. [`Query::query_text`] renders the
//! canonical form, which parses back to the same query.

pub mod ast;
pub mod canonical;
pub mod parser;
mod query;

pub use parser::{
    format_duration, parse_duration, DurationError, ErrorKind, LexicalErrorKind, QueryError,
    SyntaxErrorKind,
};
pub use query::Query;

use parser::{RawParser, Validator};

/// Parse and validate a query.
///
/// # Errors
/// Returns the first lexical, syntax or semantic error found in `text`.
pub fn parse(text: &str) -> Result<Query, QueryError> {
    log::trace!("parsing query ({} bytes)", text.len());

    let result = RawParser::parse_raw_query(text).and_then(|raw| Validator::validate(&raw, text));

    match &result {
        Ok(query) => log::debug!(
            "parsed query (nesting depth {}): {}",
            query.pattern().depth(),
            query.query_text()
        ),
        Err(e) => log::debug!("rejected query: {e}"),
    }

    result
}
