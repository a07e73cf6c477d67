//! Semantic checks over the raw AST: alias uniqueness and reference
//! resolution. Each pass can be run on its own; [`Validator::validate`] runs
//! both and builds the owned [`Query`].

use std::collections::{btree_map::Entry, BTreeMap};

use super::{
    ast::{RawCapture, RawComparison, RawPattern, RawQuery, RawValue},
    error::{QueryError, SpanExt},
};
use crate::{ast::Conjunction, query::Query};

/// Alias → declaring capture, borrowed from the raw AST
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureTable<'a> {
    entries: BTreeMap<&'a str, RawCapture<'a>>,
}

impl<'a> CaptureTable<'a> {
    pub fn contains(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    /// Aliases in lexicographic order
    pub fn aliases(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.keys().copied()
    }

    /// Owned alias → event type map, as exposed by [`Query::captures`]
    pub fn to_owned_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(alias, capture)| (alias.to_string(), capture.event_type.to_string()))
            .collect()
    }
}

pub struct Validator;

impl Validator {
    /// Run every semantic pass and build the validated query
    ///
    /// # Errors
    /// Returns `DuplicateAlias` or `UndefinedCapture`, whichever pass fails
    /// first.
    pub fn validate(raw: &RawQuery<'_>, source: &str) -> Result<Query, QueryError> {
        let table = Self::collect_captures(&raw.pattern, source)?;
        Self::resolve_references(&raw.predicate, &table, source)?;

        let predicate = Conjunction::new(
            raw.predicate
                .iter()
                .map(RawComparison::to_comparison)
                .collect(),
        );

        Ok(Query::new(
            raw.pattern.to_pattern(),
            predicate,
            raw.window.as_ref().map(|w| w.duration),
            table.to_owned_map(),
        ))
    }

    /// Build the capture table, failing on the first alias declared twice
    pub fn collect_captures<'a>(
        pattern: &RawPattern<'a>,
        source: &str,
    ) -> Result<CaptureTable<'a>, QueryError> {
        let mut entries = BTreeMap::new();

        for capture in pattern.captures() {
            match entries.entry(capture.alias) {
                Entry::Vacant(slot) => {
                    slot.insert(*capture);
                }
                Entry::Occupied(first) => {
                    return Err(QueryError::DuplicateAlias {
                        alias: capture.alias.to_string(),
                        span: capture.alias_span.to_source_span(),
                        first: first.get().alias_span.to_source_span(),
                        src: source.to_string(),
                    });
                }
            }
        }

        Ok(CaptureTable { entries })
    }

    /// Check that every `alias.field` operand names a captured alias
    pub fn resolve_references(
        comparisons: &[RawComparison<'_>],
        table: &CaptureTable<'_>,
        source: &str,
    ) -> Result<(), QueryError> {
        let operands = comparisons.iter().flat_map(|c| [&c.lhs, &c.rhs]);

        for operand in operands {
            let RawValue::Attribute {
                alias, alias_span, ..
            } = operand.value
            else {
                continue;
            };
            if table.contains(alias) {
                continue;
            }

            let suggestions = suggest_aliases(alias, table);
            let suggestions_msg = if !suggestions.is_empty() {
                Some(format!("Did you mean: {}?", suggestions.join(", ")))
            } else {
                Some(format!(
                    "Captured aliases: {}",
                    table.aliases().collect::<Vec<_>>().join(", ")
                ))
            };

            return Err(QueryError::UndefinedCapture {
                alias: alias.to_string(),
                span: alias_span.to_source_span(),
                src: source.to_string(),
                suggestions: suggestions_msg,
            });
        }

        Ok(())
    }
}

/// Captured aliases within edit distance 2 of `alias`
fn suggest_aliases(alias: &str, table: &CaptureTable<'_>) -> Vec<String> {
    table
        .aliases()
        .filter(|candidate| levenshtein_distance(alias, candidate) <= 2)
        .map(str::to_string)
        .collect()
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }

    let mut prev_row: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr_row = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr_row[j + 1] = (curr_row[j] + 1)
                .min(prev_row[j + 1] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_chars.len()]
}
