//! Compact duration literals for WITHIN windows, e.g. `1h`, `2h30m20s`,
//! `200h30m20s100ns`

use chrono::Duration;
use thiserror::Error;

/// Windows are measured in whole nanoseconds and must fit in an `i64`
pub const MAX_WINDOW_NANOS: i64 = i64::MAX;

/// Recognized units, largest first, with their size in nanoseconds
const UNITS: [(&str, i64); 6] = [
    ("h", 3_600_000_000_000),
    ("m", 60_000_000_000),
    ("s", 1_000_000_000),
    ("ms", 1_000_000),
    ("us", 1_000),
    ("ns", 1),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("malformed duration '{literal}': {reason}")]
    Malformed { literal: String, reason: String },

    #[error("duration '{literal}' is negative")]
    Negative { literal: String },

    #[error("duration '{literal}' exceeds the maximum window")]
    Overflow { literal: String },
}

impl DurationError {
    fn malformed(literal: &str, reason: impl Into<String>) -> Self {
        DurationError::Malformed {
            literal: literal.to_string(),
            reason: reason.into(),
        }
    }
}

fn unit_nanos(unit: &str) -> Option<i64> {
    UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, nanos)| *nanos)
}

/// Parse a concatenation of `<magnitude><unit>` segments into their sum.
///
/// Fails rather than clamping: a sum beyond [`MAX_WINDOW_NANOS`] is
/// `Overflow`, any sign is `Negative`.
pub fn parse_duration(literal: &str) -> Result<Duration, DurationError> {
    let mut rest = literal.strip_prefix('+').unwrap_or(literal);
    if rest.is_empty() {
        return Err(DurationError::malformed(literal, "empty duration"));
    }

    let mut total: i64 = 0;
    while !rest.is_empty() {
        if rest.starts_with('-') {
            return Err(DurationError::Negative {
                literal: literal.to_string(),
            });
        }

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return Err(DurationError::malformed(
                literal,
                format!("missing magnitude before '{rest}'"),
            ));
        }
        let (digits, tail) = rest.split_at(digits_end);

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '-' || c == '+')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);
        if unit.is_empty() {
            return Err(DurationError::malformed(
                literal,
                format!("missing unit after '{digits}'"),
            ));
        }
        let scale = unit_nanos(unit)
            .ok_or_else(|| DurationError::malformed(literal, format!("unknown unit '{unit}'")))?;

        // digits only, so the parse can fail on size alone
        let overflow = || DurationError::Overflow {
            literal: literal.to_string(),
        };
        let magnitude: i64 = digits.parse().map_err(|_| overflow())?;
        let segment = magnitude.checked_mul(scale).ok_or_else(overflow)?;
        total = total.checked_add(segment).ok_or_else(overflow)?;

        rest = next;
    }

    Ok(Duration::nanoseconds(total))
}

/// Render a duration as descending `h m s ms us ns` segments, omitting zero
/// segments; zero renders as `0s`. Inverse of [`parse_duration`] for every
/// duration it can return. Negative durations render as `0s` and durations
/// past [`MAX_WINDOW_NANOS`] saturate.
pub fn format_duration(duration: Duration) -> String {
    let mut nanos = duration.num_nanoseconds().unwrap_or(MAX_WINDOW_NANOS).max(0);
    if nanos == 0 {
        return "0s".to_string();
    }

    let mut out = String::new();
    for (unit, scale) in UNITS {
        let count = nanos / scale;
        if count > 0 {
            out.push_str(&count.to_string());
            out.push_str(unit);
            nanos %= scale;
        }
    }
    out
}
