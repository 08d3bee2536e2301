//! Cost amount parsing.
//!
//! Cost amounts are user free text ("120", "10-20", "~50", "idk"), so the
//! parser never fails: anything it cannot interpret degrades to a zero,
//! non-approximate amount instead of blocking aggregation.

use std::fmt;

/// The numeric interpretation of a cost amount string.
///
/// Exact values have `min == max` and `is_approx == false`. Ranges and
/// explicitly approximate values ("~50") set `is_approx`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedAmount {
    /// Lower bound of the amount.
    pub min: f64,
    /// Upper bound of the amount.
    pub max: f64,
    /// Whether the source encoded a range or an approximation marker.
    pub is_approx: bool,
}

impl ParsedAmount {
    /// An exact amount with equal bounds.
    pub fn exact(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            is_approx: false,
        }
    }

    /// The zero amount, used for empty or unparseable input.
    pub fn zero() -> Self {
        Self::exact(0.0)
    }

    /// An approximate range; bounds are swapped if given out of order.
    pub fn range(a: f64, b: f64) -> Self {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        Self {
            min,
            max,
            is_approx: true,
        }
    }

    /// True if both bounds are zero.
    pub fn is_zero(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }
}

impl From<f64> for ParsedAmount {
    fn from(value: f64) -> Self {
        Self::exact(value)
    }
}

impl fmt::Display for ParsedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min != self.max {
            write!(f, "{}-{}", format_number(self.min), format_number(self.max))
        } else if self.is_approx {
            write!(f, "~{}", format_number(self.min))
        } else {
            f.write_str(&format_number(self.min))
        }
    }
}

/// Render a number without a trailing ".0", keeping two decimals otherwise.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Interpret a cost amount string.
///
/// Recognized forms:
/// - a bare number (`"120"`, `"12.5"`, `"1,200"`) — exact
/// - two `-`/`–`-separated numbers (`"10-20"`) — approximate range, bounds
///   in encountered order, swapped if out of order
/// - a `~`-prefixed number (`"~50"`) — approximate single value
/// - a number followed by trailing text (`"10 per person"`) — the number
///
/// Everything else, including the empty string, yields the zero amount.
pub fn parse_amount(raw: &str) -> ParsedAmount {
    let s = raw.trim();
    if s.is_empty() {
        return ParsedAmount::zero();
    }

    let (s, approx_marker) = match s.strip_prefix('~') {
        Some(rest) => (rest.trim_start(), true),
        None => (s, false),
    };

    // Two-number range split on hyphen or en-dash. Both sides must be
    // numeric; otherwise fall through to single-number parsing so that
    // "pre-paid" does not read as a range.
    if let Some((a, b)) = split_range(s) {
        return ParsedAmount::range(a, b);
    }

    match leading_number(s) {
        Some(value) if approx_marker => ParsedAmount {
            min: value,
            max: value,
            is_approx: true,
        },
        Some(value) => ParsedAmount::exact(value),
        None => ParsedAmount::zero(),
    }
}

/// Try to read `s` as `<number><sep><number>` where sep is `-` or `–`.
fn split_range(s: &str) -> Option<(f64, f64)> {
    for sep in ['-', '–'] {
        let mut parts = s.splitn(2, sep);
        let first = parts.next()?;
        let Some(second) = parts.next() else { continue };
        if let (Some(a), Some(b)) = (parse_number(first), parse_number(second)) {
            return Some((a, b));
        }
    }
    None
}

/// Parse a whole string as a non-negative number, tolerating thousands
/// separators.
fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => None,
    }
}

/// Parse the longest numeric prefix of `s`, so "10 per person" reads as 10.
fn leading_number(s: &str) -> Option<f64> {
    let end = s
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || *c == '.' || *c == ',')
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    parse_number(&s[..end])
}
