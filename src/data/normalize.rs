//! Currency / Percentage Normalizer
//! Turns decorated text cells ("$52,300", "67%", "-") into numbers.

/// Placeholder the salary survey uses for "no value".
pub const MISSING_PLACEHOLDER: &str = "-";

/// Decoration stripped before numeric parsing.
const DECORATION: [char; 3] = ['$', ',', '%'];

/// Parse a possibly decorated numeric cell.
///
/// Empty cells and the `-` placeholder are missing. Anything that still fails
/// to parse after stripping `$`, `,` and `%` is missing too. Zero is a value.
pub fn parse_decorated_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == MISSING_PLACEHOLDER {
        return None;
    }

    let cleaned: String = trimmed.chars().filter(|c| !DECORATION.contains(c)).collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse a pay amount. Negative amounts are treated as missing.
pub fn parse_pay(raw: &str) -> Option<f64> {
    parse_decorated_number(raw).filter(|v| *v >= 0.0)
}

/// Parse an optional cell, where `None` means the cell itself was null.
pub fn parse_optional(raw: Option<&str>) -> Option<f64> {
    raw.and_then(parse_decorated_number)
}
