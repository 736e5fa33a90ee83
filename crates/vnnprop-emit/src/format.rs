//! Numeric literals for VNNLIB output and file names.

/// Format a bound as a VNNLIB decimal literal.
///
/// Uses the shortest representation that round-trips to the same `f64`, and
/// always carries a fractional part (`1` becomes `1.0`). Negative zero is
/// written as `0.0`.
pub fn format_real(value: f64) -> String {
    let mut text = format_shortest(value);
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Shortest round-trip text of `value`, without a forced fractional part.
///
/// Used for the epsilon component of property file names.
pub fn format_shortest(value: f64) -> String {
    if value == 0.0 {
        // Collapses -0.0 as well.
        return "0".to_string();
    }
    value.to_string()
}
