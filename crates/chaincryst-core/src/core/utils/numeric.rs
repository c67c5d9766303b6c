/// Rounds `value` to a fixed number of decimal places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Renders a float the way structure-file consumers expect to read it back.
///
/// Integral values keep one decimal (`90.0`, not `90`); every other value uses the
/// shortest representation that round-trips (`1.33`, `0.1`).
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
