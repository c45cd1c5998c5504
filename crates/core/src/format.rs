//! Display formatting shared by ranges, invoices and reports.
//!
//! Figures are carried unrounded through every calculation and only rounded here.

use crate::constants::BOUND_SEPARATOR;

/// Formats a monetary amount with two decimals. Non-finite values render as `0.00`.
pub fn format_amount(value: f64) -> String {
    // Round to cents first so sub-cent negatives collapse to -0.0, then fold that into 0.0.
    let cents = (lab_types::finite_or_zero(value) * 100.0).round() / 100.0;
    format!("{:.2}", cents + 0.0)
}

/// Formats a pair of bounds as `"{min} - {max}"`.
///
/// The separator is only written when `max` is present; the result is trimmed, so a missing
/// `min` yields `"- {max}"` and two missing bounds yield `""`.
pub fn format_bounds(min: Option<&str>, max: Option<&str>) -> String {
    let mut out = String::from(min.unwrap_or_default());
    if let Some(max) = max {
        out.push_str(BOUND_SEPARATOR);
        out.push_str(max);
    }
    out.trim().to_owned()
}
