//! Input validation utilities.
//!
//! Configuration values are checked once at startup. The calculators themselves never reject
//! input; these guards only stop a bad deployment setting from silently skewing every invoice.

use crate::{LabError, LabResult};

/// Validates a percentage setting: finite and within `0..=100`.
///
/// # Errors
///
/// Returns `LabError::InvalidInput` naming `setting` when the value is out of range.
pub fn validate_percent(setting: &str, value: f64) -> LabResult<()> {
    if !value.is_finite() {
        return Err(LabError::InvalidInput(format!(
            "{setting} must be a finite number"
        )));
    }

    if !(0.0..=100.0).contains(&value) {
        return Err(LabError::InvalidInput(format!(
            "{setting} must be between 0 and 100, got {value}"
        )));
    }

    Ok(())
}

/// Validates a flat amount setting: finite and not negative.
pub fn validate_amount(setting: &str, value: f64) -> LabResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(LabError::InvalidInput(format!(
            "{setting} must be a non-negative number, got {value}"
        )));
    }

    Ok(())
}
