//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Billing defaults in particular are plain values handed to the
//! invoice calculator by the caller; nothing in the calculation path reads process-wide state.

use crate::constants::{
    ENV_ADDITIONAL_CHARGES, ENV_DEFAULT_GST, ENV_DISCOUNT_PERCENT, ENV_RANGE_LABELS,
};
use crate::validation::{validate_amount, validate_percent};
use crate::{LabError, LabResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Label preset used when a reference range falls back to listing every group.
///
/// `Full` writes `Male`/`Female`; `Abbreviated` writes `M`/`F`. Child and infant labels are the
/// same in both presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    #[default]
    Full,
    Abbreviated,
}

impl LabelStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelStyle::Full => "full",
            LabelStyle::Abbreviated => "abbreviated",
        }
    }
}

impl FromStr for LabelStyle {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(LabelStyle::Full),
            "abbreviated" | "abbrev" | "short" => Ok(LabelStyle::Abbreviated),
            other => Err(LabError::InvalidInput(format!(
                "unknown label style '{other}' (expected 'full' or 'abbreviated')"
            ))),
        }
    }
}

impl std::fmt::Display for LabelStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invoice settings used as initial values for the calculator inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BillingDefaults {
    pub gst_percent: f64,
    pub discount_percent: f64,
    pub additional_charges: f64,
}

impl BillingDefaults {
    /// Create validated billing defaults.
    ///
    /// # Errors
    ///
    /// Returns `LabError::InvalidInput` if a percentage is outside `0..=100` or the additional
    /// charges are negative or not finite.
    pub fn new(
        gst_percent: f64,
        discount_percent: f64,
        additional_charges: f64,
    ) -> LabResult<Self> {
        validate_percent("default GST", gst_percent)?;
        validate_percent("discount percent", discount_percent)?;
        validate_amount("additional charges", additional_charges)?;

        Ok(Self {
            gst_percent,
            discount_percent,
            additional_charges,
        })
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct LabConfig {
    billing: BillingDefaults,
    label_style: LabelStyle,
}

impl LabConfig {
    pub fn new(billing: BillingDefaults, label_style: LabelStyle) -> Self {
        Self {
            billing,
            label_style,
        }
    }

    /// Resolve configuration through a key lookup.
    ///
    /// Binaries pass `|key| std::env::var(key).ok()`; tests pass a map. Missing or blank values
    /// fall back to defaults, unparseable values are errors.
    pub fn from_lookup<F>(lookup: F) -> LabResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gst = number_from_env_value(ENV_DEFAULT_GST, lookup(ENV_DEFAULT_GST))?;
        let discount = number_from_env_value(ENV_DISCOUNT_PERCENT, lookup(ENV_DISCOUNT_PERCENT))?;
        let charges = number_from_env_value(ENV_ADDITIONAL_CHARGES, lookup(ENV_ADDITIONAL_CHARGES))?;
        let label_style = label_style_from_env_value(lookup(ENV_RANGE_LABELS))?;

        let billing = BillingDefaults::new(
            gst.unwrap_or(0.0),
            discount.unwrap_or(0.0),
            charges.unwrap_or(0.0),
        )?;

        Ok(Self::new(billing, label_style))
    }

    pub fn billing(&self) -> BillingDefaults {
        self.billing
    }

    pub fn label_style(&self) -> LabelStyle {
        self.label_style
    }
}

/// Parse a numeric setting from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns `Ok(None)`.
pub fn number_from_env_value(setting: &str, value: Option<String>) -> LabResult<Option<f64>> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    value
        .map(|v| {
            lab_types::parse_decimal(&v)
                .ok_or_else(|| LabError::InvalidInput(format!("{setting} is not a number: '{v}'")))
        })
        .transpose()
}

/// Parse the label style from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`LabelStyle::Full`].
pub fn label_style_from_env_value(value: Option<String>) -> LabResult<LabelStyle> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<LabelStyle>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}
