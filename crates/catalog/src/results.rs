//! Observed test results entered by the lab, keyed by test code and parameter name.

use crate::lenient::LenientText;
use crate::range::ReferenceRange;
use crate::CatalogResult;
use lab_types::NonEmptyText;
use serde::{Deserialize, Deserializer};

/// One measured value for a test parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservedResult {
    pub test: NonEmptyText,
    pub parameter: NonEmptyText,
    /// Display text of the measurement; numbers are rendered as entered. Blank when missing.
    pub value: String,
}

impl<'de> Deserialize<'de> for ObservedResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = ObservedResultWire::deserialize(deserializer)?;
        Ok(Self {
            test: wire.test,
            parameter: wire.parameter,
            value: wire
                .value
                .and_then(LenientText::into_text)
                .unwrap_or_default(),
        })
    }
}

/// Observed result list parsing operations.
pub struct ObservedResults;

impl ObservedResults {
    pub fn parse_json(text: &str) -> CatalogResult<Vec<ObservedResult>> {
        crate::from_json_with_path(text, "Results")
    }

    pub fn parse_yaml(text: &str) -> CatalogResult<Vec<ObservedResult>> {
        crate::from_yaml_with_path(text, "Results")
    }
}

/// A measured parameter together with the range it should be read against.
///
/// Used when results arrive already paired with their ranges, without a catalog lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportEntry {
    pub test: String,
    pub parameter: String,
    /// Display text of the measurement; numbers are rendered as entered. Blank when missing.
    pub value: String,
    pub unit: Option<String>,
    pub reference_range: Option<ReferenceRange>,
}

impl<'de> Deserialize<'de> for ReportEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = ReportEntryWire::deserialize(deserializer)?;
        Ok(Self {
            test: wire.test,
            parameter: wire.parameter,
            value: wire
                .value
                .and_then(LenientText::into_text)
                .unwrap_or_default(),
            unit: wire.unit.and_then(LenientText::into_text),
            reference_range: wire.reference_range,
        })
    }
}

#[derive(Deserialize)]
struct ReportEntryWire {
    test: String,
    parameter: String,
    #[serde(default)]
    value: Option<LenientText>,
    #[serde(default)]
    unit: Option<LenientText>,
    #[serde(default, alias = "normalRange", alias = "referenceRange")]
    reference_range: Option<ReferenceRange>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ObservedResultWire {
    test: NonEmptyText,
    parameter: NonEmptyText,
    #[serde(default)]
    value: Option<LenientText>,
}
