//! Invoice line items.
//!
//! Only the price takes part in arithmetic; `code` and `name` are carried for display. Prices
//! that are missing, `null`, blank or non-numeric are read as `0`. Negative prices are kept.

use crate::lenient::{LenientNumber, LenientText};
use crate::CatalogResult;
use serde::{Deserialize, Deserializer};

/// A single priced test or charge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineItem {
    pub code: Option<String>,
    pub name: Option<String>,
    pub price: f64,
}

impl LineItem {
    pub fn new(price: f64) -> Self {
        Self {
            price: lab_types::finite_or_zero(price),
            ..Self::default()
        }
    }

    pub fn named(code: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            code: Some(code.into()),
            name: Some(name.into()),
            price: lab_types::finite_or_zero(price),
        }
    }
}

impl<'de> Deserialize<'de> for LineItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = LineItemWire::deserialize(deserializer)?;
        Ok(Self {
            code: wire.code.and_then(LenientText::into_text),
            name: wire.name.and_then(LenientText::into_text),
            price: wire
                .price
                .and_then(LenientNumber::into_f64)
                .unwrap_or(0.0),
        })
    }
}

/// Line item list parsing operations.
pub struct LineItems;

impl LineItems {
    /// Parse a JSON array of line items.
    pub fn parse_json(text: &str) -> CatalogResult<Vec<LineItem>> {
        crate::from_json_with_path(text, "Line items")
    }

    /// Parse a YAML sequence of line items.
    pub fn parse_yaml(text: &str) -> CatalogResult<Vec<LineItem>> {
        crate::from_yaml_with_path(text, "Line items")
    }
}

#[derive(Deserialize)]
struct LineItemWire {
    #[serde(default)]
    code: Option<LenientText>,
    #[serde(default)]
    name: Option<LenientText>,
    #[serde(default)]
    price: Option<LenientNumber>,
}
