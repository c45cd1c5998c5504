//! Test catalog wire model and lookups.
//!
//! Catalog files list orderable tests, their price and the parameters each test reports:
//!
//! ```yaml
//! tests:
//!   - code: CBC
//!     name: Complete Blood Count
//!     price: 350
//!     parameters:
//!       - name: Haemoglobin
//!         unit: g/dL
//!         normalRange:
//!           male: { min: 13, max: 17 }
//!           female: { min: 12, max: 15 }
//! ```
//!
//! `normalRange` and `referenceRange` are accepted as the same field. Unknown keys are rejected.

use crate::line_items::LineItem;
use crate::range::ReferenceRange;
use crate::{CatalogError, CatalogResult};
use lab_types::NonEmptyText;
use serde::Deserialize;

// ============================================================================
// Public domain-level types
// ============================================================================

/// A reported parameter of a test (for example "Haemoglobin" within a CBC).
#[derive(Clone, Debug, PartialEq)]
pub struct TestParameter {
    pub name: NonEmptyText,
    pub unit: Option<String>,
    pub reference_range: Option<ReferenceRange>,
}

/// An orderable test.
#[derive(Clone, Debug, PartialEq)]
pub struct TestDefinition {
    pub code: NonEmptyText,
    pub name: NonEmptyText,
    pub price: f64,
    pub parameters: Vec<TestParameter>,
}

impl TestDefinition {
    /// The invoice line item for ordering this test.
    pub fn line_item(&self) -> LineItem {
        LineItem::named(self.code.as_str(), self.name.as_str(), self.price)
    }

    /// Finds a parameter by name, ignoring case.
    pub fn parameter(&self, name: &str) -> Option<&TestParameter> {
        self.parameters.iter().find(|p| p.name.eq_ignore_case(name))
    }
}

/// The set of tests a laboratory offers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TestCatalog {
    tests: Vec<TestDefinition>,
}

impl TestCatalog {
    /// Build a catalog, rejecting duplicate test codes.
    pub fn new(tests: Vec<TestDefinition>) -> CatalogResult<Self> {
        for (i, test) in tests.iter().enumerate() {
            if tests[..i]
                .iter()
                .any(|earlier| earlier.code.eq_ignore_case(test.code.as_str()))
            {
                return Err(CatalogError::InvalidInput(format!(
                    "duplicate test code '{}'",
                    test.code
                )));
            }
        }
        Ok(Self { tests })
    }

    pub fn tests(&self) -> &[TestDefinition] {
        &self.tests
    }

    /// Finds a test by code, ignoring case.
    pub fn find(&self, code: &str) -> Option<&TestDefinition> {
        self.tests.iter().find(|t| t.code.eq_ignore_case(code))
    }

    /// Line items for a list of test codes.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidInput`] naming the first unknown code.
    pub fn line_items<S: AsRef<str>>(&self, codes: &[S]) -> CatalogResult<Vec<LineItem>> {
        codes
            .iter()
            .map(|code| {
                self.find(code.as_ref())
                    .map(TestDefinition::line_item)
                    .ok_or_else(|| {
                        CatalogError::InvalidInput(format!("unknown test code '{}'", code.as_ref()))
                    })
            })
            .collect()
    }
}

// ============================================================================
// Public Catalog operations
// ============================================================================

/// Catalog parsing operations.
///
/// This is a zero-sized type used for namespacing catalog-related operations.
pub struct Catalog;

impl Catalog {
    /// Parse a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if:
    /// - the text does not match the catalog schema (the failing path is included),
    /// - any reference range has an unsupported shape,
    /// - two tests share a code.
    pub fn parse_json(text: &str) -> CatalogResult<TestCatalog> {
        let wire: CatalogWire = crate::from_json_with_path(text, "Catalog")?;
        wire_to_domain(wire)
    }

    /// Parse a catalog from YAML text.
    pub fn parse_yaml(text: &str) -> CatalogResult<TestCatalog> {
        let wire: CatalogWire = crate::from_yaml_with_path(text, "Catalog")?;
        wire_to_domain(wire)
    }

    /// Read a catalog file, choosing the format from its extension (`.yaml`/`.yml` or JSON).
    pub fn load(path: &std::path::Path) -> CatalogResult<TestCatalog> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::parse_yaml(&text),
            _ => Self::parse_json(&text),
        }
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogWire {
    tests: Vec<TestWire>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TestWire {
    code: NonEmptyText,
    name: NonEmptyText,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    parameters: Vec<ParameterWire>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ParameterWire {
    name: NonEmptyText,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default, rename = "normalRange", alias = "referenceRange")]
    reference_range: Option<ReferenceRange>,
}

fn wire_to_domain(wire: CatalogWire) -> CatalogResult<TestCatalog> {
    let tests = wire
        .tests
        .into_iter()
        .map(|test| TestDefinition {
            code: test.code,
            name: test.name,
            price: lab_types::opt_finite_or_zero(test.price),
            parameters: test
                .parameters
                .into_iter()
                .map(|p| TestParameter {
                    name: p.name,
                    unit: p.unit.and_then(crate::lenient::non_blank),
                    reference_range: p.reference_range,
                })
                .collect(),
        })
        .collect();

    TestCatalog::new(tests)
}
