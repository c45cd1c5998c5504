//! Catalog and request boundary support for LabDesk.
//!
//! This crate translates the shapes that arrive from outside (test catalog files, the
//! "get patient" response, invoice line items, observed results) into domain-level types.
//!
//! Responsibilities:
//! - Define public domain-level types consumed by `lab-core`
//! - Define strict wire models for serialisation/deserialisation
//! - Decide the [`ReferenceRange`] variant once, at ingestion, instead of probing keys at every
//!   call site
//!
//! Anything that does not fit a documented shape is rejected here with the failing path, so the
//! computation code downstream never has to guess.

mod lenient;

pub mod catalog;
pub mod demographics;
pub mod line_items;
pub mod range;
pub mod results;

// Re-export facades
pub use catalog::Catalog;
pub use demographics::Demographics;
pub use line_items::LineItems;
pub use results::ObservedResults;

// Re-export public domain-level types
pub use catalog::{TestCatalog, TestDefinition, TestParameter};
pub use demographics::PatientDemographics;
pub use line_items::LineItem;
pub use range::{Bounds, DemographicGroup, GroupedRange, LegacyRange, ReferenceRange};
pub use results::{ObservedResult, ReportEntry};

use serde::de::DeserializeOwned;

/// Errors returned by the `lab-catalog` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`CatalogError`].
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Deserialize JSON text, reporting the failing path on a schema mismatch.
pub(crate) fn from_json_with_path<T: DeserializeOwned>(text: &str, what: &str) -> CatalogResult<T> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    let parsed = serde_path_to_error::deserialize::<_, T>(&mut deserializer)
        .map_err(|err| schema_mismatch(what, err))?;
    deserializer.end()?;
    Ok(parsed)
}

/// Deserialize YAML text, reporting the failing path on a schema mismatch.
pub(crate) fn from_yaml_with_path<T: DeserializeOwned>(text: &str, what: &str) -> CatalogResult<T> {
    let deserializer = serde_yaml::Deserializer::from_str(text);
    serde_path_to_error::deserialize::<_, T>(deserializer).map_err(|err| schema_mismatch(what, err))
}

fn schema_mismatch<E: std::fmt::Display>(
    what: &str,
    err: serde_path_to_error::Error<E>,
) -> CatalogError {
    let path = err.path().to_string();
    let source = err.into_inner();
    let path = if path.is_empty() || path == "." {
        "<root>"
    } else {
        path.as_str()
    };
    CatalogError::Translation(format!("{what} schema mismatch at {path}: {source}"))
}
