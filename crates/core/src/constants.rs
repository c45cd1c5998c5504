//! Constants used throughout the LabDesk core crate.
//!
//! Environment variable names and label text live here so the binaries and the core agree on
//! them.

/// REST listen address.
pub const ENV_REST_ADDR: &str = "LABDESK_REST_ADDR";

/// Default REST listen address when none is configured.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Default GST percentage applied to invoices.
pub const ENV_DEFAULT_GST: &str = "LABDESK_DEFAULT_GST";

/// Default discount percentage applied to invoices.
pub const ENV_DISCOUNT_PERCENT: &str = "LABDESK_DISCOUNT_PERCENT";

/// Default flat additional charges added to invoices.
pub const ENV_ADDITIONAL_CHARGES: &str = "LABDESK_ADDITIONAL_CHARGES";

/// Label preset for reference-range fallback lists (`full` or `abbreviated`).
pub const ENV_RANGE_LABELS: &str = "LABDESK_RANGE_LABELS";

/// Separator between fallback entries.
pub const FALLBACK_SEPARATOR: &str = ", ";

/// Separator between a lower and an upper bound.
pub const BOUND_SEPARATOR: &str = " - ";

/// Ages below this many years select the infant group.
pub const INFANT_AGE_LIMIT: f64 = 1.0;

/// Ages below this many years (and at least [`INFANT_AGE_LIMIT`]) select the child group.
pub const CHILD_AGE_LIMIT: f64 = 18.0;
