//! # LabDesk Core
//!
//! Core business logic for the LabDesk laboratory dashboard.
//!
//! This crate contains pure computations over already-parsed data:
//! - Reference-range resolution for a patient's demographics
//! - Invoice totals (subtotal, discount, GST, additional charges)
//! - Display formatting and lab report assembly
//!
//! **No API concerns**: HTTP servers, CLI parsing and wire formats belong in `api-rest`,
//! `lab-cli` and `lab-catalog`.

pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod invoice;
pub mod reference_range;
pub mod report;
pub mod validation;

pub use config::{BillingDefaults, LabConfig, LabelStyle};
pub use constants::DEFAULT_REST_ADDR;
pub use error::{LabError, LabResult};
pub use format::{format_amount, format_bounds};
pub use invoice::{
    calculate_invoice_totals, InvoiceAdjustments, InvoiceTotals, InvoiceTotalsCalculator,
    InvoiceTotalsDisplay,
};
pub use reference_range::{resolve_reference_range, select_group, ReferenceRangeResolver};
pub use report::{LabReport, ReportRow};

// Domain inputs are defined at the boundary; re-exported so callers need one import path.
pub use lab_catalog::{LineItem, PatientDemographics, ReferenceRange, ReportEntry};
