//! Request and response bodies for the REST API.
//!
//! Domain inputs (`ReferenceRange`, `PatientDemographics`, `LineItem`, `ReportEntry`) are
//! deserialized straight into their domain types, so shape decisions happen during JSON
//! extraction. They are documented as free-form objects in the OpenAPI schema.

use lab_core::{
    BillingDefaults, InvoiceTotals, InvoiceTotalsDisplay, LabReport, LabelStyle, LineItem,
    PatientDemographics, ReferenceRange, ReportEntry, ReportRow,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct BillingDefaultsRes {
    pub gst_percent: f64,
    pub discount_percent: f64,
    pub additional_charges: f64,
}

impl From<BillingDefaults> for BillingDefaultsRes {
    fn from(value: BillingDefaults) -> Self {
        Self {
            gst_percent: value.gst_percent,
            discount_percent: value.discount_percent,
            additional_charges: value.additional_charges,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct ResolveRangeReq {
    /// A string, a `{male, female, child, infant}` mapping of `{min, max}`, or `{adult, child}`.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub range: Option<ReferenceRange>,
    /// `{age, gender}`; other patient fields are ignored.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub patient: PatientDemographics,
    /// Overrides the configured label preset (`full` or `abbreviated`).
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub labels: Option<LabelStyle>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ResolveRangeRes {
    pub range: String,
    /// Demographic group selected for the patient.
    pub group: String,
}

#[derive(Deserialize, ToSchema)]
pub struct InvoiceTotalsReq {
    /// `[{price, name?, code?}]`
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub discount_percent: Option<f64>,
    #[serde(default)]
    pub gst_percent: Option<f64>,
    #[serde(default)]
    pub additional_charges: Option<f64>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct InvoiceDisplayRes {
    pub subtotal: String,
    pub discount_amount: String,
    pub taxable_amount: String,
    pub gst_amount: String,
    pub additional_charges: String,
    pub total: String,
}

impl From<InvoiceTotalsDisplay> for InvoiceDisplayRes {
    fn from(value: InvoiceTotalsDisplay) -> Self {
        Self {
            subtotal: value.subtotal,
            discount_amount: value.discount_amount,
            taxable_amount: value.taxable_amount,
            gst_amount: value.gst_amount,
            additional_charges: value.additional_charges,
            total: value.total,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct InvoiceTotalsRes {
    /// Effective percentages after applying defaults.
    pub discount_percent: f64,
    pub gst_percent: f64,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub taxable_amount: f64,
    pub gst_amount: f64,
    pub additional_charges: f64,
    pub total: f64,
    pub display: InvoiceDisplayRes,
}

impl InvoiceTotalsRes {
    pub fn new(effective: BillingDefaults, totals: InvoiceTotals) -> Self {
        Self {
            discount_percent: effective.discount_percent,
            gst_percent: effective.gst_percent,
            subtotal: totals.subtotal,
            discount_amount: totals.discount_amount,
            taxable_amount: totals.taxable_amount,
            gst_amount: totals.gst_amount,
            additional_charges: totals.additional_charges,
            total: totals.total,
            display: totals.display().into(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct ReportPreviewReq {
    pub patient_name: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub patient: PatientDemographics,
    /// `[{test, parameter, value, unit?, normalRange?}]`
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub results: Vec<ReportEntry>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub labels: Option<LabelStyle>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ReportRowRes {
    pub test: String,
    pub parameter: String,
    pub value: String,
    pub unit: String,
    pub reference_range: String,
}

impl From<ReportRow> for ReportRowRes {
    fn from(value: ReportRow) -> Self {
        Self {
            test: value.test,
            parameter: value.parameter,
            value: value.value,
            unit: value.unit,
            reference_range: value.reference_range,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ReportRes {
    pub patient_name: String,
    /// RFC 3339 timestamp.
    pub generated_at: String,
    pub label_style: String,
    pub rows: Vec<ReportRowRes>,
}

impl From<LabReport> for ReportRes {
    fn from(value: LabReport) -> Self {
        Self {
            patient_name: value.patient_name,
            generated_at: value.generated_at.to_rfc3339(),
            label_style: value.label_style.to_string(),
            rows: value.rows.into_iter().map(ReportRowRes::from).collect(),
        }
    }
}
