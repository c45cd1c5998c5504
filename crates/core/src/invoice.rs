//! Invoice totals.
//!
//! ```text
//! subtotal        = Σ price
//! discount_amount = subtotal × discount% / 100
//! taxable_amount  = subtotal − discount_amount
//! gst_amount      = taxable_amount × gst% / 100
//! total           = taxable_amount + gst_amount + additional_charges
//! ```
//!
//! Every input goes through [`finite_or_zero`], so NaN or infinite values count as zero.
//! Negative prices are summed as they are. Figures are returned unrounded; use
//! [`InvoiceTotals::display`] for two-decimal text.

use crate::config::BillingDefaults;
use crate::format::format_amount;
use lab_catalog::LineItem;
use lab_types::finite_or_zero;
use serde::{Deserialize, Serialize};

/// Computed invoice figures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub discount_amount: f64,
    pub taxable_amount: f64,
    pub gst_amount: f64,
    pub additional_charges: f64,
    pub total: f64,
}

impl InvoiceTotals {
    /// Two-decimal display text for every figure.
    pub fn display(&self) -> InvoiceTotalsDisplay {
        InvoiceTotalsDisplay {
            subtotal: format_amount(self.subtotal),
            discount_amount: format_amount(self.discount_amount),
            taxable_amount: format_amount(self.taxable_amount),
            gst_amount: format_amount(self.gst_amount),
            additional_charges: format_amount(self.additional_charges),
            total: format_amount(self.total),
        }
    }
}

/// [`InvoiceTotals`] rendered for display.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceTotalsDisplay {
    pub subtotal: String,
    pub discount_amount: String,
    pub taxable_amount: String,
    pub gst_amount: String,
    pub additional_charges: String,
    pub total: String,
}

/// Calculates invoice totals for `line_items`.
pub fn calculate_invoice_totals(
    line_items: &[LineItem],
    discount_percent: f64,
    gst_percent: f64,
    additional_charges: f64,
) -> InvoiceTotals {
    let subtotal = line_items
        .iter()
        .fold(0.0, |acc, item| acc + finite_or_zero(item.price));
    let discount_amount = subtotal * finite_or_zero(discount_percent) / 100.0;
    let taxable_amount = subtotal - discount_amount;
    let gst_amount = taxable_amount * finite_or_zero(gst_percent) / 100.0;
    let additional_charges = finite_or_zero(additional_charges);
    let total = taxable_amount + gst_amount + additional_charges;

    InvoiceTotals {
        subtotal,
        discount_amount,
        taxable_amount,
        gst_amount,
        additional_charges,
        total,
    }
}

/// Per-invoice overrides of the billing defaults.
///
/// A field left as `None` takes the configured default; an explicit value (including `0`) wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceAdjustments {
    #[serde(default)]
    pub discount_percent: Option<f64>,
    #[serde(default)]
    pub gst_percent: Option<f64>,
    #[serde(default)]
    pub additional_charges: Option<f64>,
}

impl InvoiceAdjustments {
    /// Fills unset fields from `defaults`.
    pub fn with_defaults(&self, defaults: BillingDefaults) -> BillingDefaults {
        BillingDefaults {
            gst_percent: self.gst_percent.unwrap_or(defaults.gst_percent),
            discount_percent: self.discount_percent.unwrap_or(defaults.discount_percent),
            additional_charges: self.additional_charges.unwrap_or(defaults.additional_charges),
        }
    }
}

/// Invoice calculator seeded with the configured billing defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct InvoiceTotalsCalculator {
    defaults: BillingDefaults,
}

impl InvoiceTotalsCalculator {
    pub fn new(defaults: BillingDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> BillingDefaults {
        self.defaults
    }

    pub fn calculate(
        &self,
        line_items: &[LineItem],
        adjustments: &InvoiceAdjustments,
    ) -> InvoiceTotals {
        let effective = adjustments.with_defaults(self.defaults);
        calculate_invoice_totals(
            line_items,
            effective.discount_percent,
            effective.gst_percent,
            effective.additional_charges,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(prices: &[f64]) -> Vec<LineItem> {
        prices.iter().copied().map(LineItem::new).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn computes_discount_gst_and_charges() {
        let totals = calculate_invoice_totals(&items(&[100.0, 50.0]), 10.0, 18.0, 20.0);
        assert_close(totals.subtotal, 150.0);
        assert_close(totals.discount_amount, 15.0);
        assert_close(totals.taxable_amount, 135.0);
        assert_close(totals.gst_amount, 24.3);
        assert_close(totals.additional_charges, 20.0);
        assert_close(totals.total, 179.3);
        assert_eq!(totals.display().total, "179.30");
        assert_eq!(totals.display().gst_amount, "24.30");
    }

    #[test]
    fn empty_invoice_is_zero() {
        let totals = calculate_invoice_totals(&[], 0.0, 0.0, 0.0);
        assert_eq!(totals, InvoiceTotals::default());
    }

    #[test]
    fn offsetting_prices_display_as_zero() {
        let totals = calculate_invoice_totals(&items(&[-0.1, -0.2, 0.3]), 0.0, 0.0, 0.0);
        assert_close(totals.subtotal, 0.0);
        let display = totals.display();
        assert_eq!(display.subtotal, "0.00");
        assert_eq!(display.total, "0.00");
    }

    #[test]
    fn repeated_calls_are_identical() {
        let line_items = items(&[350.0, 899.5, 120.0]);
        let first = calculate_invoice_totals(&line_items, 5.0, 18.0, 40.0);
        let second = calculate_invoice_totals(&line_items, 5.0, 18.0, 40.0);
        assert_eq!(first, second);
        assert_eq!(line_items, items(&[350.0, 899.5, 120.0]));
    }

    #[test]
    fn non_finite_inputs_count_as_zero() {
        let mut line_items = items(&[100.0]);
        line_items.push(LineItem {
            price: f64::NAN,
            ..LineItem::default()
        });
        let totals = calculate_invoice_totals(&line_items, f64::NAN, f64::INFINITY, f64::NAN);
        assert_close(totals.subtotal, 100.0);
        assert_close(totals.total, 100.0);
    }

    #[test]
    fn negative_prices_are_not_clamped() {
        let totals = calculate_invoice_totals(&items(&[100.0, -30.0]), 0.0, 10.0, 0.0);
        assert_close(totals.subtotal, 70.0);
        assert_close(totals.total, 77.0);
    }

    #[test]
    fn total_identity_holds() {
        let totals = calculate_invoice_totals(&items(&[199.99, 0.01, 45.5]), 12.5, 5.0, 7.25);
        assert_close(
            totals.total,
            (totals.subtotal - totals.discount_amount)
                + totals.gst_amount
                + totals.additional_charges,
        );
    }

    #[test]
    fn adjustments_override_defaults_field_by_field() {
        let defaults = BillingDefaults::new(18.0, 10.0, 20.0).expect("valid defaults");
        let calculator = InvoiceTotalsCalculator::new(defaults);

        let with_defaults =
            calculator.calculate(&items(&[100.0, 50.0]), &InvoiceAdjustments::default());
        assert_close(with_defaults.total, 179.3);

        let no_gst = InvoiceAdjustments {
            gst_percent: Some(0.0),
            ..InvoiceAdjustments::default()
        };
        let totals = calculator.calculate(&items(&[100.0, 50.0]), &no_gst);
        assert_close(totals.gst_amount, 0.0);
        assert_close(totals.total, 155.0);
    }

    #[test]
    fn adjustments_deserialize_with_missing_fields() {
        let adjustments: InvoiceAdjustments =
            serde_json::from_str(r#"{"gst_percent": 5}"#).expect("parse adjustments");
        assert_eq!(adjustments.gst_percent, Some(5.0));
        assert!(adjustments.discount_percent.is_none());
    }
}
