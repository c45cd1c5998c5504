//! Lab report assembly.
//!
//! A report lists each measured parameter for one patient next to the reference range resolved
//! for that patient's demographics. Rows keep the order results were entered in.

use crate::config::LabelStyle;
use crate::reference_range::resolve_reference_range;
use crate::{LabError, LabResult};
use chrono::{DateTime, Utc};
use lab_catalog::{ObservedResult, PatientDemographics, ReportEntry, TestCatalog};
use serde::Serialize;

/// One printed line of a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub test: String,
    pub parameter: String,
    pub value: String,
    pub unit: String,
    pub reference_range: String,
}

/// A lab report for one patient.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabReport {
    pub patient_name: String,
    pub generated_at: DateTime<Utc>,
    pub label_style: LabelStyle,
    pub rows: Vec<ReportRow>,
}

impl LabReport {
    /// Builds a report from entries that already carry their ranges.
    pub fn build(
        patient_name: &str,
        patient: &PatientDemographics,
        entries: &[ReportEntry],
        style: LabelStyle,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let rows = entries
            .iter()
            .map(|entry| ReportRow {
                test: entry.test.trim().to_owned(),
                parameter: entry.parameter.trim().to_owned(),
                value: entry.value.trim().to_owned(),
                unit: entry.unit.as_deref().unwrap_or_default().trim().to_owned(),
                reference_range: resolve_reference_range(
                    entry.reference_range.as_ref(),
                    patient,
                    style,
                ),
            })
            .collect();

        Self {
            patient_name: patient_name.trim().to_owned(),
            generated_at,
            label_style: style,
            rows,
        }
    }

    /// Builds a report by looking up each observed result's parameter in `catalog`.
    ///
    /// # Errors
    ///
    /// Returns `LabError::InvalidInput` if a result names a test or parameter the catalog does
    /// not define.
    pub fn from_catalog(
        patient_name: &str,
        patient: &PatientDemographics,
        catalog: &TestCatalog,
        results: &[ObservedResult],
        style: LabelStyle,
        generated_at: DateTime<Utc>,
    ) -> LabResult<Self> {
        let entries = results
            .iter()
            .map(|result| {
                let test = catalog.find(result.test.as_str()).ok_or_else(|| {
                    LabError::InvalidInput(format!("unknown test code '{}'", result.test))
                })?;
                let parameter = test.parameter(result.parameter.as_str()).ok_or_else(|| {
                    LabError::InvalidInput(format!(
                        "test '{}' has no parameter '{}'",
                        test.code, result.parameter
                    ))
                })?;

                Ok(ReportEntry {
                    test: test.name.to_string(),
                    parameter: parameter.name.to_string(),
                    value: result.value.clone(),
                    unit: parameter.unit.clone(),
                    reference_range: parameter.reference_range.clone(),
                })
            })
            .collect::<LabResult<Vec<_>>>()?;

        tracing::debug!(rows = entries.len(), "assembled report entries from catalog");

        Ok(Self::build(patient_name, patient, &entries, style, generated_at))
    }

    /// Plain-text table of the report, one row per parameter.
    pub fn render_text(&self) -> String {
        const HEADERS: [&str; 5] = ["Test", "Parameter", "Value", "Unit", "Reference range"];

        let cells: Vec<[&str; 5]> = self
            .rows
            .iter()
            .map(|r| {
                [
                    r.test.as_str(),
                    r.parameter.as_str(),
                    r.value.as_str(),
                    r.unit.as_str(),
                    r.reference_range.as_str(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = format!(
            "Patient: {}\nGenerated: {}\n\n",
            self.patient_name,
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        );
        for row in std::iter::once(HEADERS).chain(cells) {
            let line = row
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ");
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}
