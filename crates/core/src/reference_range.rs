//! Reference-range resolution.
//!
//! Turns a parameter's [`ReferenceRange`] into the display string for one patient:
//! - plain text is shown unchanged,
//! - a grouped range shows the bounds of the patient's demographic group, or, when that group
//!   has no bounds, a list of every group that does (`"Male: 13 - 17, Female: 12 - 15"`),
//! - a legacy range shows `"Adult: {adult}, Child: {child}"`.
//!
//! Resolution never fails: missing or empty data resolves to an empty string.

use crate::config::LabelStyle;
use crate::constants::{CHILD_AGE_LIMIT, FALLBACK_SEPARATOR, INFANT_AGE_LIMIT};
use crate::format::format_bounds;
use lab_catalog::{
    Bounds, DemographicGroup, GroupedRange, LegacyRange, PatientDemographics, ReferenceRange,
};

/// Selects the demographic group whose bounds apply to `patient`.
///
/// Female patients (gender starting with `f`) always select `Female`. Otherwise the age decides:
/// under 1 year is `Infant`, under 18 is `Child`, and everything else, including an unknown age,
/// falls to `Male`, the default bucket.
pub fn select_group(patient: &PatientDemographics) -> DemographicGroup {
    if patient.is_female() {
        return DemographicGroup::Female;
    }

    match patient.age {
        Some(age) if age < INFANT_AGE_LIMIT => DemographicGroup::Infant,
        Some(age) if age < CHILD_AGE_LIMIT => DemographicGroup::Child,
        _ => DemographicGroup::Male,
    }
}

/// Label written for `group` in a fallback list.
pub fn group_label(group: DemographicGroup, style: LabelStyle) -> &'static str {
    match (group, style) {
        (DemographicGroup::Male, LabelStyle::Full) => "Male",
        (DemographicGroup::Male, LabelStyle::Abbreviated) => "M",
        (DemographicGroup::Female, LabelStyle::Full) => "Female",
        (DemographicGroup::Female, LabelStyle::Abbreviated) => "F",
        (DemographicGroup::Child, _) => "Child",
        (DemographicGroup::Infant, _) => "Infant",
    }
}

/// Resolves `range` to a display string for `patient`.
pub fn resolve_reference_range(
    range: Option<&ReferenceRange>,
    patient: &PatientDemographics,
    style: LabelStyle,
) -> String {
    match range {
        None => String::new(),
        Some(ReferenceRange::Text(text)) => text.clone(),
        Some(ReferenceRange::ByGroup(grouped)) => resolve_grouped(grouped, patient, style),
        Some(ReferenceRange::Legacy(legacy)) => resolve_legacy(legacy),
    }
}

/// Resolver bound to a label preset.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReferenceRangeResolver {
    style: LabelStyle,
}

impl ReferenceRangeResolver {
    pub fn new(style: LabelStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> LabelStyle {
        self.style
    }

    pub fn resolve(&self, range: Option<&ReferenceRange>, patient: &PatientDemographics) -> String {
        resolve_reference_range(range, patient, self.style)
    }
}

fn resolve_grouped(
    grouped: &GroupedRange,
    patient: &PatientDemographics,
    style: LabelStyle,
) -> String {
    let group = select_group(patient);

    if let Some(bounds) = grouped.bounds(group).filter(|b| b.has_data()) {
        return bounds_text(bounds);
    }

    tracing::debug!(group = group.key(), "no bounds for patient group, listing all groups");

    DemographicGroup::ALL
        .iter()
        .filter_map(|&g| {
            grouped
                .bounds(g)
                .filter(|b| b.has_data())
                .map(|b| format!("{}: {}", group_label(g, style), bounds_text(b)))
        })
        .collect::<Vec<_>>()
        .join(FALLBACK_SEPARATOR)
}

fn resolve_legacy(legacy: &LegacyRange) -> String {
    if legacy.adult.is_none() && legacy.child.is_none() {
        return String::new();
    }

    let mut out = format!("Adult: {}", legacy.adult.as_deref().unwrap_or_default());
    if let Some(child) = legacy.child.as_deref() {
        out.push_str(", Child: ");
        out.push_str(child);
    }
    out
}

fn bounds_text(bounds: &Bounds) -> String {
    format_bounds(bounds.min.as_deref(), bounds.max.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(age: Option<f64>, gender: Option<&str>) -> PatientDemographics {
        PatientDemographics::new(age, gender)
    }

    fn bounds(min: &str, max: &str) -> Bounds {
        Bounds::new(Some(min), Some(max))
    }

    fn male_female() -> ReferenceRange {
        GroupedRange::default()
            .with(DemographicGroup::Male, bounds("12", "17"))
            .with(DemographicGroup::Female, bounds("11", "15"))
            .into()
    }

    #[test]
    fn plain_text_passes_through() {
        let range = ReferenceRange::from("12-17");
        for p in [
            patient(Some(30.0), Some("Female")),
            patient(None, None),
            patient(Some(0.2), Some("male")),
        ] {
            assert_eq!(resolve_reference_range(Some(&range), &p, LabelStyle::Full), "12-17");
        }
    }

    #[test]
    fn missing_range_is_empty() {
        let p = patient(Some(30.0), Some("male"));
        assert_eq!(resolve_reference_range(None, &p, LabelStyle::Full), "");
        assert_eq!(
            resolve_reference_range(Some(&ReferenceRange::from("")), &p, LabelStyle::Full),
            ""
        );
    }

    #[test]
    fn female_patient_selects_female_bounds() {
        let p = patient(Some(30.0), Some("Female"));
        assert_eq!(
            resolve_reference_range(Some(&male_female()), &p, LabelStyle::Full),
            "11 - 15"
        );
    }

    #[test]
    fn adult_male_selects_male_bounds() {
        let p = patient(Some(45.0), Some("Male"));
        assert_eq!(
            resolve_reference_range(Some(&male_female()), &p, LabelStyle::Full),
            "12 - 17"
        );
    }

    #[test]
    fn missing_female_group_falls_back_to_listing() {
        let range: ReferenceRange = GroupedRange::default()
            .with(DemographicGroup::Male, bounds("12", "17"))
            .into();
        let p = patient(Some(30.0), Some("Female"));

        assert_eq!(
            resolve_reference_range(Some(&range), &p, LabelStyle::Full),
            "Male: 12 - 17"
        );
        assert_eq!(
            resolve_reference_range(Some(&range), &p, LabelStyle::Abbreviated),
            "M: 12 - 17"
        );
    }

    #[test]
    fn infant_age_selects_infant_bounds() {
        let range: ReferenceRange = GroupedRange::default()
            .with(DemographicGroup::Infant, bounds("1", "2"))
            .into();
        let p = patient(Some(0.5), Some("male"));
        assert_eq!(resolve_reference_range(Some(&range), &p, LabelStyle::Full), "1 - 2");
    }

    #[test]
    fn group_selection_by_age() {
        assert_eq!(select_group(&patient(Some(0.0), None)), DemographicGroup::Infant);
        assert_eq!(select_group(&patient(Some(0.99), None)), DemographicGroup::Infant);
        assert_eq!(select_group(&patient(Some(1.0), None)), DemographicGroup::Child);
        assert_eq!(select_group(&patient(Some(17.9), Some("m"))), DemographicGroup::Child);
        assert_eq!(select_group(&patient(Some(18.0), None)), DemographicGroup::Male);
        assert_eq!(select_group(&patient(None, None)), DemographicGroup::Male);
        assert_eq!(select_group(&patient(None, Some("other"))), DemographicGroup::Male);
    }

    #[test]
    fn female_takes_precedence_over_age() {
        assert_eq!(
            select_group(&patient(Some(0.5), Some("female"))),
            DemographicGroup::Female
        );
        assert_eq!(select_group(&patient(Some(8.0), Some("F"))), DemographicGroup::Female);
    }

    #[test]
    fn fallback_lists_every_group_with_data_in_order() {
        let range: ReferenceRange = GroupedRange::default()
            .with(DemographicGroup::Infant, bounds("1", "2"))
            .with(DemographicGroup::Female, Bounds::new(Some("11"), None))
            .with(DemographicGroup::Male, bounds("12", "17"))
            .with(DemographicGroup::Child, Bounds::default())
            .into();
        let p = patient(Some(10.0), Some("male"));

        assert_eq!(
            resolve_reference_range(Some(&range), &p, LabelStyle::Full),
            "Male: 12 - 17, Female: 11, Infant: 1 - 2"
        );
        assert_eq!(
            resolve_reference_range(Some(&range), &p, LabelStyle::Abbreviated),
            "M: 12 - 17, F: 11, Infant: 1 - 2"
        );
    }

    #[test]
    fn empty_grouped_range_is_empty() {
        let range = ReferenceRange::ByGroup(GroupedRange::default());
        let p = patient(Some(30.0), None);
        assert_eq!(resolve_reference_range(Some(&range), &p, LabelStyle::Full), "");
    }

    #[test]
    fn max_only_bound_keeps_dash() {
        let range: ReferenceRange = GroupedRange::default()
            .with(DemographicGroup::Male, Bounds::new(None, Some("200")))
            .into();
        let p = patient(Some(40.0), None);
        assert_eq!(resolve_reference_range(Some(&range), &p, LabelStyle::Full), "- 200");
    }

    #[test]
    fn legacy_ranges() {
        let p = patient(Some(40.0), None);
        let both = ReferenceRange::Legacy(LegacyRange {
            adult: Some("70-110".into()),
            child: Some("60-100".into()),
        });
        assert_eq!(
            resolve_reference_range(Some(&both), &p, LabelStyle::Full),
            "Adult: 70-110, Child: 60-100"
        );

        let adult_only = ReferenceRange::Legacy(LegacyRange {
            adult: Some("70-110".into()),
            child: None,
        });
        assert_eq!(
            resolve_reference_range(Some(&adult_only), &p, LabelStyle::Full),
            "Adult: 70-110"
        );

        let empty = ReferenceRange::Legacy(LegacyRange::default());
        assert_eq!(resolve_reference_range(Some(&empty), &p, LabelStyle::Full), "");
    }

    #[test]
    fn resolver_uses_its_preset() {
        let range: ReferenceRange = GroupedRange::default()
            .with(DemographicGroup::Female, bounds("11", "15"))
            .into();
        let resolver = ReferenceRangeResolver::new(LabelStyle::Abbreviated);
        let p = patient(Some(30.0), Some("male"));
        assert_eq!(resolver.resolve(Some(&range), &p), "F: 11 - 15");
        assert_eq!(resolver.style(), LabelStyle::Abbreviated);
    }

    #[test]
    fn parsed_ranges_resolve() {
        let range = ReferenceRange::parse_json(
            r#"{"male": {"min": 13, "max": 17}, "female": {"min": "12", "max": "15"}}"#,
        )
        .expect("parse range");
        let p = lab_catalog::Demographics::parse_json(r#"{"age": "30", "gender": "female"}"#)
            .expect("parse patient");
        assert_eq!(resolve_reference_range(Some(&range), &p, LabelStyle::Full), "12 - 15");
    }
}
