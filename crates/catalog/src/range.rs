//! Reference-range domain types and wire model.
//!
//! A parameter's normal range arrives in one of three shapes:
//! - a plain, already formatted string (`"12-17"`),
//! - a mapping keyed by demographic group (`male`, `female`, `child`, `infant`), each holding
//!   optional `min`/`max` bounds,
//! - a legacy mapping with plain-string `adult` and `child` entries.
//!
//! The shape is decided here, during deserialization, into [`ReferenceRange`]. A `child` entry
//! holding a mapping selects the grouped shape; a `child` entry holding a string selects the
//! legacy shape. Mixed or unknown keys are rejected.

use crate::lenient::non_blank;
use serde::{Deserialize, Deserializer};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Demographic bucket a grouped reference range is keyed by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DemographicGroup {
    Male,
    Female,
    Child,
    Infant,
}

impl DemographicGroup {
    /// Every group, in display order.
    pub const ALL: [DemographicGroup; 4] = [
        DemographicGroup::Male,
        DemographicGroup::Female,
        DemographicGroup::Child,
        DemographicGroup::Infant,
    ];

    /// Wire key for this group.
    pub fn key(self) -> &'static str {
        match self {
            DemographicGroup::Male => "male",
            DemographicGroup::Female => "female",
            DemographicGroup::Child => "child",
            DemographicGroup::Infant => "infant",
        }
    }
}

/// Lower and upper bounds for one demographic group.
///
/// Both bounds are display text. Blank values are stored as `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bounds {
    pub min: Option<String>,
    pub max: Option<String>,
}

impl Bounds {
    pub fn new(min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            min: min.and_then(|v| non_blank(v.to_owned())),
            max: max.and_then(|v| non_blank(v.to_owned())),
        }
    }

    /// True when at least one bound is present.
    pub fn has_data(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

/// Reference range keyed by demographic group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupedRange {
    pub male: Option<Bounds>,
    pub female: Option<Bounds>,
    pub child: Option<Bounds>,
    pub infant: Option<Bounds>,
}

impl GroupedRange {
    /// Bounds recorded for `group`, if the group is present at all.
    pub fn bounds(&self, group: DemographicGroup) -> Option<&Bounds> {
        match group {
            DemographicGroup::Male => self.male.as_ref(),
            DemographicGroup::Female => self.female.as_ref(),
            DemographicGroup::Child => self.child.as_ref(),
            DemographicGroup::Infant => self.infant.as_ref(),
        }
    }

    /// Builder-style setter, mostly useful in tests and fixtures.
    pub fn with(mut self, group: DemographicGroup, bounds: Bounds) -> Self {
        let slot = match group {
            DemographicGroup::Male => &mut self.male,
            DemographicGroup::Female => &mut self.female,
            DemographicGroup::Child => &mut self.child,
            DemographicGroup::Infant => &mut self.infant,
        };
        *slot = Some(bounds);
        self
    }
}

/// Legacy adult/child range with preformatted strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LegacyRange {
    pub adult: Option<String>,
    pub child: Option<String>,
}

/// A parameter's normal range, with its shape decided at ingestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReferenceRange {
    /// Already formatted upstream; displayed unchanged.
    Text(String),
    /// Keyed by demographic group.
    ByGroup(GroupedRange),
    /// Legacy `adult`/`child` strings.
    Legacy(LegacyRange),
}

impl ReferenceRange {
    /// Parse a reference range from JSON text.
    pub fn parse_json(text: &str) -> crate::CatalogResult<Self> {
        crate::from_json_with_path(text, "Reference range")
    }

    /// Parse a reference range from YAML text.
    pub fn parse_yaml(text: &str) -> crate::CatalogResult<Self> {
        crate::from_yaml_with_path(text, "Reference range")
    }
}

impl From<&str> for ReferenceRange {
    fn from(value: &str) -> Self {
        ReferenceRange::Text(value.to_owned())
    }
}

impl From<GroupedRange> for ReferenceRange {
    fn from(value: GroupedRange) -> Self {
        ReferenceRange::ByGroup(value)
    }
}

impl From<LegacyRange> for ReferenceRange {
    fn from(value: LegacyRange) -> Self {
        ReferenceRange::Legacy(value)
    }
}

const SHAPE_ERROR: &str = "reference range must be a string, a mapping of male/female/child/infant \
                           bounds ({min, max}), or a legacy mapping of adult/child strings";

impl<'de> Deserialize<'de> for ReferenceRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ReferenceRangeWire::deserialize(deserializer)
            .map(wire_to_domain)
            .map_err(|_| serde::de::Error::custom(SHAPE_ERROR))
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum ReferenceRangeWire {
    Text(String),
    Grouped(GroupedWire),
    Legacy(LegacyWire),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GroupedWire {
    #[serde(default)]
    male: Option<BoundsWire>,
    #[serde(default)]
    female: Option<BoundsWire>,
    #[serde(default)]
    child: Option<BoundsWire>,
    #[serde(default)]
    infant: Option<BoundsWire>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BoundsWire {
    #[serde(default)]
    min: Option<BoundWire>,
    #[serde(default)]
    max: Option<BoundWire>,
}

/// A single bound; catalogs written by hand often use bare numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum BoundWire {
    Text(String),
    Number(f64),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LegacyWire {
    #[serde(default)]
    adult: Option<String>,
    #[serde(default)]
    child: Option<String>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn wire_to_domain(wire: ReferenceRangeWire) -> ReferenceRange {
    match wire {
        ReferenceRangeWire::Text(text) => ReferenceRange::Text(text),
        ReferenceRangeWire::Grouped(grouped) => ReferenceRange::ByGroup(GroupedRange {
            male: grouped.male.map(bounds_to_domain),
            female: grouped.female.map(bounds_to_domain),
            child: grouped.child.map(bounds_to_domain),
            infant: grouped.infant.map(bounds_to_domain),
        }),
        ReferenceRangeWire::Legacy(legacy) => ReferenceRange::Legacy(LegacyRange {
            adult: legacy.adult.and_then(non_blank),
            child: legacy.child.and_then(non_blank),
        }),
    }
}

fn bounds_to_domain(wire: BoundsWire) -> Bounds {
    Bounds {
        min: wire.min.and_then(bound_to_text),
        max: wire.max.and_then(bound_to_text),
    }
}

fn bound_to_text(wire: BoundWire) -> Option<String> {
    match wire {
        BoundWire::Text(text) => non_blank(text),
        BoundWire::Number(n) if n.is_finite() => Some(n.to_string()),
        BoundWire::Number(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CatalogError;

    #[test]
    fn parses_plain_string() {
        let range = ReferenceRange::parse_json(r#""12-17""#).expect("parse string");
        assert_eq!(range, ReferenceRange::Text("12-17".into()));
    }

    #[test]
    fn parses_grouped_range_with_numeric_bounds() {
        let range = ReferenceRange::parse_json(
            r#"{"male": {"min": "13", "max": 17}, "infant": {"min": 0.5}}"#,
        )
        .expect("parse grouped");

        let ReferenceRange::ByGroup(grouped) = range else {
            panic!("expected grouped range");
        };
        assert_eq!(grouped.male, Some(Bounds::new(Some("13"), Some("17"))));
        assert_eq!(grouped.infant, Some(Bounds::new(Some("0.5"), None)));
        assert!(grouped.female.is_none());
        assert!(grouped.child.is_none());
    }

    #[test]
    fn child_mapping_selects_grouped_shape() {
        let range =
            ReferenceRange::parse_json(r#"{"child": {"min": "4", "max": "9"}}"#).expect("parse");
        assert!(matches!(range, ReferenceRange::ByGroup(_)));
    }

    #[test]
    fn child_string_selects_legacy_shape() {
        let range = ReferenceRange::parse_json(r#"{"adult": "70-110", "child": "60-100"}"#)
            .expect("parse legacy");
        assert_eq!(
            range,
            ReferenceRange::Legacy(LegacyRange {
                adult: Some("70-110".into()),
                child: Some("60-100".into()),
            })
        );

        let child_only = ReferenceRange::parse_json(r#"{"child": "60-100"}"#).expect("parse");
        assert!(matches!(child_only, ReferenceRange::Legacy(_)));
    }

    #[test]
    fn blank_bounds_are_absent() {
        let range = ReferenceRange::parse_json(r#"{"female": {"min": "", "max": "  "}}"#)
            .expect("parse grouped");
        let ReferenceRange::ByGroup(grouped) = range else {
            panic!("expected grouped range");
        };
        let female = grouped.female.expect("female present");
        assert!(!female.has_data());
    }

    #[test]
    fn empty_mapping_is_empty_grouped_range() {
        let range = ReferenceRange::parse_json("{}").expect("parse empty");
        assert_eq!(range, ReferenceRange::ByGroup(GroupedRange::default()));
    }

    #[test]
    fn rejects_mixed_shapes() {
        let err = ReferenceRange::parse_json(r#"{"male": {"min": "1"}, "adult": "2-3"}"#)
            .expect_err("mixed keys rejected");
        match err {
            CatalogError::Translation(msg) => assert!(msg.contains("reference range must be")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_bound_keys() {
        let err = ReferenceRange::parse_yaml("male:\n  low: 1\n  high: 2\n")
            .expect_err("unknown keys rejected");
        assert!(matches!(err, CatalogError::Translation(_)));
    }

    #[test]
    fn parses_yaml_grouped_range() {
        let yaml = "male:\n  min: 13\n  max: 17\nfemale:\n  min: '12'\n  max: '15'\n";
        let range = ReferenceRange::parse_yaml(yaml).expect("parse yaml");
        let ReferenceRange::ByGroup(grouped) = range else {
            panic!("expected grouped range");
        };
        assert_eq!(
            grouped
                .bounds(DemographicGroup::Female)
                .and_then(|b| b.max.as_deref()),
            Some("15")
        );
        assert_eq!(
            grouped
                .bounds(DemographicGroup::Male)
                .and_then(|b| b.min.as_deref()),
            Some("13")
        );
    }

    #[test]
    fn grouped_builder_sets_slots() {
        let grouped = GroupedRange::default()
            .with(DemographicGroup::Child, Bounds::new(Some("4"), Some("9")));
        assert!(grouped.bounds(DemographicGroup::Child).is_some());
        assert!(grouped.bounds(DemographicGroup::Male).is_none());
    }
}
