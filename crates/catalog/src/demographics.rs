//! Patient demographics as consumed by range resolution.
//!
//! The "get patient" response carries many fields; only `age` and `gender` matter here and
//! everything else is ignored. Both are loosely typed upstream (`age` may be a number, a numeric
//! string or `null`), so they are normalised on the way in:
//! - `age` becomes `Some(years)` only for a finite number,
//! - `gender` becomes `Some(text)` only for non-blank text.

use crate::lenient::{non_blank, LenientNumber, LenientText};
use crate::CatalogResult;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Deserializer};

/// Age and gender of the patient a report or range is being produced for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatientDemographics {
    /// Age in years, possibly fractional (`0.5` for six months).
    pub age: Option<f64>,
    pub gender: Option<String>,
}

impl PatientDemographics {
    pub fn new(age: Option<f64>, gender: Option<&str>) -> Self {
        Self {
            age: age.filter(|a| a.is_finite()),
            gender: gender.and_then(|g| non_blank(g.to_owned())),
        }
    }

    /// Derive demographics from a birth date as of `on`.
    ///
    /// The age is the number of completed calendar years plus the elapsed share of the current
    /// birthday year, so it reaches exactly `1.0` or `18.0` on those birthdays. A birth date after
    /// `on` leaves the age unknown.
    pub fn from_birth_date(birth_date: NaiveDate, on: NaiveDate, gender: Option<&str>) -> Self {
        Self::new(age_in_years(birth_date, on), gender)
    }

    /// True when the recorded gender starts with `f`, ignoring case.
    pub fn is_female(&self) -> bool {
        self.gender
            .as_deref()
            .and_then(|g| g.chars().next())
            .is_some_and(|c| c.eq_ignore_ascii_case(&'f'))
    }
}

fn age_in_years(birth_date: NaiveDate, on: NaiveDate) -> Option<f64> {
    let years = on.years_since(birth_date)?;
    let last_birthday = birth_date.checked_add_months(Months::new(years * 12))?;
    let next_birthday = birth_date.checked_add_months(Months::new((years + 1) * 12))?;

    let elapsed = on.signed_duration_since(last_birthday).num_days().max(0) as f64;
    let year_len = next_birthday.signed_duration_since(last_birthday).num_days() as f64;
    let fraction = if year_len > 0.0 { (elapsed / year_len).min(1.0) } else { 0.0 };
    Some(f64::from(years) + fraction)
}

impl<'de> Deserialize<'de> for PatientDemographics {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = DemographicsWire::deserialize(deserializer)?;
        Ok(Self {
            age: wire.age.and_then(LenientNumber::into_f64),
            gender: wire.gender.and_then(LenientText::into_text),
        })
    }
}

/// Demographics parsing operations.
pub struct Demographics;

impl Demographics {
    /// Parse demographics from a JSON patient record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CatalogError`] if the text is not a JSON object.
    pub fn parse_json(text: &str) -> CatalogResult<PatientDemographics> {
        crate::from_json_with_path(text, "Patient")
    }

    /// Parse demographics from a YAML patient record.
    pub fn parse_yaml(text: &str) -> CatalogResult<PatientDemographics> {
        crate::from_yaml_with_path(text, "Patient")
    }
}

// Unknown keys are allowed: this is an external response shape.
#[derive(Deserialize)]
struct DemographicsWire {
    #[serde(default)]
    age: Option<LenientNumber>,
    #[serde(default)]
    gender: Option<LenientText>,
}
