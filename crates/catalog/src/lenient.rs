//! Forgiving scalar wire types.
//!
//! Patient records and line items come from an external backend that is loose about types:
//! ages arrive as numbers or strings, prices may be missing or `null`. These helpers accept any
//! scalar and collapse whatever is not usable to `None`.

use serde::de::IgnoredAny;
use serde::Deserialize;

/// A value expected to be numeric.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum LenientNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl LenientNumber {
    pub(crate) fn into_f64(self) -> Option<f64> {
        match self {
            LenientNumber::Number(n) if n.is_finite() => Some(n),
            LenientNumber::Number(_) => None,
            LenientNumber::Text(text) => lab_types::parse_decimal(&text),
            LenientNumber::Other(_) => None,
        }
    }
}

/// A value expected to be text. Numbers are rendered; empty text counts as absent.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum LenientText {
    Text(String),
    Number(f64),
    Other(IgnoredAny),
}

impl LenientText {
    pub(crate) fn into_text(self) -> Option<String> {
        match self {
            LenientText::Text(text) => non_blank(text),
            LenientText::Number(n) => Some(n.to_string()),
            LenientText::Other(_) => None,
        }
    }
}

/// Trims `text`, returning `None` when nothing remains.
pub(crate) fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_owned())
    }
}
