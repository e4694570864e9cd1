//! Conversion between record values and Vietnamese-formatted field text.
//!
//! Values with a magnitude below one are shown as percentages (`0.055` is
//! `"5,50%"`), everything else as a grouped decimal (`1234.5` is
//! `"1.234,5"`). Parsing accepts the same shapes back and never fails:
//! text that holds no number reads as `0`.

mod format;
mod parse;

pub use parse::{ParseKind, Parsed};

use crate::style::NumberStyle;

/// A record value as seen by a nullable numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FieldValue {
    /// No value was provided. Distinct from zero.
    #[default]
    Unset,
    Set(f64),
}

impl FieldValue {
    #[must_use]
    pub const fn is_unset(self) -> bool {
        matches!(self, Self::Unset)
    }

    #[must_use]
    pub const fn as_option(self) -> Option<f64> {
        match self {
            Self::Unset => None,
            Self::Set(value) => Some(value),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Set(value)
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Unset, Self::Set)
    }
}

/// Formats with the default Vietnamese style.
#[must_use]
pub fn format_value(value: impl Into<FieldValue>) -> String {
    NumberStyle::VIETNAMESE.format(value.into())
}

/// Parses with the default Vietnamese style.
#[must_use]
pub fn parse_text(input: &str) -> f64 {
    NumberStyle::VIETNAMESE.parse(input)
}
