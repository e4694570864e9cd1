use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

const MAX_DIGITS: usize = 15;

/// Separators and digit counts used to render and read numbers.
///
/// The default is the Vietnamese convention: `.` groups thousands, `,` marks
/// the decimal point, percentages keep two decimals and plain values keep at
/// most six.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberStyle {
    pub thousands_separator: char,
    pub decimal_separator: char,
    pub percent_digits: usize,
    pub max_fraction_digits: usize,
    /// Read bare values strictly between 1 and 100 as percentages.
    pub auto_percent: bool,
}

impl NumberStyle {
    pub const VIETNAMESE: Self = Self {
        thousands_separator: '.',
        decimal_separator: ',',
        percent_digits: 2,
        max_fraction_digits: 6,
        auto_percent: true,
    };

    #[must_use]
    pub const fn with_auto_percent(mut self, enabled: bool) -> Self {
        self.auto_percent = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (label, sep) in [
            ("thousands separator", self.thousands_separator),
            ("decimal separator", self.decimal_separator),
        ] {
            if sep.is_ascii_digit() || matches!(sep, '-' | '+' | '%') || sep.is_whitespace() {
                bail!("{label} {sep:?} would be read as part of the number");
            }
        }
        if self.thousands_separator == self.decimal_separator {
            bail!(
                "thousands and decimal separators must differ (both are {:?})",
                self.decimal_separator
            );
        }
        if self.percent_digits > MAX_DIGITS || self.max_fraction_digits > MAX_DIGITS {
            bail!("fraction digit counts are limited to {MAX_DIGITS}");
        }
        Ok(())
    }
}

impl Default for NumberStyle {
    fn default() -> Self {
        Self::VIETNAMESE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_vietnamese() {
        let style = NumberStyle::default();
        assert_eq!(style.thousands_separator, '.');
        assert_eq!(style.decimal_separator, ',');
        assert!(style.auto_percent);
        assert!(style.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let style: NumberStyle =
            serde_json::from_str(r#"{"auto_percent": false, "max_fraction_digits": 3}"#).unwrap();
        assert!(!style.auto_percent);
        assert_eq!(style.max_fraction_digits, 3);
        assert_eq!(style.decimal_separator, ',');
    }

    #[test]
    fn rejects_clashing_separators() {
        let style = NumberStyle {
            thousands_separator: ',',
            ..NumberStyle::default()
        };
        assert!(style.validate().is_err());

        let style = NumberStyle {
            decimal_separator: '%',
            ..NumberStyle::default()
        };
        assert!(style.validate().is_err());
    }

    #[test]
    fn rejects_oversized_digit_counts() {
        let style = NumberStyle {
            percent_digits: 40,
            ..NumberStyle::default()
        };
        assert!(style.validate().is_err());
    }
}
