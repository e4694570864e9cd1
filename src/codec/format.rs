use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};

use super::FieldValue;
use crate::style::NumberStyle;

impl NumberStyle {
    /// Renders a record value as field text.
    ///
    /// An unset value is the empty string, an explicit zero is `"0"`.
    #[must_use]
    pub fn format(&self, value: FieldValue) -> String {
        let FieldValue::Set(value) = value else {
            return String::new();
        };
        if !value.is_finite() {
            return String::new();
        }
        if value == 0.0 {
            return "0".to_string();
        }

        if value.abs() < 1.0 {
            let mut out = self.format_decimal(value, 2, self.percent_digits, self.percent_digits);
            out.push('%');
            return out;
        }

        let max_digits = if value.fract() == 0.0 {
            0
        } else {
            self.max_fraction_digits
        };
        self.format_decimal(value, 0, 0, max_digits)
    }

    /// Writes `value * 10^shift` with at most `max_digits` decimals.
    ///
    /// Rounding works on the shortest decimal form of `value` and breaks ties
    /// away from zero, so `0.01005` is `1,01%` even though the nearest binary
    /// value sits just below the tie.
    fn format_decimal(
        &self,
        value: f64,
        shift: i64,
        min_digits: usize,
        max_digits: usize,
    ) -> String {
        let digits = round_half_up(value.abs(), shift, max_digits);
        let (integer, mut fraction) = digits.split_at(digits.len() - max_digits);
        while fraction.len() > min_digits && fraction.ends_with('0') {
            fraction = &fraction[..fraction.len() - 1];
        }

        let mut out = String::with_capacity(digits.len() + integer.len() / 3 + 2);
        if value.is_sign_negative() {
            out.push('-');
        }
        push_grouped(&mut out, integer, self.thousands_separator);
        if !fraction.is_empty() {
            out.push(self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }
}

/// Digits of `magnitude * 10^shift` rounded to `scale` decimals, with the
/// decimal point dropped. Always longer than `scale`.
fn round_half_up(magnitude: f64, shift: i64, scale: usize) -> String {
    let exact = BigDecimal::from_str(&magnitude.to_string()).unwrap_or_default();
    let (mantissa, exponent) = exact.as_bigint_and_exponent();
    let shifted = BigDecimal::new(mantissa, exponent - shift);
    let scale_exponent = i64::try_from(scale).unwrap_or(i64::MAX);
    let rounded = shifted.with_scale_round(scale_exponent, RoundingMode::HalfUp);
    let (mantissa, _) = rounded.as_bigint_and_exponent();
    let digits = mantissa.magnitude().to_string();
    format!("{digits:0>width$}", width = scale + 1)
}

fn push_grouped(out: &mut String, digits: &str, separator: char) {
    let len = digits.len();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_every_three_digits() {
        let mut out = String::new();
        push_grouped(&mut out, "1234567", '.');
        assert_eq!(out, "1.234.567");

        let mut out = String::new();
        push_grouped(&mut out, "123", '.');
        assert_eq!(out, "123");
    }

    #[test]
    fn honours_custom_separators() {
        let style = NumberStyle {
            thousands_separator: ',',
            decimal_separator: '.',
            ..NumberStyle::default()
        };
        assert_eq!(style.format(FieldValue::Set(1234.5)), "1,234.5");
        assert_eq!(style.format(FieldValue::Set(0.055)), "5.50%");
    }

    #[test]
    fn negative_values_that_round_away_keep_their_sign() {
        let style = NumberStyle::default();
        assert_eq!(style.format(FieldValue::Set(-0.000_01)), "-0,00%");
    }

    #[test]
    fn ties_round_away_from_zero_on_the_shortest_decimal() {
        let style = NumberStyle::default();
        assert_eq!(style.format(FieldValue::Set(0.010_05)), "1,01%");
        assert_eq!(style.format(FieldValue::Set(0.026_75)), "2,68%");
        assert_eq!(style.format(FieldValue::Set(0.001_25)), "0,13%");
        assert_eq!(style.format(FieldValue::Set(-0.001_25)), "-0,13%");
        assert_eq!(style.format(FieldValue::Set(1.000_000_5)), "1,000001");
        assert_eq!(style.format(FieldValue::Set(2.5)), "2,5");
    }

    #[test]
    fn huge_integers_keep_every_digit() {
        let style = NumberStyle::default();
        assert_eq!(
            style.format(FieldValue::Set(1e23)),
            "100.000.000.000.000.000.000.000"
        );
        assert_eq!(round_half_up(0.004, 2, 2), "040");
        assert_eq!(round_half_up(12.0, 0, 0), "12");
    }

    #[test]
    fn fraction_digits_follow_the_style() {
        let style = NumberStyle {
            max_fraction_digits: 2,
            percent_digits: 1,
            ..NumberStyle::default()
        };
        assert_eq!(style.format(FieldValue::Set(1234.5678)), "1.234,57");
        assert_eq!(style.format(FieldValue::Set(0.055)), "5,5%");
    }
}
