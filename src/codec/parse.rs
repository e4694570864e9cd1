use tracing::debug;

use crate::style::NumberStyle;

/// How a piece of text was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseKind {
    Empty,
    Literal,
    /// Carried an explicit `%`.
    Percent,
    /// A bare value strictly between 1 and 100, divided by 100.
    AutoPercent,
    /// No number found; coerced to zero.
    Invalid,
}

impl ParseKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Literal => "literal",
            Self::Percent => "percent",
            Self::AutoPercent => "auto-percent",
            Self::Invalid => "invalid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parsed {
    pub value: f64,
    pub kind: ParseKind,
}

impl Parsed {
    const fn new(value: f64, kind: ParseKind) -> Self {
        Self { value, kind }
    }
}

impl NumberStyle {
    /// Reads user text as a number. Never fails; see [`Self::parse_outcome`].
    #[must_use]
    pub fn parse(&self, input: &str) -> f64 {
        self.parse_outcome(input).value
    }

    #[must_use]
    pub fn parse_outcome(&self, input: &str) -> Parsed {
        let cleaned: String = input.chars().filter(|ch| !ch.is_whitespace()).collect();
        if cleaned.is_empty() {
            return Parsed::new(0.0, ParseKind::Empty);
        }

        let parsed = if cleaned.contains('%') {
            let numeric = self.normalize(&cleaned.replacen('%', "", 1));
            leading_number(&numeric)
                .and_then(hundredth)
                .map(|value| Parsed::new(value, ParseKind::Percent))
        } else {
            let numeric = self.normalize(&cleaned);
            leading_number(&numeric).and_then(|number| {
                let value: f64 = number.parse().ok()?;
                Some(if self.auto_percent && value > 1.0 && value < 100.0 {
                    Parsed::new(hundredth(number)?, ParseKind::AutoPercent)
                } else {
                    Parsed::new(value, ParseKind::Literal)
                })
            })
        };

        parsed.unwrap_or_else(|| {
            debug!(input, "no number in field input, using 0");
            Parsed::new(0.0, ParseKind::Invalid)
        })
    }

    fn normalize(&self, text: &str) -> String {
        text.chars()
            .filter(|&ch| ch != self.thousands_separator)
            .map(|ch| if ch == self.decimal_separator { '.' } else { ch })
            .collect()
    }
}

/// `number / 100`, rounded once from the typed digits so that `"1,005%"`
/// lands on the double nearest `0.01005`.
fn hundredth(number: &str) -> Option<f64> {
    let (mantissa, exponent) = number.split_once(['e', 'E']).unwrap_or((number, "0"));
    match exponent.parse::<i64>() {
        Ok(exponent) => format!("{mantissa}e{}", exponent - 2).parse().ok(),
        Err(_) => number.parse::<f64>().ok().map(|value| value / 100.0),
    }
}

/// The longest prefix of `text` that forms a decimal number, ignoring
/// whatever follows it.
fn leading_number(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut mantissa_digits = digits_from(end);
    end += mantissa_digits;

    if bytes.get(end) == Some(&b'.') {
        let fraction = digits_from(end + 1);
        mantissa_digits += fraction;
        end += 1 + fraction;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits = digits_from(exponent_end);
        if exponent_digits > 0 {
            end = exponent_end + exponent_digits;
        }
    }

    Some(&text[..end])
}
