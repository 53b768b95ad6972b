//! Text rendering of unit values
//!
//! `format` is for people and may round. `repr` is for round trips and
//! never does: decoding and constructing a repr yields the same amount in
//! the same system.

use gauge_core::Number;
use crate::convert::gcd;
use crate::literal::SIGIL;
use crate::registry::System;
use crate::{UnitError, UnitValue};

/// Denominators shown as fractions by `format`. Anything else falls back
/// to a decimal.
pub const CANONICAL_DENOMINATORS: [i128; 13] = [2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 16, 32, 64];

/// Longest decimal expansion a literal can carry
const MAX_LITERAL_PLACES: u32 = 18;

/// Most decimal places `format` will write; larger requests are clamped
pub const MAX_PRECISION: u32 = MAX_LITERAL_PLACES;

/// Per-call formatting options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Decimal places; the display unit's default when None
    pub precision: Option<u32>,
    /// Keep trailing zeros up to `precision`
    pub pad: bool,
}

impl FormatOptions {
    /// Exactly `places` decimal places, padded with zeros
    pub fn with_precision(places: u32) -> Self {
        Self { precision: Some(places), pad: true }
    }
}

/// Sign and reduced magnitude parts of `num/den`
struct Parts {
    negative: bool,
    whole: i128,
    numerator: i128,
    denominator: i128,
}

fn split(num: i128, den: i128) -> Parts {
    let g = gcd(num, den).max(1);
    let (n, d) = (num.abs() / g, den.abs() / g);
    Parts {
        negative: (num < 0) != (den < 0) && n != 0,
        whole: n / d,
        numerator: n % d,
        denominator: d,
    }
}

impl Parts {
    fn is_canonical(&self) -> bool {
        self.denominator == 1 || CANONICAL_DENOMINATORS.contains(&self.denominator)
    }

    /// `3`, `3/8` or `92+5/8`, signed
    fn text(&self) -> String {
        let sign = if self.negative { "-" } else { "" };
        if self.numerator == 0 {
            format!("{}{}", sign, self.whole)
        } else if self.whole == 0 {
            format!("{}{}/{}", sign, self.numerator, self.denominator)
        } else {
            format!("{}{}+{}/{}", sign, self.whole, self.numerator, self.denominator)
        }
    }
}

fn decimal(n: &Number, places: u32, pad: bool) -> String {
    if pad { n.as_decimal(places) } else { n.as_trimmed_decimal(places) }
}

impl UnitValue {
    /// Exact numerator and denominator of the value in its display unit
    fn display_ratio(&self) -> (i128, i128) {
        let amount = self.amount() as i128;
        match self.unit().temperature {
            Some(t) => (amount - t.zero_offset as i128, t.scale as i128),
            None => (amount, self.unit().multiplier as i128),
        }
    }

    /// Exact value in the display unit (the `value` property)
    pub fn value(&self) -> Number {
        let (num, den) = self.display_ratio();
        Number::from_ratio_i128(num, den)
    }

    /// Human-readable text without the sigil: `12.3m`, `2+1/2lb`, `20C`
    pub fn format(&self, options: &FormatOptions) -> String {
        let unit = self.unit();
        let (num, den) = self.display_ratio();

        let body = match (self.system(), options.precision) {
            (System::Us, None) => {
                let parts = split(num, den);
                if parts.is_canonical() {
                    parts.text()
                } else {
                    self.value().as_trimmed_decimal(unit.default_places)
                }
            }
            (_, precision) => {
                let places = precision.unwrap_or(unit.default_places).min(MAX_PRECISION);
                decimal(&self.value(), places, options.pad)
            }
        };
        format!("{}{}", body, unit.suffix)
    }

    /// Literal text that decodes back to this exact amount and system
    pub fn repr(&self) -> String {
        let (num, den) = self.display_ratio();
        let value = self.value();

        let body = match (self.system(), value.terminating_places()) {
            (System::Us, _) => split(num, den).text(),
            (_, Some(places)) if places <= MAX_LITERAL_PLACES => value.as_decimal(places),
            _ => split(num, den).text(),
        };
        format!("{}{}{}", SIGIL, body, self.display_hint())
    }

    /// Exact fraction text for US Customary values: `5+1/2"`, `3'`, `3/4cup`
    pub fn to_fraction(&self) -> Result<String, UnitError> {
        if self.system() != System::Us {
            return Err(UnitError::Unsupported(format!(
                "toFraction() is only available for US Customary values, not {} values",
                self.system()
            )));
        }
        let (num, den) = self.display_ratio();
        let symbol = match self.display_hint() {
            "in" => "\"",
            "ft" => "'",
            other => other,
        };
        Ok(format!("{}{}", split(num, den).text(), symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(text: &str) -> UnitValue {
        UnitValue::parse(text).unwrap()
    }

    fn fmt(text: &str) -> String {
        u(text).format(&FormatOptions::default())
    }

    #[test]
    fn test_format_si() {
        assert_eq!(fmt("#12.3m"), "12.3m");
        assert_eq!(fmt("#12m"), "12m");
        assert_eq!(fmt("#-0.5kg"), "-0.5kg");
        assert_eq!(fmt("#1536B"), "1536B");
    }

    #[test]
    fn test_format_si_precision() {
        let v = u("#12.3m");
        assert_eq!(v.format(&FormatOptions::with_precision(0)), "12m");
        assert_eq!(v.format(&FormatOptions::with_precision(4)), "12.3000m");
        assert_eq!(v.format(&FormatOptions { precision: Some(4), pad: false }), "12.3m");
        assert_eq!(v.format(&FormatOptions::with_precision(u32::MAX)), "12.300000000000000000m");
    }

    #[test]
    fn test_format_binary_data_defaults_to_two_places() {
        assert_eq!(u("#1000B").to("KiB").unwrap().to_string(), "0.98KiB");
        assert_eq!(u("#1536B").to("KiB").unwrap().to_string(), "1.5KiB");
    }

    #[test]
    fn test_format_us_fractions() {
        assert_eq!(fmt("#2.5lb"), "2+1/2lb");
        assert_eq!(fmt("#2/4in"), "1/2in");
        assert_eq!(fmt("#92+5/8in"), "92+5/8in");
        assert_eq!(fmt("#-3/8in"), "-3/8in");
        assert_eq!(fmt("#1/3cup"), "1/3cup");
        assert_eq!(fmt("#0in"), "0in");
    }

    #[test]
    fn test_format_us_decimal_fallback() {
        // 1 m is 793701/725760 yd, which reduces to x/80640
        let v = u("#1m").to("yd").unwrap();
        assert_eq!(v.format(&FormatOptions::default()), "1.0936yd");
    }

    #[test]
    fn test_format_us_explicit_precision_is_decimal() {
        let v = u("#2+1/2lb");
        assert_eq!(v.format(&FormatOptions::with_precision(2)), "2.50lb");
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(fmt("#20C"), "20C");
        assert_eq!(fmt("#-40F"), "-40F");
        assert_eq!(u("#0C").to("F").unwrap().to_string(), "32F");
        assert_eq!(u("#98.6F").to("C").unwrap().to_string(), "37C");
        assert_eq!(u("#0K").to("C").unwrap().to_string(), "-273.2C");
    }

    #[test]
    fn test_repr_round_trips_literals() {
        for lit in ["#12m", "#12.3m", "#-2.5kg", "#3/8in", "#92+5/8in", "#-2+1/2lb", "#1/3cup",
                    "#64KiB", "#64KB", "#64kB", "#0.5L", "#20C", "#-40F", "#98.6F", "#1/3C", "#0in", "#1t"] {
            assert_eq!(u(lit).repr(), lit, "round trip of {}", lit);
        }
    }

    #[test]
    fn test_repr_normalises_fractions() {
        assert_eq!(u("#2/4in").repr(), "#1/2in");
        assert_eq!(u("#6/4in").repr(), "#1+1/2in");
        assert_eq!(u("#2.50m").repr(), "#2.5m");
    }

    #[test]
    fn test_repr_of_computed_values_is_exact() {
        let inch = u("#1m").to("in").unwrap();
        let back = UnitValue::parse(&inch.repr()).unwrap();
        assert_eq!(back.amount(), inch.amount());
        assert_eq!(back.system(), inch.system());

        let tiny = u("#1B").to("TiB").unwrap();
        assert_eq!(tiny.repr(), "#1/1099511627776TiB");
        assert_eq!(UnitValue::parse(&tiny.repr()).unwrap().amount(), 1);
    }

    #[test]
    fn test_repr_of_sums() {
        assert_eq!(u("#1ft").add(&u("#6in")).unwrap().repr(), "#1+1/2ft");
        let half = u("#1ft").div_scalar(&Number::from_i64(2)).unwrap();
        assert_eq!(half.repr(), "#1/2ft");
    }

    #[test]
    fn test_value() {
        assert_eq!(u("#12.3m").value(), Number::from_ratio(123, 10));
        assert_eq!(u("#2+1/2lb").value(), Number::from_ratio(5, 2));
        assert_eq!(u("#-6C").value(), Number::from_i64(-6));
        assert_eq!(u("#1in").to("mm").unwrap().value(), Number::from_ratio(254, 10));
    }

    #[test]
    fn test_to_fraction() {
        assert_eq!(u("#5+1/2in").to_fraction().unwrap(), "5+1/2\"");
        assert_eq!(u("#3ft").to_fraction().unwrap(), "3'");
        assert_eq!(u("#3/4cup").to_fraction().unwrap(), "3/4cup");
        assert_eq!(u("#1/725760yd").to_fraction().unwrap(), "1/725760yd");
        assert!(matches!(u("#1m").to_fraction(), Err(UnitError::Unsupported(_))));
    }
}
