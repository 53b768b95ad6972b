//! Exact rational numbers using dashu
//!
//! Scalars that meet unit values (multipliers, divisors, ratios, the
//! `.value` property) must not drift, so `Number` keeps an exact fraction
//! and only rounds when rendered.

use dashu_int::{IBig, UBig};
use dashu_ratio::RBig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Overflow: result too large")]
    Overflow,
}

/// Places rendered by `Display` for non-terminating values
const DISPLAY_PLACES: u32 = 10;

/// Largest decimal exponent accepted by `from_str`
const MAX_EXPONENT: u32 = 400;

/// Exact rational number
///
/// All operations return Results or new Numbers - never panic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Number {
    inner: RBig,
}

fn pow10(exp: usize) -> UBig {
    UBig::from(10u8).pow(exp)
}

/// Integer division of `n` by a positive `d`, rounding half away from zero
fn div_round_half_away(n: &IBig, d: &IBig) -> IBig {
    let q = n / d;
    let r = n % d;
    let r_abs = if r < IBig::ZERO { -r } else { r };
    if r_abs * IBig::from(2u8) >= *d {
        if *n < IBig::ZERO {
            q - IBig::ONE
        } else {
            q + IBig::ONE
        }
    } else {
        q
    }
}

/// Parse "[-+]digits[.digits]" exactly
fn parse_decimal(s: &str) -> Result<RBig, NumberError> {
    let err = || NumberError::ParseError(s.to_string());
    let (negative, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, f),
        None => (body, ""),
    };
    let digits = format!("{}{}", int_part, frac_part);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }
    let magnitude: IBig = digits.parse().map_err(|_| err())?;
    let numerator = if negative { -magnitude } else { magnitude };
    Ok(RBig::from_parts(numerator, pow10(frac_part.len())))
}

impl Number {
    // ========== Construction ==========

    /// Create from string representation
    /// Supports: "123", "3.14", "1/3", "1.5e10", "-42"
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();

        if let Some((num_str, den_str)) = s.split_once('/') {
            let num = parse_decimal(num_str.trim())?;
            let den = parse_decimal(den_str.trim())?;
            if den == RBig::ZERO {
                return Err(NumberError::DivisionByZero);
            }
            return Ok(Self { inner: num / den });
        }

        let lower = s.to_ascii_lowercase();
        if let Some((mantissa, exp)) = lower.split_once('e') {
            let mantissa = parse_decimal(mantissa)?;
            let exp: i32 = exp.parse()
                .map_err(|_| NumberError::ParseError(s.to_string()))?;
            if exp.unsigned_abs() > MAX_EXPONENT {
                return Err(NumberError::Overflow);
            }
            let scale = RBig::from_parts(IBig::from(pow10(exp.unsigned_abs() as usize)), UBig::ONE);
            let inner = if exp >= 0 { mantissa * scale } else { mantissa / scale };
            return Ok(Self { inner });
        }

        Ok(Self { inner: parse_decimal(s)? })
    }

    pub fn from_i64(n: i64) -> Self {
        Self { inner: RBig::from_parts(IBig::from(n), UBig::ONE) }
    }

    /// Create from ratio (exact division). A zero denominator yields zero.
    pub fn from_ratio(num: i64, den: i64) -> Self {
        Self::from_ratio_i128(num as i128, den as i128)
    }

    /// Create from a wide ratio, used for unit amounts over their multiplier
    pub fn from_ratio_i128(num: i128, den: i128) -> Self {
        if den == 0 {
            return Self { inner: RBig::ZERO };
        }
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        Self { inner: RBig::from_parts(IBig::from(num), UBig::from(den as u128)) }
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        self.inner == RBig::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.inner < RBig::ZERO
    }

    pub fn is_integer(&self) -> bool {
        *self.inner.denominator() == UBig::ONE
    }

    // ========== Basic Arithmetic ==========

    pub fn add(&self, other: &Self) -> Self {
        Self { inner: &self.inner + &other.inner }
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self { inner: &self.inner - &other.inner }
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self { inner: &self.inner * &other.inner }
    }

    /// Safe division (returns Result, never panics)
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            Err(NumberError::DivisionByZero)
        } else {
            Ok(Self { inner: &self.inner / &other.inner })
        }
    }

    pub fn neg(&self) -> Self {
        Self { inner: -self.inner.clone() }
    }

    pub fn abs(&self) -> Self {
        if self.is_negative() { self.neg() } else { self.clone() }
    }

    // ========== Conversion ==========

    /// Numerator and (positive) denominator in lowest terms, if both fit in i128
    pub fn to_ratio_i128(&self) -> Option<(i128, i128)> {
        let num = i128::try_from(self.inner.numerator().clone()).ok()?;
        let den = i128::try_from(self.inner.denominator().clone()).ok()?;
        Some((num, den))
    }

    /// Try to convert to i64 (integers only)
    pub fn to_i64(&self) -> Option<i64> {
        if !self.is_integer() {
            return None;
        }
        i64::try_from(self.inner.numerator().clone()).ok()
    }

    /// Number of decimal places needed to write this value exactly,
    /// or None when the expansion does not terminate
    pub fn terminating_places(&self) -> Option<u32> {
        let mut den = self.inner.denominator().clone();
        let two = UBig::from(2u8);
        let five = UBig::from(5u8);
        let (mut twos, mut fives) = (0u32, 0u32);
        while &den % &two == UBig::ZERO {
            den = den / &two;
            twos += 1;
        }
        while &den % &five == UBig::ZERO {
            den = den / &five;
            fives += 1;
        }
        (den == UBig::ONE).then_some(twos.max(fives))
    }

    // ========== Display ==========

    /// Render as decimal string with exactly `places` decimal places,
    /// rounding half away from zero
    pub fn as_decimal(&self, places: u32) -> String {
        let scaled = self.inner.numerator().clone() * IBig::from(pow10(places as usize));
        let den = IBig::from(self.inner.denominator().clone());
        let rounded = div_round_half_away(&scaled, &den);

        let negative = rounded < IBig::ZERO;
        let magnitude = if negative { -rounded } else { rounded };
        let mut digits = magnitude.to_string();
        let places = places as usize;
        if places > 0 {
            if digits.len() <= places {
                digits = format!("{}{}", "0".repeat(places + 1 - digits.len()), digits);
            }
            digits.insert(digits.len() - places, '.');
        }
        if negative { format!("-{}", digits) } else { digits }
    }

    /// Lossless text: the exact decimal when it terminates within the
    /// display range, otherwise `numerator/denominator`. `from_str` reads
    /// either form back to the same value.
    pub fn to_exact_string(&self) -> String {
        match self.terminating_places() {
            Some(places) if places <= 2 * DISPLAY_PLACES => self.as_decimal(places),
            _ => format!("{}/{}", self.inner.numerator(), self.inner.denominator()),
        }
    }

    /// Like `as_decimal`, with trailing fractional zeros removed
    pub fn as_trimmed_decimal(&self, places: u32) -> String {
        let s = self.as_decimal(places);
        if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            s
        }
    }
}

// ========== Trait Implementations ==========

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.terminating_places() {
            Some(places) if places <= 2 * DISPLAY_PLACES => write!(f, "{}", self.as_decimal(places)),
            _ => write!(f, "{}", self.as_trimmed_decimal(DISPLAY_PLACES)),
        }
    }
}

impl std::hash::Hash for Number {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.numerator().hash(state);
        self.inner.denominator().hash(state);
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_exact_string())
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::from_i64(n)
    }
}
