//! Unit literal decoding
//!
//! A unit literal is a sigil, an optional sign, a number and a suffix:
//! `#12m`, `#-2.5kg`, `#3/8in`, `#92+5/8in`. Decoding only splits the text;
//! whether the suffix exists is decided at construction.

use std::ops::Range;
use serde::Serialize;
use tracing::trace;
use crate::UnitError;

/// Sigil that opens a unit literal in host source text
pub const SIGIL: char = '#';

/// Number shape as written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralForm {
    Integer,
    Decimal,
    Fraction,
    Mixed,
}

/// Structured, suffix-agnostic form of a unit literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedLiteral {
    pub negative: bool,
    pub whole: i64,
    pub numerator: i64,
    /// 1 for integers, 10^k for decimals, as written for fractions
    pub denominator: i64,
    pub suffix: String,
    pub form: LiteralForm,
}

impl DecodedLiteral {
    /// Signed value as an exact ratio with a positive denominator
    pub fn ratio(&self) -> (i128, i128) {
        let den = self.denominator as i128;
        let magnitude = self.whole as i128 * den + self.numerator as i128;
        (if self.negative { -magnitude } else { magnitude }, den)
    }

    /// The number part as written, without sign normalisation
    pub fn number_text(&self) -> String {
        let sign = if self.negative { "-" } else { "" };
        match self.form {
            LiteralForm::Integer => format!("{}{}", sign, self.whole),
            LiteralForm::Decimal => {
                let places = self.denominator.to_string().len() - 1;
                format!("{}{}.{:0width$}", sign, self.whole, self.numerator, width = places)
            }
            LiteralForm::Fraction => format!("{}{}/{}", sign, self.numerator, self.denominator),
            LiteralForm::Mixed => {
                format!("{}{}+{}/{}", sign, self.whole, self.numerator, self.denominator)
            }
        }
    }
}

/// Read a run of ASCII digits, returning the value and the digit count
fn read_digits(src: &str, pos: &mut usize) -> Result<Option<(i64, usize)>, UnitError> {
    let bytes = src.as_bytes();
    let start = *pos;
    let mut value: i64 = 0;
    while let Some(b) = bytes.get(*pos).filter(|b| b.is_ascii_digit()) {
        value = value.checked_mul(10)
            .and_then(|v| v.checked_add((b - b'0') as i64))
            .ok_or_else(|| UnitError::malformed(src, "number is too large"))?;
        *pos += 1;
    }
    Ok((*pos > start).then_some((value, *pos - start)))
}

/// Decode the payload that follows the sigil
pub fn decode(payload: &str) -> Result<DecodedLiteral, UnitError> {
    let bytes = payload.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => { pos = 1; true }
        Some(b'+') => { pos = 1; false }
        _ => false,
    };

    let (first, _) = read_digits(payload, &mut pos)?
        .ok_or_else(|| UnitError::malformed(payload, "expected a number"))?;

    let (whole, numerator, denominator, form) = match bytes.get(pos) {
        Some(b'.') => {
            pos += 1;
            let (frac, places) = read_digits(payload, &mut pos)?
                .ok_or_else(|| UnitError::malformed(payload, "expected digits after the decimal point"))?;
            let den = 10i64.checked_pow(places as u32)
                .ok_or_else(|| UnitError::malformed(payload, "too many decimal places"))?;
            (first, frac, den, LiteralForm::Decimal)
        }
        Some(b'/') => {
            pos += 1;
            let (den, _) = read_digits(payload, &mut pos)?
                .ok_or_else(|| UnitError::malformed(payload, "expected a denominator after '/'"))?;
            (0, first, den, LiteralForm::Fraction)
        }
        Some(b'+') => {
            pos += 1;
            let (num, _) = read_digits(payload, &mut pos)?
                .ok_or_else(|| UnitError::malformed(payload, "expected a fraction after '+'"))?;
            if bytes.get(pos) != Some(&b'/') {
                return Err(UnitError::malformed(payload, "expected '/' in mixed number"));
            }
            pos += 1;
            let (den, _) = read_digits(payload, &mut pos)?
                .ok_or_else(|| UnitError::malformed(payload, "expected a denominator after '/'"))?;
            (first, num, den, LiteralForm::Mixed)
        }
        _ => (first, 0, 1, LiteralForm::Integer),
    };

    if denominator == 0 {
        return Err(UnitError::malformed(payload, "denominator is zero"));
    }

    let suffix_start = pos;
    while bytes.get(pos).is_some_and(|b| b.is_ascii_alphabetic()) {
        pos += 1;
    }
    if pos == suffix_start {
        let reason = if pos == bytes.len() { "missing unit suffix" } else { "unexpected character" };
        return Err(UnitError::malformed(payload, reason));
    }
    if pos != bytes.len() {
        return Err(UnitError::malformed(payload, "unexpected characters after the unit suffix"));
    }

    let decoded = DecodedLiteral {
        negative,
        whole,
        numerator,
        denominator,
        suffix: payload[suffix_start..].to_string(),
        form,
    };
    trace!(payload, ?decoded, "decoded unit literal");
    Ok(decoded)
}

/// Decode a full literal, with or without the leading sigil
pub fn decode_literal(text: &str) -> Result<DecodedLiteral, UnitError> {
    let text = text.trim();
    decode(text.strip_prefix(SIGIL).unwrap_or(text))
}

// ========== Lexer boundary ==========

/// What a `#` in host source text opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigilKind {
    Unit,
    /// Currency literal such as `USD#12.50`, handled by the Money type
    Currency,
}

fn digit_at(bytes: &[u8], pos: usize) -> bool {
    bytes.get(pos).is_some_and(|b| b.is_ascii_digit())
}

fn skip_digits(bytes: &[u8], mut pos: usize) -> usize {
    while digit_at(bytes, pos) {
        pos += 1;
    }
    pos
}

/// Classify the `#` at byte offset `pos`, or None if it opens neither literal
pub fn classify_sigil(src: &str, pos: usize) -> Option<SigilKind> {
    let bytes = src.as_bytes();
    if bytes.get(pos) != Some(&b'#') {
        return None;
    }
    if pos > 0 && bytes[pos - 1].is_ascii_uppercase() {
        return Some(SigilKind::Currency);
    }
    let mut next = pos + 1;
    if matches!(bytes.get(next), Some(b'-' | b'+')) {
        next += 1;
    }
    digit_at(bytes, next).then_some(SigilKind::Unit)
}

/// Byte span of the unit literal opened at `pos`, sigil included.
///
/// A `+` only extends the literal when it introduces a mixed fraction,
/// so `#1m+#2m` scans as two literals.
pub fn scan_unit_literal(src: &str, pos: usize) -> Option<Range<usize>> {
    if classify_sigil(src, pos) != Some(SigilKind::Unit) {
        return None;
    }
    let bytes = src.as_bytes();
    let mut end = pos + 1;
    if matches!(bytes.get(end), Some(b'-' | b'+')) {
        end += 1;
    }
    end = skip_digits(bytes, end);

    match bytes.get(end) {
        Some(b'.' | b'/') if digit_at(bytes, end + 1) => {
            end = skip_digits(bytes, end + 1);
        }
        Some(b'+') => {
            let num_end = skip_digits(bytes, end + 1);
            if num_end > end + 1 && bytes.get(num_end) == Some(&b'/') && digit_at(bytes, num_end + 1) {
                end = skip_digits(bytes, num_end + 1);
            }
        }
        _ => {}
    }

    while bytes.get(end).is_some_and(|b| b.is_ascii_alphabetic()) {
        end += 1;
    }
    Some(pos..end)
}
