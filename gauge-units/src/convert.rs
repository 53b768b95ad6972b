//! Value construction and conversion between units
//!
//! Construction turns an exact ratio into a sub-unit amount:
//! - SI truncates toward zero below one sub-unit
//! - US Customary must land on a whole sub-unit or fails
//! - Temperature rounds half away from zero
//!
//! Conversion across measurement systems goes through the family's exact
//! bridge ratio and rounds half away from zero.

use gauge_core::Number;
use tracing::debug;
use crate::diagnostics::suggest_suffixes;
use crate::literal::{decode_literal, DecodedLiteral};
use crate::registry::{self, Family, System, UnitDescriptor};
use crate::{UnitError, UnitValue};

pub(crate) fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Divide by a positive `d`, rounding half away from zero.
/// The tie test never doubles the remainder, so any `d` up to `i128::MAX` works.
pub(crate) fn div_half_away(n: i128, d: i128) -> i128 {
    let q = n / d;
    let r = n % d;
    if r.unsigned_abs() >= d.unsigned_abs() - r.unsigned_abs() {
        if n < 0 { q - 1 } else { q + 1 }
    } else {
        q
    }
}

pub(crate) fn narrow(v: i128) -> Result<i64, UnitError> {
    i64::try_from(v).map_err(|_| UnitError::Overflow)
}

pub(crate) fn checked_mul(a: i128, b: i128) -> Result<i128, UnitError> {
    a.checked_mul(b).ok_or(UnitError::Overflow)
}

/// Exact ratio as literal number text: integer, terminating decimal or fraction
fn ratio_text(num: i128, den: i128) -> String {
    let n = Number::from_ratio_i128(num, den);
    if n.terminating_places().is_some() {
        n.to_string()
    } else {
        let g = gcd(num, den);
        format!("{}/{}", num / g, den / g)
    }
}

/// Resolve a suffix, reporting the closest known suffixes on a miss
pub fn resolve(suffix: &str) -> Result<&'static UnitDescriptor, UnitError> {
    resolve_expecting(suffix, None)
}

/// Resolve a suffix where a value of `family` is expected
pub fn resolve_expecting(
    suffix: &str,
    family: Option<Family>,
) -> Result<&'static UnitDescriptor, UnitError> {
    registry::lookup(suffix).ok_or_else(|| UnitError::UnknownSuffix {
        suffix: suffix.to_string(),
        suggestions: suggest_suffixes(suffix, family),
        expected: family,
    })
}

fn build(
    num: i128,
    den: i128,
    unit: &'static UnitDescriptor,
    text: impl FnOnce() -> String,
) -> Result<UnitValue, UnitError> {
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    if den == 0 {
        return Err(UnitError::DivisionByZero);
    }

    let amount = match (unit.system, unit.temperature) {
        (System::Temperature, Some(t)) => {
            let scaled = checked_mul(num, t.scale as i128)?;
            let rounded = div_half_away(scaled, den);
            if scaled % den != 0 {
                debug!(unit = unit.suffix, "temperature rounded to nearest sub-kelvin");
            }
            rounded.checked_add(t.zero_offset as i128).ok_or(UnitError::Overflow)?
        }
        (System::Us, _) => {
            let scaled = checked_mul(num, unit.multiplier as i128)?;
            if scaled % den != 0 {
                return Err(UnitError::NonExactFraction {
                    value: text(),
                    suffix: unit.suffix,
                    name: unit.name,
                });
            }
            scaled / den
        }
        _ => {
            let scaled = checked_mul(num, unit.multiplier as i128)?;
            if scaled % den != 0 {
                debug!(unit = unit.suffix, "truncated below one sub-unit");
            }
            scaled / den
        }
    };

    Ok(UnitValue::from_amount(narrow(amount)?, unit))
}

/// Convert a value's amount into `system` within its own family
pub(crate) fn align(value: &UnitValue, system: System) -> Result<i64, UnitError> {
    if value.system() == system {
        return Ok(value.amount());
    }
    let bridge = registry::bridge(value.family()).ok_or_else(|| {
        UnitError::Unsupported(format!("{} values have a single measurement system", value.family()))
    })?;
    let amount = value.amount() as i128;
    let aligned = match system {
        System::Si => div_half_away(checked_mul(amount, bridge.numerator)?, bridge.denominator),
        _ => div_half_away(checked_mul(amount, bridge.denominator)?, bridge.numerator),
    };
    debug!(
        family = %value.family(),
        from = %value.system(),
        to = %system,
        amount = value.amount(),
        aligned = %aligned,
        "crossed measurement systems"
    );
    narrow(aligned)
}

/// Exact amount of `value` in `system` as (numerator, positive denominator)
pub(crate) fn exact_in_system(value: &UnitValue, system: System) -> Result<(i128, i128), UnitError> {
    if value.system() == system {
        return Ok((value.amount() as i128, 1));
    }
    let bridge = registry::bridge(value.family()).ok_or_else(|| {
        UnitError::Unsupported(format!("{} values have a single measurement system", value.family()))
    })?;
    let amount = value.amount() as i128;
    Ok(match system {
        System::Si => (checked_mul(amount, bridge.numerator)?, bridge.denominator),
        _ => (checked_mul(amount, bridge.denominator)?, bridge.numerator),
    })
}

impl UnitValue {
    /// Construct from a decoded literal
    pub fn construct(decoded: &DecodedLiteral) -> Result<Self, UnitError> {
        let unit = resolve(&decoded.suffix)?;
        let (num, den) = decoded.ratio();
        build(num, den, unit, || decoded.number_text())
    }

    /// Decode and construct a literal such as `#3/8in` (sigil optional)
    pub fn parse(text: &str) -> Result<Self, UnitError> {
        Self::construct(&decode_literal(text)?)
    }

    /// Construct from an exact ratio in `unit`
    pub fn from_ratio(num: i128, den: i128, unit: &'static UnitDescriptor) -> Result<Self, UnitError> {
        build(num, den, unit, || ratio_text(num, den))
    }

    /// Construct from a host number in `unit`, taking the number exactly
    pub fn from_number(n: &Number, unit: &'static UnitDescriptor) -> Result<Self, UnitError> {
        let (num, den) = n.to_ratio_i128().ok_or(UnitError::Overflow)?;
        build(num, den, unit, || n.to_string())
    }

    /// Convert to another suffix of the same family
    pub fn to(&self, suffix: &str) -> Result<Self, UnitError> {
        let target = resolve_expecting(suffix, Some(self.family()))?;
        self.convert_to(target)
    }

    pub fn convert_to(&self, target: &'static UnitDescriptor) -> Result<Self, UnitError> {
        if target.family != self.family() {
            return Err(UnitError::CrossFamily {
                op: "convert",
                left: self.family(),
                right: target.family,
            });
        }
        Ok(UnitValue::from_amount(align(self, target.system)?, target))
    }
}
