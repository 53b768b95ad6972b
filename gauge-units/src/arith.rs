//! Arithmetic on unit values
//!
//! Binary operations align the right operand into the left operand's
//! system, and the result keeps the left operand's system and display unit.

use std::cmp::Ordering;
use gauge_core::Number;
use tracing::debug;
use crate::convert::{align, checked_mul, div_half_away, exact_in_system, narrow};
use crate::{UnitError, UnitValue};

impl UnitValue {
    fn same_family(&self, other: &Self, op: &'static str) -> Result<(), UnitError> {
        if self.family() == other.family() {
            Ok(())
        } else {
            Err(UnitError::CrossFamily { op, left: self.family(), right: other.family() })
        }
    }

    /// Sub-kelvin amount of the left operand's zero, or 0 outside temperature
    fn zero_offset(&self) -> i64 {
        self.unit().temperature.map_or(0, |t| t.zero_offset)
    }

    /// Add a value of the same family.
    ///
    /// Temperatures add as readings in the left operand's scale, so
    /// `#20C + #10C` is `#30C`.
    pub fn add(&self, other: &Self) -> Result<Self, UnitError> {
        self.same_family(other, "add")?;
        let a = self.amount() as i128;
        let b = align(other, self.system())? as i128;
        let sum = if self.is_temperature() { a + b - self.zero_offset() as i128 } else { a + b };
        Ok(self.with_amount(narrow(sum)?))
    }

    pub fn sub(&self, other: &Self) -> Result<Self, UnitError> {
        self.same_family(other, "subtract")?;
        let a = self.amount() as i128;
        let b = align(other, self.system())? as i128;
        let diff = if self.is_temperature() { a - b + self.zero_offset() as i128 } else { a - b };
        Ok(self.with_amount(narrow(diff)?))
    }

    /// Flip the sign; temperatures flip their reading in their own scale
    pub fn neg(&self) -> Result<Self, UnitError> {
        let a = self.amount() as i128;
        let negated = if self.is_temperature() { 2 * self.zero_offset() as i128 - a } else { -a };
        Ok(self.with_amount(narrow(negated)?))
    }

    pub fn abs(&self) -> Result<Self, UnitError> {
        if self.amount() < self.zero_offset() { self.neg() } else { Ok(*self) }
    }

    /// Scale by a number, rounding half away from zero below one sub-unit
    pub fn mul_scalar(&self, n: &Number) -> Result<Self, UnitError> {
        if self.is_temperature() {
            return Err(UnitError::InvalidTemperature { op: "multiply" });
        }
        let (p, q) = n.to_ratio_i128().ok_or(UnitError::Overflow)?;
        let scaled = checked_mul(self.amount() as i128, p)?;
        let amount = div_half_away(scaled, q);
        if scaled % q != 0 {
            debug!(unit = self.display_hint(), factor = %n, "product rounded to nearest sub-unit");
        }
        Ok(self.with_amount(narrow(amount)?))
    }

    /// Divide by a number, truncating toward zero below one sub-unit
    pub fn div_scalar(&self, n: &Number) -> Result<Self, UnitError> {
        if self.is_temperature() {
            return Err(UnitError::InvalidTemperature { op: "divide" });
        }
        if n.is_zero() {
            return Err(UnitError::DivisionByZero);
        }
        let (p, q) = n.to_ratio_i128().ok_or(UnitError::Overflow)?;
        let scaled = checked_mul(self.amount() as i128, q)?;
        Ok(self.with_amount(narrow(scaled / p)?))
    }

    /// Exact ratio of two same-family values, as a plain number.
    ///
    /// Unlike `add` and `compare`, the right operand is not rounded into the
    /// left operand's sub-units first. Its exact rational amount in that
    /// system is used, so `#1in / #1cm` is exactly `127/50` rather than the
    /// ratio of two rounded integers.
    pub fn ratio(&self, other: &Self) -> Result<Number, UnitError> {
        self.same_family(other, "divide")?;
        if self.is_temperature() {
            return Err(UnitError::InvalidTemperature { op: "divide" });
        }
        let (bn, bd) = exact_in_system(other, self.system())?;
        if bn == 0 {
            return Err(UnitError::DivisionByZero);
        }
        let num = checked_mul(self.amount() as i128, bd)?;
        Ok(Number::from_ratio_i128(num, bn))
    }

    /// Compare after aligning `other` into this value's system
    pub fn compare(&self, other: &Self) -> Result<Ordering, UnitError> {
        self.same_family(other, "compare")?;
        let b = align(other, self.system())?;
        Ok(self.amount().cmp(&b))
    }

    /// Equality as seen by the evaluator: other families are simply unequal
    pub fn equals(&self, other: &Self) -> bool {
        matches!(self.compare(other), Ok(Ordering::Equal))
    }
}
