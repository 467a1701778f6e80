//! Checked arithmetic used by every engine step.
//!
//! Failures come back as [`ArithmeticError`] and are given context (which
//! action, which quantity) by the caller before surfacing as a
//! [`ComputationError`].

use super::ComputationError;
use crate::domain::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    DivisionByZero,
    Overflow,
}

impl ArithmeticError {
    /// Attach a description of what was being computed.
    pub fn context(self, context: impl Into<String>) -> ComputationError {
        let context = context.into();
        match self {
            ArithmeticError::DivisionByZero => ComputationError::DivisionByZero { context },
            ArithmeticError::Overflow => ComputationError::Overflow { context },
        }
    }
}

pub type Checked<T> = Result<T, ArithmeticError>;

pub fn add(a: Decimal, b: Decimal) -> Checked<Decimal> {
    a.checked_add(b).ok_or(ArithmeticError::Overflow)
}

pub fn sub(a: Decimal, b: Decimal) -> Checked<Decimal> {
    a.checked_sub(b).ok_or(ArithmeticError::Overflow)
}

pub fn mul(a: Decimal, b: Decimal) -> Checked<Decimal> {
    a.checked_mul(b).ok_or(ArithmeticError::Overflow)
}

/// Division that never yields infinity: a zero divisor is an error unless the
/// numerator is itself zero, in which case the quotient is zero.
pub fn div(num: Decimal, den: Decimal) -> Checked<Decimal> {
    if num.is_zero() {
        return Ok(Decimal::zero());
    }
    if den.is_zero() {
        return Err(ArithmeticError::DivisionByZero);
    }
    num.checked_div(den).ok_or(ArithmeticError::Overflow)
}

/// `units × depth ÷ total_units` without materializing the share ratio.
///
/// The product is formed in 128-bit integers and only the remainder fraction
/// goes through decimal division, so the result is exact to the decimal's
/// precision.
pub fn pro_rata(units: u128, depth: u128, total_units: u128) -> Checked<Decimal> {
    if units == 0 {
        return Ok(Decimal::zero());
    }
    if total_units == 0 {
        return Err(ArithmeticError::DivisionByZero);
    }
    let product = units.checked_mul(depth).ok_or(ArithmeticError::Overflow)?;
    let whole = to_decimal(product / total_units)?;
    let remainder = to_decimal(product % total_units)?;
    let fraction = div(remainder, to_decimal(total_units)?)?;
    add(whole, fraction)
}

fn to_decimal(value: u128) -> Checked<Decimal> {
    Decimal::from_u128(value).ok_or(ArithmeticError::Overflow)
}
