//! Arithmetic on operand strings.
//!
//! Operands stay strings while they are typed; they are only parsed here,
//! at the moment an operator is folded into a result.

use crate::calculator::Operator;
use crate::error::CalcError;

/// Results are rounded to this many decimal places.
const ROUNDING_SCALE: f64 = 100_000_000.0;

/// 2^53: above this every `f64` is an integer.
const MAX_EXACT_SCALED: f64 = 9_007_199_254_740_992.0;

/// Parse an operand string, returning `None` unless it is a finite number.
///
/// Partial entries such as `"-0."` and `"12."` parse to their obvious values.
pub fn parse_operand(operand: &str) -> Option<f64> {
    operand.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Apply `operator` to two already parsed operands and return the operand
/// string for the result.
pub fn compute(previous: f64, operator: Operator, current: f64) -> Result<String, CalcError> {
    let value = match operator {
        Operator::Add => previous + current,
        Operator::Subtract => previous - current,
        Operator::Multiply => previous * current,
        Operator::Divide => {
            if current == 0.0 {
                return Err(CalcError::DivideByZero);
            }
            previous / current
        }
    };

    if !value.is_finite() {
        return Err(CalcError::Overflow);
    }

    Ok(format_result(round_result(value)))
}

/// Round to eight decimal places to hide binary floating point noise.
///
/// Once the scaled value has no fractional precision left (2^53 and up) the
/// value is already integral at eight places, so it passes through unchanged.
fn round_result(value: f64) -> f64 {
    let scaled = value * ROUNDING_SCALE;
    if !scaled.is_finite() || scaled.abs() >= MAX_EXACT_SCALED {
        return value;
    }
    scaled.round() / ROUNDING_SCALE
}

/// Render a result as a plain decimal literal (never exponent notation).
fn format_result(value: f64) -> String {
    // A zero result is always shown unsigned.
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}
