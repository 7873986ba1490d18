//! Calculator state and the operators it understands.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::InputError;

lazy_static! {
    /// A complete or partially typed signed decimal: `0`, `-0`, `12`, `-0.`, `3.25`.
    static ref OPERAND_SYNTAX: Regex = Regex::new(r"^-?[0-9]+(\.[0-9]*)?$").unwrap();
}

/// Arithmetic operator pending between two operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Glyph shown after the previous operand. Multiplication is a lowercase `x`.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "x",
            Self::Divide => "/",
        }
    }

    /// Name used by button `data-operator` attributes.
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }

    /// Map a keyboard symbol to an operator.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "*" | "x" => Some(Self::Multiply),
            "/" => Some(Self::Divide),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

impl FromStr for Operator {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| InputError::UnknownOperator(s.to_string()))
    }
}

/// Everything the engine remembers between inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorState {
    /// Operand being typed, or the last result.
    pub current_operand: String,
    /// Left-hand operand captured when the operator was chosen. Empty when none.
    pub previous_operand: String,
    /// Operator waiting for its right-hand operand.
    pub operator: Option<Operator>,
    /// Set right after equals; the next digit starts a fresh operand.
    pub has_result: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            current_operand: "0".to_string(),
            previous_operand: String::new(),
            operator: None,
            has_result: false,
        }
    }
}

impl CalculatorState {
    /// Whether this is the state a fresh or cleared calculator is in.
    pub fn is_initial(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a clear would change anything visible.
    pub fn is_clear(&self) -> bool {
        self.current_operand == "0" && self.previous_operand.is_empty()
    }

    /// Check the structural invariants, returning the first one violated.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.operator.is_none() != self.previous_operand.is_empty() {
            return Err(format!(
                "operator {:?} does not match previous operand {:?}",
                self.operator, self.previous_operand
            ));
        }
        if !is_operand(&self.current_operand) {
            return Err(format!(
                "current operand {:?} is not a decimal literal",
                self.current_operand
            ));
        }
        if !self.previous_operand.is_empty() && !is_operand(&self.previous_operand) {
            return Err(format!(
                "previous operand {:?} is not a decimal literal",
                self.previous_operand
            ));
        }
        Ok(())
    }
}

/// Whether `s` is a (possibly partial) signed decimal literal.
///
/// Rejects the bare sign, a second decimal point and exponent notation.
pub fn is_operand(s: &str) -> bool {
    OPERAND_SYNTAX.is_match(s)
}
