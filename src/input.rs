//! Mapping keys and button attributes to calculator inputs.
//!
//! Keyboard keys use the browser `KeyboardEvent.key` names (`Enter`,
//! `Backspace`, `Escape`). Key sequences, as accepted on the command line,
//! spell named keys in braces: `12+3{Backspace}4=`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::calculator::Operator;
use crate::error::InputError;

lazy_static! {
    /// One token of a key sequence: a `{Named}` key or a single character.
    static ref KEY_TOKEN: Regex = Regex::new(r"\{([A-Za-z]+)\}|(\S)").unwrap();
}

/// A single user input understood by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Input {
    /// A digit `0`-`9` or the decimal point.
    Digit(char),
    Operator(Operator),
    Equals,
    Delete,
    Clear,
}

impl Input {
    /// Map a keyboard key name to an input. Unhandled keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        if let Some(operator) = Operator::from_symbol(key) {
            return Some(Self::Operator(operator));
        }

        match key {
            "Enter" | "=" => Some(Self::Equals),
            "Backspace" => Some(Self::Delete),
            "Escape" => Some(Self::Clear),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() || c == '.' => Some(Self::Digit(c)),
                    _ => None,
                }
            }
        }
    }

    /// Map a keypad button's data attributes to an input.
    ///
    /// A button carries exactly one of `data-number`, `data-operator` or
    /// `data-action`; the first one present wins.
    pub fn from_button(
        number: Option<&str>,
        operator: Option<&str>,
        action: Option<&str>,
    ) -> Result<Option<Self>, InputError> {
        if let Some(number) = number {
            return match Self::from_key(number) {
                Some(input @ Self::Digit(_)) => Ok(Some(input)),
                _ => Err(InputError::UnknownKey(number.to_string())),
            };
        }
        if let Some(operator) = operator {
            return operator.parse().map(|op| Some(Self::Operator(op)));
        }
        match action {
            Some("reset") => Ok(Some(Self::Clear)),
            Some("delete") => Ok(Some(Self::Delete)),
            Some("equals") => Ok(Some(Self::Equals)),
            Some(other) => Err(InputError::UnknownAction(other.to_string())),
            None => Ok(None),
        }
    }
}

/// Split a key sequence into inputs. Whitespace between keys is ignored.
pub fn parse_keys(sequence: &str) -> Result<Vec<Input>, InputError> {
    KEY_TOKEN
        .captures_iter(sequence)
        .map(|caps| {
            let key = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            Input::from_key(key).ok_or_else(|| InputError::UnknownKey(key.to_string()))
        })
        .collect()
}
