//! The calculator engine: a synchronous state machine over key inputs.
//!
//! Each operation mutates the owned [`CalculatorState`] and reports the new
//! display text together with an [`AnimationIntent`] describing the kind of
//! transition. The engine knows nothing about timing; presenters decide how
//! (and whether) to animate.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::calculator::evaluation::{compute, parse_operand};
use crate::calculator::format::{current_display, previous_display};
use crate::calculator::{CalculatorState, Operator};
use crate::error::CalcError;
use crate::input::Input;

/// Kind of display transition produced by an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationIntent {
    DigitEnter,
    DigitDelete,
    Operator,
    Result,
    Reset,
    /// Nothing changed; render nothing.
    None,
}

impl AnimationIntent {
    pub fn label(self) -> &'static str {
        match self {
            Self::DigitEnter => "digit-enter",
            Self::DigitDelete => "digit-delete",
            Self::Operator => "operator",
            Self::Result => "result",
            Self::Reset => "reset",
            Self::None => "none",
        }
    }
}

/// Display text emitted by one operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub current: String,
    pub previous: String,
    pub intent: AnimationIntent,
}

/// Running-total calculator. Owns its state; no operator precedence.
#[derive(Clone, Debug, Default)]
pub struct Calculator {
    state: CalculatorState,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from an existing state.
    pub fn from_state(state: CalculatorState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// Current display text tagged with `intent`.
    pub fn snapshot(&self, intent: AnimationIntent) -> Update {
        Update {
            current: current_display(&self.state),
            previous: previous_display(&self.state),
            intent,
        }
    }

    /// Route one input to the matching operation.
    pub fn dispatch(&mut self, input: Input) -> Result<Update, CalcError> {
        trace!(?input, "dispatch");
        match input {
            Input::Digit(token) => Ok(self.enter_digit(token)),
            Input::Operator(operator) => self.apply_operator(operator),
            Input::Equals => self.equals(),
            Input::Delete => Ok(self.delete_last()),
            Input::Clear => Ok(self.clear()),
        }
    }

    /// Type a digit or the decimal point.
    pub fn enter_digit(&mut self, token: char) -> Update {
        if !(token.is_ascii_digit() || token == '.') {
            debug!(%token, "ignoring non-digit token");
            return self.snapshot(AnimationIntent::None);
        }

        if self.state.has_result {
            self.state.current_operand = "0".to_string();
            self.state.has_result = false;
        }

        if token == '.' && self.state.current_operand.contains('.') {
            return self.finish(AnimationIntent::None);
        }

        let replacement = match self.state.current_operand.as_str() {
            "0" if token != '.' => Some(token.to_string()),
            "-0" if token == '.' => Some("-0.".to_string()),
            "-0" => Some(format!("-{}", token)),
            _ => None,
        };
        match replacement {
            Some(operand) => self.state.current_operand = operand,
            None => self.state.current_operand.push(token),
        }

        self.finish(AnimationIntent::DigitEnter)
    }

    /// Select an operator, folding any pending operation first.
    ///
    /// Subtract on an empty entry starts a negative number instead.
    pub fn apply_operator(&mut self, operator: Operator) -> Result<Update, CalcError> {
        let current = self.state.current_operand.as_str();

        if operator == Operator::Subtract
            && self.state.previous_operand.is_empty()
            && matches!(current, "0" | "-0" | "")
        {
            self.state.current_operand = "-0".to_string();
            self.state.has_result = false;
            return Ok(self.finish(AnimationIntent::DigitEnter));
        }

        if current.is_empty() || current == "-" {
            return Ok(self.finish(AnimationIntent::None));
        }

        if !self.state.previous_operand.is_empty() && self.state.operator.is_some() {
            self.evaluate()?;
        }

        self.state.operator = Some(operator);
        self.state.previous_operand =
            std::mem::replace(&mut self.state.current_operand, "0".to_string());
        self.state.has_result = false;

        debug!(%operator, previous = %self.state.previous_operand, "operator applied");
        Ok(self.finish(AnimationIntent::Operator))
    }

    /// Compute the pending operation and show the result.
    pub fn equals(&mut self) -> Result<Update, CalcError> {
        if self.evaluate()? {
            Ok(self.finish(AnimationIntent::Result))
        } else {
            Ok(self.finish(AnimationIntent::None))
        }
    }

    /// Remove the last typed character. A shown result is cleared instead.
    pub fn delete_last(&mut self) -> Update {
        if self.state.has_result {
            return self.clear();
        }

        let current = self.state.current_operand.as_str();
        if current == "0" {
            return self.finish(AnimationIntent::None);
        }

        if current.chars().count() <= 1 || current == "-0" {
            self.state.current_operand = "0".to_string();
        } else {
            self.state.current_operand.pop();
            if self.state.current_operand == "-" {
                self.state.current_operand = "-0".to_string();
            }
        }

        self.finish(AnimationIntent::DigitDelete)
    }

    /// Reset to the initial state. Only reports a transition when something
    /// visible changed.
    pub fn clear(&mut self) -> Update {
        let changed = !self.state.is_clear();
        self.state = CalculatorState::default();
        self.finish(if changed {
            AnimationIntent::Reset
        } else {
            AnimationIntent::None
        })
    }

    /// Raw value of the current operand for copying elsewhere.
    pub fn clipboard_text(&self) -> String {
        let trimmed = self.state.current_operand.trim_end_matches('.');
        match trimmed {
            "" | "-" | "-0" => "0".to_string(),
            other => other.to_string(),
        }
    }

    /// Fold the pending operation into the current operand.
    ///
    /// Returns `Ok(false)` when there is nothing to compute. On error the
    /// state has been reset to its initial values.
    fn evaluate(&mut self) -> Result<bool, CalcError> {
        let Some(operator) = self.state.operator else {
            return Ok(false);
        };
        let (Some(previous), Some(current)) = (
            parse_operand(&self.state.previous_operand),
            parse_operand(&self.state.current_operand),
        ) else {
            warn!(state = ?self.state, "operands failed to parse; skipping computation");
            return Ok(false);
        };

        match compute(previous, operator, current) {
            Ok(result) => {
                debug!(previous, %operator, current, %result, "computed");
                self.state.current_operand = result;
                self.state.previous_operand.clear();
                self.state.operator = None;
                self.state.has_result = true;
                Ok(true)
            }
            Err(err) => {
                warn!(%err, previous, %operator, current, "computation failed; resetting");
                self.state = CalculatorState::default();
                Err(err)
            }
        }
    }

    fn finish(&self, intent: AnimationIntent) -> Update {
        debug_assert!(
            self.state.check_invariants().is_ok(),
            "{:?}",
            self.state.check_invariants()
        );
        trace!(state = ?self.state, intent = intent.label(), "transition");
        self.snapshot(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_keys(calc: &mut Calculator, keys: &str) {
        for token in keys.chars() {
            calc.enter_digit(token);
        }
    }

    fn with_current(operand: &str) -> Calculator {
        Calculator::from_state(CalculatorState {
            current_operand: operand.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_digit_entry() {
        let mut calc = Calculator::new();
        type_keys(&mut calc, "12.5");
        assert_eq!(calc.state().current_operand, "12.5");
    }

    #[test]
    fn test_leading_zero_replaced() {
        let mut calc = Calculator::new();
        let update = calc.enter_digit('0');
        assert_eq!(calc.state().current_operand, "0");
        assert_eq!(update.intent, AnimationIntent::DigitEnter);
        calc.enter_digit('7');
        assert_eq!(calc.state().current_operand, "7");
    }

    #[test]
    fn test_leading_decimal_point() {
        let mut calc = Calculator::new();
        calc.enter_digit('.');
        assert_eq!(calc.state().current_operand, "0.");
        calc.enter_digit('5');
        assert_eq!(calc.state().current_operand, "0.5");
    }

    #[test]
    fn test_second_decimal_point_rejected() {
        let mut calc = Calculator::new();
        type_keys(&mut calc, "1.2");
        let update = calc.enter_digit('.');
        assert_eq!(calc.state().current_operand, "1.2");
        assert_eq!(update.intent, AnimationIntent::None);
    }

    #[test]
    fn test_invalid_token_ignored() {
        let mut calc = Calculator::new();
        let update = calc.enter_digit('a');
        assert_eq!(update.intent, AnimationIntent::None);
        assert!(calc.state().is_initial());
    }

    #[test]
    fn test_negative_zero_entry() {
        let mut calc = Calculator::new();
        let update = calc.apply_operator(Operator::Subtract).unwrap();
        assert_eq!(update.intent, AnimationIntent::DigitEnter);
        assert_eq!(calc.state().current_operand, "-0");
        assert_eq!(update.current, "-0");
        assert_eq!(update.previous, "");

        calc.enter_digit('5');
        assert_eq!(calc.state().current_operand, "-5");
    }

    #[test]
    fn test_negative_zero_decimal() {
        let mut calc = Calculator::new();
        calc.apply_operator(Operator::Subtract).unwrap();
        type_keys(&mut calc, ".25");
        assert_eq!(calc.state().current_operand, "-0.25");
    }

    #[test]
    fn test_negative_zero_is_idempotent() {
        let mut calc = Calculator::new();
        calc.apply_operator(Operator::Subtract).unwrap();
        let update = calc.apply_operator(Operator::Subtract).unwrap();
        assert_eq!(update.intent, AnimationIntent::DigitEnter);
        assert_eq!(calc.state().current_operand, "-0");
        assert!(calc.state().previous_operand.is_empty());
        assert_eq!(calc.state().operator, None);
    }

    #[test]
    fn test_negative_entry_after_zero_result() {
        let mut calc = Calculator::new();
        calc.enter_digit('5');
        calc.apply_operator(Operator::Subtract).unwrap();
        calc.enter_digit('5');
        calc.equals().unwrap();
        assert_eq!(calc.state().current_operand, "0");

        calc.apply_operator(Operator::Subtract).unwrap();
        assert!(!calc.state().has_result);
        calc.enter_digit('3');
        assert_eq!(calc.state().current_operand, "-3");
    }

    #[test]
    fn test_operator_moves_operand() {
        let mut calc = Calculator::new();
        type_keys(&mut calc, "1234");
        let update = calc.apply_operator(Operator::Add).unwrap();
        assert_eq!(update.intent, AnimationIntent::Operator);
        assert_eq!(update.current, "0");
        assert_eq!(update.previous, "1,234 +");
        assert_eq!(calc.state().previous_operand, "1234");
        assert_eq!(calc.state().operator, Some(Operator::Add));
    }

    #[test]
    fn test_operator_on_zero_commits_zero() {
        let mut calc = Calculator::new();
        calc.apply_operator(Operator::Multiply).unwrap();
        assert_eq!(calc.state().previous_operand, "0");
        assert_eq!(calc.state().operator, Some(Operator::Multiply));
    }

    #[test]
    fn test_subtract_after_operator_is_an_operator() {
        let mut calc = Calculator::new();
        calc.enter_digit('5');
        calc.apply_operator(Operator::Add).unwrap();
        let update = calc.apply_operator(Operator::Subtract).unwrap();
        assert_eq!(update.intent, AnimationIntent::Operator);
        assert_eq!(update.previous, "5 -");
    }

    #[test]
    fn test_chained_operators_fold() {
        let mut calc = Calculator::new();
        calc.enter_digit('5');
        calc.apply_operator(Operator::Add).unwrap();
        calc.enter_digit('3');
        let update = calc.apply_operator(Operator::Multiply).unwrap();
        assert_eq!(update.intent, AnimationIntent::Operator);
        assert_eq!(update.previous, "8 x");
        calc.enter_digit('2');
        let update = calc.equals().unwrap();
        assert_eq!(update.intent, AnimationIntent::Result);
        assert_eq!(calc.state().current_operand, "16");
        assert_eq!(update.current, "16");
        assert_eq!(update.previous, "");
        assert!(calc.state().has_result);
    }

    #[test]
    fn test_equals_without_operator_is_noop() {
        let mut calc = Calculator::new();
        calc.enter_digit('9');
        let update = calc.equals().unwrap();
        assert_eq!(update.intent, AnimationIntent::None);
        assert_eq!(calc.state().current_operand, "9");
        assert!(!calc.state().has_result);
    }

    #[test]
    fn test_rounding() {
        let mut calc = Calculator::new();
        type_keys(&mut calc, "0.1");
        calc.apply_operator(Operator::Add).unwrap();
        type_keys(&mut calc, "0.2");
        let update = calc.equals().unwrap();
        assert_eq!(calc.state().current_operand, "0.3");
        assert_eq!(update.current, "0.3");
    }

    #[test]
    fn test_divide_by_zero_resets() {
        let mut calc = Calculator::new();
        calc.enter_digit('7');
        calc.apply_operator(Operator::Divide).unwrap();
        calc.enter_digit('0');
        assert_eq!(calc.equals(), Err(CalcError::DivideByZero));
        assert!(calc.state().is_initial());
        assert_eq!(calc.snapshot(AnimationIntent::Reset).current, "0");
    }

    #[test]
    fn test_overflow_resets() {
        let mut calc = Calculator::new();
        calc.enter_digit('1');
        type_keys(&mut calc, &"0".repeat(308));
        calc.apply_operator(Operator::Multiply).unwrap();
        type_keys(&mut calc, "99");
        assert_eq!(calc.equals(), Err(CalcError::Overflow));
        assert!(calc.state().is_initial());
        assert_eq!(calc.snapshot(AnimationIntent::Reset).previous, "");
    }

    #[test]
    fn test_divide_by_zero_mid_chain_drops_operator() {
        let mut calc = Calculator::new();
        calc.enter_digit('7');
        calc.apply_operator(Operator::Divide).unwrap();
        assert_eq!(
            calc.apply_operator(Operator::Add),
            Err(CalcError::DivideByZero)
        );
        assert!(calc.state().is_initial());
    }

    #[test]
    fn test_divide_by_negative_zero_entry() {
        let mut calc = Calculator::new();
        calc.enter_digit('4');
        calc.apply_operator(Operator::Divide).unwrap();
        type_keys(&mut calc, "0.");
        assert_eq!(calc.equals(), Err(CalcError::DivideByZero));
    }

    #[test]
    fn test_digit_after_result_starts_fresh() {
        let mut calc = Calculator::new();
        calc.enter_digit('2');
        calc.apply_operator(Operator::Add).unwrap();
        calc.enter_digit('2');
        calc.equals().unwrap();
        calc.enter_digit('9');
        assert_eq!(calc.state().current_operand, "9");
        assert!(!calc.state().has_result);

        calc.equals().unwrap();
        calc.enter_digit('.');
        assert_eq!(calc.state().current_operand, "9.");
    }

    #[test]
    fn test_decimal_after_result_starts_fresh() {
        let mut calc = Calculator::new();
        calc.enter_digit('2');
        calc.apply_operator(Operator::Divide).unwrap();
        calc.enter_digit('8');
        calc.equals().unwrap();
        assert_eq!(calc.state().current_operand, "0.25");
        calc.enter_digit('.');
        assert_eq!(calc.state().current_operand, "0.");
    }

    #[test]
    fn test_operator_after_result_continues() {
        let mut calc = Calculator::new();
        calc.enter_digit('6');
        calc.apply_operator(Operator::Multiply).unwrap();
        calc.enter_digit('7');
        calc.equals().unwrap();
        let update = calc.apply_operator(Operator::Subtract).unwrap();
        assert_eq!(update.previous, "42 -");
        assert!(!calc.state().has_result);
    }

    #[test]
    fn test_negative_result_can_be_extended() {
        let mut calc = Calculator::new();
        calc.enter_digit('3');
        calc.apply_operator(Operator::Subtract).unwrap();
        calc.enter_digit('5');
        calc.equals().unwrap();
        assert_eq!(calc.state().current_operand, "-2");
        calc.apply_operator(Operator::Multiply).unwrap();
        calc.enter_digit('4');
        calc.equals().unwrap();
        assert_eq!(calc.state().current_operand, "-8");
    }

    #[test]
    fn test_delete_boundaries() {
        let mut calc = Calculator::new();
        let update = calc.delete_last();
        assert_eq!(update.intent, AnimationIntent::None);
        assert_eq!(calc.state().current_operand, "0");

        let mut calc = with_current("-0");
        let update = calc.delete_last();
        assert_eq!(update.intent, AnimationIntent::DigitDelete);
        assert_eq!(calc.state().current_operand, "0");

        let mut calc = with_current("12");
        calc.delete_last();
        assert_eq!(calc.state().current_operand, "1");
        calc.delete_last();
        assert_eq!(calc.state().current_operand, "0");
    }

    #[test]
    fn test_delete_negative_digits() {
        let mut calc = with_current("-5");
        calc.delete_last();
        assert_eq!(calc.state().current_operand, "-0");

        let mut calc = with_current("-0.");
        calc.delete_last();
        assert_eq!(calc.state().current_operand, "-0");

        let mut calc = with_current("1.5");
        calc.delete_last();
        assert_eq!(calc.state().current_operand, "1.");
    }

    #[test]
    fn test_delete_after_result_clears() {
        let mut calc = Calculator::new();
        calc.enter_digit('4');
        calc.apply_operator(Operator::Add).unwrap();
        calc.enter_digit('4');
        calc.equals().unwrap();
        let update = calc.delete_last();
        assert_eq!(update.intent, AnimationIntent::Reset);
        assert!(calc.state().is_initial());
    }

    #[test]
    fn test_delete_after_zero_result_is_silent_clear() {
        let mut calc = Calculator::new();
        calc.enter_digit('4');
        calc.apply_operator(Operator::Subtract).unwrap();
        calc.enter_digit('4');
        calc.equals().unwrap();
        assert_eq!(calc.state().current_operand, "0");
        let update = calc.delete_last();
        assert_eq!(update.intent, AnimationIntent::None);
        assert!(calc.state().is_initial());
    }

    #[test]
    fn test_delete_keeps_pending_operator() {
        let mut calc = Calculator::new();
        calc.enter_digit('8');
        calc.apply_operator(Operator::Add).unwrap();
        type_keys(&mut calc, "12");
        let update = calc.delete_last();
        assert_eq!(update.current, "1");
        assert_eq!(update.previous, "8 +");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut calc = Calculator::new();
        type_keys(&mut calc, "42");
        calc.apply_operator(Operator::Add).unwrap();

        let first = calc.clear();
        let state_after_first = calc.state().clone();
        let second = calc.clear();

        assert_eq!(first.intent, AnimationIntent::Reset);
        assert_eq!(second.intent, AnimationIntent::None);
        assert_eq!(*calc.state(), state_after_first);
        assert!(calc.state().is_initial());
    }

    #[test]
    fn test_clear_with_pending_zero_operand() {
        let mut calc = Calculator::new();
        calc.apply_operator(Operator::Add).unwrap();
        assert_eq!(calc.state().current_operand, "0");
        assert_eq!(calc.clear().intent, AnimationIntent::Reset);
    }

    #[test]
    fn test_clipboard_text() {
        assert_eq!(with_current("1234.5").clipboard_text(), "1234.5");
        assert_eq!(with_current("12.").clipboard_text(), "12");
        assert_eq!(with_current("-0").clipboard_text(), "0");
        assert_eq!(with_current("-0.").clipboard_text(), "0");
        assert_eq!(with_current("-7").clipboard_text(), "-7");
    }

    #[test]
    fn test_dispatch_routes_inputs() {
        let mut calc = Calculator::new();
        let inputs = [
            Input::Digit('9'),
            Input::Operator(Operator::Divide),
            Input::Digit('3'),
            Input::Equals,
        ];
        let mut last = None;
        for input in inputs {
            last = Some(calc.dispatch(input).unwrap());
        }
        assert_eq!(last.unwrap().current, "3");
        assert_eq!(calc.dispatch(Input::Clear).unwrap().intent, AnimationIntent::Reset);
        assert_eq!(calc.dispatch(Input::Delete).unwrap().intent, AnimationIntent::None);
    }

    /// Every sequence of up to five inputs over a small alphabet keeps the
    /// state well formed.
    #[test]
    fn test_invariants_hold_for_all_short_sequences() {
        let alphabet = [
            Input::Digit('0'),
            Input::Digit('5'),
            Input::Digit('.'),
            Input::Operator(Operator::Subtract),
            Input::Operator(Operator::Divide),
            Input::Equals,
            Input::Delete,
            Input::Clear,
        ];

        let mut frontier = vec![Calculator::new()];
        for _ in 0..5 {
            let mut next = Vec::with_capacity(frontier.len() * alphabet.len());
            for calc in &frontier {
                for input in alphabet {
                    let mut calc = calc.clone();
                    let was_result = calc.state().has_result;
                    let outcome = calc.dispatch(input);
                    let state = calc.state();

                    state.check_invariants().unwrap();
                    assert!(state.current_operand.matches('.').count() <= 1);
                    assert_ne!(state.current_operand, "-");
                    if outcome.is_err() {
                        assert!(state.is_initial());
                    }
                    if state.has_result {
                        assert!(
                            input == Input::Equals || (was_result && outcome.is_ok()),
                            "{input:?} left has_result set"
                        );
                    }
                    if matches!(input, Input::Digit(_)) {
                        assert!(!state.has_result);
                    }
                    next.push(calc);
                }
            }
            frontier = next;
        }
    }
}
