//! Calculator engine for keypad-style arithmetic entry.
//!
//! This module provides functionality to:
//! - Track the operand being typed and the pending operation
//! - Fold operations into a running total, rounded to eight places
//! - Project the state into grouped display text
//! - Copy the current value to the clipboard

mod clipboard;
mod engine;
mod evaluation;
mod format;
mod state;

pub use clipboard::copy_to_clipboard;
pub use engine::{AnimationIntent, Calculator, Update};
pub use evaluation::{compute, parse_operand};
pub use format::{current_display, format_operand, previous_display};
pub use state::{CalculatorState, Operator, is_operand};
