//! Keypad calculator with animated display transitions and theme switching.
//!
//! - [`calculator`]: the running-total state machine and its display text
//! - [`input`]: keyboard and button mapping
//! - [`presentation`]: staged rendering of engine updates
//! - [`theme`]: persisted theme selection with a system fallback

pub mod calculator;
pub mod config;
pub mod error;
pub mod input;
pub mod presentation;
pub mod theme;

/// Directory name used under the platform config directory.
pub const APP_NAME: &str = "tallypad";

pub use calculator::{AnimationIntent, Calculator, CalculatorState, Operator, Update};
pub use error::CalcError;
pub use input::{Input, parse_keys};
