//! Error types shared across the crate.

use thiserror::Error;

/// Recoverable arithmetic failures raised by the calculator engine.
///
/// When one of these is returned the engine has already reset itself to the
/// initial state; callers only need to tell the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CalcError {
    /// The divisor parsed to exactly zero.
    #[error("Cannot divide by zero!")]
    DivideByZero,
    /// The arithmetic produced a value that is not finite.
    #[error("Result is too large to display")]
    Overflow,
}

/// Errors from turning key names or key sequences into calculator inputs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown key: {0}")]
    UnknownKey(String),
    #[error("unknown operator: {0}")]
    UnknownOperator(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

/// Errors from loading or persisting the theme selection.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("invalid theme value: {0}")]
    InvalidTheme(String),
    #[error("could not resolve a config directory")]
    NoConfigDir,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read theme file: {0}")]
    Decode(#[from] toml::de::Error),
    #[error("failed to write theme file: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Errors from loading the user configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors from copying a value to the system clipboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Failed to access clipboard: {0}")]
    Access(arboard::Error),
    #[error("Failed to copy to clipboard: {0}")]
    Copy(arboard::Error),
}
