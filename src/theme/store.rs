//! Persistence of the theme selection.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Theme;
use crate::error::ThemeError;

/// Key the selection is stored under.
pub const STORAGE_KEY: &str = "cal-theme";

/// Storage port for the theme selection.
pub trait ThemeStore {
    /// Load the stored selection. Returns `Ok(None)` when nothing is stored.
    fn load(&self) -> Result<Option<Theme>, ThemeError>;
    fn save(&mut self, theme: Theme) -> Result<(), ThemeError>;
    /// Remove the stored selection.
    fn clear(&mut self) -> Result<(), ThemeError>;
}

/// Keeps the selection in memory only.
#[derive(Clone, Debug, Default)]
pub struct MemoryThemeStore {
    value: Option<Theme>,
}

impl MemoryThemeStore {
    pub fn with(theme: Theme) -> Self {
        Self { value: Some(theme) }
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<Theme>, ThemeError> {
        Ok(self.value)
    }

    fn save(&mut self, theme: Theme) -> Result<(), ThemeError> {
        self.value = Some(theme);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ThemeError> {
        self.value = None;
        Ok(())
    }
}

/// On-disk layout: a single `cal-theme = "<n>"` entry.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ThemeFile {
    #[serde(rename = "cal-theme", default, skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
}

/// Stores the selection as TOML, by default in the platform config directory
/// (e.g. `~/.config/tallypad/theme.toml`).
#[derive(Clone, Debug)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the user config directory.
    pub fn in_config_dir() -> Result<Self, ThemeError> {
        let base = dirs::config_dir().ok_or(ThemeError::NoConfigDir)?;
        Ok(Self::new(base.join(crate::APP_NAME).join("theme.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<Theme>, ThemeError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let file: ThemeFile = toml::from_str(&contents)?;
        file.theme.map(|value| value.parse()).transpose()
    }

    fn save(&mut self, theme: Theme) -> Result<(), ThemeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = ThemeFile {
            theme: Some(theme.attribute().to_string()),
        };
        fs::write(&self.path, toml::to_string(&file)?)?;
        debug!(path = %self.path.display(), %theme, "theme saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ThemeError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
