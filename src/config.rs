//! User configuration, read from `config.toml` in the platform config directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::presentation::EffectSet;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Play every effect instantly.
    pub reduced_motion: bool,
    /// Skip effects entirely and only swap text.
    pub no_animations: bool,
    /// Where the theme selection is stored. Defaults to the config directory.
    pub theme_file: Option<PathBuf>,
}

impl Config {
    /// Default location of the config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(crate::APP_NAME).join("config.toml"))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = toml::from_str(&contents)?;
                debug!(path = %path.display(), ?config, "config loaded");
                Ok(config)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file; using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Effects to render with.
    ///
    /// Disabled animations are rendered as zero-length effects, so the
    /// surface still sees each transition but nothing waits.
    pub fn effects(&self) -> EffectSet {
        EffectSet::new(self.reduced_motion || self.no_animations)
    }
}
