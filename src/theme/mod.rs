//! Theme selection with a persisted preference and a system fallback.
//!
//! The selection is stored under a single key. Until the user picks a theme
//! the system color scheme decides, and it keeps deciding as it changes; an
//! explicit pick sticks until [`ThemeManager::follow_system`] is called.

mod store;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ThemeError;

pub use store::{FileThemeStore, MemoryThemeStore, STORAGE_KEY, ThemeStore};

/// Available themes, numbered as in the `data-theme` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Theme {
    Dark = 1,
    Light = 2,
    Violet = 3,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Self::Dark, Self::Light, Self::Violet];

    /// Theme matching a system color scheme.
    pub fn for_scheme(scheme: SystemScheme) -> Self {
        match scheme {
            SystemScheme::Dark => Self::Dark,
            SystemScheme::Light => Self::Light,
        }
    }

    /// Value of the `data-theme` attribute.
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Dark => "1",
            Self::Light => "2",
            Self::Violet => "3",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Violet => "violet",
        }
    }
}

impl From<Theme> for u8 {
    fn from(theme: Theme) -> Self {
        theme as u8
    }
}

impl TryFrom<u8> for Theme {
    type Error = ThemeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Dark),
            2 => Ok(Self::Light),
            3 => Ok(Self::Violet),
            other => Err(ThemeError::InvalidTheme(other.to_string())),
        }
    }
}

impl FromStr for Theme {
    type Err = ThemeError;

    /// Accepts the attribute value (`"1"`) or the name (`"dark"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|theme| theme.attribute() == s || theme.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ThemeError::InvalidTheme(s.to_string()))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The operating system's preferred color scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SystemScheme {
    #[default]
    Dark,
    Light,
}

impl SystemScheme {
    /// Map a `prefers-color-scheme: light` query result.
    pub fn from_prefers_light(prefers_light: bool) -> Self {
        if prefers_light { Self::Light } else { Self::Dark }
    }
}

/// Tracks the active theme.
pub struct ThemeManager<S> {
    store: S,
    scheme: SystemScheme,
    theme: Theme,
    manual: bool,
}

impl<S: ThemeStore> ThemeManager<S> {
    /// Resolve the stored selection, falling back to the system scheme.
    ///
    /// An unreadable stored value is logged and treated as unset.
    pub fn new(store: S, scheme: SystemScheme) -> Self {
        let stored = store.load().unwrap_or_else(|err| {
            warn!(%err, "ignoring unreadable theme preference");
            None
        });

        let theme = stored.unwrap_or_else(|| Theme::for_scheme(scheme));
        debug!(%theme, manual = stored.is_some(), "theme resolved");

        Self {
            store,
            scheme,
            theme,
            manual: stored.is_some(),
        }
    }

    pub fn current(&self) -> Theme {
        self.theme
    }

    /// Whether the user picked the active theme explicitly.
    pub fn is_manual(&self) -> bool {
        self.manual
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply and persist an explicit selection.
    pub fn select(&mut self, theme: Theme) -> Result<(), ThemeError> {
        self.store.save(theme)?;
        info!(%theme, "theme selected");
        self.theme = theme;
        self.manual = true;
        Ok(())
    }

    /// React to a system color scheme change.
    ///
    /// Returns the new theme when it was applied; a manual selection wins and
    /// nothing changes. Automatic switches are not persisted.
    pub fn on_system_change(&mut self, scheme: SystemScheme) -> Option<Theme> {
        self.scheme = scheme;
        if self.manual {
            debug!(?scheme, theme = %self.theme, "keeping manual theme");
            return None;
        }
        self.theme = Theme::for_scheme(scheme);
        debug!(?scheme, theme = %self.theme, "following system scheme");
        Some(self.theme)
    }

    /// Forget the explicit selection and follow the system scheme again.
    pub fn follow_system(&mut self) -> Result<Theme, ThemeError> {
        self.store.clear()?;
        self.manual = false;
        self.theme = Theme::for_scheme(self.scheme);
        info!(theme = %self.theme, "following system theme");
        Ok(self.theme)
    }
}
