//! Site-wide settings, read once at startup and written only through [`SettingsStore`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{QueryParseError, SettingsError};
use crate::extractor::DEFAULT_PALETTE_COUNT;
use crate::manifest::DEFAULT_MANIFEST_PATH;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        })
    }
}

impl FromStr for Theme {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(QueryParseError::Theme(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub manifest_path: PathBuf,
    pub palette_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            palette_count: DEFAULT_PALETTE_COUNT,
        }
    }
}

/// Owner of the settings file. The only code path that writes it.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Read the settings at `path`. A missing file means defaults.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let settings = match std::fs::read_to_string(&path) {
            Ok(body) => serde_json::from_str(&body).map_err(|source| SettingsError::Malformed {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Settings::default()
            }
            Err(source) => return Err(SettingsError::Read { path, source }),
        };

        Ok(Self { path, settings })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), SettingsError> {
        self.update(|s| s.theme = theme)
    }

    pub fn set_palette_count(&mut self, count: usize) -> Result<(), SettingsError> {
        self.update(|s| s.palette_count = count)
    }

    fn update(&mut self, change: impl FnOnce(&mut Settings)) -> Result<(), SettingsError> {
        let mut next = self.settings.clone();
        change(&mut next);
        if next == self.settings {
            return Ok(());
        }

        let body = serde_json::to_string_pretty(&next).map_err(SettingsError::Encode)?;
        std::fs::write(&self.path, body).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "settings saved");
        self.settings = next;
        Ok(())
    }
}
