//! Settings for the programs that drive the solvers.
//!
//! Settings are read from a TOML file such as
//!
//! ```toml
//! gnuplot.command = "/usr/bin/gnuplot"
//! ```
//!
//! and passed explicitly to whatever needs them.

use log::info;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File read by [`Settings::load_default`].
pub const DEFAULT_SETTINGS_FILE: &str = "./settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed settings file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub gnuplot: GnuplotSettings,
}

/// How to invoke the external plot renderer.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GnuplotSettings {
    pub command: String,
}

impl Default for GnuplotSettings {
    fn default() -> GnuplotSettings {
        GnuplotSettings {
            command: "gnuplot".to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from `path`. Missing keys take their default values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Settings, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_owned(),
            source,
        })?;
        let settings = Settings::parse(&text).map_err(|source| SettingsError::Parse {
            path: path.to_owned(),
            source,
        })?;
        info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reads settings from [`DEFAULT_SETTINGS_FILE`].
    pub fn load_default() -> Result<Settings, SettingsError> {
        Settings::load(DEFAULT_SETTINGS_FILE)
    }

    fn parse(text: &str) -> Result<Settings, toml::de::Error> {
        toml::from_str(text)
    }

    /// Command that runs the external plot renderer.
    pub fn gnuplot_command(&self) -> &str {
        &self.gnuplot.command
    }
}
