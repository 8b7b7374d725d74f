//! Functionality related to user configuration.
use std::{fs, io::ErrorKind};

use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::eyre::{self, eyre};
use serde::Deserialize;
use tracing::debug;

use crate::{backend::LookupTables, utils};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Where the stores live. Relative paths are resolved against the data directory.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// The credential file.
    pub credentials_file: Utf8PathBuf,
    /// The high-score file.
    pub scores_file: Utf8PathBuf,
}
impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            credentials_file: Utf8PathBuf::from("user_credentials.csv"),
            scores_file: Utf8PathBuf::from("high_scores.csv"),
        }
    }
}

/// Optional replacement reference tables. Both must be given to take effect.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TablesConfig {
    /// Dice → catch table.
    pub fish_mapping: Option<Utf8PathBuf>,
    /// Catch → points table.
    pub fish_info: Option<Utf8PathBuf>,
}

/// Logging options.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` isn't set, e.g. `"info"` or `"reeldice=debug"`.
    pub level: String,
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
        }
    }
}

/// [Config] represents the values configurable by the user.
#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Store file locations.
    pub store: StoreConfig,
    /// Reference table overrides.
    pub tables: TablesConfig,
    /// Logging options.
    pub logging: LoggingConfig,
}
impl Config {
    /// Load the [Config] from `config.toml` in the config directory. A missing file gives the
    /// defaults.
    pub fn load() -> eyre::Result<Self> {
        Self::load_from(utils::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load the [Config] from a specific file. A missing file gives the defaults.
    pub fn load_from<P>(config_file_path: P) -> eyre::Result<Self>
    where
        P: AsRef<Utf8Path>,
    {
        let config_file_path = config_file_path.as_ref();
        let config_file_content = match fs::read_to_string(config_file_path) {
            Ok(file_content) => file_content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = config_file_path.as_str(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(err) if err.kind() == ErrorKind::PermissionDenied => {
                return Err(eyre!(
                    "ERROR: Permission denied for config file at path \"{}\".",
                    config_file_path
                ))
            }
            Err(err) => return Err(eyre!("ERROR: {}", err)),
        };

        toml::from_str(&config_file_content).map_err(|err| eyre!(err))
    }

    /// Absolute location of the credential file.
    pub fn credentials_path(&self, data_dir: &Utf8Path) -> Utf8PathBuf {
        data_dir.join(&self.store.credentials_file)
    }

    /// Absolute location of the high-score file.
    pub fn scores_path(&self, data_dir: &Utf8Path) -> Utf8PathBuf {
        data_dir.join(&self.store.scores_file)
    }

    /// The configured [LookupTables], or the built-in ones if none are configured.
    pub fn lookup_tables(&self, data_dir: &Utf8Path) -> eyre::Result<LookupTables> {
        match (&self.tables.fish_mapping, &self.tables.fish_info) {
            (Some(mapping), Some(info)) => Ok(LookupTables::load(
                data_dir.join(mapping),
                data_dir.join(info),
            )?),
            (None, None) => Ok(LookupTables::default()),
            _ => Err(eyre!(
                "Both tables.fish_mapping and tables.fish_info must be set to replace the built-in tables."
            )),
        }
    }
}
