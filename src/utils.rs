//! General utilities used by `reeldice`.
use std::{env, fs::OpenOptions, sync::Mutex};

use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::eyre::{self, eyre};
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Get the version, author info, and directories of `reeldice`.
pub fn info() -> String {
    let display = |dir: eyre::Result<Utf8PathBuf>| {
        dir.map(|path| path.to_string())
            .unwrap_or_else(|err| format!("unavailable ({err})"))
    };
    format!(
        "\
{}

Data Directory: {}
Config Directory: {}",
        env!("CARGO_PKG_VERSION"),
        display(data_dir()),
        display(config_dir()),
    )
}

/// Get the directory where `reeldice` program data is stored.
pub fn data_dir() -> eyre::Result<Utf8PathBuf> {
    if let Some(utf8_path_buf) = data_dir_env_var() {
        // Prioritise user-set path.
        Ok(utf8_path_buf)
    } else if let Some(proj_dirs) = project_directory() {
        // Next priority: XDG-standardised local dir.
        utf8(proj_dirs.data_local_dir())
    } else {
        // Last priority: hidden folder relative to CWD
        Ok(Utf8PathBuf::from(".").join(fallback_dir_name()))
    }
}

/// Get the directory where `reeldice` configuration data is stored.
pub fn config_dir() -> eyre::Result<Utf8PathBuf> {
    if let Some(utf8_path_buf) = config_dir_env_var() {
        Ok(utf8_path_buf)
    } else if let Some(proj_dirs) = project_directory() {
        utf8(proj_dirs.config_local_dir())
    } else {
        Ok(Utf8PathBuf::from(".").join(fallback_dir_name()))
    }
}

fn utf8(path: &std::path::Path) -> eyre::Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf())
        .map_err(|path_buf| eyre!("Path {:?} contains non-UTF-8 content.", path_buf))
}

fn fallback_dir_name() -> String {
    format!(".{}", env!("CARGO_PKG_NAME"))
}

/// Get the log file name.
pub fn log_file_name() -> String {
    format!("{}.log", env!("CARGO_PKG_NAME"))
}

/// Data directory environment variable. Can be set to change the location of the `reeldice` data
/// directory.
pub fn data_dir_env_var() -> Option<Utf8PathBuf> {
    get_env_var_path("DATA")
}

/// Config directory environment variable. Can be used to change the location of the `reeldice`
/// config directory.
pub fn config_dir_env_var() -> Option<Utf8PathBuf> {
    get_env_var_path("CONFIG")
}

// Helper function.
fn get_env_var_path(suffix: &str) -> Option<Utf8PathBuf> {
    env::var(format!("{}_{}", crate_name_constant_case(), suffix))
        .ok()
        .filter(|value| !value.is_empty())
        .map(Utf8PathBuf::from)
}

/// Get the crate name in CONSTANT_CASE.
pub fn crate_name_constant_case() -> String {
    env!("CARGO_CRATE_NAME").to_uppercase()
}

/// Get the directory of this project.
pub fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
}

/// Send `tracing` output to the log file in `log_dir`.
///
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init_logging<P>(log_dir: P, default_level: &str) -> eyre::Result<()>
where
    P: AsRef<Utf8Path>,
{
    std::fs::create_dir_all(log_dir.as_ref())?;
    let log_path = log_dir.as_ref().join(log_file_name());
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| eyre!("Failed to initialise logging: {err}"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn names() {
        assert_eq!(crate_name_constant_case(), "REELDICE");
        assert_eq!(log_file_name(), "reeldice.log");
    }

    #[test]
    fn info_mentions_version() {
        assert!(info().starts_with(env!("CARGO_PKG_VERSION")));
    }
}
