//! Configuration file support for persistent settings.
//!
//! This module provides support for loading configuration from a TOML file
//! located at `~/.config/ibmi-projects/config.toml` (or the platform-specific
//! equivalent). Configuration file values serve as defaults that can be
//! overridden by CLI arguments.
//!
//! # Layering
//!
//! The precedence order is: **CLI argument > config file > hardcoded default**.
//!
//! # Example config
//!
//! ```toml
//! log_level = "debug"
//! depth = 3
//! interactive = false
//!
//! [deployment]
//! "~/work/payroll" = "/home/dev/payroll"
//! ```

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::host::Deployment;

/// Top-level configuration file structure.
///
/// All fields are `Option<T>` so we can detect which values are present in the
/// config file and apply layered configuration (CLI > config file > defaults).
#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    /// Default tracing filter (e.g., `"debug"`, `"ibmi_project_explorer=trace"`)
    pub log_level: Option<String>,

    /// How many levels of the tree to expand, counted from the root (`1`
    /// shows the top-level project nodes only)
    pub depth: Option<usize>,

    /// Whether to pick a single project interactively
    pub interactive: Option<bool>,

    /// Remote deployment directory of each local workspace root
    #[serde(default)]
    pub deployment: HashMap<PathBuf, String>,
}

/// Expand a leading `~` in a path to the user's home directory.
///
/// Paths that don't start with `~` are returned unchanged.
///
/// # Examples
///
/// ```
/// # use std::path::PathBuf;
/// # use ibmi_project_explorer::config::file::expand_tilde;
/// let absolute = PathBuf::from("/absolute/path");
/// assert_eq!(expand_tilde(&absolute), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

impl FileConfig {
    /// Returns the path where the configuration file is expected.
    ///
    /// The configuration file is located at `<config_dir>/ibmi-projects/config.toml`,
    /// where `<config_dir>` is the platform-specific configuration directory
    /// (e.g., `~/.config` on Linux/macOS, `%APPDATA%` on Windows).
    ///
    /// # Returns
    ///
    /// `Some(PathBuf)` with the config file path, or `None` if the config
    /// directory cannot be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ibmi-projects").join("config.toml"))
    }

    /// Load configuration from the default config file location.
    ///
    /// If the config file doesn't exist, returns a default (empty) configuration.
    /// If the file exists but is malformed, returns an error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file exists but cannot be read
    /// - The config file exists but contains invalid TOML or unexpected fields
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file at {}: {e}", path.display())
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file at {}: {e}", path.display())
        })?;

        Ok(config)
    }

    /// The `[deployment]` table keyed by absolute local roots.
    ///
    /// Keys have `~` expanded. Keys that name an existing directory are
    /// canonicalized so they match workspace roots given on the command line;
    /// trailing `/` is dropped from the remote directories.
    #[must_use]
    pub fn deployment(&self) -> Deployment {
        self.deployment
            .iter()
            .map(|(local, remote)| {
                let local = expand_tilde(local);
                let local = local.canonicalize().unwrap_or(local);
                let remote = match remote.trim_end_matches('/') {
                    "" => "/",
                    trimmed => trimmed,
                };
                (local, remote.to_string())
            })
            .collect()
    }
}
