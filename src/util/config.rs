//! Toolchain configuration files.
//!
//! cbuild reads toolchain overrides from two locations:
//! - Global: `~/.cbuild/toolchain.toml`
//! - Project: `.cbuild/toolchain.toml`
//!
//! Project config takes precedence over global config. Environment
//! variables (`CC`, `CFLAGS`, `LDFLAGS`) are applied last, at the CLI edge.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Toolchain configuration for compiler overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Toolchain settings
    pub toolchain: ToolchainSettings,
}

/// Toolchain settings for C compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolchainSettings {
    /// C compiler to prefer when building for the local platform
    pub cc: Option<PathBuf>,

    /// Flags added to every compile and dependency scan
    pub cflags: Vec<String>,

    /// Flags added to every link
    pub ldflags: Vec<String>,

    /// Search path used to probe compiler candidates (defaults to `PATH`)
    pub search_path: Option<String>,
}

impl ToolchainConfig {
    /// Load toolchain configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read toolchain config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse toolchain config: {}", path.display()))
    }

    /// Load toolchain configuration with fallback to defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to load toolchain config from {}: {:#}",
                    path.display(),
                    e
                );
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: ToolchainConfig) {
        if other.toolchain.cc.is_some() {
            self.toolchain.cc = other.toolchain.cc;
        }
        if !other.toolchain.cflags.is_empty() {
            self.toolchain.cflags = other.toolchain.cflags;
        }
        if !other.toolchain.ldflags.is_empty() {
            self.toolchain.ldflags = other.toolchain.ldflags;
        }
        if other.toolchain.search_path.is_some() {
            self.toolchain.search_path = other.toolchain.search_path;
        }
    }

    /// Apply `CC`, `CFLAGS` and `LDFLAGS` from the given lookup.
    ///
    /// `CFLAGS` and `LDFLAGS` are split with shell quoting rules and
    /// appended after any configured flags.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(cc) = lookup("CC").filter(|cc| !cc.is_empty()) {
            self.toolchain.cc = Some(PathBuf::from(cc));
        }
        if let Some(cflags) = lookup("CFLAGS") {
            self.toolchain.cflags.extend(split_flags("CFLAGS", &cflags)?);
        }
        if let Some(ldflags) = lookup("LDFLAGS") {
            self.toolchain.ldflags.extend(split_flags("LDFLAGS", &ldflags)?);
        }
        Ok(())
    }
}

fn split_flags(var: &str, value: &str) -> Result<Vec<String>> {
    match shlex::split(value) {
        Some(flags) => Ok(flags),
        None => bail!("unbalanced quoting in {}: {}", var, value),
    }
}

/// Load merged toolchain configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.cbuild/toolchain.toml)
/// 2. Global config (~/.cbuild/toolchain.toml)
/// 3. Defaults
pub fn load_toolchain_config(global_path: Option<&Path>, project_path: &Path) -> ToolchainConfig {
    let mut config = ToolchainConfig::default();

    if let Some(global) = global_path {
        config.merge(ToolchainConfig::load_or_default(global));
    }

    config.merge(ToolchainConfig::load_or_default(project_path));

    config
}

/// Get the global cbuild config directory (~/.cbuild).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".cbuild"))
}

/// Get the global toolchain config path (~/.cbuild/toolchain.toml).
pub fn global_toolchain_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("toolchain.toml"))
}

/// Get the project toolchain config path (.cbuild/toolchain.toml).
pub fn project_toolchain_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".cbuild").join("toolchain.toml")
}
