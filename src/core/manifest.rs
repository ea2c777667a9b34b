//! Project manifest (`CBuild.toml`) parsing.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::builder::toolchain::LinkMode;
use crate::core::platform::Platform;

/// Manifest file name.
pub const MANIFEST_NAME: &str = "CBuild.toml";

/// A parsed `CBuild.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Compile settings
    pub build: BuildSection,

    /// Link product, if any
    #[serde(default)]
    pub link: Option<LinkSection>,
}

/// The `[build]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildSection {
    /// Glob patterns for translation units, relative to the manifest directory
    pub sources: Vec<String>,

    /// Root the sources are made relative to
    #[serde(default = "default_src_dir")]
    pub src_dir: PathBuf,

    /// Build output root
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// Target platform (defaults to `TARGET_PLATFORM` or the host)
    #[serde(default)]
    pub platform: Option<Platform>,

    #[serde(default)]
    pub cflags: Vec<String>,

    #[serde(default)]
    pub ldflags: Vec<String>,

    #[serde(default)]
    pub libs: Vec<String>,

    /// Upstream task names, passed through to every task
    #[serde(default)]
    pub task_dep: Vec<String>,

    /// Style file for `cbuild fmt`
    #[serde(default)]
    pub format_style: Option<PathBuf>,
}

/// The `[link]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkSection {
    /// Output name without platform suffix
    pub name: String,

    /// `executable` or `shared-lib`
    #[serde(default = "default_link_kind")]
    pub kind: LinkMode,
}

fn default_src_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_link_kind() -> LinkMode {
    LinkMode::Executable
}

impl Manifest {
    /// Parse a manifest from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(contents)?;
        if manifest.build.sources.is_empty() {
            bail!("`build.sources` must list at least one pattern");
        }
        Ok(manifest)
    }

    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }
}

/// Find `CBuild.toml` in `start` or any of its ancestors.
pub fn find_manifest(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            bail!(
                "could not find `{}` in `{}` or any parent directory",
                MANIFEST_NAME,
                start.display()
            );
        }
    }
}
