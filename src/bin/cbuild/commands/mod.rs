//! Command implementations

pub mod build;
pub mod clean;
pub mod fmt;
pub mod tasks;
pub mod toolchain;

use anyhow::Result;

use crate::cli::GlobalArgs;
use cbuild::core::find_manifest;
use cbuild::ops::{LoadOptions, Project};
use cbuild::util::config::{
    global_toolchain_config_path, load_toolchain_config, project_toolchain_config_path,
};

/// Locate the manifest and load the project with toolchain config applied.
pub fn load_project(global: &GlobalArgs) -> Result<Project> {
    let manifest_path = match &global.manifest_path {
        Some(path) => path.clone(),
        None => find_manifest(&std::env::current_dir()?)?,
    };
    let root = manifest_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();

    let mut toolchain = load_toolchain_config(
        global_toolchain_config_path().as_deref(),
        &project_toolchain_config_path(&root),
    );
    toolchain.apply_env(|key| std::env::var(key).ok())?;

    Project::load(
        &manifest_path,
        LoadOptions {
            platform: global.platform,
            toolchain,
        },
    )
}
