//! Loading a `CBuild.toml` project into a [`CBuild`].

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::builder::format::format_tasks;
use crate::builder::task::TaskSpec;
use crate::builder::toolchain::{GccToolchain, LinkMode, Toolchain};
use crate::builder::{CBuild, CBuildConfig};
use crate::core::manifest::Manifest;
use crate::core::platform::Platform;
use crate::util::config::ToolchainConfig;
use crate::util::fs::glob_files;

/// Task families a project produces, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Deps,
    Objs,
    Link,
}

impl Stage {
    /// Every stage, in execution order.
    pub const ALL: [Stage; 3] = [Stage::Deps, Stage::Objs, Stage::Link];
}

/// Options for loading a project.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Target platform; overrides the manifest
    pub platform: Option<Platform>,

    /// Toolchain configuration, already merged with the environment
    pub toolchain: ToolchainConfig,
}

/// A loaded project.
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    manifest: Manifest,
    cbuild: CBuild,
}

impl Project {
    /// Load the project described by `manifest_path`.
    ///
    /// The manifest path is made absolute so that every task path stays
    /// valid when commands run from the project root.
    pub fn load(manifest_path: &Path, opts: LoadOptions) -> Result<Self> {
        let manifest_path = std::path::absolute(manifest_path)
            .with_context(|| format!("invalid manifest path: {}", manifest_path.display()))?;
        let manifest = Manifest::load(&manifest_path)?;
        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        let local = Platform::local()?;
        let platform = opts.platform.or(manifest.build.platform).unwrap_or(local);

        let sources = glob_files(&root, &manifest.build.sources)?;
        if sources.is_empty() {
            bail!(
                "no source files match {:?} in {}",
                manifest.build.sources,
                root.display()
            );
        }
        tracing::debug!("Found {} source file(s) for {}", sources.len(), platform);

        let mut config = CBuildConfig::new(sources, root.join(&manifest.build.build_dir));
        config.src_dir = root.join(&manifest.build.src_dir);
        config.cflags = manifest.build.cflags.clone();
        config.ldflags = manifest.build.ldflags.clone();
        config.libs = manifest.build.libs.clone();
        config.task_dep = manifest.build.task_dep.clone();

        let toolchain = Toolchain::new(platform, local, opts.toolchain);
        let cbuild = CBuild::new(config, toolchain)
            .with_context(|| format!("invalid project at {}", root.display()))?;

        Ok(Project {
            root,
            manifest,
            cbuild,
        })
    }

    /// Directory containing the manifest. Commands run from here.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The underlying build.
    pub fn cbuild(&self) -> &CBuild {
        &self.cbuild
    }

    /// The build output root.
    pub fn build_dir(&self) -> &Path {
        self.cbuild.layout().build_dir()
    }

    /// Output path and mode of the link product, if the manifest has one.
    pub fn link_output(&self) -> Option<(PathBuf, LinkMode)> {
        self.manifest.link.as_ref().map(|link| {
            let platform = self.cbuild.toolchain().platform();
            let name = GccToolchain::output_name(&link.name, link.kind, platform);
            (self.build_dir().join(name), link.kind)
        })
    }

    /// Tasks of one stage.
    pub fn tasks(&self, stage: Stage) -> Result<Vec<TaskSpec>> {
        let tasks = match stage {
            Stage::Deps => self.cbuild.dep_tasks()?.collect(),
            Stage::Objs => self.cbuild.obj_tasks()?.collect(),
            Stage::Link => match self.link_output() {
                Some((output, mode)) => vec![self.cbuild.link_task(&output, mode)?],
                None => Vec::new(),
            },
        };
        Ok(tasks)
    }

    /// Tasks of every stage, enumerated up front.
    pub fn stages(&self) -> Result<Vec<Vec<TaskSpec>>> {
        Stage::ALL.iter().map(|stage| self.tasks(*stage)).collect()
    }

    /// clang-format tasks for every source.
    pub fn format_tasks(&self) -> Vec<TaskSpec> {
        let style = self
            .manifest
            .build
            .format_style
            .as_ref()
            .map(|s| self.root.join(s));
        format_tasks(self.cbuild.sources(), style.as_deref()).collect()
    }
}
