//! Incremental C build task generation.
//!
//! [`CBuild`] turns a list of translation units into three task families:
//!
//! - dependency tasks: `cc -MM` writes `<build>/<rel>.d` from `<src>`
//! - object tasks: `cc -c` writes `<build>/<rel>.o`, depending on the
//!   source, its `.d` record, and every header the record lists
//! - a link task: links every object into an executable or shared library
//!
//! Headers are read from the `.d` records when the object tasks are
//! enumerated, so a newly included header is only tracked once its record
//! has been regenerated.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::builder::depfile::parse_depfile;
use crate::builder::task::TaskSpec;
use crate::builder::toolchain::{CompileInput, LinkInput, LinkMode, Toolchain};
use crate::core::errors::BuildError;

/// Maps source files to their derived artifact paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    src_dir: PathBuf,
    build_dir: PathBuf,
}

impl ArtifactLayout {
    /// Create a layout rebasing sources under `src_dir` into `build_dir`.
    pub fn new(src_dir: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        ArtifactLayout {
            src_dir: src_dir.into(),
            build_dir: build_dir.into(),
        }
    }

    /// The source root.
    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    /// The build output root.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Path of `source` relative to the source root.
    ///
    /// The comparison is lexical and ignores `.` components, so `a.c` is
    /// under `.` and `./src/a.c` is under `src`.
    pub fn relative_source(&self, source: &Path) -> Result<PathBuf, BuildError> {
        let source_norm = lexical(source);
        let root_norm = lexical(&self.src_dir);

        match source_norm.strip_prefix(&root_norm) {
            Ok(rel) if !rel.as_os_str().is_empty() => Ok(rel.to_path_buf()),
            _ => Err(BuildError::SourceOutsideRoot {
                source_path: source.to_path_buf(),
                root: self.src_dir.clone(),
            }),
        }
    }

    /// Object file path for `source`.
    pub fn object_path(&self, source: &Path) -> Result<PathBuf, BuildError> {
        self.artifact_path(source, "o")
    }

    /// Dependency record path for `source`.
    pub fn depfile_path(&self, source: &Path) -> Result<PathBuf, BuildError> {
        self.artifact_path(source, "d")
    }

    fn artifact_path(&self, source: &Path, extension: &str) -> Result<PathBuf, BuildError> {
        let rel = self.relative_source(source)?;
        Ok(self.build_dir.join(rel).with_extension(extension))
    }
}

fn lexical(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Per-build settings for [`CBuild`].
#[derive(Debug, Clone)]
pub struct CBuildConfig {
    /// Translation units, in order
    pub sources: Vec<PathBuf>,
    /// Build output root
    pub build_dir: PathBuf,
    /// Root the sources are made relative to
    pub src_dir: PathBuf,
    /// Extra compile flags
    pub cflags: Vec<String>,
    /// Extra link flags
    pub ldflags: Vec<String>,
    /// Link libraries, placed after the objects
    pub libs: Vec<String>,
    /// Upstream task names every generated task depends on
    pub task_dep: Vec<String>,
}

impl CBuildConfig {
    /// Settings for `sources` built into `build_dir`, sources relative to `.`.
    pub fn new(sources: Vec<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        CBuildConfig {
            sources,
            build_dir: build_dir.into(),
            src_dir: PathBuf::from("."),
            cflags: Vec::new(),
            ldflags: Vec::new(),
            libs: Vec::new(),
            task_dep: Vec::new(),
        }
    }
}

/// Incremental C build over a fixed set of sources.
#[derive(Debug)]
pub struct CBuild {
    sources: Vec<PathBuf>,
    layout: ArtifactLayout,
    toolchain: Toolchain,
    cflags: Vec<String>,
    ldflags: Vec<String>,
    libs: Vec<String>,
    task_dep: Vec<String>,
}

impl CBuild {
    /// Create a build, checking that every source lies under the source
    /// root and that no two sources share an artifact path.
    pub fn new(config: CBuildConfig, toolchain: Toolchain) -> Result<Self, BuildError> {
        let layout = ArtifactLayout::new(config.src_dir, config.build_dir);

        let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
        for source in &config.sources {
            let object = layout.object_path(source)?;
            if let Some(first) = seen.insert(object.clone(), source) {
                return Err(BuildError::ArtifactCollision {
                    first: first.to_path_buf(),
                    second: source.clone(),
                    artifact: object,
                });
            }
        }

        Ok(CBuild {
            sources: config.sources,
            layout,
            toolchain,
            cflags: config.cflags,
            ldflags: config.ldflags,
            libs: config.libs,
            task_dep: config.task_dep,
        })
    }

    /// The configured sources.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// The artifact layout.
    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    /// The toolchain used for every task.
    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Object paths of every source, in source order.
    pub fn object_paths(&self) -> Vec<PathBuf> {
        self.sources.iter().map(|s| self.object_path(s)).collect()
    }

    // Sources are validated in `new`, so rebasing cannot fail afterwards.
    fn object_path(&self, source: &Path) -> PathBuf {
        let rel = self.relative(source);
        self.layout.build_dir.join(rel).with_extension("o")
    }

    fn depfile_path(&self, source: &Path) -> PathBuf {
        let rel = self.relative(source);
        self.layout.build_dir.join(rel).with_extension("d")
    }

    fn relative(&self, source: &Path) -> PathBuf {
        self.layout
            .relative_source(source)
            .unwrap_or_else(|_| source.to_path_buf())
    }

    /// Dependency-record tasks, one per source.
    ///
    /// Each depends only on its source file.
    pub fn dep_tasks(&self) -> Result<impl Iterator<Item = TaskSpec> + '_, BuildError> {
        let gcc = self.toolchain.resolve()?;

        Ok(self.sources.iter().map(move |source| {
            let dep = self.depfile_path(source);
            let input = CompileInput {
                source: source.clone(),
                output: dep.clone(),
                cflags: self.cflags.clone(),
            };

            TaskSpec::for_target(&dep, gcc.depfile_command(&input))
                .with_file_dep([source.clone()])
                .with_task_dep(&self.task_dep)
        }))
    }

    /// Object compilation tasks, one per source.
    ///
    /// Each depends on its source, its dependency record, and the headers
    /// the record currently lists.
    pub fn obj_tasks(&self) -> Result<impl Iterator<Item = TaskSpec> + '_, BuildError> {
        let gcc = self.toolchain.resolve()?;

        Ok(self.sources.iter().map(move |source| {
            let dep = self.depfile_path(source);
            let obj = self.object_path(source);
            let headers = parse_depfile(&dep);

            tracing::trace!(
                "{} depends on {} recorded file(s)",
                obj.display(),
                headers.len()
            );

            let input = CompileInput {
                source: source.clone(),
                output: obj.clone(),
                cflags: self.cflags.clone(),
            };

            let file_dep = [source.clone(), dep].into_iter().chain(headers);

            TaskSpec::for_target(&obj, gcc.compile_command(&input))
                .with_file_dep(file_dep)
                .with_task_dep(&self.task_dep)
        }))
    }

    /// The link task producing `output` from every object.
    pub fn link_task(&self, output: &Path, mode: LinkMode) -> Result<TaskSpec, BuildError> {
        let gcc = self.toolchain.resolve()?;
        let objects = self.object_paths();

        let input = LinkInput {
            objects: objects.clone(),
            output: output.to_path_buf(),
            ldflags: self.ldflags.clone(),
            libs: self.libs.clone(),
        };
        let platform_ldflags = self.toolchain.platform_ldflags(mode);

        Ok(
            TaskSpec::for_target(output, gcc.link_command(&input, &platform_ldflags))
                .with_file_dep(objects)
                .with_task_dep(&self.task_dep),
        )
    }
}
