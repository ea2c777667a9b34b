//! Implementation of `cbuild build`, `cbuild clean` and `cbuild fmt`.

use anyhow::Result;

use crate::builder::executor::{RunSummary, TaskRunner};
use crate::ops::project::Project;
use crate::util::fs::remove_dir_all_if_exists;

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Number of parallel jobs
    pub jobs: Option<usize>,

    /// Rebuild every task regardless of timestamps
    pub force: bool,

    /// Report stale tasks without running them
    pub dry_run: bool,

    /// Verbose output
    pub verbose: bool,
}

impl BuildOptions {
    fn runner(&self, project: &Project) -> TaskRunner {
        TaskRunner::new()
            .cwd(project.root())
            .jobs(self.jobs)
            .force(self.force)
            .dry_run(self.dry_run)
            .verbose(self.verbose)
    }
}

/// Run dependency, object and link tasks in order, from the project root.
///
/// Every stage is enumerated before any task runs, so object tasks see the
/// dependency records left by the previous build.
pub fn build(project: &Project, opts: &BuildOptions) -> Result<RunSummary> {
    let stages = project.stages()?;
    tracing::debug!(
        "Planned {} task(s) for {}",
        stages.iter().map(Vec::len).sum::<usize>(),
        project.cbuild().toolchain().platform()
    );
    opts.runner(project).run_stages(&stages)
}

/// Format every source in place with clang-format.
pub fn format(project: &Project, opts: &BuildOptions) -> Result<RunSummary> {
    let tasks = project.format_tasks();
    opts.runner(project).run_stages(&[tasks])
}

/// Remove the build directory. Returns `false` if there was nothing to remove.
pub fn clean(project: &Project) -> Result<bool> {
    let build_dir = project.build_dir();
    if !build_dir.exists() {
        return Ok(false);
    }
    remove_dir_all_if_exists(build_dir)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::Platform;
    use crate::ops::project::LoadOptions;
    use crate::util::config::ToolchainConfig;
    use std::fs;
    use tempfile::TempDir;

    // The fake compiler copies the source to the `-o` output, which is
    // enough for the runner to see fresh targets.
    const FAKE_CC: &str = r#"#!/bin/sh
out=""
src=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) shift; out="$1" ;;
    -*) ;;
    *) src="$src $1" ;;
  esac
  shift
done
cat $src > "$out"
"#;

    fn setup() -> (TempDir, Project) {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("cc"), FAKE_CC).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(bin.join("cc"), fs::Permissions::from_mode(0o755)).unwrap();
        }

        fs::write(
            tmp.path().join("CBuild.toml"),
            "[build]\nsources = [\"*.c\"]\n[link]\nname = \"app\"\n",
        )
        .unwrap();
        fs::write(tmp.path().join("main.c"), "main").unwrap();

        let mut toolchain = ToolchainConfig::default();
        toolchain.toolchain.search_path = Some(bin.display().to_string());
        let opts = LoadOptions {
            platform: Some(Platform::LinuxGnuX86_64),
            toolchain,
        };
        let project = Project::load(&tmp.path().join("CBuild.toml"), opts).unwrap();
        (tmp, project)
    }

    #[test]
    #[cfg(all(unix, target_os = "linux", target_arch = "x86_64"))]
    fn test_build_then_clean() {
        let (tmp, project) = setup();

        let first = build(&project, &BuildOptions::default()).unwrap();
        assert_eq!(first.executed, 3);
        assert!(tmp.path().join("build/main.o").exists());
        assert!(tmp.path().join("build/app").exists());

        // The second run reloads the dependency record the first one wrote.
        let second = build(&project, &BuildOptions::default()).unwrap();
        assert_eq!(second.executed, 0);
        assert_eq!(second.up_to_date, 3);

        assert!(clean(&project).unwrap());
        assert!(!tmp.path().join("build").exists());
        assert!(!clean(&project).unwrap());
    }

    #[test]
    #[cfg(all(unix, target_os = "linux", target_arch = "x86_64"))]
    fn test_dry_run_writes_nothing() {
        let (tmp, project) = setup();
        let opts = BuildOptions {
            dry_run: true,
            ..Default::default()
        };

        let summary = build(&project, &opts).unwrap();
        assert_eq!(summary.executed, 3);
        assert!(!tmp.path().join("build").exists());
    }
}
