//! A minimal mtime-driven task runner.
//!
//! Runs stages of [`TaskSpec`]s in order. Tasks inside a stage are
//! independent (their targets never overlap) and run in parallel. A task is
//! skipped when every target exists and no file dependency is newer than
//! the oldest target. Tasks without targets always run.
//!
//! `task_dep` names are not resolved here; callers order stages so that
//! upstream tasks run first.
//!
//! With a working directory set, commands run there and relative paths in
//! tasks (such as headers a compiler recorded relative to it) resolve
//! against it.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::builder::task::{Action, TaskSpec};
use crate::util::fs::{ensure_dir, mtime};
use crate::util::process::ProcessBuilder;

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tasks whose actions ran (or would run, in a dry run)
    pub executed: usize,
    /// Tasks skipped as up to date
    pub up_to_date: usize,
}

impl RunSummary {
    fn add(&mut self, other: RunSummary) {
        self.executed += other.executed;
        self.up_to_date += other.up_to_date;
    }
}

/// Task runner with progress reporting.
#[derive(Debug, Clone, Default)]
pub struct TaskRunner {
    jobs: Option<usize>,
    force: bool,
    dry_run: bool,
    verbose: bool,
    cwd: Option<PathBuf>,
}

impl TaskRunner {
    /// Create a runner using rayon's default parallelism.
    pub fn new() -> Self {
        TaskRunner::default()
    }

    /// Limit the number of tasks run concurrently.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Run every task regardless of staleness.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Report what would run without running it.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Log each command instead of showing a progress bar.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run commands in `cwd` and resolve relative task paths against it.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Run stages in order, stopping at the first failing task.
    pub fn run_stages(&self, stages: &[Vec<TaskSpec>]) -> Result<RunSummary> {
        let start = Instant::now();
        let mut summary = RunSummary::default();

        for stage in stages {
            summary.add(self.run_stage(stage)?);
        }

        tracing::info!(
            "Finished {} task(s), {} up to date, in {:.2}s",
            summary.executed,
            summary.up_to_date,
            start.elapsed().as_secs_f64()
        );

        Ok(summary)
    }

    /// Run one stage of independent tasks.
    pub fn run_stage(&self, tasks: &[TaskSpec]) -> Result<RunSummary> {
        if tasks.is_empty() {
            return Ok(RunSummary::default());
        }

        let pb = self.progress_bar(tasks.len());
        let executed = AtomicUsize::new(0);
        let up_to_date = AtomicUsize::new(0);

        let run_all = || -> Result<()> {
            tasks.par_iter().try_for_each(|task| -> Result<()> {
                if self.run_task(task)? {
                    executed.fetch_add(1, Ordering::SeqCst);
                } else {
                    up_to_date.fetch_add(1, Ordering::SeqCst);
                }
                if let Some(ref pb) = pb {
                    pb.inc(1);
                }
                Ok(())
            })
        };

        let result = match self.jobs {
            Some(jobs) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .context("failed to create worker pool")?;
                pool.install(run_all)
            }
            None => run_all(),
        };

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        result?;

        Ok(RunSummary {
            executed: executed.into_inner(),
            up_to_date: up_to_date.into_inner(),
        })
    }

    fn progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if self.verbose || total < 2 {
            return None;
        }
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        let pb = ProgressBar::new(total as u64);
        pb.set_style(style);
        Some(pb)
    }

    /// Run a single task. Returns `false` if it was up to date.
    fn run_task(&self, task: &TaskSpec) -> Result<bool> {
        if !self.force && is_up_to_date(task, self.cwd.as_deref())? {
            tracing::debug!("Fresh {}", task.name);
            return Ok(false);
        }

        if self.dry_run {
            tracing::info!("Would run {}", task.name);
            return Ok(true);
        }

        for action in &task.actions {
            match action {
                Action::Mkdir { path } => ensure_dir(&resolve(path, self.cwd.as_deref()))?,
                Action::Command(spec) => {
                    let mut cmd = ProcessBuilder::from_spec(spec);
                    if let Some(ref cwd) = self.cwd {
                        cmd = cmd.cwd(cwd);
                    }
                    if self.verbose {
                        tracing::info!("{}", cmd.display_command());
                    }
                    cmd.exec_and_check()
                        .with_context(|| format!("task `{}` failed", task.name))?;
                }
            }
        }

        Ok(true)
    }
}

fn resolve<'a>(path: &'a Path, cwd: Option<&Path>) -> Cow<'a, Path> {
    match cwd {
        Some(cwd) if path.is_relative() => Cow::Owned(cwd.join(path)),
        _ => Cow::Borrowed(path),
    }
}

/// Whether every target exists and is newer than every file dependency.
///
/// Relative paths are looked up under `cwd` when given. A missing file
/// dependency makes the task stale so that the tool itself reports the
/// problem.
pub fn is_up_to_date(task: &TaskSpec, cwd: Option<&Path>) -> Result<bool> {
    if task.targets.is_empty() {
        return Ok(false);
    }

    let mut oldest_target = None;
    for target in &task.targets {
        match mtime(&resolve(target, cwd))? {
            Some(t) => {
                oldest_target = Some(match oldest_target {
                    Some(o) if o < t => o,
                    _ => t,
                });
            }
            None => return Ok(false),
        }
    }
    let Some(oldest_target) = oldest_target else {
        return Ok(false);
    };

    for dep in &task.file_dep {
        match mtime(&resolve(dep, cwd))? {
            Some(t) if t <= oldest_target => {}
            _ => {
                tracing::trace!("{} is stale because of {}", task.name, dep.display());
                return Ok(false);
            }
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::toolchain::CommandSpec;
    use std::fs::{self, File};
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn touch(path: &Path, age: Duration) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let file = File::options()
            .create(true)
            .append(true)
            .open(path)
            .unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    fn copy_task(src: &Path, dst: &Path) -> TaskSpec {
        TaskSpec::for_target(
            dst,
            CommandSpec::new("cp")
                .arg(src.display().to_string())
                .arg(dst.display().to_string()),
        )
        .with_file_dep([src.to_path_buf()])
    }

    #[test]
    fn test_missing_target_is_stale() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.c");
        touch(&src, Duration::from_secs(10));

        let task = copy_task(&src, &tmp.path().join("build/a.o"));
        assert!(!is_up_to_date(&task, None).unwrap());
    }

    #[test]
    fn test_newer_dep_is_stale() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.c");
        let obj = tmp.path().join("a.o");
        touch(&obj, Duration::from_secs(100));
        touch(&src, Duration::from_secs(10));

        assert!(!is_up_to_date(&copy_task(&src, &obj), None).unwrap());
    }

    #[test]
    fn test_older_dep_is_fresh() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.c");
        let obj = tmp.path().join("a.o");
        touch(&src, Duration::from_secs(100));
        touch(&obj, Duration::from_secs(10));

        assert!(is_up_to_date(&copy_task(&src, &obj), None).unwrap());
    }

    #[test]
    fn test_missing_dep_is_stale() {
        let tmp = TempDir::new().unwrap();
        let obj = tmp.path().join("a.o");
        touch(&obj, Duration::from_secs(10));

        let task = copy_task(&tmp.path().join("gone.h"), &obj);
        assert!(!is_up_to_date(&task, None).unwrap());
    }

    #[test]
    fn test_targetless_task_always_runs() {
        let task = TaskSpec {
            name: "fmt".to_string(),
            actions: Vec::new(),
            file_dep: Vec::new(),
            task_dep: Vec::new(),
            targets: Vec::new(),
        };
        assert!(!is_up_to_date(&task, None).unwrap());
    }

    #[test]
    #[cfg(unix)]
    fn test_run_stages_then_skip() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.txt");
        fs::write(&src, "hello").unwrap();
        let mid = tmp.path().join("out/mid.txt");
        let end = tmp.path().join("out/deep/end.txt");

        let stages = vec![vec![copy_task(&src, &mid)], vec![copy_task(&mid, &end)]];
        let runner = TaskRunner::new().jobs(Some(2));

        let first = runner.run_stages(&stages).unwrap();
        assert_eq!(first.executed, 2);
        assert_eq!(fs::read_to_string(&end).unwrap(), "hello");

        let second = runner.run_stages(&stages).unwrap();
        assert_eq!(
            second,
            RunSummary {
                executed: 0,
                up_to_date: 2
            }
        );

        let forced = runner.clone().force(true).run_stages(&stages).unwrap();
        assert_eq!(forced.executed, 2);
    }

    #[test]
    #[cfg(unix)]
    fn test_relative_paths_resolve_against_cwd() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), "rel").unwrap();
        let task = copy_task(Path::new("a.txt"), Path::new("out/b.txt"));
        let runner = TaskRunner::new().cwd(tmp.path());

        assert_eq!(runner.run_stage(&[task.clone()]).unwrap().executed, 1);
        assert_eq!(fs::read_to_string(tmp.path().join("out/b.txt")).unwrap(), "rel");

        assert!(is_up_to_date(&task, Some(tmp.path())).unwrap());
        assert_eq!(runner.run_stage(&[task]).unwrap().up_to_date, 1);
    }

    #[test]
    fn test_dry_run_does_nothing() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.txt");
        fs::write(&src, "x").unwrap();
        let dst = tmp.path().join("out/b.txt");

        let summary = TaskRunner::new()
            .dry_run(true)
            .run_stage(&[copy_task(&src, &dst)])
            .unwrap();
        assert_eq!(summary.executed, 1);
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_failure_stops_later_stages() {
        let tmp = TempDir::new().unwrap();
        let never = tmp.path().join("never.txt");
        let failing = TaskSpec::for_target(
            &tmp.path().join("fail.txt"),
            CommandSpec::new("sh").args(["-c", "echo no compiler here >&2; exit 1"]),
        );
        let stages = vec![
            vec![failing],
            vec![copy_task(&PathBuf::from("/dev/null"), &never)],
        ];

        let err = TaskRunner::new().run_stages(&stages).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("fail.txt"));
        assert!(msg.contains("no compiler here"));
        assert!(!never.exists());
    }
}
