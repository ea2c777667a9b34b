//! Task descriptors handed to a scheduler.
//!
//! A task declares what it reads (`file_dep`), which other tasks must run
//! first (`task_dep`), what it writes (`targets`), and the ordered actions
//! that produce the targets. Deciding whether a task is stale is the
//! scheduler's job.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::builder::toolchain::CommandSpec;

/// One step of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Create a directory and its parents
    Mkdir { path: PathBuf },
    /// Run an external command
    Command(CommandSpec),
}

/// A scheduler-facing task description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Unique task name
    pub name: String,
    /// Actions run in order
    pub actions: Vec<Action>,
    /// Files whose modification makes this task stale
    pub file_dep: Vec<PathBuf>,
    /// Names of tasks that must complete first
    pub task_dep: Vec<String>,
    /// Files this task produces
    pub targets: Vec<PathBuf>,
}

impl TaskSpec {
    /// Create a task producing `target` with `command`.
    ///
    /// The task is named after the target and creates the target's parent
    /// directory before running the command.
    pub fn for_target(target: &Path, command: CommandSpec) -> Self {
        let mut actions = Vec::with_capacity(2);
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            actions.push(Action::Mkdir {
                path: parent.to_path_buf(),
            });
        }
        actions.push(Action::Command(command));

        TaskSpec {
            name: target.display().to_string(),
            actions,
            file_dep: Vec::new(),
            task_dep: Vec::new(),
            targets: vec![target.to_path_buf()],
        }
    }

    /// Set the file dependencies, dropping repeats but keeping first-seen order.
    pub fn with_file_dep(mut self, deps: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut file_dep: Vec<PathBuf> = Vec::new();
        for dep in deps {
            if !file_dep.contains(&dep) {
                file_dep.push(dep);
            }
        }
        self.file_dep = file_dep;
        self
    }

    /// Set the upstream task names.
    pub fn with_task_dep(mut self, task_dep: &[String]) -> Self {
        self.task_dep = task_dep.to_vec();
        self
    }

    /// The commands of this task, in order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.actions.iter().filter_map(|a| match a {
            Action::Command(cmd) => Some(cmd),
            Action::Mkdir { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_target_creates_parent() {
        let task = TaskSpec::for_target(Path::new("build/obj/a.o"), CommandSpec::new("cc"));
        assert_eq!(task.name, "build/obj/a.o");
        assert_eq!(
            task.actions[0],
            Action::Mkdir {
                path: PathBuf::from("build/obj")
            }
        );
        assert_eq!(task.targets, vec![PathBuf::from("build/obj/a.o")]);
        assert_eq!(task.commands().count(), 1);
    }

    #[test]
    fn test_for_target_without_parent_skips_mkdir() {
        let task = TaskSpec::for_target(Path::new("a.o"), CommandSpec::new("cc"));
        assert_eq!(task.actions.len(), 1);
    }

    #[test]
    fn test_file_dep_dedup_keeps_order() {
        let task = TaskSpec::for_target(Path::new("b/a.o"), CommandSpec::new("cc"))
            .with_file_dep(["a.c", "b/a.d", "a.c", "x.h"].map(PathBuf::from));
        assert_eq!(
            task.file_dep,
            ["a.c", "b/a.d", "x.h"].map(PathBuf::from).to_vec()
        );
    }

    #[test]
    fn test_json_shape() {
        let task = TaskSpec::for_target(Path::new("build/a.o"), CommandSpec::new("cc").arg("-c"))
            .with_task_dep(&["gen".to_string()]);
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["name"], "build/a.o");
        assert_eq!(json["actions"][0]["type"], "mkdir");
        assert_eq!(json["actions"][1]["type"], "command");
        assert_eq!(json["actions"][1]["program"], "cc");
        assert_eq!(json["task_dep"][0], "gen");
    }
}
