//! `clang-format` tasks over a source list.

use std::path::{Path, PathBuf};

use crate::builder::task::{Action, TaskSpec};
use crate::builder::toolchain::CommandSpec;

/// One in-place formatting task per source, named after the source.
///
/// With `style` set, clang-format reads its style from that file.
pub fn format_tasks<'a>(
    sources: &'a [PathBuf],
    style: Option<&'a Path>,
) -> impl Iterator<Item = TaskSpec> + 'a {
    sources.iter().map(move |source| {
        let mut cmd = CommandSpec::new("clang-format").arg("-i");
        if let Some(style) = style {
            cmd = cmd.arg(format!("-style=file:{}", style.display()));
        }
        cmd = cmd.arg(source.display().to_string());

        TaskSpec {
            name: source.display().to_string(),
            actions: vec![Action::Command(cmd)],
            file_dep: vec![source.clone()],
            task_dep: Vec::new(),
            targets: Vec::new(),
        }
    })
}
