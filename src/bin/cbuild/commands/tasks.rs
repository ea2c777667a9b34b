//! `cbuild tasks` command

use std::io::Write;

use anyhow::Result;

use crate::cli::{GlobalArgs, TasksArgs};
use crate::commands::load_project;

pub fn execute(global: &GlobalArgs, args: TasksArgs) -> Result<()> {
    let project = load_project(global)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for stage in args.stage.stages() {
        for task in project.tasks(stage)? {
            serde_json::to_writer(&mut out, &task)?;
            writeln!(out)?;
        }
    }

    Ok(())
}
