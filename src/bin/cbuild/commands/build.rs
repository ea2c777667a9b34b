//! `cbuild build` command

use anyhow::Result;

use crate::cli::{BuildArgs, GlobalArgs};
use crate::commands::load_project;
use cbuild::ops::{build, BuildOptions};
use cbuild::util::fs::relative_path;

pub fn execute(global: &GlobalArgs, args: BuildArgs) -> Result<()> {
    let project = load_project(global)?;

    let opts = BuildOptions {
        jobs: args.jobs,
        force: args.force,
        dry_run: args.dry_run,
        verbose: global.verbose,
    };

    let summary = build(&project, &opts)?;

    if !args.dry_run {
        if let Some((output, _)) = project.link_output() {
            let cwd = std::env::current_dir()?;
            eprintln!("    Finished {}", relative_path(&cwd, &output).display());
        } else if summary.executed == 0 {
            eprintln!("    Finished (nothing to do)");
        }
    }

    Ok(())
}
