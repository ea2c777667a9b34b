//! `cbuild fmt` command

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::commands::load_project;
use cbuild::ops::{format, BuildOptions};

pub fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;

    let opts = BuildOptions {
        verbose: global.verbose,
        ..Default::default()
    };
    let summary = format(&project, &opts)?;
    eprintln!("   Formatted {} file(s)", summary.executed);

    Ok(())
}
