//! `cbuild toolchain` command

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::commands::load_project;
use cbuild::builder::LinkMode;

pub fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let toolchain = project.cbuild().toolchain();
    let platform = toolchain.platform();

    println!("Platform: {}", platform);
    println!("Local:    {}", toolchain.local());
    println!("Compiler: {}", toolchain.resolve()?.compiler_path().display());
    println!();
    println!("Executable suffix: {:?}", platform.exe_suffix());
    println!("Library suffix:    {:?}", platform.lib_suffix());
    println!();
    println!("CFLAGS:  {}", toolchain.platform_cflags().join(" "));
    println!(
        "LDFLAGS: {}",
        toolchain.platform_ldflags(LinkMode::Executable).join(" ")
    );
    println!(
        "Shared:  {}",
        toolchain.platform_ldflags(LinkMode::SharedLib).join(" ")
    );

    Ok(())
}
