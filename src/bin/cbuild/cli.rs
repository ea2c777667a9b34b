//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use cbuild::core::Platform;
use cbuild::ops::Stage;

/// cbuild - incremental C builds driven by compiler dependency records
#[derive(Parser)]
#[command(name = "cbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to CBuild.toml (defaults to searching upward from the current directory)
    #[arg(long, global = true)]
    pub manifest_path: Option<PathBuf>,

    /// Target platform, e.g. `linux_gnu_aarch64`
    #[arg(long, global = true, env = "TARGET_PLATFORM")]
    pub platform: Option<Platform>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
pub struct GlobalArgs {
    pub verbose: bool,
    pub manifest_path: Option<PathBuf>,
    pub platform: Option<Platform>,
}

impl Cli {
    pub fn global(&self) -> GlobalArgs {
        GlobalArgs {
            verbose: self.verbose,
            manifest_path: self.manifest_path.clone(),
            platform: self.platform,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print generated tasks as JSON lines
    Tasks(TasksArgs),

    /// Build stale dependency records, objects and the link product
    Build(BuildArgs),

    /// Remove the build directory
    Clean,

    /// Format sources in place with clang-format
    Fmt,

    /// Show the resolved platform and toolchain
    Toolchain,
}

#[derive(Args)]
pub struct TasksArgs {
    /// Which task family to print
    #[arg(long, value_enum, default_value = "all")]
    pub stage: StageArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StageArg {
    Deps,
    Objs,
    Link,
    All,
}

impl StageArg {
    pub fn stages(self) -> Vec<Stage> {
        match self {
            StageArg::Deps => vec![Stage::Deps],
            StageArg::Objs => vec![Stage::Objs],
            StageArg::Link => vec![Stage::Link],
            StageArg::All => Stage::ALL.to_vec(),
        }
    }
}

#[derive(Args)]
pub struct BuildArgs {
    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Rebuild everything regardless of timestamps
    #[arg(long)]
    pub force: bool,

    /// Show what would run without running it
    #[arg(long)]
    pub dry_run: bool,
}
