//! cbuild CLI - incremental C builds

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("cbuild=debug")
    } else {
        EnvFilter::new("cbuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let global = cli.global();
    match cli.command {
        Commands::Tasks(args) => commands::tasks::execute(&global, args),
        Commands::Build(args) => commands::build::execute(&global, args),
        Commands::Clean => commands::clean::execute(&global),
        Commands::Fmt => commands::fmt::execute(&global),
        Commands::Toolchain => commands::toolchain::execute(&global),
    }
}
