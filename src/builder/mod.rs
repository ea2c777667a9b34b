//! C build task generation and execution.
//!
//! This module derives dependency, object and link tasks from a source list
//! and runs them with an mtime-driven executor.

pub mod cbuild;
pub mod depfile;
pub mod executor;
pub mod format;
pub mod task;
pub mod toolchain;

pub use cbuild::{ArtifactLayout, CBuild, CBuildConfig};
pub use depfile::parse_depfile;
pub use executor::{RunSummary, TaskRunner};
pub use task::{Action, TaskSpec};
pub use toolchain::{CommandSpec, GccToolchain, LinkMode, Toolchain};
