//! cbuild - incremental C builds driven by compiler dependency records
//!
//! This crate provides the core library functionality for cbuild,
//! including platform and toolchain resolution, task generation, and
//! task execution.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use builder::{CBuild, CBuildConfig, LinkMode, TaskSpec, Toolchain};
pub use core::{BuildError, Manifest, Platform};
pub use util::ToolchainConfig;
