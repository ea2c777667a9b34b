//! High-level operations.
//!
//! This module contains the implementation of cbuild commands.

pub mod cbuild_build;
pub mod project;

pub use cbuild_build::{build, clean, format, BuildOptions};
pub use project::{LoadOptions, Project, Stage};
