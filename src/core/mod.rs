//! Core data structures for cbuild.
//!
//! This module contains the foundational types used throughout cbuild:
//! target platforms, the project manifest, and configuration errors.

pub mod errors;
pub mod manifest;
pub mod platform;

pub use errors::BuildError;
pub use manifest::{find_manifest, Manifest, MANIFEST_NAME};
pub use platform::Platform;
