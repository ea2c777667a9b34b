//! Toolchain resolution for C compilers.
//!
//! A [`Toolchain`] is built from an explicit [`ToolchainConfig`] and a
//! target [`Platform`]. The compiler executable is resolved lazily and
//! memoized for the lifetime of the `Toolchain` value:
//!
//! 1. Configured `cc` override (only when targeting the local platform)
//! 2. `cc`, then `gcc` (only when targeting the local platform)
//! 3. The target platform's cross compiler, if it has one
//!
//! Each candidate is probed on the configured search path (default `PATH`).

use std::path::PathBuf;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::core::errors::BuildError;
use crate::core::platform::Platform;
use crate::util::config::ToolchainConfig;
use crate::util::process::display_command;

mod detect;
mod gcc;

pub use detect::{compiler_candidates, probe_compiler};
pub use gcc::{CompileInput, GccToolchain, LinkInput};

/// Link mode for executables and shared libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkMode {
    Executable,
    SharedLib,
}

impl LinkMode {
    /// Output file suffix for this mode on the given platform.
    pub fn suffix(&self, platform: Platform) -> &'static str {
        match self {
            LinkMode::Executable => platform.exe_suffix(),
            LinkMode::SharedLib => platform.lib_suffix(),
        }
    }
}

/// A command to execute: program and arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// The program to run (e.g., "gcc", "clang-format")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Render the command line for logs and error messages.
    pub fn display_command(&self) -> String {
        display_command(&self.program, &self.args)
    }
}

/// Toolchain selection for one target platform.
#[derive(Debug)]
pub struct Toolchain {
    platform: Platform,
    local: Platform,
    config: ToolchainConfig,
    resolved: OnceLock<GccToolchain>,
}

impl Toolchain {
    /// Create a toolchain for `platform`, built on the `local` host.
    pub fn new(platform: Platform, local: Platform, config: ToolchainConfig) -> Self {
        Toolchain {
            platform,
            local,
            config,
            resolved: OnceLock::new(),
        }
    }

    /// The target platform.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The host platform.
    pub fn local(&self) -> Platform {
        self.local
    }

    /// Whether the target differs from the host.
    pub fn is_cross(&self) -> bool {
        self.platform != self.local
    }

    /// Compile flags applied to every compile and dependency scan.
    pub fn platform_cflags(&self) -> Vec<String> {
        let mut flags = self.config.toolchain.cflags.clone();
        if self.is_cross() {
            flags.extend(self.platform.cross_cflags().iter().map(|f| f.to_string()));
        }
        flags
    }

    /// Link flags for the given mode.
    pub fn platform_ldflags(&self, mode: LinkMode) -> Vec<String> {
        let mut flags = Vec::new();
        if mode == LinkMode::SharedLib {
            flags.extend(
                self.platform
                    .shared_link_flags()
                    .iter()
                    .map(|f| f.to_string()),
            );
        }
        flags.extend(self.config.toolchain.ldflags.iter().cloned());
        flags
    }

    /// Resolve the compiler, probing the search path on first use.
    pub fn resolve(&self) -> Result<&GccToolchain, BuildError> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(resolved);
        }

        let candidates = compiler_candidates(
            self.platform,
            self.local,
            self.config.toolchain.cc.as_deref(),
        );
        if candidates.is_empty() {
            return Err(BuildError::UnsupportedToolchain {
                platform: self.platform,
                local: self.local,
            });
        }

        let search_path = self.config.toolchain.search_path.as_deref();
        let Some(cc) = probe_compiler(&candidates, search_path) else {
            return Err(BuildError::CompilerNotFound {
                platform: self.platform,
                candidates: candidates
                    .iter()
                    .map(|c| c.display().to_string())
                    .collect(),
            });
        };

        tracing::debug!("Resolved C compiler for {}: {}", self.platform, cc.display());

        let gcc = GccToolchain::new(cc, self.platform_cflags());
        Ok(self.resolved.get_or_init(|| gcc))
    }
}
