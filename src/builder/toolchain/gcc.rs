//! GCC-compatible command composition.

use std::path::{Path, PathBuf};

use super::{CommandSpec, LinkMode};
use crate::core::platform::Platform;

/// Input for a compile or dependency-scan step.
#[derive(Debug, Clone)]
pub struct CompileInput {
    /// Source file to compile
    pub source: PathBuf,
    /// Output file (object or dependency record)
    pub output: PathBuf,
    /// Additional compiler flags
    pub cflags: Vec<String>,
}

/// Input for a link step.
#[derive(Debug, Clone)]
pub struct LinkInput {
    /// Object files to link
    pub objects: Vec<PathBuf>,
    /// Output file (executable or shared library)
    pub output: PathBuf,
    /// Additional linker flags, placed before the objects
    pub ldflags: Vec<String>,
    /// Libraries, placed after the objects
    pub libs: Vec<String>,
}

/// A resolved GCC-style compiler driver (gcc, clang, mingw, musl-gcc).
#[derive(Debug, Clone)]
pub struct GccToolchain {
    /// Path to the C compiler, also used as the linker driver
    pub cc: PathBuf,
    /// Platform compile flags, emitted before per-build flags
    pub platform_cflags: Vec<String>,
}

impl GccToolchain {
    /// Create a new GCC-style toolchain.
    pub fn new(cc: PathBuf, platform_cflags: Vec<String>) -> Self {
        GccToolchain {
            cc,
            platform_cflags,
        }
    }

    /// Path to the compiler driver.
    pub fn compiler_path(&self) -> &Path {
        &self.cc
    }

    /// Generate a `-MM` command writing the header list of `input.source`.
    pub fn depfile_command(&self, input: &CompileInput) -> CommandSpec {
        self.compile_like("-MM", input)
    }

    /// Generate a `-c` command compiling `input.source` to an object.
    pub fn compile_command(&self, input: &CompileInput) -> CommandSpec {
        self.compile_like("-c", input)
    }

    fn compile_like(&self, mode: &str, input: &CompileInput) -> CommandSpec {
        CommandSpec::new(&self.cc)
            .arg(mode)
            .args(self.platform_cflags.iter().cloned())
            .args(input.cflags.iter().cloned())
            .arg("-o")
            .arg(input.output.display().to_string())
            .arg(input.source.display().to_string())
    }

    /// Generate a link command.
    ///
    /// `platform_ldflags` must already contain the shared-library flags for
    /// `mode` when linking a shared library.
    pub fn link_command(&self, input: &LinkInput, platform_ldflags: &[String]) -> CommandSpec {
        CommandSpec::new(&self.cc)
            .args(platform_ldflags.iter().cloned())
            .args(input.ldflags.iter().cloned())
            .arg("-o")
            .arg(input.output.display().to_string())
            .args(input.objects.iter().map(|o| o.display().to_string()))
            .args(input.libs.iter().cloned())
    }

    /// Output file name for a link product called `name`.
    pub fn output_name(name: &str, mode: LinkMode, platform: Platform) -> String {
        format!("{}{}", name, mode.suffix(platform))
    }
}
