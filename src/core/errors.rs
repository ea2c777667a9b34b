//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::platform::Platform;

/// Error raised while configuring a build, before any task runs.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("unsupported platform `{name}`")]
    UnsupportedPlatform { name: String },

    #[error("no C toolchain known for platform `{platform}` (local platform is `{local}`)")]
    UnsupportedToolchain { platform: Platform, local: Platform },

    #[error("no C compiler found for platform `{platform}` (tried: {})", .candidates.join(", "))]
    CompilerNotFound {
        platform: Platform,
        candidates: Vec<String>,
    },

    #[error("source `{}` is not under source root `{}`", .source_path.display(), .root.display())]
    SourceOutsideRoot { source_path: PathBuf, root: PathBuf },

    #[error(
        "sources `{}` and `{}` both map to `{}`",
        .first.display(),
        .second.display(),
        .artifact.display()
    )]
    ArtifactCollision {
        first: PathBuf,
        second: PathBuf,
        artifact: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiler_not_found_lists_candidates() {
        let err = BuildError::CompilerNotFound {
            platform: Platform::LinuxGnuAarch64,
            candidates: vec!["aarch64-linux-gnu-gcc".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("linux_gnu_aarch64"));
        assert!(msg.contains("aarch64-linux-gnu-gcc"));
    }

    #[test]
    fn test_unsupported_platform_names_value() {
        let err = BuildError::UnsupportedPlatform {
            name: "plan9_mips".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported platform `plan9_mips`");
    }

    #[test]
    fn test_collision_names_both_sources() {
        let err = BuildError::ArtifactCollision {
            first: PathBuf::from("src/a.c"),
            second: PathBuf::from("src/a.cpp"),
            artifact: PathBuf::from("build/a.o"),
        };
        let msg = err.to_string();
        assert!(msg.contains("src/a.c"));
        assert!(msg.contains("src/a.cpp"));
        assert!(msg.contains("build/a.o"));
    }
}
