//! Compiler candidate lists and search-path probing.

use std::path::{Path, PathBuf};

use crate::core::platform::Platform;

/// List the compiler executables to try for `platform`, in order.
///
/// The override and the generic `cc`/`gcc` names only apply when building
/// for the local platform; cross targets rely on their prefixed compiler.
pub fn compiler_candidates(
    platform: Platform,
    local: Platform,
    cc_override: Option<&Path>,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if platform == local {
        if let Some(cc) = cc_override {
            candidates.push(cc.to_path_buf());
        }
        candidates.push(PathBuf::from("cc"));
        candidates.push(PathBuf::from("gcc"));
    }

    if let Some(cross) = platform.cross_compiler() {
        candidates.push(PathBuf::from(cross));
    }

    candidates
}

/// Return the first candidate found on the search path.
///
/// With `search_path` unset the process `PATH` is used. Candidates that
/// already contain a directory component are checked as given.
pub fn probe_compiler(candidates: &[PathBuf], search_path: Option<&str>) -> Option<PathBuf> {
    candidates.iter().find_map(|candidate| {
        let found = match search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_default();
                which::which_in(candidate, Some(paths), cwd)
            }
            None => which::which(candidate),
        };

        match found {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::trace!("Compiler candidate {} not usable: {}", candidate.display(), e);
                None
            }
        }
    })
}
