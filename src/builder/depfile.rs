//! Make-style dependency record (`.d` file) parsing.
//!
//! The compiler's `-MM` mode writes a single logical line:
//!
//! ```text
//! build/main.o: src/main.c include/a.h \
//!   include/b.h
//! ```
//!
//! Paths containing spaces are written with `\ ` and a literal `$` as `$$`.
//!
//! Records are disposable caches. A missing or malformed record yields an
//! empty header list; the record's own task regenerates it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Read and parse the record at `path`.
pub fn parse_depfile(path: &Path) -> Vec<PathBuf> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!("Ignoring unreadable dependency record {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    parse_depfile_str(&content).unwrap_or_else(|| {
        tracing::debug!("Ignoring malformed dependency record {}", path.display());
        Vec::new()
    })
}

/// Parse record text into header paths.
///
/// Returns `None` when the text has no `target:` prefix. Empty text parses
/// to an empty list.
pub fn parse_depfile_str(content: &str) -> Option<Vec<PathBuf>> {
    if content.trim().is_empty() {
        return Some(Vec::new());
    }

    let (first_line, _) = content.split_once('\n').unwrap_or((content, ""));
    let colon = first_line.find(':')?;

    let joined = content[colon + 1..]
        .replace("\\\r\n", " ")
        .replace("\\\n", " ");

    Some(split_prerequisites(&joined))
}

/// Split on unescaped whitespace, undoing Make escapes.
fn split_prerequisites(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&' ') => {
                chars.next();
                current.push(' ');
            }
            '$' if chars.peek() == Some(&'$') => {
                chars.next();
                current.push('$');
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    paths.push(PathBuf::from(std::mem::take(&mut current)));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        paths.push(PathBuf::from(current));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_continuation_lines() {
        let parsed = parse_depfile_str("target.o: a.h b.h \\\n   c.h\n").unwrap();
        assert_eq!(parsed, paths(&["a.h", "b.h", "c.h"]));
    }

    #[test]
    fn test_crlf_continuations() {
        let parsed = parse_depfile_str("t.o: a.c \\\r\n b.h \\\r\n c.h\r\n").unwrap();
        assert_eq!(parsed, paths(&["a.c", "b.h", "c.h"]));
    }

    #[test]
    fn test_only_first_colon_is_stripped() {
        let parsed = parse_depfile_str("build/x.o: src/x.c C:/inc/y.h\n").unwrap();
        assert_eq!(parsed, paths(&["src/x.c", "C:/inc/y.h"]));
    }

    #[test]
    fn test_escaped_spaces_and_dollars() {
        let parsed = parse_depfile_str(
            "t.o: src/t.c my\\ headers/a\\ b.h cost$$.h \\\n C:\\inc\\x.h\n",
        )
        .unwrap();
        assert_eq!(
            parsed,
            paths(&["src/t.c", "my headers/a b.h", "cost$.h", "C:\\inc\\x.h"])
        );
    }

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let parsed = parse_depfile_str("t.o: a.h b.h a.h\n").unwrap();
        assert_eq!(parsed, paths(&["a.h", "b.h", "a.h"]));
    }

    #[test]
    fn test_target_without_prerequisites() {
        assert_eq!(parse_depfile_str("t.o:\n").unwrap(), Vec::<PathBuf>::new());
        assert_eq!(parse_depfile_str("").unwrap(), Vec::<PathBuf>::new());
    }

    #[test]
    fn test_missing_colon_is_malformed() {
        assert!(parse_depfile_str("garbage without target\n").is_none());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(parse_depfile(&tmp.path().join("absent.d")).is_empty());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.d");
        std::fs::write(&path, "no target here").unwrap();
        assert!(parse_depfile(&path).is_empty());

        std::fs::write(&path, [0xff, 0xfe, b':', b' ', b'a']).unwrap();
        assert!(parse_depfile(&path).is_empty());
    }

    #[test]
    fn test_reparse_is_identical() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("main.d");
        std::fs::write(&path, "main.o: main.c util.h \\\n  config.h\n").unwrap();

        let first = parse_depfile(&path);
        let second = parse_depfile(&path);
        assert_eq!(first, second);
        assert_eq!(first, paths(&["main.c", "util.h", "config.h"]));
    }
}
