//! Lexical path normalization

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` segments and redundant separators without
/// touching the filesystem.
///
/// `..` at the start of a relative path is kept; `..` directly under the
/// root of an absolute path is dropped (`/..` is `/`). An empty result is `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut normals: Vec<OsString> = Vec::new();
    let mut rooted = false;

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                out.push(prefix.as_os_str());
                rooted = true;
            }
            Component::RootDir => {
                out.push(component.as_os_str());
                rooted = true;
            }
            Component::CurDir => {}
            Component::ParentDir => match normals.last() {
                Some(last) if last.as_os_str() != OsStr::new("..") => {
                    normals.pop();
                }
                _ => {
                    if !rooted {
                        normals.push(OsString::from(".."));
                    }
                }
            },
            Component::Normal(part) => normals.push(part.to_os_string()),
        }
    }

    for part in normals {
        out.push(part);
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// True when `path` is `root` itself or lies beneath it, compared
/// component-wise (`/ws2` is not under `/ws`).
pub fn is_within(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_dots() {
        assert_eq!(clean_path(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(clean_path(Path::new("./a//b/")), PathBuf::from("a/b"));
    }

    #[test]
    fn test_clean_keeps_leading_parent_for_relative() {
        assert_eq!(clean_path(Path::new("../secret.txt")), PathBuf::from("../secret.txt"));
        assert_eq!(clean_path(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(clean_path(Path::new("../../x")), PathBuf::from("../../x"));
    }

    #[test]
    fn test_clean_drops_parent_above_root() {
        assert_eq!(clean_path(Path::new("/../etc/passwd")), PathBuf::from("/etc/passwd"));
        assert_eq!(clean_path(Path::new("/ws/../../x")), PathBuf::from("/x"));
    }

    #[test]
    fn test_clean_empty_is_current_dir() {
        assert_eq!(clean_path(Path::new(".")), PathBuf::from("."));
        assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_is_within_is_component_wise() {
        assert!(is_within(Path::new("/ws"), Path::new("/ws")));
        assert!(is_within(Path::new("/ws"), Path::new("/ws/a/b")));
        assert!(!is_within(Path::new("/ws"), Path::new("/ws2/a")));
        assert!(!is_within(Path::new("/ws"), Path::new("/")));
    }
}
