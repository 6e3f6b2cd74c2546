//! Lexical path cleaning

use std::path::{Component, Path, PathBuf};

/// Clean `path` without touching the file system.
///
/// `.` components and trailing separators are dropped and each `..`
/// removes the component before it. A `..` directly under the root is
/// dropped; leading `..` components of a relative path are kept. An empty
/// result becomes `.`.
pub fn clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir | Component::CurDir) | None => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        PathBuf::from(".")
    } else {
        parts.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaned(path: &str) -> PathBuf {
        clean(Path::new(path))
    }

    #[test]
    fn test_clean_current_dir_and_separators() {
        assert_eq!(cleaned("certs/"), PathBuf::from("certs"));
        assert_eq!(cleaned("./certs/./live"), PathBuf::from("certs/live"));
        assert_eq!(cleaned("."), PathBuf::from("."));
        assert_eq!(cleaned(""), PathBuf::from("."));
        assert_eq!(cleaned("/etc/ssl/"), PathBuf::from("/etc/ssl"));
    }

    #[test]
    fn test_clean_parent_dir() {
        assert_eq!(cleaned("certs/live/../old"), PathBuf::from("certs/old"));
        assert_eq!(cleaned("/ssl/../certs/a.crt"), PathBuf::from("/certs/a.crt"));
        assert_eq!(cleaned("certs/.."), PathBuf::from("."));
        assert_eq!(cleaned("/../etc"), PathBuf::from("/etc"));
        assert_eq!(cleaned("/.."), PathBuf::from("/"));
        assert_eq!(cleaned("../certs"), PathBuf::from("../certs"));
        assert_eq!(cleaned("../../a/../b"), PathBuf::from("../../b"));
        assert_eq!(cleaned("a/../../b"), PathBuf::from("../b"));
    }
}
