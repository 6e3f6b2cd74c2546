//! Recursive file discovery

use certmatch_core::{Error, Result, ScanEvent, ScanObserver};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Collect every regular file below `root`, depth first.
///
/// Symbolic links to files are included; links to directories are not
/// followed. Failing to list any directory fails the whole walk.
pub fn walk(root: &Path, observer: &dyn ScanObserver) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_dir(root, observer, &mut files)?;
    Ok(files)
}

fn walk_dir(dir: &Path, observer: &dyn ScanObserver, files: &mut Vec<PathBuf>) -> Result<()> {
    observer.on_event(&ScanEvent::DirectoryEntered {
        path: dir.to_path_buf(),
    });

    let entries = fs::read_dir(dir).map_err(|e| Error::list_dir(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| Error::list_dir(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::list_dir(&path, e))?;

        if file_type.is_dir() {
            walk_dir(&path, observer, files)?;
        } else if file_type.is_file() {
            files.push(path);
        } else if file_type.is_symlink() {
            match fs::metadata(&path) {
                Ok(target) if target.is_file() => files.push(path),
                Ok(_) => debug!(path = %path.display(), "Not following directory link"),
                Err(e) => debug!(path = %path.display(), error = %e, "Dangling link"),
            }
        }
    }

    Ok(())
}

/// Normalize a user supplied root lexically, resolving `.` and `..`
pub fn normalize_root(root: &Path) -> PathBuf {
    certmatch_core::clean(root)
}
