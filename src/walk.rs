//! Deterministic tree traversal
//!
//! The walker is glue around the core: it discovers `.py` files under each
//! root in sorted order, skips dotfiles and dot-directories, and owns
//! exclusion-list matching. Excluded paths never reach the classifier.

use crate::config::types::Result;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Collect the files one root contributes, in classification order.
///
/// A root that is a regular file is returned directly, without extension
/// filtering. A directory root is walked depth-first with entries sorted by
/// file name, yielding only regular `.py` files.
pub fn discover(root: &Path, excludes: &[String]) -> Result<Vec<PathBuf>> {
    if is_excluded_path(root, excludes) {
        log::debug!("skipping excluded root {}", root.display());
        return Ok(Vec::new());
    }

    if root.is_file() {
        return Ok(vec![normalize(root)]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !should_skip(e, excludes))
    {
        let entry = entry?;
        if entry.file_type().is_file() && has_py_extension(entry.path()) {
            files.push(normalize(entry.path()));
        }
    }
    Ok(files)
}

fn should_skip(entry: &DirEntry, excludes: &[String]) -> bool {
    // The root itself is never treated as hidden; "." must be walkable.
    if entry.depth() == 0 {
        return false;
    }
    let hidden = entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false);
    hidden || is_excluded_path(entry.path(), excludes)
}

fn is_excluded_path(path: &Path, excludes: &[String]) -> bool {
    excludes.iter().any(|excluded| {
        path == Path::new(excluded)
            || path
                .file_name()
                .map(|name| name == excluded.as_str())
                .unwrap_or(false)
    })
}

fn has_py_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("py"))
        .unwrap_or(false)
}

/// Strip a leading `./` so reported names match what the user typed.
fn normalize(path: &Path) -> PathBuf {
    match path.strip_prefix("./") {
        Ok(stripped) if !stripped.as_os_str().is_empty() => stripped.to_path_buf(),
        _ => path.to_path_buf(),
    }
}
