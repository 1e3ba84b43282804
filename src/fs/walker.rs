//! Directory traversal for tree scanning.
//!
//! Walks a directory tree, prunes excluded directories before descending,
//! applies the per-file exclusion policy, and collects the candidates the
//! scanner will hash. Errors during traversal fail the whole walk.

use crate::exclude::ExcludePolicy;
use crate::utils::errors::{PackagerError, Result};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A file retained by the walk, prior to hashing.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    /// Full path to the file
    pub path: PathBuf,

    /// Relative path from the root, forward-slash normalized
    pub relative_path: String,

    /// File size in bytes, if it could be determined
    pub size: Option<u64>,
}

/// Outcome of a tree walk.
#[derive(Debug)]
pub struct WalkOutcome {
    pub candidates: Vec<FileCandidate>,

    /// Files rejected by the exclusion policy
    pub excluded_count: usize,
}

/// Walk a directory tree and collect all packageable files.
///
/// Directories matching the policy's prune set are never descended into.
/// Symlinks to directories and broken symlinks are skipped; symlinks to
/// files are retained with the target's size.
pub fn collect_candidates(root: &Path, policy: &ExcludePolicy) -> Result<WalkOutcome> {
    let mut candidates = Vec::new();
    let mut excluded_count = 0usize;

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_pruned(entry, policy));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            PackagerError::scan(path, e.into())
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path().to_path_buf();

        if entry.file_type().is_symlink() {
            // Resolve the target; skip symlinked directories and broken links
            match std::fs::metadata(&path) {
                Ok(resolved) if resolved.is_dir() => continue,
                Ok(resolved) => {
                    if let Some(candidate) =
                        retain(&path, root, Some(resolved.len()), policy, &mut excluded_count)
                    {
                        candidates.push(candidate);
                    }
                }
                Err(_) => continue,
            }
            continue;
        }

        // Stat failure leaves size unknown; the policy is fail-open on it
        let size = entry.metadata().ok().map(|m| m.len());

        if let Some(candidate) = retain(&path, root, size, policy, &mut excluded_count) {
            candidates.push(candidate);
        }
    }

    Ok(WalkOutcome {
        candidates,
        excluded_count,
    })
}

fn retain(
    path: &Path,
    root: &Path,
    size: Option<u64>,
    policy: &ExcludePolicy,
    excluded_count: &mut usize,
) -> Option<FileCandidate> {
    let relative_path = relative_string(path, root);

    if policy.should_exclude(&relative_path, size) {
        *excluded_count += 1;
        return None;
    }

    Some(FileCandidate {
        path: path.to_path_buf(),
        relative_path,
        size,
    })
}

fn is_pruned(entry: &DirEntry, policy: &ExcludePolicy) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    policy.should_prune_dir(&entry.file_name().to_string_lossy())
}

/// Relative path from `root`, joined with `/` regardless of host
/// path convention.
pub fn relative_string(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walk_empty_directory() -> Result<()> {
        let temp_dir = TempDir::new().unwrap();
        let outcome = collect_candidates(temp_dir.path(), &ExcludePolicy::default())?;
        assert!(outcome.candidates.is_empty());
        assert_eq!(outcome.excluded_count, 0);
        Ok(())
    }

    #[test]
    fn test_relative_paths_use_forward_slashes() -> Result<()> {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("sub/deep")).unwrap();
        fs::write(temp_dir.path().join("sub/deep/file.txt"), b"x").unwrap();

        let outcome = collect_candidates(temp_dir.path(), &ExcludePolicy::default())?;
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].relative_path, "sub/deep/file.txt");

        Ok(())
    }

    #[test]
    fn test_excluded_files_are_counted() -> Result<()> {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("keep.txt"), b"keep").unwrap();
        fs::write(temp_dir.path().join("junk.tmp"), b"junk").unwrap();
        fs::write(temp_dir.path().join("trace.log"), b"junk").unwrap();

        let outcome = collect_candidates(temp_dir.path(), &ExcludePolicy::default())?;
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].relative_path, "keep.txt");
        assert_eq!(outcome.excluded_count, 2);

        Ok(())
    }

    #[test]
    fn test_pruned_directories_are_not_descended() -> Result<()> {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("cache")).unwrap();
        fs::write(temp_dir.path().join("cache/blob.bin"), b"cached").unwrap();
        fs::write(temp_dir.path().join("app.bin"), b"app").unwrap();

        let outcome = collect_candidates(temp_dir.path(), &ExcludePolicy::default())?;
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].relative_path, "app.bin");
        // Pruned contents are never visited, so they are not counted as excluded
        assert_eq!(outcome.excluded_count, 0);

        Ok(())
    }

    #[test]
    fn test_missing_root_fails() {
        let result = collect_candidates(Path::new("/nonexistent/tree"), &ExcludePolicy::default());
        assert!(matches!(result, Err(PackagerError::Scan { .. })));
    }
}
