//! Exclusion policy for packaging.
//!
//! Decides whether a filesystem entry is eligible for packaging, purely
//! from its path string and size — content is never consulted. Also owns
//! the directory-prune set used to short-circuit traversal.

use crate::config::ExcludeConfig;
use tracing::warn;

/// Built-in deny-list: debug symbols, temp/backup suffixes, logs, cache
/// artifacts, VCS/editor metadata, and runtime libraries too large to
/// ship in update packages. Matched as case-insensitive substrings.
const DENY_SUBSTRINGS: &[&str] = &[
    ".pdb",
    ".tmp",
    ".bak",
    ".swp",
    "~",
    ".log",
    ".cache",
    ".ds_store",
    "thumbs.db",
    ".git",
    ".svn",
    "qt5webengine",
    "libcef",
    "icudtl.dat",
];

/// Directory names skipped entirely during traversal. This is a traversal
/// optimization only; file-level exclusion semantics do not depend on it.
const PRUNE_DIRS: &[&str] = &[
    ".git",
    ".svn",
    "__pycache__",
    "node_modules",
    "logs",
    "temp",
    "cache",
];

/// Pure (path, size) predicate deciding packaging eligibility.
#[derive(Debug, Clone)]
pub struct ExcludePolicy {
    deny_substrings: Vec<String>,
    prune_dirs: Vec<String>,
    max_file_size: u64,
}

impl Default for ExcludePolicy {
    fn default() -> Self {
        Self::from_config(&ExcludeConfig::default())
    }
}

impl ExcludePolicy {
    /// Build the policy from config: built-in lists plus any extras.
    pub fn from_config(config: &ExcludeConfig) -> Self {
        let mut deny_substrings: Vec<String> =
            DENY_SUBSTRINGS.iter().map(|s| s.to_string()).collect();
        deny_substrings.extend(
            config
                .extra_patterns
                .iter()
                .map(|p| p.to_ascii_lowercase()),
        );

        let mut prune_dirs: Vec<String> = PRUNE_DIRS.iter().map(|s| s.to_string()).collect();
        prune_dirs.extend(config.extra_prune_dirs.iter().map(|d| d.to_ascii_lowercase()));

        Self {
            deny_substrings,
            prune_dirs,
            max_file_size: config.max_file_size,
        }
    }

    /// Decide whether a file is excluded from packaging.
    ///
    /// `size` is `None` when the file could not be stat'd; the policy is
    /// fail-open in that case and only the deny-list applies.
    pub fn should_exclude(&self, relative_path: &str, size: Option<u64>) -> bool {
        let lowered = relative_path.to_ascii_lowercase();

        if self
            .deny_substrings
            .iter()
            .any(|pattern| lowered.contains(pattern.as_str()))
        {
            return true;
        }

        match size {
            Some(size) if size > self.max_file_size => {
                warn!(
                    "Excluding oversized file {} ({} bytes > {} limit)",
                    relative_path, size, self.max_file_size
                );
                true
            }
            Some(_) => false,
            None => {
                // Size unknown: fail-open. The scan will still abort later
                // if the file turns out to be unreadable.
                warn!(
                    "Could not determine size of {}, not excluding",
                    relative_path
                );
                false
            }
        }
    }

    /// Decide whether a directory should be skipped during traversal.
    pub fn should_prune_dir(&self, name: &str) -> bool {
        let lowered = name.to_ascii_lowercase();
        self.prune_dirs.iter().any(|d| *d == lowered)
    }
}
