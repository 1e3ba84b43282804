//! Content-addressed tree inventory types.
//!
//! An inventory maps each retained relative path to its recorded metadata
//! for one directory-tree snapshot. Records are immutable once produced
//! and nothing persists across invocations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata recorded for a single retained file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Relative path from the tree root, forward-slash normalized
    pub relative_path: String,

    /// File size in bytes
    pub size: u64,

    /// Hex SHA-256 digest of the full byte content
    pub sha256: String,

    /// Last modified time (seconds since Unix epoch)
    pub modified: i64,
}

/// One tree snapshot: relative path -> record. Keys are unique and
/// insertion order carries no meaning.
pub type Inventory = HashMap<String, FileRecord>;

/// Result of scanning one tree.
#[derive(Debug)]
pub struct ScanOutcome {
    pub inventory: Inventory,

    /// Files retained in the inventory
    pub included_count: usize,

    /// Total bytes across retained files
    pub total_bytes: u64,

    /// Files rejected by the exclusion policy
    pub excluded_count: usize,
}
