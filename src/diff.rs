//! Inventory differencing.
//!
//! Pure, single-pass comparison of two completed inventories. The content
//! hash is the sole classification authority: equal hashes mean unchanged
//! even when size or mtime differ, which protects against touch-only
//! changes and clock skew.

use crate::inventory::Inventory;
use std::collections::BTreeSet;

/// Paths classified by comparing two inventories. Unchanged paths are
/// implicit and never materialized.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiffResult {
    /// Present in new, absent from old
    pub added: BTreeSet<String>,

    /// Present in both with differing content hash
    pub modified: BTreeSet<String>,

    /// Present in old, absent from new
    pub deleted: BTreeSet<String>,
}

impl DiffResult {
    pub fn total_changes(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_changes() == 0
    }

    /// Paths whose content must ship in an incremental package.
    pub fn payload_paths(&self) -> impl Iterator<Item = &String> {
        self.added.iter().chain(self.modified.iter())
    }
}

/// Compare two inventories. No I/O, deterministic.
pub fn diff(old: &Inventory, new: &Inventory) -> DiffResult {
    let mut result = DiffResult::default();

    for (path, new_record) in new {
        match old.get(path) {
            None => {
                result.added.insert(path.clone());
            }
            Some(old_record) if old_record.sha256 != new_record.sha256 => {
                result.modified.insert(path.clone());
            }
            Some(_) => {}
        }
    }

    for path in old.keys() {
        if !new.contains_key(path) {
            result.deleted.insert(path.clone());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::FileRecord;

    fn record(path: &str, sha256: &str, size: u64, modified: i64) -> FileRecord {
        FileRecord {
            relative_path: path.to_string(),
            size,
            sha256: sha256.to_string(),
            modified,
        }
    }

    fn inventory(records: Vec<FileRecord>) -> Inventory {
        records
            .into_iter()
            .map(|r| (r.relative_path.clone(), r))
            .collect()
    }

    #[test]
    fn test_identical_inventories_yield_empty_diff() {
        let tree = inventory(vec![
            record("a.txt", "h1", 5, 100),
            record("b.txt", "h2", 7, 100),
        ]);

        let result = diff(&tree, &tree);
        assert!(result.is_empty());
    }

    #[test]
    fn test_classification_scenario() {
        // old = {a.txt->H1, b.txt->H2}, new = {a.txt->H1, b.txt->H3, c.txt->H4}
        let old = inventory(vec![
            record("a.txt", "H1", 5, 100),
            record("b.txt", "H2", 5, 100),
        ]);
        let new = inventory(vec![
            record("a.txt", "H1", 5, 100),
            record("b.txt", "H3", 6, 200),
            record("c.txt", "H4", 7, 200),
        ]);

        let result = diff(&old, &new);

        assert_eq!(result.added, BTreeSet::from(["c.txt".to_string()]));
        assert_eq!(result.modified, BTreeSet::from(["b.txt".to_string()]));
        assert!(result.deleted.is_empty());
        assert_eq!(result.total_changes(), 2);
    }

    #[test]
    fn test_touch_only_change_is_unchanged() {
        // Same hash, different size and mtime: hash is the sole authority
        let old = inventory(vec![record("a.txt", "same", 5, 100)]);
        let new = inventory(vec![record("a.txt", "same", 9, 999)]);

        let result = diff(&old, &new);
        assert!(result.is_empty());
    }

    #[test]
    fn test_deleted_paths() {
        let old = inventory(vec![
            record("gone.txt", "h1", 5, 100),
            record("stays.txt", "h2", 5, 100),
        ]);
        let new = inventory(vec![record("stays.txt", "h2", 5, 100)]);

        let result = diff(&old, &new);
        assert_eq!(result.deleted, BTreeSet::from(["gone.txt".to_string()]));
        assert!(result.added.is_empty());
        assert!(result.modified.is_empty());
    }

    #[test]
    fn test_payload_paths_is_added_union_modified() {
        let old = inventory(vec![
            record("mod.txt", "h1", 5, 100),
            record("gone.txt", "h2", 5, 100),
        ]);
        let new = inventory(vec![
            record("mod.txt", "h1b", 5, 100),
            record("new.txt", "h3", 5, 100),
        ]);

        let result = diff(&old, &new);
        let payload: BTreeSet<&String> = result.payload_paths().collect();

        assert_eq!(payload.len(), 2);
        assert!(payload.contains(&"mod.txt".to_string()));
        assert!(payload.contains(&"new.txt".to_string()));
    }

    #[test]
    fn test_empty_inventories() {
        let empty = Inventory::new();
        assert!(diff(&empty, &empty).is_empty());
    }
}
