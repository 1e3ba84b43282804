//! Tree scanner: walk, exclude, hash.
//!
//! Produces a content-addressed inventory of one directory tree. Hashing
//! of distinct files is distributed across a bounded blocking worker pool;
//! the walk itself and the scan as a whole are fail-fast — any I/O error
//! aborts with the offending path.

use crate::exclude::ExcludePolicy;
use crate::fs::hash::sha256_file;
use crate::fs::walker::{collect_candidates, FileCandidate};
use crate::inventory::{FileRecord, Inventory, ScanOutcome};
use crate::utils::errors::{PackagerError, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Scan a directory tree into an inventory.
///
/// `hash_workers` bounds how many files are hashed concurrently, keeping
/// file-descriptor and memory pressure flat on large trees. Cancellation
/// is checked between files.
pub async fn scan(
    root: &Path,
    policy: &ExcludePolicy,
    hash_workers: usize,
    cancel: &CancellationToken,
) -> Result<ScanOutcome> {
    let walk_root = root.to_path_buf();
    let walk_policy = policy.clone();

    // walkdir is blocking; keep it off the async executor
    let walk = tokio::task::spawn_blocking(move || collect_candidates(&walk_root, &walk_policy))
        .await
        .map_err(|e| PackagerError::Build(format!("walk task panicked: {e}")))??;

    debug!(
        "Walked {}: {} candidates, {} excluded",
        root.display(),
        walk.candidates.len(),
        walk.excluded_count
    );

    let semaphore = Arc::new(Semaphore::new(hash_workers.max(1)));
    let mut handles = Vec::with_capacity(walk.candidates.len());

    for candidate in walk.candidates {
        if cancel.is_cancelled() {
            return Err(PackagerError::Cancelled);
        }

        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| PackagerError::Build("hash worker pool closed".to_string()))?;

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            hash_candidate(candidate)
        }));
    }

    let mut inventory = Inventory::new();
    let mut total_bytes = 0u64;

    for handle in handles {
        let record = handle
            .await
            .map_err(|e| PackagerError::Build(format!("hash worker panicked: {e}")))??;
        total_bytes += record.size;
        inventory.insert(record.relative_path.clone(), record);
    }

    let included_count = inventory.len();

    info!(
        "Scanned {}: {} files retained ({} bytes), {} excluded",
        root.display(),
        included_count,
        total_bytes,
        walk.excluded_count
    );

    Ok(ScanOutcome {
        inventory,
        included_count,
        total_bytes,
        excluded_count: walk.excluded_count,
    })
}

/// Hash one retained file and fill in its record.
fn hash_candidate(candidate: FileCandidate) -> Result<FileRecord> {
    let metadata = std::fs::metadata(&candidate.path)
        .map_err(|e| PackagerError::scan(&candidate.path, e))?;

    let modified = metadata
        .modified()
        .map_err(|e| PackagerError::scan(&candidate.path, e))?
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;

    let sha256 =
        sha256_file(&candidate.path).map_err(|e| PackagerError::scan(&candidate.path, e))?;

    Ok(FileRecord {
        relative_path: candidate.relative_path,
        size: metadata.len(),
        sha256,
        modified,
    })
}
