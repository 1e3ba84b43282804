//! Change manifests embedded in update packages.
//!
//! The manifest is the machine-readable record at the archive root that
//! installer scripts and the upload client parse. The `type` tag is the
//! format discriminator; extend it to a schema-version field before any
//! incompatible format change.

use crate::diff::DiffResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Manifest file name inside a full package.
pub const FULL_MANIFEST_NAME: &str = "version_info.json";

/// Manifest file name inside an incremental package.
pub const INCREMENTAL_MANIFEST_NAME: &str = "update_info.json";

/// Installer script name inside an incremental package.
pub const INSTALLER_NAME: &str = "install.sh";

/// Reserved payload namespace inside an incremental package. Keeps changed
/// files from colliding with the manifest and installer at the root.
pub const PAYLOAD_DIR: &str = "files";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Manifest {
    Full {
        timestamp: DateTime<Utc>,
        version: String,
        total_files: usize,
    },
    Incremental {
        timestamp: DateTime<Utc>,
        old_version: String,
        new_version: String,
        added: Vec<String>,
        modified: Vec<String>,
        deleted: Vec<String>,
        total_changes: usize,
    },
}

impl Manifest {
    pub fn full(version: &str, total_files: usize) -> Self {
        Self::Full {
            timestamp: Utc::now(),
            version: version.to_string(),
            total_files,
        }
    }

    pub fn incremental(old_version: &str, new_version: &str, diff: &DiffResult) -> Self {
        Self::Incremental {
            timestamp: Utc::now(),
            old_version: old_version.to_string(),
            new_version: new_version.to_string(),
            added: diff.added.iter().cloned().collect(),
            modified: diff.modified.iter().cloned().collect(),
            deleted: diff.deleted.iter().cloned().collect(),
            total_changes: diff.total_changes(),
        }
    }

    /// File name this manifest is written under at the archive root.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Full { .. } => FULL_MANIFEST_NAME,
            Self::Incremental { .. } => INCREMENTAL_MANIFEST_NAME,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }
}
