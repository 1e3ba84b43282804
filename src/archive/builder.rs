//! Update package construction.
//!
//! Builds compressed tar.gz packages in two modes: a full snapshot of one
//! tree, or an incremental package holding only changed payload plus the
//! manifest and installer script. Construction is all-or-nothing: the
//! archive is staged in a temporary file next to the output path and only
//! published on success, so no partial artifact ever lands at the output.

use crate::archive::installer::render_install_script;
use crate::archive::manifest::{Manifest, INSTALLER_NAME, PAYLOAD_DIR};
use crate::diff::DiffResult;
use crate::inventory::ScanOutcome;
use crate::utils::errors::{PackagerError, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use tar::{Builder, Header};
use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Build a full snapshot package: every retained file at its natural
/// relative path plus the version manifest at the root.
pub fn build_full(
    root: &Path,
    outcome: &ScanOutcome,
    version: &str,
    output: &Path,
    cancel: &CancellationToken,
) -> Result<()> {
    let manifest = Manifest::full(version, outcome.included_count);

    let mut paths: Vec<&String> = outcome.inventory.keys().collect();
    paths.sort();

    let mut staging = staging_file(output)?;
    {
        let encoder = GzEncoder::new(staging.as_file_mut(), Compression::best());
        let mut tar = Builder::new(encoder);

        for relative_path in &paths {
            if cancel.is_cancelled() {
                return Err(PackagerError::Cancelled);
            }
            append_payload(&mut tar, &root.join(relative_path), relative_path.as_str())?;
        }

        write_entry(&mut tar, manifest.file_name(), &manifest.to_json()?, 0o644)?;

        finish(tar)?;
    }

    publish(staging, output)?;

    info!(
        "Built full package {} ({} files, version {})",
        output.display(),
        outcome.included_count,
        version
    );

    Ok(())
}

/// Build an incremental package: changed payload under the reserved
/// namespace, plus the diff manifest and installer script at the root.
/// Deleted paths contribute manifest records only — the installer script
/// removes them on the target.
pub fn build_incremental(
    new_root: &Path,
    diff: &DiffResult,
    old_version: &str,
    new_version: &str,
    output: &Path,
    cancel: &CancellationToken,
) -> Result<()> {
    let manifest = Manifest::incremental(old_version, new_version, diff);
    let installer = render_install_script(&diff.deleted);

    let payload: BTreeSet<&String> = diff.payload_paths().collect();

    let mut staging = staging_file(output)?;
    {
        let encoder = GzEncoder::new(staging.as_file_mut(), Compression::best());
        let mut tar = Builder::new(encoder);

        for relative_path in &payload {
            if cancel.is_cancelled() {
                return Err(PackagerError::Cancelled);
            }
            append_payload(
                &mut tar,
                &new_root.join(relative_path),
                &format!("{PAYLOAD_DIR}/{relative_path}"),
            )?;
        }

        write_entry(&mut tar, manifest.file_name(), &manifest.to_json()?, 0o644)?;
        write_entry(&mut tar, INSTALLER_NAME, installer.as_bytes(), 0o755)?;

        finish(tar)?;
    }

    publish(staging, output)?;

    info!(
        "Built incremental package {} ({} added, {} modified, {} deleted; {} -> {})",
        output.display(),
        diff.added.len(),
        diff.modified.len(),
        diff.deleted.len(),
        old_version,
        new_version
    );

    Ok(())
}

/// Stage the archive next to its final path so the publish rename stays
/// on one filesystem.
fn staging_file(output: &Path) -> Result<NamedTempFile> {
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    NamedTempFile::new_in(parent).map_err(|e| {
        PackagerError::Build(format!(
            "cannot stage archive in {}: {}",
            parent.display(),
            e
        ))
    })
}

fn append_payload<W: Write>(tar: &mut Builder<W>, src: &Path, entry_name: &str) -> Result<()> {
    tar.append_path_with_name(src, entry_name).map_err(|e| {
        PackagerError::Build(format!("cannot archive {}: {}", src.display(), e))
    })
}

/// Append a synthetic entry (manifest, installer) from in-memory bytes.
fn write_entry<W: Write>(
    tar: &mut Builder<W>,
    entry_name: &str,
    data: &[u8],
    mode: u32,
) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(mode);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(chrono::Utc::now().timestamp() as u64);
    header.set_cksum();

    tar.append_data(&mut header, entry_name, data)
        .map_err(|e| PackagerError::Build(format!("cannot write {entry_name}: {e}")))
}

fn finish<W: Write>(tar: Builder<GzEncoder<W>>) -> Result<()> {
    let encoder = tar
        .into_inner()
        .map_err(|e| PackagerError::Build(format!("cannot finalize archive: {e}")))?;
    encoder
        .finish()
        .map_err(|e| PackagerError::Build(format!("cannot finish compression: {e}")))?;
    Ok(())
}

fn publish(staging: NamedTempFile, output: &Path) -> Result<()> {
    staging.persist(output).map_err(|e| {
        PackagerError::Build(format!("cannot publish {}: {}", output.display(), e.error))
    })?;
    Ok(())
}
