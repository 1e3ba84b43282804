//! Installer script generation.
//!
//! Renders the POSIX sh apply script embedded in every incremental
//! package. The script runs in the installation root on the target:
//! it copies the payload namespace over the tree, deletes the files the
//! manifest names as deleted, then removes its control artifacts. It is
//! safe to run more than once — a missing payload directory means the
//! copy step already completed, and every removal uses `rm -f`.

use crate::archive::manifest::{INCREMENTAL_MANIFEST_NAME, PAYLOAD_DIR};
use std::collections::BTreeSet;

/// Render the apply script for an incremental package.
pub fn render_install_script(deleted: &BTreeSet<String>) -> String {
    let mut script = String::new();

    script.push_str("#!/bin/sh\n");
    script.push_str("# Applies this incremental update in the current directory.\n");
    script.push_str("# Safe to re-run: a missing payload directory means the copy\n");
    script.push_str("# step has already completed.\n");
    script.push_str("set -u\n\n");

    script.push_str(&format!(
        "if [ -d {dir} ]; then\n    cp -R {dir}/. .\n    rm -rf {dir}\nfi\n",
        dir = PAYLOAD_DIR
    ));

    if !deleted.is_empty() {
        script.push('\n');
        for path in deleted {
            script.push_str(&format!("rm -f {}\n", shell_quote(path)));
        }
    }

    script.push('\n');
    script.push_str(&format!("rm -f {INCREMENTAL_MANIFEST_NAME}\n"));
    script.push_str("exit 0\n");

    script
}

/// Single-quote a path for sh, escaping embedded single quotes.
fn shell_quote(path: &str) -> String {
    format!("'{}'", path.replace('\'', r"'\''"))
}
