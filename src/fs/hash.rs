//! Streamed content hashing.
//!
//! Files are hashed in bounded chunks so large payloads never sit whole
//! in memory. The hex SHA-256 digest is the sole change-detection
//! authority throughout the packager.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read chunk size for hashing (64 KiB)
const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// Compute the hex SHA-256 digest of a file's full byte content.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; HASH_CHUNK_SIZE];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Compute the hex SHA-256 digest of a byte slice.
pub fn sha256_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
