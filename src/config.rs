//! Configuration management for the update packager.
//!
//! Loads configuration from a TOML file; every section is optional and
//! falls back to built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub exclude: ExcludeConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Number of concurrent hashing workers
    #[serde(default = "default_hash_workers")]
    pub hash_workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludeConfig {
    /// Additional deny-list substrings (matched case-insensitively)
    #[serde(default)]
    pub extra_patterns: Vec<String>,

    /// Additional directory names to prune during traversal
    #[serde(default)]
    pub extra_prune_dirs: Vec<String>,

    /// Maximum packaged file size in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values
fn default_hash_workers() -> usize {
    4
}

fn default_max_file_size() -> u64 {
    100 * 1024 * 1024 // 100 MiB
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            hash_workers: default_hash_workers(),
        }
    }
}

impl Default for ExcludeConfig {
    fn default() -> Self {
        Self {
            extra_patterns: Vec::new(),
            extra_prune_dirs: Vec::new(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
