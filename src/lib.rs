//! Update Packager Library
//!
//! Package differencing and archive-construction engine for the update
//! distribution toolchain: scans directory trees, classifies changes by
//! content hash, and builds full or incremental update packages.

pub mod archive;
pub mod config;
pub mod diff;
pub mod exclude;
pub mod fs;
pub mod inventory;
pub mod scanner;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use utils::errors::PackagerError;
pub type Result<T> = std::result::Result<T, PackagerError>;
