pub mod builder;
pub mod installer;
pub mod manifest;
