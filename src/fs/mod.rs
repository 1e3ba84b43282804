pub mod hash;
pub mod walker;
