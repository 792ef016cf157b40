// Public modules
pub mod build_info;
pub mod clean;
pub mod config;
pub mod error;
pub mod interrupt;
pub mod matrix;
pub mod pipeline;
pub mod report;
pub mod steps;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
