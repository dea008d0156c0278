//! Service layer for file-facing operations.
//!
//! This module contains services that coordinate between the compiler,
//! the configuration and the file system.

pub mod document;

// Re-export commonly used types
pub use document::DocumentService;
