//! Shared types for fatpod.
//!
//! Architectures, platform SDK classes and the podspec metadata model live here
//! so that the pipeline crate and the CLI agree on one vocabulary.

pub mod arch;
pub mod podspec;

// Re-exports
pub use arch::*;
pub use podspec::{BASELINE_LIBRARIES, DependencyDescriptor, Podspec};

/// Errors raised while interpreting podspec metadata or user-supplied names.
#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    /// The architecture name is not one of the five supported slices.
    #[error("Unknown architecture: {0}")]
    UnknownArch(String),

    /// The lookup output is not a podspec JSON document.
    #[error("Invalid podspec JSON: {0}")]
    InvalidPodspec(String),

    /// The podspec has no `source.http` archive URL.
    #[error("Podspec has no source.http download URL")]
    MissingSourceUrl,
}

/// Extract the filename from a URL.
///
/// # Example
///
/// ```
/// use fatpod_schema::filename_from_url;
///
/// assert_eq!(filename_from_url("https://example.com/path/to/file.tar.gz"), "file.tar.gz");
/// assert_eq!(filename_from_url(""), "");
/// ```
pub fn filename_from_url(url: &str) -> &str {
    url.split('/').next_back().unwrap_or("")
}
