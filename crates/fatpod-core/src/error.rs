//! Pipeline error taxonomy.
//!
//! Every variant is fatal for the run. Nothing is retried: given identical
//! inputs the external tools fail identically.

use std::path::{Path, PathBuf};

use fatpod_schema::Arch;
use thiserror::Error;

use crate::io::download::DownloadError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Metadata for '{name}' unavailable: {reason}")]
    MetadataUnavailable { name: String, reason: String },

    #[error("Podspec for '{name}' has no source.http download URL")]
    MissingSourceUrl { name: String },

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("libtool failed for {arch}:\n{output}")]
    LinkFailure { arch: Arch, output: String },

    #[error("lipo merge failed: {reason}\n{output}")]
    MergeFailure { reason: String, output: String },

    #[error("Bundle corrupted at {}: {reason}", path.display())]
    BundleCorruption { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("'{program}' not found. Please install Xcode and CocoaPods (xcode-select --install, gem install cocoapods)")]
    ToolNotFound { program: String },

    #[error("{program} failed:\n{output}")]
    ToolFailure { program: String, output: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Wrap an IO error with the operation that produced it.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn corruption(path: impl AsRef<Path>, reason: impl std::fmt::Display) -> Self {
        Self::BundleCorruption {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Which pipeline step raised the error, for the final diagnostic line.
    pub fn step(&self) -> &'static str {
        match self {
            Self::MetadataUnavailable { .. } | Self::MissingSourceUrl { .. } => "resolve",
            Self::Download(_) => "download",
            Self::LinkFailure { .. } => "link",
            Self::MergeFailure { .. } => "merge",
            Self::BundleCorruption { .. } => "restructure",
            Self::InvalidConfiguration(_) => "configure",
            Self::ToolNotFound { .. } | Self::ToolFailure { .. } | Self::Io { .. } => "run",
        }
    }
}
