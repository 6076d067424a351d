//! Core library for fatpod.
//!
//! Repackages a binary CocoaPods distribution into one dynamic, multi-architecture
//! framework: resolve the podspec, link each architecture with `libtool`, merge
//! with `lipo`, then rewrite the framework bundle around the merged binary.

pub mod bundle;
pub mod config;
pub mod context;
pub mod error;
pub mod io;
pub mod linker;
pub mod merger;
pub mod pipeline;
pub mod reporter;
pub mod resolver;
pub mod tool;

pub use config::PipelineConfig;
pub use context::BuildContext;
pub use error::{Error, Result};
pub use pipeline::{Outcome, Pipeline};
pub use reporter::{NullReporter, Reporter};
pub use tool::{ExternalTool, REQUIRED_TOOLS, SystemTool};

/// User Agent string for archive downloads
pub const USER_AGENT: &str = concat!("fatpod/", env!("CARGO_PKG_VERSION"));
