//! fatpod - repackage binary CocoaPods as dynamic fat frameworks
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! `fatpod GoogleMaps` looks up the pod with `pod spec cat`, downloads its
//! vendor archive, links every subspec framework into one dylib per
//! architecture, merges them with `lipo` and rewrites the framework so the
//! merged binary can be embedded as a dynamic framework.
//!
//! # Requirements
//!
//! macOS with Xcode (`libtool`, `lipo`, `plutil`) and CocoaPods (`pod`).

pub mod ui;

use std::path::PathBuf;

use clap::Parser;
use fatpod_core::PipelineConfig;
use fatpod_core::config::{DEFAULT_DEVELOPER_DIR, DEFAULT_MIN_OS_VERSION};
use fatpod_schema::Arch;

#[derive(Debug, Parser)]
#[command(name = "fatpod")]
#[command(
    author,
    version = env!("FATPOD_VERSION"),
    about = "Repackage a binary CocoaPod into a dynamic multi-architecture framework"
)]
pub struct Cli {
    /// Pod to repackage (e.g. GoogleMaps)
    pub pod: String,

    /// Architectures to link, comma separated or repeated
    #[arg(
        long = "arch",
        value_delimiter = ',',
        default_value = "x86_64,i386,armv7,armv7s,arm64"
    )]
    pub archs: Vec<Arch>,

    /// Xcode developer directory holding the platform SDKs
    #[arg(long, default_value = DEFAULT_DEVELOPER_DIR)]
    pub developer_dir: PathBuf,

    /// Minimum iOS deployment target
    #[arg(long, default_value = DEFAULT_MIN_OS_VERSION)]
    pub min_os: String,

    /// Directory the final .tar.gz is written to
    #[arg(long, short, default_value = ".")]
    pub output_dir: PathBuf,

    /// Create the scratch directory here instead of the system temp dir
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,

    /// Expected SHA-256 of the downloaded archive
    #[arg(long)]
    pub sha256: Option<String>,

    /// Keep the scratch directory after the run and print its path
    #[arg(long)]
    pub keep_scratch: bool,

    /// Print the link and merge commands instead of running them
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Translate arguments into a pipeline configuration.
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            pod: self.pod.clone(),
            archs: self.archs.clone(),
            developer_dir: self.developer_dir.clone(),
            min_os_version: self.min_os.clone(),
            output_dir: self.output_dir.clone(),
            scratch_parent: self.scratch_dir.clone(),
            sha256: self.sha256.clone(),
            keep_scratch: self.keep_scratch,
            dry_run: self.dry_run,
        }
    }
}
