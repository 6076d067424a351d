//! Scratch space owned by one pipeline run.
//!
//! ```text
//! fatpod-build-XXXXXX/
//! ├── bundle/   # extracted archive, restructured in place, archived at the end
//! └── work/     # downloaded archive, per-arch dylibs, merged binary
//! ```
//!
//! Per-architecture outputs never live under `bundle/`, so concurrent link
//! steps cannot touch the tree that is eventually archived.

use std::path::{Path, PathBuf};

use fatpod_schema::Arch;

use crate::error::{Error, Result};

/// A disposable build directory. Dropping it deletes everything.
#[derive(Debug)]
pub struct BuildContext {
    temp_dir: tempfile::TempDir,
}

impl BuildContext {
    /// Create a fresh scratch directory in the system temp location.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or its subdirectories cannot be created.
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("fatpod-build-")
            .tempdir()
            .map_err(|e| Error::io("Failed to create scratch directory", e))?;
        Self::init(temp_dir)
    }

    /// Create a fresh scratch directory under `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or its subdirectories cannot be created.
    pub fn new_in(parent: &Path) -> Result<Self> {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::io(format!("Failed to create {}", parent.display()), e))?;
        let temp_dir = tempfile::Builder::new()
            .prefix("fatpod-build-")
            .tempdir_in(parent)
            .map_err(|e| Error::io("Failed to create scratch directory", e))?;
        Self::init(temp_dir)
    }

    fn init(temp_dir: tempfile::TempDir) -> Result<Self> {
        let ctx = Self { temp_dir };
        for dir in [ctx.bundle_root(), ctx.work_dir()] {
            std::fs::create_dir_all(&dir)
                .map_err(|e| Error::io(format!("Failed to create {}", dir.display()), e))?;
        }
        Ok(ctx)
    }

    /// Access the root path
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Where the downloaded archive is extracted.
    pub fn bundle_root(&self) -> PathBuf {
        self.path().join("bundle")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.path().join("work")
    }

    /// Allocate a fresh, uniquely named output path for one architecture.
    ///
    /// # Errors
    ///
    /// Returns an error if the placeholder file cannot be created.
    pub fn link_output(&self, arch: Arch) -> Result<PathBuf> {
        tempfile::Builder::new()
            .prefix(&format!("{arch}-"))
            .suffix(".dylib")
            .tempfile_in(self.work_dir())
            .map_err(|e| Error::io(format!("Failed to allocate {arch} output"), e))?
            .into_temp_path()
            .keep()
            .map_err(|e| Error::io(format!("Failed to allocate {arch} output"), e.error))
    }

    /// Path of the merged universal binary for `name`.
    pub fn merged_output(&self, name: &str) -> PathBuf {
        self.work_dir().join(format!("{name}_dynamic.dylib"))
    }

    /// Persist the directory instead of deleting it on drop.
    pub fn keep(self) -> PathBuf {
        self.temp_dir.keep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_and_cleanup() {
        let parent = tempfile::tempdir().unwrap();
        let ctx = BuildContext::new_in(parent.path()).unwrap();
        let root = ctx.path().to_path_buf();

        assert!(ctx.bundle_root().is_dir());
        assert!(ctx.work_dir().is_dir());
        assert!(root.starts_with(parent.path()));

        drop(ctx);
        assert!(!root.exists());
    }

    #[test]
    fn test_link_outputs_are_unique() {
        let ctx = BuildContext::new().unwrap();
        let a = ctx.link_output(Arch::Arm64).unwrap();
        let b = ctx.link_output(Arch::Arm64).unwrap();

        assert_ne!(a, b);
        assert!(a.starts_with(ctx.work_dir()));
        assert!(a.file_name().unwrap().to_string_lossy().starts_with("arm64-"));
    }

    #[test]
    fn test_keep_persists() {
        let ctx = BuildContext::new().unwrap();
        let kept = ctx.keep();
        assert!(kept.is_dir());
        std::fs::remove_dir_all(kept).unwrap();
    }
}
