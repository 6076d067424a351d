//! Final tar.gz packaging of the restructured bundle tree.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::error::{Error, Result};

/// Archive the contents of `src_dir` into a gzip-compressed tar at `dest`.
///
/// Entries are stored relative to `src_dir`. Symlinks are stored as links,
/// not followed, so the framework's `Versions/Current` topology survives.
/// The archive is written next to `dest` and renamed into place, so `dest`
/// either holds a complete archive or does not exist.
///
/// # Errors
///
/// Returns an error if the tree cannot be read or the archive written.
pub fn create_tar_gz(src_dir: &Path, dest: &Path) -> Result<()> {
    let parent = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)
        .map_err(|e| Error::io(format!("Failed to create {}", parent.display()), e))?;

    let staging = tempfile::Builder::new()
        .prefix(".fatpod-")
        .suffix(".tar.gz.part")
        .tempfile_in(parent)
        .map_err(|e| Error::io("Failed to create staging archive", e))?;

    let write = |file: &File| -> std::io::Result<()> {
        let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        let mut tar_builder = tar::Builder::new(encoder);
        tar_builder.follow_symlinks(false);
        tar_builder.append_dir_all(".", src_dir)?;
        tar_builder.finish()?;
        tar_builder.into_inner()?.finish()?.into_inner().map_err(|e| e.into_error())?;
        Ok(())
    };
    write(staging.as_file())
        .map_err(|e| Error::io(format!("Failed to archive {}", src_dir.display()), e))?;

    staging
        .persist(dest)
        .map_err(|e| Error::io(format!("Failed to write {}", dest.display()), e.error))?;

    tracing::info!(archive = %dest.display(), "archive written");
    Ok(())
}
