//! Archive download with streaming SHA256 and extraction.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::Client;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

use crate::reporter::Reporter;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("Failed to extract {}: {source}", path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Request for a download operation
pub struct DownloadRequest<'a> {
    pub client: &'a Client,
    pub url: &'a str,
    pub dest: &'a Path,
    pub expected_hash: Option<&'a str>,
    pub reporter: &'a dyn Reporter,
    pub extract_dest: Option<&'a Path>,
}

impl<'a> DownloadRequest<'a> {
    pub fn new(client: &'a Client, url: &'a str, dest: &'a Path, reporter: &'a dyn Reporter) -> Self {
        Self {
            client,
            url,
            dest,
            expected_hash: None,
            reporter,
            extract_dest: None,
        }
    }

    /// Fail the download unless its SHA256 equals `hash` (lowercase hex).
    pub fn with_expected_hash(mut self, hash: Option<&'a str>) -> Self {
        self.expected_hash = hash;
        self
    }

    pub fn with_extract_dest(mut self, extract_dest: &'a Path) -> Self {
        self.extract_dest = Some(extract_dest);
        self
    }

    /// Execute the download (and extraction if requested).
    ///
    /// Returns the SHA256 of the downloaded bytes.
    ///
    /// # Errors
    ///
    /// Any HTTP, IO or extraction failure; [`DownloadError::HashMismatch`] when
    /// an expected hash was given and differs. A mismatching file is removed.
    pub async fn execute(self) -> Result<String, DownloadError> {
        let hash = self.fetch().await?;
        if let Some(extract_dest) = self.extract_dest {
            extract(self.dest, extract_dest).await?;
        }
        Ok(hash)
    }

    async fn fetch(&self) -> Result<String, DownloadError> {
        tracing::info!(url = self.url, dest = %self.dest.display(), "downloading");

        let response = self
            .client
            .get(self.url)
            .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
            .send()
            .await?
            .error_for_status()?;

        let total_size = response.content_length();
        self.reporter.downloading(0, total_size);

        let mut file = File::create(self.dest).await?;
        let mut stream = response.bytes_stream();
        let mut hasher = Sha256::new();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            hasher.update(&chunk);
            downloaded += chunk.len() as u64;
            self.reporter.downloading(downloaded, total_size);
        }

        file.flush().await?;
        let actual_hash = hex::encode(hasher.finalize());

        if let Some(expected) = self.expected_hash {
            if actual_hash != expected {
                tokio::fs::remove_file(self.dest).await.ok();
                return Err(DownloadError::HashMismatch {
                    expected: expected.to_string(),
                    actual: actual_hash,
                });
            }
        }

        tracing::debug!(bytes = downloaded, sha256 = %actual_hash, "download complete");
        Ok(actual_hash)
    }
}

/// Unpack a tar (optionally gzip-compressed) archive into `dest`.
///
/// Compression is detected from the file's magic bytes, not its name.
/// Symlinks inside the archive are recreated as symlinks.
///
/// # Errors
///
/// Returns [`DownloadError::Extract`] if the archive cannot be read or unpacked.
pub async fn extract(archive: &Path, dest: &Path) -> Result<(), DownloadError> {
    use async_compression::tokio::bufread::GzipDecoder;
    use tokio_tar::Archive;

    let wrap = |source: std::io::Error| DownloadError::Extract {
        path: archive.to_path_buf(),
        source,
    };

    let mut magic = [0u8; 2];
    let is_gzip = {
        let mut file = File::open(archive).await.map_err(wrap)?;
        let read = file.read(&mut magic).await.map_err(wrap)?;
        read == 2 && magic == GZIP_MAGIC
    };

    tokio::fs::create_dir_all(dest).await.map_err(wrap)?;
    let reader = BufReader::new(File::open(archive).await.map_err(wrap)?);

    if is_gzip {
        Archive::new(GzipDecoder::new(reader))
            .unpack(dest)
            .await
            .map_err(wrap)?;
    } else {
        Archive::new(reader).unpack(dest).await.map_err(wrap)?;
    }

    tracing::debug!(archive = %archive.display(), dest = %dest.display(), gzip = is_gzip, "extracted");
    Ok(())
}
