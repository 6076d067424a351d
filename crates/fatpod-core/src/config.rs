//! Run configuration.
//!
//! Built by the CLI from its arguments; there is no config file and no
//! environment lookup.

use std::path::{Path, PathBuf};

use fatpod_schema::{Arch, Platform};

use crate::error::{Error, Result};

/// Default Xcode developer directory.
pub const DEFAULT_DEVELOPER_DIR: &str = "/Applications/Xcode.app/Contents/Developer";

/// Minimum iOS version every slice is linked for.
pub const DEFAULT_MIN_OS_VERSION: &str = "8.0";

/// Everything one pipeline run needs to know up front.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pod to repackage; also the framework and binary name.
    pub pod: String,
    /// Slices to link, in link order.
    pub archs: Vec<Arch>,
    /// Xcode `Contents/Developer` directory holding the platform SDKs.
    pub developer_dir: PathBuf,
    /// Value passed to `-ios_version_min` / `-ios_simulator_version_min`.
    pub min_os_version: String,
    /// Where the final `.tar.gz` is written.
    pub output_dir: PathBuf,
    /// Parent for the scratch directory; system temp dir when `None`.
    pub scratch_parent: Option<PathBuf>,
    /// Expected SHA-256 of the downloaded archive.
    pub sha256: Option<String>,
    /// Persist the scratch directory after the run.
    pub keep_scratch: bool,
    /// Stop after extraction and print the link and merge commands.
    pub dry_run: bool,
}

impl PipelineConfig {
    pub fn new(pod: impl Into<String>) -> Self {
        Self {
            pod: pod.into(),
            archs: Arch::ALL.to_vec(),
            developer_dir: PathBuf::from(DEFAULT_DEVELOPER_DIR),
            min_os_version: DEFAULT_MIN_OS_VERSION.to_string(),
            output_dir: PathBuf::from("."),
            scratch_parent: None,
            sha256: None,
            keep_scratch: false,
            dry_run: false,
        }
    }

    /// Check the configuration and drop duplicate architectures, keeping the
    /// first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an empty pod name, zero
    /// architectures, a malformed minimum OS version or a malformed checksum.
    pub fn validate(mut self) -> Result<Self> {
        self.pod = self.pod.trim().to_string();
        if self.pod.is_empty() || self.pod.contains('/') {
            return Err(Error::InvalidConfiguration(format!(
                "invalid pod name '{}'",
                self.pod
            )));
        }

        if self.archs.is_empty() {
            return Err(Error::InvalidConfiguration(
                "at least one architecture is required".to_string(),
            ));
        }
        let mut seen = Vec::with_capacity(self.archs.len());
        self.archs.retain(|arch| {
            if seen.contains(arch) {
                false
            } else {
                seen.push(*arch);
                true
            }
        });

        let version_ok = !self.min_os_version.is_empty()
            && self
                .min_os_version
                .split('.')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
        if !version_ok {
            return Err(Error::InvalidConfiguration(format!(
                "invalid minimum OS version '{}'",
                self.min_os_version
            )));
        }

        if let Some(hash) = &self.sha256 {
            if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(Error::InvalidConfiguration(format!(
                    "invalid SHA-256 '{hash}': expected 64 hex characters"
                )));
            }
            self.sha256 = Some(hash.to_ascii_lowercase());
        }

        Ok(self)
    }

    /// SDK root for a platform, e.g.
    /// `<developer>/Platforms/iPhoneOS.platform/Developer/SDKs/iPhoneOS.sdk`.
    pub fn sdk_root(&self, platform: Platform) -> PathBuf {
        sdk_root(&self.developer_dir, platform)
    }
}

/// SDK root for a platform under an Xcode developer directory.
pub fn sdk_root(developer_dir: &Path, platform: Platform) -> PathBuf {
    developer_dir
        .join("Platforms")
        .join(platform.platform_dir())
        .join("Developer/SDKs")
        .join(platform.sdk_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::new("GoogleMaps").validate().unwrap();
        assert_eq!(config.archs, Arch::ALL.to_vec());
        assert_eq!(config.min_os_version, "8.0");
    }

    #[test]
    fn test_zero_archs_rejected() {
        let mut config = PipelineConfig::new("GoogleMaps");
        config.archs.clear();
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_duplicate_archs_dropped_in_order() {
        let mut config = PipelineConfig::new("GoogleMaps");
        config.archs = vec![Arch::Arm64, Arch::X86_64, Arch::Arm64];
        let config = config.validate().unwrap();
        assert_eq!(config.archs, vec![Arch::Arm64, Arch::X86_64]);
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(PipelineConfig::new("  ").validate().is_err());

        let mut config = PipelineConfig::new("GoogleMaps");
        config.min_os_version = "8.x".into();
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::new("GoogleMaps");
        config.sha256 = Some("abc".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sdk_roots() {
        let dev = Path::new("/Xcode/Developer");
        assert_eq!(
            sdk_root(dev, Platform::Device),
            PathBuf::from("/Xcode/Developer/Platforms/iPhoneOS.platform/Developer/SDKs/iPhoneOS.sdk")
        );
        assert_eq!(
            sdk_root(dev, Platform::Simulator),
            PathBuf::from(
                "/Xcode/Developer/Platforms/iPhoneSimulator.platform/Developer/SDKs/iPhoneSimulator.sdk"
            )
        );
    }
}
