//! Universal binary creation with `lipo`.
//!
//! After `lipo -create`, the result is read back with `lipo -archs` and must
//! contain exactly the linked slices. A fat binary missing a slice, or carrying
//! an unexpected one, is rejected outright.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::linker::LinkResult;
use crate::reporter::Reporter;
use crate::tool::{self, ExternalTool};

pub struct Merger<'a> {
    tool: &'a dyn ExternalTool,
    reporter: &'a dyn Reporter,
}

impl<'a> Merger<'a> {
    pub fn new(tool: &'a dyn ExternalTool, reporter: &'a dyn Reporter) -> Self {
        Self { tool, reporter }
    }

    /// `lipo -output <out> -create <inputs...>`
    pub fn create_args(results: &[LinkResult], output: &Path) -> Vec<String> {
        let mut args = vec![
            "-output".to_string(),
            output.to_string_lossy().into_owned(),
            "-create".to_string(),
        ];
        args.extend(
            results
                .iter()
                .map(|r| r.path.to_string_lossy().into_owned()),
        );
        args
    }

    /// Merge every slice into one fat binary at `output`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`] when `results` is empty.
    /// - [`Error::MergeFailure`] when two results claim the same architecture,
    ///   `lipo` rejects an input, or the merged binary's architectures differ
    ///   from the requested ones.
    pub async fn merge(&self, results: &[LinkResult], output: &Path) -> Result<PathBuf> {
        if results.is_empty() {
            return Err(Error::InvalidConfiguration(
                "cannot merge zero architecture slices".to_string(),
            ));
        }

        let mut expected = BTreeSet::new();
        for result in results {
            if !expected.insert(result.arch.as_str().to_string()) {
                return Err(Error::MergeFailure {
                    reason: format!("more than one {} slice", result.arch),
                    output: String::new(),
                });
            }
        }

        let create = tool::execute(
            self.tool,
            self.reporter,
            "lipo",
            &Self::create_args(results, output),
        )
        .await?;
        if !create.success() {
            return Err(Error::MergeFailure {
                reason: "lipo -create rejected an input".to_string(),
                output: create.combined(),
            });
        }

        let args = vec!["-archs".to_string(), output.to_string_lossy().into_owned()];
        let archs = tool::execute(self.tool, self.reporter, "lipo", &args).await?;
        if !archs.success() {
            return Err(Error::MergeFailure {
                reason: "could not read architectures of merged binary".to_string(),
                output: archs.combined(),
            });
        }

        let actual = parse_archs(&archs.stdout);
        if actual != expected {
            return Err(Error::MergeFailure {
                reason: format!(
                    "merged binary has [{}], expected [{}]",
                    join(&actual),
                    join(&expected)
                ),
                output: archs.combined(),
            });
        }

        tracing::info!(archs = %join(&actual), output = %output.display(), "merged universal binary");
        Ok(output.to_path_buf())
    }
}

/// Parse `lipo -archs` output (`"x86_64 i386 armv7 armv7s arm64"`).
fn parse_archs(stdout: &str) -> BTreeSet<String> {
    stdout.split_whitespace().map(str::to_string).collect()
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}
