//! Dependency descriptor resolution via `pod spec cat`.

use fatpod_schema::podspec::Podspec;
use fatpod_schema::{DependencyDescriptor, SchemaError};

use crate::error::{Error, Result};
use crate::reporter::Reporter;
use crate::tool::{self, ExternalTool};

/// Looks up a pod's link requirements.
pub struct Resolver<'a> {
    tool: &'a dyn ExternalTool,
    reporter: &'a dyn Reporter,
}

impl<'a> Resolver<'a> {
    pub fn new(tool: &'a dyn ExternalTool, reporter: &'a dyn Reporter) -> Self {
        Self { tool, reporter }
    }

    /// Arguments passed to `pod`.
    pub fn lookup_args(name: &str) -> Vec<String> {
        vec!["spec".to_string(), "cat".to_string(), name.to_string()]
    }

    /// Query the podspec for `name` and flatten it into a descriptor.
    ///
    /// # Errors
    ///
    /// - [`Error::MetadataUnavailable`] if `pod` exits non-zero or prints
    ///   something that is not a podspec.
    /// - [`Error::MissingSourceUrl`] if the podspec has no `source.http`.
    pub async fn resolve(&self, name: &str) -> Result<DependencyDescriptor> {
        // The podspec JSON is parsed, not echoed.
        let args = Self::lookup_args(name);
        self.reporter.command(&tool::render_command("pod", &args));
        let output = self.tool.run("pod", &args).await?;

        if !output.success() {
            return Err(Error::MetadataUnavailable {
                name: name.to_string(),
                reason: output.combined().trim().to_string(),
            });
        }

        let spec = Podspec::from_json(&output.stdout).map_err(|e| Error::MetadataUnavailable {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        if let Some(spec_name) = spec.name.as_deref() {
            if spec_name != name {
                tracing::warn!(requested = name, found = spec_name, "podspec name differs");
                self.reporter.warning(&format!(
                    "Requested '{name}' but the podspec is named '{spec_name}'"
                ));
            }
        }

        let descriptor = DependencyDescriptor::from_podspec(&spec).map_err(|e| match e {
            SchemaError::MissingSourceUrl => Error::MissingSourceUrl {
                name: name.to_string(),
            },
            other => Error::MetadataUnavailable {
                name: name.to_string(),
                reason: other.to_string(),
            },
        })?;

        tracing::info!(
            pod = name,
            version = spec.version.as_deref().unwrap_or("?"),
            frameworks = descriptor.frameworks.len(),
            libraries = descriptor.libraries.len(),
            "resolved podspec"
        );

        Ok(descriptor)
    }
}
