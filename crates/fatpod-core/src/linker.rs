//! Per-architecture dynamic linking with `libtool`.
//!
//! Each slice bundles every input component into one dylib:
//!
//! ```text
//! libtool -dynamic <input>... \
//!     -weak_framework UIKit -weak_framework Foundation -weak_framework Security \
//!     -ObjC -install_name @rpath/<Name>.framework/<Name> \
//!     -framework <F>... [-syslibroot <sdk>] \
//!     -o <out> -F<sdk>/System/Library/Frameworks/ -L<sdk>/usr/lib/ \
//!     -arch_only <arch> -ios[_simulator]_version_min <min> -l<lib>...
//! ```
//!
//! Weak-linked frameworks resolve at load time and tolerate absence. Only the
//! simulator slices get an explicit `-syslibroot`.

use std::path::{Path, PathBuf};

use fatpod_schema::{Arch, DependencyDescriptor};
use futures::future::join_all;

use crate::config::sdk_root;
use crate::context::BuildContext;
use crate::error::{Error, Result};
use crate::reporter::Reporter;
use crate::tool::{self, ExternalTool};

/// Host frameworks every slice weak-links.
pub const WEAK_FRAMEWORKS: [&str; 3] = ["UIKit", "Foundation", "Security"];

/// One freshly linked single-architecture dylib.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkResult {
    pub arch: Arch,
    pub path: PathBuf,
}

/// Inputs shared by every slice of one run. Immutable once built.
#[derive(Debug, Clone, Copy)]
pub struct LinkPlan<'a> {
    /// Framework name, used for the install name.
    pub name: &'a str,
    /// Component binaries, each passed with `-dynamic`.
    pub inputs: &'a [PathBuf],
    pub descriptor: &'a DependencyDescriptor,
    pub developer_dir: &'a Path,
    pub min_os_version: &'a str,
}

impl LinkPlan<'_> {
    /// `@rpath/<Name>.framework/<Name>`
    pub fn install_name(&self) -> String {
        format!("@rpath/{name}.framework/{name}", name = self.name)
    }

    /// Full `libtool` argument list for one architecture.
    pub fn args(&self, arch: Arch, output: &Path) -> Vec<String> {
        let platform = arch.platform();
        let sdk = sdk_root(self.developer_dir, platform);
        let sdk = sdk.to_string_lossy();

        let mut args = Vec::new();
        for input in self.inputs {
            args.push("-dynamic".to_string());
            args.push(input.to_string_lossy().into_owned());
        }
        for framework in WEAK_FRAMEWORKS {
            args.push("-weak_framework".to_string());
            args.push(framework.to_string());
        }
        args.push("-ObjC".to_string());
        args.push("-install_name".to_string());
        args.push(self.install_name());

        for framework in &self.descriptor.frameworks {
            args.push("-framework".to_string());
            args.push(framework.clone());
        }
        if arch.is_simulator() {
            args.push("-syslibroot".to_string());
            args.push(sdk.to_string());
        }

        args.push("-o".to_string());
        args.push(output.to_string_lossy().into_owned());
        args.push(format!("-F{sdk}/System/Library/Frameworks/"));
        args.push(format!("-L{sdk}/usr/lib/"));
        args.push("-arch_only".to_string());
        args.push(arch.as_str().to_string());
        args.push(platform.version_min_flag().to_string());
        args.push(self.min_os_version.to_string());

        args.extend(self.descriptor.libraries.iter().map(|lib| format!("-l{lib}")));
        args
    }
}

/// Produces one dylib per architecture.
pub struct Linker<'a> {
    tool: &'a dyn ExternalTool,
    reporter: &'a dyn Reporter,
    plan: LinkPlan<'a>,
}

impl<'a> Linker<'a> {
    pub fn new(tool: &'a dyn ExternalTool, reporter: &'a dyn Reporter, plan: LinkPlan<'a>) -> Self {
        Self {
            tool,
            reporter,
            plan,
        }
    }

    /// Link a single slice into `output`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LinkFailure`] with libtool's captured output if it
    /// exits non-zero. The output path is not considered usable in that case.
    pub async fn link(&self, arch: Arch, output: PathBuf) -> Result<LinkResult> {
        self.reporter.linking(arch);
        tracing::info!(%arch, platform = %arch.platform(), "linking");

        let args = self.plan.args(arch, &output);
        let result = tool::execute(self.tool, self.reporter, "libtool", &args).await?;

        if !result.success() {
            return Err(Error::LinkFailure {
                arch,
                output: result.combined(),
            });
        }

        Ok(LinkResult { arch, path: output })
    }

    /// Link every requested slice concurrently.
    ///
    /// Each slice writes only its own freshly allocated output. Every started
    /// `libtool` runs to completion before this returns, even when a sibling
    /// has already failed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an empty architecture list,
    /// otherwise the failure of the first slice in `archs` order.
    pub async fn link_all(&self, ctx: &BuildContext, archs: &[Arch]) -> Result<Vec<LinkResult>> {
        if archs.is_empty() {
            return Err(Error::InvalidConfiguration(
                "no architectures to link".to_string(),
            ));
        }

        let outputs = archs
            .iter()
            .map(|arch| ctx.link_output(*arch).map(|path| (*arch, path)))
            .collect::<Result<Vec<_>>>()?;

        let results = join_all(
            outputs
                .into_iter()
                .map(|(arch, path)| self.link(arch, path)),
        )
        .await;

        debug_assert_eq!(results.len(), archs.len());
        results.into_iter().collect()
    }
}
