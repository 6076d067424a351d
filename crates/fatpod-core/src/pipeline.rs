//! End-to-end orchestration of one repackaging run.
//!
//! resolve → download + extract → discover → link (per arch) → merge →
//! restructure → archive. Every step completes before the next starts, except
//! the link step, whose slices run concurrently. The first error aborts the run.

use std::path::{Path, PathBuf};

use fatpod_schema::DependencyDescriptor;
use reqwest::Client;

use crate::bundle::{self, BundleLayout, FrameworkBundle};
use crate::config::PipelineConfig;
use crate::context::BuildContext;
use crate::error::{Error, Result};
use crate::io::archive::create_tar_gz;
use crate::io::download::DownloadRequest;
use crate::linker::{LinkPlan, LinkResult, Linker};
use crate::merger::Merger;
use crate::reporter::Reporter;
use crate::resolver::Resolver;
use crate::tool::{ExternalTool, render_command};

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The restructured framework was archived.
    Packaged {
        archive: PathBuf,
        /// Retained scratch directory, with `keep_scratch`.
        scratch: Option<PathBuf>,
    },
    /// Nothing was linked; these commands would have run.
    DryRun {
        commands: Vec<String>,
        scratch: Option<PathBuf>,
    },
}

pub struct Pipeline<'a> {
    config: PipelineConfig,
    tool: &'a dyn ExternalTool,
    reporter: &'a dyn Reporter,
    client: Client,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: PipelineConfig, tool: &'a dyn ExternalTool, reporter: &'a dyn Reporter) -> Self {
        Self {
            config,
            tool,
            reporter,
            client: Client::new(),
        }
    }

    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Run every step.
    ///
    /// The scratch directory is removed when this returns, whether the run
    /// succeeded or not, unless `keep_scratch` is set.
    ///
    /// # Errors
    ///
    /// The first step's error; see [`Error::step`].
    pub async fn run(&self) -> Result<Outcome> {
        let config = self.config.clone().validate()?;

        self.reporter.section(&format!("Resolving {}", config.pod));
        let descriptor = Resolver::new(self.tool, self.reporter)
            .resolve(&config.pod)
            .await?;

        let ctx = match &config.scratch_parent {
            Some(parent) => BuildContext::new_in(parent)?,
            None => BuildContext::new()?,
        };
        tracing::debug!(scratch = %ctx.path().display(), "scratch directory created");

        let result = self.execute(&config, &descriptor, &ctx).await;

        if config.keep_scratch {
            let kept = ctx.keep();
            self.reporter
                .info(&format!("Scratch directory kept at {}", kept.display()));
            return result.map(|outcome| outcome.with_scratch(kept));
        }

        result
    }

    async fn execute(
        &self,
        config: &PipelineConfig,
        descriptor: &DependencyDescriptor,
        ctx: &BuildContext,
    ) -> Result<Outcome> {
        let archive_name = match descriptor.archive_name() {
            "" => format!("{}.tar.gz", config.pod),
            name => name.to_string(),
        };

        self.reporter
            .section(&format!("Downloading {}", descriptor.download_url));
        let download = ctx.work_dir().join(&archive_name);
        let bundle_root = ctx.bundle_root();
        DownloadRequest::new(&self.client, &descriptor.download_url, &download, self.reporter)
            .with_expected_hash(config.sha256.as_deref())
            .with_extract_dest(&bundle_root)
            .execute()
            .await?;

        let BundleLayout {
            framework_dir,
            inputs,
        } = bundle::discover(&bundle_root, &config.pod)?;

        let plan = LinkPlan {
            name: &config.pod,
            inputs: &inputs,
            descriptor,
            developer_dir: &config.developer_dir,
            min_os_version: &config.min_os_version,
        };
        let merged = ctx.merged_output(&config.pod);

        if config.dry_run {
            return Ok(Outcome::DryRun {
                commands: dry_run_commands(ctx, &plan, config, &merged),
                scratch: None,
            });
        }

        self.reporter.section("Linking");
        let results = Linker::new(self.tool, self.reporter, plan)
            .link_all(ctx, &config.archs)
            .await?;

        self.reporter.section("Merging");
        let merged = Merger::new(self.tool, self.reporter)
            .merge(&results, &merged)
            .await?;

        self.reporter.section("Restructuring");
        FrameworkBundle::new(framework_dir, &config.pod)
            .restructure(self.tool, self.reporter, &merged)
            .await?;

        self.reporter.section("Creating tar.gz");
        let archive = config.output_dir.join(&archive_name);
        let dest = archive.clone();
        tokio::task::spawn_blocking(move || create_tar_gz(&bundle_root, &dest))
            .await
            .map_err(|e| Error::io("Archive task failed", std::io::Error::other(e)))??;

        self.reporter
            .success(&format!("File {} created!", archive.display()));
        Ok(Outcome::Packaged {
            archive,
            scratch: None,
        })
    }
}

impl Outcome {
    fn with_scratch(self, kept: PathBuf) -> Self {
        match self {
            Self::Packaged { archive, .. } => Self::Packaged {
                archive,
                scratch: Some(kept),
            },
            Self::DryRun { commands, .. } => Self::DryRun {
                commands,
                scratch: Some(kept),
            },
        }
    }
}

fn dry_run_commands(
    ctx: &BuildContext,
    plan: &LinkPlan<'_>,
    config: &PipelineConfig,
    merged: &Path,
) -> Vec<String> {
    let slices: Vec<LinkResult> = config
        .archs
        .iter()
        .map(|arch| LinkResult {
            arch: *arch,
            path: ctx.work_dir().join(format!("{arch}.dylib")),
        })
        .collect();

    let mut commands: Vec<String> = slices
        .iter()
        .map(|slice| render_command("libtool", &plan.args(slice.arch, &slice.path)))
        .collect();
    commands.push(render_command("lipo", &Merger::create_args(&slices, merged)));
    commands
}
