//! fatpod - dynamic fat framework repackager CLI

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fatpod_cli::Cli;
use fatpod_cli::ui::ConsoleReporter;
use fatpod_core::tool::{self, SystemTool};
use fatpod_core::{Outcome, Pipeline, REQUIRED_TOOLS, Reporter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let reporter = ConsoleReporter::new();

    let config = cli.config().validate().context("invalid arguments")?;
    tool::preflight(&REQUIRED_TOOLS)?;

    let tool = SystemTool;
    let pipeline = Pipeline::new(config, &tool, &reporter);

    match pipeline.run().await {
        Ok(Outcome::Packaged { archive, scratch }) => {
            tracing::info!(archive = %archive.display(), scratch = ?scratch, "done");
            Ok(())
        }
        Ok(Outcome::DryRun { commands, .. }) => {
            reporter.section("Dry run");
            for command in &commands {
                reporter.command(command);
            }
            Ok(())
        }
        Err(e) => {
            let step = e.step();
            reporter.error(&format!("{step} step failed"));
            Err(e).with_context(|| format!("fatpod {} aborted during {step}", cli.pod))
        }
    }
}
