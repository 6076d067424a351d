//! External tool invocation.
//!
//! Every Xcode / CocoaPods binary the pipeline needs (`pod`, `libtool`,
//! `lipo`, `plutil`) is reached through [`ExternalTool`], so pipeline logic can
//! be exercised against a recording fake.

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::reporter::Reporter;

/// Binaries that must be on `PATH` before a run starts.
pub const REQUIRED_TOOLS: [&str; 4] = ["pod", "libtool", "lipo", "plutil"];

/// Captured result of one tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// stdout followed by stderr, verbatim, for diagnostics.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (true, _) => self.stderr.clone(),
            (false, true) => self.stdout.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }
}

#[async_trait]
pub trait ExternalTool: Send + Sync {
    /// Run `program` with `args` to completion and capture its output.
    ///
    /// A non-zero exit is *not* an error at this level; callers decide which
    /// pipeline error it maps to. Only failing to spawn the process is.
    async fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput>;
}

/// Runs real processes from `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTool;

#[async_trait]
impl ExternalTool for SystemTool {
    async fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput> {
        tracing::debug!(program, ?args, "spawning");

        let output = match Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
        {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ToolNotFound {
                    program: program.to_string(),
                });
            }
            Err(e) => return Err(Error::io(format!("Failed to spawn {program}"), e)),
        };

        Ok(ToolOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Render a command line the way a user would type it.
pub fn render_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Echo, run, and echo the output of a tool.
///
/// The command line is echoed before the call; output is only echoed on
/// success since failures are surfaced through the returned error instead.
pub async fn execute(
    tool: &dyn ExternalTool,
    reporter: &dyn Reporter,
    program: &str,
    args: &[String],
) -> Result<ToolOutput> {
    reporter.command(&render_command(program, args));
    let output = tool.run(program, args).await?;

    if output.success() {
        let text = output.combined();
        if !text.trim().is_empty() {
            reporter.tool_output(text.trim_end());
        }
    } else {
        tracing::debug!(program, status = ?output.status, "tool exited unsuccessfully");
    }

    Ok(output)
}

/// Check that every required tool resolves on `PATH`.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] naming every missing tool.
pub fn preflight(tools: &[&str]) -> Result<()> {
    let missing: Vec<&str> = tools
        .iter()
        .copied()
        .filter(|tool| which::which(tool).is_err())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(Error::ToolNotFound {
        program: missing.join(", "),
    })
}
