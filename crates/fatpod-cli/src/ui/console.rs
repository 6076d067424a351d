//! Line-oriented terminal reporter.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::style::Stylize;
use fatpod_core::Reporter;
use fatpod_schema::Arch;

use super::theme::{Theme, format_size};

/// Prints pipeline progress to stdout and problems to stderr.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    theme: Theme,
    /// A `\r`-updated download line is currently on screen.
    progress_open: AtomicBool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn close_progress(&self) {
        if self.progress_open.swap(false, Ordering::Relaxed) {
            println!();
        }
    }

    fn line(&self, text: &str, color: crossterm::style::Color) {
        self.close_progress();
        println!("{}", text.with(color));
    }
}

/// `"1.5 MB / 4.0 MB"`, or just the received size when the length is unknown.
pub fn format_download(current: u64, total: Option<u64>) -> String {
    match total.filter(|&t| t > 0) {
        Some(total) => format!("{} / {}", format_size(current), format_size(total)),
        None => format_size(current),
    }
}

impl Reporter for ConsoleReporter {
    fn section(&self, title: &str) {
        self.close_progress();
        println!();
        println!("{}", title.with(self.theme.colors.section).bold());
    }

    fn command(&self, line: &str) {
        self.line(&format!("$ {line}"), self.theme.colors.command);
    }

    fn tool_output(&self, output: &str) {
        self.line(output, self.theme.colors.tool_output);
    }

    fn downloading(&self, current: u64, total: Option<u64>) {
        self.progress_open.store(true, Ordering::Relaxed);
        let text = format!("  {}", format_download(current, total));
        print!("\r{}", text.with(self.theme.colors.info));
        let _ = std::io::stdout().flush();
    }

    fn linking(&self, arch: Arch) {
        let msg = format!(
            "{} Linking for {} {arch}",
            self.theme.icons.linking,
            arch.platform().label()
        );
        self.line(&msg, self.theme.colors.info);
    }

    fn info(&self, msg: &str) {
        let msg = format!("{}  {msg}", self.theme.icons.step);
        self.line(&msg, self.theme.colors.info);
    }

    fn success(&self, msg: &str) {
        let msg = format!("{}  {msg}", self.theme.icons.success);
        self.line(&msg, self.theme.colors.success);
    }

    fn warning(&self, msg: &str) {
        self.close_progress();
        let msg = format!("{} {msg}", self.theme.icons.warning);
        eprintln!("{}", msg.with(self.theme.colors.warning));
    }

    fn error(&self, msg: &str) {
        self.close_progress();
        let msg = format!("{} {msg}", self.theme.icons.error);
        eprintln!("{}", msg.with(self.theme.colors.error));
    }
}
