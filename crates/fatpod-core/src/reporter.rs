//! Reporter trait for dependency injection
//!
//! This trait allows the pipeline to report progress and echo external
//! commands without being coupled to a specific terminal implementation.

use fatpod_schema::Arch;

pub trait Reporter: Send + Sync {
    /// Indicates a new phase has started (e.g. "Linking", "Restructuring").
    fn section(&self, title: &str);

    /// Echo an external command line before it runs.
    fn command(&self, line: &str);

    /// Captured output of an external command that succeeded.
    fn tool_output(&self, output: &str);

    /// Updates the progress of the archive download.
    fn downloading(&self, current: u64, total: Option<u64>);

    /// A link step for one architecture is starting.
    fn linking(&self, arch: Arch);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a success message.
    fn success(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Log an error message.
    fn error(&self, msg: &str);
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn command(&self, _: &str) {}
    fn tool_output(&self, _: &str) {}
    fn downloading(&self, _: u64, _: Option<u64>) {}
    fn linking(&self, _: Arch) {}
    fn info(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn error(&self, _: &str) {}
}

#[cfg(test)]
pub(crate) mod fake {
    use super::Reporter;
    use fatpod_schema::Arch;
    use std::sync::Mutex;

    /// Keeps every command, tool output and warning, tagged by kind.
    #[derive(Default)]
    pub(crate) struct RecordingReporter {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingReporter {
        pub(crate) fn lines(&self, kind: &str) -> Vec<String> {
            let prefix = format!("{kind}: ");
            self.lines
                .lock()
                .unwrap()
                .iter()
                .filter_map(|l| l.strip_prefix(&prefix).map(str::to_string))
                .collect()
        }

        fn push(&self, kind: &str, text: &str) {
            self.lines.lock().unwrap().push(format!("{kind}: {text}"));
        }
    }

    impl Reporter for RecordingReporter {
        fn section(&self, _: &str) {}
        fn command(&self, line: &str) {
            self.push("command", line);
        }
        fn tool_output(&self, output: &str) {
            self.push("output", output);
        }
        fn downloading(&self, _: u64, _: Option<u64>) {}
        fn linking(&self, _: Arch) {}
        fn info(&self, _: &str) {}
        fn success(&self, _: &str) {}
        fn warning(&self, msg: &str) {
            self.push("warning", msg);
        }
        fn error(&self, _: &str) {}
    }
}
