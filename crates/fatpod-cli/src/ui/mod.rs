//! Terminal output.
//!
//! - [`theme`] - Colors, icons and size formatting
//! - [`console`] - [`ConsoleReporter`], the terminal [`Reporter`](fatpod_core::Reporter)

pub mod console;
pub mod theme;

pub use console::ConsoleReporter;
pub use theme::Theme;
