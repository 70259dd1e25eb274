// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI output formatting with colors and styling.
//!
//! Respects NO_COLOR and FORCE_COLOR environment variables.
//! Colors are automatically disabled when output is piped.

use colored::{ColoredString, Colorize};

/// Initialize color support based on environment.
/// Call once at startup.
pub fn init() {
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    } else if std::env::var("FORCE_COLOR").is_ok() {
        colored::control::set_override(true);
    }
}

pub fn error_label() -> ColoredString {
    "error".red().bold()
}

pub fn warning_label() -> ColoredString {
    "warning".yellow().bold()
}

pub fn hint_label() -> ColoredString {
    "hint".cyan()
}

pub fn hint_text(msg: &str) -> ColoredString {
    msg.dimmed()
}

pub fn hint_equals() -> ColoredString {
    "=".cyan()
}

pub fn status_pass() -> ColoredString {
    "✓".green()
}

pub fn status_fail() -> ColoredString {
    "✗".red()
}

pub fn file_path(path: &str) -> ColoredString {
    path.underline()
}

pub fn suite(name: &str) -> ColoredString {
    name.bold()
}

pub fn test_name(name: &str) -> ColoredString {
    name.cyan()
}

pub fn location(path: &str, line: usize) -> ColoredString {
    format!("{}:{}", path, line + 1).dimmed()
}

pub fn test_count(n: usize) -> ColoredString {
    let text = if n == 1 { "1 test".to_string() } else { format!("{} tests", n) };
    text.green()
}
