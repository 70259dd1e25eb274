// SPDX-License-Identifier: (MIT OR Apache-2.0)

use std::fmt;
use std::str::FromStr;

use crate::emit::Dialect;

#[derive(Debug, Clone)]
pub struct Config {
    pub dialect: Dialect,
    pub dangling_markers: DanglingMarkers,
    /// Spaces per nesting level in emitted test code
    pub indent_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: Dialect::Mocha,
            dangling_markers: DanglingMarkers::Ignore,
            indent_width: 4,
        }
    }
}

/// What to do with an assertion marker that no expression claims: a second
/// marker after the same expression, or one after a non-expression statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DanglingMarkers {
    /// Drop it silently
    #[default]
    Ignore,
    /// Drop it and report a warning
    Warn,
    /// Fail the file
    Error,
}

impl FromStr for DanglingMarkers {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(DanglingMarkers::Ignore),
            "warn" => Ok(DanglingMarkers::Warn),
            "error" => Ok(DanglingMarkers::Error),
            other => Err(format!("unknown marker policy '{}', expected ignore, warn or error", other)),
        }
    }
}

impl fmt::Display for DanglingMarkers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DanglingMarkers::Ignore => "ignore",
            DanglingMarkers::Warn => "warn",
            DanglingMarkers::Error => "error",
        })
    }
}
