// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Errors that stop generation for one file.

use std::path::{Path, PathBuf};

use doctest_ast::LineMap;
use doctest_lexer::LexError;
use doctest_parser::ParseError;
use thiserror::Error;

/// Lines are stored 0-based and shown 1-based.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {}: {error}", .line + 1)]
    Lex {
        line: usize,
        #[source]
        error: LexError,
    },

    #[error("line {}: {error}", .line + 1)]
    Parse {
        line: usize,
        #[source]
        error: ParseError,
    },

    #[error("not creating a doctest for {}, which already is a doctest", .0.display())]
    AlreadyDoctest(PathBuf),

    #[error("line {}: assertion marker has no expression to check", .line + 1)]
    DanglingMarker { line: usize },
}

impl EngineError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        EngineError::Io { path: path.to_path_buf(), source }
    }

    pub(crate) fn lex(source: &str, error: LexError) -> Self {
        let line = LineMap::new(source).line_of(error.span.start);
        EngineError::Lex { line, error }
    }

    pub(crate) fn parse(source: &str, error: ParseError) -> Self {
        let line = LineMap::new(source).line_of(error.span.start);
        EngineError::Parse { line, error }
    }

    /// Hint attached to a syntax error, if any.
    pub fn hint(&self) -> Option<&str> {
        match self {
            EngineError::Lex { error, .. } => error.hint.as_deref(),
            EngineError::Parse { error, .. } => error.hint.as_deref(),
            _ => None,
        }
    }
}
