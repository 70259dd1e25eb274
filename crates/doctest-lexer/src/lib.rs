// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexer for TypeScript sources.
//!
//! Unlike a compiler lexer this one keeps comments and newlines as tokens:
//! doc comments are the whole point of doctest extraction, and newlines
//! decide where statements end.

mod lexer;

pub use lexer::{LexError, LexResult, Lexer};
