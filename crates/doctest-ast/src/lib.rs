// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Shared syntax types for doctest-ts.
//!
//! This crate defines the spans, tokens and declaration tree passed between
//! the lexer, the parser and the doctest engine.

pub mod span;
pub mod token;
pub mod decl;

pub use span::{line_offset, LineMap, Span};
