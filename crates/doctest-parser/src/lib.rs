// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for TypeScript sources.
//!
//! Builds the declaration tree that doc comments hang off, and splits code
//! snippets into top-level statements.

mod hints;
mod parser;

pub use parser::{split_fragments, Fragment, FragmentKind, ParseError, ParseResult, Parser};
