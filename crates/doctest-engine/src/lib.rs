// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Doctest engine for TypeScript.
//!
//! Finds `// => expected` examples in doc comments and turns them into a
//! test file for mocha, jest, ava or tape:
//!
//! source → [`collect`] → [`script`] → [`case`] → [`emit`] (+ [`expose`]) → file

pub mod case;
pub mod collect;
pub mod config;
pub mod context;
pub mod emit;
pub mod error;
pub mod expose;
pub mod jsdoc;
pub mod pipeline;
pub mod script;

pub use case::{build_cases, TestCase};
pub use collect::{collect_comments, CommentRecord};
pub use config::{Config, DanglingMarkers};
pub use context::Context;
pub use emit::{emit_tests, Dialect, DialectError};
pub use error::EngineError;
pub use expose::expose_privates;
pub use pipeline::{doctest_path, is_doctest_file, Generated, TestCreator};
pub use script::{extract_imports, extract_scripts, is_doctest, Operation, ScriptBlock, Warning};
