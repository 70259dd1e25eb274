// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Per-file orchestration: source file in, `.doctest` sibling out.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use doctest_ast::token::Token;
use doctest_lexer::Lexer;
use doctest_parser::Parser;
use indexmap::IndexSet;
use tempfile::NamedTempFile;

use crate::case::{build_cases, TestCase};
use crate::collect::collect_comments;
use crate::config::Config;
use crate::emit::emit_tests;
use crate::error::EngineError;
use crate::expose;
use crate::script::Warning;

/// `Foo.ts` becomes `Foo.doctest.ts`; a path without extension gets `.doctest`.
pub fn doctest_path(path: &Path) -> PathBuf {
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => {
            let mut name = stem.to_os_string();
            name.push(".doctest.");
            name.push(ext);
            path.with_file_name(name)
        }
        _ => {
            let mut name = path.as_os_str().to_os_string();
            name.push(".doctest");
            PathBuf::from(name)
        }
    }
}

/// Generated files are recognized by name alone.
pub fn is_doctest_file(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name.to_string_lossy().contains("doctest"))
}

/// Output of one run over one file.
#[derive(Debug)]
pub struct Generated {
    pub output_path: PathBuf,
    /// Empty when no test was found
    pub contents: String,
    pub cases: Vec<TestCase>,
    pub warnings: Vec<Warning>,
}

impl Generated {
    pub fn test_count(&self) -> usize {
        self.cases.len()
    }
}

/// Creates the doctest file for one source file.
pub struct TestCreator {
    path: PathBuf,
    config: Config,
}

impl TestCreator {
    pub fn new(path: impl Into<PathBuf>, config: Config) -> Result<Self, EngineError> {
        let path = path.into();
        if is_doctest_file(&path) {
            return Err(EngineError::AlreadyDoctest(path));
        }
        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn output_path(&self) -> PathBuf {
        doctest_path(&self.path)
    }

    /// Build the doctest file contents for `source` without touching disk.
    pub fn generate(&self, source: &str) -> Result<Generated, EngineError> {
        let tokens = lex(source)?;
        let parsed = Parser::new(tokens.clone()).parse();
        if let Some(error) = parsed.errors.into_iter().next() {
            return Err(EngineError::parse(source, error));
        }

        let file_path = self.path.display().to_string();
        let records = collect_comments(&parsed.decls, source, &file_path);
        let built = build_cases(&records, &self.config)?;

        let contents = if built.cases.is_empty() {
            String::new()
        } else {
            let imports: IndexSet<&str> = built
                .cases
                .iter()
                .flat_map(|case| case.extra_imports.iter().map(String::as_str))
                .collect();
            let exposed = expose::relax(source, &tokens);
            let tests = emit_tests(&built.cases, self.config.dialect, self.config.indent_width);

            let mut parts: Vec<&str> = imports.into_iter().collect();
            parts.push(&exposed);
            parts.push(&tests);
            parts.join("\n")
        };

        Ok(Generated {
            output_path: self.output_path(),
            contents,
            cases: built.cases,
            warnings: built.warnings,
        })
    }

    /// Read the file, generate, and write the output if any test was found.
    pub fn create_test(&self) -> Result<Generated, EngineError> {
        let source = fs::read_to_string(&self.path).map_err(|e| EngineError::io(&self.path, e))?;
        let generated = self.generate(&source)?;
        if generated.test_count() > 0 {
            write_atomic(&generated.output_path, &generated.contents)?;
        }
        Ok(generated)
    }
}

fn lex(source: &str) -> Result<Vec<Token>, EngineError> {
    let lexed = Lexer::new(source).tokenize();
    match lexed.errors.into_iter().next() {
        Some(error) => Err(EngineError::lex(source, error)),
        None => Ok(lexed.tokens),
    }
}

/// Write through a temporary file in the same directory, then rename.
fn write_atomic(path: &Path, contents: &str) -> Result<(), EngineError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| EngineError::io(path, e))?;
    tmp.write_all(contents.as_bytes()).map_err(|e| EngineError::io(path, e))?;
    tmp.persist(path).map_err(|e| EngineError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names() {
        assert_eq!(doctest_path(Path::new("src/Foo.ts")), PathBuf::from("src/Foo.doctest.ts"));
        assert_eq!(doctest_path(Path::new("a.b.mts")), PathBuf::from("a.b.doctest.mts"));
        assert_eq!(doctest_path(Path::new("dir/Makefile")), PathBuf::from("dir/Makefile.doctest"));
    }

    #[test]
    fn refuses_doctest_files() {
        let err = TestCreator::new("src/Foo.doctest.ts", Config::default()).err().expect("rejected");
        assert!(matches!(err, EngineError::AlreadyDoctest(_)));
        assert_eq!(
            err.to_string(),
            "not creating a doctest for src/Foo.doctest.ts, which already is a doctest"
        );
        assert!(TestCreator::new("src/doctests/a.ts", Config::default()).is_ok());
    }

    #[test]
    fn nothing_to_generate() {
        let creator = TestCreator::new("a.ts", Config::default()).expect("creator");
        let generated = creator.generate("/** Plain docs. */\nexport const a = 1\n").expect("generated");
        assert_eq!(generated.test_count(), 0);
        assert!(generated.contents.is_empty());
    }

    #[test]
    fn malformed_source_is_an_error() {
        let creator = TestCreator::new("a.ts", Config::default()).expect("creator");
        let err = creator.generate("/** f() // => 1 */\nfunction f() {\n").unwrap_err();
        assert!(matches!(err, EngineError::Parse { .. }));
        assert!(err.hint().is_some());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let creator = TestCreator::new(dir.path().join("gone.ts"), Config::default()).expect("creator");
        assert!(matches!(creator.create_test(), Err(EngineError::Io { .. })));
    }
}
