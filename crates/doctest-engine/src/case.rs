// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Test case builder: candidates of every comment, placed in the file.

use indexmap::IndexSet;
use serde::Serialize;

use crate::collect::CommentRecord;
use crate::config::Config;
use crate::context::Context;
use crate::error::EngineError;
use crate::script::{self, Operation, ScriptBlock, ScriptError, Warning};

/// One test, ready to emit. Cases are never merged, even when equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    pub body: ScriptBlock,
    pub context: Context,
    /// Comment imports followed by the dialect preamble
    pub extra_imports: IndexSet<String>,
}

#[derive(Debug, Default)]
pub struct BuildResult {
    pub cases: Vec<TestCase>,
    pub warnings: Vec<Warning>,
}

/// Turn every record of a file into test cases, in record order.
pub fn build_cases(records: &[CommentRecord], config: &Config) -> Result<BuildResult, EngineError> {
    let preamble = config.dialect.spec().preamble;
    let mut result = BuildResult::default();

    for record in records {
        let anchor = record.context.line_number.unwrap_or(0);
        let mut warnings = Vec::new();
        let candidates = match script::extract_scripts(&record.text, config.dangling_markers, &mut warnings) {
            Ok(candidates) => candidates,
            Err(ScriptError::DanglingMarker { line }) => {
                return Err(EngineError::DanglingMarker { line: anchor + line })
            }
            Err(ScriptError::Lex(_) | ScriptError::Parse(_)) => Vec::new(),
        };
        result
            .warnings
            .extend(warnings.into_iter().map(|w| Warning { line: anchor + w.line, ..w }));

        if candidates.is_empty() {
            continue;
        }
        let imports: IndexSet<String> = script::extract_imports(&record.text)
            .into_iter()
            .chain(preamble.iter().map(|line| line.to_string()))
            .collect();

        for (i, candidate) in candidates.into_iter().enumerate() {
            let candidate = candidate.shifted(anchor);
            let name = candidate.name.unwrap_or_else(|| format!("doctest {}", i));
            result.cases.push(TestCase {
                body: candidate.script,
                context: record.context.with_line(candidate.line).with_test_name(name),
                extra_imports: imports.clone(),
            });
        }
    }
    Ok(result)
}

impl TestCase {
    pub fn assertion_count(&self) -> usize {
        self.body.iter().filter(|op| matches!(op, Operation::Assertion { .. })).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DanglingMarkers;
    use crate::emit::Dialect;

    fn record(text: &str, function: Option<&str>, line: usize) -> CommentRecord {
        CommentRecord {
            text: text.to_string(),
            context: Context::new("a.ts").with_function(function).with_line(line),
        }
    }

    #[test]
    fn lines_are_shifted_by_the_comment_anchor() {
        let records = [record("Doubles.\n\nf(2) // => 4\n\n// zero\nf(0)\n// => 0", Some("f"), 10)];
        let built = build_cases(&records, &Config::default()).expect("cases");
        assert_eq!(built.cases.len(), 2);

        let first = &built.cases[0];
        assert_eq!(first.context.line_number, Some(12));
        assert_eq!(first.context.test_name.as_deref(), Some("doctest 0"));
        assert_eq!(first.context.function_name.as_deref(), Some("f"));
        assert_eq!(
            first.body,
            vec![Operation::Assertion { lhs: "f(2)".into(), rhs: "4".into(), line: 12 }]
        );

        let second = &built.cases[1];
        assert_eq!(second.context.line_number, Some(14));
        assert_eq!(second.context.test_name.as_deref(), Some("zero"));
        assert_eq!(second.assertion_count(), 1);
        assert!(matches!(second.body[0], Operation::Assertion { line: 16, .. }));
    }

    #[test]
    fn imports_come_before_the_preamble() {
        let records = [record("import {f} from \"./f\"\nf() // => 1", None, 0)];
        let config = Config { dialect: Dialect::Ava, ..Config::default() };
        let built = build_cases(&records, &config).expect("cases");
        let imports: Vec<&str> = built.cases[0].extra_imports.iter().map(String::as_str).collect();
        assert_eq!(imports, vec!["import {f} from \"./f\"", "import {test as __test} from \"ava\""]);
    }

    #[test]
    fn records_without_doctests_add_nothing() {
        let records = [record("Just prose.", Some("f"), 3), record("", None, 9)];
        let built = build_cases(&records, &Config::default()).expect("cases");
        assert!(built.cases.is_empty());
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn warnings_and_errors_carry_file_lines() {
        let records = [record("x // => 1\n// => 2", None, 20)];

        let warn = Config { dangling_markers: DanglingMarkers::Warn, ..Config::default() };
        let built = build_cases(&records, &warn).expect("cases");
        assert_eq!(built.cases.len(), 1);
        assert_eq!(built.warnings[0].line, 21);

        let strict = Config { dangling_markers: DanglingMarkers::Error, ..Config::default() };
        match build_cases(&records, &strict) {
            Err(EngineError::DanglingMarker { line }) => assert_eq!(line, 21),
            other => panic!("expected a dangling marker error, got {:?}", other),
        }
    }
}
