// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Emitter: renders test cases as code for one test framework.
//!
//! Every dialect goes through the same grouping pass. A [`DialectSpec`]
//! supplies the preamble, the registration calls and the equality check.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::case::TestCase;
use crate::context::Context;
use crate::script::Operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Mocha,
    Jest,
    Ava,
    Tape,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialectError {
    #[error("choose an output from --mocha --jest --ava --tape")]
    Missing,
    #[error("cannot output both {0} and {1}")]
    Conflict(&'static str, &'static str),
}

/// How tests are registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `suite(name, () => { test(name, () => { ... }) })`
    Grouped { suite: &'static str, test: &'static str },
    /// `register(name, handle => { ...; finish })`
    Flat { register: &'static str, handle: &'static str, finish: Option<&'static str> },
}

/// Renders `lhs == rhs` with a failure message.
pub type CheckFn = fn(lhs: &str, rhs: &str, message: &str) -> String;

/// Everything that differs between dialects.
#[derive(Debug, Clone, Copy)]
pub struct DialectSpec {
    pub name: &'static str,
    pub preamble: &'static [&'static str],
    pub layout: Layout,
    pub check: CheckFn,
}

fn chai_check(lhs: &str, rhs: &str, message: &str) -> String {
    format!("__expect({}, {}).to.deep.equal({})", lhs, quote(message), rhs)
}

fn jest_check(lhs: &str, rhs: &str, message: &str) -> String {
    format!("__expect({}).toEqual({}) // {}", lhs, rhs, message)
}

fn deep_equal_check(lhs: &str, rhs: &str, message: &str) -> String {
    format!("t.deepEqual({}, {}, {})", lhs, rhs, quote(message))
}

static MOCHA: DialectSpec = DialectSpec {
    name: "mocha",
    preamble: &["import \"mocha\"", "import {expect as __expect} from \"chai\""],
    layout: Layout::Grouped { suite: "describe", test: "it" },
    check: chai_check,
};

static JEST: DialectSpec = DialectSpec {
    name: "jest",
    preamble: &["import \"jest\"", "const __expect: jest.Expect = expect"],
    layout: Layout::Grouped { suite: "describe", test: "it" },
    check: jest_check,
};

static AVA: DialectSpec = DialectSpec {
    name: "ava",
    preamble: &["import {test as __test} from \"ava\""],
    layout: Layout::Flat { register: "__test", handle: "t", finish: None },
    check: deep_equal_check,
};

static TAPE: DialectSpec = DialectSpec {
    name: "tape",
    preamble: &["import * as __test from \"tape\""],
    layout: Layout::Flat { register: "__test", handle: "t", finish: Some("t.end()") },
    check: deep_equal_check,
};

impl Dialect {
    pub const ALL: [Dialect; 4] = [Dialect::Mocha, Dialect::Jest, Dialect::Ava, Dialect::Tape];

    pub fn spec(self) -> &'static DialectSpec {
        match self {
            Dialect::Mocha => &MOCHA,
            Dialect::Jest => &JEST,
            Dialect::Ava => &AVA,
            Dialect::Tape => &TAPE,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Exactly one flag must be set.
    pub fn from_flags(mocha: bool, jest: bool, ava: bool, tape: bool) -> Result<Dialect, DialectError> {
        let chosen: Vec<Dialect> = Dialect::ALL
            .into_iter()
            .zip([mocha, jest, ava, tape])
            .filter_map(|(dialect, set)| set.then_some(dialect))
            .collect();
        match chosen.as_slice() {
            [] => Err(DialectError::Missing),
            [one] => Ok(*one),
            [first, second, ..] => Err(DialectError::Conflict(first.name(), second.name())),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cases of one class, split by function in first-seen order.
#[derive(Default)]
struct ClassGroup<'a> {
    functions: IndexMap<&'a str, Vec<&'a TestCase>>,
    loose: Vec<&'a TestCase>,
}

/// Group cases by class then function; classless cases come last.
fn group(cases: &[TestCase]) -> Vec<(Option<&str>, ClassGroup<'_>)> {
    let mut classes: IndexMap<Option<&str>, ClassGroup<'_>> = IndexMap::new();
    for case in cases {
        let class = classes.entry(case.context.class_name.as_deref()).or_default();
        match case.context.function_name.as_deref() {
            Some(function) => class.functions.entry(function).or_default().push(case),
            None => class.loose.push(case),
        }
    }
    let classless = classes.shift_remove(&None);
    classes.into_iter().chain(classless.map(|group| (None, group))).collect()
}

/// Render all cases of a file. Each case appears exactly once.
pub fn emit_tests(cases: &[TestCase], dialect: Dialect, indent_width: usize) -> String {
    let mut writer = Writer::new(dialect.spec(), indent_width);
    for (class, group) in group(cases) {
        writer.open_suite(class);
        for (&function, members) in &group.functions {
            writer.open_suite(Some(function));
            members.iter().for_each(|case| writer.test(case));
            writer.close_suite(Some(function));
        }
        group.loose.iter().for_each(|case| writer.test(case));
        writer.close_suite(class);
    }
    writer.out
}

struct Writer {
    spec: &'static DialectSpec,
    width: usize,
    depth: usize,
    out: String,
}

impl Writer {
    fn new(spec: &'static DialectSpec, width: usize) -> Self {
        Self { spec, width, depth: 0, out: String::new() }
    }

    /// Write `code` at the current depth, indenting each of its lines.
    fn line(&mut self, code: &str) {
        let pad = " ".repeat(self.depth * self.width);
        for line in code.lines() {
            if !self.out.is_empty() {
                self.out.push('\n');
            }
            if !line.is_empty() {
                self.out.push_str(&pad);
            }
            self.out.push_str(line);
        }
    }

    fn open_suite(&mut self, name: Option<&str>) {
        if let (Layout::Grouped { suite, .. }, Some(name)) = (self.spec.layout, name) {
            self.line(&format!("{}({}, () => {{", suite, quote(name)));
            self.depth += 1;
        }
    }

    fn close_suite(&mut self, name: Option<&str>) {
        if let (Layout::Grouped { .. }, Some(_)) = (self.spec.layout, name) {
            self.depth -= 1;
            self.line("})");
        }
    }

    fn test(&mut self, case: &TestCase) {
        let context = &case.context;
        match self.spec.layout {
            Layout::Grouped { test, .. } => {
                let name = context.test_name.as_deref().or(context.function_name.as_deref()).unwrap_or("doctest");
                self.line(&format!("{}({}, () => {{", test, quote(name)));
                self.depth += 1;
                self.body(case);
            }
            Layout::Flat { register, handle, finish } => {
                let name = context.test_name.as_deref().unwrap_or("doctest");
                self.line(&format!("{}({}, {} => {{", register, quote(name), handle));
                self.depth += 1;
                self.body(case);
                if let Some(finish) = finish {
                    self.line(finish);
                }
            }
        }
        self.depth -= 1;
        self.line("})");
    }

    fn body(&mut self, case: &TestCase) {
        for op in &case.body {
            match op {
                Operation::Statement { code } => self.line(code),
                Operation::Assertion { lhs, rhs, line } => {
                    let message = failure_message(&case.context, *line);
                    let check = (self.spec.check)(lhs, rhs, &message);
                    self.line(&check);
                }
            }
        }
    }
}

/// `failed at f (a.ts:3:1)`, with a 1-based line.
fn failure_message(context: &Context, line: usize) -> String {
    let location = format!("{}:{}:1", context.file_path, line + 1);
    match &context.function_name {
        Some(function) => format!("failed at {} ({})", function, location),
        None => format!("failed at {}", location),
    }
}

/// A string as a JavaScript string literal.
fn quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexSet;

    fn case(class: Option<&str>, function: Option<&str>, name: &str, body: Vec<Operation>) -> TestCase {
        let mut context = Context::new("src/a.ts").with_function(function).with_test_name(name);
        if let Some(class) = class {
            context = context.with_class(class);
        }
        TestCase { body, context, extra_imports: IndexSet::new() }
    }

    fn check(lhs: &str, rhs: &str, line: usize) -> Operation {
        Operation::Assertion { lhs: lhs.into(), rhs: rhs.into(), line }
    }

    #[test]
    fn dialect_flags() {
        assert_eq!(Dialect::from_flags(false, true, false, false), Ok(Dialect::Jest));
        assert_eq!(Dialect::from_flags(false, false, false, false), Err(DialectError::Missing));
        assert_eq!(
            Dialect::from_flags(true, false, false, true),
            Err(DialectError::Conflict("mocha", "tape"))
        );
        assert_eq!(DialectError::Conflict("mocha", "tape").to_string(), "cannot output both mocha and tape");
    }

    #[test]
    fn mocha_nests_by_class_and_function() {
        let cases = vec![
            case(Some("A"), Some("x"), "doctest 0", vec![check("A.x()", "42", 2)]),
            case(None, Some("f"), "doctest 0", vec![Operation::Statement { code: "let n = f()".into() }]),
            case(Some("A"), None, "loose", vec![check("new A()", "{}", 0)]),
            case(Some("A"), Some("x"), "again", vec![check("A.x() + 1", "43", 5)]),
        ];
        let expected = r#"describe("A", () => {
    describe("x", () => {
        it("doctest 0", () => {
            __expect(A.x(), "failed at x (src/a.ts:3:1)").to.deep.equal(42)
        })
        it("again", () => {
            __expect(A.x() + 1, "failed at x (src/a.ts:6:1)").to.deep.equal(43)
        })
    })
    it("loose", () => {
        __expect(new A(), "failed at src/a.ts:1:1").to.deep.equal({})
    })
})
describe("f", () => {
    it("doctest 0", () => {
        let n = f()
    })
})"#;
        assert_eq!(emit_tests(&cases, Dialect::Mocha, 4), expected);
    }

    #[test]
    fn jest_message_is_a_comment() {
        let cases = vec![case(None, None, "top", vec![check("1 + 1", "2", 9)])];
        assert_eq!(
            emit_tests(&cases, Dialect::Jest, 2),
            "it(\"top\", () => {\n  __expect(1 + 1).toEqual(2) // failed at src/a.ts:10:1\n})"
        );
    }

    #[test]
    fn flat_dialects_skip_suites() {
        let cases = vec![
            case(Some("A"), Some("x"), "first", vec![check("A.x()", "42", 0)]),
            case(None, None, "second", vec![Operation::Statement { code: "if (a) {\nb()\n}".into() }]),
        ];
        assert_eq!(
            emit_tests(&cases, Dialect::Tape, 4),
            "__test(\"first\", t => {\n    t.deepEqual(A.x(), 42, \"failed at x (src/a.ts:1:1)\")\n    t.end()\n})\n__test(\"second\", t => {\n    if (a) {\n    b()\n    }\n    t.end()\n})"
        );
        assert!(!emit_tests(&cases, Dialect::Ava, 4).contains("t.end()"));
    }

    #[test]
    fn equal_cases_are_all_emitted() {
        let same = case(Some("A"), Some("x"), "doctest 0", vec![check("a", "1", 0)]);
        let cases = vec![same.clone(), same.clone(), same];
        assert_eq!(emit_tests(&cases, Dialect::Mocha, 4).matches("it(\"doctest 0\"").count(), 3);
    }

    #[test]
    fn names_are_escaped() {
        let cases = vec![case(None, Some("f"), "says \"hi\"", vec![])];
        assert!(emit_tests(&cases, Dialect::Ava, 4).starts_with("__test(\"says \\\"hi\\\"\", t => {"));
    }
}
