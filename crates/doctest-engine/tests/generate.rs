// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! End-to-end generation of doctest files.

use std::fs;

use doctest_engine::{Config, DanglingMarkers, Dialect, EngineError, TestCreator};

const COUNTER: &str = r#"import {helper} from "./helper"

/**
 * A counter.
 *
 * const c = new Counter(2)
 * c.next() // => 3
 */
export class Counter {
    private count: number

    constructor(start: number) {
        this.count = start
    }

    /**
     * Advances by one.
     *
     * ```ts
     * new Counter(0).next() // => 1
     * ```
     */
    next(): number {
        return ++this.count
    }

    /** @example
     * new Counter(5).peek() // => 5
     */
    protected peek() { return this.count }
}

/**
 * import {strict} from "assert"
 *
 * // adds numbers
 * add(1, 2) // => 3
 */
export function add(a: number, b: number): number {
    return a + b
}
"#;

const MOCHA_TESTS: &str = r#"describe("Counter", () => {
    describe("Counter", () => {
        it("doctest 0", () => {
            const c = new Counter(2);
            __expect(c.next(), "failed at Counter (src/counter.ts:7:1)").to.deep.equal(3)
        })
    })
    describe("next", () => {
        it("doctest 0", () => {
            __expect(new Counter(0).next(), "failed at next (src/counter.ts:20:1)").to.deep.equal(1)
        })
    })
    describe("peek", () => {
        it("doctest 0", () => {
            __expect(new Counter(5).peek(), "failed at peek (src/counter.ts:28:1)").to.deep.equal(5)
        })
    })
})
describe("add", () => {
    it("adds numbers", () => {
        __expect(add(1, 2), "failed at add (src/counter.ts:37:1)").to.deep.equal(3)
    })
})"#;

fn creator(dialect: Dialect) -> TestCreator {
    let config = Config { dialect, ..Config::default() };
    TestCreator::new("src/counter.ts", config).expect("creator")
}

#[test]
fn mocha_file_layout() {
    let generated = creator(Dialect::Mocha).generate(COUNTER).expect("generated");
    assert_eq!(generated.test_count(), 4);
    assert_eq!(generated.output_path, std::path::PathBuf::from("src/counter.doctest.ts"));

    let lines: Vec<usize> = generated.cases.iter().filter_map(|c| c.context.line_number).collect();
    assert_eq!(lines, vec![5, 19, 27, 35]);

    let contents = &generated.contents;
    assert!(contents.starts_with(
        "import \"mocha\"\nimport {expect as __expect} from \"chai\"\nimport {strict} from \"assert\"\nimport {helper} from \"./helper\"\n"
    ));
    assert!(contents.contains("    public count: number\n"));
    assert!(contents.contains("    public peek() { return this.count }\n"));
    assert!(!contents.contains("private"));
    assert!(contents.ends_with(&format!("}}\n\n{}", MOCHA_TESTS)), "{}", contents);
}

#[test]
fn flat_dialect_file() {
    let generated = creator(Dialect::Tape).generate(COUNTER).expect("generated");
    let contents = &generated.contents;
    assert!(contents.starts_with("import * as __test from \"tape\"\nimport {strict} from \"assert\"\n"));
    assert!(contents.ends_with(
        "__test(\"adds numbers\", t => {\n    t.deepEqual(add(1, 2), 3, \"failed at add (src/counter.ts:37:1)\")\n    t.end()\n})"
    ));
    assert!(!contents.contains("describe("));
}

#[test]
fn generation_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("counter.ts");
    fs::write(&source, COUNTER).expect("write source");

    let config = Config { dialect: Dialect::Jest, ..Config::default() };
    let creator = TestCreator::new(&source, config).expect("creator");
    let first = creator.create_test().expect("first run");
    let written = fs::read(dir.path().join("counter.doctest.ts")).expect("output");
    assert_eq!(written, first.contents.as_bytes());

    let second = creator.create_test().expect("second run");
    assert_eq!(second.contents, first.contents);
    assert_eq!(fs::read(&second.output_path).expect("output"), written);
    assert_eq!(fs::read_to_string(&source).expect("source"), COUNTER);
}

#[test]
fn no_doctests_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("plain.ts");
    fs::write(&source, "/** Just docs. */\nexport const x = 1\n").expect("write source");

    let generated = TestCreator::new(&source, Config::default()).expect("creator").create_test().expect("run");
    assert_eq!(generated.test_count(), 0);
    assert!(!dir.path().join("plain.doctest.ts").exists());
}

#[test]
fn failures_leave_no_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let broken = dir.path().join("broken.ts");
    fs::write(&broken, "/** f() // => 1 */\nfunction f() {\n").expect("write source");
    let err = TestCreator::new(&broken, Config::default()).expect("creator").create_test().unwrap_err();
    assert!(matches!(err, EngineError::Parse { line: 1, .. }), "{:?}", err);
    assert!(!dir.path().join("broken.doctest.ts").exists());

    let dangling = dir.path().join("dangling.ts");
    fs::write(&dangling, "/**\n * f() // => 1\n * // => 2\n */\nexport function f() { return 1 }\n").expect("write");
    let strict = Config { dangling_markers: DanglingMarkers::Error, ..Config::default() };
    let err = TestCreator::new(&dangling, strict).expect("creator").create_test().unwrap_err();
    assert!(matches!(err, EngineError::DanglingMarker { line: 2 }), "{:?}", err);
    assert!(!dir.path().join("dangling.doctest.ts").exists());
}

#[test]
fn warnings_point_at_file_lines() {
    let source = "/**\n * f() // => 1\n * // => 2\n */\nexport function f() { return 1 }\n";
    let config = Config { dangling_markers: DanglingMarkers::Warn, ..Config::default() };
    let generated = TestCreator::new("w.ts", config).expect("creator").generate(source).expect("generated");
    assert_eq!(generated.test_count(), 1);
    assert_eq!(generated.warnings.len(), 1);
    assert_eq!(generated.warnings[0].line, 2);
}

#[test]
fn already_doctest_is_rejected() {
    assert!(matches!(
        TestCreator::new("src/counter.doctest.ts", Config::default()),
        Err(EngineError::AlreadyDoctest(_))
    ));
}
