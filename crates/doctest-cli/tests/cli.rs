// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Drives the `doctest-ts` binary as a subprocess.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const SOURCE: &str = "/**\n * twice(2) // => 4\n */\nexport function twice(n: number) { return n * 2 }\n";

fn run(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_doctest-ts"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run doctest-ts")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn writes_doctest_files_for_a_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("src")).expect("mkdir");
    fs::write(dir.path().join("src/twice.ts"), SOURCE).expect("write");
    fs::write(dir.path().join("src/plain.ts"), "export const x = 1\n").expect("write");

    let output = run(&["--mocha", "src"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));

    let written = fs::read_to_string(dir.path().join("src/twice.doctest.ts")).expect("doctest file");
    assert!(written.starts_with("import \"mocha\"\n"));
    assert!(written.contains("__expect(twice(2), \"failed at twice (src/twice.ts:2:1)\").to.deep.equal(4)"));
    assert!(!dir.path().join("src/plain.doctest.ts").exists());

    let log = stderr(&output);
    assert!(log.contains("Writing src/twice.doctest.ts (1 test)"), "{}", log);
    assert!(log.contains("No doctests found in src/plain.ts"), "{}", log);
}

#[test]
fn dialect_must_be_chosen_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("a.ts"), SOURCE).expect("write");

    let none = run(&["a.ts"], dir.path());
    assert_eq!(none.status.code(), Some(2));
    assert!(stderr(&none).contains("choose an output from --mocha --jest --ava --tape"));

    let both = run(&["--jest", "--ava", "a.ts"], dir.path());
    assert_eq!(both.status.code(), Some(2));
    assert!(stderr(&both).contains("cannot output both jest and ava"));

    assert!(!dir.path().join("a.doctest.ts").exists());
}

#[test]
fn list_prints_cases_without_writing() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("a.ts"), SOURCE).expect("write");

    let output = run(&["--ava", "--list", "a.ts"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("a.ts (1 test)"), "{}", stdout);
    assert!(stdout.contains("twice doctest 0 a.ts:2 [1 assertion]"), "{}", stdout);
    assert!(!dir.path().join("a.doctest.ts").exists());
}

#[test]
fn json_reports_cases() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("a.ts"), SOURCE).expect("write");

    let output = run(&["--tape", "--json", "a.ts"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let report = &reports[0];
    assert_eq!(report["file"], "a.ts");
    assert_eq!(report["dialect"], "tape");
    assert_eq!(report["cases"][0]["context"]["function_name"], "twice");
    assert_eq!(report["cases"][0]["body"][0]["kind"], "assertion");
    assert_eq!(report["cases"][0]["body"][0]["rhs"], "4");
}

#[test]
fn malformed_file_fails_without_stopping_others() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("a.ts"), "/** f() // => 1 */\nfunction f() {\n").expect("write");
    fs::write(dir.path().join("b.ts"), SOURCE).expect("write");

    let output = run(&["--jest", "a.ts", "b.ts"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    let log = stderr(&output);
    assert!(log.contains("error: a.ts: line 2: Unclosed '{' - missing '}'"), "{}", log);
    assert!(dir.path().join("b.doctest.ts").exists());
    assert!(!dir.path().join("a.doctest.ts").exists());
}

#[test]
fn missing_path_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run(&["--mocha", "nope.ts"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("no such file or directory: nope.ts"));
}
