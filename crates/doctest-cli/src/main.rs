// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! doctest-ts: writes a `.doctest.ts` test file next to each TypeScript
//! source whose doc comments contain `// => expected` examples.

mod discover;
mod output;
mod watch;

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use doctest_engine::{Config, DanglingMarkers, Dialect, EngineError, Generated, TestCreator};

#[derive(Parser, Debug)]
#[command(name = "doctest-ts", version)]
#[command(about = "Generate test files from the doctests in TypeScript doc comments")]
struct Args {
    /// Source files or directories to scan
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Emit mocha tests with chai assertions
    #[arg(long)]
    mocha: bool,

    /// Emit jest tests
    #[arg(long)]
    jest: bool,

    /// Emit ava tests
    #[arg(long)]
    ava: bool,

    /// Emit tape tests
    #[arg(long)]
    tape: bool,

    /// Keep running and regenerate files when they change
    #[arg(short, long)]
    watch: bool,

    /// What to do with an assertion marker no expression claims: ignore, warn or error
    #[arg(long, default_value_t = DanglingMarkers::Ignore)]
    dangling_markers: DanglingMarkers,

    /// Print the test cases found instead of writing files
    #[arg(long)]
    list: bool,

    /// Print the test cases found as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    output::init();
    let args = Args::parse();

    let dialect = match Dialect::from_flags(args.mocha, args.jest, args.ava, args.tape) {
        Ok(dialect) => dialect,
        Err(e) => {
            eprintln!("{}: {}", output::error_label(), e);
            process::exit(2);
        }
    };
    let config = Config { dialect, dangling_markers: args.dangling_markers, ..Config::default() };

    let mut ok = true;
    for path in args.paths.iter().filter(|p| !p.exists()) {
        eprintln!("{}: no such file or directory: {}", output::error_label(), path.display());
        ok = false;
    }
    let files = discover::discover(&args.paths);

    if args.json {
        ok &= print_json(&files, &config);
    } else if args.list {
        ok &= print_list(&files, &config);
    } else {
        for file in &files {
            ok &= !matches!(generate(file, &config), Outcome::Failed);
        }
    }

    if args.watch && !args.list && !args.json {
        watch::watch(&args.paths, &config);
    }
    if !ok {
        process::exit(1);
    }
}

pub(crate) enum Outcome {
    Written(PathBuf),
    Empty,
    Failed,
}

/// Generate and write the doctest file for `path`, reporting on stderr.
pub(crate) fn generate(path: &Path, config: &Config) -> Outcome {
    match create(path, config) {
        Ok(generated) => {
            report_warnings(path, &generated);
            if generated.test_count() == 0 {
                eprintln!("No doctests found in {}", output::file_path(&path.display().to_string()));
                return Outcome::Empty;
            }
            eprintln!(
                "Writing {} ({})",
                output::file_path(&generated.output_path.display().to_string()),
                output::test_count(generated.test_count())
            );
            Outcome::Written(generated.output_path)
        }
        Err(e) => {
            report_error(path, &e);
            Outcome::Failed
        }
    }
}

fn create(path: &Path, config: &Config) -> Result<Generated, EngineError> {
    TestCreator::new(path, config.clone())?.create_test()
}

/// Generate without writing.
fn analyze(path: &Path, config: &Config) -> Result<Generated, EngineError> {
    let creator = TestCreator::new(path, config.clone())?;
    let source = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
    creator.generate(&source)
}

fn report_warnings(path: &Path, generated: &Generated) {
    for warning in &generated.warnings {
        eprintln!(
            "{}: {}: {}",
            output::warning_label(),
            output::location(&path.display().to_string(), warning.line),
            warning.message
        );
    }
}

fn report_error(path: &Path, error: &EngineError) {
    eprintln!("{}: {}: {}", output::error_label(), path.display(), error);
    if let Some(hint) = error.hint() {
        eprintln!("  {} {}: {}", output::hint_equals(), output::hint_label(), output::hint_text(hint));
    }
}

fn print_list(files: &[PathBuf], config: &Config) -> bool {
    let mut ok = true;
    for file in files {
        let generated = match analyze(file, config) {
            Ok(generated) => generated,
            Err(e) => {
                println!("  {} {}", output::status_fail(), output::file_path(&file.display().to_string()));
                report_error(file, &e);
                ok = false;
                continue;
            }
        };
        report_warnings(file, &generated);
        if generated.test_count() == 0 {
            continue;
        }
        println!(
            "  {} {} ({})",
            output::status_pass(),
            output::file_path(&file.display().to_string()),
            output::test_count(generated.test_count())
        );
        for case in &generated.cases {
            let context = &case.context;
            let scope: Vec<&str> = [context.class_name.as_deref(), context.function_name.as_deref()]
                .into_iter()
                .flatten()
                .collect();
            let assertions = case.assertion_count();
            println!(
                "      {} {} {} [{} assertion{}]",
                output::suite(&scope.join(" > ")),
                output::test_name(context.test_name.as_deref().unwrap_or("doctest")),
                output::location(&context.file_path, context.line_number.unwrap_or(0)),
                assertions,
                if assertions == 1 { "" } else { "s" }
            );
        }
    }
    ok
}

fn print_json(files: &[PathBuf], config: &Config) -> bool {
    let mut ok = true;
    let mut reports = Vec::new();
    for file in files {
        match analyze(file, config) {
            Ok(generated) => reports.push(serde_json::json!({
                "file": file.display().to_string(),
                "output": generated.output_path.display().to_string(),
                "dialect": config.dialect,
                "cases": generated.cases,
                "warnings": generated.warnings,
            })),
            Err(e) => {
                ok = false;
                reports.push(serde_json::json!({
                    "file": file.display().to_string(),
                    "error": e.to_string(),
                }));
            }
        }
    }
    match serde_json::to_string_pretty(&reports) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("{}: {}", output::error_label(), e);
            ok = false;
        }
    }
    ok
}
