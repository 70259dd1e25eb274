// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Finds the TypeScript files to generate doctests for.

use std::fs;
use std::path::{Path, PathBuf};

use doctest_engine::is_doctest_file;

const EXTENSIONS: [&str; 3] = ["ts", "mts", "cts"];

/// Expand files and directories into a sorted list of source files.
///
/// Files named on the command line are taken as given, apart from generated
/// doctest files. Directories are walked recursively.
pub fn discover(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk(path, &mut files);
        } else if !is_doctest_file(path) {
            files.push(path.clone());
        }
    }
    files.sort();
    files.dedup();
    files
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        if path.is_dir() {
            if name.starts_with('.') || name == "node_modules" || name == "target" {
                continue;
            }
            walk(&path, files);
            continue;
        }

        if is_source(&path) {
            files.push(path);
        }
    }
}

/// A `.ts`-family file that is neither a declaration file nor generated.
pub fn is_source(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext));
    let declaration = [".d.ts", ".d.mts", ".d.cts"].iter().any(|suffix| name.ends_with(suffix));
    has_extension && !declaration && !is_doctest_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_files() {
        assert!(is_source(Path::new("src/a.ts")));
        assert!(is_source(Path::new("b.mts")));
        assert!(!is_source(Path::new("a.d.ts")));
        assert!(!is_source(Path::new("a.doctest.ts")));
        assert!(!is_source(Path::new("a.tsx")));
        assert!(!is_source(Path::new("a.js")));
    }

    #[test]
    fn walks_directories_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        for rel in ["b.ts", "a/z.ts", "a/y.d.ts", "a/y.doctest.ts", "node_modules/m.ts", ".git/h.ts", "c.js"] {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            fs::write(&path, "").expect("write");
        }
        let found = discover(&[root.to_path_buf()]);
        assert_eq!(found, vec![root.join("a/z.ts"), root.join("b.ts")]);
    }
}
