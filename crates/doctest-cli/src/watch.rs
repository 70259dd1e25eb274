// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Watch mode: polls the watched sources and regenerates changed files.

use colored::Colorize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use std::{fs, thread};

use doctest_engine::Config;

use crate::discover::discover;
use crate::Outcome;

const DEBOUNCE_MS: u64 = 100;

/// Regenerate doctests whenever a watched file changes. Never returns.
pub fn watch(paths: &[PathBuf], config: &Config) -> ! {
    let mut snapshots = snapshot_files(paths);
    let file_count = snapshots.len();
    println!(
        "\n  {} {} file{}. Press {} to stop.",
        "Watching".green().bold(),
        file_count,
        if file_count == 1 { "" } else { "s" },
        "Ctrl+C".yellow()
    );

    loop {
        thread::sleep(Duration::from_millis(DEBOUNCE_MS));

        let new_snapshots = snapshot_files(paths);
        let changed = find_changes(&snapshots, &new_snapshots);

        if !changed.is_empty() {
            let names: Vec<String> = changed.iter().map(|p| p.display().to_string()).collect();
            println!("\n  {} [{}] {}", "Change:".yellow(), chrono_time(), names.join(", "));
            for path in &changed {
                if let Outcome::Written(written) = crate::generate(path, config) {
                    println!("{}", written.display());
                }
            }
        }
        snapshots = new_snapshots;
    }
}

/// Modification times of every watched source file.
fn snapshot_files(paths: &[PathBuf]) -> HashMap<PathBuf, SystemTime> {
    discover(paths)
        .into_iter()
        .filter_map(|path| {
            let mtime = fs::metadata(&path).and_then(|meta| meta.modified()).ok()?;
            Some((path, mtime))
        })
        .collect()
}

/// Files that are new or have a different modification time.
fn find_changes(
    old: &HashMap<PathBuf, SystemTime>,
    new: &HashMap<PathBuf, SystemTime>,
) -> Vec<PathBuf> {
    let mut changed: Vec<PathBuf> = new
        .iter()
        .filter(|(path, time)| old.get(*path) != Some(*time))
        .map(|(path, _)| path.clone())
        .collect();
    changed.sort();
    changed
}

/// Simple HH:MM:SS timestamp.
fn chrono_time() -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let hours = (now % 86400) / 3600;
    let minutes = (now % 3600) / 60;
    let seconds = now % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
