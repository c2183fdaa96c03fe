// src/backup/retention.rs

//! Keep-newest-N rotation of a target directory.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::output::Console;

/// Result of one rotation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationReport {
    /// Number of entries considered.
    pub total: usize,
    /// Entries kept, newest first.
    pub kept: Vec<PathBuf>,
    /// Entries deleted, in deletion order (newest of the old ones first).
    pub removed: Vec<PathBuf>,
    /// Entries that should have been deleted but could not be.
    pub failed: Vec<(PathBuf, String)>,
}

/// Delete everything in `dir` except the `keep` most recently modified
/// entries.
///
/// Entries are the direct children of `dir` (files and directories alike);
/// names starting with `.` are ignored. Ties on modification time are
/// broken by path so the result is deterministic.
///
/// A single failed deletion is reported and recorded, and rotation moves on
/// to the next entry. Listing the directory or reading a modification time
/// failing is an error: nothing is deleted in that case.
pub fn rotate(
    fs: &dyn FileSystem,
    console: &dyn Console,
    dir: &Path,
    keep: usize,
) -> Result<RotationReport> {
    let mut entries: Vec<(SystemTime, PathBuf)> = Vec::new();
    for path in fs.read_dir(dir)? {
        if is_hidden(&path) {
            continue;
        }
        let mtime = fs.modified(&path)?;
        entries.push((mtime, path));
    }

    entries.sort_by(|a, b| newest_first(a, b));

    let total = entries.len();
    let split = keep.min(total);
    let to_remove: Vec<PathBuf> = entries.drain(split..).map(|(_, p)| p).collect();
    let kept: Vec<PathBuf> = entries.into_iter().map(|(_, p)| p).collect();

    console.line(&format!(
        "Rotation: keeping {} of {} files.",
        kept.len(),
        total
    ));
    debug!(dir = %dir.display(), keep, total, "rotating");

    let mut report = RotationReport {
        total,
        kept,
        ..Default::default()
    };

    for path in to_remove {
        console.line(&format!("Delete {}", path.display()));
        match fs.remove_all(&path) {
            Ok(()) => report.removed.push(path),
            Err(err) => {
                console.line(&format!("Could not delete {}: {err:#}", path.display()));
                warn!(path = %path.display(), error = %err, "rotation could not delete entry");
                report.failed.push((path, format!("{err:#}")));
            }
        }
    }

    Ok(report)
}

fn newest_first(a: &(SystemTime, PathBuf), b: &(SystemTime, PathBuf)) -> Ordering {
    b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::output::MemoryConsole;

    fn nine_files() -> MockFileSystem {
        let fs = MockFileSystem::new();
        fs.add_dir("/t", SystemTime::UNIX_EPOCH);
        for i in 0..9u64 {
            fs.add_file_at(format!("/t/{i}"), 1_000 + i * 60);
        }
        fs
    }

    fn remaining(fs: &MockFileSystem) -> Vec<String> {
        fs.read_dir(Path::new("/t"))
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn keeps_newest_five_of_nine() {
        let fs = nine_files();
        let console = MemoryConsole::new();

        let report = rotate(&fs, &console, Path::new("/t"), 5).unwrap();

        assert_eq!(remaining(&fs), vec!["4", "5", "6", "7", "8"]);
        assert_eq!(report.total, 9);
        assert_eq!(report.removed.len(), 4);
        let lines = console.lines();
        assert_eq!(lines[0], "Rotation: keeping 5 of 9 files.");
        assert!(lines[1..].iter().all(|l| l.starts_with("Delete /t/")));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn keep_zero_empties_the_directory() {
        let fs = nine_files();
        let console = MemoryConsole::new();

        rotate(&fs, &console, Path::new("/t"), 0).unwrap();

        assert!(remaining(&fs).is_empty());
        assert_eq!(console.lines()[0], "Rotation: keeping 0 of 9 files.");
    }

    #[test]
    fn keep_beyond_count_deletes_nothing() {
        let fs = nine_files();
        let console = MemoryConsole::new();

        let report = rotate(&fs, &console, Path::new("/t"), 20).unwrap();

        assert_eq!(remaining(&fs).len(), 9);
        assert!(report.removed.is_empty());
        assert_eq!(console.lines(), vec!["Rotation: keeping 9 of 9 files."]);
    }

    #[test]
    fn empty_directory_reports_zero_of_zero() {
        let fs = MockFileSystem::new();
        fs.add_dir("/t", SystemTime::UNIX_EPOCH);
        let console = MemoryConsole::new();

        rotate(&fs, &console, Path::new("/t"), 3).unwrap();

        assert_eq!(console.lines(), vec!["Rotation: keeping 0 of 0 files."]);
    }

    #[test]
    fn failed_deletion_does_not_stop_the_rest() {
        let fs = nine_files();
        fs.deny_remove("/t/2");
        let console = MemoryConsole::new();

        let report = rotate(&fs, &console, Path::new("/t"), 5).unwrap();

        assert_eq!(remaining(&fs), vec!["2", "4", "5", "6", "7", "8"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, PathBuf::from("/t/2"));
        assert_eq!(report.removed.len(), 3);
        assert!(console.contents().contains("Could not delete /t/2"));
    }

    #[test]
    fn equal_mtimes_are_ordered_by_name() {
        let fs = MockFileSystem::new();
        for name in ["c", "a", "b"] {
            fs.add_file_at(format!("/t/{name}"), 50);
        }
        let console = MemoryConsole::new();

        let report = rotate(&fs, &console, Path::new("/t"), 2).unwrap();

        assert_eq!(report.kept, vec![PathBuf::from("/t/a"), PathBuf::from("/t/b")]);
        assert_eq!(report.removed, vec![PathBuf::from("/t/c")]);
    }

    #[test]
    fn hidden_entries_are_left_alone() {
        let fs = MockFileSystem::new();
        fs.add_file_at("/t/.keep", 1);
        fs.add_file_at("/t/old", 2);
        let console = MemoryConsole::new();

        rotate(&fs, &console, Path::new("/t"), 0).unwrap();

        assert!(fs.exists(Path::new("/t/.keep")));
        assert!(!fs.exists(Path::new("/t/old")));
        assert_eq!(console.lines()[0], "Rotation: keeping 0 of 1 files.");
    }

    #[test]
    fn directories_are_removed_recursively() {
        let fs = MockFileSystem::new();
        fs.add_file_at("/t/site.old/index.html", 1);
        fs.add_file_at("/t/site.new/index.html", 2);
        let console = MemoryConsole::new();

        rotate(&fs, &console, Path::new("/t"), 1).unwrap();

        assert!(!fs.exists(Path::new("/t/site.old/index.html")));
        assert!(fs.exists(Path::new("/t/site.new/index.html")));
    }
}
