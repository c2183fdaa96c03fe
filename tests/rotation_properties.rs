// tests/rotation_properties.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use proptest::prelude::*;

use batchup::backup::rotate;
use batchup::fs::mock::MockFileSystem;
use batchup::fs::FileSystem;
use batchup::output::MemoryConsole;

// Entries are `(mtime seconds, hidden?)`; duplicates in mtime are likely on
// purpose so tie-breaking gets exercised.
fn entries_strategy() -> impl Strategy<Value = Vec<(u64, bool)>> {
    proptest::collection::vec((0..20u64, prop::bool::weighted(0.2)), 0..25)
}

fn populate(entries: &[(u64, bool)]) -> (MockFileSystem, Vec<(u64, PathBuf)>, usize) {
    let fs = MockFileSystem::new();
    fs.add_dir("/t", std::time::SystemTime::UNIX_EPOCH);
    let mut visible = Vec::new();
    let mut hidden = 0;
    for (i, (secs, is_hidden)) in entries.iter().enumerate() {
        let name = if *is_hidden {
            hidden += 1;
            format!("/t/.h{i:02}")
        } else {
            format!("/t/e{i:02}")
        };
        fs.add_file_at(&name, *secs);
        if !*is_hidden {
            visible.push((*secs, PathBuf::from(name)));
        }
    }
    (fs, visible, hidden)
}

proptest! {
    #[test]
    fn rotation_keeps_exactly_the_newest(
        entries in entries_strategy(),
        keep in 0..30usize,
    ) {
        let (fs, visible, hidden) = populate(&entries);
        let console = MemoryConsole::new();

        let report = rotate(&fs, &console, Path::new("/t"), keep).unwrap();

        let expected_kept = keep.min(visible.len());
        prop_assert_eq!(report.total, visible.len());
        prop_assert_eq!(report.kept.len(), expected_kept);
        prop_assert_eq!(report.removed.len(), visible.len() - expected_kept);
        prop_assert!(report.failed.is_empty());

        // Nothing kept is older than anything removed.
        let mtime = |p: &PathBuf| visible.iter().find(|(_, q)| q == p).map(|(s, _)| *s).unwrap();
        if let (Some(oldest_kept), Some(newest_removed)) = (
            report.kept.iter().map(mtime).min(),
            report.removed.iter().map(mtime).max(),
        ) {
            prop_assert!(oldest_kept >= newest_removed);
        }

        // What is left on disk is the kept set plus every hidden entry.
        let remaining: HashSet<PathBuf> = fs.read_dir(Path::new("/t")).unwrap().into_iter().collect();
        prop_assert_eq!(remaining.len(), expected_kept + hidden);
        for p in &report.kept {
            prop_assert!(remaining.contains(p));
        }
        for p in &report.removed {
            prop_assert!(!remaining.contains(p));
        }
    }

    #[test]
    fn rotation_is_idempotent(
        entries in entries_strategy(),
        keep in 0..30usize,
    ) {
        let (fs, _, _) = populate(&entries);
        let console = MemoryConsole::new();

        let first = rotate(&fs, &console, Path::new("/t"), keep).unwrap();
        let second = rotate(&fs, &console, Path::new("/t"), keep).unwrap();

        prop_assert_eq!(second.kept, first.kept);
        prop_assert!(second.removed.is_empty());
    }
}
