// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockKind {
    File,
    Dir,
}

#[derive(Debug, Clone)]
pub struct MockEntry {
    pub kind: MockKind,
    pub modified: SystemTime,
}

#[derive(Debug, Default)]
struct MockState {
    entries: BTreeMap<PathBuf, MockEntry>,
    deny_create: HashSet<PathBuf>,
    deny_remove: HashSet<PathBuf>,
}

/// In-memory filesystem for tests.
///
/// Paths are taken literally (no normalisation). Parents are created
/// implicitly when adding entries. Individual paths can be made to fail on
/// creation or removal.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, modified: SystemTime) {
        self.insert(path.as_ref(), MockKind::File, modified);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>, modified: SystemTime) {
        self.insert(path.as_ref(), MockKind::Dir, modified);
    }

    /// Add a file whose mtime is `secs` seconds after the Unix epoch.
    pub fn add_file_at(&self, path: impl AsRef<Path>, secs: u64) {
        self.add_file(path, SystemTime::UNIX_EPOCH + Duration::from_secs(secs));
    }

    /// Make `create_dir_all` fail for this exact path.
    pub fn deny_create(&self, path: impl AsRef<Path>) {
        self.lock().deny_create.insert(path.as_ref().to_path_buf());
    }

    /// Make `remove_all` fail for this exact path.
    pub fn deny_remove(&self, path: impl AsRef<Path>) {
        self.lock().deny_remove.insert(path.as_ref().to_path_buf());
    }

    /// Sorted list of every path currently present.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.lock().entries.keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn insert(&self, path: &Path, kind: MockKind, modified: SystemTime) {
        let mut state = self.lock();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            state
                .entries
                .entry(ancestor.to_path_buf())
                .or_insert(MockEntry {
                    kind: MockKind::Dir,
                    modified,
                });
        }
        state
            .entries
            .insert(path.to_path_buf(), MockEntry { kind, modified });
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.lock().entries.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(
            self.lock().entries.get(path),
            Some(MockEntry {
                kind: MockKind::Dir,
                ..
            })
        )
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        {
            let state = self.lock();
            if state.deny_create.contains(path) {
                return Err(anyhow!("Permission denied: {:?}", path));
            }
            if let Some(entry) = state.entries.get(path) {
                if entry.kind == MockKind::File {
                    return Err(anyhow!("File exists: {:?}", path));
                }
                return Ok(());
            }
        }
        self.insert(path, MockKind::Dir, SystemTime::now());
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry {
                kind: MockKind::Dir,
                ..
            }) => Ok(state
                .entries
                .keys()
                .filter(|p| p.parent() == Some(path))
                .cloned()
                .collect()),
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        self.lock()
            .entries
            .get(path)
            .map(|e| e.modified)
            .ok_or_else(|| anyhow!("File not found: {:?}", path))
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        let mut state = self.lock();
        if state.deny_remove.contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        if !state.entries.contains_key(path) {
            return Err(anyhow!("File not found: {:?}", path));
        }
        state.entries.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_a_file_creates_its_parents() {
        let fs = MockFileSystem::new();
        fs.add_file_at("/backups/db/dump.sql", 10);

        assert!(fs.is_dir(Path::new("/backups/db")));
        assert!(fs.is_dir(Path::new("/backups")));
        assert_eq!(
            fs.read_dir(Path::new("/backups")).unwrap(),
            vec![PathBuf::from("/backups/db")]
        );
    }

    #[test]
    fn remove_all_drops_descendants_only() {
        let fs = MockFileSystem::new();
        fs.add_file_at("/t/a/1", 1);
        fs.add_file_at("/t/ab", 1);

        fs.remove_all(Path::new("/t/a")).unwrap();

        assert!(!fs.exists(Path::new("/t/a/1")));
        assert!(fs.exists(Path::new("/t/ab")));
    }
}
