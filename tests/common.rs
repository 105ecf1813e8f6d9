//! Shared fixtures for the integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use fidx::index::{DirectoryWalker, Exclusions, IndexStore, RebuildCoordinator};
use tempfile::TempDir;

/// A scratch root plus a file-backed index stored inside it.
pub struct Fixture {
    pub dir: TempDir,
    pub database: PathBuf,
}

impl Fixture {
    /// `a.txt` (10 bytes), `sub/b.json` (20 bytes) and `sub/empty/`.
    pub fn scenario() -> Self {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", 10);
        write(dir.path(), "sub/b.json", 20);
        fs::create_dir_all(dir.path().join("sub/empty")).unwrap();
        let database = dir.path().join("index.db");
        Self { dir, database }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn coordinator(&self) -> RebuildCoordinator {
        let exclusions = Exclusions::new().with_database(&self.database);
        RebuildCoordinator::new(
            IndexStore::file(&self.database).unwrap(),
            DirectoryWalker::new(self.root(), exclusions),
        )
    }
}

/// Write `len` bytes to `rel`, creating parent directories.
pub fn write(root: &Path, rel: &str, len: usize) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, vec![b'x'; len]).unwrap();
}
