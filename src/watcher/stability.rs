// File size and mtime snapshots for the debounce check

use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Size and modification time of a file at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSnapshot {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl FileSnapshot {
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Reads file metadata for the debounce check
pub trait FileStat: Send + Sync {
    fn snapshot(&self, path: &Path) -> io::Result<FileSnapshot>;
}

pub struct FsStat;

impl FileStat for FsStat {
    fn snapshot(&self, path: &Path) -> io::Result<FileSnapshot> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(io::ErrorKind::Other, "not a regular file"));
        }
        Ok(FileSnapshot {
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_tracks_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.pdf");
        std::fs::write(&path, b"").unwrap();

        let empty = FsStat.snapshot(&path).unwrap();
        assert!(empty.is_empty());

        std::fs::write(&path, b"%PDF-1.5 more bytes").unwrap();
        let written = FsStat.snapshot(&path).unwrap();
        assert_eq!(written.len, 19);
        assert_ne!(empty, written);
    }

    #[test]
    fn test_snapshot_rejects_directory_and_missing() {
        let dir = TempDir::new().unwrap();
        assert!(FsStat.snapshot(dir.path()).is_err());
        assert!(FsStat.snapshot(&dir.path().join("missing.pdf")).is_err());
    }
}
