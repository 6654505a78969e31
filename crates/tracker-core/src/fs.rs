//! FileSystem trait abstraction for platform-independent file operations.
//!
//! Implementations:
//! - `InMemoryFs` - For testing
//! - `NativeFs` (in tracker-daemon) - Uses tokio::fs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, FsError>;

/// Platform-independent filesystem abstraction.
///
/// Implementations must be `Send + Sync` for use across threads.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Read file contents
    async fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Write file contents (creates parent directories if needed)
    async fn write(&self, path: &str, content: &[u8]) -> Result<()>;

    /// Check if path exists
    async fn exists(&self, path: &str) -> Result<bool>;
}

/// In-memory filesystem for testing.
///
/// Counts writes so tests can assert that a no-op update issued no
/// persistence call at all.
pub struct InMemoryFs {
    files: RwLock<HashMap<String, Vec<u8>>>,
    write_count: RwLock<u64>,
}

impl InMemoryFs {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            write_count: RwLock::new(0),
        }
    }

    /// Total number of write calls performed so far.
    pub fn write_count(&self) -> u64 {
        *self.write_count.read().unwrap()
    }

    fn normalize_path(path: &str) -> String {
        path.trim_matches('/').to_string()
    }
}

impl Default for InMemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileSystem for InMemoryFs {
    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let path = Self::normalize_path(path);
        let files = self.files.read().unwrap();
        files
            .get(&path)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path))
    }

    async fn write(&self, path: &str, content: &[u8]) -> Result<()> {
        let path = Self::normalize_path(path);
        let mut files = self.files.write().unwrap();
        files.insert(path, content.to_vec());
        drop(files);

        *self.write_count.write().unwrap() += 1;
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let path = Self::normalize_path(path);
        let files = self.files.read().unwrap();
        let dir_prefix = format!("{}/", path);
        Ok(files.contains_key(&path) || files.keys().any(|k| k.starts_with(&dir_prefix)))
    }
}

// Implement FileSystem for Arc<T> where T: FileSystem
// This allows sharing a filesystem between a NoteStore and test assertions
#[async_trait]
impl<T: FileSystem + Send + Sync> FileSystem for std::sync::Arc<T> {
    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        (**self).read(path).await
    }

    async fn write(&self, path: &str, content: &[u8]) -> Result<()> {
        (**self).write(path, content).await
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        (**self).exists(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inmemory_fs_basic_operations() {
        let fs = InMemoryFs::new();

        // Write a file
        fs.write("test.md", b"hello world").await.unwrap();

        // Read it back
        let content = fs.read("test.md").await.unwrap();
        assert_eq!(content, b"hello world");

        // Check exists
        assert!(fs.exists("test.md").await.unwrap());
        assert!(!fs.exists("nonexistent.md").await.unwrap());
    }

    #[tokio::test]
    async fn test_inmemory_fs_read_missing_file() {
        let fs = InMemoryFs::new();
        let err = fs.read("missing.md").await.unwrap_err();
        assert!(matches!(err, FsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_inmemory_fs_counts_writes() {
        let fs = InMemoryFs::new();
        assert_eq!(fs.write_count(), 0);

        fs.write("a.md", b"one").await.unwrap();
        fs.write("a.md", b"two").await.unwrap();
        fs.write("b.md", b"three").await.unwrap();

        assert_eq!(fs.write_count(), 3);

        // Reads don't count
        fs.read("a.md").await.unwrap();
        assert_eq!(fs.write_count(), 3);
    }

    #[tokio::test]
    async fn test_inmemory_fs_nested_paths() {
        let fs = InMemoryFs::new();

        fs.write("daily/2024-01-01.md", b"content").await.unwrap();

        // Parent directory is reported as existing
        assert!(fs.exists("daily").await.unwrap());
        assert!(fs.exists("daily/2024-01-01.md").await.unwrap());
    }
}
