use std::io::Write;
use std::path::{Path, PathBuf};

use todoboard_core::{TodoboardError, TodoboardResult};

/// Replaces files via a sibling temp file and rename, so readers never see a
/// half-written storage file.
pub struct AtomicWriter;

impl AtomicWriter {
    pub async fn write_atomic(path: &Path, data: &[u8]) -> TodoboardResult<()> {
        let path = path.to_path_buf();
        let data = data.to_vec();
        let len = data.len();
        let target = path.clone();
        tokio::task::spawn_blocking(move || Self::write_blocking(&target, &data))
            .await
            .map_err(|e| TodoboardError::Internal(format!("storage writer panicked: {e}")))??;
        tracing::debug!("Atomically wrote {} bytes to {}", len, path.display());
        Ok(())
    }

    fn write_blocking(path: &Path, data: &[u8]) -> TodoboardResult<()> {
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;
        let mut temp = tempfile::NamedTempFile::new_in(&parent)?;
        temp.write_all(data)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| TodoboardError::Io(e.error))?;
        Ok(())
    }

    /// Read a whole file, treating a missing file as `None`.
    pub async fn read_if_exists(path: &Path) -> TodoboardResult<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(data) => {
                tracing::debug!("Read {} bytes from {}", data.len(), path.display());
                Ok(Some(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        AtomicWriter::write_atomic(&path, b"{}").await.unwrap();

        let data = AtomicWriter::read_if_exists(&path).await.unwrap();
        assert_eq!(data.as_deref(), Some(&b"{}"[..]));
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");

        AtomicWriter::write_atomic(&path, b"first").await.unwrap();
        AtomicWriter::write_atomic(&path, b"second").await.unwrap();

        let data = AtomicWriter::read_if_exists(&path).await.unwrap().unwrap();
        assert_eq!(data, b"second");
        // Only the target remains; the temp file was renamed over it.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_none() {
        let dir = tempdir().unwrap();
        let data = AtomicWriter::read_if_exists(&dir.path().join("absent.json"))
            .await
            .unwrap();
        assert!(data.is_none());
    }
}
