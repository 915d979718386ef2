//! Handle to a user-chosen file: name, size, and where its bytes live.

use anyhow::{Context, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
enum Source {
    Disk(PathBuf),
    Memory(Bytes),
}

/// Cheap-to-clone file handle. Content is only read during encoding.
#[derive(Debug, Clone)]
pub struct FileHandle {
    name: String,
    size: u64,
    source: Source,
}

impl FileHandle {
    /// Stat a file on disk; size comes from its metadata.
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to stat upload source {}", path.display()))?;
        anyhow::ensure!(metadata.is_file(), "{} is not a regular file", path.display());

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            size: metadata.len(),
            source: Source::Disk(path.to_path_buf()),
        })
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            source: Source::Memory(bytes),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Lowercased extension without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }

    /// Read the full content.
    pub async fn read_all(&self) -> Result<Bytes> {
        match &self.source {
            Source::Memory(bytes) => Ok(bytes.clone()),
            Source::Disk(path) => {
                let data = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("Failed to read upload source {}", path.display()))?;
                Ok(Bytes::from(data))
            }
        }
    }
}
