use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::errors::{GiftError, Result};

/// Local file reader rooted at a directory.
#[derive(Debug)]
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.root_path.join(uri);
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => GiftError::AssetNotFound(path.display().to_string()),
            _ => GiftError::Io(e),
        })
    }
}

/// In-memory reader keyed by path. Used by hosts that already hold the bytes,
/// and by tests.
#[derive(Debug, Default)]
pub struct MemoryAssetReader {
    files: FxHashMap<String, Arc<[u8]>>,
}

impl MemoryAssetReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.files.insert(path.into(), bytes.into());
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        self.files
            .get(uri)
            .map(|b| b.to_vec())
            .ok_or_else(|| GiftError::AssetNotFound(uri.to_string()))
    }
}

/// Asset reader variants, dispatched without trait objects.
#[derive(Debug, Clone)]
pub enum AssetReader {
    File(Arc<FileAssetReader>),
    Memory(Arc<MemoryAssetReader>),
}

impl AssetReader {
    pub fn file(root: impl AsRef<Path>) -> Self {
        Self::File(Arc::new(FileAssetReader::new(root)))
    }

    #[must_use]
    pub fn memory(reader: MemoryAssetReader) -> Self {
        Self::Memory(Arc::new(reader))
    }

    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        match self {
            Self::File(r) => r.read_bytes(uri).await,
            Self::Memory(r) => r.read_bytes(uri),
        }
    }
}
