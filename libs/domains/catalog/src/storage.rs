use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Backing store for product images
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the bytes and return the stored file name
    async fn store(&self, file_name_hint: &str, data: &[u8]) -> std::io::Result<String>;
}

/// Filesystem-backed image store
///
/// Stored files get a random base name so concurrent uploads never clash;
/// only the extension of the uploaded name is kept.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, file_name_hint: &str, data: &[u8]) -> std::io::Result<String> {
        let base = uuid::Uuid::new_v4();
        let file_name = match Path::new(file_name_hint).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{base}.{ext}"),
            None => base.to_string(),
        };

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&file_name), data).await?;

        tracing::debug!(file = %file_name, bytes = data.len(), "Stored image");
        Ok(file_name)
    }
}
