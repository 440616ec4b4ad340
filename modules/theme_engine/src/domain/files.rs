//! Raw theme source file storage abstraction

use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("Invalid theme file path '{0}'")]
    InvalidPath(String),

    #[error("File storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text files of a store's copy of a theme, addressed by `(store, theme, path)`
#[async_trait]
pub trait ThemeFileStore: Send + Sync {
    /// Current content, `None` when the file does not exist
    async fn read(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
    ) -> Result<Option<String>, FileStoreError>;

    /// Create or overwrite the file
    async fn write(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        content: &str,
    ) -> Result<(), FileStoreError>;
}
