//! Theme file storage
//!
//! Files live at `<root>/<store_id>/<theme_code>/<file_path>`.

use crate::domain::files::{FileStoreError, ThemeFileStore};
use crate::domain::validation::validate_file_path;
use crate::infra::packages::format::is_safe_component;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use uuid::Uuid;

fn check_address(theme_code: &str, file_path: &str) -> Result<(), FileStoreError> {
    if !is_safe_component(theme_code) || validate_file_path(file_path).is_err() {
        return Err(FileStoreError::InvalidPath(format!("{}/{}", theme_code, file_path)));
    }
    Ok(())
}

/// Theme files on the local file system
pub struct FsThemeFileStore {
    root: PathBuf,
}

impl FsThemeFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, store_id: Uuid, theme_code: &str, file_path: &str) -> Result<PathBuf, FileStoreError> {
        check_address(theme_code, file_path)?;
        Ok(self
            .root
            .join(store_id.to_string())
            .join(theme_code)
            .join(file_path))
    }
}

#[async_trait]
impl ThemeFileStore for FsThemeFileStore {
    async fn read(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
    ) -> Result<Option<String>, FileStoreError> {
        let path = self.resolve(store_id, theme_code, file_path)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        content: &str,
    ) -> Result<(), FileStoreError> {
        let path = self.resolve(store_id, theme_code, file_path)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, content).await?;
        Ok(())
    }
}

type FileKey = (Uuid, String, String);

/// Theme files held in memory
#[derive(Default)]
pub struct InMemoryThemeFileStore {
    files: RwLock<HashMap<FileKey, String>>,
}

impl InMemoryThemeFileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ThemeFileStore for InMemoryThemeFileStore {
    async fn read(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
    ) -> Result<Option<String>, FileStoreError> {
        check_address(theme_code, file_path)?;
        let key = (store_id, theme_code.to_string(), file_path.to_string());
        Ok(self.files.read().get(&key).cloned())
    }

    async fn write(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        content: &str,
    ) -> Result<(), FileStoreError> {
        check_address(theme_code, file_path)?;
        let key = (store_id, theme_code.to_string(), file_path.to_string());
        self.files.write().insert(key, content.to_string());
        Ok(())
    }
}
