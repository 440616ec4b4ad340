//! Theme packages read from a directory tree

use super::PackageSource;
use crate::domain::package::PackageError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Reads packages below `root` (see [`super::format`] for the layout)
pub struct FsThemePackageReader {
    root: PathBuf,
}

impl FsThemePackageReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl PackageSource for FsThemePackageReader {
    async fn read_raw(&self, path: &str) -> Result<Option<String>, PackageError> {
        let full = self.root.join(path);
        match tokio::fs::read_to_string(&full).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(PackageError::Malformed {
                path: path.to_string(),
                reason: e.to_string(),
            }),
            Err(e) => Err(PackageError::Unavailable(format!("{}: {}", full.display(), e))),
        }
    }
}
