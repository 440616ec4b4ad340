//! Raw theme files and their append-only history

use super::{file_error, internal, Service};
use crate::contract::{FileChangeType, FileHistoryEntry, ThemeEngineError};
use crate::domain::diff::{diff_lines, LineDiff};
use crate::domain::events::{FileRestoredEvent, ThemeEvent};
use crate::domain::validation::{validate_file_path, validate_identifier};
use chrono::Utc;
use uuid::Uuid;

impl Service {
    pub async fn read_file(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
    ) -> Result<String, ThemeEngineError> {
        validate_identifier("theme code", theme_code)?;
        validate_file_path(file_path)?;
        self.files
            .read(store_id, theme_code, file_path)
            .await
            .map_err(file_error)?
            .ok_or_else(|| {
                ThemeEngineError::not_found("theme file", format!("{}/{}", theme_code, file_path))
            })
    }

    /// Write a theme file and record the new content in its history
    pub async fn save_file(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        content: &str,
    ) -> Result<FileHistoryEntry, ThemeEngineError> {
        validate_identifier("theme code", theme_code)?;
        validate_file_path(file_path)?;

        let previous = self
            .files
            .read(store_id, theme_code, file_path)
            .await
            .map_err(file_error)?;
        self.files
            .write(store_id, theme_code, file_path, content)
            .await
            .map_err(file_error)?;

        let change_type = match previous {
            Some(_) => FileChangeType::Update,
            None => FileChangeType::Create,
        };
        let entry = self
            .record_file_version(store_id, theme_code, file_path, content, change_type)
            .await?;
        tracing::debug!(%store_id, theme_code, file_path, version = entry.version, "saved theme file");
        Ok(entry)
    }

    /// History of a file, newest first
    pub async fn list_file_history(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        limit: Option<u64>,
    ) -> Result<Vec<FileHistoryEntry>, ThemeEngineError> {
        validate_identifier("theme code", theme_code)?;
        validate_file_path(file_path)?;
        let limit = limit
            .unwrap_or(self.config.file_history_limit)
            .clamp(1, self.config.file_history_limit.max(1));
        self.repos
            .file_history
            .list_for_file(store_id, theme_code, file_path, limit)
            .await
            .map_err(internal("list file history"))
    }

    /// Restore a file to a recorded version.
    ///
    /// The content being overwritten is appended to history as `pre_restore` first,
    /// then the file is written and the write is recorded as `restore`, so the restore
    /// itself can be undone. Returns the `restore` entry.
    pub async fn restore_file(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        history_id: Uuid,
    ) -> Result<FileHistoryEntry, ThemeEngineError> {
        validate_identifier("theme code", theme_code)?;
        validate_file_path(file_path)?;

        let target = self
            .repos
            .file_history
            .find_by_id(history_id)
            .await
            .map_err(internal("find file history entry"))?
            .ok_or_else(|| ThemeEngineError::not_found("file history entry", history_id))?;
        if target.store_id != store_id
            || target.theme_code != theme_code
            || target.file_path != file_path
        {
            return Err(ThemeEngineError::validation(format!(
                "history entry {} does not belong to {}/{}",
                history_id, theme_code, file_path
            )));
        }

        let current = self
            .files
            .read(store_id, theme_code, file_path)
            .await
            .map_err(file_error)?;
        if let Some(current) = current {
            self.record_file_version(
                store_id,
                theme_code,
                file_path,
                &current,
                FileChangeType::PreRestore,
            )
            .await?;
        }

        self.files
            .write(store_id, theme_code, file_path, &target.content)
            .await
            .map_err(file_error)?;
        let entry = self
            .record_file_version(
                store_id,
                theme_code,
                file_path,
                &target.content,
                FileChangeType::Restore,
            )
            .await?;

        tracing::info!(%store_id, theme_code, file_path, restored_version = target.version, "restored theme file");
        self.publish(ThemeEvent::FileRestored(FileRestoredEvent {
            store_id,
            theme_code: theme_code.to_string(),
            file_path: file_path.to_string(),
            restored_version: target.version,
            timestamp: Utc::now(),
        }))
        .await;
        Ok(entry)
    }

    /// Line diff between two recorded versions of a file
    pub async fn diff_file_versions(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        from_version: i32,
        to_version: i32,
    ) -> Result<Vec<LineDiff>, ThemeEngineError> {
        validate_identifier("theme code", theme_code)?;
        validate_file_path(file_path)?;

        let from = self
            .file_version(store_id, theme_code, file_path, from_version)
            .await?;
        let to = self
            .file_version(store_id, theme_code, file_path, to_version)
            .await?;
        Ok(diff_lines(&from.content, &to.content))
    }

    async fn file_version(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        version: i32,
    ) -> Result<FileHistoryEntry, ThemeEngineError> {
        self.repos
            .file_history
            .find_version(store_id, theme_code, file_path, version)
            .await
            .map_err(internal("find file version"))?
            .ok_or_else(|| {
                ThemeEngineError::not_found(
                    "file version",
                    format!("{}/{}@{}", theme_code, file_path, version),
                )
            })
    }

    async fn record_file_version(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        content: &str,
        change_type: FileChangeType,
    ) -> Result<FileHistoryEntry, ThemeEngineError> {
        let entry = FileHistoryEntry {
            id: Uuid::now_v7(),
            store_id,
            theme_code: theme_code.to_string(),
            file_path: file_path.to_string(),
            // Assigned by the repository
            version: 0,
            content: content.to_string(),
            change_type,
            created_at: Utc::now(),
        };
        self.repos
            .file_history
            .append(&entry)
            .await
            .map_err(internal("append file history"))
    }
}
