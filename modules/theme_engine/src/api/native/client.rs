//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    BackupOptions, CompileOptions, CompiledTemplate, FileHistoryEntry, GlobalSectionSet,
    NestedBlock, PresetOptions, PresetOutcome, Resolution, StoreTemplate, ThemeBackup,
    ThemeCustomization, ThemeEngineApi, ThemeEngineError, VerifiedBackup,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Native client implementation that directly calls the domain service
///
/// Used by in-process callers (storefront renderer, admin editor) without HTTP overhead.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ThemeEngineApi for NativeClient {
    async fn resolve_template(
        &self,
        store_id: Uuid,
        template_type: &str,
    ) -> Result<Resolution, ThemeEngineError> {
        self.service.resolve_template(store_id, template_type).await
    }

    async fn get_compiled_template(
        &self,
        store_id: Uuid,
        theme_code: &str,
        template_type: &str,
        options: CompileOptions,
    ) -> Result<Option<CompiledTemplate>, ThemeEngineError> {
        self.service
            .get_compiled_template(store_id, theme_code, template_type, options)
            .await
    }

    async fn get_global_sections(
        &self,
        store_id: Uuid,
        theme_code: &str,
    ) -> Result<GlobalSectionSet, ThemeEngineError> {
        self.service.get_global_sections(store_id, theme_code).await
    }

    async fn materialize_template(
        &self,
        store_id: Uuid,
        theme_code: &str,
        template_type: &str,
    ) -> Result<StoreTemplate, ThemeEngineError> {
        self.service
            .materialize_template(store_id, theme_code, template_type)
            .await
    }

    async fn save_section_blocks(
        &self,
        section_id: Uuid,
        blocks: Vec<NestedBlock>,
    ) -> Result<Vec<NestedBlock>, ThemeEngineError> {
        self.service.save_section_blocks(section_id, blocks).await
    }

    async fn apply_preset(
        &self,
        store_id: Uuid,
        preset_id: &str,
        options: PresetOptions,
    ) -> Result<PresetOutcome, ThemeEngineError> {
        self.service.apply_preset(store_id, preset_id, options).await
    }

    async fn switch_theme(
        &self,
        store_id: Uuid,
        theme_code: &str,
    ) -> Result<ThemeCustomization, ThemeEngineError> {
        self.service.switch_theme(store_id, theme_code).await
    }

    async fn snapshot_backup(
        &self,
        store_id: Uuid,
        theme_code: &str,
        options: BackupOptions,
    ) -> Result<ThemeBackup, ThemeEngineError> {
        self.service
            .snapshot_backup(store_id, theme_code, options)
            .await
    }

    async fn list_backups(
        &self,
        store_id: Uuid,
        theme_code: &str,
        limit: Option<u64>,
    ) -> Result<Vec<ThemeBackup>, ThemeEngineError> {
        self.service.list_backups(store_id, theme_code, limit).await
    }

    async fn get_backup(&self, backup_id: Uuid) -> Result<VerifiedBackup, ThemeEngineError> {
        self.service.get_backup(backup_id).await
    }

    async fn restore_backup(&self, backup_id: Uuid) -> Result<ThemeBackup, ThemeEngineError> {
        self.service.restore_backup(backup_id).await
    }

    async fn restore_file(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        history_id: Uuid,
    ) -> Result<FileHistoryEntry, ThemeEngineError> {
        self.service
            .restore_file(store_id, theme_code, file_path, history_id)
            .await
    }
}
