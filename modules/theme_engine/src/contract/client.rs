//! Native client trait for inter-module communication
//!
//! Storefront rendering and the admin editor call the theme engine through this trait.
//! NO HTTP - direct function calls for performance.

use super::{
    error::ThemeEngineError,
    model::{
        BackupOptions, CompileOptions, CompiledTemplate, FileHistoryEntry, GlobalSectionSet,
        NestedBlock, PresetOptions, PresetOutcome, Resolution, StoreTemplate, ThemeBackup,
        ThemeCustomization, VerifiedBackup,
    },
};
use async_trait::async_trait;
use uuid::Uuid;

/// Theme engine API for inter-module communication
#[async_trait]
pub trait ThemeEngineApi: Send + Sync {
    // ===== Rendering =====

    /// Resolve which template renders a page type for a store
    async fn resolve_template(
        &self,
        store_id: Uuid,
        template_type: &str,
    ) -> Result<Resolution, ThemeEngineError>;

    /// Render-ready template; `None` when neither the store nor the theme has one
    async fn get_compiled_template(
        &self,
        store_id: Uuid,
        theme_code: &str,
        template_type: &str,
        options: CompileOptions,
    ) -> Result<Option<CompiledTemplate>, ThemeEngineError>;

    /// Header, footer and announcement bar for a store's theme
    async fn get_global_sections(
        &self,
        store_id: Uuid,
        theme_code: &str,
    ) -> Result<GlobalSectionSet, ThemeEngineError>;

    // ===== Editing =====

    /// Persist a theme default template for the store (no-op when it already exists)
    async fn materialize_template(
        &self,
        store_id: Uuid,
        theme_code: &str,
        template_type: &str,
    ) -> Result<StoreTemplate, ThemeEngineError>;

    /// Replace the block tree of a section
    async fn save_section_blocks(
        &self,
        section_id: Uuid,
        blocks: Vec<NestedBlock>,
    ) -> Result<Vec<NestedBlock>, ThemeEngineError>;

    // ===== Theme lifecycle =====

    async fn apply_preset(
        &self,
        store_id: Uuid,
        preset_id: &str,
        options: PresetOptions,
    ) -> Result<PresetOutcome, ThemeEngineError>;

    async fn switch_theme(
        &self,
        store_id: Uuid,
        theme_code: &str,
    ) -> Result<ThemeCustomization, ThemeEngineError>;

    // ===== Backups and file history =====

    /// Capture the store's current settings and layout for a theme
    async fn snapshot_backup(
        &self,
        store_id: Uuid,
        theme_code: &str,
        options: BackupOptions,
    ) -> Result<ThemeBackup, ThemeEngineError>;

    async fn list_backups(
        &self,
        store_id: Uuid,
        theme_code: &str,
        limit: Option<u64>,
    ) -> Result<Vec<ThemeBackup>, ThemeEngineError>;

    async fn get_backup(&self, backup_id: Uuid) -> Result<VerifiedBackup, ThemeEngineError>;

    async fn restore_backup(&self, backup_id: Uuid) -> Result<ThemeBackup, ThemeEngineError>;

    /// Restore a theme file to a recorded version
    async fn restore_file(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        history_id: Uuid,
    ) -> Result<FileHistoryEntry, ThemeEngineError>;
}
