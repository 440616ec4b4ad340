//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs
//!
//! Every method that touches more than one row family runs in a single transaction in
//! the implementation; callers never see a half-applied write.

use crate::contract::{
    Block, FileHistoryEntry, GlobalSection, SectionInstance, StoreTemplate, Theme, ThemeBackup,
    ThemeCustomization,
};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// A section together with its flat blocks, ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedSection {
    pub section: SectionInstance,
    pub blocks: Vec<Block>,
}

/// A template together with its sections, ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLayout {
    pub template: StoreTemplate,
    pub sections: Vec<MaterializedSection>,
}

/// How [`LayoutRepository::replace_layout`] treats existing templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Delete every template of the store, then insert
    ReplaceStore,
    /// Delete the store's templates of `theme_code`, then insert
    ReplaceTheme,
    /// Insert only templates whose type the store does not have yet
    MergeMissing,
}

/// Multi-table write applied atomically
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReplacement {
    pub store_id: Uuid,
    pub theme_code: String,
    pub mode: LayoutMode,
    pub templates: Vec<TemplateLayout>,
    /// Customization row to upsert in the same transaction; when flagged active, the
    /// store's other customizations are deactivated
    pub customization: Option<ThemeCustomization>,
}

/// What [`LayoutRepository::replace_layout`] did
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutOutcome {
    pub removed_templates: u64,
    pub inserted_types: Vec<String>,
    pub skipped_types: Vec<String>,
}

/// Installed themes
#[async_trait]
pub trait ThemeRepository: Send + Sync {
    /// Register a theme
    async fn create(&self, theme: &Theme) -> Result<Theme>;

    /// Find a theme by code
    async fn find_by_code(&self, code: &str) -> Result<Option<Theme>>;

    /// List all themes ordered by code
    async fn list_all(&self) -> Result<Vec<Theme>>;

    /// Check if a theme code is taken
    async fn exists(&self, code: &str) -> Result<bool>;
}

/// Store templates
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<StoreTemplate>>;

    /// Templates of a type for a store: default first, then oldest first
    async fn find_by_type(&self, store_id: Uuid, template_type: &str) -> Result<Vec<StoreTemplate>>;

    /// All templates of a store, optionally restricted to one theme
    async fn list_for_store(
        &self,
        store_id: Uuid,
        theme_code: Option<&str>,
    ) -> Result<Vec<StoreTemplate>>;

    /// Insert a template with its sections and blocks. When the template is flagged
    /// default, any other default of the same (store, type) is unset in the same
    /// transaction.
    async fn create(&self, layout: &TemplateLayout) -> Result<StoreTemplate>;

    /// Update name, flags and settings (not the default flag)
    async fn update(&self, template: &StoreTemplate) -> Result<StoreTemplate>;

    /// Make a template the only default of its (store, type)
    async fn set_default(&self, template_id: Uuid) -> Result<()>;

    /// Delete a template with its sections and blocks
    async fn delete(&self, template_id: Uuid) -> Result<()>;

    /// Swap all sections and blocks of a template
    async fn replace_sections(
        &self,
        template_id: Uuid,
        sections: &[MaterializedSection],
    ) -> Result<()>;
}

/// Sections and their blocks
#[async_trait]
pub trait SectionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SectionInstance>>;

    /// Sections of a template ordered by position
    async fn list_for_template(&self, template_id: Uuid) -> Result<Vec<SectionInstance>>;

    /// Insert at `section.position` (clamped to the end), shifting later sections down
    async fn insert(&self, section: &MaterializedSection) -> Result<SectionInstance>;

    /// Update settings and enabled flag
    async fn update(&self, section: &SectionInstance) -> Result<SectionInstance>;

    /// Delete a section and its blocks, then renumber the rest 0..n-1
    async fn delete_and_compact(&self, section_id: Uuid) -> Result<()>;

    /// Assign positions following `ordered_ids`, which must list every section once
    async fn reorder(&self, template_id: Uuid, ordered_ids: &[Uuid]) -> Result<()>;

    /// Flat blocks of the given sections, in insertion order
    async fn list_blocks(&self, section_ids: &[Uuid]) -> Result<Vec<Block>>;

    /// Blocks with the given ids, whatever section they belong to
    async fn find_blocks(&self, block_ids: &[Uuid]) -> Result<Vec<Block>>;

    /// Swap all blocks of a section
    async fn replace_blocks(&self, section_id: Uuid, blocks: &[Block]) -> Result<()>;
}

/// Shared sections, kept apart from template-owned sections
#[async_trait]
pub trait GlobalSectionRepository: Send + Sync {
    async fn find(
        &self,
        store_id: Uuid,
        theme_code: &str,
        section_type: &str,
    ) -> Result<Option<GlobalSection>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<GlobalSection>>;

    async fn list(&self, store_id: Uuid, theme_code: &str) -> Result<Vec<GlobalSection>>;

    /// Insert or replace by (store, theme, section type)
    async fn upsert(&self, section: &GlobalSection) -> Result<GlobalSection>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Per-store theme settings
#[async_trait]
pub trait CustomizationRepository: Send + Sync {
    /// The store's active customization (identifies its active theme)
    async fn find_active(&self, store_id: Uuid) -> Result<Option<ThemeCustomization>>;

    async fn find(&self, store_id: Uuid, theme_code: &str) -> Result<Option<ThemeCustomization>>;

    /// Insert or replace by (store, theme); `is_active` is written as given
    async fn upsert(&self, customization: &ThemeCustomization) -> Result<ThemeCustomization>;

    /// Upsert and make it the only active customization of the store
    async fn activate(&self, customization: &ThemeCustomization) -> Result<ThemeCustomization>;
}

/// Writes spanning templates, sections, blocks and customizations
#[async_trait]
pub trait LayoutRepository: Send + Sync {
    async fn replace_layout(&self, replacement: &LayoutReplacement) -> Result<LayoutOutcome>;
}

/// Immutable backups: create and read only
#[async_trait]
pub trait BackupRepository: Send + Sync {
    async fn create(&self, backup: &ThemeBackup) -> Result<ThemeBackup>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ThemeBackup>>;

    /// Newest first
    async fn list(&self, store_id: Uuid, theme_code: &str, limit: u64) -> Result<Vec<ThemeBackup>>;
}

/// Append-only theme file history
#[async_trait]
pub trait FileHistoryRepository: Send + Sync {
    /// Append an entry; the repository assigns the next per-file version
    async fn append(&self, entry: &FileHistoryEntry) -> Result<FileHistoryEntry>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileHistoryEntry>>;

    async fn find_version(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        version: i32,
    ) -> Result<Option<FileHistoryEntry>>;

    /// Newest first
    async fn list_for_file(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        limit: u64,
    ) -> Result<Vec<FileHistoryEntry>>;
}
