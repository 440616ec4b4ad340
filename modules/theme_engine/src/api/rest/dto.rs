//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Template DTOs =====

/// Store template response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoreTemplateDto {
    /// Template ID; ephemeral for templates resolved from the theme package
    pub id: Uuid,
    pub store_id: Uuid,
    #[schema(example = "dawn")]
    pub theme_code: String,
    /// Page type
    #[schema(example = "homepage")]
    pub template_type: String,
    pub name: String,
    pub is_default: bool,
    pub enabled: bool,
    pub settings: serde_json::Value,
    pub seo_settings: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Template resolution response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResolutionDto {
    pub template: StoreTemplateDto,
    /// entity, store-default or theme-default
    #[schema(example = "entity")]
    pub source: String,
    /// Whether the template exists as a database row
    pub persisted: bool,
}

/// Create template request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTemplateRequest {
    pub theme_code: String,
    pub template_type: String,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Partial template update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub enabled: Option<bool>,
    pub settings: Option<serde_json::Value>,
    pub seo_settings: Option<serde_json::Value>,
}

/// List of store templates
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TemplatesListResponse {
    pub items: Vec<StoreTemplateDto>,
    pub total: usize,
}

// ===== Section and Block DTOs =====

/// Section instance response DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SectionDto {
    pub id: Uuid,
    pub template_id: Uuid,
    #[schema(example = "hero")]
    pub section_type: String,
    pub position: i32,
    pub enabled: bool,
    pub settings: serde_json::Value,
}

/// Block tree node
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlockDto {
    /// Omitted for new blocks
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(rename = "type")]
    #[schema(example = "slide")]
    pub block_type: String,
    #[serde(default = "empty_object")]
    pub settings: serde_json::Value,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    #[schema(no_recursion)]
    pub children: Vec<BlockDto>,
}

/// Section literal used when adding or importing sections
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SectionDefinitionDto {
    #[serde(rename = "type")]
    pub section_type: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "empty_object")]
    pub settings: serde_json::Value,
    #[serde(default)]
    pub blocks: Vec<BlockDto>,
}

/// Add section request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddSectionRequest {
    pub section: SectionDefinitionDto,
    /// Appended when absent
    pub position: Option<i32>,
}

/// Partial section update
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSectionRequest {
    pub enabled: Option<bool>,
    pub settings: Option<serde_json::Value>,
}

/// New section order; must list every section of the template exactly once
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReorderSectionsRequest {
    pub section_ids: Vec<Uuid>,
}

/// Batch import request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImportSectionsRequest {
    pub sections: Vec<SectionDefinitionDto>,
}

/// Batch import response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImportReportDto {
    pub imported: Vec<Uuid>,
    pub failed: Vec<ImportFailureDto>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImportFailureDto {
    /// Index in the request
    pub index: usize,
    pub error: String,
}

/// List of sections
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SectionsListResponse {
    pub items: Vec<SectionDto>,
    pub total: usize,
}

// ===== Compiled Template DTOs =====

/// Render-ready template
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompiledTemplateDto {
    pub template_type: String,
    pub template_id: Option<Uuid>,
    pub source: String,
    pub sections: Vec<CompiledSectionDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_sections: Option<GlobalSectionsDto>,
    pub warnings: Vec<WarningDto>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompiledSectionDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub section_type: String,
    pub settings: serde_json::Value,
    pub enabled: bool,
    pub position: i32,
    pub blocks: Vec<BlockDto>,
}

/// Non-fatal data problem
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WarningDto {
    pub subject: String,
    pub message: String,
}

// ===== Global Section DTOs =====

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GlobalSectionDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    #[schema(example = "header")]
    pub section_type: String,
    pub enabled: bool,
    pub settings: serde_json::Value,
    pub blocks: Vec<BlockDto>,
    /// stored or theme-default
    pub source: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GlobalSectionsDto {
    pub announcement_bar: Option<GlobalSectionDto>,
    pub header: Option<GlobalSectionDto>,
    pub footer: Option<GlobalSectionDto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<WarningDto>,
}

/// Stored global section row
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredGlobalSectionDto {
    pub id: Uuid,
    pub store_id: Uuid,
    pub theme_code: String,
    #[serde(rename = "type")]
    pub section_type: String,
    pub enabled: bool,
    pub settings: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Create or replace a stored global section
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaveGlobalSectionRequest {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "empty_object")]
    pub settings: serde_json::Value,
}

// ===== Theme DTOs =====

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ThemeDto {
    pub code: String,
    pub name: String,
    pub version: String,
    pub package_code: String,
    /// Declared setting keys
    pub settings: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterThemeRequest {
    pub code: String,
    pub name: String,
    pub version: String,
    /// Defaults to `code`
    pub package_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DuplicateThemeRequest {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ThemesListResponse {
    pub items: Vec<ThemeDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SwitchThemeRequest {
    pub theme_code: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomizationDto {
    pub id: Uuid,
    pub store_id: Uuid,
    pub theme_code: String,
    pub settings: serde_json::Value,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

// ===== Preset DTOs =====

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ApplyPresetRequest {
    /// Keep existing templates and only add missing template types
    #[serde(default)]
    pub preserve_existing: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PresetOutcomeDto {
    pub preset_id: String,
    pub theme_code: String,
    pub created_templates: Vec<String>,
    pub skipped_templates: Vec<String>,
    pub removed_templates: u64,
}

// ===== Backup DTOs =====

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BackupDto {
    pub id: Uuid,
    pub store_id: Uuid,
    pub theme_code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub settings: serde_json::Value,
    pub customizations: serde_json::Value,
    pub checksum: String,
    pub created_at: DateTime<Utc>,
}

/// Backup with its checksum verdict
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerifiedBackupDto {
    pub backup: BackupDto,
    pub intact: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<WarningDto>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBackupRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BackupsListResponse {
    pub items: Vec<BackupDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SettingDiffDto {
    pub key: String,
    /// added, removed or changed
    pub status: String,
    pub old_value: Option<serde_json::Value>,
    pub new_value: Option<serde_json::Value>,
}

// ===== File DTOs =====

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileContentDto {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaveFileRequest {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RestoreFileRequest {
    pub path: String,
    pub history_id: Uuid,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileHistoryEntryDto {
    pub id: Uuid,
    pub path: String,
    pub version: i32,
    pub content: String,
    /// create, update, pre_restore or restore
    pub change_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileHistoryListResponse {
    pub items: Vec<FileHistoryEntryDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LineDiffDto {
    /// added, removed or unchanged
    pub status: String,
    pub text: String,
}

fn default_true() -> bool {
    true
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

// Note: Conversion implementations live in mapper.rs
