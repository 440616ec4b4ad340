//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::contract::{CompileOptions, NestedBlock, SectionDefinition};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

type Svc = Extension<Arc<Service>>;

// ===== Rendering Handlers =====

/// Resolve the template a store renders for a page type
pub async fn resolve_template(
    Extension(service): Svc,
    Path((store_id, template_type)): Path<(Uuid, String)>,
) -> Result<Json<ResolutionDto>, Problem> {
    let resolution = service
        .resolve_template(store_id, &template_type)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(resolution.into()))
}

#[derive(Debug, Deserialize)]
pub struct CompiledTemplateQuery {
    #[serde(default = "default_true")]
    pub include_global: bool,
}

/// Render-ready template for a store/theme/page type
pub async fn get_compiled_template(
    Extension(service): Svc,
    Path((store_id, theme_code, template_type)): Path<(Uuid, String, String)>,
    Query(query): Query<CompiledTemplateQuery>,
) -> Result<Json<CompiledTemplateDto>, Problem> {
    let options = CompileOptions {
        include_global: query.include_global,
    };
    let compiled = service
        .get_compiled_template(store_id, &theme_code, &template_type, options)
        .await
        .map_err(map_domain_error)?
        .ok_or_else(|| {
            Problem::new(StatusCode::NOT_FOUND, "Template Not Found").with_detail(format!(
                "theme '{}' has no '{}' template for this store",
                theme_code, template_type
            ))
        })?;

    Ok(Json(compiled.into()))
}

// ===== Template Handlers =====

#[derive(Debug, Deserialize)]
pub struct ListTemplatesQuery {
    pub theme_code: Option<String>,
}

pub async fn list_templates(
    Extension(service): Svc,
    Path(store_id): Path<Uuid>,
    Query(query): Query<ListTemplatesQuery>,
) -> Result<Json<TemplatesListResponse>, Problem> {
    let templates = service
        .list_templates(store_id, query.theme_code.as_deref())
        .await
        .map_err(map_domain_error)?;

    let items: Vec<StoreTemplateDto> = templates.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(TemplatesListResponse { items, total }))
}

pub async fn create_template(
    Extension(service): Svc,
    Path(store_id): Path<Uuid>,
    Json(req): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<StoreTemplateDto>), Problem> {
    let template = service
        .create_template(
            store_id,
            &req.theme_code,
            &req.template_type,
            &req.name,
            req.is_default,
        )
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(template.into())))
}

/// Persist a theme default template (no-op when the store already has one)
pub async fn materialize_template(
    Extension(service): Svc,
    Path((store_id, theme_code, template_type)): Path<(Uuid, String, String)>,
) -> Result<Json<StoreTemplateDto>, Problem> {
    let template = service
        .materialize_template(store_id, &theme_code, &template_type)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(template.into()))
}

pub async fn get_template(
    Extension(service): Svc,
    Path(template_id): Path<Uuid>,
) -> Result<Json<StoreTemplateDto>, Problem> {
    let template = service
        .get_template(template_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(template.into()))
}

pub async fn update_template(
    Extension(service): Svc,
    Path(template_id): Path<Uuid>,
    Json(req): Json<UpdateTemplateRequest>,
) -> Result<Json<StoreTemplateDto>, Problem> {
    let template = service
        .update_template(template_id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(template.into()))
}

pub async fn delete_template(
    Extension(service): Svc,
    Path(template_id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service
        .delete_template(template_id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_default_template(
    Extension(service): Svc,
    Path(template_id): Path<Uuid>,
) -> Result<Json<StoreTemplateDto>, Problem> {
    let template = service
        .set_default_template(template_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(template.into()))
}

/// Rebuild a template's sections from the theme default
pub async fn reset_template(
    Extension(service): Svc,
    Path(template_id): Path<Uuid>,
) -> Result<Json<StoreTemplateDto>, Problem> {
    let template = service
        .reset_template(template_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(template.into()))
}

// ===== Section Handlers =====

pub async fn add_section(
    Extension(service): Svc,
    Path(template_id): Path<Uuid>,
    Json(req): Json<AddSectionRequest>,
) -> Result<(StatusCode, Json<SectionDto>), Problem> {
    let section = service
        .add_section(template_id, req.section.into(), req.position)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(section.into())))
}

pub async fn reorder_sections(
    Extension(service): Svc,
    Path(template_id): Path<Uuid>,
    Json(req): Json<ReorderSectionsRequest>,
) -> Result<Json<SectionsListResponse>, Problem> {
    let sections = service
        .reorder_sections(template_id, &req.section_ids)
        .await
        .map_err(map_domain_error)?;

    let items: Vec<SectionDto> = sections.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(SectionsListResponse { items, total }))
}

/// Import sections one by one; per-item failures are reported, not fatal
pub async fn import_sections(
    Extension(service): Svc,
    Path(template_id): Path<Uuid>,
    Json(req): Json<ImportSectionsRequest>,
) -> Result<Json<ImportReportDto>, Problem> {
    let definitions: Vec<SectionDefinition> = req.sections.into_iter().map(Into::into).collect();
    let report = service
        .import_sections(template_id, definitions)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(report.into()))
}

pub async fn update_section(
    Extension(service): Svc,
    Path(section_id): Path<Uuid>,
    Json(req): Json<UpdateSectionRequest>,
) -> Result<Json<SectionDto>, Problem> {
    let section = service
        .update_section(section_id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(section.into()))
}

pub async fn delete_section(
    Extension(service): Svc,
    Path(section_id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service
        .delete_section(section_id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_section_blocks(
    Extension(service): Svc,
    Path(section_id): Path<Uuid>,
) -> Result<Json<Vec<BlockDto>>, Problem> {
    let blocks = service
        .get_section_blocks(section_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(blocks.into_iter().map(Into::into).collect()))
}

/// Replace a section's block tree
pub async fn save_section_blocks(
    Extension(service): Svc,
    Path(section_id): Path<Uuid>,
    Json(blocks): Json<Vec<BlockDto>>,
) -> Result<Json<Vec<BlockDto>>, Problem> {
    let blocks: Vec<NestedBlock> = blocks.into_iter().map(Into::into).collect();
    let saved = service
        .save_section_blocks(section_id, blocks)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(saved.into_iter().map(Into::into).collect()))
}

// ===== Global Section Handlers =====

pub async fn get_global_sections(
    Extension(service): Svc,
    Path((store_id, theme_code)): Path<(Uuid, String)>,
) -> Result<Json<GlobalSectionsDto>, Problem> {
    let set = service
        .get_global_sections(store_id, &theme_code)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(set.into()))
}

pub async fn save_global_section(
    Extension(service): Svc,
    Path((store_id, theme_code, section_type)): Path<(Uuid, String, String)>,
    Json(req): Json<SaveGlobalSectionRequest>,
) -> Result<Json<StoredGlobalSectionDto>, Problem> {
    let section = service
        .save_global_section(store_id, &theme_code, &section_type, req.enabled, req.settings)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(section.into()))
}

pub async fn delete_global_section(
    Extension(service): Svc,
    Path(section_id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service
        .delete_global_section(section_id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Theme Handlers =====

pub async fn list_themes(Extension(service): Svc) -> Result<Json<ThemesListResponse>, Problem> {
    let themes = service.list_themes().await.map_err(map_domain_error)?;

    let items: Vec<ThemeDto> = themes.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(ThemesListResponse { items, total }))
}

pub async fn register_theme(
    Extension(service): Svc,
    Json(req): Json<RegisterThemeRequest>,
) -> Result<(StatusCode, Json<ThemeDto>), Problem> {
    let theme = service
        .register_theme(&req.code, &req.name, &req.version, req.package_code.as_deref())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(theme.into())))
}

pub async fn get_theme(
    Extension(service): Svc,
    Path(code): Path<String>,
) -> Result<Json<ThemeDto>, Problem> {
    let theme = service.get_theme(&code).await.map_err(map_domain_error)?;

    Ok(Json(theme.into()))
}

pub async fn duplicate_theme(
    Extension(service): Svc,
    Path(code): Path<String>,
    Json(req): Json<DuplicateThemeRequest>,
) -> Result<(StatusCode, Json<ThemeDto>), Problem> {
    let theme = service
        .duplicate_theme(&code, &req.code, &req.name)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(theme.into())))
}

pub async fn get_active_customization(
    Extension(service): Svc,
    Path(store_id): Path<Uuid>,
) -> Result<Json<CustomizationDto>, Problem> {
    let customization = service
        .get_active_customization(store_id)
        .await
        .map_err(map_domain_error)?
        .ok_or_else(|| {
            Problem::new(StatusCode::NOT_FOUND, "Active Theme Not Found")
                .with_detail(format!("store '{}' has no active theme", store_id))
        })?;

    Ok(Json(customization.into()))
}

pub async fn switch_theme(
    Extension(service): Svc,
    Path(store_id): Path<Uuid>,
    Json(req): Json<SwitchThemeRequest>,
) -> Result<Json<CustomizationDto>, Problem> {
    let customization = service
        .switch_theme(store_id, &req.theme_code)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(customization.into()))
}

// ===== Preset Handlers =====

pub async fn apply_preset(
    Extension(service): Svc,
    Path((store_id, preset_id)): Path<(Uuid, String)>,
    Json(req): Json<ApplyPresetRequest>,
) -> Result<Json<PresetOutcomeDto>, Problem> {
    let outcome = service
        .apply_preset(store_id, &preset_id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(outcome.into()))
}

// ===== Backup Handlers =====

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
}

pub async fn list_backups(
    Extension(service): Svc,
    Path((store_id, theme_code)): Path<(Uuid, String)>,
    Query(query): Query<ListQuery>,
) -> Result<Json<BackupsListResponse>, Problem> {
    let backups = service
        .list_backups(store_id, &theme_code, query.limit)
        .await
        .map_err(map_domain_error)?;

    let items: Vec<BackupDto> = backups.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(BackupsListResponse { items, total }))
}

/// Snapshot the store's current settings and layout
pub async fn create_backup(
    Extension(service): Svc,
    Path((store_id, theme_code)): Path<(Uuid, String)>,
    Json(req): Json<CreateBackupRequest>,
) -> Result<(StatusCode, Json<BackupDto>), Problem> {
    let backup = service
        .snapshot_backup(store_id, &theme_code, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(backup.into())))
}

pub async fn get_backup(
    Extension(service): Svc,
    Path(backup_id): Path<Uuid>,
) -> Result<Json<VerifiedBackupDto>, Problem> {
    let verified = service
        .get_backup(backup_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(verified.into()))
}

pub async fn restore_backup(
    Extension(service): Svc,
    Path(backup_id): Path<Uuid>,
) -> Result<Json<BackupDto>, Problem> {
    let backup = service
        .restore_backup(backup_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(backup.into()))
}

pub async fn diff_backups(
    Extension(service): Svc,
    Path((from_id, to_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<SettingDiffDto>>, Problem> {
    let diff = service
        .diff_backups(from_id, to_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(diff.into_iter().map(Into::into).collect()))
}

// ===== Theme File Handlers =====

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub path: String,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct FileDiffQuery {
    pub path: String,
    pub from: i32,
    pub to: i32,
}

pub async fn read_file(
    Extension(service): Svc,
    Path((store_id, theme_code)): Path<(Uuid, String)>,
    Query(query): Query<FileQuery>,
) -> Result<Json<FileContentDto>, Problem> {
    let content = service
        .read_file(store_id, &theme_code, &query.path)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(FileContentDto {
        path: query.path,
        content,
    }))
}

pub async fn save_file(
    Extension(service): Svc,
    Path((store_id, theme_code)): Path<(Uuid, String)>,
    Json(req): Json<SaveFileRequest>,
) -> Result<Json<FileHistoryEntryDto>, Problem> {
    let entry = service
        .save_file(store_id, &theme_code, &req.path, &req.content)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(entry.into()))
}

pub async fn list_file_history(
    Extension(service): Svc,
    Path((store_id, theme_code)): Path<(Uuid, String)>,
    Query(query): Query<FileQuery>,
) -> Result<Json<FileHistoryListResponse>, Problem> {
    let entries = service
        .list_file_history(store_id, &theme_code, &query.path, query.limit)
        .await
        .map_err(map_domain_error)?;

    let items: Vec<FileHistoryEntryDto> = entries.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(FileHistoryListResponse { items, total }))
}

pub async fn restore_file(
    Extension(service): Svc,
    Path((store_id, theme_code)): Path<(Uuid, String)>,
    Json(req): Json<RestoreFileRequest>,
) -> Result<Json<FileHistoryEntryDto>, Problem> {
    let entry = service
        .restore_file(store_id, &theme_code, &req.path, req.history_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(entry.into()))
}

pub async fn diff_file_versions(
    Extension(service): Svc,
    Path((store_id, theme_code)): Path<(Uuid, String)>,
    Query(query): Query<FileDiffQuery>,
) -> Result<Json<Vec<LineDiffDto>>, Problem> {
    let diff = service
        .diff_file_versions(store_id, &theme_code, &query.path, query.from, query.to)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(diff.into_iter().map(Into::into).collect()))
}

fn default_true() -> bool {
    true
}
