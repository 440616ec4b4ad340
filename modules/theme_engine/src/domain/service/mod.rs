//! Domain service - business logic orchestration
//!
//! One `Service` owns every theme engine operation; the impl blocks are split by
//! concern across the submodules.

mod backups;
mod files;
mod globals;
mod loader;
mod presets;
mod resolver;
mod templates;
mod themes;

use super::events::{EventPublisher, ThemeEvent};
use super::files::{FileStoreError, ThemeFileStore};
use super::package::{PackageError, ThemePackageReader};
use super::repository::{
    BackupRepository, CustomizationRepository, FileHistoryRepository, GlobalSectionRepository,
    LayoutRepository, MaterializedSection, SectionRepository, TemplateRepository,
    ThemeRepository,
};
use super::validation::{validate_identifier, validate_settings};
use super::block_tree;
use crate::config::Config;
use crate::contract::{
    BlockDefinition, IntegrityWarning, NestedBlock, SectionDefinition, SectionInstance,
    ThemeEngineError,
};
use std::sync::Arc;
use uuid::Uuid;

/// Repository handles the service works against
#[derive(Clone)]
pub struct Repositories {
    pub themes: Arc<dyn ThemeRepository>,
    pub templates: Arc<dyn TemplateRepository>,
    pub sections: Arc<dyn SectionRepository>,
    pub globals: Arc<dyn GlobalSectionRepository>,
    pub customizations: Arc<dyn CustomizationRepository>,
    pub layouts: Arc<dyn LayoutRepository>,
    pub backups: Arc<dyn BackupRepository>,
    pub file_history: Arc<dyn FileHistoryRepository>,
}

/// Domain service for theme composition
pub struct Service {
    repos: Repositories,
    packages: Arc<dyn ThemePackageReader>,
    files: Arc<dyn ThemeFileStore>,
    event_publisher: Arc<dyn EventPublisher>,
    config: Config,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        repos: Repositories,
        packages: Arc<dyn ThemePackageReader>,
        files: Arc<dyn ThemeFileStore>,
        event_publisher: Arc<dyn EventPublisher>,
        config: Config,
    ) -> Self {
        Self {
            repos,
            packages,
            files,
            event_publisher,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ===== Shared helpers =====

    /// Publish an event; failures are logged and swallowed
    async fn publish(&self, event: ThemeEvent) {
        let store_id = event.store_id();
        if let Err(e) = self.event_publisher.publish(event).await {
            tracing::warn!(%store_id, error = %e, "failed to publish theme event");
        }
    }

    /// Package directory backing a theme. Duplicated themes keep reading the package
    /// they were copied from; unregistered codes are taken as package codes.
    async fn package_code(&self, theme_code: &str) -> Result<String, ThemeEngineError> {
        let theme = self
            .repos
            .themes
            .find_by_code(theme_code)
            .await
            .map_err(internal("find theme"))?;
        Ok(theme
            .map(|theme| theme.package_code)
            .unwrap_or_else(|| theme_code.to_string()))
    }

    /// Validate section settings against the JSON Schema shipped for the section type
    async fn check_section_schema(
        &self,
        package_code: &str,
        section_type: &str,
        settings: &serde_json::Value,
    ) -> Result<(), ThemeEngineError> {
        if !self.config.enable_schema_validation {
            return Ok(());
        }
        let mut warnings = Vec::new();
        let schema = absorb(
            self.packages.section_schema(package_code, section_type).await,
            &mut warnings,
        )?;
        match schema {
            Some(schema) => super::validation::validate_against_schema(settings, &schema),
            None => Ok(()),
        }
    }

    /// Structural checks on a section literal and all its blocks
    fn check_section_definition(&self, def: &SectionDefinition) -> Result<(), ThemeEngineError> {
        validate_identifier("section type", &def.section_type)?;
        validate_settings(&def.settings, self.config.max_settings_size)?;
        self.check_block_definitions(&def.blocks)
    }

    fn check_block_definitions(&self, blocks: &[BlockDefinition]) -> Result<(), ThemeEngineError> {
        for block in blocks {
            validate_identifier("block type", &block.block_type)?;
            validate_settings(&block.settings, self.config.max_settings_size)?;
            self.check_block_definitions(&block.children)?;
        }
        Ok(())
    }

    fn check_nested_blocks(&self, blocks: &[NestedBlock]) -> Result<(), ThemeEngineError> {
        for block in blocks {
            validate_identifier("block type", &block.block_type)?;
            validate_settings(&block.settings, self.config.max_settings_size)?;
            self.check_nested_blocks(&block.children)?;
        }
        Ok(())
    }
}

/// Map a repository failure to `Internal`, logging the cause
fn internal(operation: &'static str) -> impl FnOnce(anyhow::Error) -> ThemeEngineError {
    move |e| {
        tracing::error!(operation, error = ?e, "theme engine storage failure");
        ThemeEngineError::Internal
    }
}

/// Map a theme file storage failure
fn file_error(e: FileStoreError) -> ThemeEngineError {
    match e {
        FileStoreError::InvalidPath(path) => {
            ThemeEngineError::validation(format!("invalid file path '{}'", path))
        }
        FileStoreError::Io(e) => {
            tracing::error!(error = %e, "theme file storage failure");
            ThemeEngineError::Internal
        }
    }
}

/// Fold a package read into the read path: malformed files are reported as warnings and
/// treated as absent so a store stays renderable.
fn absorb<T>(
    result: Result<Option<T>, PackageError>,
    warnings: &mut Vec<IntegrityWarning>,
) -> Result<Option<T>, ThemeEngineError> {
    match result {
        Ok(value) => Ok(value),
        Err(PackageError::Malformed { path, reason }) => {
            tracing::warn!(%path, %reason, "ignoring malformed theme package file");
            warnings.push(IntegrityWarning {
                subject: path,
                message: reason,
            });
            Ok(None)
        }
        Err(e @ PackageError::Unavailable(_)) => {
            tracing::error!(error = %e, "theme package read failed");
            Err(ThemeEngineError::Internal)
        }
    }
}

/// Give section literals fresh ids, contiguous positions and flat blocks
fn materialize_sections(
    template_id: Uuid,
    definitions: &[SectionDefinition],
) -> Vec<MaterializedSection> {
    definitions
        .iter()
        .enumerate()
        .map(|(index, def)| materialize_section(template_id, def, index as i32))
        .collect()
}

fn materialize_section(
    template_id: Uuid,
    def: &SectionDefinition,
    position: i32,
) -> MaterializedSection {
    let section = SectionInstance {
        id: Uuid::new_v4(),
        template_id,
        section_type: def.section_type.clone(),
        position,
        enabled: def.enabled,
        settings: def.settings.clone(),
    };
    let blocks = block_tree::flatten(&block_tree::instantiate(&def.blocks), section.id);
    MaterializedSection { section, blocks }
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}
