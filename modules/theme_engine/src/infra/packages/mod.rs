//! Theme package readers
//!
//! Both readers fetch raw JSON by package-relative path and share the parsing in
//! [`format`].

pub mod format;
pub mod fs;
pub mod memory;

pub use fs::FsThemePackageReader;
pub use memory::InMemoryThemePackages;

use crate::contract::{DefaultTemplate, Preset, SectionDefinition, SettingsSchema};
use crate::domain::package::{PackageError, ThemePackageReader};
use async_trait::async_trait;

/// Raw file access underneath a package reader
#[async_trait]
pub trait PackageSource: Send + Sync {
    /// Content of a package-relative path, `None` when absent
    async fn read_raw(&self, path: &str) -> Result<Option<String>, PackageError>;
}

#[async_trait]
impl<T: PackageSource> ThemePackageReader for T {
    async fn default_template(
        &self,
        package_code: &str,
        template_type: &str,
    ) -> Result<Option<DefaultTemplate>, PackageError> {
        if !format::is_safe_component(package_code) || !format::is_safe_component(template_type) {
            return Ok(None);
        }
        let path = format::template_path(package_code, template_type);
        self.read_raw(&path)
            .await?
            .map(|raw| format::parse_default_template(&path, template_type, &raw))
            .transpose()
    }

    async fn global_section(
        &self,
        package_code: &str,
        section_type: &str,
    ) -> Result<Option<SectionDefinition>, PackageError> {
        if !format::is_safe_component(package_code) || !format::is_safe_component(section_type) {
            return Ok(None);
        }
        let path = format::global_section_path(package_code, section_type);
        self.read_raw(&path)
            .await?
            .map(|raw| format::parse_global_section(&path, &raw))
            .transpose()
    }

    async fn settings_schema(
        &self,
        package_code: &str,
    ) -> Result<Option<SettingsSchema>, PackageError> {
        if !format::is_safe_component(package_code) {
            return Ok(None);
        }
        let path = format::settings_schema_path(package_code);
        self.read_raw(&path)
            .await?
            .map(|raw| format::parse_settings_schema(&path, &raw))
            .transpose()
    }

    async fn section_schema(
        &self,
        package_code: &str,
        section_type: &str,
    ) -> Result<Option<serde_json::Value>, PackageError> {
        if !format::is_safe_component(package_code) || !format::is_safe_component(section_type) {
            return Ok(None);
        }
        let path = format::section_schema_path(package_code, section_type);
        self.read_raw(&path)
            .await?
            .map(|raw| format::parse_section_schema(&path, &raw))
            .transpose()
    }

    async fn preset(&self, preset_id: &str) -> Result<Option<Preset>, PackageError> {
        if !format::is_safe_component(preset_id) {
            return Ok(None);
        }
        let path = format::preset_path(preset_id);
        self.read_raw(&path)
            .await?
            .map(|raw| format::parse_preset(&path, preset_id, &raw))
            .transpose()
    }
}
