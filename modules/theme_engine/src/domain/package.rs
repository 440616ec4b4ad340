//! Theme package reader abstraction
//!
//! A theme package ships JSON default templates, global section defaults, the settings
//! schema, per-section JSON Schemas and presets. Implementations live in
//! `infra/packages`.

use crate::contract::{DefaultTemplate, Preset, SectionDefinition, SettingsSchema};
use async_trait::async_trait;

/// Error type for package reads
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    /// The file exists but is not valid for its format; callers treat it as absent
    #[error("Malformed package file {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Package storage unavailable: {0}")]
    Unavailable(String),
}

/// Read access to installed theme packages. `Ok(None)` means "not shipped".
#[async_trait]
pub trait ThemePackageReader: Send + Sync {
    /// JSON default template for a page type
    async fn default_template(
        &self,
        package_code: &str,
        template_type: &str,
    ) -> Result<Option<DefaultTemplate>, PackageError>;

    /// Default for a global section type (header, footer, announcement-bar)
    async fn global_section(
        &self,
        package_code: &str,
        section_type: &str,
    ) -> Result<Option<SectionDefinition>, PackageError>;

    /// Settings schema declared by the theme
    async fn settings_schema(&self, package_code: &str)
        -> Result<Option<SettingsSchema>, PackageError>;

    /// JSON Schema for a section type's settings
    async fn section_schema(
        &self,
        package_code: &str,
        section_type: &str,
    ) -> Result<Option<serde_json::Value>, PackageError>;

    /// Bundled preset
    async fn preset(&self, preset_id: &str) -> Result<Option<Preset>, PackageError>;
}
