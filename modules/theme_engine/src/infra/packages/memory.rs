//! In-memory theme packages for tests and embedding

use super::PackageSource;
use crate::domain::package::PackageError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Package files held in memory, keyed by package-relative path
#[derive(Default)]
pub struct InMemoryThemePackages {
    files: RwLock<HashMap<String, String>>,
}

impl InMemoryThemePackages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a raw file
    pub fn insert(&self, path: impl Into<String>, content: impl Into<String>) {
        self.files.write().insert(path.into(), content.into());
    }

    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn with_template(self, package_code: &str, template_type: &str, json: serde_json::Value) -> Self {
        self.with_file(super::format::template_path(package_code, template_type), json.to_string())
    }

    pub fn with_global_section(self, package_code: &str, section_type: &str, json: serde_json::Value) -> Self {
        self.with_file(
            super::format::global_section_path(package_code, section_type),
            json.to_string(),
        )
    }

    pub fn with_settings_schema(self, package_code: &str, json: serde_json::Value) -> Self {
        self.with_file(super::format::settings_schema_path(package_code), json.to_string())
    }

    pub fn with_section_schema(self, package_code: &str, section_type: &str, json: serde_json::Value) -> Self {
        self.with_file(
            super::format::section_schema_path(package_code, section_type),
            json.to_string(),
        )
    }

    pub fn with_preset(self, preset_id: &str, json: serde_json::Value) -> Self {
        self.with_file(super::format::preset_path(preset_id), json.to_string())
    }
}

#[async_trait]
impl PackageSource for InMemoryThemePackages {
    async fn read_raw(&self, path: &str) -> Result<Option<String>, PackageError> {
        Ok(self.files.read().get(path).cloned())
    }
}
