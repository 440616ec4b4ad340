//! Configuration for the theme engine module

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Theme engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root directory of installed theme packages (`<root>/<package>/...`, `<root>/presets`)
    #[serde(default = "default_packages_root")]
    pub packages_root: PathBuf,

    /// Root directory of per-store editable theme files
    #[serde(default = "default_files_root")]
    pub files_root: PathBuf,

    /// Backups returned when the caller does not pass a limit
    #[serde(default = "default_backup_list_limit")]
    pub backup_list_limit: u64,

    /// Upper bound on any backup listing
    #[serde(default = "default_backup_list_max")]
    pub backup_list_max: u64,

    /// History entries returned per file listing
    #[serde(default = "default_file_history_limit")]
    pub file_history_limit: u64,

    /// Validate section settings against the JSON Schema shipped by the theme
    #[serde(default = "default_true")]
    pub enable_schema_validation: bool,

    /// Maximum settings payload size in bytes
    #[serde(default = "default_max_settings_size")]
    pub max_settings_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            packages_root: default_packages_root(),
            files_root: default_files_root(),
            backup_list_limit: default_backup_list_limit(),
            backup_list_max: default_backup_list_max(),
            file_history_limit: default_file_history_limit(),
            enable_schema_validation: true,
            max_settings_size: default_max_settings_size(),
        }
    }
}

impl Config {
    /// Defaults, overridden by an optional YAML file, overridden by `THEME_ENGINE_*`
    /// environment variables
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config = figment.merge(Env::prefixed("THEME_ENGINE_")).extract()?;
        Ok(config)
    }

    /// Clamp a requested listing size to the configured bounds
    pub fn backup_limit(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.backup_list_limit)
            .clamp(1, self.backup_list_max.max(1))
    }
}

fn default_packages_root() -> PathBuf {
    PathBuf::from("themes")
}

fn default_files_root() -> PathBuf {
    PathBuf::from("data/theme-files")
}

fn default_backup_list_limit() -> u64 {
    20
}

fn default_backup_list_max() -> u64 {
    100
}

fn default_file_history_limit() -> u64 {
    50
}

fn default_true() -> bool {
    true
}

fn default_max_settings_size() -> usize {
    256 * 1024 // 256KB
}
