//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity::{
    file_history, global_section, section_block, section_instance, store_template, theme,
    theme_backup, theme_customization,
};
use crate::contract::{
    Block, FileChangeType, FileHistoryEntry, GlobalSection, SectionInstance, SettingDefinition,
    SettingKind, SettingsSchema, StoreTemplate, Theme, ThemeBackup, ThemeCustomization,
};
use sea_orm::ActiveValue::Set;

// ===== Theme Conversions =====

impl TryFrom<theme::Model> for Theme {
    type Error = anyhow::Error;

    fn try_from(entity: theme::Model) -> Result<Self, Self::Error> {
        let schema: SettingsSchemaJson = serde_json::from_value(entity.settings_schema)?;

        Ok(Self {
            code: entity.code,
            name: entity.name,
            version: entity.version,
            package_code: entity.package_code,
            settings_schema: schema.into(),
            created_at: entity.created_at,
        })
    }
}

impl TryFrom<&Theme> for theme::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &Theme) -> Result<Self, Self::Error> {
        let schema = SettingsSchemaJson::from(&model.settings_schema);

        Ok(Self {
            code: Set(model.code.clone()),
            name: Set(model.name.clone()),
            version: Set(model.version.clone()),
            package_code: Set(model.package_code.clone()),
            settings_schema: Set(serde_json::to_value(schema)?),
            created_at: Set(model.created_at),
        })
    }
}

// ===== Template Conversions =====

impl From<store_template::Model> for StoreTemplate {
    fn from(entity: store_template::Model) -> Self {
        Self {
            id: entity.id,
            store_id: entity.store_id,
            theme_code: entity.theme_code,
            template_type: entity.template_type,
            name: entity.name,
            is_default: entity.is_default,
            enabled: entity.enabled,
            settings: entity.settings,
            seo_settings: entity.seo_settings,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&StoreTemplate> for store_template::ActiveModel {
    fn from(model: &StoreTemplate) -> Self {
        Self {
            id: Set(model.id),
            store_id: Set(model.store_id),
            theme_code: Set(model.theme_code.clone()),
            template_type: Set(model.template_type.clone()),
            name: Set(model.name.clone()),
            is_default: Set(model.is_default),
            enabled: Set(model.enabled),
            settings: Set(model.settings.clone()),
            seo_settings: Set(model.seo_settings.clone()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== Section and Block Conversions =====

impl From<section_instance::Model> for SectionInstance {
    fn from(entity: section_instance::Model) -> Self {
        Self {
            id: entity.id,
            template_id: entity.template_id,
            section_type: entity.section_type,
            position: entity.position,
            enabled: entity.enabled,
            settings: entity.settings,
        }
    }
}

impl From<&SectionInstance> for section_instance::ActiveModel {
    fn from(model: &SectionInstance) -> Self {
        Self {
            id: Set(model.id),
            template_id: Set(model.template_id),
            section_type: Set(model.section_type.clone()),
            position: Set(model.position),
            enabled: Set(model.enabled),
            settings: Set(model.settings.clone()),
        }
    }
}

impl From<section_block::Model> for Block {
    fn from(entity: section_block::Model) -> Self {
        Self {
            id: entity.id,
            section_id: entity.section_id,
            parent_id: entity.parent_id,
            block_type: entity.block_type,
            position: entity.position,
            enabled: entity.enabled,
            settings: entity.settings,
        }
    }
}

impl From<&Block> for section_block::ActiveModel {
    fn from(model: &Block) -> Self {
        Self {
            id: Set(model.id),
            section_id: Set(model.section_id),
            parent_id: Set(model.parent_id),
            block_type: Set(model.block_type.clone()),
            position: Set(model.position),
            enabled: Set(model.enabled),
            settings: Set(model.settings.clone()),
        }
    }
}

// ===== Global Section Conversions =====

impl From<global_section::Model> for GlobalSection {
    fn from(entity: global_section::Model) -> Self {
        Self {
            id: entity.id,
            store_id: entity.store_id,
            theme_code: entity.theme_code,
            section_type: entity.section_type,
            enabled: entity.enabled,
            settings: entity.settings,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&GlobalSection> for global_section::ActiveModel {
    fn from(model: &GlobalSection) -> Self {
        Self {
            id: Set(model.id),
            store_id: Set(model.store_id),
            theme_code: Set(model.theme_code.clone()),
            section_type: Set(model.section_type.clone()),
            enabled: Set(model.enabled),
            settings: Set(model.settings.clone()),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== Customization Conversions =====

impl From<theme_customization::Model> for ThemeCustomization {
    fn from(entity: theme_customization::Model) -> Self {
        Self {
            id: entity.id,
            store_id: entity.store_id,
            theme_code: entity.theme_code,
            settings: entity.settings,
            is_active: entity.is_active,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&ThemeCustomization> for theme_customization::ActiveModel {
    fn from(model: &ThemeCustomization) -> Self {
        Self {
            id: Set(model.id),
            store_id: Set(model.store_id),
            theme_code: Set(model.theme_code.clone()),
            settings: Set(model.settings.clone()),
            is_active: Set(model.is_active),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== Backup Conversions =====

impl From<theme_backup::Model> for ThemeBackup {
    fn from(entity: theme_backup::Model) -> Self {
        Self {
            id: entity.id,
            store_id: entity.store_id,
            theme_code: entity.theme_code,
            name: entity.name,
            description: entity.description,
            settings: entity.settings,
            customizations: entity.customizations,
            checksum: entity.checksum,
            created_at: entity.created_at,
        }
    }
}

impl From<&ThemeBackup> for theme_backup::ActiveModel {
    fn from(model: &ThemeBackup) -> Self {
        Self {
            id: Set(model.id),
            store_id: Set(model.store_id),
            theme_code: Set(model.theme_code.clone()),
            name: Set(model.name.clone()),
            description: Set(model.description.clone()),
            settings: Set(model.settings.clone()),
            customizations: Set(model.customizations.clone()),
            checksum: Set(model.checksum.clone()),
            created_at: Set(model.created_at),
        }
    }
}

// ===== File History Conversions =====

impl TryFrom<file_history::Model> for FileHistoryEntry {
    type Error = anyhow::Error;

    fn try_from(entity: file_history::Model) -> Result<Self, Self::Error> {
        let change_type = FileChangeType::parse(&entity.change_type).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown change type '{}' in file history entry {}",
                entity.change_type,
                entity.id
            )
        })?;

        Ok(Self {
            id: entity.id,
            store_id: entity.store_id,
            theme_code: entity.theme_code,
            file_path: entity.file_path,
            version: entity.version,
            content: entity.content,
            change_type,
            created_at: entity.created_at,
        })
    }
}

impl From<&FileHistoryEntry> for file_history::ActiveModel {
    fn from(model: &FileHistoryEntry) -> Self {
        Self {
            id: Set(model.id),
            store_id: Set(model.store_id),
            theme_code: Set(model.theme_code.clone()),
            file_path: Set(model.file_path.clone()),
            version: Set(model.version),
            content: Set(model.content.clone()),
            change_type: Set(model.change_type.as_str().to_string()),
            created_at: Set(model.created_at),
        }
    }
}

// ===== JSON Serialization Helpers =====

/// JSON representation of a settings schema for database storage
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SettingsSchemaJson {
    #[serde(default)]
    settings: Vec<SettingJson>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct SettingJson {
    key: String,
    kind: String,
    #[serde(default)]
    default: serde_json::Value,
}

impl From<SettingsSchemaJson> for SettingsSchema {
    fn from(json: SettingsSchemaJson) -> Self {
        Self {
            settings: json
                .settings
                .into_iter()
                .map(|setting| SettingDefinition {
                    kind: SettingKind::parse(&setting.kind),
                    key: setting.key,
                    default: setting.default,
                })
                .collect(),
        }
    }
}

impl From<&SettingsSchema> for SettingsSchemaJson {
    fn from(schema: &SettingsSchema) -> Self {
        Self {
            settings: schema
                .settings
                .iter()
                .map(|setting| SettingJson {
                    key: setting.key.clone(),
                    kind: setting.kind.as_str().to_string(),
                    default: setting.default.clone(),
                })
                .collect(),
        }
    }
}
