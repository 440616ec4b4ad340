//! Backups: immutable, checksummed snapshots of a store's theme state

use super::{internal, materialize_sections, Service};
use crate::contract::{
    BackupIntegrity, BackupOptions, IntegrityWarning, SectionDefinition, StoreTemplate,
    ThemeBackup, ThemeCustomization, ThemeEngineError, VerifiedBackup,
};
use crate::domain::block_tree;
use crate::domain::diff::{diff_settings, SettingDiff};
use crate::domain::events::{BackupEvent, ThemeEvent};
use crate::domain::repository::{LayoutMode, LayoutReplacement, TemplateLayout};
use crate::domain::settings_migration::flatten_settings;
use crate::domain::snapshot::{
    backup_checksum, LayoutSnapshot, SectionSnapshot, TemplateSnapshot, SNAPSHOT_VERSION,
};
use crate::domain::validation::{validate_identifier, validate_name, validate_settings};
use chrono::Utc;
use uuid::Uuid;

impl Service {
    /// Store a backup from caller-supplied payloads
    pub async fn create_backup(
        &self,
        store_id: Uuid,
        theme_code: &str,
        options: BackupOptions,
        settings: serde_json::Value,
        customizations: serde_json::Value,
    ) -> Result<ThemeBackup, ThemeEngineError> {
        validate_identifier("theme code", theme_code)?;
        validate_name("backup name", &options.name)?;
        validate_settings(&settings, self.config.max_settings_size)?;
        if !customizations.is_object() {
            return Err(ThemeEngineError::validation(
                "backup customizations must be a JSON object",
            ));
        }

        let backup = ThemeBackup {
            id: Uuid::now_v7(),
            store_id,
            theme_code: theme_code.to_string(),
            name: options.name,
            description: options.description,
            checksum: backup_checksum(&settings, &customizations),
            settings,
            customizations,
            created_at: Utc::now(),
        };
        let created = self
            .repos
            .backups
            .create(&backup)
            .await
            .map_err(internal("create backup"))?;

        tracing::info!(%store_id, theme_code, backup_id = %created.id, "created theme backup");
        Ok(created)
    }

    /// Back up the live state: the theme customization plus every template of the theme
    /// with its sections and blocks
    pub async fn snapshot_backup(
        &self,
        store_id: Uuid,
        theme_code: &str,
        options: BackupOptions,
    ) -> Result<ThemeBackup, ThemeEngineError> {
        validate_identifier("theme code", theme_code)?;

        let settings = self
            .repos
            .customizations
            .find(store_id, theme_code)
            .await
            .map_err(internal("find customization"))?
            .map(|c| c.settings)
            .unwrap_or_else(super::empty_object);

        let templates = self
            .repos
            .templates
            .list_for_store(store_id, Some(theme_code))
            .await
            .map_err(internal("list templates"))?;
        let mut snapshot = LayoutSnapshot {
            version: SNAPSHOT_VERSION,
            templates: Vec::with_capacity(templates.len()),
        };
        for template in templates {
            let sections = self.load_sections(template.id).await?;
            snapshot.templates.push(TemplateSnapshot {
                template_type: template.template_type,
                name: template.name,
                is_default: template.is_default,
                enabled: template.enabled,
                settings: template.settings,
                seo_settings: template.seo_settings,
                sections: sections
                    .iter()
                    .map(|(section, blocks)| {
                        SectionSnapshot::from(&SectionDefinition {
                            section_type: section.section_type.clone(),
                            enabled: section.enabled,
                            settings: section.settings.clone(),
                            blocks: block_tree::to_definitions(blocks),
                        })
                    })
                    .collect(),
            });
        }

        let customizations = serde_json::to_value(&snapshot).map_err(|e| {
            tracing::error!(error = %e, "failed to serialize layout snapshot");
            ThemeEngineError::Internal
        })?;
        self.create_backup(store_id, theme_code, options, settings, customizations)
            .await
    }

    /// Backups of a store's theme, newest first
    pub async fn list_backups(
        &self,
        store_id: Uuid,
        theme_code: &str,
        limit: Option<u64>,
    ) -> Result<Vec<ThemeBackup>, ThemeEngineError> {
        validate_identifier("theme code", theme_code)?;
        self.repos
            .backups
            .list(store_id, theme_code, self.config.backup_limit(limit))
            .await
            .map_err(internal("list backups"))
    }

    /// Read a backup and verify its checksum. A mismatch is reported, not raised.
    pub async fn get_backup(&self, backup_id: Uuid) -> Result<VerifiedBackup, ThemeEngineError> {
        let backup = self
            .repos
            .backups
            .find_by_id(backup_id)
            .await
            .map_err(internal("find backup"))?
            .ok_or_else(|| ThemeEngineError::not_found("backup", backup_id))?;

        let actual = backup_checksum(&backup.settings, &backup.customizations);
        let integrity = if actual == backup.checksum {
            BackupIntegrity::Intact
        } else {
            tracing::warn!(%backup_id, stored = %backup.checksum, %actual, "backup checksum mismatch");
            BackupIntegrity::Corrupted(IntegrityWarning {
                subject: format!("backup {}", backup_id),
                message: "stored checksum does not match backup contents".to_string(),
            })
        };
        Ok(VerifiedBackup { backup, integrity })
    }

    /// Write a backup back over the live state of its theme: templates, sections,
    /// blocks and the customization are replaced in one transaction. A backup without a
    /// layout restores settings only. Refuses corrupted backups.
    pub async fn restore_backup(&self, backup_id: Uuid) -> Result<ThemeBackup, ThemeEngineError> {
        let verified = self.get_backup(backup_id).await?;
        if let BackupIntegrity::Corrupted(warning) = &verified.integrity {
            return Err(ThemeEngineError::conflict(format!(
                "backup {} failed verification: {}",
                backup_id, warning.message
            )));
        }
        let backup = verified.backup;

        // Backups created from caller payloads may carry settings only
        let snapshot: Option<LayoutSnapshot> = match backup.customizations.get("templates") {
            Some(_) => Some(
                serde_json::from_value(backup.customizations.clone()).map_err(|e| {
                    ThemeEngineError::conflict(format!(
                        "backup {} has an unreadable layout: {}",
                        backup_id, e
                    ))
                })?,
            ),
            None => None,
        };

        let existing = self
            .repos
            .customizations
            .find(backup.store_id, &backup.theme_code)
            .await
            .map_err(internal("find customization"))?;
        let customization = ThemeCustomization {
            id: existing.as_ref().map(|c| c.id).unwrap_or_else(Uuid::new_v4),
            store_id: backup.store_id,
            theme_code: backup.theme_code.clone(),
            settings: backup.settings.clone(),
            is_active: existing.as_ref().is_some_and(|c| c.is_active),
            updated_at: Utc::now(),
        };

        match snapshot {
            Some(snapshot) => {
                let templates = restored_templates(&backup, &snapshot);
                self.repos
                    .layouts
                    .replace_layout(&LayoutReplacement {
                        store_id: backup.store_id,
                        theme_code: backup.theme_code.clone(),
                        mode: LayoutMode::ReplaceTheme,
                        templates,
                        customization: Some(customization),
                    })
                    .await
                    .map_err(internal("restore backup layout"))?;
            }
            None => {
                self.repos
                    .customizations
                    .upsert(&customization)
                    .await
                    .map_err(internal("restore backup settings"))?;
            }
        }

        tracing::info!(%backup_id, store_id = %backup.store_id, theme_code = %backup.theme_code, "restored theme backup");
        self.publish(ThemeEvent::BackupRestored(BackupEvent {
            store_id: backup.store_id,
            backup_id,
            theme_code: backup.theme_code.clone(),
            timestamp: Utc::now(),
        }))
        .await;
        Ok(backup)
    }

    /// Key-level comparison of two backups' settings, `from` as the old side
    pub async fn diff_backups(
        &self,
        from_backup_id: Uuid,
        to_backup_id: Uuid,
    ) -> Result<Vec<SettingDiff>, ThemeEngineError> {
        let from = self.get_backup(from_backup_id).await?;
        let to = self.get_backup(to_backup_id).await?;
        Ok(diff_settings(
            &flatten_settings(&from.backup.settings),
            &flatten_settings(&to.backup.settings),
        ))
    }
}

fn restored_templates(backup: &ThemeBackup, snapshot: &LayoutSnapshot) -> Vec<TemplateLayout> {
    let now = Utc::now();
    snapshot
        .templates
        .iter()
        .map(|template| {
            let row = StoreTemplate {
                id: Uuid::new_v4(),
                store_id: backup.store_id,
                theme_code: backup.theme_code.clone(),
                template_type: template.template_type.clone(),
                name: template.name.clone(),
                is_default: template.is_default,
                enabled: template.enabled,
                settings: template.settings.clone(),
                seo_settings: template.seo_settings.clone(),
                created_at: now,
                updated_at: now,
            };
            let definitions: Vec<SectionDefinition> =
                template.sections.iter().map(SectionDefinition::from).collect();
            let sections = materialize_sections(row.id, &definitions);
            TemplateLayout {
                template: row,
                sections,
            }
        })
        .collect()
}
