//! Preset application

use super::{internal, materialize_sections, Service};
use crate::contract::{
    Preset, PresetOptions, PresetOutcome, StoreTemplate, ThemeCustomization, ThemeEngineError,
};
use crate::domain::events::{PresetAppliedEvent, ThemeEvent};
use crate::domain::package::PackageError;
use crate::domain::repository::{LayoutMode, LayoutReplacement, TemplateLayout};
use crate::domain::settings_migration::{flatten_settings, unflatten_settings};
use crate::domain::validation::{validate_identifier, validate_preset_id};
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

impl Service {
    /// Apply a bundled preset to a store.
    ///
    /// Destructive by default: every template of the store is replaced by the preset's
    /// templates and the preset's colors and fonts overwrite the theme settings. With
    /// `preserve_existing`, only template types the store lacks are added and only
    /// missing color/font keys are filled. Either way the whole change is one
    /// transaction.
    pub async fn apply_preset(
        &self,
        store_id: Uuid,
        preset_id: &str,
        options: PresetOptions,
    ) -> Result<PresetOutcome, ThemeEngineError> {
        validate_preset_id(preset_id)?;

        let preset = match self.packages.preset(preset_id).await {
            Ok(Some(preset)) => preset,
            Ok(None) => return Err(ThemeEngineError::not_found("preset", preset_id)),
            Err(PackageError::Malformed { path, reason }) => {
                tracing::warn!(%path, %reason, "malformed preset");
                return Err(ThemeEngineError::validation(format!(
                    "preset '{}' is malformed: {}",
                    preset_id, reason
                )));
            }
            Err(e) => {
                tracing::error!(preset_id, error = %e, "preset read failed");
                return Err(ThemeEngineError::Internal);
            }
        };
        self.check_preset(&preset)?;

        let active = self
            .repos
            .customizations
            .find_active(store_id)
            .await
            .map_err(internal("find active customization"))?;
        let theme_code = preset
            .theme_code
            .clone()
            .or_else(|| active.as_ref().map(|c| c.theme_code.clone()))
            .ok_or_else(|| {
                ThemeEngineError::validation(format!(
                    "preset '{}' names no theme and the store has no active theme",
                    preset_id
                ))
            })?;
        if preset.theme_code.is_some() {
            self.target_schema(&theme_code).await?;
        }
        let package_code = self.package_code(&theme_code).await?;
        for template in &preset.templates {
            for section in &template.sections {
                self.check_section_schema(&package_code, &section.section_type, &section.settings)
                    .await?;
            }
        }

        let existing = self
            .repos
            .customizations
            .find(store_id, &theme_code)
            .await
            .map_err(internal("find customization"))?;
        let customization = preset_customization(
            store_id,
            &theme_code,
            &preset,
            existing,
            active.is_none(),
            options.preserve_existing,
        );

        let now = Utc::now();
        let templates = preset
            .templates
            .iter()
            .map(|template| {
                let row = StoreTemplate {
                    id: Uuid::new_v4(),
                    store_id,
                    theme_code: theme_code.clone(),
                    template_type: template.template_type.clone(),
                    name: template.template_type.clone(),
                    is_default: true,
                    enabled: true,
                    settings: super::empty_object(),
                    seo_settings: super::empty_object(),
                    created_at: now,
                    updated_at: now,
                };
                let sections = materialize_sections(row.id, &template.sections);
                TemplateLayout {
                    template: row,
                    sections,
                }
            })
            .collect();

        let mode = if options.preserve_existing {
            LayoutMode::MergeMissing
        } else {
            LayoutMode::ReplaceStore
        };
        let outcome = self
            .repos
            .layouts
            .replace_layout(&LayoutReplacement {
                store_id,
                theme_code: theme_code.clone(),
                mode,
                templates,
                customization: Some(customization),
            })
            .await
            .map_err(internal("apply preset layout"))?;

        tracing::info!(
            %store_id,
            preset_id,
            theme_code = %theme_code,
            preserve_existing = options.preserve_existing,
            created = outcome.inserted_types.len(),
            skipped = outcome.skipped_types.len(),
            removed = outcome.removed_templates,
            "applied preset"
        );
        self.publish(ThemeEvent::PresetApplied(PresetAppliedEvent {
            store_id,
            preset_id: preset_id.to_string(),
            preserve_existing: options.preserve_existing,
            timestamp: Utc::now(),
        }))
        .await;

        Ok(PresetOutcome {
            preset_id: preset_id.to_string(),
            theme_code,
            created_templates: outcome.inserted_types,
            skipped_templates: outcome.skipped_types,
            removed_templates: outcome.removed_templates,
        })
    }

    /// Everything about a preset is checked before the first write
    fn check_preset(&self, preset: &Preset) -> Result<(), ThemeEngineError> {
        if let Some(theme_code) = &preset.theme_code {
            validate_identifier("theme code", theme_code)?;
        }
        let mut types = HashSet::new();
        for template in &preset.templates {
            validate_identifier("template type", &template.template_type)?;
            if !types.insert(template.template_type.as_str()) {
                return Err(ThemeEngineError::validation(format!(
                    "preset '{}' defines template '{}' twice",
                    preset.id, template.template_type
                )));
            }
            for section in &template.sections {
                self.check_section_definition(section)?;
            }
        }
        if let Some(key) = preset
            .colors
            .keys()
            .chain(preset.fonts.keys())
            .find(|key| key.is_empty() || key.contains('.'))
        {
            return Err(ThemeEngineError::validation(format!(
                "preset '{}' has an invalid color or font name '{}'",
                preset.id, key
            )));
        }
        Ok(())
    }
}

/// Customization row after merging the preset's palette and fonts
fn preset_customization(
    store_id: Uuid,
    theme_code: &str,
    preset: &Preset,
    existing: Option<ThemeCustomization>,
    store_has_no_active_theme: bool,
    preserve_existing: bool,
) -> ThemeCustomization {
    let mut flat = existing
        .as_ref()
        .map(|c| flatten_settings(&c.settings))
        .unwrap_or_default();

    let mut apply = |prefix: &str, values: &BTreeMap<String, String>| {
        for (name, value) in values {
            let key = format!("{}.{}", prefix, name);
            if preserve_existing && flat.contains_key(&key) {
                continue;
            }
            flat.insert(key, serde_json::Value::String(value.clone()));
        }
    };
    apply("colors", &preset.colors);
    apply("typography", &preset.fonts);

    // A destructive preset is a theme changeover; a merge keeps the current activation
    let is_active = !preserve_existing
        || store_has_no_active_theme
        || existing.as_ref().is_some_and(|c| c.is_active);

    ThemeCustomization {
        id: existing.as_ref().map(|c| c.id).unwrap_or_else(Uuid::new_v4),
        store_id,
        theme_code: theme_code.to_string(),
        settings: unflatten_settings(&flat),
        is_active,
        updated_at: Utc::now(),
    }
}
