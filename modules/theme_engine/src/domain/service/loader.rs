//! Hybrid template loading: database rows first, theme package JSON as the fallback

use super::resolver::pick_persisted;
use super::{absorb, internal, materialize_sections, Service};
use crate::contract::{
    CompileOptions, CompiledSection, CompiledTemplate, DefaultTemplate, NestedBlock,
    SectionInstance, StoreTemplate, TemplateSource, ThemeEngineError,
};
use crate::domain::block_tree;
use crate::domain::events::ThemeEvent;
use crate::domain::repository::TemplateLayout;
use crate::domain::validation::validate_identifier;
use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

impl Service {
    /// Compile the template serving `template_type` for a store and theme.
    ///
    /// A persisted template of the theme wins over the package default. Returns
    /// `Ok(None)` when neither exists. Malformed package files surface as warnings on
    /// the result.
    pub async fn get_compiled_template(
        &self,
        store_id: Uuid,
        theme_code: &str,
        template_type: &str,
        options: CompileOptions,
    ) -> Result<Option<CompiledTemplate>, ThemeEngineError> {
        validate_identifier("theme code", theme_code)?;
        validate_identifier("template type", template_type)?;

        let mut warnings = Vec::new();
        let candidates = self
            .find_theme_templates(store_id, theme_code, template_type)
            .await?;

        let compiled = match pick_persisted(candidates) {
            Some(resolution) => {
                let sections = self.load_sections(resolution.template.id).await?;
                Some(CompiledTemplate {
                    template_type: template_type.to_string(),
                    template_id: Some(resolution.template.id),
                    source: resolution.source,
                    sections: sections
                        .into_iter()
                        .map(|(section, blocks)| compiled_section(section, blocks))
                        .collect(),
                    global_sections: None,
                    warnings: Vec::new(),
                })
            }
            None => {
                let package_code = self.package_code(theme_code).await?;
                absorb(
                    self.packages
                        .default_template(&package_code, template_type)
                        .await,
                    &mut warnings,
                )?
                .map(|default| compile_default(template_type, &default))
            }
        };

        let Some(mut compiled) = compiled else {
            tracing::debug!(%store_id, theme_code, template_type, "no template available");
            return Ok(None);
        };

        if options.include_global {
            let globals = self.load_global_sections(store_id, theme_code).await?;
            warnings.extend(globals.warnings.iter().cloned());
            compiled.global_sections = Some(globals);
        }
        compiled.warnings = warnings;
        Ok(Some(compiled))
    }

    /// Persist the theme's JSON default as the store's default template of the type.
    ///
    /// Idempotent: an existing template of the theme is returned untouched. A theme
    /// without a JSON default gets an empty template to edit.
    pub async fn materialize_template(
        &self,
        store_id: Uuid,
        theme_code: &str,
        template_type: &str,
    ) -> Result<StoreTemplate, ThemeEngineError> {
        validate_identifier("theme code", theme_code)?;
        validate_identifier("template type", template_type)?;

        let existing = self
            .find_theme_templates(store_id, theme_code, template_type)
            .await?;
        if let Some(resolution) = pick_persisted(existing) {
            return Ok(resolution.template);
        }

        let default = self.default_template(theme_code, template_type).await?;
        let now = Utc::now();
        let template = StoreTemplate {
            id: Uuid::new_v4(),
            store_id,
            theme_code: theme_code.to_string(),
            template_type: template_type.to_string(),
            name: default
                .as_ref()
                .and_then(|default| default.name.clone())
                .unwrap_or_else(|| template_type.to_string()),
            is_default: true,
            enabled: true,
            settings: super::empty_object(),
            seo_settings: super::empty_object(),
            created_at: now,
            updated_at: now,
        };
        let sections = default
            .map(|default| materialize_sections(template.id, &default.sections))
            .unwrap_or_default();

        let created = self
            .repos
            .templates
            .create(&TemplateLayout { template, sections })
            .await
            .map_err(internal("create template"))?;

        tracing::info!(%store_id, theme_code, template_type, template_id = %created.id, "materialized template");
        self.publish(ThemeEvent::template_materialized(
            store_id,
            created.id,
            template_type,
        ))
        .await;
        Ok(created)
    }

    /// Throw away a template's sections and blocks and reseed them from the theme's
    /// JSON default (empty when the theme ships none)
    pub async fn reset_template(&self, template_id: Uuid) -> Result<StoreTemplate, ThemeEngineError> {
        let template = self.get_template(template_id).await?;
        let default = self
            .default_template(&template.theme_code, &template.template_type)
            .await?;
        let sections = default
            .map(|default| materialize_sections(template.id, &default.sections))
            .unwrap_or_default();

        self.repos
            .templates
            .replace_sections(template.id, &sections)
            .await
            .map_err(internal("replace template sections"))?;

        tracing::info!(%template_id, sections = sections.len(), "reset template to theme default");
        self.publish(ThemeEvent::template_materialized(
            template.store_id,
            template.id,
            &template.template_type,
        ))
        .await;
        Ok(template)
    }

    /// Store templates of one theme, default first then oldest first
    async fn find_theme_templates(
        &self,
        store_id: Uuid,
        theme_code: &str,
        template_type: &str,
    ) -> Result<Vec<StoreTemplate>, ThemeEngineError> {
        let candidates = self
            .repos
            .templates
            .find_by_type(store_id, template_type)
            .await
            .map_err(internal("find templates by type"))?;
        Ok(candidates
            .into_iter()
            .filter(|template| template.theme_code == theme_code)
            .collect())
    }

    /// JSON default of a theme for writes; malformed files count as absent
    async fn default_template(
        &self,
        theme_code: &str,
        template_type: &str,
    ) -> Result<Option<DefaultTemplate>, ThemeEngineError> {
        let package_code = self.package_code(theme_code).await?;
        let mut warnings = Vec::new();
        absorb(
            self.packages
                .default_template(&package_code, template_type)
                .await,
            &mut warnings,
        )
    }

    /// Sections of a template ordered by position, each with its block tree
    pub(super) async fn load_sections(
        &self,
        template_id: Uuid,
    ) -> Result<Vec<(SectionInstance, Vec<NestedBlock>)>, ThemeEngineError> {
        let sections = self
            .repos
            .sections
            .list_for_template(template_id)
            .await
            .map_err(internal("list sections"))?;
        if sections.is_empty() {
            return Ok(Vec::new());
        }

        let section_ids: Vec<Uuid> = sections.iter().map(|section| section.id).collect();
        let blocks = self
            .repos
            .sections
            .list_blocks(&section_ids)
            .await
            .map_err(internal("list blocks"))?;

        let mut by_section: HashMap<Uuid, Vec<_>> = HashMap::new();
        for block in blocks {
            by_section.entry(block.section_id).or_default().push(block);
        }

        Ok(sections
            .into_iter()
            .map(|section| {
                let rows = by_section.remove(&section.id).unwrap_or_default();
                (section, block_tree::nest(&rows))
            })
            .collect())
    }
}

fn compiled_section(section: SectionInstance, blocks: Vec<NestedBlock>) -> CompiledSection {
    CompiledSection {
        id: section.id,
        section_type: section.section_type,
        settings: section.settings,
        enabled: section.enabled,
        position: section.position,
        blocks,
    }
}

fn compile_default(template_type: &str, default: &DefaultTemplate) -> CompiledTemplate {
    CompiledTemplate {
        template_type: template_type.to_string(),
        template_id: None,
        source: TemplateSource::ThemeDefault,
        sections: default
            .sections
            .iter()
            .enumerate()
            .map(|(index, def)| CompiledSection {
                id: Uuid::new_v4(),
                section_type: def.section_type.clone(),
                settings: def.settings.clone(),
                enabled: def.enabled,
                position: index as i32,
                blocks: block_tree::instantiate(&def.blocks),
            })
            .collect(),
        global_sections: None,
        warnings: Vec::new(),
    }
}
