//! Template and section editing

use super::{internal, materialize_section, Service};
use crate::contract::{
    ImportReport, NestedBlock, SectionDefinition, SectionInstance, SectionPatch, StoreTemplate,
    TemplatePatch, ThemeEngineError,
};
use crate::domain::block_tree;
use crate::domain::events::ThemeEvent;
use crate::domain::repository::TemplateLayout;
use crate::domain::validation::{validate_identifier, validate_name, validate_settings};
use chrono::Utc;
use std::collections::HashSet;
use uuid::Uuid;

impl Service {
    // ===== Templates =====

    pub async fn get_template(&self, template_id: Uuid) -> Result<StoreTemplate, ThemeEngineError> {
        self.repos
            .templates
            .find_by_id(template_id)
            .await
            .map_err(internal("find template"))?
            .ok_or_else(|| ThemeEngineError::not_found("template", template_id))
    }

    /// Templates of a store, optionally restricted to one theme
    pub async fn list_templates(
        &self,
        store_id: Uuid,
        theme_code: Option<&str>,
    ) -> Result<Vec<StoreTemplate>, ThemeEngineError> {
        if let Some(theme_code) = theme_code {
            validate_identifier("theme code", theme_code)?;
        }
        self.repos
            .templates
            .list_for_store(store_id, theme_code)
            .await
            .map_err(internal("list templates"))
    }

    /// Create an empty template. Fails with `Conflict` when `is_default` is requested
    /// while the type already has a default, or when the name is taken for the type.
    pub async fn create_template(
        &self,
        store_id: Uuid,
        theme_code: &str,
        template_type: &str,
        name: &str,
        is_default: bool,
    ) -> Result<StoreTemplate, ThemeEngineError> {
        validate_identifier("theme code", theme_code)?;
        validate_identifier("template type", template_type)?;
        validate_name("template name", name)?;

        let existing = self
            .repos
            .templates
            .find_by_type(store_id, template_type)
            .await
            .map_err(internal("find templates by type"))?;
        if is_default && existing.iter().any(|template| template.is_default) {
            return Err(ThemeEngineError::conflict(format!(
                "store already has a default '{}' template",
                template_type
            )));
        }
        if existing.iter().any(|template| template.name == name) {
            return Err(ThemeEngineError::conflict(format!(
                "a '{}' template named '{}' already exists",
                template_type, name
            )));
        }

        let now = Utc::now();
        let template = StoreTemplate {
            id: Uuid::new_v4(),
            store_id,
            theme_code: theme_code.to_string(),
            template_type: template_type.to_string(),
            name: name.to_string(),
            is_default,
            enabled: true,
            settings: super::empty_object(),
            seo_settings: super::empty_object(),
            created_at: now,
            updated_at: now,
        };
        let created = self
            .repos
            .templates
            .create(&TemplateLayout {
                template,
                sections: Vec::new(),
            })
            .await
            .map_err(internal("create template"))?;

        self.publish(ThemeEvent::template_changed(
            store_id,
            created.id,
            template_type,
        ))
        .await;
        Ok(created)
    }

    pub async fn update_template(
        &self,
        template_id: Uuid,
        patch: TemplatePatch,
    ) -> Result<StoreTemplate, ThemeEngineError> {
        let mut template = self.get_template(template_id).await?;

        if let Some(name) = patch.name {
            validate_name("template name", &name)?;
            if name != template.name {
                let siblings = self
                    .repos
                    .templates
                    .find_by_type(template.store_id, &template.template_type)
                    .await
                    .map_err(internal("find templates by type"))?;
                if siblings.iter().any(|other| other.id != template.id && other.name == name) {
                    return Err(ThemeEngineError::conflict(format!(
                        "a '{}' template named '{}' already exists",
                        template.template_type, name
                    )));
                }
            }
            template.name = name;
        }
        if let Some(enabled) = patch.enabled {
            template.enabled = enabled;
        }
        if let Some(settings) = patch.settings {
            validate_settings(&settings, self.config.max_settings_size)?;
            template.settings = settings;
        }
        if let Some(seo_settings) = patch.seo_settings {
            validate_settings(&seo_settings, self.config.max_settings_size)?;
            template.seo_settings = seo_settings;
        }
        template.updated_at = Utc::now();

        let updated = self
            .repos
            .templates
            .update(&template)
            .await
            .map_err(internal("update template"))?;
        self.publish(ThemeEvent::template_changed(
            updated.store_id,
            updated.id,
            &updated.template_type,
        ))
        .await;
        Ok(updated)
    }

    /// Make a template the default of its type; the previous default is unset atomically
    pub async fn set_default_template(
        &self,
        template_id: Uuid,
    ) -> Result<StoreTemplate, ThemeEngineError> {
        let template = self.get_template(template_id).await?;
        if !template.is_default {
            self.repos
                .templates
                .set_default(template_id)
                .await
                .map_err(internal("set default template"))?;
            tracing::info!(%template_id, template_type = %template.template_type, "default template changed");
            self.publish(ThemeEvent::template_changed(
                template.store_id,
                template.id,
                &template.template_type,
            ))
            .await;
        }
        self.get_template(template_id).await
    }

    /// Delete a non-default template with its sections and blocks
    pub async fn delete_template(&self, template_id: Uuid) -> Result<(), ThemeEngineError> {
        let template = self.get_template(template_id).await?;
        if template.is_default {
            return Err(ThemeEngineError::conflict(format!(
                "template {} is the default '{}' template; make another template default first",
                template_id, template.template_type
            )));
        }

        self.repos
            .templates
            .delete(template_id)
            .await
            .map_err(internal("delete template"))?;
        self.publish(ThemeEvent::template_changed(
            template.store_id,
            template.id,
            &template.template_type,
        ))
        .await;
        Ok(())
    }

    // ===== Sections =====

    pub async fn get_section(&self, section_id: Uuid) -> Result<SectionInstance, ThemeEngineError> {
        self.repos
            .sections
            .find_by_id(section_id)
            .await
            .map_err(internal("find section"))?
            .ok_or_else(|| ThemeEngineError::not_found("section", section_id))
    }

    /// Insert a section at `position` (end when `None` or past the end); later sections
    /// shift down by one
    pub async fn add_section(
        &self,
        template_id: Uuid,
        definition: SectionDefinition,
        position: Option<i32>,
    ) -> Result<SectionInstance, ThemeEngineError> {
        let template = self.get_template(template_id).await?;
        let section = self
            .insert_section(&template, &definition, position)
            .await?;
        self.publish(ThemeEvent::template_changed(
            template.store_id,
            template.id,
            &template.template_type,
        ))
        .await;
        Ok(section)
    }

    pub async fn update_section(
        &self,
        section_id: Uuid,
        patch: SectionPatch,
    ) -> Result<SectionInstance, ThemeEngineError> {
        let mut section = self.get_section(section_id).await?;
        let template = self.get_template(section.template_id).await?;

        if let Some(settings) = patch.settings {
            validate_settings(&settings, self.config.max_settings_size)?;
            let package_code = self.package_code(&template.theme_code).await?;
            self.check_section_schema(&package_code, &section.section_type, &settings)
                .await?;
            section.settings = settings;
        }
        if let Some(enabled) = patch.enabled {
            section.enabled = enabled;
        }

        let updated = self
            .repos
            .sections
            .update(&section)
            .await
            .map_err(internal("update section"))?;
        self.publish(ThemeEvent::template_changed(
            template.store_id,
            template.id,
            &template.template_type,
        ))
        .await;
        Ok(updated)
    }

    /// Delete a section and its blocks; remaining positions are renumbered 0..n-1
    pub async fn delete_section(&self, section_id: Uuid) -> Result<(), ThemeEngineError> {
        let section = self.get_section(section_id).await?;
        let template = self.get_template(section.template_id).await?;

        self.repos
            .sections
            .delete_and_compact(section_id)
            .await
            .map_err(internal("delete section"))?;
        self.publish(ThemeEvent::template_changed(
            template.store_id,
            template.id,
            &template.template_type,
        ))
        .await;
        Ok(())
    }

    /// Reorder sections; `ordered_ids` must name every section of the template once
    pub async fn reorder_sections(
        &self,
        template_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<SectionInstance>, ThemeEngineError> {
        let template = self.get_template(template_id).await?;
        let current = self
            .repos
            .sections
            .list_for_template(template_id)
            .await
            .map_err(internal("list sections"))?;

        let requested: HashSet<Uuid> = ordered_ids.iter().copied().collect();
        let existing: HashSet<Uuid> = current.iter().map(|section| section.id).collect();
        if requested.len() != ordered_ids.len() || requested != existing {
            return Err(ThemeEngineError::validation(
                "section order must list every section of the template exactly once",
            ));
        }

        self.repos
            .sections
            .reorder(template_id, ordered_ids)
            .await
            .map_err(internal("reorder sections"))?;
        self.publish(ThemeEvent::template_changed(
            template.store_id,
            template.id,
            &template.template_type,
        ))
        .await;

        self.repos
            .sections
            .list_for_template(template_id)
            .await
            .map_err(internal("list sections"))
    }

    /// Block tree of a section
    pub async fn get_section_blocks(
        &self,
        section_id: Uuid,
    ) -> Result<Vec<NestedBlock>, ThemeEngineError> {
        self.get_section(section_id).await?;
        let rows = self
            .repos
            .sections
            .list_blocks(&[section_id])
            .await
            .map_err(internal("list blocks"))?;
        Ok(block_tree::nest(&rows))
    }

    /// Replace a section's whole block tree. Positions are renumbered from sibling
    /// order; the stored tree is returned.
    pub async fn save_section_blocks(
        &self,
        section_id: Uuid,
        blocks: Vec<NestedBlock>,
    ) -> Result<Vec<NestedBlock>, ThemeEngineError> {
        let section = self.get_section(section_id).await?;
        let template = self.get_template(section.template_id).await?;
        self.check_nested_blocks(&blocks)?;

        let flat = block_tree::flatten(&blocks, section_id);
        let mut seen = HashSet::with_capacity(flat.len());
        if let Some(duplicate) = flat.iter().find(|block| !seen.insert(block.id)) {
            return Err(ThemeEngineError::validation(format!(
                "block id {} appears more than once",
                duplicate.id
            )));
        }

        let ids: Vec<Uuid> = flat.iter().map(|block| block.id).collect();
        let taken = self
            .repos
            .sections
            .find_blocks(&ids)
            .await
            .map_err(internal("find blocks"))?;
        if let Some(foreign) = taken.iter().find(|block| block.section_id != section_id) {
            return Err(ThemeEngineError::validation(format!(
                "block id {} belongs to another section",
                foreign.id
            )));
        }

        self.repos
            .sections
            .replace_blocks(section_id, &flat)
            .await
            .map_err(internal("replace blocks"))?;

        tracing::debug!(%section_id, blocks = flat.len(), "saved section blocks");
        self.publish(ThemeEvent::template_changed(
            template.store_id,
            template.id,
            &template.template_type,
        ))
        .await;
        Ok(block_tree::nest(&flat))
    }

    /// Append sections in order. Each item is validated and inserted on its own; a bad
    /// item is reported and does not stop the rest.
    pub async fn import_sections(
        &self,
        template_id: Uuid,
        definitions: Vec<SectionDefinition>,
    ) -> Result<ImportReport, ThemeEngineError> {
        let template = self.get_template(template_id).await?;

        let mut report = ImportReport {
            imported: Vec::new(),
            failed: Vec::new(),
        };
        for (index, definition) in definitions.iter().enumerate() {
            match self.insert_section(&template, definition, None).await {
                Ok(section) => report.imported.push(section.id),
                Err(e) => {
                    tracing::debug!(%template_id, index, error = %e, "section import item rejected");
                    report.failed.push((index, e));
                }
            }
        }

        if !report.imported.is_empty() {
            self.publish(ThemeEvent::template_changed(
                template.store_id,
                template.id,
                &template.template_type,
            ))
            .await;
        }
        tracing::info!(
            %template_id,
            imported = report.imported.len(),
            failed = report.failed.len(),
            "imported sections"
        );
        Ok(report)
    }

    async fn insert_section(
        &self,
        template: &StoreTemplate,
        definition: &SectionDefinition,
        position: Option<i32>,
    ) -> Result<SectionInstance, ThemeEngineError> {
        self.check_section_definition(definition)?;
        if let Some(position) = position {
            if position < 0 {
                return Err(ThemeEngineError::validation(format!(
                    "section position must not be negative, got {}",
                    position
                )));
            }
        }
        let package_code = self.package_code(&template.theme_code).await?;
        self.check_section_schema(&package_code, &definition.section_type, &definition.settings)
            .await?;

        let materialized =
            materialize_section(template.id, definition, position.unwrap_or(i32::MAX));
        self.repos
            .sections
            .insert(&materialized)
            .await
            .map_err(internal("insert section"))
    }
}
