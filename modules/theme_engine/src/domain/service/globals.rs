//! Global sections: header, footer and announcement bar shared by every template

use super::{absorb, internal, Service};
use crate::contract::{
    GlobalSection, GlobalSectionSet, GlobalSlot, GlobalSource, ResolvedGlobalSection,
    ThemeEngineError,
};
use crate::domain::block_tree;
use crate::domain::events::ThemeEvent;
use crate::domain::validation::{validate_identifier, validate_settings};
use chrono::Utc;
use std::collections::HashSet;
use uuid::Uuid;

impl Service {
    /// Global sections of a store for a theme; a stored row wins over the package default
    /// of the same slot
    pub async fn get_global_sections(
        &self,
        store_id: Uuid,
        theme_code: &str,
    ) -> Result<GlobalSectionSet, ThemeEngineError> {
        validate_identifier("theme code", theme_code)?;
        self.load_global_sections(store_id, theme_code).await
    }

    /// Create or replace the stored global section of a slot. Blocks travel in the
    /// settings' `blocks` array; each is stored with an id, and ids sent back by the
    /// caller are kept.
    pub async fn save_global_section(
        &self,
        store_id: Uuid,
        theme_code: &str,
        section_type: &str,
        enabled: bool,
        settings: serde_json::Value,
    ) -> Result<GlobalSection, ThemeEngineError> {
        validate_identifier("theme code", theme_code)?;
        if GlobalSlot::from_section_type(section_type).is_none() {
            return Err(ThemeEngineError::validation(format!(
                "'{}' is not a global section type",
                section_type
            )));
        }
        validate_settings(&settings, self.config.max_settings_size)?;

        let (plain, blocks) = block_tree::split_identified_blocks(&settings);
        self.check_block_definitions(&block_tree::to_definitions(&blocks))?;
        let mut seen = HashSet::new();
        let flat = block_tree::flatten(&blocks, Uuid::nil());
        if let Some(duplicate) = flat.iter().find(|block| !seen.insert(block.id)) {
            return Err(ThemeEngineError::validation(format!(
                "block id {} appears more than once",
                duplicate.id
            )));
        }
        let package_code = self.package_code(theme_code).await?;
        self.check_section_schema(&package_code, section_type, &plain)
            .await?;

        let existing = self
            .repos
            .globals
            .find(store_id, theme_code, section_type)
            .await
            .map_err(internal("find global section"))?;

        let section = GlobalSection {
            id: existing.map(|row| row.id).unwrap_or_else(Uuid::new_v4),
            store_id,
            theme_code: theme_code.to_string(),
            section_type: section_type.to_string(),
            enabled,
            settings: block_tree::embed_blocks(&plain, &blocks),
            updated_at: Utc::now(),
        };
        let saved = self
            .repos
            .globals
            .upsert(&section)
            .await
            .map_err(internal("upsert global section"))?;

        tracing::info!(%store_id, theme_code, section_type, "saved global section");
        self.publish(ThemeEvent::global_section_changed(
            store_id,
            theme_code,
            section_type,
            false,
        ))
        .await;
        Ok(saved)
    }

    /// Remove a stored global section; the slot falls back to the package default
    pub async fn delete_global_section(&self, id: Uuid) -> Result<(), ThemeEngineError> {
        let section = self
            .repos
            .globals
            .find_by_id(id)
            .await
            .map_err(internal("find global section"))?
            .ok_or_else(|| ThemeEngineError::not_found("global section", id))?;

        self.repos
            .globals
            .delete(id)
            .await
            .map_err(internal("delete global section"))?;

        self.publish(ThemeEvent::global_section_changed(
            section.store_id,
            &section.theme_code,
            &section.section_type,
            true,
        ))
        .await;
        Ok(())
    }

    pub(super) async fn load_global_sections(
        &self,
        store_id: Uuid,
        theme_code: &str,
    ) -> Result<GlobalSectionSet, ThemeEngineError> {
        let stored = self
            .repos
            .globals
            .list(store_id, theme_code)
            .await
            .map_err(internal("list global sections"))?;
        let package_code = self.package_code(theme_code).await?;

        let mut set = GlobalSectionSet::default();
        for slot in GlobalSlot::ALL {
            let section_type = slot.section_type();
            let resolved = match stored.iter().find(|row| row.section_type == section_type) {
                Some(row) => {
                    let (settings, blocks) = block_tree::split_identified_blocks(&row.settings);
                    Some(ResolvedGlobalSection {
                        id: row.id,
                        slot,
                        section_type: row.section_type.clone(),
                        enabled: row.enabled,
                        settings,
                        blocks,
                        source: GlobalSource::Stored,
                    })
                }
                None => absorb(
                    self.packages
                        .global_section(&package_code, section_type)
                        .await,
                    &mut set.warnings,
                )?
                .map(|def| ResolvedGlobalSection {
                    id: Uuid::new_v4(),
                    slot,
                    section_type: def.section_type,
                    enabled: def.enabled,
                    settings: def.settings,
                    blocks: block_tree::instantiate(&def.blocks),
                    source: GlobalSource::ThemeDefault,
                }),
            };
            set.set(slot, resolved);
        }
        Ok(set)
    }
}
