//! Template resolution: which template serves a page type for a store

use super::{absorb, internal, Service};
use crate::contract::{
    DefaultTemplate, Resolution, StoreTemplate, TemplateSource, ThemeEngineError,
};
use crate::domain::validation::validate_identifier;
use chrono::Utc;
use uuid::Uuid;

impl Service {
    /// Resolve the template serving `template_type` for a store.
    ///
    /// Order: the store's default row, then any row of that type, then an ephemeral
    /// template built from the active theme's JSON default. Read-only.
    pub async fn resolve_template(
        &self,
        store_id: Uuid,
        template_type: &str,
    ) -> Result<Resolution, ThemeEngineError> {
        validate_identifier("template type", template_type)?;

        let candidates = self
            .repos
            .templates
            .find_by_type(store_id, template_type)
            .await
            .map_err(internal("find templates by type"))?;
        if let Some(resolution) = pick_persisted(candidates) {
            return Ok(resolution);
        }

        let active = self
            .repos
            .customizations
            .find_active(store_id)
            .await
            .map_err(internal("find active customization"))?
            .ok_or_else(|| ThemeEngineError::not_found("active theme", store_id))?;
        let package_code = self.package_code(&active.theme_code).await?;

        let mut warnings = Vec::new();
        let default = absorb(
            self.packages
                .default_template(&package_code, template_type)
                .await,
            &mut warnings,
        )?
        .ok_or_else(|| {
            ThemeEngineError::not_found("template", format!("{}/{}", store_id, template_type))
        })?;

        tracing::debug!(%store_id, template_type, theme = %active.theme_code, "resolved template from theme default");
        Ok(Resolution {
            template: ephemeral_template(store_id, &active.theme_code, &default),
            source: TemplateSource::ThemeDefault,
        })
    }
}

/// Rows arrive default first, then oldest first
pub(super) fn pick_persisted(candidates: Vec<StoreTemplate>) -> Option<Resolution> {
    let template = candidates.into_iter().next()?;
    let source = if template.is_default {
        TemplateSource::Entity
    } else {
        TemplateSource::StoreDefault
    };
    Some(Resolution { template, source })
}

fn ephemeral_template(
    store_id: Uuid,
    theme_code: &str,
    default: &DefaultTemplate,
) -> StoreTemplate {
    let now = Utc::now();
    StoreTemplate {
        id: Uuid::new_v4(),
        store_id,
        theme_code: theme_code.to_string(),
        template_type: default.template_type.clone(),
        name: default
            .name
            .clone()
            .unwrap_or_else(|| default.template_type.clone()),
        is_default: true,
        enabled: true,
        settings: super::empty_object(),
        seo_settings: super::empty_object(),
        created_at: now,
        updated_at: now,
    }
}
