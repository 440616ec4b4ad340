//! Installed themes and the store's active theme

use super::{absorb, internal, Service};
use crate::contract::{SettingsSchema, Theme, ThemeCustomization, ThemeEngineError};
use crate::domain::events::{ThemeEvent, ThemeSwitchedEvent};
use crate::domain::settings_migration::{flatten_settings, migrate, unflatten_settings};
use crate::domain::validation::{validate_identifier, validate_name};
use chrono::Utc;
use uuid::Uuid;

impl Service {
    /// Register an installed theme package. The settings schema is snapshotted from the
    /// package at registration time.
    pub async fn register_theme(
        &self,
        code: &str,
        name: &str,
        version: &str,
        package_code: Option<&str>,
    ) -> Result<Theme, ThemeEngineError> {
        validate_identifier("theme code", code)?;
        validate_name("theme name", name)?;
        validate_name("theme version", version)?;
        let package_code = package_code.unwrap_or(code);
        validate_identifier("package code", package_code)?;

        if self
            .repos
            .themes
            .exists(code)
            .await
            .map_err(internal("check theme exists"))?
        {
            return Err(ThemeEngineError::conflict(format!(
                "theme '{}' is already registered",
                code
            )));
        }

        let mut warnings = Vec::new();
        let settings_schema = absorb(
            self.packages.settings_schema(package_code).await,
            &mut warnings,
        )?
        .unwrap_or_default();

        let theme = Theme {
            code: code.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            package_code: package_code.to_string(),
            settings_schema,
            created_at: Utc::now(),
        };
        let created = self
            .repos
            .themes
            .create(&theme)
            .await
            .map_err(internal("create theme"))?;

        tracing::info!(code, package_code, settings = created.settings_schema.settings.len(), "registered theme");
        Ok(created)
    }

    pub async fn get_theme(&self, code: &str) -> Result<Theme, ThemeEngineError> {
        self.repos
            .themes
            .find_by_code(code)
            .await
            .map_err(internal("find theme"))?
            .ok_or_else(|| ThemeEngineError::not_found("theme", code))
    }

    pub async fn list_themes(&self) -> Result<Vec<Theme>, ThemeEngineError> {
        self.repos
            .themes
            .list_all()
            .await
            .map_err(internal("list themes"))
    }

    /// Register a copy of a theme under a new code. The copy keeps reading the source
    /// theme's package.
    pub async fn duplicate_theme(
        &self,
        source_code: &str,
        new_code: &str,
        new_name: &str,
    ) -> Result<Theme, ThemeEngineError> {
        validate_identifier("theme code", new_code)?;
        validate_name("theme name", new_name)?;
        let source = self.get_theme(source_code).await?;

        if self
            .repos
            .themes
            .exists(new_code)
            .await
            .map_err(internal("check theme exists"))?
        {
            return Err(ThemeEngineError::conflict(format!(
                "theme '{}' is already registered",
                new_code
            )));
        }

        let copy = Theme {
            code: new_code.to_string(),
            name: new_name.to_string(),
            version: source.version,
            package_code: source.package_code,
            settings_schema: source.settings_schema,
            created_at: Utc::now(),
        };
        self.repos
            .themes
            .create(&copy)
            .await
            .map_err(internal("create theme"))
    }

    /// The store's active customization, if it has an active theme
    pub async fn get_active_customization(
        &self,
        store_id: Uuid,
    ) -> Result<Option<ThemeCustomization>, ThemeEngineError> {
        self.repos
            .customizations
            .find_active(store_id)
            .await
            .map_err(internal("find active customization"))
    }

    /// Make `theme_code` the store's active theme.
    ///
    /// Settings keys the target theme declares keep the store's current values; keys it
    /// does not declare are dropped; the rest take the target's defaults. Reactivating
    /// the active theme changes nothing.
    pub async fn switch_theme(
        &self,
        store_id: Uuid,
        theme_code: &str,
    ) -> Result<ThemeCustomization, ThemeEngineError> {
        validate_identifier("theme code", theme_code)?;

        let active = self.get_active_customization(store_id).await?;
        if let Some(active) = active.as_ref().filter(|c| c.theme_code == theme_code) {
            return Ok(active.clone());
        }

        let schema = self.target_schema(theme_code).await?;
        let current = active
            .as_ref()
            .map(|c| flatten_settings(&c.settings))
            .unwrap_or_default();
        let from_theme_code = active.as_ref().map(|c| c.theme_code.clone());
        let merged = migrate(
            &current,
            &schema.defaults(),
            from_theme_code.as_deref().unwrap_or_default(),
            theme_code,
        );

        let existing = self
            .repos
            .customizations
            .find(store_id, theme_code)
            .await
            .map_err(internal("find customization"))?;
        let target = ThemeCustomization {
            id: existing.map(|c| c.id).unwrap_or_else(Uuid::new_v4),
            store_id,
            theme_code: theme_code.to_string(),
            settings: unflatten_settings(&merged),
            is_active: true,
            updated_at: Utc::now(),
        };
        let activated = self
            .repos
            .customizations
            .activate(&target)
            .await
            .map_err(internal("activate customization"))?;

        tracing::info!(
            %store_id,
            from = from_theme_code.as_deref().unwrap_or("-"),
            to = theme_code,
            kept = merged.len(),
            "switched theme"
        );
        self.publish(ThemeEvent::ThemeSwitched(ThemeSwitchedEvent {
            store_id,
            from_theme_code,
            to_theme_code: theme_code.to_string(),
            timestamp: Utc::now(),
        }))
        .await;
        Ok(activated)
    }

    /// Registered schema snapshot, else whatever the package ships. A theme that is
    /// neither registered nor installed as a package is NotFound.
    pub(super) async fn target_schema(
        &self,
        theme_code: &str,
    ) -> Result<SettingsSchema, ThemeEngineError> {
        let theme = self
            .repos
            .themes
            .find_by_code(theme_code)
            .await
            .map_err(internal("find theme"))?;
        if let Some(theme) = theme {
            return Ok(theme.settings_schema);
        }

        let mut warnings = Vec::new();
        match absorb(self.packages.settings_schema(theme_code).await, &mut warnings)? {
            Some(schema) => Ok(schema),
            // a malformed schema still proves the package is installed
            None if !warnings.is_empty() => Ok(SettingsSchema::default()),
            None => Err(ThemeEngineError::not_found("theme", theme_code)),
        }
    }
}
