//! Domain events for the theme engine
//!
//! Events tell downstream consumers (storefront render caches, audit trail) that a
//! store's layout changed. Publishing failures are logged and never fail the operation
//! that produced the event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain event types for the theme engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ThemeEvent {
    /// A template row was created from theme defaults or reset to them
    TemplateMaterialized(TemplateEvent),
    /// A template's sections, blocks or flags changed
    TemplateChanged(TemplateEvent),
    /// A global section was saved or removed
    GlobalSectionChanged(GlobalSectionEvent),
    /// A preset was applied to a store
    PresetApplied(PresetAppliedEvent),
    /// The store's active theme changed
    ThemeSwitched(ThemeSwitchedEvent),
    /// A backup was written back over the live state
    BackupRestored(BackupEvent),
    /// A raw theme file was restored from history
    FileRestored(FileRestoredEvent),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEvent {
    pub store_id: Uuid,
    pub template_id: Uuid,
    pub template_type: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSectionEvent {
    pub store_id: Uuid,
    pub theme_code: String,
    pub section_type: String,
    pub deleted: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetAppliedEvent {
    pub store_id: Uuid,
    pub preset_id: String,
    pub preserve_existing: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSwitchedEvent {
    pub store_id: Uuid,
    pub from_theme_code: Option<String>,
    pub to_theme_code: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupEvent {
    pub store_id: Uuid,
    pub backup_id: Uuid,
    pub theme_code: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRestoredEvent {
    pub store_id: Uuid,
    pub theme_code: String,
    pub file_path: String,
    pub restored_version: i32,
    pub timestamp: DateTime<Utc>,
}

impl ThemeEvent {
    pub fn template_materialized(store_id: Uuid, template_id: Uuid, template_type: &str) -> Self {
        Self::TemplateMaterialized(TemplateEvent {
            store_id,
            template_id,
            template_type: template_type.to_string(),
            timestamp: Utc::now(),
        })
    }

    pub fn template_changed(store_id: Uuid, template_id: Uuid, template_type: &str) -> Self {
        Self::TemplateChanged(TemplateEvent {
            store_id,
            template_id,
            template_type: template_type.to_string(),
            timestamp: Utc::now(),
        })
    }

    pub fn global_section_changed(
        store_id: Uuid,
        theme_code: &str,
        section_type: &str,
        deleted: bool,
    ) -> Self {
        Self::GlobalSectionChanged(GlobalSectionEvent {
            store_id,
            theme_code: theme_code.to_string(),
            section_type: section_type.to_string(),
            deleted,
            timestamp: Utc::now(),
        })
    }

    /// Store the event refers to
    pub fn store_id(&self) -> Uuid {
        match self {
            Self::TemplateMaterialized(e) | Self::TemplateChanged(e) => e.store_id,
            Self::GlobalSectionChanged(e) => e.store_id,
            Self::PresetApplied(e) => e.store_id,
            Self::ThemeSwitched(e) => e.store_id,
            Self::BackupRestored(e) => e.store_id,
            Self::FileRestored(e) => e.store_id,
        }
    }
}

/// Event publisher trait for publishing domain events
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: ThemeEvent) -> anyhow::Result<()>;
}

/// No-op event publisher for testing or when events are disabled
pub struct NoOpEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: ThemeEvent) -> anyhow::Result<()> {
        Ok(())
    }
}
