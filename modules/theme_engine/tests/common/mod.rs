//! Common test utilities: in-memory repositories, a recording event publisher and a
//! sample theme package

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use theme_engine::config::Config;
use theme_engine::contract::*;
use theme_engine::domain::repository::*;
use theme_engine::domain::{EventPublisher, Repositories, Service, ThemeEvent};
use theme_engine::infra::files::InMemoryThemeFileStore;
use theme_engine::infra::packages::InMemoryThemePackages;
use uuid::Uuid;

pub fn print_test_header(test_name: &str, purpose: &str) {
    println!("\n🧪 TEST: {}", test_name);
    println!("📋 PURPOSE: {}", purpose);
}

// ===== In-memory repositories =====

#[derive(Default)]
pub struct State {
    pub themes: Vec<Theme>,
    pub templates: Vec<StoreTemplate>,
    pub sections: Vec<SectionInstance>,
    pub blocks: Vec<Block>,
    pub globals: Vec<GlobalSection>,
    pub customizations: Vec<ThemeCustomization>,
    pub backups: Vec<ThemeBackup>,
    pub history: Vec<FileHistoryEntry>,
}

impl State {
    fn insert_layout(&mut self, layout: &TemplateLayout) {
        let template = &layout.template;
        if template.is_default {
            self.unset_default(template.store_id, &template.template_type);
        }
        self.templates.push(template.clone());
        self.insert_sections(&layout.sections);
    }

    fn insert_sections(&mut self, sections: &[MaterializedSection]) {
        for materialized in sections {
            self.sections.push(materialized.section.clone());
            self.blocks.extend(materialized.blocks.iter().cloned());
        }
    }

    fn unset_default(&mut self, store_id: Uuid, template_type: &str) {
        for template in self
            .templates
            .iter_mut()
            .filter(|t| t.store_id == store_id && t.template_type == template_type)
        {
            template.is_default = false;
        }
    }

    fn delete_sections_of(&mut self, template_ids: &[Uuid]) {
        let section_ids: HashSet<Uuid> = self
            .sections
            .iter()
            .filter(|s| template_ids.contains(&s.template_id))
            .map(|s| s.id)
            .collect();
        self.blocks.retain(|b| !section_ids.contains(&b.section_id));
        self.sections.retain(|s| !section_ids.contains(&s.id));
    }

    fn delete_templates(&mut self, template_ids: &[Uuid]) -> u64 {
        self.delete_sections_of(template_ids);
        let before = self.templates.len();
        self.templates.retain(|t| !template_ids.contains(&t.id));
        (before - self.templates.len()) as u64
    }

    fn upsert_customization(&mut self, customization: &ThemeCustomization) {
        if customization.is_active {
            for other in self
                .customizations
                .iter_mut()
                .filter(|c| c.store_id == customization.store_id)
            {
                other.is_active = false;
            }
        }
        self.customizations.retain(|c| {
            !(c.store_id == customization.store_id && c.theme_code == customization.theme_code)
        });
        self.customizations.push(customization.clone());
    }

    fn sorted_sections(&self, template_id: Uuid) -> Vec<SectionInstance> {
        let mut sections: Vec<SectionInstance> = self
            .sections
            .iter()
            .filter(|s| s.template_id == template_id)
            .cloned()
            .collect();
        sections.sort_by_key(|s| s.position);
        sections
    }

    fn renumber(&mut self, template_id: Uuid) {
        let ordered: Vec<Uuid> = self.sorted_sections(template_id).iter().map(|s| s.id).collect();
        for (position, id) in ordered.iter().enumerate() {
            if let Some(section) = self.sections.iter_mut().find(|s| s.id == *id) {
                section.position = position as i32;
            }
        }
    }
}

/// Every repository trait backed by one lock, so multi-row writes are atomic
#[derive(Default)]
pub struct MockStore {
    pub state: RwLock<State>,
}

impl MockStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            themes: self.clone(),
            templates: self.clone(),
            sections: self.clone(),
            globals: self.clone(),
            customizations: self.clone(),
            layouts: self.clone(),
            backups: self.clone(),
            file_history: self.clone(),
        }
    }

    pub fn template_count(&self, store_id: Uuid) -> usize {
        self.state
            .read()
            .templates
            .iter()
            .filter(|t| t.store_id == store_id)
            .count()
    }

    pub fn section_count(&self) -> usize {
        self.state.read().sections.len()
    }

    pub fn block_count(&self) -> usize {
        self.state.read().blocks.len()
    }

    pub fn active_customizations(&self, store_id: Uuid) -> Vec<ThemeCustomization> {
        self.state
            .read()
            .customizations
            .iter()
            .filter(|c| c.store_id == store_id && c.is_active)
            .cloned()
            .collect()
    }

    /// Tamper with a stored backup without touching its checksum
    pub fn tamper_backup(&self, backup_id: Uuid, settings: serde_json::Value) {
        if let Some(backup) = self.state.write().backups.iter_mut().find(|b| b.id == backup_id) {
            backup.settings = settings;
        }
    }
}

#[async_trait]
impl ThemeRepository for MockStore {
    async fn create(&self, theme: &Theme) -> anyhow::Result<Theme> {
        self.state.write().themes.push(theme.clone());
        Ok(theme.clone())
    }

    async fn find_by_code(&self, code: &str) -> anyhow::Result<Option<Theme>> {
        Ok(self.state.read().themes.iter().find(|t| t.code == code).cloned())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Theme>> {
        let mut themes = self.state.read().themes.clone();
        themes.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(themes)
    }

    async fn exists(&self, code: &str) -> anyhow::Result<bool> {
        Ok(self.state.read().themes.iter().any(|t| t.code == code))
    }
}

#[async_trait]
impl TemplateRepository for MockStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<StoreTemplate>> {
        Ok(self.state.read().templates.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_type(
        &self,
        store_id: Uuid,
        template_type: &str,
    ) -> anyhow::Result<Vec<StoreTemplate>> {
        let mut found: Vec<StoreTemplate> = self
            .state
            .read()
            .templates
            .iter()
            .filter(|t| t.store_id == store_id && t.template_type == template_type)
            .cloned()
            .collect();
        // Stable: insertion order stands in for created_at
        found.sort_by_key(|t| !t.is_default);
        Ok(found)
    }

    async fn list_for_store(
        &self,
        store_id: Uuid,
        theme_code: Option<&str>,
    ) -> anyhow::Result<Vec<StoreTemplate>> {
        Ok(self
            .state
            .read()
            .templates
            .iter()
            .filter(|t| t.store_id == store_id)
            .filter(|t| theme_code.map_or(true, |code| t.theme_code == code))
            .cloned()
            .collect())
    }

    async fn create(&self, layout: &TemplateLayout) -> anyhow::Result<StoreTemplate> {
        self.state.write().insert_layout(layout);
        Ok(layout.template.clone())
    }

    async fn update(&self, template: &StoreTemplate) -> anyhow::Result<StoreTemplate> {
        let mut state = self.state.write();
        let row = state
            .templates
            .iter_mut()
            .find(|t| t.id == template.id)
            .ok_or_else(|| anyhow::anyhow!("template {} not found", template.id))?;
        let is_default = row.is_default;
        *row = template.clone();
        row.is_default = is_default;
        Ok(row.clone())
    }

    async fn set_default(&self, template_id: Uuid) -> anyhow::Result<()> {
        let mut state = self.state.write();
        let (store_id, template_type) = state
            .templates
            .iter()
            .find(|t| t.id == template_id)
            .map(|t| (t.store_id, t.template_type.clone()))
            .ok_or_else(|| anyhow::anyhow!("template {} not found", template_id))?;
        state.unset_default(store_id, &template_type);
        if let Some(template) = state.templates.iter_mut().find(|t| t.id == template_id) {
            template.is_default = true;
        }
        Ok(())
    }

    async fn delete(&self, template_id: Uuid) -> anyhow::Result<()> {
        self.state.write().delete_templates(&[template_id]);
        Ok(())
    }

    async fn replace_sections(
        &self,
        template_id: Uuid,
        sections: &[MaterializedSection],
    ) -> anyhow::Result<()> {
        let mut state = self.state.write();
        state.delete_sections_of(&[template_id]);
        state.insert_sections(sections);
        Ok(())
    }
}

#[async_trait]
impl SectionRepository for MockStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<SectionInstance>> {
        Ok(self.state.read().sections.iter().find(|s| s.id == id).cloned())
    }

    async fn list_for_template(&self, template_id: Uuid) -> anyhow::Result<Vec<SectionInstance>> {
        Ok(self.state.read().sorted_sections(template_id))
    }

    async fn insert(&self, materialized: &MaterializedSection) -> anyhow::Result<SectionInstance> {
        let mut state = self.state.write();
        let template_id = materialized.section.template_id;
        let count = state
            .sections
            .iter()
            .filter(|s| s.template_id == template_id)
            .count() as i32;
        let position = materialized.section.position.clamp(0, count);
        for section in state
            .sections
            .iter_mut()
            .filter(|s| s.template_id == template_id && s.position >= position)
        {
            section.position += 1;
        }
        let mut section = materialized.section.clone();
        section.position = position;
        state.sections.push(section.clone());
        state.blocks.extend(materialized.blocks.iter().cloned());
        Ok(section)
    }

    async fn update(&self, section: &SectionInstance) -> anyhow::Result<SectionInstance> {
        let mut state = self.state.write();
        let row = state
            .sections
            .iter_mut()
            .find(|s| s.id == section.id)
            .ok_or_else(|| anyhow::anyhow!("section {} not found", section.id))?;
        row.enabled = section.enabled;
        row.settings = section.settings.clone();
        Ok(row.clone())
    }

    async fn delete_and_compact(&self, section_id: Uuid) -> anyhow::Result<()> {
        let mut state = self.state.write();
        let Some(template_id) = state
            .sections
            .iter()
            .find(|s| s.id == section_id)
            .map(|s| s.template_id)
        else {
            return Ok(());
        };
        state.blocks.retain(|b| b.section_id != section_id);
        state.sections.retain(|s| s.id != section_id);
        state.renumber(template_id);
        Ok(())
    }

    async fn reorder(&self, _template_id: Uuid, ordered_ids: &[Uuid]) -> anyhow::Result<()> {
        let mut state = self.state.write();
        for (position, id) in ordered_ids.iter().enumerate() {
            if let Some(section) = state.sections.iter_mut().find(|s| s.id == *id) {
                section.position = position as i32;
            }
        }
        Ok(())
    }

    async fn list_blocks(&self, section_ids: &[Uuid]) -> anyhow::Result<Vec<Block>> {
        Ok(self
            .state
            .read()
            .blocks
            .iter()
            .filter(|b| section_ids.contains(&b.section_id))
            .cloned()
            .collect())
    }

    async fn find_blocks(&self, block_ids: &[Uuid]) -> anyhow::Result<Vec<Block>> {
        Ok(self
            .state
            .read()
            .blocks
            .iter()
            .filter(|b| block_ids.contains(&b.id))
            .cloned()
            .collect())
    }

    async fn replace_blocks(&self, section_id: Uuid, blocks: &[Block]) -> anyhow::Result<()> {
        let mut state = self.state.write();
        state.blocks.retain(|b| b.section_id != section_id);
        state.blocks.extend(blocks.iter().cloned());
        Ok(())
    }
}

#[async_trait]
impl GlobalSectionRepository for MockStore {
    async fn find(
        &self,
        store_id: Uuid,
        theme_code: &str,
        section_type: &str,
    ) -> anyhow::Result<Option<GlobalSection>> {
        Ok(self
            .state
            .read()
            .globals
            .iter()
            .find(|g| {
                g.store_id == store_id && g.theme_code == theme_code && g.section_type == section_type
            })
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<GlobalSection>> {
        Ok(self.state.read().globals.iter().find(|g| g.id == id).cloned())
    }

    async fn list(&self, store_id: Uuid, theme_code: &str) -> anyhow::Result<Vec<GlobalSection>> {
        Ok(self
            .state
            .read()
            .globals
            .iter()
            .filter(|g| g.store_id == store_id && g.theme_code == theme_code)
            .cloned()
            .collect())
    }

    async fn upsert(&self, section: &GlobalSection) -> anyhow::Result<GlobalSection> {
        let mut state = self.state.write();
        state.globals.retain(|g| {
            !(g.store_id == section.store_id
                && g.theme_code == section.theme_code
                && g.section_type == section.section_type)
        });
        state.globals.push(section.clone());
        Ok(section.clone())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        self.state.write().globals.retain(|g| g.id != id);
        Ok(())
    }
}

#[async_trait]
impl CustomizationRepository for MockStore {
    async fn find_active(&self, store_id: Uuid) -> anyhow::Result<Option<ThemeCustomization>> {
        Ok(self
            .state
            .read()
            .customizations
            .iter()
            .find(|c| c.store_id == store_id && c.is_active)
            .cloned())
    }

    async fn find(
        &self,
        store_id: Uuid,
        theme_code: &str,
    ) -> anyhow::Result<Option<ThemeCustomization>> {
        Ok(self
            .state
            .read()
            .customizations
            .iter()
            .find(|c| c.store_id == store_id && c.theme_code == theme_code)
            .cloned())
    }

    async fn upsert(
        &self,
        customization: &ThemeCustomization,
    ) -> anyhow::Result<ThemeCustomization> {
        let mut state = self.state.write();
        state.customizations.retain(|c| {
            !(c.store_id == customization.store_id && c.theme_code == customization.theme_code)
        });
        state.customizations.push(customization.clone());
        Ok(customization.clone())
    }

    async fn activate(
        &self,
        customization: &ThemeCustomization,
    ) -> anyhow::Result<ThemeCustomization> {
        let mut active = customization.clone();
        active.is_active = true;
        self.state.write().upsert_customization(&active);
        Ok(active)
    }
}

#[async_trait]
impl LayoutRepository for MockStore {
    async fn replace_layout(&self, replacement: &LayoutReplacement) -> anyhow::Result<LayoutOutcome> {
        let mut state = self.state.write();
        let mut outcome = LayoutOutcome::default();

        let existing: Vec<(Uuid, String)> = state
            .templates
            .iter()
            .filter(|t| t.store_id == replacement.store_id)
            .filter(|t| {
                replacement.mode != LayoutMode::ReplaceTheme || t.theme_code == replacement.theme_code
            })
            .map(|t| (t.id, t.template_type.clone()))
            .collect();

        let kept_types: HashSet<String> = match replacement.mode {
            LayoutMode::ReplaceStore | LayoutMode::ReplaceTheme => {
                let ids: Vec<Uuid> = existing.iter().map(|(id, _)| *id).collect();
                outcome.removed_templates = state.delete_templates(&ids);
                HashSet::new()
            }
            LayoutMode::MergeMissing => existing.into_iter().map(|(_, t)| t).collect(),
        };

        for layout in &replacement.templates {
            let template_type = &layout.template.template_type;
            if kept_types.contains(template_type) {
                outcome.skipped_types.push(template_type.clone());
                continue;
            }
            state.insert_layout(layout);
            outcome.inserted_types.push(template_type.clone());
        }

        if let Some(customization) = &replacement.customization {
            state.upsert_customization(customization);
        }
        Ok(outcome)
    }
}

#[async_trait]
impl BackupRepository for MockStore {
    async fn create(&self, backup: &ThemeBackup) -> anyhow::Result<ThemeBackup> {
        self.state.write().backups.push(backup.clone());
        Ok(backup.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<ThemeBackup>> {
        Ok(self.state.read().backups.iter().find(|b| b.id == id).cloned())
    }

    async fn list(
        &self,
        store_id: Uuid,
        theme_code: &str,
        limit: u64,
    ) -> anyhow::Result<Vec<ThemeBackup>> {
        Ok(self
            .state
            .read()
            .backups
            .iter()
            .rev()
            .filter(|b| b.store_id == store_id && b.theme_code == theme_code)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FileHistoryRepository for MockStore {
    async fn append(&self, entry: &FileHistoryEntry) -> anyhow::Result<FileHistoryEntry> {
        let mut state = self.state.write();
        let version = state
            .history
            .iter()
            .filter(|h| {
                h.store_id == entry.store_id
                    && h.theme_code == entry.theme_code
                    && h.file_path == entry.file_path
            })
            .map(|h| h.version)
            .max()
            .unwrap_or(0)
            + 1;
        let mut stored = entry.clone();
        stored.version = version;
        state.history.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<FileHistoryEntry>> {
        Ok(self.state.read().history.iter().find(|h| h.id == id).cloned())
    }

    async fn find_version(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        version: i32,
    ) -> anyhow::Result<Option<FileHistoryEntry>> {
        Ok(self
            .state
            .read()
            .history
            .iter()
            .find(|h| {
                h.store_id == store_id
                    && h.theme_code == theme_code
                    && h.file_path == file_path
                    && h.version == version
            })
            .cloned())
    }

    async fn list_for_file(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        limit: u64,
    ) -> anyhow::Result<Vec<FileHistoryEntry>> {
        let mut entries: Vec<FileHistoryEntry> = self
            .state
            .read()
            .history
            .iter()
            .filter(|h| {
                h.store_id == store_id && h.theme_code == theme_code && h.file_path == file_path
            })
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.version.cmp(&a.version));
        entries.truncate(limit as usize);
        Ok(entries)
    }
}

// ===== Events =====

#[derive(Default)]
pub struct RecordingPublisher {
    pub events: RwLock<Vec<ThemeEvent>>,
}

impl RecordingPublisher {
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events
            .read()
            .iter()
            .map(|event| match event {
                ThemeEvent::TemplateMaterialized(_) => "template_materialized",
                ThemeEvent::TemplateChanged(_) => "template_changed",
                ThemeEvent::GlobalSectionChanged(_) => "global_section_changed",
                ThemeEvent::PresetApplied(_) => "preset_applied",
                ThemeEvent::ThemeSwitched(_) => "theme_switched",
                ThemeEvent::BackupRestored(_) => "backup_restored",
                ThemeEvent::FileRestored(_) => "file_restored",
            })
            .collect()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: ThemeEvent) -> anyhow::Result<()> {
        self.events.write().push(event);
        Ok(())
    }
}

/// Publisher whose transport is always down
pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _event: ThemeEvent) -> anyhow::Result<()> {
        anyhow::bail!("event bus unavailable")
    }
}

// ===== Harness =====

pub struct Harness {
    pub service: Arc<Service>,
    pub store: Arc<MockStore>,
    pub packages: Arc<InMemoryThemePackages>,
    pub files: Arc<InMemoryThemeFileStore>,
    pub events: Arc<RecordingPublisher>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_packages(sample_packages())
    }

    pub fn with_packages(packages: InMemoryThemePackages) -> Self {
        Self::build(packages, Config::default(), None)
    }

    pub fn with_config(config: Config) -> Self {
        Self::build(sample_packages(), config, None)
    }

    pub fn with_publisher(publisher: Arc<dyn EventPublisher>) -> Self {
        Self::build(sample_packages(), Config::default(), Some(publisher))
    }

    fn build(
        packages: InMemoryThemePackages,
        config: Config,
        publisher: Option<Arc<dyn EventPublisher>>,
    ) -> Self {
        let store = MockStore::new();
        let packages = Arc::new(packages);
        let files = Arc::new(InMemoryThemeFileStore::new());
        let events = Arc::new(RecordingPublisher::default());
        let publisher: Arc<dyn EventPublisher> = match publisher {
            Some(publisher) => publisher,
            None => events.clone(),
        };
        let service = Arc::new(Service::new(
            store.repositories(),
            packages.clone(),
            files.clone(),
            publisher,
            config,
        ));
        Self {
            service,
            store,
            packages,
            files,
            events,
        }
    }

    /// Register dawn and craft and make `theme_code` the store's active theme
    pub async fn store_on_theme(&self, theme_code: &str) -> Uuid {
        self.register_sample_themes().await;
        let store_id = Uuid::new_v4();
        self.service
            .switch_theme(store_id, theme_code)
            .await
            .unwrap();
        store_id
    }

    pub async fn register_sample_themes(&self) {
        for (code, name) in [("dawn", "Dawn"), ("craft", "Craft")] {
            if self.service.get_theme(code).await.is_err() {
                self.service
                    .register_theme(code, name, "1.0.0", None)
                    .await
                    .unwrap();
            }
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

// ===== Sample packages =====

/// Two themes and two presets:
///
/// - `dawn`: homepage and product JSON templates, header/footer/announcement-bar
///   defaults, a JSON Schema for `hero`, settings schema with colors, typography and
///   a dawn-only key
/// - `craft`: homepage template and header; settings schema sharing `colors.primary`
/// - presets `fashion` (dawn) and `minimal` (no theme)
pub fn sample_packages() -> InMemoryThemePackages {
    InMemoryThemePackages::new()
        .with_template(
            "dawn",
            "homepage",
            json!({
                "name": "Home page",
                "sections": [
                    {"type": "hero", "settings": {"heading": "Welcome"}, "blocks": [
                        {"type": "button", "settings": {"label": "Shop now"}}
                    ]},
                    {"type": "slideshow", "blocks": [
                        {"type": "slide", "settings": {"heading": "Summer"}, "blocks": [
                            {"type": "button", "settings": {"label": "Explore"}}
                        ]},
                        {"type": "slide", "settings": {"heading": "Winter"}}
                    ]},
                    {"type": "newsletter", "enabled": false}
                ]
            }),
        )
        .with_template(
            "dawn",
            "product",
            json!({"sections": [{"type": "product-main"}, {"type": "related-products"}]}),
        )
        .with_global_section(
            "dawn",
            "header",
            json!({"type": "header", "settings": {"sticky": true}, "blocks": [
                {"type": "menu", "settings": {"handle": "main-menu"}}
            ]}),
        )
        .with_global_section("dawn", "footer", json!({"type": "footer", "settings": {"copyright": "Dawn"}}))
        .with_global_section(
            "dawn",
            "announcement-bar",
            json!({"type": "announcement-bar", "settings": {"text": "Free shipping"}}),
        )
        .with_section_schema(
            "dawn",
            "hero",
            json!({
                "type": "object",
                "properties": {"heading": {"type": "string", "maxLength": 80}}
            }),
        )
        .with_settings_schema(
            "dawn",
            json!({"settings": [
                {"id": "colors.primary", "type": "color", "default": "#000000"},
                {"id": "colors.background", "type": "color", "default": "#ffffff"},
                {"id": "typography.heading", "type": "font", "default": "Assistant"},
                {"id": "dawn.cart_type", "type": "select", "default": "drawer"}
            ]}),
        )
        .with_template(
            "craft",
            "homepage",
            json!({"sections": [{"type": "image-banner"}, {"type": "featured-collection"}]}),
        )
        .with_global_section("craft", "header", json!({"type": "header", "settings": {"sticky": false}}))
        .with_settings_schema(
            "craft",
            json!({"settings": [
                {"id": "colors.primary", "type": "color", "default": "#334fb4"},
                {"id": "colors.accent", "type": "color", "default": "#f5c518"},
                {"id": "craft.grain", "type": "range", "default": 3}
            ]}),
        )
        .with_preset(
            "fashion",
            json!({
                "name": "Fashion",
                "theme_code": "dawn",
                "colors": {"primary": "#111111", "accent": "#c8a165"},
                "fonts": {"heading": "Playfair Display"},
                "templates": {
                    "homepage": {"sections": [
                        {"type": "hero", "settings": {"heading": "New season"}},
                        {"type": "featured-collection", "blocks": [{"type": "product-card"}]}
                    ]},
                    "collection": {"sections": [{"type": "collection-grid"}]}
                }
            }),
        )
        .with_preset(
            "minimal",
            json!({
                "name": "Minimal",
                "colors": {"primary": "#222222"},
                "templates": {"homepage": {"sections": [{"type": "rich-text"}]}}
            }),
        )
}

/// Section literal with no blocks
pub fn section(section_type: &str, settings: serde_json::Value) -> SectionDefinition {
    SectionDefinition {
        section_type: section_type.to_string(),
        enabled: true,
        settings,
        blocks: Vec::new(),
    }
}

/// Types of a compiled template's sections in position order
pub fn section_types(compiled: &CompiledTemplate) -> Vec<String> {
    let mut sections: Vec<&CompiledSection> = compiled.sections.iter().collect();
    sections.sort_by_key(|s| s.position);
    sections.iter().map(|s| s.section_type.clone()).collect()
}
