//! Contract models for the theme engine
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models. Settings payloads are carried as
//! `serde_json::Value` because their shape is owned by each theme.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Installed theme
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Unique theme code (e.g. "dawn")
    pub code: String,
    /// Display name
    pub name: String,
    /// Semantic version of the package
    pub version: String,
    /// Package directory the defaults are read from (differs from `code` for duplicates)
    pub package_code: String,
    /// Settings schema snapshot taken when the theme was registered
    pub settings_schema: SettingsSchema,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

/// Ordered list of dotted setting keys declared by a theme
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsSchema {
    pub settings: Vec<SettingDefinition>,
}

/// One entry of a theme settings schema
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDefinition {
    /// Dotted key path (e.g. "colors.primary")
    pub key: String,
    /// Declared value kind
    pub kind: SettingKind,
    /// Default value used when the store has no value for the key
    pub default: serde_json::Value,
}

/// Value kinds a theme can declare for a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Color,
    Font,
    Text,
    Number,
    Boolean,
    Select,
    Json,
}

impl SettingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Font => "font",
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::Json => "json",
        }
    }

    /// Unknown kinds are carried as `Json`
    pub fn parse(value: &str) -> Self {
        match value {
            "color" => Self::Color,
            "font" => Self::Font,
            "text" | "textarea" | "richtext" => Self::Text,
            "number" | "range" => Self::Number,
            "boolean" | "checkbox" => Self::Boolean,
            "select" | "radio" => Self::Select,
            _ => Self::Json,
        }
    }
}

/// Flat settings keyed by dotted path
pub type FlatSettings = BTreeMap<String, serde_json::Value>;

impl SettingsSchema {
    /// Defaults for every declared key
    pub fn defaults(&self) -> FlatSettings {
        self.settings
            .iter()
            .map(|def| (def.key.clone(), def.default.clone()))
            .collect()
    }
}

/// A store's page template (one per page type, one of them default)
#[derive(Debug, Clone, PartialEq)]
pub struct StoreTemplate {
    pub id: Uuid,
    pub store_id: Uuid,
    pub theme_code: String,
    /// Page type ("homepage", "product", "collection", ...)
    pub template_type: String,
    pub name: String,
    pub is_default: bool,
    pub enabled: bool,
    pub settings: serde_json::Value,
    pub seo_settings: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a store template; `None` leaves the field untouched
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub enabled: Option<bool>,
    pub settings: Option<serde_json::Value>,
    pub seo_settings: Option<serde_json::Value>,
}

/// A section placed in a store template
#[derive(Debug, Clone, PartialEq)]
pub struct SectionInstance {
    pub id: Uuid,
    pub template_id: Uuid,
    pub section_type: String,
    /// 0-based, contiguous within the template
    pub position: i32,
    pub enabled: bool,
    pub settings: serde_json::Value,
}

/// Partial update of a section
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SectionPatch {
    pub enabled: Option<bool>,
    pub settings: Option<serde_json::Value>,
}

/// Persisted (flat) block row
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: Uuid,
    pub section_id: Uuid,
    /// `None` for top-level blocks of the section
    pub parent_id: Option<Uuid>,
    pub block_type: String,
    /// Position within its sibling group
    pub position: i32,
    pub enabled: bool,
    pub settings: serde_json::Value,
}

/// Block in its editing/rendering tree form
#[derive(Debug, Clone, PartialEq)]
pub struct NestedBlock {
    pub id: Uuid,
    pub block_type: String,
    pub settings: serde_json::Value,
    pub enabled: bool,
    pub position: i32,
    pub children: Vec<NestedBlock>,
}

/// A section as it appears in a theme package or preset (no database ids)
#[derive(Debug, Clone, PartialEq)]
pub struct SectionDefinition {
    pub section_type: String,
    pub enabled: bool,
    pub settings: serde_json::Value,
    pub blocks: Vec<BlockDefinition>,
}

/// A block literal from a theme package or preset
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDefinition {
    pub block_type: String,
    pub enabled: bool,
    pub settings: serde_json::Value,
    pub children: Vec<BlockDefinition>,
}

/// JSON-file default template baked into a theme package
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultTemplate {
    pub template_type: String,
    pub name: Option<String>,
    pub sections: Vec<SectionDefinition>,
}

/// Shared section (header/footer/announcement bar) attached to every template of a theme
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSection {
    pub id: Uuid,
    pub store_id: Uuid,
    pub theme_code: String,
    pub section_type: String,
    pub enabled: bool,
    pub settings: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Fixed slots for global sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalSlot {
    AnnouncementBar,
    Header,
    Footer,
}

impl GlobalSlot {
    pub const ALL: [GlobalSlot; 3] = [Self::AnnouncementBar, Self::Header, Self::Footer];

    /// Section type stored for the slot
    pub fn section_type(&self) -> &'static str {
        match self {
            Self::AnnouncementBar => "announcement-bar",
            Self::Header => "header",
            Self::Footer => "footer",
        }
    }

    pub fn from_section_type(section_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.section_type() == section_type)
    }
}

/// Where a resolved global section came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalSource {
    Stored,
    ThemeDefault,
}

/// Global section ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGlobalSection {
    /// Row id for stored sections, ephemeral id for theme defaults
    pub id: Uuid,
    pub slot: GlobalSlot,
    pub section_type: String,
    pub enabled: bool,
    pub settings: serde_json::Value,
    pub blocks: Vec<NestedBlock>,
    pub source: GlobalSource,
}

/// Global sections for one store/theme
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalSectionSet {
    pub announcement_bar: Option<ResolvedGlobalSection>,
    pub header: Option<ResolvedGlobalSection>,
    pub footer: Option<ResolvedGlobalSection>,
    /// Package files that could not be read; their slots are left empty
    pub warnings: Vec<IntegrityWarning>,
}

impl GlobalSectionSet {
    pub fn get(&self, slot: GlobalSlot) -> Option<&ResolvedGlobalSection> {
        match slot {
            GlobalSlot::AnnouncementBar => self.announcement_bar.as_ref(),
            GlobalSlot::Header => self.header.as_ref(),
            GlobalSlot::Footer => self.footer.as_ref(),
        }
    }

    pub fn set(&mut self, slot: GlobalSlot, section: Option<ResolvedGlobalSection>) {
        match slot {
            GlobalSlot::AnnouncementBar => self.announcement_bar = section,
            GlobalSlot::Header => self.header = section,
            GlobalSlot::Footer => self.footer = section,
        }
    }
}

/// Which rule of the resolver produced a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    /// Default template row of the store
    Entity,
    /// Non-default template row of the store
    StoreDefault,
    /// Ephemeral template built from the theme package
    ThemeDefault,
}

impl TemplateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::StoreDefault => "store-default",
            Self::ThemeDefault => "theme-default",
        }
    }
}

/// Result of template resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub template: StoreTemplate,
    pub source: TemplateSource,
}

impl Resolution {
    /// Whether `template` exists as a database row
    pub fn is_persisted(&self) -> bool {
        self.source != TemplateSource::ThemeDefault
    }
}

/// Section of a compiled template
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSection {
    pub id: Uuid,
    pub section_type: String,
    pub settings: serde_json::Value,
    pub enabled: bool,
    pub position: i32,
    pub blocks: Vec<NestedBlock>,
}

/// Non-fatal data problem found while serving a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityWarning {
    /// What was affected (package file, backup id, ...)
    pub subject: String,
    pub message: String,
}

/// Render-ready template
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTemplate {
    pub template_type: String,
    /// `None` when compiled from the theme package only
    pub template_id: Option<Uuid>,
    pub source: TemplateSource,
    pub sections: Vec<CompiledSection>,
    pub global_sections: Option<GlobalSectionSet>,
    pub warnings: Vec<IntegrityWarning>,
}

/// One entry of the render order produced by [`CompiledTemplate::render_sections`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderSection<'a> {
    Global(&'a ResolvedGlobalSection),
    Body(&'a CompiledSection),
}

impl CompiledTemplate {
    /// Enabled sections in render order: announcement bar, header, body, footer.
    ///
    /// Body sections whose type matches a present global slot are skipped here so shared
    /// chrome renders once; the rows themselves are left alone.
    pub fn render_sections(&self) -> Vec<RenderSection<'_>> {
        let globals = self.global_sections.as_ref();
        let global = |slot: GlobalSlot| {
            globals
                .and_then(|set| set.get(slot))
                .filter(|section| section.enabled)
        };

        let mut out = Vec::with_capacity(self.sections.len() + 3);
        for slot in [GlobalSlot::AnnouncementBar, GlobalSlot::Header] {
            if let Some(section) = global(slot) {
                out.push(RenderSection::Global(section));
            }
        }

        let mut body: Vec<&CompiledSection> = self
            .sections
            .iter()
            .filter(|section| section.enabled)
            .filter(|section| match GlobalSlot::from_section_type(&section.section_type) {
                Some(slot) => global(slot).is_none(),
                None => true,
            })
            .collect();
        body.sort_by_key(|section| section.position);
        out.extend(body.into_iter().map(RenderSection::Body));

        if let Some(section) = global(GlobalSlot::Footer) {
            out.push(RenderSection::Global(section));
        }
        out
    }
}

/// Options for [`crate::domain::Service::get_compiled_template`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Attach global sections (header/footer/announcement bar)
    pub include_global: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            include_global: true,
        }
    }
}

/// Per-store settings for one theme
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeCustomization {
    pub id: Uuid,
    pub store_id: Uuid,
    pub theme_code: String,
    /// Nested JSON object; converted to dotted keys for migration
    pub settings: serde_json::Value,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

/// Bundled starting configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub id: String,
    pub name: String,
    /// Theme the preset targets; the store's active theme when absent
    pub theme_code: Option<String>,
    /// Palette entries, stored as `colors.<name>`
    pub colors: BTreeMap<String, String>,
    /// Font choices, stored as `typography.<name>`
    pub fonts: BTreeMap<String, String>,
    pub templates: Vec<PresetTemplate>,
}

/// Template layout carried by a preset
#[derive(Debug, Clone, PartialEq)]
pub struct PresetTemplate {
    pub template_type: String,
    pub sections: Vec<SectionDefinition>,
}

/// Options for [`crate::domain::Service::apply_preset`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresetOptions {
    /// Keep existing templates and only add missing template types
    pub preserve_existing: bool,
}

/// What a preset application changed
#[derive(Debug, Clone, PartialEq)]
pub struct PresetOutcome {
    pub preset_id: String,
    pub theme_code: String,
    /// Template types created by this application
    pub created_templates: Vec<String>,
    /// Template types skipped because the store already had them
    pub skipped_templates: Vec<String>,
    /// Number of templates removed (destructive mode only)
    pub removed_templates: u64,
}

/// Immutable snapshot of a store's theme state
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeBackup {
    pub id: Uuid,
    pub store_id: Uuid,
    pub theme_code: String,
    pub name: String,
    pub description: Option<String>,
    pub settings: serde_json::Value,
    pub customizations: serde_json::Value,
    /// SHA-256 hex over (settings, customizations)
    pub checksum: String,
    pub created_at: DateTime<Utc>,
}

/// Name and description of a new backup
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackupOptions {
    pub name: String,
    pub description: Option<String>,
}

/// Checksum verdict for a backup read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupIntegrity {
    Intact,
    Corrupted(IntegrityWarning),
}

/// Backup plus its checksum verdict
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedBackup {
    pub backup: ThemeBackup,
    pub integrity: BackupIntegrity,
}

impl VerifiedBackup {
    pub fn is_intact(&self) -> bool {
        self.integrity == BackupIntegrity::Intact
    }
}

/// Kind of change recorded in theme file history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChangeType {
    Create,
    Update,
    /// Content captured right before a restore overwrote it
    PreRestore,
    /// Content written by a restore
    Restore,
}

impl FileChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::PreRestore => "pre_restore",
            Self::Restore => "restore",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "pre_restore" => Some(Self::PreRestore),
            "restore" => Some(Self::Restore),
            _ => None,
        }
    }
}

/// Append-only history entry for a raw theme file
#[derive(Debug, Clone, PartialEq)]
pub struct FileHistoryEntry {
    pub id: Uuid,
    pub store_id: Uuid,
    pub theme_code: String,
    pub file_path: String,
    /// Per-file counter assigned on append, starting at 1
    pub version: i32,
    pub content: String,
    pub change_type: FileChangeType,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a batch import; failures do not abort the batch
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub imported: Vec<Uuid>,
    /// (index in the request, error)
    pub failed: Vec<(usize, crate::contract::ThemeEngineError)>,
}
