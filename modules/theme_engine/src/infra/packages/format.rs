//! On-disk JSON formats of a theme package
//!
//! ```text
//! <root>/<package>/templates/<template_type>.json
//! <root>/<package>/globals/<section_type>.json
//! <root>/<package>/schemas/<section_type>.json
//! <root>/<package>/settings_schema.json
//! <root>/presets/<preset_id>.json
//! ```

use crate::contract::{
    BlockDefinition, DefaultTemplate, Preset, PresetTemplate, SectionDefinition,
    SettingDefinition, SettingKind, SettingsSchema,
};
use crate::domain::block_tree::split_nested_blocks;
use crate::domain::package::PackageError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub fn template_path(package_code: &str, template_type: &str) -> String {
    format!("{}/templates/{}.json", package_code, template_type)
}

pub fn global_section_path(package_code: &str, section_type: &str) -> String {
    format!("{}/globals/{}.json", package_code, section_type)
}

pub fn section_schema_path(package_code: &str, section_type: &str) -> String {
    format!("{}/schemas/{}.json", package_code, section_type)
}

pub fn settings_schema_path(package_code: &str) -> String {
    format!("{}/settings_schema.json", package_code)
}

pub fn preset_path(preset_id: &str) -> String {
    format!("presets/{}.json", preset_id)
}

/// Path components must stay inside their directory
pub fn is_safe_component(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(&['/', '\\', '\0'][..])
        && !name.contains("..")
}

#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    sections: Vec<SectionFile>,
}

#[derive(Debug, Deserialize)]
struct SectionFile {
    #[serde(rename = "type")]
    section_type: String,
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "empty_object")]
    settings: Value,
    #[serde(default)]
    blocks: Vec<BlockFile>,
}

#[derive(Debug, Deserialize)]
struct BlockFile {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "empty_object")]
    settings: Value,
    #[serde(default)]
    blocks: Vec<BlockFile>,
}

#[derive(Debug, Deserialize)]
struct SettingsSchemaFile {
    #[serde(default)]
    settings: Vec<SettingFile>,
}

#[derive(Debug, Deserialize)]
struct SettingFile {
    #[serde(alias = "id")]
    key: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    default: Value,
}

#[derive(Debug, Deserialize)]
struct PresetFile {
    name: String,
    #[serde(default)]
    theme_code: Option<String>,
    #[serde(default)]
    colors: BTreeMap<String, String>,
    #[serde(default)]
    fonts: BTreeMap<String, String>,
    /// Keyed by template type
    #[serde(default)]
    templates: BTreeMap<String, TemplateFile>,
}

fn default_true() -> bool {
    true
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

fn malformed(path: &str, reason: impl ToString) -> PackageError {
    PackageError::Malformed {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

fn parse<T: serde::de::DeserializeOwned>(path: &str, raw: &str) -> Result<T, PackageError> {
    serde_json::from_str(raw).map_err(|e| malformed(path, e))
}

pub fn parse_default_template(
    path: &str,
    template_type: &str,
    raw: &str,
) -> Result<DefaultTemplate, PackageError> {
    let file: TemplateFile = parse(path, raw)?;
    Ok(DefaultTemplate {
        template_type: template_type.to_string(),
        name: file.name,
        sections: convert_sections(path, file.sections)?,
    })
}

pub fn parse_global_section(path: &str, raw: &str) -> Result<SectionDefinition, PackageError> {
    let file: SectionFile = parse(path, raw)?;
    convert_section(path, file)
}

pub fn parse_settings_schema(path: &str, raw: &str) -> Result<SettingsSchema, PackageError> {
    let file: SettingsSchemaFile = parse(path, raw)?;
    Ok(SettingsSchema {
        settings: file
            .settings
            .into_iter()
            .map(|setting| SettingDefinition {
                kind: setting
                    .kind
                    .as_deref()
                    .map(SettingKind::parse)
                    .unwrap_or(SettingKind::Json),
                key: setting.key,
                default: setting.default,
            })
            .collect(),
    })
}

pub fn parse_section_schema(path: &str, raw: &str) -> Result<Value, PackageError> {
    let schema: Value = parse(path, raw)?;
    if !schema.is_object() {
        return Err(malformed(path, "JSON Schema must be an object"));
    }
    Ok(schema)
}

pub fn parse_preset(path: &str, preset_id: &str, raw: &str) -> Result<Preset, PackageError> {
    let file: PresetFile = parse(path, raw)?;
    let templates = file
        .templates
        .into_iter()
        .map(|(template_type, template)| {
            Ok(PresetTemplate {
                template_type,
                sections: convert_sections(path, template.sections)?,
            })
        })
        .collect::<Result<Vec<_>, PackageError>>()?;

    Ok(Preset {
        id: preset_id.to_string(),
        name: file.name,
        theme_code: file.theme_code,
        colors: file.colors,
        fonts: file.fonts,
        templates,
    })
}

fn convert_sections(
    path: &str,
    sections: Vec<SectionFile>,
) -> Result<Vec<SectionDefinition>, PackageError> {
    sections
        .into_iter()
        .map(|section| convert_section(path, section))
        .collect()
}

fn convert_section(path: &str, section: SectionFile) -> Result<SectionDefinition, PackageError> {
    if section.section_type.is_empty() {
        return Err(malformed(path, "section without a type"));
    }
    let (settings, mut legacy) = split_nested_blocks(&section.settings);
    let mut blocks = convert_blocks(path, section.blocks)?;
    blocks.append(&mut legacy);

    Ok(SectionDefinition {
        section_type: section.section_type,
        enabled: section.enabled,
        settings,
        blocks,
    })
}

/// Children listed under `blocks` come first, then legacy children lifted out of
/// `settings.blocks`
fn convert_blocks(path: &str, blocks: Vec<BlockFile>) -> Result<Vec<BlockDefinition>, PackageError> {
    blocks
        .into_iter()
        .map(|block| {
            if block.block_type.is_empty() {
                return Err(malformed(path, "block without a type"));
            }
            let (settings, mut legacy) = split_nested_blocks(&block.settings);
            let mut children = convert_blocks(path, block.blocks)?;
            children.append(&mut legacy);
            Ok(BlockDefinition {
                block_type: block.block_type,
                enabled: block.enabled,
                settings,
                children,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_with_legacy_block_children() {
        let raw = json!({
            "name": "Home page",
            "sections": [{
                "type": "slideshow",
                "settings": {"autoplay": true},
                "blocks": [{
                    "type": "slide",
                    "settings": {
                        "heading": "Summer",
                        "blocks": [{"type": "button", "settings": {"label": "Shop"}}]
                    },
                    "blocks": [{"type": "image"}]
                }]
            }, {
                "type": "newsletter",
                "enabled": false
            }]
        })
        .to_string();

        let template = parse_default_template("dawn/templates/homepage.json", "homepage", &raw)
            .unwrap();
        assert_eq!(template.name.as_deref(), Some("Home page"));
        assert_eq!(template.sections.len(), 2);

        let slide = &template.sections[0].blocks[0];
        assert_eq!(slide.settings, json!({"heading": "Summer"}));
        let child_types: Vec<&str> = slide.children.iter().map(|c| c.block_type.as_str()).collect();
        assert_eq!(child_types, vec!["image", "button"]);
        assert!(!template.sections[1].enabled);
        assert_eq!(template.sections[1].settings, json!({}));
    }

    #[test]
    fn test_malformed_template_reports_path() {
        let err = parse_default_template("dawn/templates/product.json", "product", "{ not json")
            .unwrap_err();
        match err {
            PackageError::Malformed { path, .. } => assert_eq!(path, "dawn/templates/product.json"),
            other => panic!("unexpected error: {other}"),
        }

        let err = parse_default_template("p.json", "product", r#"{"sections": [{"type": ""}]}"#)
            .unwrap_err();
        assert!(matches!(err, PackageError::Malformed { .. }));
    }

    #[test]
    fn test_settings_schema_accepts_id_alias() {
        let raw = r##"{"settings": [
            {"id": "colors.primary", "type": "color", "default": "#000000"},
            {"key": "typography.body", "type": "font", "default": "Inter"},
            {"key": "layout.custom"}
        ]}"##;
        let schema = parse_settings_schema("dawn/settings_schema.json", raw).unwrap();

        assert_eq!(schema.settings.len(), 3);
        assert_eq!(schema.settings[0].key, "colors.primary");
        assert_eq!(schema.settings[0].kind, SettingKind::Color);
        assert_eq!(schema.settings[2].kind, SettingKind::Json);
        assert_eq!(schema.defaults()["typography.body"], json!("Inter"));
    }

    #[test]
    fn test_preset_templates_are_ordered_by_type() {
        let raw = json!({
            "name": "Fashion",
            "theme_code": "dawn",
            "colors": {"primary": "#111111"},
            "fonts": {"heading": "Playfair"},
            "templates": {
                "product": {"sections": [{"type": "product-main"}]},
                "homepage": {"sections": [{"type": "hero"}, {"type": "featured-collection"}]}
            }
        })
        .to_string();

        let preset = parse_preset("presets/fashion.json", "fashion", &raw).unwrap();
        assert_eq!(preset.id, "fashion");
        assert_eq!(preset.theme_code.as_deref(), Some("dawn"));
        assert_eq!(preset.templates[0].template_type, "homepage");
        assert_eq!(preset.templates[0].sections.len(), 2);
        assert_eq!(preset.templates[1].template_type, "product");
    }

    #[test]
    fn test_safe_components() {
        assert!(is_safe_component("dawn"));
        assert!(is_safe_component("product.alternate"));
        assert!(!is_safe_component(""));
        assert!(!is_safe_component(".hidden"));
        assert!(!is_safe_component("../etc"));
        assert!(!is_safe_component("a/b"));
    }
}
