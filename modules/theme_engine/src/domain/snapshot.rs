//! Serialized layout stored in a backup's `customizations` payload, plus the checksum
//! sealing a backup.

use crate::contract::{BlockDefinition, SectionDefinition};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Current layout snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub version: u32,
    #[serde(default)]
    pub templates: Vec<TemplateSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSnapshot {
    pub template_type: String,
    pub name: String,
    pub is_default: bool,
    pub enabled: bool,
    #[serde(default = "empty_object")]
    pub settings: Value,
    #[serde(default = "empty_object")]
    pub seo_settings: Value,
    #[serde(default)]
    pub sections: Vec<SectionSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSnapshot {
    #[serde(rename = "type")]
    pub section_type: String,
    pub enabled: bool,
    #[serde(default = "empty_object")]
    pub settings: Value,
    #[serde(default)]
    pub blocks: Vec<BlockSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    #[serde(rename = "type")]
    pub block_type: String,
    pub enabled: bool,
    #[serde(default = "empty_object")]
    pub settings: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlockSnapshot>,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

impl From<&SectionDefinition> for SectionSnapshot {
    fn from(def: &SectionDefinition) -> Self {
        Self {
            section_type: def.section_type.clone(),
            enabled: def.enabled,
            settings: def.settings.clone(),
            blocks: def.blocks.iter().map(BlockSnapshot::from).collect(),
        }
    }
}

impl From<&BlockDefinition> for BlockSnapshot {
    fn from(def: &BlockDefinition) -> Self {
        Self {
            block_type: def.block_type.clone(),
            enabled: def.enabled,
            settings: def.settings.clone(),
            children: def.children.iter().map(BlockSnapshot::from).collect(),
        }
    }
}

impl From<&SectionSnapshot> for SectionDefinition {
    fn from(snapshot: &SectionSnapshot) -> Self {
        Self {
            section_type: snapshot.section_type.clone(),
            enabled: snapshot.enabled,
            settings: snapshot.settings.clone(),
            blocks: snapshot.blocks.iter().map(BlockDefinition::from).collect(),
        }
    }
}

impl From<&BlockSnapshot> for BlockDefinition {
    fn from(snapshot: &BlockSnapshot) -> Self {
        Self {
            block_type: snapshot.block_type.clone(),
            enabled: snapshot.enabled,
            settings: snapshot.settings.clone(),
            children: snapshot.children.iter().map(BlockDefinition::from).collect(),
        }
    }
}

/// SHA-256 hex digest over `{"customizations": .., "settings": ..}` in canonical form.
///
/// Object keys are written sorted regardless of how the values were built or read
/// back, so a JSONB round trip never changes the digest.
pub fn backup_checksum(settings: &Value, customizations: &Value) -> String {
    let mut canonical = String::new();
    canonical.push_str("{\"customizations\":");
    write_canonical(customizations, &mut canonical);
    canonical.push_str(",\"settings\":");
    write_canonical(settings, &mut canonical);
    canonical.push('}');

    hex::encode(Sha256::digest(canonical.as_bytes()))
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (index, key) in keys.into_iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                if let Some(inner) = map.get(key) {
                    write_canonical(inner, out);
                }
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checksum_ignores_key_order() {
        let a: Value = serde_json::from_str(r#"{"b": 1, "a": {"y": [1, 2], "x": "s"}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a": {"x": "s", "y": [1, 2]}, "b": 1}"#).unwrap();

        assert_eq!(backup_checksum(&a, &json!({})), backup_checksum(&b, &json!({})));
        assert_eq!(backup_checksum(&a, &json!({})).len(), 64);
    }

    #[test]
    fn test_checksum_detects_changes() {
        let settings = json!({"colors": {"primary": "#000"}});
        let tampered = json!({"colors": {"primary": "#001"}});
        let layout = json!({"version": 1, "templates": []});

        assert_ne!(
            backup_checksum(&settings, &layout),
            backup_checksum(&tampered, &layout)
        );
        // Swapping the two payloads must not collide
        assert_ne!(
            backup_checksum(&settings, &layout),
            backup_checksum(&layout, &settings)
        );
    }

    #[test]
    fn test_snapshot_reads_block_type_key() {
        let raw = json!({
            "version": 1,
            "templates": [{
                "template_type": "homepage",
                "name": "Home",
                "is_default": true,
                "enabled": true,
                "sections": [{
                    "type": "hero",
                    "enabled": true,
                    "blocks": [{"type": "slide", "enabled": true, "children": [{"type": "button", "enabled": false}]}]
                }]
            }]
        });

        let snapshot: LayoutSnapshot = serde_json::from_value(raw).unwrap();
        let section = SectionDefinition::from(&snapshot.templates[0].sections[0]);
        assert_eq!(section.section_type, "hero");
        assert_eq!(section.settings, json!({}));
        assert_eq!(section.blocks[0].children[0].block_type, "button");
        assert!(!section.blocks[0].children[0].enabled);
    }
}
