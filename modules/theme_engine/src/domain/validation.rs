//! Input validation run before any write

use crate::contract::ThemeEngineError;
use jsonschema::Validator;
use serde_json::Value;

/// Maximum length for identifiers (theme codes, template/section/block types, preset ids)
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Maximum length for a template or backup name
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length for a theme file path
pub const MAX_FILE_PATH_LEN: usize = 512;

/// Validate an identifier such as a theme code or section type.
///
/// Accepts lowercase ASCII letters, digits, '-', '_' and '.', starting with a letter or
/// digit.
pub fn validate_identifier(kind: &str, value: &str) -> Result<(), ThemeEngineError> {
    if value.is_empty() {
        return Err(ThemeEngineError::validation(format!("{} cannot be empty", kind)));
    }
    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(ThemeEngineError::validation(format!(
            "{} too long: {} chars (max {})",
            kind,
            value.len(),
            MAX_IDENTIFIER_LEN
        )));
    }

    let starts_alnum = value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if !starts_alnum {
        return Err(ThemeEngineError::validation(format!(
            "{} '{}' must start with a lowercase letter or digit",
            kind, value
        )));
    }

    let valid = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'));
    if !valid {
        return Err(ThemeEngineError::validation(format!(
            "{} '{}' contains invalid characters. Only a-z, 0-9, '-', '_' and '.' are allowed",
            kind, value
        )));
    }

    Ok(())
}

/// Preset ids are plain slugs: no dots, so they can never address a nested package path
pub fn validate_preset_id(preset_id: &str) -> Result<(), ThemeEngineError> {
    validate_identifier("preset id", preset_id)?;
    if preset_id.contains('.') {
        return Err(ThemeEngineError::validation(format!(
            "preset id '{}' must not contain '.'",
            preset_id
        )));
    }
    Ok(())
}

/// Validate a template or backup name: non-empty and within length limit
pub fn validate_name(kind: &str, name: &str) -> Result<(), ThemeEngineError> {
    if name.trim().is_empty() {
        return Err(ThemeEngineError::validation(format!("{} must not be empty", kind)));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ThemeEngineError::validation(format!(
            "{} too long: {} chars (max {})",
            kind,
            name.len(),
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

/// Settings payloads must be JSON objects no larger than `max_size` bytes when serialized
pub fn validate_settings(settings: &Value, max_size: usize) -> Result<(), ThemeEngineError> {
    if !settings.is_object() {
        return Err(ThemeEngineError::validation("settings must be a JSON object"));
    }
    let size = serde_json::to_vec(settings)
        .map(|bytes| bytes.len())
        .map_err(|e| ThemeEngineError::validation(format!("settings are not serializable: {}", e)))?;
    if size > max_size {
        return Err(ThemeEngineError::validation(format!(
            "settings too large: {} bytes (max {})",
            size, max_size
        )));
    }
    Ok(())
}

/// Validate a settings value against a JSON Schema
pub fn validate_against_schema(data: &Value, schema: &Value) -> Result<(), ThemeEngineError> {
    let validator = Validator::new(schema)
        .map_err(|e| ThemeEngineError::validation(format!("Invalid JSON Schema: {}", e)))?;

    let errors: Vec<String> = validator.iter_errors(data).map(|e| e.to_string()).collect();
    if !errors.is_empty() {
        return Err(ThemeEngineError::validation(format!(
            "Schema validation failed: {}",
            errors.join(", ")
        )));
    }

    Ok(())
}

/// Theme file paths are relative, '/'-separated and may not escape the theme directory
pub fn validate_file_path(path: &str) -> Result<(), ThemeEngineError> {
    let invalid = |reason: &str| {
        Err(ThemeEngineError::validation(format!(
            "invalid file path '{}': {}",
            path, reason
        )))
    };

    if path.is_empty() {
        return invalid("empty");
    }
    if path.len() > MAX_FILE_PATH_LEN {
        return invalid("too long");
    }
    if path.starts_with('/') {
        return invalid("must be relative");
    }
    if path.contains('\\') || path.contains('\0') {
        return invalid("contains a forbidden character");
    }
    for segment in path.split('/') {
        match segment {
            "" => return invalid("empty path segment"),
            "." | ".." => return invalid("relative segments are not allowed"),
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifiers() {
        assert!(validate_identifier("section type", "hero").is_ok());
        assert!(validate_identifier("template type", "product.alternate").is_ok());
        assert!(validate_identifier("theme code", "dawn-2").is_ok());

        assert!(validate_identifier("section type", "").is_err());
        assert!(validate_identifier("section type", "Hero").is_err());
        assert!(validate_identifier("section type", "-hero").is_err());
        assert!(validate_identifier("section type", "hero banner").is_err());
        assert!(validate_identifier("section type", &"a".repeat(65)).is_err());
    }

    #[test]
    fn test_preset_ids() {
        assert!(validate_preset_id("fashion").is_ok());
        assert!(validate_preset_id("fashion-dark_2").is_ok());
        assert!(validate_preset_id("../fashion").is_err());
        assert!(validate_preset_id("fashion.v2").is_err());
        assert!(validate_preset_id("").is_err());
    }

    #[test]
    fn test_settings_must_be_object() {
        assert!(validate_settings(&json!({"a": 1}), 1024).is_ok());
        assert!(validate_settings(&json!([1]), 1024).is_err());
        assert!(validate_settings(&json!("x"), 1024).is_err());
        assert!(validate_settings(&json!({"a": "x".repeat(100)}), 32).is_err());
    }

    #[test]
    fn test_schema_validation() {
        let schema = json!({
            "type": "object",
            "properties": {
                "heading": { "type": "string" },
                "columns": { "type": "integer", "minimum": 1 }
            },
            "required": ["heading"]
        });

        assert!(validate_against_schema(&json!({"heading": "Hi", "columns": 3}), &schema).is_ok());

        let result = validate_against_schema(&json!({"columns": 0}), &schema);
        assert!(matches!(result, Err(ThemeEngineError::Validation { .. })));
    }

    #[test]
    fn test_file_paths() {
        assert!(validate_file_path("sections/hero.liquid").is_ok());
        assert!(validate_file_path("assets/theme.css").is_ok());

        assert!(validate_file_path("").is_err());
        assert!(validate_file_path("/etc/passwd").is_err());
        assert!(validate_file_path("../secrets").is_err());
        assert!(validate_file_path("sections/../../x").is_err());
        assert!(validate_file_path("sections//hero").is_err());
        assert!(validate_file_path("sections\\hero").is_err());
    }
}
