//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `QUARRY_PLATFORM` | `platform` |
//! | `QUARRY_QUOTE_IDENTIFIERS` | `quote_identifiers` |
//! | `QUARRY_PARAMETER_STYLE` | `parameter_style` (`positional`, `numbered`, `named`) |
//! | `QUARRY_DEBUG` | `debug` |
//! | `QUARRY_LOG_LEVEL` | `log_level` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use quarry_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/quarry.toml").unwrap();
//! let settings = settings_loader::from_toml_file_with_env("config/quarry.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::QuarryError;
use crate::settings::{ParameterStyle, Settings};

/// Loads settings from a TOML string.
///
/// Fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, QuarryError> {
    // Go through serde_json::Value so the TOML can be merged over the defaults.
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| QuarryError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    let json_value = toml_to_json(toml_value);
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        QuarryError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, json_value);
    serde_json::from_value(merged).map_err(|e| {
        QuarryError::ConfigurationError(format!("Failed to deserialize settings from TOML: {e}"))
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, QuarryError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        QuarryError::ConfigurationError(format!(
            "Failed to read TOML file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the TOML is malformed, or an
/// environment override is invalid.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, QuarryError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings)?;
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, QuarryError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| QuarryError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        QuarryError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, json_value);
    serde_json::from_value(merged).map_err(|e| {
        QuarryError::ConfigurationError(format!("Failed to deserialize settings from JSON: {e}"))
    })
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, QuarryError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        QuarryError::ConfigurationError(format!(
            "Failed to read JSON file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_json_str(&content)
}

/// Loads settings from just environment variables (starting from defaults).
///
/// # Errors
///
/// Returns an error if an environment override is invalid.
pub fn from_env() -> Result<Settings, QuarryError> {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings)?;
    Ok(settings)
}

/// Applies environment variable overrides to a settings struct.
///
/// Boolean variables accept `true`/`1`/`yes` (case-insensitive) as true and
/// anything else as false.
///
/// # Errors
///
/// Returns [`QuarryError::ConfigurationError`] if `QUARRY_PARAMETER_STYLE`
/// names an unknown style.
pub fn apply_env_overrides(settings: &mut Settings) -> Result<(), QuarryError> {
    if let Ok(val) = std::env::var("QUARRY_PLATFORM") {
        settings.platform = val;
    }

    if let Ok(val) = std::env::var("QUARRY_QUOTE_IDENTIFIERS") {
        settings.quote_identifiers = parse_flag(&val);
    }

    if let Ok(val) = std::env::var("QUARRY_PARAMETER_STYLE") {
        settings.parameter_style = Some(parse_parameter_style(&val)?);
    }

    if let Ok(val) = std::env::var("QUARRY_DEBUG") {
        settings.debug = parse_flag(&val);
    }

    if let Ok(val) = std::env::var("QUARRY_LOG_LEVEL") {
        settings.log_level = val;
    }

    Ok(())
}

// ============================================================
// Helpers
// ============================================================

fn parse_flag(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn parse_parameter_style(val: &str) -> Result<ParameterStyle, QuarryError> {
    match val.trim().to_lowercase().as_str() {
        "positional" => Ok(ParameterStyle::Positional),
        "numbered" => Ok(ParameterStyle::Numbered),
        "named" => Ok(ParameterStyle::Named),
        other => Err(QuarryError::ConfigurationError(format!(
            "Unknown parameter style '{other}'"
        ))),
    }
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            platform = "sqlserver"
            quote_identifiers = false
            parameter_style = "named"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.platform, "sqlserver");
        assert!(!settings.quote_identifiers);
        assert_eq!(settings.parameter_style, Some(ParameterStyle::Named));
        // Defaults preserved
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert_eq!(settings.platform, "sql92");
        assert!(settings.quote_identifiers);
    }

    #[test]
    fn test_from_toml_str_invalid() {
        assert!(from_toml_str("[[invalid toml content").is_err());
    }

    #[test]
    fn test_from_toml_str_unknown_style() {
        let result = from_toml_str(r#"parameter_style = "dollar""#);
        assert!(matches!(result, Err(QuarryError::ConfigurationError(_))));
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{
            "platform": "mysql",
            "debug": false,
            "log_level": "debug"
        }"#;

        let settings = from_json_str(json).unwrap();
        assert_eq!(settings.platform, "mysql");
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "debug");
        assert!(settings.quote_identifiers);
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{invalid json").is_err());
    }

    // ── File loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_file() {
        let dir = std::env::temp_dir().join("quarry_test_toml");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("quarry.toml");
        std::fs::write(&path, "platform = \"postgresql\"\n").unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert_eq!(settings.platform, "postgresql");

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(&dir).ok();
    }

    #[test]
    fn test_from_json_file() {
        let dir = std::env::temp_dir().join("quarry_test_json");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("quarry.json");
        std::fs::write(&path, r#"{"platform": "sqlite"}"#).unwrap();

        let settings = from_json_file(&path).unwrap();
        assert_eq!(settings.platform, "sqlite");

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(&dir).ok();
    }

    #[test]
    fn test_from_toml_file_missing() {
        assert!(from_toml_file("/nonexistent/path/quarry.toml").is_err());
    }

    // ── Environment variable overrides ──────────────────────────────

    // Every test below touches the process environment, so they share one
    // test body to avoid racing each other.
    #[test]
    fn test_apply_env_overrides() {
        let mut settings = Settings::default();
        std::env::set_var("QUARRY_PLATFORM", "mysql");
        std::env::set_var("QUARRY_QUOTE_IDENTIFIERS", "no");
        std::env::set_var("QUARRY_PARAMETER_STYLE", "Numbered");
        std::env::set_var("QUARRY_DEBUG", "0");
        std::env::set_var("QUARRY_LOG_LEVEL", "trace");
        apply_env_overrides(&mut settings).unwrap();
        assert_eq!(settings.platform, "mysql");
        assert!(!settings.quote_identifiers);
        assert_eq!(settings.parameter_style, Some(ParameterStyle::Numbered));
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "trace");

        std::env::set_var("QUARRY_PARAMETER_STYLE", "bogus");
        assert!(from_env().is_err());

        for var in [
            "QUARRY_PLATFORM",
            "QUARRY_QUOTE_IDENTIFIERS",
            "QUARRY_PARAMETER_STYLE",
            "QUARRY_DEBUG",
            "QUARRY_LOG_LEVEL",
        ] {
            std::env::remove_var(var);
        }
    }

    // ── merge_json helper ───────────────────────────────────────────

    #[test]
    fn test_merge_json_nested() {
        let base = serde_json::json!({"outer": {"a": 1, "b": 2}});
        let over = serde_json::json!({"outer": {"b": 3}});
        let merged = merge_json(base, over);
        assert_eq!(merged["outer"]["a"], 1);
        assert_eq!(merged["outer"]["b"], 3);
    }

    #[test]
    fn test_toml_to_json() {
        let toml_val: toml::Value = toml::from_str(
            r#"
            name = "test"
            count = 42
            flag = true
            [nested]
            key = "value"
        "#,
        )
        .unwrap();

        let json = toml_to_json(toml_val);
        assert_eq!(json["name"], "test");
        assert_eq!(json["count"], 42);
        assert_eq!(json["flag"], true);
        assert_eq!(json["nested"]["key"], "value");
    }
}
