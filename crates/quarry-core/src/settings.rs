//! Settings for the quarry compiler.
//!
//! This module provides the [`Settings`] struct, which selects the target SQL
//! platform and tunes how identifiers and parameters are rendered. Settings are
//! plain data; build them directly, or load them with
//! [`settings_loader`](crate::settings_loader).

use serde::{Deserialize, Serialize};

/// How bound-parameter placeholders are written into prepared SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterStyle {
    /// `?` for every parameter (MySQL, SQLite, SQL Server drivers).
    Positional,
    /// `$1, $2, ...` by binding position (PostgreSQL).
    Numbered,
    /// `:name` by parameter name (PDO-style drivers).
    Named,
}

impl ParameterStyle {
    /// Formats the placeholder for a parameter with the given name and
    /// 1-based binding position.
    pub fn placeholder(self, name: &str, position: usize) -> String {
        match self {
            Self::Positional => "?".to_string(),
            Self::Numbered => format!("${position}"),
            Self::Named => format!(":{name}"),
        }
    }
}

/// The complete set of compiler settings.
///
/// # Examples
///
/// ```
/// use quarry_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.platform, "sql92");
/// assert!(settings.quote_identifiers);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Platform ─────────────────────────────────────────────────────

    /// The target platform name (`sql92`, `mysql`, `postgresql`, `sqlite`,
    /// `sqlserver`). Matching is case-insensitive.
    pub platform: String,
    /// Whether identifiers are wrapped in the platform's quote symbols.
    pub quote_identifiers: bool,
    /// Overrides the platform's default placeholder style.
    pub parameter_style: Option<ParameterStyle>,

    // ── Logging ──────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty log output).
    pub debug: bool,
    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            platform: "sql92".to_string(),
            quote_identifiers: true,
            parameter_style: None,
            debug: true,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert_eq!(s.platform, "sql92");
        assert!(s.quote_identifiers);
        assert!(s.parameter_style.is_none());
        assert!(s.debug);
        assert_eq!(s.log_level, "info");
    }

    #[test]
    fn test_placeholder_styles() {
        assert_eq!(ParameterStyle::Positional.placeholder("where1", 3), "?");
        assert_eq!(ParameterStyle::Numbered.placeholder("where1", 3), "$3");
        assert_eq!(ParameterStyle::Named.placeholder("where1", 3), ":where1");
    }

    #[test]
    fn test_parameter_style_serde() {
        let style: ParameterStyle = serde_json::from_str("\"numbered\"").unwrap();
        assert_eq!(style, ParameterStyle::Numbered);
        assert_eq!(
            serde_json::to_string(&ParameterStyle::Named).unwrap(),
            "\"named\""
        );
    }
}
