//! SQL platforms and the quoting engine.
//!
//! A [`Platform`] is immutable configuration describing one SQL dialect: how
//! identifiers and values are quoted, how identifier paths are joined, how
//! bound-parameter placeholders look, and (optionally) a native escape
//! function supplied by the active driver. Platforms hold no per-call state and
//! can be shared freely between threads.
//!
//! | Platform | Identifiers | Values | Placeholders |
//! |---|---|---|---|
//! | SQL92 | `"id"` | `'v'`, `\'` escape | `?` |
//! | MySQL | `` `id` `` | `'v'`, `\'` escape | `?` |
//! | PostgreSQL | `"id"` | `'v'`, `\'` escape | `$1` |
//! | SQLite | `"id"` | `'v'`, `\'` escape | `?` |
//! | SQL Server | `[id]` | `'v'`, `''` escape | `?` |
//!
//! Without a native escaper, values are escaped with the fallback above and
//! every such quote is reported as an unsafe-quoting diagnostic. The `\'`
//! fallback is not valid SQL on PostgreSQL with `standard_conforming_strings`
//! on, nor on SQLite. Inline output for those platforms is for logging and
//! debugging; execute prepared statements or attach an [`Escaper`].

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use quarry_core::{QuarryError, Settings};
use regex::Regex;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::parameters::ParameterStyle;
use crate::value::Value;

/// Characters that separate identifier words inside a raw SQL fragment.
static FRAGMENT_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9A-Za-z$_:\-]").expect("valid fragment delimiter pattern"));

/// Tokens that `quote_identifier_in_fragment` never quotes.
const BUILTIN_SAFE_WORDS: [&str; 4] = ["*", " ", ".", "as"];

/// A native escape function supplied by a database driver.
///
/// Any `Fn(&str) -> String` closure that is `Send + Sync` is an `Escaper`.
pub trait Escaper: Send + Sync {
    /// Escapes `raw` for use between the platform's value quote symbols.
    fn escape(&self, raw: &str) -> String;
}

impl<F> Escaper for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn escape(&self, raw: &str) -> String {
        self(raw)
    }
}

/// The supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    /// Generic SQL-92.
    Sql92,
    /// MySQL / MariaDB.
    MySql,
    /// PostgreSQL.
    PostgreSql,
    /// SQLite.
    Sqlite,
    /// Microsoft SQL Server.
    SqlServer,
}

impl PlatformKind {
    /// Returns the display name of the platform.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sql92 => "SQL92",
            Self::MySql => "MySQL",
            Self::PostgreSql => "PostgreSQL",
            Self::Sqlite => "SQLite",
            Self::SqlServer => "SQLServer",
        }
    }

    /// Looks a platform up by name, case-insensitively. Common aliases such
    /// as `postgres`, `mssql`, and `sqlite3` are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "sql92" | "ansi" => Some(Self::Sql92),
            "mysql" | "mariadb" => Some(Self::MySql),
            "postgresql" | "postgres" | "pgsql" => Some(Self::PostgreSql),
            "sqlite" | "sqlite3" => Some(Self::Sqlite),
            "sqlserver" | "mssql" | "sqlsrv" => Some(Self::SqlServer),
            _ => None,
        }
    }
}

/// An identifier given either as a single name or as ordered path segments
/// (e.g. schema + table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierChain(Vec<String>);

impl IdentifierChain {
    /// Returns the path segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for IdentifierChain {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for IdentifierChain {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<Vec<String>> for IdentifierChain {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<Vec<&str>> for IdentifierChain {
    fn from(segments: Vec<&str>) -> Self {
        Self(segments.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for IdentifierChain {
    fn from(segments: [&str; N]) -> Self {
        Self(segments.iter().map(|s| (*s).to_string()).collect())
    }
}

/// Immutable quoting and placeholder rules for one SQL dialect.
///
/// # Examples
///
/// ```
/// use quarry_db::platform::Platform;
///
/// let mysql = Platform::mysql();
/// assert_eq!(mysql.quote_identifier("ident`ifier"), "`ident``ifier`");
/// assert_eq!(mysql.quote_identifier_chain(["schema", "t"]), "`schema`.`t`");
/// assert_eq!(mysql.quote_trusted_value("O'Bar"), "'O\\'Bar'");
/// ```
#[derive(Clone)]
pub struct Platform {
    kind: PlatformKind,
    identifier_quote: (&'static str, &'static str),
    /// Replacement for an embedded close quote, `None` for bracket quoting.
    identifier_escape: Option<&'static str>,
    value_quote: &'static str,
    value_quote_escape: &'static str,
    escape_backslash: bool,
    identifier_separator: &'static str,
    quote_identifiers: bool,
    parameter_style: ParameterStyle,
    escaper: Option<Arc<dyn Escaper>>,
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("kind", &self.kind)
            .field("quote_identifiers", &self.quote_identifiers)
            .field("parameter_style", &self.parameter_style)
            .field("native_escaper", &self.escaper.is_some())
            .finish_non_exhaustive()
    }
}

impl Platform {
    /// Creates the platform for the given dialect with its default rules.
    pub const fn new(kind: PlatformKind) -> Self {
        let (identifier_quote, identifier_escape) = match kind {
            PlatformKind::MySql => (("`", "`"), Some("``")),
            PlatformKind::SqlServer => (("[", "]"), None),
            PlatformKind::Sql92 | PlatformKind::PostgreSql | PlatformKind::Sqlite => {
                (("\"", "\""), Some("\"\""))
            }
        };
        let (value_quote_escape, escape_backslash) = match kind {
            PlatformKind::SqlServer => ("''", false),
            _ => ("\\'", true),
        };
        let parameter_style = match kind {
            PlatformKind::PostgreSql => ParameterStyle::Numbered,
            _ => ParameterStyle::Positional,
        };
        Self {
            kind,
            identifier_quote,
            identifier_escape,
            value_quote: "'",
            value_quote_escape,
            escape_backslash,
            identifier_separator: ".",
            quote_identifiers: true,
            parameter_style,
            escaper: None,
        }
    }

    /// The generic SQL-92 platform.
    pub const fn sql92() -> Self {
        Self::new(PlatformKind::Sql92)
    }

    /// The MySQL platform.
    pub const fn mysql() -> Self {
        Self::new(PlatformKind::MySql)
    }

    /// The PostgreSQL platform.
    pub const fn postgresql() -> Self {
        Self::new(PlatformKind::PostgreSql)
    }

    /// The SQLite platform.
    pub const fn sqlite() -> Self {
        Self::new(PlatformKind::Sqlite)
    }

    /// The SQL Server platform.
    pub const fn sql_server() -> Self {
        Self::new(PlatformKind::SqlServer)
    }

    /// Builds a platform from [`Settings`].
    ///
    /// # Errors
    ///
    /// Returns [`QuarryError::ConfigurationError`] if the platform name is not
    /// recognised.
    pub fn from_settings(settings: &Settings) -> Result<Self, QuarryError> {
        let kind = PlatformKind::from_name(&settings.platform).ok_or_else(|| {
            QuarryError::ConfigurationError(format!("Unknown platform '{}'", settings.platform))
        })?;
        let mut platform = Self::new(kind).with_quote_identifiers(settings.quote_identifiers);
        if let Some(style) = settings.parameter_style {
            platform = platform.with_parameter_style(style);
        }
        Ok(platform)
    }

    /// Attaches a native escape function. Values quoted through it produce no
    /// unsafe-quoting diagnostics.
    #[must_use]
    pub fn with_escaper(mut self, escaper: impl Escaper + 'static) -> Self {
        self.escaper = Some(Arc::new(escaper));
        self
    }

    /// Turns identifier quoting on or off.
    #[must_use]
    pub const fn with_quote_identifiers(mut self, quote_identifiers: bool) -> Self {
        self.quote_identifiers = quote_identifiers;
        self
    }

    /// Overrides the placeholder style used for prepared statements.
    #[must_use]
    pub const fn with_parameter_style(mut self, style: ParameterStyle) -> Self {
        self.parameter_style = style;
        self
    }

    /// Returns the dialect.
    pub const fn kind(&self) -> PlatformKind {
        self.kind
    }

    /// Returns the platform name.
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Returns the opening identifier quote symbol.
    pub const fn quote_identifier_symbol(&self) -> &'static str {
        self.identifier_quote.0
    }

    /// Returns the value quote symbol.
    pub const fn quote_value_symbol(&self) -> &'static str {
        self.value_quote
    }

    /// Returns the identifier path separator.
    pub const fn identifier_separator(&self) -> &'static str {
        self.identifier_separator
    }

    /// Returns the placeholder style for prepared statements.
    pub const fn parameter_style(&self) -> ParameterStyle {
        self.parameter_style
    }

    /// Returns `true` if a native escape function is attached.
    pub fn has_native_escaper(&self) -> bool {
        self.escaper.is_some()
    }

    // ── Identifiers ──────────────────────────────────────────────────

    /// Quotes a single identifier, escaping any embedded close-quote symbol.
    pub fn quote_identifier(&self, name: &str) -> String {
        if !self.quote_identifiers {
            return name.to_string();
        }
        let (open, close) = self.identifier_quote;
        let body = match self.identifier_escape {
            Some(escape) => name.replace(close, escape),
            None => name.to_string(),
        };
        format!("{open}{body}{close}")
    }

    /// Quotes each segment of an identifier path and joins them with the
    /// identifier separator.
    pub fn quote_identifier_chain(&self, chain: impl Into<IdentifierChain>) -> String {
        chain
            .into()
            .segments()
            .iter()
            .map(|segment| self.quote_identifier(segment))
            .collect::<Vec<_>>()
            .join(self.identifier_separator)
    }

    /// Quotes the identifiers inside a raw SQL fragment.
    ///
    /// The fragment is split into words of `[0-9A-Za-z$_:-]` and single
    /// delimiter characters. Delimiters, `*`, `.`, `as`, and any word matching
    /// an entry of `safe_words` (case-insensitively) are left untouched;
    /// every other word is quoted.
    pub fn quote_identifier_in_fragment(&self, fragment: &str, safe_words: &[&str]) -> String {
        if !self.quote_identifiers {
            return fragment.to_string();
        }
        let safe: Vec<String> = BUILTIN_SAFE_WORDS
            .iter()
            .chain(safe_words.iter())
            .map(|w| w.to_lowercase())
            .collect();

        let mut out = String::with_capacity(fragment.len() + 8);
        let mut push_token = |token: &str, out: &mut String| {
            let mut chars = token.chars();
            let single_symbol = matches!(
                (chars.next(), chars.next()),
                (Some(c), None) if !c.is_alphanumeric()
            );
            if single_symbol || safe.contains(&token.to_lowercase()) {
                out.push_str(token);
            } else {
                out.push_str(&self.quote_identifier(token));
            }
        };

        let mut last = 0;
        for delimiter in FRAGMENT_DELIMITER.find_iter(fragment) {
            if delimiter.start() > last {
                push_token(&fragment[last..delimiter.start()], &mut out);
            }
            push_token(delimiter.as_str(), &mut out);
            last = delimiter.end();
        }
        if last < fragment.len() {
            push_token(&fragment[last..], &mut out);
        }
        out
    }

    // ── Values ───────────────────────────────────────────────────────

    /// Quotes a value for inline use.
    ///
    /// Without a native escape function the fallback escaping is used and an
    /// [`DiagnosticKind::UnsafeQuoting`] diagnostic is recorded.
    pub fn quote_value(&self, raw: &str, diagnostics: &mut Diagnostics) -> String {
        if self.escaper.is_none() {
            let message = self.unsafe_quoting_message();
            tracing::warn!(platform = self.name(), "{message}");
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::UnsafeQuoting,
                platform: self.name().to_string(),
                message,
            });
        }
        self.quote_trusted_value(raw)
    }

    /// Quotes a value the caller vouches for. Uses the same escaping as
    /// [`quote_value`](Self::quote_value) but records nothing.
    pub fn quote_trusted_value(&self, raw: &str) -> String {
        let escaped = match &self.escaper {
            Some(escaper) => escaper.escape(raw),
            None => self.fallback_escape(raw),
        };
        format!("{q}{escaped}{q}", q = self.value_quote)
    }

    /// Quotes a list of values as a comma-separated sequence.
    ///
    /// # Errors
    ///
    /// Returns [`QuarryError::UnsafeQuoting`] when given a scalar and no native
    /// escape function is attached.
    pub fn quote_value_list(
        &self,
        values: &Value,
        diagnostics: &mut Diagnostics,
    ) -> Result<String, QuarryError> {
        match values {
            Value::List(items) => Ok(items
                .iter()
                .map(|item| self.quote_value(&item.to_string(), diagnostics))
                .collect::<Vec<_>>()
                .join(", ")),
            scalar if self.escaper.is_some() => {
                Ok(self.quote_value(&scalar.to_string(), diagnostics))
            }
            _ => Err(QuarryError::UnsafeQuoting(self.unsafe_quoting_message())),
        }
    }

    /// Backslash first, then the quote symbol.
    fn fallback_escape(&self, raw: &str) -> String {
        let escaped = if self.escape_backslash {
            raw.replace('\\', "\\\\")
        } else {
            raw.to_string()
        };
        escaped.replace(self.value_quote, self.value_quote_escape)
    }

    fn unsafe_quoting_message(&self) -> String {
        match self.kind {
            PlatformKind::Sql92 => "Attempting to quote a value without specific driver level \
                support can introduce security vulnerabilities in a production environment."
                .to_string(),
            _ => format!(
                "Attempting to quote a value in {} without extension/driver support can \
                 introduce security vulnerabilities in a production environment",
                self.name()
            ),
        }
    }
}
