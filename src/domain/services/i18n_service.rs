use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error types for i18n service operations
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("Translation key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    #[error("Error loading translations: {0}")]
    LoadError(String),
}

/// Result type for i18n service operations
pub type I18nResult<T> = Result<T, I18nError>;

/// Supported locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    Spanish,
    English,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Spanish, Locale::English];

    /// Convert locale to code string
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Spanish => "es",
            Locale::English => "en",
        }
    }

    /// Create from a locale code, accepting region-qualified tags ("en-US", "es_MX.UTF-8")
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(|c| c == '-' || c == '_' || c == '.')
            .next()
            .unwrap_or_default()
            .to_lowercase();

        match primary.as_str() {
            "es" => Some(Locale::Spanish),
            "en" => Some(Locale::English),
            _ => None,
        }
    }

    /// Locale reported by the operating system, if it is one we support
    pub fn from_system() -> Option<Self> {
        sys_locale::get_locale().and_then(|tag| Self::from_code(&tag))
    }

    /// BCP-47 tag used when formatting dates
    pub fn date_tag(&self) -> &'static str {
        match self {
            Locale::Spanish => "es-ES",
            Locale::English => "en-US",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| I18nError::InvalidLocale(s.to_string()))
    }
}

/// Interface for translation table lookups (primary port)
///
/// Tables are loaded up front; lookups are synchronous so they can run inside
/// change-notification handlers.
pub trait I18nService: Send + Sync + 'static {
    /// Get a translation for a key and locale
    fn translate(&self, key: &str, locale: Locale) -> I18nResult<String>;

    /// All keys known for a locale, sorted
    fn keys(&self, locale: Locale) -> Vec<String>;

    /// Get available locales
    fn available_locales(&self) -> Vec<Locale>;

    /// Check if a locale has a loaded table
    fn is_supported(&self, locale: Locale) -> bool {
        self.available_locales().contains(&locale)
    }
}
