use serde::{Serialize, Deserialize};

use crate::domain::entities::unit_system::UnitSystem;
use crate::domain::services::i18n_service::Locale;

/// DTO for locale information
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LocaleDto {
    /// Locale code (e.g., "en", "es")
    pub code: String,

    /// Locale name in its own language (e.g., "English", "Español")
    pub name: String,
}

impl From<Locale> for LocaleDto {
    fn from(locale: Locale) -> Self {
        let name = match locale {
            Locale::Spanish => "Español",
            Locale::English => "English",
        };

        Self {
            code: locale.as_str().to_string(),
            name: name.to_string(),
        }
    }
}

/// Current display preferences, as printed by `flightontime prefs`
#[derive(Debug, Serialize, PartialEq)]
pub struct PreferencesDto {
    pub language: LocaleDto,

    /// Persisted unit code ("km" or "miles")
    pub units: String,

    /// Locales with a loaded translation table
    pub available_languages: Vec<LocaleDto>,
}

impl PreferencesDto {
    pub fn new(language: Locale, units: UnitSystem, available: &[Locale]) -> Self {
        Self {
            language: language.into(),
            units: units.as_str().to_string(),
            available_languages: available.iter().copied().map(LocaleDto::from).collect(),
        }
    }
}
