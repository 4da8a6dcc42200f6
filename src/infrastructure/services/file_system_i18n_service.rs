use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde_json::Value;
use tokio::fs;

use crate::domain::services::i18n_service::{I18nError, I18nResult, I18nService, Locale};

const EMBEDDED_ES: &str = include_str!("../../../static/locales/es.json");
const EMBEDDED_EN: &str = include_str!("../../../static/locales/en.json");

/// Translation tables kept in memory, loaded from JSON
///
/// The tables compiled into the binary are always present; a directory of
/// `<code>.json` files can replace them at startup.
pub struct FileSystemI18nService {
    /// Optional directory overriding the embedded tables
    translations_dir: Option<PathBuf>,

    /// Cached translations (locale -> JSON data)
    cache: RwLock<HashMap<Locale, Value>>,
}

impl FileSystemI18nService {
    /// Service with the embedded Spanish and English tables
    pub fn embedded() -> I18nResult<Self> {
        let mut cache = HashMap::new();
        cache.insert(Locale::Spanish, parse_table(EMBEDDED_ES)?);
        cache.insert(Locale::English, parse_table(EMBEDDED_EN)?);

        Ok(Self {
            translations_dir: None,
            cache: RwLock::new(cache),
        })
    }

    /// Embedded tables, overridable from `translations_dir` with `load_all_translations`
    pub fn with_directory(translations_dir: PathBuf) -> I18nResult<Self> {
        let mut service = Self::embedded()?;
        service.translations_dir = Some(translations_dir);
        Ok(service)
    }

    fn get_locale_file_path(&self, dir: &Path, locale: Locale) -> PathBuf {
        dir.join(format!("{}.json", locale.as_str()))
    }

    /// Replace one locale table with the file from the translations directory
    pub async fn load_translations(&self, locale: Locale) -> I18nResult<()> {
        let Some(dir) = &self.translations_dir else {
            return Ok(());
        };
        let file_path = self.get_locale_file_path(dir, locale);
        tracing::info!("Loading translations for locale {} from {:?}", locale.as_str(), file_path);

        if !fs::try_exists(&file_path).await.unwrap_or(false) {
            return Err(I18nError::InvalidLocale(locale.as_str().to_string()));
        }

        let content = fs::read_to_string(&file_path)
            .await
            .map_err(|e| I18nError::LoadError(format!("Failed to read translation file: {}", e)))?;
        let translations = parse_table(&content)?;

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(locale, translations);

        tracing::info!("Translations loaded for locale {}", locale.as_str());
        Ok(())
    }

    /// Load every supported locale from the directory; failures keep the embedded table
    pub async fn load_all_translations(&self) -> Vec<(Locale, I18nResult<()>)> {
        let mut results = Vec::new();
        for locale in Locale::ALL {
            let result = self.load_translations(locale).await;
            if let Err(e) = &result {
                tracing::warn!("Keeping built-in {} translations: {}", locale, e);
            }
            results.push((locale, result));
        }
        results
    }

    /// Flat key first ("form.submit"), then the nested path
    fn get_value(&self, data: &Value, key: &str) -> Option<String> {
        if let Some(Value::String(s)) = data.get(key) {
            return Some(s.clone());
        }

        let mut current = data;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        current.as_str().map(str::to_string)
    }
}

fn parse_table(content: &str) -> I18nResult<Value> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| I18nError::LoadError(format!("Failed to parse translation file: {}", e)))?;
    if !value.is_object() {
        return Err(I18nError::LoadError("Translation file must be a JSON object".to_string()));
    }
    Ok(value)
}

/// Dotted keys of every string leaf
fn collect_keys(value: &Value, prefix: &str, out: &mut Vec<String>) {
    if let Value::Object(map) = value {
        for (name, child) in map {
            let key = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", prefix, name)
            };
            match child {
                Value::String(_) => out.push(key),
                Value::Object(_) => collect_keys(child, &key, out),
                _ => {}
            }
        }
    }
}

impl I18nService for FileSystemI18nService {
    fn translate(&self, key: &str, locale: Locale) -> I18nResult<String> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        let translations = cache
            .get(&locale)
            .ok_or_else(|| I18nError::InvalidLocale(locale.as_str().to_string()))?;

        self.get_value(translations, key)
            .ok_or_else(|| I18nError::KeyNotFound(key.to_string()))
    }

    fn keys(&self, locale: Locale) -> Vec<String> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys = Vec::new();
        if let Some(translations) = cache.get(&locale) {
            collect_keys(translations, "", &mut keys);
        }
        keys.sort();
        keys
    }

    fn available_locales(&self) -> Vec<Locale> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        Locale::ALL.into_iter().filter(|l| cache.contains_key(l)).collect()
    }
}
