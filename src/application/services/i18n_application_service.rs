use std::collections::BTreeSet;
use std::fmt::Display;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{error, info, warn};

use crate::application::services::subscriptions::{ChangeNotifier, SubscriptionId};
use crate::domain::repositories::preference_repository::{PreferenceRepository, LANGUAGE_KEY};
use crate::domain::services::i18n_service::{I18nService, Locale};

/// Translation registry: current locale, lookups and change notifications
pub struct I18nApplicationService {
    i18n_service: Arc<dyn I18nService>,
    preferences: Arc<dyn PreferenceRepository>,
    current: RwLock<Locale>,
    notifier: ChangeNotifier<Locale>,
}

impl I18nApplicationService {
    /// Creates the registry, restoring the persisted locale when it is valid
    pub fn new(
        i18n_service: Arc<dyn I18nService>,
        preferences: Arc<dyn PreferenceRepository>,
        fallback: Locale,
    ) -> Self {
        let initial = match preferences.get(LANGUAGE_KEY) {
            Some(code) => Locale::from_code(&code).unwrap_or_else(|| {
                warn!("Ignoring persisted language '{}'", code);
                fallback
            }),
            None => fallback,
        };
        info!("Display language: {}", initial);

        Self {
            i18n_service,
            preferences,
            current: RwLock::new(initial),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Same as `new`, with the operating system language as fallback
    pub fn with_system_default(
        i18n_service: Arc<dyn I18nService>,
        preferences: Arc<dyn PreferenceRepository>,
    ) -> Self {
        Self::new(i18n_service, preferences, Locale::from_system().unwrap_or_default())
    }

    /// Translation in the current locale; the key itself when it is unknown
    pub fn t(&self, key: &str) -> String {
        self.translate_for(key, self.get_language())
    }

    /// Translation with `{name}` placeholders substituted
    ///
    /// Every occurrence of a named placeholder is replaced; placeholders
    /// without a matching parameter are left untouched.
    pub fn t_with(&self, key: &str, params: &[(&str, &dyn Display)]) -> String {
        interpolate(self.t(key), params)
    }

    pub fn translate_for(&self, key: &str, locale: Locale) -> String {
        self.i18n_service
            .translate(key, locale)
            .unwrap_or_else(|_| key.to_string())
    }

    /// Switch the display language
    ///
    /// Unknown codes are logged and ignored. On success the choice is
    /// persisted and every subscriber has run before this returns.
    pub fn set_language(&self, code: &str) -> bool {
        match Locale::from_code(code) {
            Some(locale) => {
                self.set_locale(locale);
                true
            }
            None => {
                error!("Unsupported language code: '{}'", code);
                false
            }
        }
    }

    pub fn set_locale(&self, locale: Locale) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = locale;

        if let Err(e) = self.preferences.set(LANGUAGE_KEY, locale.as_str()) {
            warn!("Could not persist language preference: {}", e);
        }

        info!("Language changed to {}", locale);
        self.notifier.emit(locale);
    }

    pub fn get_language(&self) -> Locale {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn on_change<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(Locale) + Send + Sync + 'static,
    {
        self.notifier.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn available_locales(&self) -> Vec<Locale> {
        self.i18n_service.available_locales()
    }

    /// Keys present in one locale table but not in the other
    pub fn asymmetric_keys(&self, a: Locale, b: Locale) -> Vec<String> {
        let left: BTreeSet<String> = self.i18n_service.keys(a).into_iter().collect();
        let right: BTreeSet<String> = self.i18n_service.keys(b).into_iter().collect();
        left.symmetric_difference(&right).cloned().collect()
    }
}

fn interpolate(mut text: String, params: &[(&str, &dyn Display)]) -> String {
    for (name, value) in params {
        let placeholder = format!("{{{}}}", name);
        if text.contains(&placeholder) {
            text = text.replace(&placeholder, &value.to_string());
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::services::i18n_service::{I18nError, I18nResult};
    use crate::infrastructure::repositories::preference_fs_repository::InMemoryPreferenceRepository;

    struct TableI18n {
        tables: HashMap<Locale, HashMap<String, String>>,
    }

    impl TableI18n {
        fn new() -> Self {
            let es = [
                ("results.ontime", "Puntual"),
                ("greeting", "Hola {name}, {name}! {missing}"),
                ("only.es", "solo"),
            ];
            let en = [
                ("results.ontime", "On Time"),
                ("greeting", "Hi {name}, {name}! {missing}"),
                ("only.en", "only"),
            ];
            let table = |pairs: &[(&str, &str)]| {
                pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
            };
            let mut tables = HashMap::new();
            tables.insert(Locale::Spanish, table(&es));
            tables.insert(Locale::English, table(&en));
            Self { tables }
        }
    }

    impl I18nService for TableI18n {
        fn translate(&self, key: &str, locale: Locale) -> I18nResult<String> {
            self.tables
                .get(&locale)
                .and_then(|t| t.get(key))
                .cloned()
                .ok_or_else(|| I18nError::KeyNotFound(key.to_string()))
        }

        fn keys(&self, locale: Locale) -> Vec<String> {
            let mut keys: Vec<String> = self.tables[&locale].keys().cloned().collect();
            keys.sort();
            keys
        }

        fn available_locales(&self) -> Vec<Locale> {
            vec![Locale::Spanish, Locale::English]
        }
    }

    fn registry(prefs: Arc<InMemoryPreferenceRepository>) -> I18nApplicationService {
        I18nApplicationService::new(Arc::new(TableI18n::new()), prefs, Locale::Spanish)
    }

    #[test]
    fn test_unknown_key_returns_key() {
        let i18n = registry(Arc::new(InMemoryPreferenceRepository::new()));
        assert_eq!(i18n.t("no.such.key"), "no.such.key");
        assert_eq!(i18n.t("results.ontime"), "Puntual");
    }

    #[test]
    fn test_interpolation_replaces_all_occurrences() {
        let i18n = registry(Arc::new(InMemoryPreferenceRepository::new()));
        let text = i18n.t_with("greeting", &[("name", &"Ana")]);
        assert_eq!(text, "Hola Ana, Ana! {missing}");
    }

    #[test]
    fn test_set_language_persists_and_notifies() {
        let prefs = Arc::new(InMemoryPreferenceRepository::new());
        let i18n = registry(prefs.clone());
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        i18n.on_change(move |locale| {
            assert_eq!(locale, Locale::English);
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(i18n.set_language("en"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(i18n.get_language(), Locale::English);
        assert_eq!(i18n.t("results.ontime"), "On Time");
        assert_eq!(prefs.get(LANGUAGE_KEY).as_deref(), Some("en"));

        // simulated reload
        let reloaded = registry(prefs);
        assert_eq!(reloaded.get_language(), Locale::English);
    }

    #[test]
    fn test_invalid_language_is_ignored() {
        let prefs = Arc::new(InMemoryPreferenceRepository::new());
        let i18n = registry(prefs.clone());
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        i18n.on_change(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!i18n.set_language("fr"));
        assert_eq!(i18n.get_language(), Locale::Spanish);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(prefs.get(LANGUAGE_KEY), None);
    }

    #[test]
    fn test_invalid_persisted_value_uses_fallback() {
        let prefs = Arc::new(InMemoryPreferenceRepository::new());
        prefs.set(LANGUAGE_KEY, "xx").unwrap();
        let i18n = I18nApplicationService::new(Arc::new(TableI18n::new()), prefs, Locale::English);
        assert_eq!(i18n.get_language(), Locale::English);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let i18n = registry(Arc::new(InMemoryPreferenceRepository::new()));
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let id = i18n.on_change(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        i18n.set_language("en");
        assert!(i18n.unsubscribe(id));
        i18n.set_language("es");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_asymmetric_keys() {
        let i18n = registry(Arc::new(InMemoryPreferenceRepository::new()));
        assert_eq!(
            i18n.asymmetric_keys(Locale::Spanish, Locale::English),
            vec!["only.en".to_string(), "only.es".to_string()]
        );
    }
}
