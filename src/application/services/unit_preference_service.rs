use std::sync::{Arc, PoisonError, RwLock};

use tracing::{error, info, warn};

use crate::application::services::subscriptions::{ChangeNotifier, SubscriptionId};
use crate::domain::entities::unit_system::UnitSystem;
use crate::domain::repositories::preference_repository::{PreferenceRepository, UNIT_KEY};
use crate::domain::services::unit_service;

/// Unit preference store: current measurement system plus formatters
pub struct UnitPreferenceService {
    preferences: Arc<dyn PreferenceRepository>,
    current: RwLock<UnitSystem>,
    notifier: ChangeNotifier<UnitSystem>,
}

impl UnitPreferenceService {
    pub fn new(preferences: Arc<dyn PreferenceRepository>) -> Self {
        let initial = preferences
            .get(UNIT_KEY)
            .and_then(|code| {
                let unit = UnitSystem::from_code(&code);
                if unit.is_none() {
                    warn!("Ignoring persisted unit '{}'", code);
                }
                unit
            })
            .unwrap_or_default();

        Self {
            preferences,
            current: RwLock::new(initial),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Accepts "km", "metric", "miles" or "imperial"; anything else is logged and ignored
    pub fn set_unit(&self, code: &str) -> bool {
        match UnitSystem::from_code(code) {
            Some(unit) => {
                self.set_system(unit);
                true
            }
            None => {
                error!("Unsupported unit system: '{}'", code);
                false
            }
        }
    }

    pub fn set_system(&self, unit: UnitSystem) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = unit;

        if let Err(e) = self.preferences.set(UNIT_KEY, unit.as_str()) {
            warn!("Could not persist unit preference: {}", e);
        }

        info!("Unit system changed to {}", unit);
        self.notifier.emit(unit);
    }

    pub fn get_unit(&self) -> UnitSystem {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn on_change<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(UnitSystem) + Send + Sync + 'static,
    {
        self.notifier.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn distance_value(&self, km: f64) -> f64 {
        unit_service::distance_value(km, self.get_unit())
    }

    pub fn format_distance(&self, km: f64) -> String {
        unit_service::format_distance(km, self.get_unit())
    }

    pub fn format_temperature(&self, celsius: f64) -> String {
        unit_service::format_temperature(celsius, self.get_unit())
    }

    pub fn format_wind_speed(&self, meters_per_second: f64) -> String {
        unit_service::format_wind_speed(meters_per_second, self.get_unit())
    }

    pub fn format_visibility(&self, meters: f64) -> String {
        unit_service::format_visibility(meters, self.get_unit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::domain::repositories::preference_repository::MockPreferenceRepository;
    use crate::infrastructure::repositories::preference_fs_repository::InMemoryPreferenceRepository;

    #[test]
    fn test_defaults_to_metric() {
        let units = UnitPreferenceService::new(Arc::new(InMemoryPreferenceRepository::new()));
        assert_eq!(units.get_unit(), UnitSystem::Metric);
        assert_eq!(units.format_distance(100.0), "100 km");
    }

    #[test]
    fn test_set_unit_formats_and_notifies() {
        let prefs = Arc::new(InMemoryPreferenceRepository::new());
        let units = UnitPreferenceService::new(prefs.clone());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        units.on_change(move |unit| sink.lock().unwrap().push(unit));

        assert!(units.set_unit("miles"));
        assert_eq!(units.format_distance(100.0), "62 mi");
        assert_eq!(units.format_temperature(20.0), "68.0°F");
        assert_eq!(*seen.lock().unwrap(), vec![UnitSystem::Imperial]);
        assert_eq!(prefs.get(UNIT_KEY).as_deref(), Some("miles"));

        let reloaded = UnitPreferenceService::new(prefs);
        assert_eq!(reloaded.get_unit(), UnitSystem::Imperial);
    }

    #[test]
    fn test_invalid_unit_is_ignored() {
        let mut prefs = MockPreferenceRepository::new();
        prefs.expect_get().returning(|_| None);
        prefs.expect_set().never();

        let units = UnitPreferenceService::new(Arc::new(prefs));
        assert!(!units.set_unit("parsecs"));
        assert_eq!(units.get_unit(), UnitSystem::Metric);
    }

    #[test]
    fn test_persist_failure_still_switches() {
        let mut prefs = MockPreferenceRepository::new();
        prefs.expect_get().returning(|_| Some("km".to_string()));
        prefs.expect_set().times(1).returning(|_, _| {
            Err(crate::common::errors::DomainError::internal_error("Preferences", "read-only"))
        });

        let units = UnitPreferenceService::new(Arc::new(prefs));
        assert!(units.set_unit("imperial"));
        assert_eq!(units.get_unit(), UnitSystem::Imperial);
    }
}
