use crate::common::errors::Result;

/// Persisted key used for the display language
pub const LANGUAGE_KEY: &str = "flightontime_language";
/// Persisted key used for the unit system
pub const UNIT_KEY: &str = "flightontime_distance_unit";

/// Client-local key-value storage that survives across sessions
///
/// Reads happen once when a store is constructed; writes happen on every
/// successful preference change.
#[cfg_attr(any(test, feature = "test_utils"), mockall::automock)]
pub trait PreferenceRepository: Send + Sync + 'static {
    /// Value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing the previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
