pub mod subscriptions;
pub mod i18n_application_service;
pub mod unit_preference_service;
pub mod cascade_service;
pub mod result_renderer;
pub mod prediction_service;
pub mod health_service;
pub mod stats_service;


// Re-exportar para facilitar acceso
pub use cascade_service::{AirportCascadeService, CascadeSnapshot, ValidationError};
pub use i18n_application_service::I18nApplicationService;
pub use prediction_service::{PredictionService, SubmitError};
pub use result_renderer::ResultRenderer;
pub use stats_service::StatsService;
pub use unit_preference_service::UnitPreferenceService;
