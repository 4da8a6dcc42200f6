// Exportar los módulos principales del proyecto
pub mod common;
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod interfaces;

// Re-exportaciones públicas comunes
pub use application::services::i18n_application_service::I18nApplicationService;
pub use application::services::unit_preference_service::UnitPreferenceService;
pub use application::services::cascade_service::AirportCascadeService;
pub use application::services::prediction_service::PredictionService;
pub use application::services::result_renderer::ResultRenderer;
pub use common::config::AppConfig;
pub use common::di::{AppServiceFactory, AppState};
pub use interfaces::page_controller::PredictionPageController;
