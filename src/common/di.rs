use std::sync::Arc;

use crate::application::ports::outbound::PredictionApiPort;
use crate::application::services::cascade_service::AirportCascadeService;
use crate::application::services::health_service::HealthService;
use crate::application::services::i18n_application_service::I18nApplicationService;
use crate::application::services::prediction_service::PredictionService;
use crate::application::services::result_renderer::ResultRenderer;
use crate::application::services::stats_service::StatsService;
use crate::application::services::unit_preference_service::UnitPreferenceService;
use crate::common::config::AppConfig;
use crate::common::errors::{DomainError, ErrorContext, ErrorKind};
use crate::domain::repositories::preference_repository::PreferenceRepository;
use crate::domain::services::i18n_service::I18nService;
use crate::infrastructure::repositories::airport_index_fs_repository::AirportIndexFsRepository;
use crate::infrastructure::repositories::preference_fs_repository::PreferenceFsRepository;
use crate::infrastructure::services::file_system_i18n_service::FileSystemI18nService;
use crate::infrastructure::services::http_prediction_client::HttpPredictionClient;

/// Fábrica para los diferentes componentes de la aplicación
pub struct AppServiceFactory {
    config: AppConfig,
}

impl AppServiceFactory {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Crea los servicios base: traducciones, preferencias y unidades
    pub async fn create_core_services(&self) -> Result<CoreServices, DomainError> {
        let i18n_service = match &self.config.storage.locales_dir {
            Some(dir) => {
                let service = FileSystemI18nService::with_directory(dir.clone())
                    .with_error_kind(ErrorKind::Configuration, "Translations")?;
                let loaded = service
                    .load_all_translations()
                    .await
                    .into_iter()
                    .filter(|(_, result)| result.is_ok())
                    .count();
                tracing::info!("{} translation tables loaded from {:?}", loaded, dir);
                service
            }
            None => FileSystemI18nService::embedded()
                .with_context(|| "Embedded translation tables are invalid")?,
        };
        let i18n_service: Arc<dyn I18nService> = Arc::new(i18n_service);

        let preferences: Arc<dyn PreferenceRepository> = Arc::new(PreferenceFsRepository::open(
            self.config.storage.preferences_path.clone(),
        ));

        Ok(CoreServices::new(i18n_service, preferences))
    }

    /// Construye el estado completo con el cliente HTTP real
    pub async fn build(&self) -> Result<AppState, DomainError> {
        let core = self.create_core_services().await?;

        let index_repository = AirportIndexFsRepository::new(self.config.storage.airports_path.clone());
        let cascade = Arc::new(AirportCascadeService::load(&index_repository).await);

        let api: Arc<dyn PredictionApiPort> = Arc::new(HttpPredictionClient::new(
            self.config.api.clone(),
            self.config.timeouts.clone(),
        ));

        Ok(AppState::assemble(self.config.clone(), core, cascade, api))
    }
}

/// Servicios compartidos por todas las vistas
#[derive(Clone)]
pub struct CoreServices {
    pub i18n: Arc<I18nApplicationService>,
    pub units: Arc<UnitPreferenceService>,
    pub preferences: Arc<dyn PreferenceRepository>,
}

impl CoreServices {
    /// Restores the persisted language, else the system one
    pub fn new(i18n_service: Arc<dyn I18nService>, preferences: Arc<dyn PreferenceRepository>) -> Self {
        Self {
            i18n: Arc::new(I18nApplicationService::with_system_default(
                i18n_service,
                preferences.clone(),
            )),
            units: Arc::new(UnitPreferenceService::new(preferences.clone())),
            preferences,
        }
    }
}

/// Servicios de aplicación de la página de predicción
#[derive(Clone)]
pub struct ApplicationServices {
    pub cascade: Arc<AirportCascadeService>,
    pub prediction: Arc<PredictionService>,
    pub renderer: Arc<ResultRenderer>,
    pub health: Arc<HealthService>,
    pub stats: Arc<StatsService>,
}

/// Estado global de la aplicación para inyección de dependencias
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub core: CoreServices,
    pub applications: ApplicationServices,
    pub api: Arc<dyn PredictionApiPort>,
}

impl AppState {
    /// Wires the application services over an existing core and transport
    pub fn assemble(
        config: AppConfig,
        core: CoreServices,
        cascade: Arc<AirportCascadeService>,
        api: Arc<dyn PredictionApiPort>,
    ) -> Self {
        let applications = ApplicationServices {
            prediction: Arc::new(PredictionService::new(api.clone(), cascade.clone())),
            renderer: Arc::new(ResultRenderer::new(core.i18n.clone(), core.units.clone())),
            health: Arc::new(HealthService::new(api.clone())),
            stats: Arc::new(StatsService::new(api.clone(), core.i18n.clone())),
            cascade,
        };

        Self {
            config,
            core,
            applications,
            api,
        }
    }
}
