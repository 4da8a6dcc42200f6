use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuración del backend de predicción
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// URL base del backend (ej: "http://localhost:8080/api")
    pub base_url: String,
    /// Ruta del endpoint de predicción
    pub predict_path: String,
    /// Ruta del endpoint de salud
    pub health_path: String,
    /// Ruta del endpoint de estadísticas
    pub stats_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            predict_path: "/predict".to_string(),
            health_path: "/health".to_string(),
            stats_path: "/stats".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn predict_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.predict_path)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.health_path)
    }

    pub fn stats_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.stats_path)
    }
}

/// Configuración de timeouts para operaciones de red
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Timeout para la solicitud de predicción (ms)
    pub request_ms: u64,
    /// Timeout para el health check (ms)
    pub health_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_ms: 30_000, // 30 segundos
            health_ms: 5_000,   // 5 segundos
        }
    }
}

impl TimeoutConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_ms)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_ms)
    }
}

/// Configuración del refresco periódico de estadísticas
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Intervalo entre consultas a /stats (segundos)
    pub stats_interval_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            stats_interval_secs: 5 * 60, // 5 minutos
        }
    }
}

impl PollingConfig {
    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_secs.max(1))
    }
}

/// Rutas de los datos locales del cliente
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directorio opcional con traducciones que reemplazan a las embebidas
    pub locales_dir: Option<PathBuf>,
    /// Documento JSON aerolínea -> aeropuertos
    pub airports_path: PathBuf,
    /// Archivo de preferencias persistidas (idioma, unidades)
    pub preferences_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let preferences_path = dirs::home_dir()
            .map(|home| home.join(".flightontime"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("preferences.json");

        Self {
            locales_dir: None,
            airports_path: PathBuf::from("static/aerolinea_origin_dest.json"),
            preferences_path,
        }
    }
}

/// Configuración global de la aplicación
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub timeouts: TimeoutConfig,
    pub polling: PollingConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno, con valores por defecto
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("FLIGHTONTIME_API_URL") {
            config.api.base_url = url;
        }
        if let Ok(dir) = env::var("FLIGHTONTIME_LOCALES_DIR") {
            config.storage.locales_dir = Some(PathBuf::from(dir));
        }
        if let Ok(path) = env::var("FLIGHTONTIME_AIRPORTS_PATH") {
            config.storage.airports_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("FLIGHTONTIME_PREFS_PATH") {
            config.storage.preferences_path = PathBuf::from(path);
        }
        if let Some(secs) = parse_env::<u64>("FLIGHTONTIME_STATS_INTERVAL_SECS") {
            config.polling.stats_interval_secs = secs;
        }
        if let Some(ms) = parse_env::<u64>("FLIGHTONTIME_TIMEOUT_MS") {
            config.timeouts.request_ms = ms;
        }

        config
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid value for {}: {:?}", name, raw);
                None
            }
        },
        Err(_) => None,
    }
}
