use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::prediction::{PredictionRequest, PredictionResult};
use crate::domain::entities::stats::DashboardStats;

/// Errores del transporte hacia el backend de predicción
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// No se pudo establecer la conexión
    #[error("Failed to fetch: {0}")]
    Connection(String),

    /// La solicitud excedió el tiempo de espera
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Respuesta no exitosa, con el mensaje que el servidor haya enviado
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Respuesta 2xx que reporta un error de negocio en su cuerpo
    #[error("{0}")]
    Business(String),

    /// Cuerpo de respuesta con forma inesperada
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Texto que se usa para clasificar el error
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Puerto secundario hacia la API REST de predicción
#[cfg_attr(any(test, feature = "test_utils"), mockall::automock)]
#[async_trait]
pub trait PredictionApiPort: Send + Sync + 'static {
    /// POST /predict
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ApiError>;

    /// GET /health, Ok solo para respuestas 2xx
    async fn health(&self) -> Result<(), ApiError>;

    /// GET /stats
    async fn stats(&self) -> Result<DashboardStats, ApiError>;

    /// URL base, usada en los mensajes de conectividad
    fn base_url(&self) -> String;
}
