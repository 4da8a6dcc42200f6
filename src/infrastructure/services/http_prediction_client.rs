use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::application::dtos::prediction_dto::{ErrorBodyDto, PredictionRequestDto, PredictionResponseDto};
use crate::application::dtos::stats_dto::StatsResponseDto;
use crate::application::ports::outbound::{ApiError, PredictionApiPort};
use crate::common::config::{ApiConfig, TimeoutConfig};
use crate::domain::entities::prediction::{PredictionRequest, PredictionResult};
use crate::domain::entities::stats::DashboardStats;

/// REST adapter for the prediction backend
pub struct HttpPredictionClient {
    client: Client,
    config: ApiConfig,
    timeouts: TimeoutConfig,
}

impl HttpPredictionClient {
    pub fn new(config: ApiConfig, timeouts: TimeoutConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            timeouts,
        }
    }

    fn map_transport_error(err: reqwest::Error, timeout: Duration) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(format!("no answer after {} ms", timeout.as_millis()))
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Connection(err.to_string())
        }
    }

    /// Non-2xx responses become `ApiError::Status` with the best server message
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBodyDto>(&body)
            .ok()
            .and_then(|dto| dto.best_message())
            .unwrap_or_else(|| default_status_message(status));

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response, timeout: Duration) -> Result<T, ApiError> {
        let body = response
            .text()
            .await
            .map_err(|e| Self::map_transport_error(e, timeout))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn default_status_message(status: StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )
}

#[async_trait]
impl PredictionApiPort for HttpPredictionClient {
    #[instrument(skip(self, request), fields(url = %self.config.predict_url()))]
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ApiError> {
        let timeout = self.timeouts.request_timeout();
        let body = PredictionRequestDto::from(request);
        debug!("Sending prediction request: {:?}", body);

        let response = self
            .client
            .post(self.config.predict_url())
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::map_transport_error(e, timeout))?;
        let response = Self::check_status(response).await?;

        let dto: PredictionResponseDto = Self::read_json(response, timeout).await?;
        dto.into_domain()
    }

    #[instrument(skip(self), fields(url = %self.config.health_url()))]
    async fn health(&self) -> Result<(), ApiError> {
        let timeout = self.timeouts.health_timeout();
        let response = self
            .client
            .get(self.config.health_url())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::map_transport_error(e, timeout))?;
        Self::check_status(response).await.map(|_| ())
    }

    #[instrument(skip(self), fields(url = %self.config.stats_url()))]
    async fn stats(&self) -> Result<DashboardStats, ApiError> {
        let timeout = self.timeouts.request_timeout();
        let response = self
            .client
            .get(self.config.stats_url())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::map_transport_error(e, timeout))?;
        let response = Self::check_status(response).await?;

        let dto: StatsResponseDto = Self::read_json(response, timeout).await?;
        Ok(dto.into())
    }

    fn base_url(&self) -> String {
        self.config.base_url.clone()
    }
}
