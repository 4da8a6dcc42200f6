use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{Duration, NaiveDateTime, NaiveTime};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::application::ports::outbound::{ApiError, PredictionApiPort};
use crate::application::services::cascade_service::{AirportCascadeService, ValidationError};
use crate::application::services::i18n_application_service::I18nApplicationService;
use crate::domain::entities::prediction::{PredictionRequest, PredictionResult};

/// Exact message the backend uses when the airline/route is not in its dataset
pub const NOT_FOUND_MESSAGE: &str = "No se hallan esos datos en la base de datos.";

/// How a failed request is explained to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Connection,
    Timeout,
    NotFound,
    Airport,
    Generic,
}

impl FailureCategory {
    /// Classifies by error text, first match wins
    pub fn of(err: &ApiError) -> Self {
        let message = err.message();
        if message == NOT_FOUND_MESSAGE {
            FailureCategory::NotFound
        } else if message.contains("Failed to fetch") || message.contains("NetworkError") {
            FailureCategory::Connection
        } else if message.contains("Aeropuerto") {
            FailureCategory::Airport
        } else if message.contains("timeout") {
            FailureCategory::Timeout
        } else {
            FailureCategory::Generic
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("a prediction request is already in flight")]
    Busy,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SubmitError {
    pub fn category(&self) -> Option<FailureCategory> {
        match self {
            SubmitError::Api(err) => Some(FailureCategory::of(err)),
            _ => None,
        }
    }

    /// Localized text for the user, built from translated fragments
    pub fn user_message(&self, i18n: &I18nApplicationService, base_url: &str) -> String {
        let err = match self {
            SubmitError::Busy => return i18n.t("error.submit.busy"),
            SubmitError::Validation(validation) => return validation.localize(i18n),
            SubmitError::Api(err) => err,
        };

        let heading = i18n.t("error.prediction");
        match FailureCategory::of(err) {
            FailureCategory::NotFound => format!(
                "{}\n\n{}\n{}\n{}\n\n{}",
                i18n.t("error.not.found"),
                i18n.t("error.verify"),
                i18n.t("error.airline.valid"),
                i18n.t("error.airports.exist"),
                i18n.t("error.airlines.valid"),
            ),
            FailureCategory::Connection => format!(
                "{}\n\n{}\n{} {}",
                heading,
                i18n.t("error.connection"),
                i18n.t("error.backend"),
                base_url,
            ),
            FailureCategory::Airport => format!(
                "{}\n\n✈️ {}\n\n{}",
                heading,
                err.message(),
                i18n.t("error.airport.hint"),
            ),
            FailureCategory::Timeout => format!(
                "{}\n\n{}\n{}",
                heading,
                i18n.t("error.timeout"),
                i18n.t("error.server.busy"),
            ),
            FailureCategory::Generic => format!("{}\n\n⚠️ {}", heading, err.message()),
        }
    }
}

/// Clears the in-flight flag on every exit path
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Form submission: validation, the single in-flight request and the
/// last-result slot used for re-rendering
pub struct PredictionService {
    api: Arc<dyn PredictionApiPort>,
    cascade: Arc<AirportCascadeService>,
    in_flight: AtomicBool,
    last_result: RwLock<Option<PredictionResult>>,
}

impl PredictionService {
    pub fn new(api: Arc<dyn PredictionApiPort>, cascade: Arc<AirportCascadeService>) -> Self {
        Self {
            api,
            cascade,
            in_flight: AtomicBool::new(false),
            last_result: RwLock::new(None),
        }
    }

    /// Validates, sends and caches a prediction
    ///
    /// Invalid requests never reach the network. A failure leaves the
    /// previous result in place.
    #[instrument(skip(self), fields(airline = %request.airline, origin = %request.origin, destination = %request.destination))]
    pub async fn submit(&self, request: PredictionRequest) -> Result<PredictionResult, SubmitError> {
        if let Err(e) = self.cascade.validate(&request) {
            warn!("Rejected prediction request: {}", e);
            return Err(e.into());
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Prediction already in flight, ignoring submission");
            return Err(SubmitError::Busy);
        }
        let _guard = InFlightGuard(&self.in_flight);

        match self.api.predict(&request).await {
            Ok(result) => {
                info!("Prediction received: {:?}", result.outcome);
                *self.last_result.write().unwrap_or_else(PoisonError::into_inner) = Some(result.clone());
                Ok(result)
            }
            Err(e) => {
                error!("Prediction request failed: {}", e);
                Err(e.into())
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn last_result(&self) -> Option<PredictionResult> {
        self.last_result.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Empties the last-result slot
    pub fn clear(&self) {
        self.last_result.write().unwrap_or_else(PoisonError::into_inner).take();
    }

    pub fn base_url(&self) -> String {
        self.api.base_url()
    }
}

/// Departure the form starts with: tomorrow at 10:00
pub fn default_departure(now: NaiveDateTime) -> NaiveDateTime {
    let tomorrow = now.date() + Duration::days(1);
    tomorrow.and_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default())
}
