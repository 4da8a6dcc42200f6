use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::application::ports::view_ports::FormField;
use crate::application::services::i18n_application_service::I18nApplicationService;
use crate::common::errors::{DomainError, ErrorKind};
use crate::domain::entities::airline::{normalize_code, AirlineAirports, AirportIndex};
use crate::domain::entities::prediction::PredictionRequest;
use crate::domain::repositories::airport_index_repository::AirportIndexRepository;

/// Reasons a form submission is rejected before any request is sent
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("airline is required")]
    MissingAirline,

    #[error("origin airport is required")]
    MissingOrigin,

    #[error("destination airport is required")]
    MissingDestination,

    #[error("origin and destination are the same airport ({0})")]
    SameAirport(String),

    #[error("airport data could not be loaded")]
    IndexUnavailable,

    #[error("no airport data for airline {0}")]
    UnknownAirline(String),

    #[error("origin airport {airport} is not served by {airline}")]
    OriginNotServed { airline: String, airport: String },

    #[error("destination airport {airport} is not served by {airline}")]
    DestinationNotServed { airline: String, airport: String },
}

impl ValidationError {
    /// Control the message refers to
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::MissingAirline
            | ValidationError::IndexUnavailable
            | ValidationError::UnknownAirline(_) => FormField::Airline,
            ValidationError::MissingOrigin | ValidationError::OriginNotServed { .. } => {
                FormField::Origin
            }
            ValidationError::MissingDestination
            | ValidationError::SameAirport(_)
            | ValidationError::DestinationNotServed { .. } => FormField::Destination,
        }
    }

    /// True when the failure comes from missing data rather than user input
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ValidationError::IndexUnavailable | ValidationError::UnknownAirline(_)
        )
    }

    pub fn localize(&self, i18n: &I18nApplicationService) -> String {
        match self {
            ValidationError::MissingAirline => i18n.t("error.airline.required"),
            ValidationError::MissingOrigin => i18n.t("error.origin.required"),
            ValidationError::MissingDestination => i18n.t("error.destination.required"),
            ValidationError::SameAirport(_) => i18n.t("error.same.airport"),
            ValidationError::IndexUnavailable => i18n.t("error.airports.data"),
            ValidationError::UnknownAirline(airline) => {
                i18n.t_with("error.airline.no.data", &[("airline", airline)])
            }
            ValidationError::OriginNotServed { airline, airport } => i18n.t_with(
                "error.origin.invalid",
                &[("airport", airport), ("airline", airline)],
            ),
            ValidationError::DestinationNotServed { airline, airport } => i18n.t_with(
                "error.destination.invalid",
                &[("airport", airport), ("airline", airline)],
            ),
        }
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let kind = if err.is_configuration() {
            ErrorKind::Configuration
        } else {
            ErrorKind::InvalidInput
        };
        DomainError::new(kind, "Flight", err.to_string())
    }
}

/// State of the airline/origin/destination controls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeSnapshot {
    pub airline: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub origin_options: Vec<String>,
    pub destination_options: Vec<String>,
    pub enabled: bool,
}

/// Dependent airline → origin → destination selection
///
/// Option lists always come from the loaded index; the destination list
/// never contains the selected origin.
pub struct AirportCascadeService {
    index: Option<Arc<AirportIndex>>,
    state: RwLock<CascadeSnapshot>,
}

impl AirportCascadeService {
    /// `None` means the index could not be loaded; every selection then fails
    pub fn new(index: Option<AirportIndex>) -> Self {
        Self {
            index: index.map(Arc::new),
            state: RwLock::new(CascadeSnapshot::default()),
        }
    }

    /// Loads the index through the repository, degrading to an empty cascade
    pub async fn load(repository: &dyn AirportIndexRepository) -> Self {
        match repository.load_index().await {
            Ok(index) => {
                info!("Airport index loaded: {} airlines", index.len());
                Self::new(Some(index))
            }
            Err(e) => {
                error!("Airport index unavailable: {}", e);
                Self::new(None)
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.index.is_some()
    }

    pub fn index(&self) -> Option<&AirportIndex> {
        self.index.as_deref()
    }

    pub fn snapshot(&self) -> CascadeSnapshot {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Change the airline. Origin and destination are always cleared first.
    pub fn select_airline(&self, airline: Option<&str>) -> Result<CascadeSnapshot, ValidationError> {
        let airline = airline.map(normalize_code).filter(|code| !code.is_empty());
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        *state = CascadeSnapshot {
            airline: airline.clone(),
            ..CascadeSnapshot::default()
        };

        let Some(code) = airline else {
            return Ok(state.clone());
        };

        let airports = self.airports_for(&code)?;
        state.origin_options = airports.origins();
        state.destination_options = airports.destinations_excluding(None);
        state.enabled = true;

        debug!(
            "Airline {}: {} origins, {} destinations",
            code,
            state.origin_options.len(),
            state.destination_options.len()
        );
        Ok(state.clone())
    }

    /// Change the origin and recompute the destination options
    pub fn select_origin(&self, origin: Option<&str>) -> CascadeSnapshot {
        let origin = origin.map(normalize_code).filter(|code| !code.is_empty());
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.origin = origin.clone();

        let airports = state
            .airline
            .as_deref()
            .and_then(|code| self.index.as_ref()?.get(code));

        if let Some(airports) = airports {
            state.destination_options = airports.destinations_excluding(origin.as_deref());
            let keep = state
                .destination
                .as_ref()
                .is_some_and(|d| state.destination_options.contains(d));
            if !keep {
                state.destination = None;
            }
            debug!(
                "Destinations for origin {:?}: {}",
                origin,
                state.destination_options.len()
            );
        }

        state.clone()
    }

    pub fn select_destination(&self, destination: Option<&str>) -> CascadeSnapshot {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.destination = destination.map(normalize_code).filter(|code| !code.is_empty());
        state.clone()
    }

    /// Back to the initial, disabled state
    pub fn reset(&self) -> CascadeSnapshot {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = CascadeSnapshot::default();
        state.clone()
    }

    /// Checks a candidate request against the index
    pub fn validate(&self, request: &PredictionRequest) -> Result<(), ValidationError> {
        if request.airline.is_empty() {
            return Err(ValidationError::MissingAirline);
        }
        if request.origin.is_empty() {
            return Err(ValidationError::MissingOrigin);
        }
        if request.destination.is_empty() {
            return Err(ValidationError::MissingDestination);
        }
        if request.origin == request.destination {
            return Err(ValidationError::SameAirport(request.origin.clone()));
        }

        let airports = self.airports_for(&request.airline)?;

        if !airports.origin_airports.contains(&request.origin) {
            return Err(ValidationError::OriginNotServed {
                airline: request.airline.clone(),
                airport: request.origin.clone(),
            });
        }
        if !airports.destination_airports.contains(&request.destination) {
            return Err(ValidationError::DestinationNotServed {
                airline: request.airline.clone(),
                airport: request.destination.clone(),
            });
        }

        Ok(())
    }

    fn airports_for(&self, airline: &str) -> Result<&AirlineAirports, ValidationError> {
        let index = self.index.as_ref().ok_or(ValidationError::IndexUnavailable)?;
        index
            .get(airline)
            .ok_or_else(|| ValidationError::UnknownAirline(airline.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::common::errors::DomainError;
    use crate::domain::repositories::airport_index_repository::MockAirportIndexRepository;

    fn index() -> AirportIndex {
        AirportIndex::from_json(
            r#"{
                "9E": {"ORIGIN": ["JFK", "ATL", "LGA"], "DEST": ["JFK", "ABQ", "ATL"]},
                "DL": {"ORIGIN": ["ATL", "JFK"], "DEST": ["ATL", "JFK", "LAX"]}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_airline_populates_sorted_options() {
        let cascade = AirportCascadeService::new(Some(index()));
        let snap = cascade.select_airline(Some("9E")).unwrap();

        assert!(snap.enabled);
        assert_eq!(snap.origin_options, vec!["ATL", "JFK", "LGA"]);
        assert!(!snap.origin_options.contains(&"ABQ".to_string()));
        assert_eq!(snap.destination_options, vec!["ABQ", "ATL", "JFK"]);
    }

    #[test]
    fn test_origin_excluded_from_destinations() {
        let cascade = AirportCascadeService::new(Some(index()));
        cascade.select_airline(Some("9E")).unwrap();
        let snap = cascade.select_origin(Some("JFK"));
        assert_eq!(snap.destination_options, vec!["ABQ", "ATL"]);
    }

    #[test]
    fn test_destination_cleared_when_equal_to_new_origin() {
        let cascade = AirportCascadeService::new(Some(index()));
        cascade.select_airline(Some("9E")).unwrap();
        cascade.select_destination(Some("ABQ"));
        let snap = cascade.select_origin(Some("JFK"));
        assert_eq!(snap.destination.as_deref(), Some("ABQ"));

        cascade.select_destination(Some("ATL"));
        let snap = cascade.select_origin(Some("ATL"));
        assert_eq!(snap.destination, None);
        assert!(!snap.destination_options.contains(&"ATL".to_string()));
    }

    #[test]
    fn test_changing_airline_resets_selection() {
        let cascade = AirportCascadeService::new(Some(index()));
        cascade.select_airline(Some("9E")).unwrap();
        cascade.select_origin(Some("JFK"));
        cascade.select_destination(Some("ABQ"));

        let snap = cascade.select_airline(Some("DL")).unwrap();
        assert_eq!(snap.origin, None);
        assert_eq!(snap.destination, None);
        assert_eq!(snap.airline.as_deref(), Some("DL"));
    }

    #[test]
    fn test_no_airline_disables_controls() {
        let cascade = AirportCascadeService::new(Some(index()));
        cascade.select_airline(Some("9E")).unwrap();
        let snap = cascade.select_airline(None).unwrap();
        assert!(!snap.enabled);
        assert!(snap.origin_options.is_empty());
        assert!(snap.destination_options.is_empty());
    }

    #[test]
    fn test_unknown_airline_is_configuration_error() {
        let cascade = AirportCascadeService::new(Some(index()));
        let err = cascade.select_airline(Some("ZZ")).unwrap_err();
        assert_eq!(err, ValidationError::UnknownAirline("ZZ".into()));
        assert!(err.is_configuration());
        let snap = cascade.snapshot();
        assert!(!snap.enabled);
        assert!(snap.origin_options.is_empty());
    }

    #[test]
    fn test_missing_index_degrades() {
        let cascade = AirportCascadeService::new(None);
        assert_eq!(
            cascade.select_airline(Some("DL")).unwrap_err(),
            ValidationError::IndexUnavailable
        );
        assert!(!cascade.snapshot().enabled);
    }

    #[test]
    fn test_validate() {
        let cascade = AirportCascadeService::new(Some(index()));
        let ok = PredictionRequest::new("DL", "ATL", "JFK", None);
        assert_eq!(cascade.validate(&ok), Ok(()));

        let same = PredictionRequest::new("DL", "ATL", "ATL", None);
        assert_eq!(cascade.validate(&same), Err(ValidationError::SameAirport("ATL".into())));

        let origin = PredictionRequest::new("DL", "LGA", "JFK", None);
        let err = cascade.validate(&origin).unwrap_err();
        assert_eq!(err.field(), FormField::Origin);

        let dest = PredictionRequest::new("9E", "JFK", "LAX", None);
        assert!(matches!(
            cascade.validate(&dest),
            Err(ValidationError::DestinationNotServed { ref airport, .. }) if airport == "LAX"
        ));

        let unknown = PredictionRequest::new("ZZ", "ATL", "JFK", None);
        let err: DomainError = cascade.validate(&unknown).unwrap_err().into();
        assert_eq!(err.kind, ErrorKind::Configuration);

        let missing = PredictionRequest::new("DL", "", "JFK", None);
        assert_eq!(cascade.validate(&missing), Err(ValidationError::MissingOrigin));
    }

    #[tokio::test]
    async fn test_load_failure_yields_unavailable_cascade() {
        let mut repo = MockAirportIndexRepository::new();
        repo.expect_load_index()
            .returning(|| Err(DomainError::configuration("AirportIndex", "missing file")));

        let cascade = AirportCascadeService::load(&repo).await;
        assert!(!cascade.is_available());
    }
}
