use chrono::NaiveDateTime;
use serde_json::{Map, Value};

/// Binary verdict of the model. The backend contract fixes the encoding:
/// 0 is on time, anything else is delayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    OnTime,
    Delayed,
}

impl Outcome {
    pub fn from_flag(flag: i64) -> Self {
        if flag == 0 {
            Outcome::OnTime
        } else {
            Outcome::Delayed
        }
    }

    pub fn is_on_time(&self) -> bool {
        matches!(self, Outcome::OnTime)
    }
}

/// Weather observed at one airport, in canonical metric units
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub pressure_hpa: Option<f64>,
    pub visibility_m: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub condition: Option<String>,
    pub description: Option<String>,
}

impl WeatherSnapshot {
    /// Description wins over the short condition label
    pub fn condition_text(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .or(self.condition.as_deref())
            .unwrap_or_default()
    }
}

/// Free-form metadata returned with a prediction
pub type PredictionMetadata = Map<String, Value>;

/// Last prediction received from the backend
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub outcome: Outcome,
    pub delay_probability: Option<f64>,
    pub confidence: Option<f64>,
    pub distance_km: Option<f64>,
    pub origin_weather: Option<WeatherSnapshot>,
    pub destination_weather: Option<WeatherSnapshot>,
    pub metadata: Option<PredictionMetadata>,
}

impl PredictionResult {
    /// Metadata value rendered as text, skipping nulls and empty strings
    pub fn metadata_text(&self, key: &str) -> Option<String> {
        let value = self.metadata.as_ref()?.get(key)?;
        match value {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Bool(false) => None,
            other => Some(other.to_string()),
        }
    }
}

/// Flight details collected by the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure: Option<NaiveDateTime>,
}

impl PredictionRequest {
    pub fn new<A, O, D>(airline: A, origin: O, destination: D, departure: Option<NaiveDateTime>) -> Self
    where
        A: Into<String>,
        O: Into<String>,
        D: Into<String>,
    {
        Self {
            airline: airline.into().trim().to_uppercase(),
            origin: origin.into().trim().to_uppercase(),
            destination: destination.into().trim().to_uppercase(),
            departure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_flag() {
        assert_eq!(Outcome::from_flag(0), Outcome::OnTime);
        assert_eq!(Outcome::from_flag(1), Outcome::Delayed);
        assert_eq!(Outcome::from_flag(7), Outcome::Delayed);
    }

    #[test]
    fn test_request_normalizes_codes() {
        let request = PredictionRequest::new("dl", " atl ", "jfk", None);
        assert_eq!(request.airline, "DL");
        assert_eq!(request.origin, "ATL");
        assert_eq!(request.destination, "JFK");
    }

    #[test]
    fn test_metadata_text_skips_empty() {
        let mut metadata = PredictionMetadata::new();
        metadata.insert("ruta".into(), json!("ATL → JFK"));
        metadata.insert("nota".into(), json!(""));
        metadata.insert("distancia_km".into(), json!(1223.5));
        let result = PredictionResult {
            outcome: Outcome::OnTime,
            delay_probability: None,
            confidence: None,
            distance_km: None,
            origin_weather: None,
            destination_weather: None,
            metadata: Some(metadata),
        };
        assert_eq!(result.metadata_text("ruta").as_deref(), Some("ATL → JFK"));
        assert_eq!(result.metadata_text("nota"), None);
        assert_eq!(result.metadata_text("distancia_km").as_deref(), Some("1223.5"));
        assert_eq!(result.metadata_text("missing"), None);
    }

    #[test]
    fn test_condition_text_prefers_description() {
        let weather = WeatherSnapshot {
            condition: Some("Clouds".into()),
            description: Some("nubes dispersas".into()),
            ..Default::default()
        };
        assert_eq!(weather.condition_text(), "nubes dispersas");
        let bare = WeatherSnapshot { condition: Some("Rain".into()), ..Default::default() };
        assert_eq!(bare.condition_text(), "Rain");
        assert_eq!(WeatherSnapshot::default().condition_text(), "");
    }
}
