use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::ports::outbound::ApiError;
use crate::domain::entities::prediction::{Outcome, PredictionRequest, PredictionResult, WeatherSnapshot};

/// Wire format of POST /predict
#[derive(Debug, Serialize, PartialEq)]
pub struct PredictionRequestDto {
    #[serde(rename = "aerolinea")]
    pub airline: String,

    #[serde(rename = "origen")]
    pub origin: String,

    #[serde(rename = "destino")]
    pub destination: String,

    /// ISO-8601 local date-time, e.g. "2025-12-25T14:30:00"
    #[serde(rename = "fecha_partida")]
    pub departure: Option<String>,
}

impl From<&PredictionRequest> for PredictionRequestDto {
    fn from(request: &PredictionRequest) -> Self {
        Self {
            airline: request.airline.clone(),
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            departure: request.departure.map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}

/// Weather block of a prediction response
#[derive(Debug, Deserialize, Default)]
pub struct WeatherDto {
    #[serde(rename = "temperatura", alias = "temperature", default)]
    pub temperature: Option<f64>,

    #[serde(rename = "humedad", alias = "humidity", default)]
    pub humidity: Option<f64>,

    #[serde(rename = "presion", alias = "pressure", default)]
    pub pressure: Option<f64>,

    #[serde(rename = "visibilidad", alias = "visibility", default)]
    pub visibility: Option<f64>,

    #[serde(rename = "viento_velocidad", alias = "windSpeed", default)]
    pub wind_speed: Option<f64>,

    #[serde(rename = "condicion", alias = "condition", default)]
    pub condition: Option<String>,

    #[serde(rename = "descripcion", alias = "description", default)]
    pub description: Option<String>,
}

impl From<WeatherDto> for WeatherSnapshot {
    fn from(dto: WeatherDto) -> Self {
        Self {
            temperature_c: dto.temperature,
            humidity_pct: dto.humidity,
            pressure_hpa: dto.pressure,
            visibility_m: dto.visibility,
            wind_speed_ms: dto.wind_speed,
            condition: dto.condition,
            description: dto.description,
        }
    }
}

/// Successful body of POST /predict. Spanish field names are what the backend
/// sends; the English aliases are accepted as well.
#[derive(Debug, Deserialize, Default)]
pub struct PredictionResponseDto {
    /// 0/1, or the string "Error" when the backend reports a business error
    #[serde(rename = "prediccion", alias = "outcome", default)]
    pub prediction: Option<Value>,

    #[serde(rename = "probabilidad_retraso", alias = "delayProbability", default)]
    pub delay_probability: Option<f64>,

    #[serde(rename = "confianza", alias = "confidence", default)]
    pub confidence: Option<f64>,

    #[serde(rename = "distancia_km", alias = "distanceKm", default)]
    pub distance_km: Option<f64>,

    #[serde(rename = "clima_origen", alias = "originWeather", default)]
    pub origin_weather: Option<WeatherDto>,

    #[serde(rename = "clima_destino", alias = "destWeather", default)]
    pub destination_weather: Option<WeatherDto>,

    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl PredictionResponseDto {
    pub fn into_domain(self) -> Result<PredictionResult, ApiError> {
        let flag = match &self.prediction {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| if f == 0.0 { 0 } else { 1 })),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("error") => {
                let message = self
                    .metadata
                    .as_ref()
                    .and_then(|m| m.get("error"))
                    .and_then(Value::as_str)
                    .unwrap_or("Error")
                    .to_string();
                return Err(ApiError::Business(message));
            }
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        let flag = flag.ok_or_else(|| {
            ApiError::Decode(format!("missing or invalid prediction flag: {:?}", self.prediction))
        })?;

        Ok(PredictionResult {
            outcome: Outcome::from_flag(flag),
            delay_probability: self.delay_probability,
            confidence: self.confidence,
            distance_km: self.distance_km,
            origin_weather: self.origin_weather.map(WeatherSnapshot::from),
            destination_weather: self.destination_weather.map(WeatherSnapshot::from),
            metadata: self.metadata,
        })
    }
}

/// Body of a failed request; the message may sit under any of these keys
#[derive(Debug, Deserialize, Default)]
pub struct ErrorBodyDto {
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

impl ErrorBodyDto {
    /// First non-empty of `detail`, `error`, `message`
    pub fn best_message(&self) -> Option<String> {
        [&self.detail, &self.error, &self.message]
            .into_iter()
            .flatten()
            .filter_map(|value| match value {
                Value::Null => None,
                Value::String(s) if s.trim().is_empty() => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .next()
    }
}
