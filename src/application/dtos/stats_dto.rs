use serde::Deserialize;

use crate::domain::entities::stats::{AirlineStat, AirportStat, DashboardStats};

/// Body of GET /stats
#[derive(Debug, Deserialize, Default)]
pub struct StatsResponseDto {
    #[serde(rename = "total_predicciones", default)]
    pub total_predictions: Option<u64>,

    #[serde(rename = "total_retrasados", default)]
    pub total_delayed: Option<u64>,

    #[serde(rename = "porcentaje_retrasados", default)]
    pub delayed_percentage: Option<f64>,

    #[serde(rename = "porcentaje_puntuales", default)]
    pub on_time_percentage: Option<f64>,

    #[serde(rename = "estadisticas_por_aerolinea", default)]
    pub by_airline: Vec<AirlineStatDto>,

    #[serde(rename = "estadisticas_por_aeropuerto_origen", default)]
    pub by_origin_airport: Vec<AirportStatDto>,

    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AirlineStatDto {
    #[serde(rename = "aerolinea", default)]
    pub airline: String,

    #[serde(rename = "aerolinea_nombre", default)]
    pub airline_name: Option<String>,

    #[serde(default)]
    pub total: Option<u64>,

    #[serde(rename = "retrasados", default)]
    pub delayed: Option<u64>,

    #[serde(rename = "porcentaje_retrasados", default)]
    pub delayed_percentage: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AirportStatDto {
    #[serde(rename = "aeropuerto", default)]
    pub airport: String,

    #[serde(rename = "aeropuerto_nombre", default)]
    pub airport_name: Option<String>,

    #[serde(rename = "aeropuerto_ciudad", default)]
    pub airport_city: Option<String>,

    #[serde(default)]
    pub total: Option<u64>,

    #[serde(rename = "retrasados", default)]
    pub delayed: Option<u64>,

    #[serde(rename = "porcentaje_retrasados", default)]
    pub delayed_percentage: Option<f64>,
}

impl From<StatsResponseDto> for DashboardStats {
    fn from(dto: StatsResponseDto) -> Self {
        Self {
            total_predictions: dto.total_predictions.unwrap_or(0),
            total_delayed: dto.total_delayed,
            delayed_percentage: dto.delayed_percentage,
            on_time_percentage: dto.on_time_percentage,
            by_airline: dto
                .by_airline
                .into_iter()
                .map(|s| AirlineStat {
                    airline: s.airline,
                    airline_name: s.airline_name,
                    total: s.total.unwrap_or(0),
                    delayed: s.delayed.unwrap_or(0),
                    delayed_percentage: s.delayed_percentage.unwrap_or(0.0),
                })
                .collect(),
            by_origin_airport: dto
                .by_origin_airport
                .into_iter()
                .map(|s| AirportStat {
                    airport: s.airport,
                    airport_name: s.airport_name,
                    airport_city: s.airport_city,
                    total: s.total.unwrap_or(0),
                    delayed: s.delayed.unwrap_or(0),
                    delayed_percentage: s.delayed_percentage.unwrap_or(0.0),
                })
                .collect(),
            timestamp: dto.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_with_null_percentages() {
        let dto: StatsResponseDto = serde_json::from_str(
            r#"{
                "fecha": "2026-10-18",
                "total_predicciones": 0,
                "total_retrasados": 0,
                "porcentaje_retrasados": null,
                "porcentaje_puntuales": null,
                "estadisticas_por_aerolinea": [],
                "estadisticas_por_aeropuerto_origen": [],
                "timestamp": "2026-10-18T09:15:00"
            }"#,
        )
        .unwrap();
        let stats = DashboardStats::from(dto);
        assert_eq!(stats.total_predictions, 0);
        assert!(stats.delayed_percentage.is_none());
        assert_eq!(stats.timestamp.as_deref(), Some("2026-10-18T09:15:00"));
    }

    #[test]
    fn test_breakdowns() {
        let dto: StatsResponseDto = serde_json::from_str(
            r#"{
                "total_predicciones": 12,
                "estadisticas_por_aerolinea": [
                    {"aerolinea": "DL", "aerolinea_nombre": "Delta Air Lines Inc. (DL)", "total": 8,
                     "retrasados": 3, "probabilidad_promedio": 0.41, "porcentaje_retrasados": 37.5}
                ],
                "estadisticas_por_aeropuerto_origen": [
                    {"aeropuerto": "ATL", "aeropuerto_nombre": "Hartsfield-Jackson", "aeropuerto_ciudad": "Atlanta",
                     "total": 5, "retrasados": 1, "porcentaje_retrasados": 20.0}
                ]
            }"#,
        )
        .unwrap();
        let stats = DashboardStats::from(dto);
        assert_eq!(stats.by_airline[0].delayed, 3);
        assert_eq!(stats.by_origin_airport[0].title(), "ATL - Hartsfield-Jackson (Atlanta)");
    }
}
