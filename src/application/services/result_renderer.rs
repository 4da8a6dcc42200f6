use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::warn;

use crate::application::dtos::view_models::{
    MetadataItem, MetricEntry, ResultView, StatusKind, StatusView, WeatherPanel, WeatherRow,
};
use crate::application::services::i18n_application_service::I18nApplicationService;
use crate::application::services::unit_preference_service::UnitPreferenceService;
use crate::domain::entities::prediction::{PredictionResult, WeatherSnapshot};
use crate::domain::entities::unit_system::UnitSystem;
use crate::domain::services::date_format::{format_datetime, format_timestamp};
use crate::domain::services::i18n_service::Locale;
use crate::domain::services::unit_service;
use crate::domain::services::weather_conditions::translate_condition;

/// Placeholder for a value the backend did not send
pub const MISSING_VALUE: &str = "—";

/// Source of "now" for the calculation timestamp
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[derive(Debug, Error)]
enum SectionError {
    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },
}

type SectionResult<T> = Result<T, SectionError>;

fn finite(value: Option<f64>, field: &'static str) -> SectionResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() => Err(SectionError::NotFinite { field }),
        other => Ok(other),
    }
}

/// Run one section builder; a failure is logged and the section dropped
fn guarded<T>(section: &str, build: impl FnOnce() -> SectionResult<T>) -> Option<T> {
    match build() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Skipping result section '{}': {}", section, e);
            None
        }
    }
}

/// Turns a cached prediction into a localized view-model
///
/// Holds no state of its own: rendering the same result again after a
/// locale or unit change gives the updated view.
pub struct ResultRenderer {
    i18n: Arc<I18nApplicationService>,
    units: Arc<UnitPreferenceService>,
    clock: Arc<dyn Clock>,
}

impl ResultRenderer {
    pub fn new(i18n: Arc<I18nApplicationService>, units: Arc<UnitPreferenceService>) -> Self {
        Self::with_clock(i18n, units, Arc::new(SystemClock))
    }

    pub fn with_clock(
        i18n: Arc<I18nApplicationService>,
        units: Arc<UnitPreferenceService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { i18n, units, clock }
    }

    /// Render with the current locale and unit system
    pub fn render(&self, result: &PredictionResult) -> ResultView {
        self.render_for(result, self.i18n.get_language(), self.units.get_unit())
    }

    pub fn render_for(&self, result: &PredictionResult, locale: Locale, unit: UnitSystem) -> ResultView {
        let t = |key: &str| self.i18n.translate_for(key, locale);

        let status = guarded("status", || Ok(self.status(result, &t)));
        let metrics = guarded("metrics", || self.metrics(result, unit, &t)).unwrap_or_default();
        let origin_weather = result.origin_weather.as_ref().and_then(|weather| {
            guarded("origin weather", || {
                self.weather_panel(weather, t("weather.title.origin"), locale, unit, &t)
            })
        });
        let destination_weather = result.destination_weather.as_ref().and_then(|weather| {
            guarded("destination weather", || {
                self.weather_panel(weather, t("weather.title.dest"), locale, unit, &t)
            })
        });
        let metadata = guarded("metadata", || self.metadata(result, locale, unit, &t)).unwrap_or_default();

        ResultView {
            locale,
            unit,
            title: t("results.title"),
            status,
            metrics,
            origin_weather,
            destination_weather,
            metadata_title: t("metadata.title"),
            metadata,
        }
    }

    fn status(&self, result: &PredictionResult, t: &dyn Fn(&str) -> String) -> StatusView {
        if result.outcome.is_on_time() {
            StatusView {
                kind: StatusKind::Success,
                label: t("results.ontime"),
                subtitle: t("results.ontime.subtitle"),
            }
        } else {
            StatusView {
                kind: StatusKind::Danger,
                label: t("results.delayed"),
                subtitle: t("results.delayed.subtitle"),
            }
        }
    }

    fn metrics(
        &self,
        result: &PredictionResult,
        unit: UnitSystem,
        t: &dyn Fn(&str) -> String,
    ) -> SectionResult<Vec<MetricEntry>> {
        let probability = finite(result.delay_probability, "probabilidad_retraso")?;
        let confidence = finite(result.confidence, "confianza")?;
        let distance = finite(result.distance_km, "distancia_km")?;

        Ok(vec![
            percentage_metric(t("metrics.probability"), probability),
            percentage_metric(t("metrics.confidence"), confidence),
            MetricEntry {
                label: t("metrics.distance"),
                value: distance
                    .map(|km| unit_service::format_distance(km, unit))
                    .unwrap_or_else(|| MISSING_VALUE.to_string()),
                bar_pct: None,
            },
        ])
    }

    fn weather_panel(
        &self,
        weather: &WeatherSnapshot,
        title: String,
        locale: Locale,
        unit: UnitSystem,
        t: &dyn Fn(&str) -> String,
    ) -> SectionResult<WeatherPanel> {
        let temperature = finite(weather.temperature_c, "temperatura")?;
        let humidity = finite(weather.humidity_pct, "humedad")?;
        let wind = finite(weather.wind_speed_ms, "viento_velocidad")?;
        let visibility = finite(weather.visibility_m, "visibilidad")?;

        let condition = translate_condition(weather.condition_text(), locale);
        let or_missing = |value: Option<String>| value.unwrap_or_else(|| MISSING_VALUE.to_string());

        Ok(WeatherPanel {
            title,
            rows: vec![
                WeatherRow {
                    label: t("weather.condition"),
                    value: if condition.is_empty() { MISSING_VALUE.to_string() } else { condition },
                },
                WeatherRow {
                    label: t("weather.temperature"),
                    value: or_missing(temperature.map(|c| unit_service::format_temperature(c, unit))),
                },
                WeatherRow {
                    label: t("weather.humidity"),
                    value: or_missing(humidity.map(|h| format!("{}%", h))),
                },
                WeatherRow {
                    label: t("weather.wind"),
                    value: or_missing(wind.map(|w| unit_service::format_wind_speed(w, unit))),
                },
                WeatherRow {
                    label: t("weather.visibility"),
                    value: or_missing(visibility.map(|v| unit_service::format_visibility(v, unit))),
                },
            ],
        })
    }

    fn metadata(
        &self,
        result: &PredictionResult,
        locale: Locale,
        unit: UnitSystem,
        t: &dyn Fn(&str) -> String,
    ) -> SectionResult<Vec<MetadataItem>> {
        let mut items = Vec::new();
        if result.metadata.is_none() {
            return Ok(items);
        }

        if let Some(note) = result.metadata_text("nota") {
            items.push(MetadataItem::warning(t("metadata.note"), note));
        }

        let airline = result
            .metadata_text("aerolinea_nombre")
            .or_else(|| result.metadata_text("aerolinea"));
        if let Some(airline) = airline {
            items.push(MetadataItem::new(t("metadata.airline"), airline));
        }

        let route = result.metadata_text("ruta");
        if let Some(route) = &route {
            items.push(MetadataItem::new(t("metadata.route"), route.clone()));
        }

        if let Some(raw) = result.metadata_text("distancia_km") {
            let value = match raw.parse::<f64>() {
                Ok(km) if km.is_finite() => unit_service::format_distance(km, unit),
                _ => raw,
            };
            items.push(MetadataItem::new(t("metadata.distance"), value));
        }

        let endpoints = [
            ("origen_nombre", "origen_ciudad", 0, "metadata.origin"),
            ("destino_nombre", "destino_ciudad", 1, "metadata.destination"),
        ];
        for (name_key, city_key, route_part, label_key) in endpoints {
            let Some(name) = result.metadata_text(name_key) else {
                continue;
            };
            let place = match result.metadata_text(city_key) {
                Some(city) => format!("{} ({})", name, city),
                None => name,
            };
            let value = match route.as_deref().and_then(|r| iata_from_route(r, route_part)) {
                Some(code) => format!("{} - {}", code, place),
                None => place,
            };
            items.push(MetadataItem::new(t(label_key), value));
        }

        if let Some(departure) = result.metadata_text("fecha_partida") {
            items.push(MetadataItem::new(
                t("metadata.departure"),
                format_timestamp(&departure, locale),
            ));
        }

        items.push(MetadataItem::new(
            t("metadata.calculated"),
            format_datetime(self.clock.now(), locale),
        ));

        Ok(items)
    }
}

fn percentage_metric(label: String, fraction: Option<f64>) -> MetricEntry {
    match fraction {
        Some(fraction) => {
            let pct = fraction * 100.0;
            MetricEntry {
                label,
                value: format!("{}%", unit_service::fixed(pct, 1)),
                bar_pct: Some(pct.clamp(0.0, 100.0)),
            }
        }
        None => MetricEntry {
            label,
            value: MISSING_VALUE.to_string(),
            bar_pct: None,
        },
    }
}

/// IATA code of one end of an "ATL → JFK" route
fn iata_from_route(route: &str, part: usize) -> Option<String> {
    route
        .split('→')
        .nth(part)
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
}
