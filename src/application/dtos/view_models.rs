//! Typed view-models. Assembled by the application services, consumed by
//! whatever rendering layer sits on top (see `interfaces::view`).

use crate::domain::entities::unit_system::UnitSystem;
use crate::domain::services::i18n_service::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Danger,
}

/// Headline verdict of a prediction
#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
    pub kind: StatusKind,
    pub label: String,
    pub subtitle: String,
}

/// One metric tile; `bar_pct` drives a progress bar when present
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEntry {
    pub label: String,
    pub value: String,
    pub bar_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherPanel {
    pub title: String,
    pub rows: Vec<WeatherRow>,
}

impl WeatherPanel {
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.rows.iter().find(|r| r.label == label).map(|r| r.value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    Default,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataItem {
    pub label: String,
    pub value: String,
    pub kind: MetadataKind,
    pub full_width: bool,
}

impl MetadataItem {
    pub fn new<L: Into<String>, V: Into<String>>(label: L, value: V) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            kind: MetadataKind::Default,
            full_width: false,
        }
    }

    pub fn warning<L: Into<String>, V: Into<String>>(label: L, value: V) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            kind: MetadataKind::Warning,
            full_width: true,
        }
    }
}

/// Fully rendered prediction. Every string is already localized for
/// `locale` and formatted for `unit`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub locale: Locale,
    pub unit: UnitSystem,
    pub title: String,
    pub status: Option<StatusView>,
    pub metrics: Vec<MetricEntry>,
    pub origin_weather: Option<WeatherPanel>,
    pub destination_weather: Option<WeatherPanel>,
    pub metadata_title: String,
    pub metadata: Vec<MetadataItem>,
}

impl ResultView {
    pub fn metric(&self, label: &str) -> Option<&MetricEntry> {
        self.metrics.iter().find(|m| m.label == label)
    }

    pub fn metadata_value(&self, label: &str) -> Option<&str> {
        self.metadata.iter().find(|m| m.label == label).map(|m| m.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: String,
    pub value: String,
}

/// Colour band of a delayed percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Danger,
}

impl Severity {
    pub fn from_percentage(pct: f64) -> Self {
        if pct > 50.0 {
            Severity::Danger
        } else if pct > 25.0 {
            Severity::Warning
        } else {
            Severity::Success
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub title: String,
    /// e.g. "8 vuelos"
    pub badge: String,
    pub on_time: u64,
    pub delayed: u64,
    pub delayed_pct_text: String,
    pub bar_pct: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownSection {
    pub title: String,
    pub on_time_label: String,
    pub delayed_label: String,
    pub percentage_label: String,
    pub rows: Vec<BreakdownRow>,
}

/// Dashboard statistics: quick cards plus detailed breakdowns
#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub title: String,
    pub cards: Vec<StatCard>,
    pub sections: Vec<BreakdownSection>,
    pub last_update: Option<String>,
    pub empty_message: Option<String>,
}
