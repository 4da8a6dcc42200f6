use std::sync::{Arc, PoisonError, RwLock};

use tracing::{error, info, instrument};

use crate::application::dtos::view_models::{BreakdownRow, BreakdownSection, Severity, StatCard, StatsView};
use crate::application::ports::outbound::{ApiError, PredictionApiPort};
use crate::application::services::i18n_application_service::I18nApplicationService;
use crate::domain::entities::stats::DashboardStats;
use crate::domain::services::date_format::format_timestamp;
use crate::domain::services::i18n_service::Locale;
use crate::domain::services::unit_service;

/// Rows shown in the per-origin-airport breakdown
pub const TOP_AIRPORTS: usize = 10;

/// Dashboard statistics: fetch, cache and render
///
/// The last received statistics are kept so a language switch can re-render
/// them without a new request.
pub struct StatsService {
    api: Arc<dyn PredictionApiPort>,
    i18n: Arc<I18nApplicationService>,
    last: RwLock<Option<DashboardStats>>,
}

impl StatsService {
    pub fn new(api: Arc<dyn PredictionApiPort>, i18n: Arc<I18nApplicationService>) -> Self {
        Self {
            api,
            i18n,
            last: RwLock::new(None),
        }
    }

    /// Fetch fresh statistics. On failure the cached ones are left alone.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<StatsView, ApiError> {
        match self.api.stats().await {
            Ok(stats) => {
                info!("Statistics loaded: {} predictions", stats.total_predictions);
                let view = self.render(&stats, self.i18n.get_language());
                *self.last.write().unwrap_or_else(PoisonError::into_inner) = Some(stats);
                Ok(view)
            }
            Err(e) => {
                error!("Error loading statistics: {}", e);
                Err(e)
            }
        }
    }

    pub fn last_stats(&self) -> Option<DashboardStats> {
        self.last.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Cached statistics rendered in the current language
    pub fn render_cached(&self) -> Option<StatsView> {
        let locale = self.i18n.get_language();
        self.last
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|stats| self.render(stats, locale))
    }

    /// Cards showing the error marker, used when a refresh fails
    pub fn error_view(&self) -> StatsView {
        let marker = self.i18n.t("stats.error");
        StatsView {
            title: self.i18n.t("stats.detailed.title"),
            cards: CARD_KEYS
                .iter()
                .map(|key| StatCard { label: self.i18n.t(key), value: marker.clone() })
                .collect(),
            sections: Vec::new(),
            last_update: None,
            empty_message: None,
        }
    }

    pub fn render(&self, stats: &DashboardStats, locale: Locale) -> StatsView {
        let t = |key: &str| self.i18n.translate_for(key, locale);
        let not_available = t("stats.not.available");
        let percentage = |value: Option<f64>| {
            value
                .filter(|v| v.is_finite())
                .map(|v| format!("{}%", unit_service::fixed(v, 1)))
                .unwrap_or_else(|| not_available.clone())
        };

        let total = group_thousands(stats.total_predictions, locale);
        let cards = vec![
            StatCard { label: t(CARD_KEYS[0]), value: total.clone() },
            StatCard { label: t(CARD_KEYS[1]), value: total },
            StatCard { label: t(CARD_KEYS[2]), value: percentage(stats.delayed_percentage) },
            StatCard { label: t(CARD_KEYS[3]), value: percentage(stats.on_time_percentage) },
        ];

        let mut sections = Vec::new();
        let section = |title_key: &str, rows: Vec<BreakdownRow>| BreakdownSection {
            title: t(title_key),
            on_time_label: t("stats.on.time"),
            delayed_label: t("stats.delayed"),
            percentage_label: t("stats.percentage.delayed"),
            rows,
        };
        let flights = t("stats.flights");

        if !stats.by_airline.is_empty() {
            let rows = stats
                .by_airline
                .iter()
                .map(|stat| {
                    let title = stat
                        .airline_name
                        .clone()
                        .filter(|name| !name.is_empty())
                        .unwrap_or_else(|| stat.airline.clone());
                    breakdown_row(title, stat.total, stat.delayed, stat.delayed_percentage, &flights)
                })
                .collect();
            sections.push(section("stats.by.airline", rows));
        }

        if !stats.by_origin_airport.is_empty() {
            let mut airports: Vec<_> = stats.by_origin_airport.iter().collect();
            airports.sort_by(|a, b| b.total.cmp(&a.total));
            let rows = airports
                .into_iter()
                .take(TOP_AIRPORTS)
                .map(|stat| breakdown_row(stat.title(), stat.total, stat.delayed, stat.delayed_percentage, &flights))
                .collect();
            sections.push(section("stats.by.airport", rows));
        }

        let last_update = stats
            .timestamp
            .as_deref()
            .filter(|ts| !ts.trim().is_empty())
            .map(|ts| format!("{} {}", t("stats.last.update"), format_timestamp(ts, locale)));

        let empty_message = if sections.is_empty() && last_update.is_none() {
            Some(t("stats.no.data"))
        } else {
            None
        };

        StatsView {
            title: t("stats.detailed.title"),
            cards,
            sections,
            last_update,
            empty_message,
        }
    }
}

const CARD_KEYS: [&str; 4] = [
    "dashboard.total.predictions",
    "dashboard.today.predictions",
    "dashboard.delayed.percentage",
    "dashboard.ontime.percentage",
];

fn breakdown_row(title: String, total: u64, delayed: u64, delayed_pct: f64, flights: &str) -> BreakdownRow {
    let pct = if delayed_pct.is_finite() { delayed_pct } else { 0.0 };
    BreakdownRow {
        title,
        badge: format!("{} {}", total, flights),
        on_time: total.saturating_sub(delayed),
        delayed,
        delayed_pct_text: format!("{}%", unit_service::fixed(pct, 1)),
        bar_pct: pct.clamp(0.0, 100.0),
        severity: Severity::from_percentage(pct),
    }
}

/// "12,345" in English, "12.345" in Spanish
fn group_thousands(value: u64, locale: Locale) -> String {
    let separator = match locale {
        Locale::Spanish => '.',
        Locale::English => ',',
    };
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::application::ports::outbound::MockPredictionApiPort;
    use crate::domain::entities::stats::{AirlineStat, AirportStat};
    use crate::infrastructure::repositories::preference_fs_repository::InMemoryPreferenceRepository;
    use crate::infrastructure::services::file_system_i18n_service::FileSystemI18nService;

    fn i18n() -> Arc<I18nApplicationService> {
        Arc::new(I18nApplicationService::new(
            Arc::new(FileSystemI18nService::embedded().unwrap()),
            Arc::new(InMemoryPreferenceRepository::new()),
            Locale::Spanish,
        ))
    }

    fn sample() -> DashboardStats {
        let airports = (0..12)
            .map(|i| AirportStat {
                airport: format!("A{:02}", i),
                total: i as u64,
                delayed: 0,
                ..Default::default()
            })
            .collect();
        DashboardStats {
            total_predictions: 12_345,
            total_delayed: Some(3000),
            delayed_percentage: Some(24.3),
            on_time_percentage: None,
            by_airline: vec![AirlineStat {
                airline: "DL".into(),
                airline_name: None,
                total: 8,
                delayed: 5,
                delayed_percentage: 62.5,
            }],
            by_origin_airport: airports,
            timestamp: Some("2026-10-18T09:30:00".into()),
        }
    }

    #[test]
    fn test_render_cards_and_sections() {
        let service = StatsService::new(Arc::new(MockPredictionApiPort::new()), i18n());
        let view = service.render(&sample(), Locale::Spanish);

        assert_eq!(view.cards[0].value, "12.345");
        assert_eq!(view.cards[2].value, "24.3%");
        assert_eq!(view.cards[3].value, "N/A");

        let airline = &view.sections[0];
        assert_eq!(airline.title, "Estadísticas por Aerolínea");
        assert_eq!(airline.rows[0].title, "DL");
        assert_eq!(airline.rows[0].badge, "8 vuelos");
        assert_eq!(airline.rows[0].on_time, 3);
        assert_eq!(airline.rows[0].severity, Severity::Danger);

        let airports = &view.sections[1];
        assert_eq!(airports.rows.len(), TOP_AIRPORTS);
        assert_eq!(airports.rows[0].title, "A11");
        assert_eq!(view.last_update.as_deref(), Some("Última actualización: 18 oct 2026, 09:30"));
        assert!(view.empty_message.is_none());
    }

    #[test]
    fn test_percentages_round_ties_up() {
        let service = StatsService::new(Arc::new(MockPredictionApiPort::new()), i18n());
        let mut stats = sample();
        stats.delayed_percentage = Some(12.25);
        stats.on_time_percentage = Some(87.75);
        stats.by_airline[0].delayed_percentage = 62.25;

        let view = service.render(&stats, Locale::Spanish);
        assert_eq!(view.cards[2].value, "12.3%");
        assert_eq!(view.cards[3].value, "87.8%");
        assert_eq!(view.sections[0].rows[0].delayed_pct_text, "62.3%");
    }

    #[test]
    fn test_empty_stats_show_no_data() {
        let service = StatsService::new(Arc::new(MockPredictionApiPort::new()), i18n());
        let view = service.render(&DashboardStats::default(), Locale::English);
        assert!(view.sections.is_empty());
        assert_eq!(view.cards[0].value, "0");
        assert!(view.empty_message.unwrap().starts_with("No statistics available yet"));
    }

    #[tokio::test]
    async fn test_refresh_caches_for_rerender() {
        let mut api = MockPredictionApiPort::new();
        api.expect_stats().times(1).returning(|| Ok(sample()));
        let i18n = i18n();
        let service = StatsService::new(Arc::new(api), i18n.clone());

        assert!(service.render_cached().is_none());
        let view = service.refresh().await.unwrap();
        assert_eq!(view.cards[0].label, "Total Predicciones");

        i18n.set_language("en");
        let view = service.render_cached().unwrap();
        assert_eq!(view.cards[0].label, "Total Predictions");
        assert_eq!(view.cards[0].value, "12,345");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_cache() {
        let mut api = MockPredictionApiPort::new();
        let mut first = true;
        api.expect_stats().times(2).returning(move || {
            if std::mem::take(&mut first) {
                Ok(sample())
            } else {
                Err(ApiError::Connection("refused".into()))
            }
        });
        let service = StatsService::new(Arc::new(api), i18n());

        service.refresh().await.unwrap();
        assert!(service.refresh().await.is_err());
        assert_eq!(service.last_stats().map(|s| s.total_predictions), Some(12_345));
        assert!(service.error_view().cards.iter().all(|c| c.value == "Error"));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0, Locale::English), "0");
        assert_eq!(group_thousands(999, Locale::English), "999");
        assert_eq!(group_thousands(1_000, Locale::English), "1,000");
        assert_eq!(group_thousands(1_234_567, Locale::Spanish), "1.234.567");
    }
}
