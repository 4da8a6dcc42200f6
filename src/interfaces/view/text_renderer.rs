//! Plain-text layout of the view-models, used by the terminal front end.

use crate::application::dtos::view_models::{
    MetadataKind, ResultView, Severity, StatusKind, StatsView, WeatherPanel,
};
use crate::application::services::cascade_service::CascadeSnapshot;

const BAR_WIDTH: usize = 20;

fn bar(pct: f64) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn weather_lines(panel: &WeatherPanel, out: &mut Vec<String>) {
    out.push(format!("  {}", panel.title));
    for row in &panel.rows {
        out.push(format!("    {}: {}", row.label, row.value));
    }
}

pub fn render_result(view: &ResultView) -> Vec<String> {
    let mut out = vec![format!("== {} ==", view.title)];

    if let Some(status) = &view.status {
        let icon = match status.kind {
            StatusKind::Success => "✈️",
            StatusKind::Danger => "⏰",
        };
        out.push(format!("{} {}", icon, status.label));
        out.push(format!("   {}", status.subtitle));
    }

    for metric in &view.metrics {
        match metric.bar_pct {
            Some(pct) => out.push(format!("{}: {} {}", metric.label, metric.value, bar(pct))),
            None => out.push(format!("{}: {}", metric.label, metric.value)),
        }
    }

    for panel in [&view.origin_weather, &view.destination_weather].into_iter().flatten() {
        weather_lines(panel, &mut out);
    }

    if !view.metadata.is_empty() {
        out.push(format!("-- {} --", view.metadata_title));
        for item in &view.metadata {
            let prefix = match item.kind {
                MetadataKind::Warning => "⚠️ ",
                MetadataKind::Default => "",
            };
            out.push(format!("  {}: {}{}", item.label, prefix, item.value));
        }
    }

    out
}

pub fn render_stats(view: &StatsView) -> Vec<String> {
    let mut out = Vec::new();
    for card in &view.cards {
        out.push(format!("{}: {}", card.label, card.value));
    }

    out.push(format!("== {} ==", view.title));
    for section in &view.sections {
        out.push(format!("-- {} --", section.title));
        for row in &section.rows {
            let marker = match row.severity {
                Severity::Success => "+",
                Severity::Warning => "~",
                Severity::Danger => "!",
            };
            out.push(format!("  {} {} ({})", marker, row.title, row.badge));
            out.push(format!(
                "    {} {}  {} {}  {} {} {}",
                section.on_time_label,
                row.on_time,
                section.delayed_label,
                row.delayed,
                section.percentage_label,
                row.delayed_pct_text,
                bar(row.bar_pct)
            ));
        }
    }

    if let Some(last_update) = &view.last_update {
        out.push(last_update.clone());
    }
    if let Some(empty) = &view.empty_message {
        out.push(empty.clone());
    }
    out
}

/// One line per selector, e.g. "origin [ATL] ATL, JFK"
pub fn render_selectors(snapshot: &CascadeSnapshot) -> Vec<String> {
    let state = if snapshot.enabled { "" } else { " (disabled)" };
    let selected = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    vec![
        format!("airline [{}]", selected(&snapshot.airline)),
        format!(
            "origin [{}]{} {}",
            selected(&snapshot.origin),
            state,
            snapshot.origin_options.join(", ")
        ),
        format!(
            "destination [{}]{} {}",
            selected(&snapshot.destination),
            state,
            snapshot.destination_options.join(", ")
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dtos::view_models::{
        BreakdownRow, BreakdownSection, MetadataItem, MetricEntry, StatCard, StatusView,
    };
    use crate::domain::entities::unit_system::UnitSystem;
    use crate::domain::services::i18n_service::Locale;

    #[test]
    fn test_bar_width() {
        assert_eq!(bar(0.0), format!("[{}]", ".".repeat(BAR_WIDTH)));
        assert_eq!(bar(150.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(bar(50.0).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_result_lines() {
        let view = ResultView {
            locale: Locale::English,
            unit: UnitSystem::Metric,
            title: "Prediction Result".into(),
            status: Some(StatusView {
                kind: StatusKind::Danger,
                label: "Delayed".into(),
                subtitle: "The flight may experience delays".into(),
            }),
            metrics: vec![MetricEntry { label: "Delay Probability".into(), value: "73.4%".into(), bar_pct: Some(73.4) }],
            origin_weather: None,
            destination_weather: None,
            metadata_title: "Flight Information".into(),
            metadata: vec![MetadataItem::warning("System Note", "estimated")],
        };
        let lines = render_result(&view);
        assert_eq!(lines[0], "== Prediction Result ==");
        assert_eq!(lines[1], "⏰ Delayed");
        assert!(lines[3].starts_with("Delay Probability: 73.4% [#"));
        assert_eq!(lines.last().unwrap(), "  System Note: ⚠️ estimated");
    }

    #[test]
    fn test_stats_lines() {
        let view = StatsView {
            title: "Detailed Statistics".into(),
            cards: vec![StatCard { label: "Total Predictions".into(), value: "3".into() }],
            sections: vec![BreakdownSection {
                title: "Statistics by Airline".into(),
                on_time_label: "On time:".into(),
                delayed_label: "Delayed:".into(),
                percentage_label: "% Delayed".into(),
                rows: vec![BreakdownRow {
                    title: "DL".into(),
                    badge: "3 flights".into(),
                    on_time: 1,
                    delayed: 2,
                    delayed_pct_text: "66.7%".into(),
                    bar_pct: 66.7,
                    severity: Severity::Danger,
                }],
            }],
            last_update: None,
            empty_message: None,
        };
        let lines = render_stats(&view);
        assert_eq!(lines[0], "Total Predictions: 3");
        assert_eq!(lines[3], "  ! DL (3 flights)");
        assert!(lines[4].contains("On time: 1  Delayed: 2  % Delayed 66.7%"));
    }
}
