use chrono::{DateTime, Datelike, Local, NaiveDateTime, Timelike};

use crate::domain::services::i18n_service::Locale;

const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];
const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short date and 24h time: "19 oct 2026, 10:00" or "Oct 19, 2026, 10:00"
pub fn format_datetime(value: NaiveDateTime, locale: Locale) -> String {
    let month = value.month0() as usize;
    match locale {
        Locale::Spanish => format!(
            "{:02} {} {}, {:02}:{:02}",
            value.day(),
            MONTHS_ES[month],
            value.year(),
            value.hour(),
            value.minute()
        ),
        Locale::English => format!(
            "{} {:02}, {}, {:02}:{:02}",
            MONTHS_EN[month],
            value.day(),
            value.year(),
            value.hour(),
            value.minute()
        ),
    }
}

/// Parses the timestamp shapes the backend sends
///
/// Offset-aware values are shown in local time; naive values as they are.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Formats a backend timestamp, or returns it untouched when it does not parse
pub fn format_timestamp(raw: &str, locale: Locale) -> String {
    parse_timestamp(raw)
        .map(|dt| format_datetime(dt, locale))
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_format_per_locale() {
        assert_eq!(format_datetime(sample(), Locale::Spanish), "19 oct 2026, 10:00");
        assert_eq!(format_datetime(sample(), Locale::English), "Oct 19, 2026, 10:00");
    }

    #[test]
    fn test_parse_naive_shapes() {
        assert_eq!(parse_timestamp("2026-10-19T10:00:00"), Some(sample()));
        assert_eq!(parse_timestamp("2026-10-19T10:00"), Some(sample()));
        assert_eq!(parse_timestamp("2026-10-19 10:00:00.123").map(|d| d.minute()), Some(0));
        assert_eq!(parse_timestamp("mañana"), None);
    }

    #[test]
    fn test_unparseable_passes_through() {
        assert_eq!(format_timestamp("pronto", Locale::English), "pronto");
        assert_eq!(format_timestamp("2026-10-19T10:00:00", Locale::English), "Oct 19, 2026, 10:00");
    }
}
