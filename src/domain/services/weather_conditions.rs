use crate::domain::services::i18n_service::Locale;

/// Spanish descriptions as sent by the weather provider, with their English text.
/// Order matters for the partial-match pass: more specific phrases come first.
const CONDITIONS_ES_EN: &[(&str, &str)] = &[
    ("cielo claro", "clear sky"),
    ("cielo despejado", "clear sky"),
    ("despejado", "clear"),
    ("parcialmente nublado", "partly cloudy"),
    ("mayormente nublado", "mostly cloudy"),
    ("nublado", "cloudy"),
    ("nubes", "clouds"),
    ("lluvia ligera", "light rain"),
    ("lluvia moderada", "moderate rain"),
    ("lluvia intensa", "heavy rain"),
    ("lluvia", "rain"),
    ("llovizna", "drizzle"),
    ("tormenta eléctrica", "thunderstorm"),
    ("tormenta", "thunderstorm"),
    ("nieve ligera", "light snow"),
    ("nieve intensa", "heavy snow"),
    ("nieve", "snow"),
    ("niebla", "fog"),
    ("neblina", "mist"),
    ("bruma", "haze"),
    ("polvo", "dust"),
    ("arena", "sand"),
    ("ceniza", "ash"),
    ("chubasco", "squall"),
    ("tornado", "tornado"),
    ("sobrecargado", "overcast"),
];

/// Translate a weather description into the display locale.
///
/// Spanish text passes through untouched. For English, an exact match wins,
/// then the first table entry contained in (or containing) the description.
/// Unknown descriptions are returned as received.
pub fn translate_condition(condition: &str, locale: Locale) -> String {
    if locale == Locale::Spanish || condition.trim().is_empty() {
        return condition.to_string();
    }

    let normalized = condition.trim().to_lowercase();

    if let Some((_, english)) = CONDITIONS_ES_EN.iter().find(|(es, _)| *es == normalized) {
        return english.to_string();
    }

    CONDITIONS_ES_EN
        .iter()
        .find(|(es, _)| normalized.contains(es) || es.contains(normalized.as_str()))
        .map(|(_, english)| english.to_string())
        .unwrap_or_else(|| condition.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spanish_passthrough() {
        assert_eq!(translate_condition("lluvia ligera", Locale::Spanish), "lluvia ligera");
    }

    #[test]
    fn test_exact_and_partial() {
        assert_eq!(translate_condition("Cielo Claro", Locale::English), "clear sky");
        assert_eq!(translate_condition("nubes dispersas", Locale::English), "clouds");
        assert_eq!(translate_condition("lluvia de gran intensidad", Locale::English), "rain");
    }

    #[test]
    fn test_unknown_is_kept() {
        assert_eq!(translate_condition("granizo", Locale::English), "granizo");
        assert_eq!(translate_condition("", Locale::English), "");
    }
}
