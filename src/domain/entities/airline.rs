use std::collections::{BTreeSet, HashMap};

use serde::Deserialize;

/// Carriers supported by the prediction backend, sorted by code
pub const AIRLINE_CATALOG: &[(&str, &str)] = &[
    ("9E", "Endeavor Air Inc. (9E)"),
    ("AA", "American Airlines Inc. (AA)"),
    ("AS", "Alaska Airlines Inc. (AS)"),
    ("B6", "JetBlue Airways (B6)"),
    ("DL", "Delta Air Lines Inc. (DL)"),
    ("F9", "Frontier Airlines Inc. (F9)"),
    ("G4", "Allegiant Air (G4)"),
    ("HA", "Hawaiian Airlines Inc. (HA)"),
    ("MQ", "Envoy Air (MQ)"),
    ("NK", "Spirit Air Lines (NK)"),
    ("OH", "PSA Airlines Inc. (OH)"),
    ("OO", "SkyWest Airlines Inc. (OO)"),
    ("UA", "United Air Lines Inc. (UA)"),
    ("WN", "Southwest Airlines Co. (WN)"),
    ("YX", "Republic Airline (YX)"),
];

/// Display name for an airline code
pub fn airline_name(code: &str) -> Option<&'static str> {
    AIRLINE_CATALOG
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Airports an airline flies from and to
///
/// Stored as ordered sets: membership is what matters, and the alphabetical
/// iteration order is the display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirlineAirports {
    pub origin_airports: BTreeSet<String>,
    pub destination_airports: BTreeSet<String>,
}

impl AirlineAirports {
    pub fn new<I, J, S, T>(origins: I, destinations: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            origin_airports: origins.into_iter().map(normalize_code).collect(),
            destination_airports: destinations.into_iter().map(normalize_code).collect(),
        }
    }

    /// Destinations with the given origin removed, sorted
    pub fn destinations_excluding(&self, origin: Option<&str>) -> Vec<String> {
        self.destination_airports
            .iter()
            .filter(|code| Some(code.as_str()) != origin)
            .cloned()
            .collect()
    }

    pub fn origins(&self) -> Vec<String> {
        self.origin_airports.iter().cloned().collect()
    }
}

/// Raw shape of one entry in the airline→airport JSON document
#[derive(Debug, Deserialize)]
struct RawAirlineAirports {
    #[serde(rename = "ORIGIN", default)]
    origin: Vec<String>,
    #[serde(rename = "DEST", default)]
    dest: Vec<String>,
}

/// Airline code → airports, immutable once loaded
#[derive(Debug, Clone, Default)]
pub struct AirportIndex {
    entries: HashMap<String, AirlineAirports>,
}

impl AirportIndex {
    pub fn new(entries: HashMap<String, AirlineAirports>) -> Self {
        Self { entries }
    }

    /// Parse the `{CODE: {ORIGIN: [...], DEST: [...]}}` document
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        let raw: HashMap<String, RawAirlineAirports> = serde_json::from_str(content)?;
        let entries = raw
            .into_iter()
            .map(|(code, airports)| {
                (code.trim().to_uppercase(), AirlineAirports::new(airports.origin, airports.dest))
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn get(&self, airline: &str) -> Option<&AirlineAirports> {
        self.entries.get(airline)
    }

    pub fn airlines(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.entries.keys().cloned().collect();
        codes.sort();
        codes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Airport codes are compared upper-case and trimmed
pub fn normalize_code<S: Into<String>>(code: S) -> String {
    code.into().trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_dedups_and_sorts() {
        let index = AirportIndex::from_json(
            r#"{"9E": {"ORIGIN": ["JFK", "ATL", "JFK"], "DEST": ["LGA", "ABQ", "JFK"]}}"#,
        )
        .unwrap();

        let airports = index.get("9E").unwrap();
        assert_eq!(airports.origins(), vec!["ATL", "JFK"]);
        assert_eq!(airports.destinations_excluding(Some("JFK")), vec!["ABQ", "LGA"]);
        assert_eq!(airports.destinations_excluding(None), vec!["ABQ", "JFK", "LGA"]);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let index = AirportIndex::from_json(r#"{"dl": {"ORIGIN": ["atl"]}}"#).unwrap();
        let airports = index.get("DL").unwrap();
        assert_eq!(airports.origins(), vec!["ATL"]);
        assert!(airports.destination_airports.is_empty());
    }

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(airline_name("DL"), Some("Delta Air Lines Inc. (DL)"));
        assert_eq!(airline_name("XX"), None);
        let codes: Vec<&str> = AIRLINE_CATALOG.iter().map(|(c, _)| *c).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
    }
}
