/// Aggregate counts returned by the statistics endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_predictions: u64,
    pub total_delayed: Option<u64>,
    pub delayed_percentage: Option<f64>,
    pub on_time_percentage: Option<f64>,
    pub by_airline: Vec<AirlineStat>,
    pub by_origin_airport: Vec<AirportStat>,
    /// Server-side timestamp, kept as sent
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirlineStat {
    pub airline: String,
    pub airline_name: Option<String>,
    pub total: u64,
    pub delayed: u64,
    pub delayed_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirportStat {
    pub airport: String,
    pub airport_name: Option<String>,
    pub airport_city: Option<String>,
    pub total: u64,
    pub delayed: u64,
    pub delayed_percentage: f64,
}

impl AirportStat {
    /// "ATL - Hartsfield-Jackson (Atlanta)", degrading to whatever is known
    pub fn title(&self) -> String {
        let name = self.airport_name.as_deref().filter(|n| !n.is_empty() && *n != self.airport);
        let city = self.airport_city.as_deref().filter(|c| !c.is_empty());
        match (name, city) {
            (Some(name), Some(city)) => format!("{} - {} ({})", self.airport, name, city),
            (Some(name), None) => format!("{} - {}", self.airport, name),
            (None, Some(city)) => format!("{} ({})", self.airport, city),
            (None, None) if self.airport.is_empty() => "N/A".to_string(),
            (None, None) => self.airport.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airport_title() {
        let mut stat = AirportStat {
            airport: "ATL".into(),
            airport_name: Some("Hartsfield-Jackson".into()),
            airport_city: Some("Atlanta".into()),
            ..Default::default()
        };
        assert_eq!(stat.title(), "ATL - Hartsfield-Jackson (Atlanta)");
        stat.airport_name = Some("ATL".into());
        assert_eq!(stat.title(), "ATL (Atlanta)");
        stat.airport_city = None;
        assert_eq!(stat.title(), "ATL");
        stat.airport.clear();
        stat.airport_name = None;
        assert_eq!(stat.title(), "N/A");
    }
}
