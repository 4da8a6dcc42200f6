//! Fixed-factor conversions from the canonical metric values the backend sends.

use crate::domain::entities::unit_system::UnitSystem;

pub const KM_TO_MILES: f64 = 0.621371;
pub const MS_TO_MPH: f64 = 2.23694;

/// Rounds half away from zero at `decimals` places before formatting.
/// `{:.N}` alone rounds ties to even, so 2.5 km would print as "2 km".
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Fixed-point text with ties rounded up
pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, round_to(value, decimals as i32))
}

/// Distance in the target system, unformatted
pub fn distance_value(km: f64, unit: UnitSystem) -> f64 {
    match unit {
        UnitSystem::Metric => km,
        UnitSystem::Imperial => km * KM_TO_MILES,
    }
}

/// `"{n} km"` or `"{n} mi"`, no decimals
pub fn format_distance(km: f64, unit: UnitSystem) -> String {
    let value = distance_value(km, unit);
    match unit {
        UnitSystem::Metric => format!("{} km", fixed(value, 0)),
        UnitSystem::Imperial => format!("{} mi", fixed(value, 0)),
    }
}

pub fn format_temperature(celsius: f64, unit: UnitSystem) -> String {
    match unit {
        UnitSystem::Metric => format!("{}°C", fixed(celsius, 1)),
        UnitSystem::Imperial => format!("{}°F", fixed(celsius * 9.0 / 5.0 + 32.0, 1)),
    }
}

pub fn format_wind_speed(meters_per_second: f64, unit: UnitSystem) -> String {
    match unit {
        UnitSystem::Metric => format!("{} m/s", fixed(meters_per_second, 1)),
        UnitSystem::Imperial => format!("{} mph", fixed(meters_per_second * MS_TO_MPH, 1)),
    }
}

pub fn format_visibility(meters: f64, unit: UnitSystem) -> String {
    let km = meters / 1000.0;
    match unit {
        UnitSystem::Metric => format!("{} km", fixed(km, 1)),
        UnitSystem::Imperial => format!("{} mi", fixed(km * KM_TO_MILES, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert_eq!(format_distance(100.0, UnitSystem::Imperial), "62 mi");
        assert_eq!(format_distance(1234.4, UnitSystem::Metric), "1234 km");
        assert!((distance_value(100.0, UnitSystem::Imperial) - 62.1371).abs() < 1e-9);
        assert_eq!(distance_value(100.0, UnitSystem::Metric), 100.0);
    }

    #[test]
    fn test_temperature() {
        assert_eq!(format_temperature(20.0, UnitSystem::Metric), "20.0°C");
        assert_eq!(format_temperature(20.0, UnitSystem::Imperial), "68.0°F");
        assert_eq!(format_temperature(-40.0, UnitSystem::Imperial), "-40.0°F");
    }

    #[test]
    fn test_wind_speed() {
        assert_eq!(format_wind_speed(3.5, UnitSystem::Metric), "3.5 m/s");
        assert_eq!(format_wind_speed(10.0, UnitSystem::Imperial), "22.4 mph");
    }

    #[test]
    fn test_ties_round_up() {
        assert_eq!(format_distance(1222.5, UnitSystem::Metric), "1223 km");
        assert_eq!(format_distance(2.5, UnitSystem::Metric), "3 km");
        assert_eq!(format_temperature(20.25, UnitSystem::Metric), "20.3°C");
        assert_eq!(format_wind_speed(0.25, UnitSystem::Metric), "0.3 m/s");
        assert_eq!(format_visibility(2_250.0, UnitSystem::Metric), "2.3 km");
        assert_eq!(fixed(-0.25, 1), "-0.3");
        assert_eq!(fixed(12.5, 1), "12.5");
    }

    #[test]
    fn test_visibility() {
        assert_eq!(format_visibility(10_000.0, UnitSystem::Metric), "10.0 km");
        assert_eq!(format_visibility(10_000.0, UnitSystem::Imperial), "6.2 mi");
    }
}
