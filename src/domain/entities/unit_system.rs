use std::fmt;
use std::str::FromStr;

use crate::common::errors::DomainError;

/// Measurement convention used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Value written to persisted preferences
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km",
            UnitSystem::Imperial => "miles",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "km" | "metric" => Some(UnitSystem::Metric),
            "miles" | "mi" | "imperial" => Some(UnitSystem::Imperial),
            _ => None,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
            .ok_or_else(|| DomainError::validation_error("UnitSystem", format!("Unsupported unit: {}", s)))
    }
}
