use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

/// Measurement convention requested from upstream and used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitSystem {
    /// Value of the `units` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "imperial",
            UnitSystem::Metric => "metric",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "mph",
            UnitSystem::Metric => "m/s",
        }
    }

    pub fn temp_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "°F",
            UnitSystem::Metric => "°C",
        }
    }

    /// The other system; used by the settings toggle.
    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Imperial => UnitSystem::Metric,
            UnitSystem::Metric => UnitSystem::Imperial,
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Imperial, UnitSystem::Metric]
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "imperial" => Ok(UnitSystem::Imperial),
            "metric" => Ok(UnitSystem::Metric),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: imperial, metric."
            )),
        }
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitSystem::try_from(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_roundtrip() {
        for units in UnitSystem::all() {
            let parsed = UnitSystem::try_from(units.as_str()).expect("roundtrip should succeed");
            assert_eq!(*units, parsed);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("METRIC".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
    }

    #[test]
    fn unknown_units_error() {
        let err = UnitSystem::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn suffixes() {
        assert_eq!(UnitSystem::Imperial.temp_suffix(), "°F");
        assert_eq!(UnitSystem::Imperial.speed_suffix(), "mph");
        assert_eq!(UnitSystem::Metric.temp_suffix(), "°C");
        assert_eq!(UnitSystem::Metric.speed_suffix(), "m/s");
    }

    #[test]
    fn default_is_imperial_and_toggle_flips() {
        let units = UnitSystem::default();
        assert_eq!(units, UnitSystem::Imperial);
        assert_eq!(units.toggled(), UnitSystem::Metric);
        assert_eq!(units.toggled().toggled(), UnitSystem::Imperial);
    }
}
