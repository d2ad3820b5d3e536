//! Race distance categories as the single source of truth for category strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Standardized triathlon race-length classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RaceDistance {
    Sprint,
    Olympic,
    Middle,
    Long,
}

/// Recovery day range recommended after a race of a given distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecoveryConfig {
    pub min_days: u32,
    pub max_days: u32,
    pub recommended_days: u32,
}

/// How hard the body was hit, which drives conflict severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Light,
    Moderate,
    Heavy,
}

const SPRINT: RecoveryConfig = RecoveryConfig {
    min_days: 2,
    max_days: 4,
    recommended_days: 3,
};

const OLYMPIC: RecoveryConfig = RecoveryConfig {
    min_days: 5,
    max_days: 7,
    recommended_days: 6,
};

const MIDDLE: RecoveryConfig = RecoveryConfig {
    min_days: 10,
    max_days: 14,
    recommended_days: 12,
};

const LONG: RecoveryConfig = RecoveryConfig {
    min_days: 25,
    max_days: 35,
    recommended_days: 30,
};

impl RaceDistance {
    /// All categories, shortest first.
    pub const ALL: [Self; 4] = [Self::Sprint, Self::Olympic, Self::Middle, Self::Long];

    /// Longest recommended recovery of any category.
    pub const LONGEST_RECOVERY_DAYS: u32 = LONG.recommended_days;

    /// String representation for storage and display.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sprint => "sprint",
            Self::Olympic => "olympic",
            Self::Middle => "middle",
            Self::Long => "long",
        }
    }

    /// Human-friendly label, e.g. for list output.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Sprint => "Sprint",
            Self::Olympic => "Olympic",
            Self::Middle => "Middle (70.3)",
            Self::Long => "Long (140.6)",
        }
    }

    pub const fn recovery_config(&self) -> RecoveryConfig {
        match self {
            Self::Sprint => SPRINT,
            Self::Olympic => OLYMPIC,
            Self::Middle => MIDDLE,
            Self::Long => LONG,
        }
    }

    pub const fn recommended_days(&self) -> u32 {
        self.recovery_config().recommended_days
    }

    pub const fn intensity(&self) -> Intensity {
        match self {
            Self::Sprint => Intensity::Light,
            Self::Olympic => Intensity::Moderate,
            Self::Middle | Self::Long => Intensity::Heavy,
        }
    }
}

impl fmt::Display for RaceDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RaceDistance {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sprint" => Ok(Self::Sprint),
            "olympic" => Ok(Self::Olympic),
            "middle" => Ok(Self::Middle),
            "long" => Ok(Self::Long),
            _ => Err(CoreError::InvalidCategory(s.to_string())),
        }
    }
}

impl Serialize for RaceDistance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RaceDistance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Intensity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Heavy => "heavy",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
