use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How often an income or expense amount recurs.
///
/// Serialized with the display strings (`"Hourly"`, `"Bi-Weekly"`, ...).
/// A persisted string this build does not know deserializes to
/// [`Cadence::Unrecognized`], which annualizes to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cadence {
    #[default]
    Hourly,
    Daily,
    Weekly,
    #[serde(rename = "Bi-Weekly")]
    BiWeekly,
    Monthly,
    Yearly,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown cadence '{0}'; expected one of hourly, daily, weekly, bi-weekly, monthly, yearly")]
pub struct ParseCadenceError(String);

impl Cadence {
    /// Every selectable cadence, shortest period first.
    pub const ALL: [Cadence; 6] = [
        Self::Hourly,
        Self::Daily,
        Self::Weekly,
        Self::BiWeekly,
        Self::Monthly,
        Self::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "Hourly",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::BiWeekly => "Bi-Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
            Self::Unrecognized => "Unrecognized",
        }
    }

    /// Case-insensitive lookup. `Unrecognized` is never produced here;
    /// it only arises from persisted data.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "bi-weekly" | "biweekly" => Some(Self::BiWeekly),
            "monthly" => Some(Self::Monthly),
            "yearly" | "annual" | "annually" => Some(Self::Yearly),
            _ => None,
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cadence {
    type Err = ParseCadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseCadenceError(s.to_string()))
    }
}
