use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const PROFILE_URL_BASE: &str = "https://fantasy.premierleague.com/entry";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Variability {
    pub sd: f64,
    pub perc: f64,
    pub abs_sd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Scores {
    pub fpl: f64,
    pub md: f64,
    #[serde(rename = "xG")]
    pub xg: f64,
    pub odds: f64,
    pub variance: f64,
    #[serde(default)]
    pub variability: Variability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manager {
    pub id: u32,
    pub player_name: String,
    pub leagues: BTreeSet<u32>,
    pub scores: Scores,
}

impl Manager {
    pub fn in_any(&self, active: &BTreeSet<u32>) -> bool {
        self.leagues.iter().any(|id| active.contains(id))
    }

    pub fn profile_url(&self) -> String {
        format!("{PROFILE_URL_BASE}/{}/history", self.id)
    }
}

/// Snapshot time of the dataset as delivered by the source.
///
/// Sources send either unix time (seconds or milliseconds) or a date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Unix(f64),
    Text(String),
}

impl Timestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Unix(raw) => {
                if !raw.is_finite() {
                    return None;
                }
                // Anything past 1973 in milliseconds is larger than any plausible seconds value.
                let millis = if raw.abs() > 1e11 { *raw } else { raw * 1000.0 };
                Utc.timestamp_millis_opt(millis as i64).single()
            }
            Timestamp::Text(raw) => {
                let raw = raw.trim();
                if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                    return Some(dt.with_timezone(&Utc));
                }
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(|naive| naive.and_utc())
            }
        }
    }

    pub fn label(&self) -> String {
        match self.to_datetime() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
            None => match self {
                Timestamp::Text(raw) if !raw.trim().is_empty() => raw.trim().to_string(),
                _ => "-".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub managers: Vec<Manager>,
    #[serde(default)]
    pub leagues: Vec<League>,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self {
            managers: Vec::new(),
            leagues: Vec::new(),
            timestamp: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty() && self.leagues.is_empty()
    }

    pub fn league_ids(&self) -> BTreeSet<u32> {
        self.leagues.iter().map(|l| l.id).collect()
    }

    pub fn league_name(&self, id: u32) -> Option<&str> {
        self.leagues
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.name.as_str())
    }

    pub fn updated_label(&self) -> String {
        self.timestamp
            .as_ref()
            .map(Timestamp::label)
            .unwrap_or_else(|| "-".to_string())
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}
