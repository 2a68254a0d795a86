use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::palette::{DEFAULT_LEAGUE_COLORS, LeagueColor, parse_color_overrides};

const DEFAULT_SCORES_FILE: &str = "json/scores.json";

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
    Demo { managers: usize },
}

impl DataSource {
    pub fn label(&self) -> String {
        match self {
            DataSource::Url(url) => url.clone(),
            DataSource::File(path) => path.display().to_string(),
            DataSource::Demo { managers } => format!("demo ({managers} managers)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: DataSource,
    pub http_timeout: Duration,
    pub filter_debounce: Duration,
    pub export_dir: PathBuf,
    pub league_colors: Vec<(u32, LeagueColor)>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source = if let Some(url) = get("FPL_SCORES_URL") {
            DataSource::Url(url.trim().to_string())
        } else if let Some(path) = get("FPL_SCORES_FILE") {
            DataSource::File(PathBuf::from(path.trim()))
        } else if Path::new(DEFAULT_SCORES_FILE).is_file() {
            DataSource::File(PathBuf::from(DEFAULT_SCORES_FILE))
        } else {
            DataSource::Demo {
                managers: parse_or(get("FPL_DEMO_MANAGERS"), 60usize).clamp(1, 5000),
            }
        };

        let http_timeout =
            Duration::from_secs(parse_or(get("FPL_HTTP_TIMEOUT_SECS"), 10u64).clamp(1, 120));
        let filter_debounce =
            Duration::from_millis(parse_or(get("FPL_FILTER_DEBOUNCE_MS"), 500u64).min(5000));
        let export_dir = get("FPL_EXPORT_DIR")
            .map(|dir| PathBuf::from(dir.trim()))
            .unwrap_or_else(|| PathBuf::from("."));

        let mut league_colors = DEFAULT_LEAGUE_COLORS.to_vec();
        if let Some(raw) = get("FPL_LEAGUE_COLORS") {
            for (id, color) in parse_color_overrides(&raw)? {
                match league_colors.iter_mut().find(|(known, _)| *known == id) {
                    Some(entry) => entry.1 = color,
                    None => league_colors.push((id, color)),
                }
            }
        }

        Ok(Self {
            source,
            http_timeout,
            filter_debounce,
            export_dir,
            league_colors,
        })
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}
