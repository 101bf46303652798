use std::env;

use chrono::{Datelike, Utc};

pub const DEFAULT_CFBD_BASE_URL: &str = "https://api.collegefootballdata.com";
pub const DEFAULT_ODDS_BASE_URL: &str = "https://api.the-odds-api.com";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TIME_TOLERANCE_MIN: i64 = 90;

/// Loads `.env.local` first so it wins over `.env`; neither is required.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

#[derive(Debug, Clone)]
pub struct SlateConfig {
    pub cfbd_api_key: Option<String>,
    pub cfbd_base_url: String,
    pub season_type: String,
    pub season_year: Option<i32>,
    pub odds: OddsConfig,
    pub bind_addr: String,
    pub slate_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OddsConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub base_url: String,
    pub regions: String,
    pub time_tolerance_secs: i64,
}

impl OddsConfig {
    pub fn is_active(&self) -> bool {
        self.enabled && self.api_key.is_some()
    }
}

impl SlateConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let time_tolerance_min = get("ODDS_MATCH_TIME_TOLERANCE_MIN")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_TIME_TOLERANCE_MIN)
            .clamp(5, 360);

        Self {
            cfbd_api_key: get("CFBD_API_KEY"),
            cfbd_base_url: get("CFBD_BASE_URL")
                .unwrap_or_else(|| DEFAULT_CFBD_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            season_type: get("CFBD_SEASON_TYPE")
                .unwrap_or_else(|| "regular".to_string())
                .to_ascii_lowercase(),
            season_year: get("CFBD_YEAR").and_then(|v| v.parse::<i32>().ok()),
            odds: OddsConfig {
                enabled: get("ODDS_ENABLED").map(|v| parse_bool(&v)).unwrap_or(true),
                api_key: get("ODDS_API_KEY"),
                base_url: get("ODDS_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_ODDS_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                regions: get("ODDS_REGIONS")
                    .unwrap_or_else(|| "us".to_string())
                    .to_ascii_lowercase(),
                time_tolerance_secs: time_tolerance_min * 60,
            },
            bind_addr: get("SLATE_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            slate_url: get("SLATE_URL"),
        }
    }

    /// Season to query: the override if set, else the current calendar year.
    pub fn season(&self) -> i32 {
        self.season_year.unwrap_or_else(|| Utc::now().year())
    }
}

fn parse_bool(raw: &str) -> bool {
    let t = raw.trim().to_ascii_lowercase();
    !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
}
