use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::SlateConfig;
use crate::fields::{pick_string, pick_timestamp, strict_f64};
use crate::http_client::{fetch_json, http_client, parse_json_body};

const HOME_TEAM_KEYS: &[&str] = &["home_team", "homeTeam", "home"];
const AWAY_TEAM_KEYS: &[&str] = &["away_team", "awayTeam", "away"];
const HOME_CONF_KEYS: &[&str] = &["home_conference", "homeConference", "home_conf"];
const AWAY_CONF_KEYS: &[&str] = &["away_conference", "awayConference", "away_conf"];
const DIVISION_KEYS: &[&str] = &["division", "division_name"];
const NETWORK_KEYS: &[&str] = &["tv", "network", "channel"];
const KICKOFF_KEYS: &[&str] = &["start_date", "startDate", "start_time", "startTime", "start"];

/// Conference names (lowercased) treated as top-tier. Matched as substrings
/// of the upstream conference field.
const FBS_CONFERENCES: &[&str] = &[
    "sec",
    "big ten",
    "big 12",
    "acc",
    "pac-12",
    "pac-10",
    "pac",
    "american athletic",
    "aac",
    "mountain west",
    "sun belt",
    "conference usa",
    "c-usa",
    "mid-american",
    "mac",
    "independent",
    "fbs independents",
    "notre dame",
];

/// Independent top-tier program that no conference field will name.
const INDEPENDENT_PROGRAM: &str = "notre dame";

/// One upstream schedule entry with field-name variants already resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGame {
    pub id: Option<String>,
    pub home: String,
    pub away: String,
    pub home_conference: String,
    pub away_conference: String,
    pub division: String,
    pub network: Option<String>,
    pub kickoff: Option<DateTime<Utc>>,
    pub spread: Option<f64>,
    pub total: Option<f64>,
}

impl RawGame {
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: pick_string(value, &["id"]),
            home: pick_string(value, HOME_TEAM_KEYS).unwrap_or_default(),
            away: pick_string(value, AWAY_TEAM_KEYS).unwrap_or_default(),
            home_conference: pick_string(value, HOME_CONF_KEYS).unwrap_or_default(),
            away_conference: pick_string(value, AWAY_CONF_KEYS).unwrap_or_default(),
            division: pick_string(value, DIVISION_KEYS).unwrap_or_default(),
            network: pick_string(value, NETWORK_KEYS),
            kickoff: pick_timestamp(value, KICKOFF_KEYS),
            spread: strict_f64(value, "spread"),
            total: strict_f64(value, "total"),
        }
    }

    /// Top-tier division, a known conference on either side, or the
    /// independent program.
    pub fn is_top_tier(&self) -> bool {
        if self.division.to_lowercase().contains("fbs") {
            return true;
        }
        let fbs_conf = |conf: &str| {
            let conf = conf.to_lowercase();
            FBS_CONFERENCES.iter().any(|k| conf.contains(k))
        };
        fbs_conf(&self.home_conference)
            || fbs_conf(&self.away_conference)
            || self.home.to_lowercase().contains(INDEPENDENT_PROGRAM)
            || self.away.to_lowercase().contains(INDEPENDENT_PROGRAM)
    }
}

pub fn fetch_games(cfg: &SlateConfig, api_key: &str) -> Result<Vec<Value>> {
    let client = http_client()?;
    let url = format!("{}/games", cfg.cfbd_base_url);
    let year = cfg.season().to_string();
    let value = fetch_json(
        client,
        &url,
        Some(api_key),
        &[
            ("year", year.as_str()),
            ("seasonType", cfg.season_type.as_str()),
            ("division", "fbs"),
        ],
    )
    .context("cfbd games request failed")?;
    Ok(into_list(value))
}

pub fn fetch_rankings(cfg: &SlateConfig, api_key: &str) -> Result<Vec<Value>> {
    let client = http_client()?;
    let url = format!("{}/rankings", cfg.cfbd_base_url);
    let year = cfg.season().to_string();
    let value = fetch_json(
        client,
        &url,
        Some(api_key),
        &[
            ("year", year.as_str()),
            ("seasonType", cfg.season_type.as_str()),
        ],
    )
    .context("cfbd rankings request failed")?;
    Ok(into_list(value))
}

pub fn fetch_talent(cfg: &SlateConfig, api_key: &str) -> Result<Vec<Value>> {
    let client = http_client()?;
    let url = format!("{}/talent", cfg.cfbd_base_url);
    let year = cfg.season().to_string();
    let value = fetch_json(client, &url, Some(api_key), &[("year", year.as_str())])
        .context("cfbd talent request failed")?;
    Ok(into_list(value))
}

/// Parses any of the three CFBD list payloads. Anything but an array is
/// treated as an empty list.
pub fn parse_cfbd_list_json(raw: &str) -> Result<Vec<Value>> {
    parse_json_body(raw).map(into_list)
}

fn into_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}
