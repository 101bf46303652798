use std::cmp::Ordering;
use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::OddsConfig;
use crate::fields::parse_timestamp;
use crate::http_client::{fetch_json, http_client};

const SPORT_KEY: &str = "americanfootball_ncaaf";

/// Consensus spread and total for one event, home-team perspective.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketLine {
    pub home: String,
    pub away: String,
    pub kickoff: Option<DateTime<Utc>>,
    pub spread: Option<f64>,
    pub total: Option<f64>,
    pub bookmakers_used: usize,
}

#[derive(Debug, Deserialize)]
struct OddsEvent {
    commence_time: Option<String>,
    home_team: String,
    away_team: String,
    #[serde(default)]
    bookmakers: Vec<OddsBookmaker>,
}

#[derive(Debug, Deserialize)]
struct OddsBookmaker {
    #[serde(default)]
    markets: Vec<OddsMarket>,
}

#[derive(Debug, Deserialize)]
struct OddsMarket {
    key: String,
    #[serde(default)]
    outcomes: Vec<OddsOutcome>,
}

#[derive(Debug, Deserialize)]
struct OddsOutcome {
    name: String,
    #[serde(default)]
    point: Option<f64>,
}

pub fn fetch_market_lines(cfg: &OddsConfig) -> Result<Vec<MarketLine>> {
    if !cfg.enabled {
        return Ok(Vec::new());
    }
    let Some(api_key) = cfg.api_key.as_deref() else {
        return Ok(Vec::new());
    };

    let url = format!("{}/v4/sports/{SPORT_KEY}/odds", cfg.base_url);
    let client = http_client()?;
    let body = fetch_json(
        client,
        &url,
        None,
        &[
            ("apiKey", api_key),
            ("regions", cfg.regions.as_str()),
            ("markets", "spreads,totals"),
            ("oddsFormat", "american"),
            ("dateFormat", "iso"),
        ],
    )
    .context("odds request failed")?;
    if body.is_null() {
        return Ok(Vec::new());
    }
    lines_from_value(body)
}

pub fn parse_market_lines_json(raw: &str) -> Result<Vec<MarketLine>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let body: Value = serde_json::from_str(trimmed).context("invalid odds json")?;
    lines_from_value(body)
}

/// A malformed event is skipped on its own; only a non-array body fails.
fn lines_from_value(body: Value) -> Result<Vec<MarketLine>> {
    let Value::Array(items) = body else {
        anyhow::bail!("invalid odds json: expected an array of events");
    };
    let total = items.len();
    let lines: Vec<MarketLine> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<OddsEvent>(item) {
            Ok(event) => Some(event),
            Err(err) => {
                debug!(error = %err, "skipping malformed odds event");
                None
            }
        })
        .filter_map(|event| event_to_line(&event))
        .collect();
    debug!(events = total, lines = lines.len(), "odds events parsed");
    Ok(lines)
}

fn event_to_line(event: &OddsEvent) -> Option<MarketLine> {
    let home_words = canonical_words(&event.home_team);
    let mut spreads = Vec::new();
    let mut totals = Vec::new();
    let mut books = 0;

    for bookmaker in &event.bookmakers {
        let mut used = false;
        for market in &bookmaker.markets {
            if market.key.eq_ignore_ascii_case("spreads") {
                let home_point = market
                    .outcomes
                    .iter()
                    .find(|o| canonical_words(&o.name) == home_words)
                    .and_then(|o| o.point);
                if let Some(point) = home_point {
                    spreads.push(point);
                    used = true;
                }
            } else if market.key.eq_ignore_ascii_case("totals") {
                let over = market
                    .outcomes
                    .iter()
                    .find(|o| o.name.eq_ignore_ascii_case("over"))
                    .and_then(|o| o.point);
                if let Some(point) = over {
                    totals.push(point);
                    used = true;
                }
            }
        }
        if used {
            books += 1;
        }
    }

    if spreads.is_empty() && totals.is_empty() {
        return None;
    }
    Some(MarketLine {
        home: event.home_team.clone(),
        away: event.away_team.clone(),
        kickoff: event.commence_time.as_deref().and_then(parse_timestamp),
        spread: median_f64(&spreads),
        total: median_f64(&totals),
        bookmakers_used: books,
    })
}

/// Best market line for a schedule entry: both team names must match and the
/// kickoff must fall inside the tolerance. The closest kickoff wins; on equal
/// kickoffs the name with the fewest words past the school name wins, so
/// "Texas" prefers "Texas Longhorns" over "Texas Tech Red Raiders".
pub fn find_market_line<'a>(
    lines: &'a [MarketLine],
    home: &str,
    away: &str,
    kickoff: Option<DateTime<Utc>>,
    time_tolerance_secs: i64,
) -> Option<&'a MarketLine> {
    let home_words = canonical_words(home);
    let away_words = canonical_words(away);
    if home_words.is_empty() || away_words.is_empty() {
        return None;
    }

    let mut best: Option<(&MarketLine, (i64, usize))> = None;
    for line in lines {
        let (Some(home_extra), Some(away_extra)) = (
            extra_words(&home_words, &line.home),
            extra_words(&away_words, &line.away),
        ) else {
            continue;
        };
        let diff = match (kickoff, line.kickoff) {
            (Some(a), Some(b)) => {
                let diff = (a - b).num_seconds().abs();
                if diff > time_tolerance_secs {
                    continue;
                }
                diff
            }
            _ => time_tolerance_secs / 2,
        };
        let score = (diff, home_extra + away_extra);
        if let Some((_, best_score)) = best
            && score >= best_score
        {
            continue;
        }
        best = Some((line, score));
    }
    best.map(|(line, _)| line)
}

/// Odds feeds append the mascot ("Texas Longhorns"), so the schedule name
/// must be a whole-word prefix of the market name. Returns how many market
/// words follow the school name.
fn extra_words(school_words: &[String], market_name: &str) -> Option<usize> {
    let market_words = canonical_words(market_name);
    let matches = market_words.len() >= school_words.len()
        && market_words.iter().zip(school_words).all(|(m, s)| m == s);
    matches.then(|| market_words.len() - school_words.len())
}

fn canonical_words(name: &str) -> Vec<String> {
    let mut cleaned = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            '&' => cleaned.push_str(" and "),
            c if c.is_ascii_alphanumeric() => cleaned.push(c.to_ascii_lowercase()),
            '\'' | '.' => {}
            _ => cleaned.push(' '),
        }
    }
    cleaned
        .split_whitespace()
        .map(|w| match w {
            "st" => "state".to_string(),
            other => other.to_string(),
        })
        .collect()
}

fn median_f64(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Distinct schools named across the lines, for log summaries.
pub fn distinct_teams(lines: &[MarketLine]) -> usize {
    lines
        .iter()
        .flat_map(|l| [l.home.as_str(), l.away.as_str()])
        .collect::<HashSet<_>>()
        .len()
}
