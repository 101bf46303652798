use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cfbd_fetch::{self, RawGame};
use crate::config::SlateConfig;
use crate::demo::demo_slate;
use crate::lines::estimate_line;
use crate::model::{Game, SlateResponse, SourceTag};
use crate::odds_fetch::{self, MarketLine, find_market_line};
use crate::rank_talent::{NEUTRAL_TALENT, build_rank_map, build_talent_map};
use crate::scoring::{ScoreInputs, compute_scores, round_half_up};
use crate::window::{classify_window, format_iso, format_kickoff_date, format_kickoff_time};

/// How far ahead of now a kickoff may be and still make the slate.
pub const LOOKAHEAD_DAYS: i64 = 10;
pub const MAX_GAMES: usize = 40;

const IMPORTANCE_BOTH_RANKED: f64 = 95.0;
const IMPORTANCE_ONE_RANKED: f64 = 80.0;
const IMPORTANCE_UNRANKED: f64 = 65.0;

const WHY_RANKED_PAIR: &str = "Ranked vs ranked; playoff seeding significance.";
const WHY_DEFAULT: &str = "Quality matchup with solid talent composite.";

/// Upstream data for one slate build. Every method may fail independently.
pub trait SlateFeed: Send + Sync {
    fn has_credentials(&self) -> bool;
    fn fetch_games(&self) -> Result<Vec<Value>>;
    fn fetch_rankings(&self) -> Result<Vec<Value>>;
    fn fetch_talent(&self) -> Result<Vec<Value>>;

    fn fetch_market_lines(&self) -> Result<Vec<MarketLine>> {
        Ok(Vec::new())
    }

    fn odds_time_tolerance_secs(&self) -> i64 {
        90 * 60
    }
}

/// CollegeFootballData plus the optional odds feed.
#[derive(Debug, Clone)]
pub struct CfbdFeed {
    cfg: SlateConfig,
}

impl CfbdFeed {
    pub fn new(cfg: SlateConfig) -> Self {
        Self { cfg }
    }
}

impl SlateFeed for CfbdFeed {
    fn has_credentials(&self) -> bool {
        self.cfg.cfbd_api_key.is_some()
    }

    fn fetch_games(&self) -> Result<Vec<Value>> {
        match self.cfg.cfbd_api_key.as_deref() {
            Some(key) => cfbd_fetch::fetch_games(&self.cfg, key),
            None => Ok(Vec::new()),
        }
    }

    fn fetch_rankings(&self) -> Result<Vec<Value>> {
        match self.cfg.cfbd_api_key.as_deref() {
            Some(key) => cfbd_fetch::fetch_rankings(&self.cfg, key),
            None => Ok(Vec::new()),
        }
    }

    fn fetch_talent(&self) -> Result<Vec<Value>> {
        match self.cfg.cfbd_api_key.as_deref() {
            Some(key) => cfbd_fetch::fetch_talent(&self.cfg, key),
            None => Ok(Vec::new()),
        }
    }

    fn fetch_market_lines(&self) -> Result<Vec<MarketLine>> {
        odds_fetch::fetch_market_lines(&self.cfg.odds)
    }

    fn odds_time_tolerance_secs(&self) -> i64 {
        self.cfg.odds.time_tolerance_secs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoReason {
    NoCredentials,
    NoUpcomingGames,
    UpstreamFailed(String),
    WorkerFailed(String),
}

/// Result of one build: live games, or the demo slate and why.
#[derive(Debug, Clone, PartialEq)]
pub enum SlateOutcome {
    Live(Vec<Game>),
    Demo(DemoReason),
}

impl SlateOutcome {
    pub fn is_demo(&self) -> bool {
        matches!(self, SlateOutcome::Demo(_))
    }

    pub fn into_response(self, now: DateTime<Utc>) -> SlateResponse {
        match self {
            SlateOutcome::Live(games) => SlateResponse {
                games,
                demo: false,
                updated_at: format_iso(now),
            },
            SlateOutcome::Demo(_) => demo_slate(now),
        }
    }
}

/// Raw payloads after per-source failure isolation.
#[derive(Debug, Clone, Default)]
pub struct FeedData {
    pub games: Vec<Value>,
    pub rankings: Vec<Value>,
    pub talent: Vec<Value>,
    pub market_lines: Vec<MarketLine>,
}

/// Never fails: every error path collapses into `SlateOutcome::Demo`.
pub fn build_slate(feed: &dyn SlateFeed, now: DateTime<Utc>) -> SlateOutcome {
    if !feed.has_credentials() {
        info!("no CFBD credential configured; serving demo slate");
        return SlateOutcome::Demo(DemoReason::NoCredentials);
    }

    let data = match fetch_all(feed) {
        Ok(data) => data,
        Err(err) => {
            warn!(error = ?err, "slate build failed; serving demo slate");
            return SlateOutcome::Demo(DemoReason::UpstreamFailed(format!("{err:#}")));
        }
    };

    let games = shape_games(&data, now, feed.odds_time_tolerance_secs());
    if games.is_empty() {
        info!(
            raw_games = data.games.len(),
            "no upcoming top-tier games; serving demo slate"
        );
        return SlateOutcome::Demo(DemoReason::NoUpcomingGames);
    }
    info!(games = games.len(), "live slate built");
    SlateOutcome::Live(games)
}

pub fn serve_slate(feed: &dyn SlateFeed, now: DateTime<Utc>) -> SlateResponse {
    build_slate(feed, now).into_response(now)
}

/// Issues all fetches concurrently. A single failing source degrades to an
/// empty list; losing all three CFBD sources is a total failure.
pub fn fetch_all(feed: &dyn SlateFeed) -> Result<FeedData> {
    let ((games, rankings), (talent, market_lines)) = rayon::join(
        || rayon::join(|| feed.fetch_games(), || feed.fetch_rankings()),
        || rayon::join(|| feed.fetch_talent(), || feed.fetch_market_lines()),
    );

    let mut failed = Vec::new();
    let games = isolate("games", games, &mut failed);
    let rankings = isolate("rankings", rankings, &mut failed);
    let talent = isolate("talent", talent, &mut failed);
    if failed.len() == 3 {
        anyhow::bail!("all upstream fetches failed: {}", failed.join(", "));
    }

    let market_lines = isolate("odds", market_lines, &mut failed);
    if !market_lines.is_empty() {
        debug!(
            lines = market_lines.len(),
            teams = odds_fetch::distinct_teams(&market_lines),
            "market lines loaded"
        );
    }

    Ok(FeedData {
        games,
        rankings,
        talent,
        market_lines,
    })
}

fn isolate<T>(source: &'static str, result: Result<Vec<T>>, failed: &mut Vec<&'static str>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(err) => {
            warn!(source = source, error = ?err, "upstream fetch failed; using empty data");
            failed.push(source);
            Vec::new()
        }
    }
}

/// Filters, caps and normalizes raw schedule entries.
pub fn shape_games(data: &FeedData, now: DateTime<Utc>, odds_tolerance_secs: i64) -> Vec<Game> {
    let ranks = build_rank_map(&data.rankings);
    let talent = build_talent_map(&data.talent);
    let cutoff = now + Duration::days(LOOKAHEAD_DAYS);

    let upcoming: Vec<RawGame> = data
        .games
        .iter()
        .map(RawGame::from_value)
        .filter(|g| g.kickoff.is_some_and(|k| k > now && k < cutoff) && g.is_top_tier())
        .take(MAX_GAMES)
        .collect();
    debug!(
        raw = data.games.len(),
        kept = upcoming.len(),
        "filtered schedule"
    );

    let ctx = ShapeContext {
        ranks: &ranks,
        talent: &talent,
        market_lines: &data.market_lines,
        odds_tolerance_secs,
        now,
    };
    upcoming
        .iter()
        .enumerate()
        .map(|(idx, raw)| shape_game(idx, raw, &ctx))
        .collect()
}

struct ShapeContext<'a> {
    ranks: &'a HashMap<String, u32>,
    talent: &'a HashMap<String, f64>,
    market_lines: &'a [MarketLine],
    odds_tolerance_secs: i64,
    now: DateTime<Utc>,
}

fn shape_game(idx: usize, raw: &RawGame, ctx: &ShapeContext<'_>) -> Game {
    let home_key = raw.home.to_lowercase();
    let away_key = raw.away.to_lowercase();
    let rank_home = ctx.ranks.get(&home_key).copied();
    let rank_away = ctx.ranks.get(&away_key).copied();
    let talent_home = ctx.talent.get(&home_key).copied().unwrap_or(NEUTRAL_TALENT);
    let talent_away = ctx.talent.get(&away_key).copied().unwrap_or(NEUTRAL_TALENT);

    let prospect_density = round_half_up((talent_home + talent_away) / 2.0).min(100.0);

    let market = find_market_line(
        ctx.market_lines,
        &raw.home,
        &raw.away,
        raw.kickoff,
        ctx.odds_tolerance_secs,
    );
    let real_spread = raw.spread.or_else(|| market.and_then(|m| m.spread));
    let real_total = raw.total.or_else(|| market.and_then(|m| m.total));
    let estimate = estimate_line(talent_home, talent_away);

    let importance = match (rank_home, rank_away) {
        (Some(_), Some(_)) => IMPORTANCE_BOTH_RANKED,
        (Some(_), None) | (None, Some(_)) => IMPORTANCE_ONE_RANKED,
        (None, None) => IMPORTANCE_UNRANKED,
    };

    let scores = compute_scores(&ScoreInputs {
        spread: Some(real_spread.unwrap_or(estimate.spread)),
        total: Some(real_total.unwrap_or(estimate.total)),
        importance: Some(importance),
        prospect_density: Some(prospect_density),
    });

    let watchability_src = if real_spread.is_some() || real_total.is_some() {
        SourceTag::Odds
    } else {
        SourceTag::Computed
    };
    let drama_src = if real_spread.is_some() {
        SourceTag::Odds
    } else {
        SourceTag::Computed
    };

    let kickoff = raw.kickoff.unwrap_or(ctx.now);
    let why = if rank_home.is_some() && rank_away.is_some() {
        WHY_RANKED_PAIR
    } else {
        WHY_DEFAULT
    };

    Game {
        id: raw
            .id
            .clone()
            .unwrap_or_else(|| format!("{idx}-{}-{}", raw.home, raw.away)),
        window: classify_window(kickoff),
        kickoff_et: format_kickoff_time(kickoff),
        kickoff_date: Some(format_kickoff_date(kickoff)),
        kickoff_iso: Some(format_iso(kickoff)),
        network: raw.network.clone(),
        team_a: raw.home.clone(),
        team_b: raw.away.clone(),
        rank_a: rank_home,
        rank_b: rank_away,
        spread: real_spread,
        total: real_total,
        importance: scores.importance,
        prospect_density: scores.prospect_density,
        watchability: scores.watchability,
        drama: scores.drama,
        importance_src: Some(SourceTag::Ap),
        prospect_density_src: Some(SourceTag::Computed),
        watchability_src: Some(watchability_src),
        drama_src: Some(drama_src),
        last_updated: format_iso(ctx.now),
        why: Some(why.to_string()),
    }
}
