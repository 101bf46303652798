use chrono::{DateTime, Utc};

use crate::model::{Game, SlateResponse, SourceTag, ViewingWindow};
use crate::window::format_iso;

/// Fixed three-game slate served whenever live data is unavailable.
pub fn demo_slate(now: DateTime<Utc>) -> SlateResponse {
    let stamp = format_iso(now);
    SlateResponse {
        games: demo_games(&stamp),
        demo: true,
        updated_at: stamp,
    }
}

struct DemoSeed {
    id: &'static str,
    window: ViewingWindow,
    kickoff_et: &'static str,
    network: &'static str,
    team_a: &'static str,
    team_b: &'static str,
    rank_a: u32,
    rank_b: u32,
    spread: f64,
    total: f64,
    scores: [f64; 4],
    why: &'static str,
}

const SEEDS: [DemoSeed; 3] = [
    DemoSeed {
        id: "g1",
        window: ViewingWindow::Prime,
        kickoff_et: "7:30 PM",
        network: "ABC",
        team_a: "Texas",
        team_b: "Ohio State",
        rank_a: 1,
        rank_b: 3,
        spread: -2.0,
        total: 59.0,
        scores: [97.0, 93.0, 88.0, 72.0],
        why: "#1 vs #3; CFP seeding stakes.",
    },
    DemoSeed {
        id: "g2",
        window: ViewingWindow::Afternoon,
        kickoff_et: "3:30 PM",
        network: "ABC",
        team_a: "LSU",
        team_b: "Clemson",
        rank_a: 9,
        rank_b: 4,
        spread: 3.0,
        total: 55.0,
        scores: [94.0, 95.0, 82.0, 79.0],
        why: "Top-10 clash with premium front-7 talent.",
    },
    DemoSeed {
        id: "g3",
        window: ViewingWindow::Noon,
        kickoff_et: "12:00 PM",
        network: "FOX",
        team_a: "Penn State",
        team_b: "Illinois",
        rank_a: 2,
        rank_b: 12,
        spread: -6.0,
        total: 51.0,
        scores: [91.0, 87.0, 72.0, 58.0],
        why: "B1G positioning; QB showcase.",
    },
];

fn demo_games(stamp: &str) -> Vec<Game> {
    SEEDS
        .iter()
        .map(|seed| {
            let [importance, prospect_density, watchability, drama] = seed.scores;
            Game {
                id: seed.id.to_string(),
                window: seed.window,
                kickoff_et: seed.kickoff_et.to_string(),
                kickoff_date: None,
                kickoff_iso: None,
                network: Some(seed.network.to_string()),
                team_a: seed.team_a.to_string(),
                team_b: seed.team_b.to_string(),
                rank_a: Some(seed.rank_a),
                rank_b: Some(seed.rank_b),
                spread: Some(seed.spread),
                total: Some(seed.total),
                importance,
                prospect_density,
                watchability,
                drama,
                importance_src: Some(SourceTag::Ap),
                prospect_density_src: Some(SourceTag::Computed),
                watchability_src: Some(SourceTag::Odds),
                drama_src: Some(SourceTag::Computed),
                last_updated: stamp.to_string(),
                why: Some(seed.why.to_string()),
            }
        })
        .collect()
}
