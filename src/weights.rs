use serde::{Deserialize, Serialize};

use crate::model::{Game, ViewingWindow};
use crate::scoring::round_half_up;

/// User-facing category weights. Any non-negative scale works; they are
/// normalized before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub importance: f64,
    pub prospect: f64,
    pub watchability: f64,
    pub drama: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            importance: 35.0,
            prospect: 30.0,
            watchability: 20.0,
            drama: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedWeights {
    pub importance: f64,
    pub prospect: f64,
    pub watchability: f64,
    pub drama: f64,
}

impl NormalizedWeights {
    pub fn sum(&self) -> f64 {
        self.importance + self.prospect + self.watchability + self.drama
    }
}

/// Divides each weight by the sum. A zero sum divides by 1, so all-zero
/// weights give every game a score of 0.
pub fn normalize_weights(w: &Weights) -> NormalizedWeights {
    let clean = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
    let (i, p, wa, d) = (
        clean(w.importance),
        clean(w.prospect),
        clean(w.watchability),
        clean(w.drama),
    );
    let sum = i + p + wa + d;
    let divisor = if sum == 0.0 { 1.0 } else { sum };
    NormalizedWeights {
        importance: i / divisor,
        prospect: p / divisor,
        watchability: wa / divisor,
        drama: d / divisor,
    }
}

/// WatchScore for one game.
pub fn composite_score(game: &Game, w: &NormalizedWeights) -> u32 {
    let raw = game.importance * w.importance
        + game.prospect_density * w.prospect
        + game.watchability * w.watchability
        + game.drama * w.drama;
    round_half_up(raw).max(0.0) as u32
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedGame {
    pub game: Game,
    pub score: u32,
}

/// Scores every game and sorts best-first. Ties keep feed order.
pub fn rank_games(games: &[Game], weights: &Weights) -> Vec<RankedGame> {
    let nw = normalize_weights(weights);
    let mut ranked: Vec<RankedGame> = games
        .iter()
        .map(|g| RankedGame {
            score: composite_score(g, &nw),
            game: g.clone(),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Recommendation for one viewing window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPick<'a> {
    pub window: ViewingWindow,
    pub primary: Option<&'a RankedGame>,
    pub alternate: Option<&'a RankedGame>,
}

impl WindowPick<'_> {
    pub fn is_empty(&self) -> bool {
        self.primary.is_none()
    }
}

/// All games per window, preserving ranked order, in display order of
/// windows. Empty windows are kept.
pub fn group_by_window(ranked: &[RankedGame]) -> Vec<(ViewingWindow, Vec<&RankedGame>)> {
    ViewingWindow::ALL
        .iter()
        .map(|&window| {
            let games = ranked.iter().filter(|r| r.game.window == window).collect();
            (window, games)
        })
        .collect()
}

/// Top two games of each window as primary and alternate.
pub fn window_picks(ranked: &[RankedGame]) -> Vec<WindowPick<'_>> {
    group_by_window(ranked)
        .into_iter()
        .map(|(window, games)| WindowPick {
            window,
            primary: games.first().copied(),
            alternate: games.get(1).copied(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_weights_sum_to_one() {
        for w in [
            Weights::default(),
            Weights { importance: 1.0, prospect: 0.0, watchability: 0.0, drama: 0.0 },
            Weights { importance: 3.0, prospect: 7.0, watchability: 11.0, drama: 100.0 },
        ] {
            assert!((normalize_weights(&w).sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn all_zero_weights_do_not_divide_by_zero() {
        let nw = normalize_weights(&Weights {
            importance: 0.0,
            prospect: 0.0,
            watchability: 0.0,
            drama: 0.0,
        });
        assert_eq!(nw.sum(), 0.0);
        assert!(nw.importance.is_finite());
    }

    #[test]
    fn negative_and_nan_weights_count_as_zero() {
        let nw = normalize_weights(&Weights {
            importance: -10.0,
            prospect: f64::NAN,
            watchability: 1.0,
            drama: 1.0,
        });
        assert_eq!(nw.importance, 0.0);
        assert_eq!(nw.prospect, 0.0);
        assert!((nw.watchability - 0.5).abs() < 1e-12);
    }
}
