//! Category scores on a 0-100 scale.
//!
//! The weights below are hand-tuned heuristics, not fitted values. They are
//! kept together so they can be retuned without touching the formulas.

pub const DEFAULT_IMPORTANCE: f64 = 50.0;
pub const DEFAULT_PROSPECT_DENSITY: f64 = 60.0;
pub const DEFAULT_TOTAL: f64 = 50.0;

/// Watchability lost per point of spread.
const WATCH_SPREAD_PENALTY: f64 = 8.0;
/// Watchability gained per point of total, before capping at 100.
const WATCH_TOTAL_GAIN: f64 = 1.2;
/// Share of watchability driven by closeness; the rest comes from the total.
const WATCH_SPREAD_SHARE: f64 = 0.5;
/// Drama lost per point of spread.
const DRAMA_SPREAD_PENALTY: f64 = 7.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreInputs {
    pub spread: Option<f64>,
    pub total: Option<f64>,
    pub importance: Option<f64>,
    pub prospect_density: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryScores {
    pub importance: f64,
    pub prospect_density: f64,
    pub watchability: f64,
    pub drama: f64,
}

pub fn compute_scores(inputs: &ScoreInputs) -> CategoryScores {
    let spread = inputs.spread.map(f64::abs).unwrap_or(0.0);
    let total = inputs.total.unwrap_or(DEFAULT_TOTAL);
    let importance = inputs.importance.unwrap_or(DEFAULT_IMPORTANCE);
    let prospect_density = inputs.prospect_density.unwrap_or(DEFAULT_PROSPECT_DENSITY);

    let closeness = 100.0 - spread * WATCH_SPREAD_PENALTY;
    let scoring = (total * WATCH_TOTAL_GAIN).min(100.0);
    let watchability =
        closeness * WATCH_SPREAD_SHARE + scoring * (1.0 - WATCH_SPREAD_SHARE);
    let drama = 100.0 - spread * DRAMA_SPREAD_PENALTY;

    CategoryScores {
        importance: clamp_score(importance),
        prospect_density: clamp_score(prospect_density),
        watchability: round_half_up(clamp_score(watchability)),
        drama: round_half_up(clamp_score(drama)),
    }
}

/// Clamps into [0, 100]; NaN collapses to 0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Rounds ties toward positive infinity, so -2.5 becomes -2.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_inputs_absent() {
        let scores = compute_scores(&ScoreInputs::default());
        assert_eq!(scores.importance, 50.0);
        assert_eq!(scores.prospect_density, 60.0);
        // spread 0, total 50: 0.5*100 + 0.5*60
        assert_eq!(scores.watchability, 80.0);
        assert_eq!(scores.drama, 100.0);
    }

    #[test]
    fn close_high_scoring_game_scores_well() {
        let scores = compute_scores(&ScoreInputs {
            spread: Some(-2.0),
            total: Some(59.0),
            ..ScoreInputs::default()
        });
        // 0.5*84 + 0.5*70.8 = 77.4
        assert_eq!(scores.watchability, 77.0);
        assert_eq!(scores.drama, 86.0);
    }

    #[test]
    fn scores_stay_bounded_for_any_spread() {
        for spread in [-1e9, -40.0, -13.5, -0.5, 0.0, 0.5, 6.0, 14.3, 40.0, 1e9, f64::NAN] {
            for total in [0.0, 40.0, 74.0, 200.0] {
                let scores = compute_scores(&ScoreInputs {
                    spread: Some(spread),
                    total: Some(total),
                    ..ScoreInputs::default()
                });
                assert!((0.0..=100.0).contains(&scores.watchability), "{spread} {total}");
                assert!((0.0..=100.0).contains(&scores.drama), "{spread}");
            }
        }
    }

    #[test]
    fn importance_and_prospects_are_clamped() {
        for raw in [-50.0, 0.0, 42.5, 100.0, 180.0] {
            let scores = compute_scores(&ScoreInputs {
                importance: Some(raw),
                prospect_density: Some(raw),
                ..ScoreInputs::default()
            });
            assert!((0.0..=100.0).contains(&scores.importance));
            assert!((0.0..=100.0).contains(&scores.prospect_density));
        }
    }

    #[test]
    fn round_half_up_matches_tie_direction() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }

    #[test]
    fn round_half_up_breaks_ties_upward_without_drift() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(0.499_999_999_999_999_94), 0.0);
        assert_eq!(round_half_up(74.5), 75.0);
    }
}
