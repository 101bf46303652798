use crate::scoring::round_half_up;

const MAX_TALENT_GAP: f64 = 40.0;
const TALENT_PER_POINT: f64 = 6.0;
const BASE_TOTAL: f64 = 46.0;
const TOTAL_PER_TALENT: f64 = 0.35;
const MIN_TOTAL: f64 = 40.0;
const MAX_TOTAL: f64 = 74.0;

/// Rough market line inferred from roster talent. Only used when no real
/// spread or total is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineEstimate {
    pub spread: f64,
    pub total: f64,
}

pub fn estimate_line(home_talent: f64, away_talent: f64) -> LineEstimate {
    let gap = (home_talent - away_talent).clamp(-MAX_TALENT_GAP, MAX_TALENT_GAP);
    let spread = round_half_up(gap / TALENT_PER_POINT);

    let avg = (home_talent + away_talent) / 2.0;
    let total = round_half_up(BASE_TOTAL + avg * TOTAL_PER_TALENT).clamp(MIN_TOTAL, MAX_TOTAL);

    LineEstimate { spread, total }
}
