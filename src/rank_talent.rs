use std::collections::HashMap;

use serde_json::Value;

use crate::fields::{pick_f64, pick_string};
use crate::scoring::round_half_up;

/// Talent assumed for a team the feed does not list, and for every team when
/// all raw values are equal.
pub const NEUTRAL_TALENT: f64 = 70.0;

const TEAM_NAME_KEYS: &[&str] = &["team", "school", "name"];
const RANK_KEYS: &[&str] = &["rank", "current", "value"];
const TALENT_TEAM_KEYS: &[&str] = &["team", "school"];
const TALENT_VALUE_KEYS: &[&str] = &["talent", "talentComposite", "composite"];

/// Lowercased team name -> AP rank. Weeks are read in input order, so a later
/// week overwrites an earlier one for the same team.
pub fn build_rank_map(weeks: &[Value]) -> HashMap<String, u32> {
    let mut ranks = HashMap::new();
    for week in weeks {
        let Some(polls) = week.get("polls").and_then(Value::as_array) else {
            continue;
        };
        for poll in polls {
            let name = poll.get("poll").and_then(Value::as_str).unwrap_or_default();
            if !is_ap_poll(name) {
                continue;
            }
            let Some(entries) = poll.get("ranks").and_then(Value::as_array) else {
                continue;
            };
            for entry in entries {
                let Some(team) = pick_string(entry, TEAM_NAME_KEYS) else {
                    continue;
                };
                let Some(rank) = pick_f64(entry, RANK_KEYS) else {
                    continue;
                };
                if rank < 1.0 {
                    continue;
                }
                ranks.insert(team.to_lowercase(), rank.round() as u32);
            }
        }
    }
    ranks
}

fn is_ap_poll(name: &str) -> bool {
    name.to_ascii_lowercase().contains("ap")
}

/// Lowercased team name -> talent rescaled so the weakest roster in the
/// payload lands on 0 and the strongest on 100.
pub fn build_talent_map(rows: &[Value]) -> HashMap<String, f64> {
    let raw: Vec<(Option<String>, f64)> = rows
        .iter()
        .map(|row| {
            let team = pick_string(row, TALENT_TEAM_KEYS).map(|t| t.to_lowercase());
            let value = pick_f64(row, TALENT_VALUE_KEYS).unwrap_or(0.0);
            (team, value)
        })
        .collect();
    if raw.is_empty() {
        return HashMap::new();
    }

    // Nameless rows still take part in the min/max scan.
    let min = raw.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max = raw.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    raw.into_iter()
        .filter_map(|(team, value)| {
            let norm = if span == 0.0 {
                NEUTRAL_TALENT
            } else {
                round_half_up((value - min) / span * 100.0)
            };
            team.map(|t| (t, norm))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ignores_non_ap_polls() {
        let weeks = vec![json!({
            "polls": [
                { "poll": "Coaches Poll", "ranks": [{ "school": "Texas", "rank": 2 }] },
                { "poll": "AP Top 25", "ranks": [{ "school": "Texas", "rank": 1 }] }
            ]
        })];
        let ranks = build_rank_map(&weeks);
        assert_eq!(ranks.get("texas"), Some(&1));
        assert_eq!(ranks.len(), 1);
    }

    #[test]
    fn skips_entries_without_name_or_rank() {
        let weeks = vec![json!({
            "polls": [{ "poll": "ap", "ranks": [
                { "school": "", "rank": 4 },
                { "school": "Ohio State", "rank": 0 },
                { "team": "LSU", "current": "9" }
            ]}]
        })];
        let ranks = build_rank_map(&weeks);
        assert_eq!(ranks.get("lsu"), Some(&9));
        assert!(!ranks.contains_key("ohio state"));
    }

    #[test]
    fn malformed_weeks_are_tolerated() {
        let weeks = vec![json!(null), json!({ "polls": "nope" }), json!([1, 2])];
        assert!(build_rank_map(&weeks).is_empty());
    }

    #[test]
    fn talent_rows_without_team_are_dropped() {
        let rows = vec![
            json!({ "talent": 900.0 }),
            json!({ "school": "Army", "talent": 600.0 }),
            json!({ "school": "Navy", "talent": 750.0 }),
        ];
        let talent = build_talent_map(&rows);
        assert_eq!(talent.len(), 2);
        assert_eq!(talent.get("army"), Some(&0.0));
        assert_eq!(talent.get("navy"), Some(&50.0));
    }

    #[test]
    fn equal_talent_everywhere_is_neutral() {
        let rows = vec![
            json!({ "team": "A", "talent": 500.0 }),
            json!({ "team": "B", "talent": 500.0 }),
        ];
        let talent = build_talent_map(&rows);
        assert_eq!(talent.len(), 2);
        assert_eq!(talent.get("a"), Some(&NEUTRAL_TALENT));
        assert_eq!(talent.get("b"), Some(&NEUTRAL_TALENT));
    }

    #[test]
    fn empty_talent_payload_gives_empty_map() {
        assert!(build_talent_map(&[]).is_empty());
    }
}
