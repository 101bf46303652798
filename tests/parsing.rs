use std::fs;
use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use saturday_signal::cfbd_fetch::{RawGame, parse_cfbd_list_json};
use saturday_signal::feed::parse_slate_json;
use saturday_signal::odds_fetch::{find_market_line, parse_market_lines_json};
use saturday_signal::rank_talent::{build_rank_map, build_talent_map};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_cfbd_games_fixture() {
    let raw = read_fixture("cfbd_games.json");
    let rows = parse_cfbd_list_json(&raw).expect("fixture should parse");
    assert_eq!(rows.len(), 7);

    let games: Vec<RawGame> = rows.iter().map(RawGame::from_value).collect();
    assert_eq!(games[0].id.as_deref(), Some("401752001"));
    assert_eq!(games[0].home, "Texas");
    assert_eq!(games[0].network.as_deref(), Some("ABC"));
    assert_eq!(
        games[0].kickoff,
        Some(Utc.with_ymd_and_hms(2025, 9, 6, 23, 30, 0).unwrap())
    );

    // camelCase variant with real numbers on the record
    assert_eq!(games[1].away, "Clemson");
    assert_eq!(games[1].spread, Some(-3.5));
    assert_eq!(games[1].total, Some(55.5));

    assert!(!games[2].is_top_tier());
    assert!(games[5].is_top_tier());
    // string spreads are not real numbers
    assert_eq!(games[6].spread, None);
    assert!(games[6].id.is_none());
}

#[test]
fn non_array_cfbd_payloads_are_empty() {
    assert!(parse_cfbd_list_json("{\"message\":\"nope\"}").unwrap().is_empty());
    assert!(parse_cfbd_list_json("null").unwrap().is_empty());
    assert!(parse_cfbd_list_json("").unwrap().is_empty());
    assert!(parse_cfbd_list_json("not json").is_err());
}

#[test]
fn rank_map_reads_ap_poll_only_and_later_weeks_win() {
    let raw = read_fixture("cfbd_rankings.json");
    let weeks = parse_cfbd_list_json(&raw).expect("fixture should parse");
    let ranks = build_rank_map(&weeks);

    assert_eq!(ranks.get("texas"), Some(&1));
    assert_eq!(ranks.get("ohio state"), Some(&3));
    assert_eq!(ranks.get("lsu"), Some(&9));
    assert_eq!(ranks.get("notre dame"), Some(&6));
    assert!(!ranks.contains_key("boise state"), "coaches poll is ignored");
    assert!(!ranks.contains_key("navy"), "rank 0 is not a ranking");
}

#[test]
fn talent_map_rescales_fixture_to_zero_hundred() {
    let raw = read_fixture("cfbd_talent.json");
    let rows = parse_cfbd_list_json(&raw).expect("fixture should parse");
    let talent = build_talent_map(&rows);

    assert_eq!(talent.len(), 7);
    assert_eq!(talent.get("texas"), Some(&100.0));
    assert_eq!(talent.get("nevada"), Some(&0.0));
    assert_eq!(talent.get("ohio state"), Some(&93.0));
    assert_eq!(talent.get("lsu"), Some(&77.0));
    assert_eq!(talent.get("clemson"), Some(&72.0));
}

#[test]
fn parses_odds_fixture_into_consensus_lines() {
    let raw = read_fixture("odds_ncaaf.json");
    let lines = parse_market_lines_json(&raw).expect("fixture should parse");
    assert_eq!(lines.len(), 2);

    let texas = &lines[0];
    assert_eq!(texas.bookmakers_used, 3);
    assert_eq!(texas.spread, Some(-2.5));
    assert_eq!(texas.total, Some(59.0));

    let lsu = &lines[1];
    assert_eq!(lsu.spread, Some(-7.0));
    assert_eq!(lsu.total, None);

    let kickoff = Utc.with_ymd_and_hms(2025, 9, 6, 23, 0, 0).unwrap();
    let found = find_market_line(&lines, "Texas", "Ohio State", Some(kickoff), 90 * 60)
        .expect("within tolerance");
    assert_eq!(found.home, "Texas Longhorns");
    assert!(find_market_line(&lines, "Texas", "Ohio State", Some(kickoff), 10 * 60).is_none());
    assert!(find_market_line(&lines, "Ohio State", "Texas", Some(kickoff), 90 * 60).is_none());
}

#[test]
fn parses_slate_payload_with_optional_fields_missing() {
    let raw = r#"{
        "games": [{
            "id": "g9",
            "window": "Late",
            "kickoffET": "10:30 PM",
            "teamA": "Oregon",
            "teamB": "USC",
            "importance": 80,
            "prospectDensity": 77,
            "watchability": 70,
            "drama": 65,
            "lastUpdated": "2025-09-06T12:00:00.000Z"
        }],
        "updatedAt": "2025-09-06T12:00:00.000Z"
    }"#;
    let slate = parse_slate_json(raw).expect("slate should parse");
    assert!(!slate.demo);
    assert_eq!(slate.games.len(), 1);
    assert_eq!(slate.games[0].kickoff_et, "10:30 PM");
    assert!(slate.games[0].spread.is_none());
    assert!(slate.games[0].importance_src.is_none());
}
