use std::fs;
use std::path::PathBuf;

use madness_terminal::api_fetch::{
    parse_bubble_teams_json, parse_cinderella_json, parse_comparison_json,
    parse_conferences_json, parse_prediction_json, parse_profile_json, parse_team_catalog_json,
    parse_top_teams_json, parse_upset_alerts_json,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_prediction_fixture() {
    let raw = read_fixture("prediction.json");
    let prediction = parse_prediction_json(&raw).expect("fixture should parse");
    assert_eq!(prediction.team, "Duke");
    assert_eq!(prediction.year, 2025);
    assert!((prediction.tournament_probability - 0.87).abs() < 1e-9);
    assert_eq!(prediction.prediction_confidence, "High");
    assert_eq!(prediction.key_factors.len(), 3);
    assert_eq!(prediction.current_record, "28-5");
}

#[test]
fn prediction_probability_out_of_range_is_rejected() {
    let raw = r#"{
        "team": "Duke",
        "year": 2025,
        "tournament_probability": 1.3,
        "efficiency_score": 24.3,
        "prediction_confidence": "High",
        "current_record": "28-5"
    }"#;
    assert!(parse_prediction_json(raw).is_err());
}

#[test]
fn prediction_missing_key_factors_defaults_to_empty() {
    let raw = r#"{
        "team": "Duke",
        "year": 2025,
        "tournament_probability": 0.5,
        "efficiency_score": 10.0,
        "prediction_confidence": "Medium",
        "current_record": "20-10"
    }"#;
    let prediction = parse_prediction_json(raw).expect("should parse");
    assert!(prediction.key_factors.is_empty());
}

#[test]
fn parses_comparison_fixture() {
    let raw = read_fixture("comparison.json");
    let comparison = parse_comparison_json(&raw).expect("fixture should parse");
    assert_eq!(comparison.team1, "Duke");
    assert_eq!(comparison.team2, "Houston");
    assert_eq!(comparison.winner_prediction, "Duke");
    assert!((comparison.win_probability - 0.64).abs() < 1e-9);
    assert!((comparison.key_differences.efficiency_gap - 9.2).abs() < 1e-9);
    assert_eq!(
        comparison.key_differences.experience_edge.as_deref(),
        Some("Houston")
    );
}

#[test]
fn comparison_with_foreign_winner_is_rejected() {
    let raw = read_fixture("comparison_bad_winner.json");
    let err = parse_comparison_json(&raw).expect_err("winner must be one of the two teams");
    assert!(err.to_string().contains("winner_prediction"));
}

#[test]
fn comparison_win_probability_out_of_range_is_rejected() {
    let raw = r#"{
        "team1": "Duke",
        "team2": "Houston",
        "winner_prediction": "Duke",
        "win_probability": -0.1,
        "key_differences": {
            "efficiency_gap": 1.0,
            "offensive_advantage": "Duke",
            "defensive_advantage": "Duke",
            "pace_difference": 0.5
        }
    }"#;
    assert!(parse_comparison_json(raw).is_err());
}

#[test]
fn parses_profile_fixture() {
    let raw = read_fixture("profile.json");
    let profile = parse_profile_json(&raw).expect("fixture should parse");
    assert_eq!(profile.team, "Gonzaga");
    assert_eq!(profile.conference, "WCC");
    assert_eq!(profile.percentiles.len(), 4);
    assert!((profile.efficiency_metrics.net_efficiency - 21.4).abs() < 1e-9);
    assert_eq!(profile.strengths.len(), 2);
    assert_eq!(profile.weaknesses.len(), 1);
    assert!((profile.tournament_outlook.readiness_score - 0.77).abs() < 1e-9);
}

#[test]
fn profile_percentile_out_of_range_is_rejected() {
    let raw = r#"{
        "team": "Gonzaga",
        "conference": "WCC",
        "year": 2024,
        "record": "26-7",
        "efficiency_metrics": {
            "net_efficiency": 21.4,
            "offensive_efficiency": 118.2,
            "defensive_efficiency": 96.8,
            "pace": 71.3
        },
        "percentiles": {"net_efficiency": 104.0},
        "tournament_outlook": {"probability": 0.8, "readiness_score": 0.7}
    }"#;
    let err = parse_profile_json(raw).expect_err("percentile above 100 must fail");
    assert!(err.to_string().contains("net_efficiency"));
}

#[test]
fn parses_bubble_teams_fixture() {
    let raw = read_fixture("bubble_teams.json");
    let teams = parse_bubble_teams_json(&raw).expect("fixture should parse");
    assert_eq!(teams.len(), 3);
    assert_eq!(teams[0].team, "Indiana");
    assert!((teams[1].tournament_probability - 0.48).abs() < 1e-9);
    assert_eq!(teams[2].record, "17-14");
}

#[test]
fn bubble_teams_null_is_empty() {
    assert!(parse_bubble_teams_json("null").expect("null should parse").is_empty());
    assert!(parse_bubble_teams_json("").expect("empty should parse").is_empty());
}

#[test]
fn parses_upset_alerts_fixture() {
    let raw = read_fixture("upset_alerts.json");
    let alerts = parse_upset_alerts_json(&raw).expect("fixture should parse");
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].seed, Some(2));
    assert_eq!(alerts[0].risk_level, "High");
    assert_eq!(alerts[0].reasons.len(), 2);
    // Optional fields omitted by the backend.
    assert_eq!(alerts[1].seed, None);
    assert!(alerts[1].reasons.is_empty());
}

#[test]
fn parses_cinderella_fixture() {
    let raw = read_fixture("cinderella.json");
    let candidates = parse_cinderella_json(&raw).expect("fixture should parse");
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].team, "Drake");
    assert_eq!(candidates[0].potential_level, "High");
    assert!((candidates[1].deep_run_probability - 0.34).abs() < 1e-9);
}

#[test]
fn parses_top_teams_fixture() {
    let raw = read_fixture("top_teams.json");
    let teams = parse_top_teams_json(&raw).expect("fixture should parse");
    assert_eq!(teams.len(), 3);
    assert_eq!(teams[0].team, "Houston");
    assert!((teams[0].tournament_readiness - 0.93).abs() < 1e-9);
    assert_eq!(teams[2].conference, "SEC");
}

#[test]
fn top_teams_missing_wrapper_field_is_empty() {
    let teams = parse_top_teams_json("{}").expect("should parse");
    assert!(teams.is_empty());
    assert!(parse_top_teams_json("null").expect("null should parse").is_empty());
}

#[test]
fn conferences_null_is_empty() {
    assert!(parse_conferences_json("null").expect("null should parse").is_empty());
}

#[test]
fn team_catalog_is_trimmed_sorted_and_deduped() {
    let raw = read_fixture("team_catalog.json");
    let teams = parse_team_catalog_json(&raw).expect("fixture should parse");
    assert_eq!(teams, vec!["Arizona", "Duke", "Kansas", "Texas A&M"]);
}

#[test]
fn team_catalog_null_is_empty() {
    assert!(parse_team_catalog_json("null").expect("null should parse").is_empty());
}
