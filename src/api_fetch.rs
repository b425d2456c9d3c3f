use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::http_client::{api_base_url, http_client};

/// Failure taxonomy surfaced to the UI. Each kind renders as a distinct
/// inline message; `NotFound` carries the requested team/year in its text.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    #[error("{0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentPrediction {
    pub team: String,
    pub year: u16,
    pub tournament_probability: f64,
    pub efficiency_score: f64,
    pub prediction_confidence: String,
    #[serde(default)]
    pub key_factors: Vec<String>,
    pub current_record: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyDifferences {
    pub efficiency_gap: f64,
    pub offensive_advantage: String,
    pub defensive_advantage: String,
    pub pace_difference: f64,
    #[serde(default)]
    pub experience_edge: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamComparison {
    pub team1: String,
    pub team2: String,
    pub winner_prediction: String,
    pub win_probability: f64,
    pub key_differences: KeyDifferences,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficiencyMetrics {
    pub net_efficiency: f64,
    pub offensive_efficiency: f64,
    pub defensive_efficiency: f64,
    pub pace: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentOutlook {
    pub probability: f64,
    pub readiness_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamProfile {
    pub team: String,
    pub conference: String,
    pub year: u16,
    pub record: String,
    pub efficiency_metrics: EfficiencyMetrics,
    // BTreeMap keeps the percentile rows in a stable order for rendering.
    #[serde(default)]
    pub percentiles: BTreeMap<String, f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    pub tournament_outlook: TournamentOutlook,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BubbleTeam {
    pub team: String,
    pub conference: String,
    pub tournament_probability: f64,
    pub efficiency: f64,
    #[serde(default)]
    pub wins: u32,
    pub record: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsetAlert {
    pub team: String,
    #[serde(default)]
    pub seed: Option<u8>,
    pub upset_risk: f64,
    pub risk_level: String,
    pub efficiency: f64,
    #[serde(default)]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CinderellaCandidate {
    pub team: String,
    #[serde(default)]
    pub seed: Option<u8>,
    pub deep_run_probability: f64,
    pub efficiency: f64,
    pub potential_level: String,
    #[serde(default)]
    pub strengths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConferenceStats {
    pub conference: String,
    pub avg_efficiency: f64,
    pub tournament_rate: f64,
    pub top_team: String,
    pub teams_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTeam {
    pub team: String,
    pub conference: String,
    pub efficiency: f64,
    #[serde(default)]
    pub wins: u32,
    pub record: String,
    pub tournament_readiness: f64,
}

#[derive(Debug, Deserialize)]
struct TopTeamsResponse {
    #[serde(default)]
    top_teams: Vec<TopTeam>,
}

#[derive(Debug, Deserialize)]
struct TeamCatalogResponse {
    #[serde(default)]
    teams: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

pub fn fetch_health() -> Result<(), ApiError> {
    let url = request_url(&["health"], &[])?;
    let body = get_body(url, || "health endpoint missing".to_string())?;
    let health: HealthResponse = serde_json::from_str(body.trim())
        .map_err(|err| ApiError::Unknown(format!("invalid health json: {err}")))?;
    if health.status == "healthy" {
        Ok(())
    } else {
        Err(ApiError::Unknown(format!(
            "backend reported status '{}'",
            health.status
        )))
    }
}

pub fn fetch_prediction(team: &str, year: u16) -> Result<TournamentPrediction, ApiError> {
    let url = request_url(
        &["api", "tournament", "predict", team],
        &[("year", &year.to_string())],
    )?;
    let body = get_body(url, || format!("Team '{team}' not found for year {year}"))?;
    parse_prediction_json(&body).map_err(unknown)
}

pub fn fetch_comparison(team1: &str, team2: &str, year: u16) -> Result<TeamComparison, ApiError> {
    let url = request_url(
        &["api", "analytics", "compare", team1, team2],
        &[("year", &year.to_string())],
    )?;
    let body = get_body(url, || {
        format!("One or both of '{team1}' and '{team2}' not found for year {year}")
    })?;
    parse_comparison_json(&body).map_err(unknown)
}

pub fn fetch_team_profile(team: &str, year: u16) -> Result<TeamProfile, ApiError> {
    let url = request_url(
        &["api", "analytics", "team-profile", team],
        &[("year", &year.to_string())],
    )?;
    let body = get_body(url, || format!("Team '{team}' not found for year {year}"))?;
    parse_profile_json(&body).map_err(unknown)
}

pub fn fetch_bubble_teams(year: u16) -> Result<Vec<BubbleTeam>, ApiError> {
    let url = request_url(
        &["api", "tournament", "bubble-teams"],
        &[("year", &year.to_string())],
    )?;
    let body = get_body(url, || format!("No bubble data for year {year}"))?;
    parse_bubble_teams_json(&body).map_err(unknown)
}

pub fn fetch_top_teams(year: u16, limit: u16) -> Result<Vec<TopTeam>, ApiError> {
    let url = request_url(
        &["api", "tournament", "top-teams"],
        &[("year", &year.to_string()), ("limit", &limit.to_string())],
    )?;
    let body = get_body(url, || format!("No team data for year {year}"))?;
    parse_top_teams_json(&body).map_err(unknown)
}

pub fn fetch_conferences(year: u16) -> Result<Vec<ConferenceStats>, ApiError> {
    let url = request_url(
        &["api", "analytics", "conferences"],
        &[("year", &year.to_string())],
    )?;
    let body = get_body(url, || format!("No conference data for year {year}"))?;
    parse_conferences_json(&body).map_err(unknown)
}

pub fn fetch_upset_alerts(year: u16) -> Result<Vec<UpsetAlert>, ApiError> {
    let url = request_url(&["api", "upsets", "alerts"], &[("year", &year.to_string())])?;
    let body = get_body(url, || format!("No upset data for year {year}"))?;
    parse_upset_alerts_json(&body).map_err(unknown)
}

pub fn fetch_cinderella_candidates(year: u16) -> Result<Vec<CinderellaCandidate>, ApiError> {
    let url = request_url(
        &["api", "upsets", "cinderella"],
        &[("year", &year.to_string())],
    )?;
    let body = get_body(url, || format!("No cinderella data for year {year}"))?;
    parse_cinderella_json(&body).map_err(unknown)
}

pub fn fetch_team_catalog() -> Result<Vec<String>, ApiError> {
    let url = request_url(&["api", "analytics", "teams"], &[])?;
    let body = get_body(url, || "team catalog endpoint missing".to_string())?;
    parse_team_catalog_json(&body).map_err(unknown)
}

pub fn parse_prediction_json(raw: &str) -> Result<TournamentPrediction> {
    let prediction: TournamentPrediction =
        serde_json::from_str(raw.trim()).context("invalid prediction json")?;
    check_probability(prediction.tournament_probability, "tournament_probability")?;
    Ok(prediction)
}

pub fn parse_comparison_json(raw: &str) -> Result<TeamComparison> {
    let comparison: TeamComparison =
        serde_json::from_str(raw.trim()).context("invalid comparison json")?;
    check_probability(comparison.win_probability, "win_probability")?;
    if comparison.winner_prediction != comparison.team1
        && comparison.winner_prediction != comparison.team2
    {
        bail!(
            "winner_prediction '{}' matches neither '{}' nor '{}'",
            comparison.winner_prediction,
            comparison.team1,
            comparison.team2
        );
    }
    Ok(comparison)
}

pub fn parse_profile_json(raw: &str) -> Result<TeamProfile> {
    let profile: TeamProfile = serde_json::from_str(raw.trim()).context("invalid profile json")?;
    check_probability(profile.tournament_outlook.probability, "probability")?;
    for (stat, value) in &profile.percentiles {
        if !(0.0..=100.0).contains(value) {
            bail!("percentile '{stat}' out of range: {value}");
        }
    }
    Ok(profile)
}

pub fn parse_bubble_teams_json(raw: &str) -> Result<Vec<BubbleTeam>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let teams: Vec<BubbleTeam> =
        serde_json::from_str(trimmed).context("invalid bubble teams json")?;
    for team in &teams {
        check_probability(team.tournament_probability, "tournament_probability")?;
    }
    Ok(teams)
}

pub fn parse_top_teams_json(raw: &str) -> Result<Vec<TopTeam>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let response: TopTeamsResponse =
        serde_json::from_str(trimmed).context("invalid top teams json")?;
    Ok(response.top_teams)
}

pub fn parse_conferences_json(raw: &str) -> Result<Vec<ConferenceStats>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("invalid conferences json")
}

pub fn parse_upset_alerts_json(raw: &str) -> Result<Vec<UpsetAlert>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let alerts: Vec<UpsetAlert> =
        serde_json::from_str(trimmed).context("invalid upset alerts json")?;
    for alert in &alerts {
        check_probability(alert.upset_risk, "upset_risk")?;
    }
    Ok(alerts)
}

pub fn parse_cinderella_json(raw: &str) -> Result<Vec<CinderellaCandidate>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let candidates: Vec<CinderellaCandidate> =
        serde_json::from_str(trimmed).context("invalid cinderella json")?;
    for candidate in &candidates {
        check_probability(candidate.deep_run_probability, "deep_run_probability")?;
    }
    Ok(candidates)
}

/// Catalog entries form a set; duplicates are collapsed and the result is
/// sorted for display.
pub fn parse_team_catalog_json(raw: &str) -> Result<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let response: TeamCatalogResponse =
        serde_json::from_str(trimmed).context("invalid team catalog json")?;
    let mut teams: Vec<String> = response
        .teams
        .into_iter()
        .map(|team| team.trim().to_string())
        .filter(|team| !team.is_empty())
        .collect();
    teams.sort();
    teams.dedup();
    Ok(teams)
}

fn check_probability(value: f64, field: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        bail!("{field} out of range: {value}");
    }
    Ok(())
}

fn unknown(err: anyhow::Error) -> ApiError {
    ApiError::Unknown(err.to_string())
}

// Team names go into path segments; Url::path_segments_mut percent-encodes
// them, which the backend expects for names like "Texas A&M".
fn request_url(segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ApiError> {
    let mut url = Url::parse(&api_base_url())
        .map_err(|err| ApiError::Unknown(format!("invalid api base url: {err}")))?;
    {
        let mut parts = url
            .path_segments_mut()
            .map_err(|_| ApiError::Unknown("api base url cannot be a base".to_string()))?;
        for segment in segments {
            parts.push(segment);
        }
    }
    for (key, value) in query {
        url.query_pairs_mut().append_pair(key, value);
    }
    Ok(url)
}

fn get_body(url: Url, not_found: impl FnOnce() -> String) -> Result<String, ApiError> {
    let client = http_client().map_err(|err| ApiError::Unknown(err.to_string()))?;
    let response = client.get(url).send().map_err(|err| {
        if err.is_connect() || err.is_timeout() {
            ApiError::Unreachable(err.to_string())
        } else {
            ApiError::Unknown(err.to_string())
        }
    })?;
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(not_found()));
    }
    if status.is_server_error() {
        return Err(ApiError::Unreachable(format!("backend returned {status}")));
    }
    if !status.is_success() {
        return Err(ApiError::Unknown(format!("backend returned {status}")));
    }
    response
        .text()
        .map_err(|err| ApiError::Unknown(err.to_string()))
}
