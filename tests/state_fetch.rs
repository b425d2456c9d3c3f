use madness_terminal::api_fetch::{ApiError, TournamentPrediction};
use madness_terminal::state::{
    AppState, BackendStatus, DEFAULT_YEAR, Delta, FetchState, FetchView, SUPPORTED_YEARS, Screen,
    apply_delta,
};
use madness_terminal::team_search::FALLBACK_TEAMS;

fn prediction(team: &str) -> TournamentPrediction {
    TournamentPrediction {
        team: team.to_string(),
        year: DEFAULT_YEAR,
        tournament_probability: 0.5,
        efficiency_score: 10.0,
        prediction_confidence: "Medium".to_string(),
        key_factors: Vec::new(),
        current_record: "20-10".to_string(),
    }
}

#[test]
fn stale_response_is_dropped() {
    let mut view: FetchView<TournamentPrediction> = FetchView::new();
    let first = view.begin();
    let second = view.begin();

    // The reply for the superseded request arrives late.
    assert!(!view.resolve(first, Ok(prediction("Duke"))));
    assert!(view.is_loading());

    assert!(view.resolve(second, Ok(prediction("Houston"))));
    assert_eq!(view.data().map(|p| p.team.as_str()), Some("Houston"));
}

#[test]
fn stale_error_cannot_clobber_fresh_data() {
    let mut view: FetchView<TournamentPrediction> = FetchView::new();
    let first = view.begin();
    let second = view.begin();

    assert!(view.resolve(second, Ok(prediction("Houston"))));
    assert!(!view.resolve(
        first,
        Err(ApiError::Unreachable("connection refused".to_string()))
    ));
    assert_eq!(view.data().map(|p| p.team.as_str()), Some("Houston"));
    assert!(view.error().is_none());
}

#[test]
fn local_failure_supersedes_inflight_request() {
    let mut view: FetchView<TournamentPrediction> = FetchView::new();
    let generation = view.begin();
    view.fail_local("Please enter a team name");

    assert!(!view.resolve(generation, Ok(prediction("Duke"))));
    assert_eq!(view.error(), Some("Please enter a team name"));
}

#[test]
fn resolve_records_fetch_time() {
    let mut view: FetchView<TournamentPrediction> = FetchView::new();
    let generation = view.begin();
    assert!(view.fetched_at().is_none());
    assert!(view.resolve(generation, Ok(prediction("Duke"))));
    assert!(view.fetched_at().is_some());
}

#[test]
fn stale_delta_is_dropped_by_apply() {
    let mut state = AppState::new();
    let first = state.prediction.begin();
    let second = state.prediction.begin();

    apply_delta(
        &mut state,
        Delta::SetPrediction {
            generation: first,
            result: Ok(prediction("Duke")),
        },
    );
    assert!(state.prediction.is_loading());

    apply_delta(
        &mut state,
        Delta::SetPrediction {
            generation: second,
            result: Err(ApiError::NotFound("Team 'Dke' not found".to_string())),
        },
    );
    assert_eq!(state.prediction.error(), Some("Team 'Dke' not found"));
}

#[test]
fn view_failures_do_not_touch_siblings() {
    let mut state = AppState::new();
    let bubble_gen = state.bubble_teams.begin();
    apply_delta(
        &mut state,
        Delta::SetBubbleTeams {
            generation: bubble_gen,
            result: Ok(Vec::new()),
        },
    );

    let prediction_gen = state.prediction.begin();
    apply_delta(
        &mut state,
        Delta::SetPrediction {
            generation: prediction_gen,
            result: Err(ApiError::Unreachable("timed out".to_string())),
        },
    );

    assert!(state.prediction.error().is_some());
    assert!(state.bubble_teams.data().is_some());
}

#[test]
fn backend_probe_updates_status_and_log() {
    let mut state = AppState::new();
    assert_eq!(state.backend, BackendStatus::Probing);

    apply_delta(&mut state, Delta::BackendProbe(Ok(())));
    assert_eq!(state.backend, BackendStatus::Connected);

    apply_delta(
        &mut state,
        Delta::BackendProbe(Err(ApiError::Unreachable("refused".to_string()))),
    );
    assert_eq!(state.backend, BackendStatus::Down);
    assert!(state.logs.iter().any(|line| line.contains("probe failed")));
}

#[test]
fn catalog_failure_substitutes_fallback() {
    let mut state = AppState::new();
    let generation = state.catalog.begin();
    apply_delta(
        &mut state,
        Delta::SetCatalog {
            generation,
            result: Err(ApiError::Unreachable("refused".to_string())),
        },
    );

    assert!(state.catalog_is_fallback);
    assert_eq!(state.catalog_teams().len(), FALLBACK_TEAMS.len());
    assert!(state.logs.iter().any(|line| line.contains("[WARN]")));
}

#[test]
fn catalog_success_clears_fallback_flag() {
    let mut state = AppState::new();
    let generation = state.catalog.begin();
    apply_delta(
        &mut state,
        Delta::SetCatalog {
            generation,
            result: Err(ApiError::Unreachable("refused".to_string())),
        },
    );
    assert!(state.catalog_is_fallback);

    let generation = state.catalog.begin();
    apply_delta(
        &mut state,
        Delta::SetCatalog {
            generation,
            result: Ok(vec!["Duke".to_string()]),
        },
    );
    assert!(!state.catalog_is_fallback);
    assert_eq!(state.catalog_teams(), ["Duke".to_string()]);
}

#[test]
fn top_teams_apply_resets_selection() {
    let mut state = AppState::new();
    state.top_teams_selected = 7;
    let generation = state.top_teams.begin();
    apply_delta(
        &mut state,
        Delta::SetTopTeams {
            generation,
            result: Ok(Vec::new()),
        },
    );
    assert_eq!(state.top_teams_selected, 0);
}

#[test]
fn year_cycles_through_supported_seasons() {
    let mut state = AppState::new();
    state.screen = Screen::Predict;
    assert_eq!(state.current_year(), DEFAULT_YEAR);

    let mut seen = vec![state.current_year()];
    for _ in 0..SUPPORTED_YEARS.len() {
        seen.push(state.cycle_year());
    }
    // Wraps back to the starting year after a full lap.
    assert_eq!(seen.first(), seen.last());
    for year in &seen {
        assert!(SUPPORTED_YEARS.contains(year));
    }
    // Skips 2020 entirely.
    assert!(!seen.contains(&2020));
}

#[test]
fn year_is_tracked_per_screen() {
    let mut state = AppState::new();
    state.screen = Screen::Bubble;
    state.cycle_year();
    assert_ne!(state.bubble_year, DEFAULT_YEAR);

    state.screen = Screen::Predict;
    assert_eq!(state.current_year(), DEFAULT_YEAR);
}

#[test]
fn log_buffer_is_capped() {
    let mut state = AppState::new();
    for i in 0..500 {
        state.push_log(format!("[INFO] line {i}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] line 499"));
}

#[test]
fn idle_view_exposes_nothing() {
    let view: FetchView<TournamentPrediction> = FetchView::new();
    assert!(matches!(view.state, FetchState::Idle));
    assert!(view.data().is_none());
    assert!(view.error().is_none());
    assert!(!view.is_loading());
}
