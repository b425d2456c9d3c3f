use madness_terminal::team_search::{
    FALLBACK_TEAMS, MAX_RESULTS, SearchOutcome, TeamSelector, fallback_catalog, filter_catalog,
};

#[test]
fn search_is_case_insensitive() {
    let catalog = fallback_catalog();
    let lower = filter_catalog(&catalog, "duke");
    let upper = filter_catalog(&catalog, "DUKE");
    assert_eq!(lower, upper);
    match lower {
        SearchOutcome::Matches { teams, truncated } => {
            assert_eq!(teams, vec!["Duke".to_string()]);
            assert!(!truncated);
        }
        SearchOutcome::NoMatches { .. } => panic!("Duke is in the fallback catalog"),
    }
}

#[test]
fn empty_query_matches_everything() {
    let catalog = fallback_catalog();
    match filter_catalog(&catalog, "") {
        SearchOutcome::Matches { teams, truncated } => {
            assert_eq!(teams.len(), FALLBACK_TEAMS.len());
            assert!(!truncated);
        }
        SearchOutcome::NoMatches { .. } => panic!("empty query must match the catalog"),
    }
}

#[test]
fn substring_matches_anywhere_in_the_name() {
    let catalog = fallback_catalog();
    match filter_catalog(&catalog, "state") {
        SearchOutcome::Matches { teams, .. } => {
            assert!(teams.contains(&"Michigan State".to_string()));
            assert!(teams.contains(&"Ohio State".to_string()));
            assert!(!teams.contains(&"Michigan".to_string()));
        }
        SearchOutcome::NoMatches { .. } => panic!("'state' must match several programs"),
    }
}

#[test]
fn results_are_truncated_at_the_bound() {
    let catalog: Vec<String> = (0..150).map(|i| format!("Team {i:03}")).collect();
    match filter_catalog(&catalog, "team") {
        SearchOutcome::Matches { teams, truncated } => {
            assert_eq!(teams.len(), MAX_RESULTS);
            assert!(truncated);
            assert_eq!(teams[0], "Team 000");
        }
        SearchOutcome::NoMatches { .. } => panic!("every entry matches"),
    }
}

#[test]
fn exactly_at_the_bound_is_not_truncated() {
    let catalog: Vec<String> = (0..MAX_RESULTS).map(|i| format!("Team {i:03}")).collect();
    match filter_catalog(&catalog, "team") {
        SearchOutcome::Matches { teams, truncated } => {
            assert_eq!(teams.len(), MAX_RESULTS);
            assert!(!truncated);
        }
        SearchOutcome::NoMatches { .. } => panic!("every entry matches"),
    }
}

#[test]
fn no_matches_echoes_the_query_verbatim() {
    let catalog = fallback_catalog();
    match filter_catalog(&catalog, "Zzz Tech") {
        SearchOutcome::NoMatches { query } => assert_eq!(query, "Zzz Tech"),
        SearchOutcome::Matches { .. } => panic!("no program is named Zzz Tech"),
    }
}

#[test]
fn fallback_catalog_is_sorted_and_unique() {
    assert_eq!(FALLBACK_TEAMS.len(), 70);
    for pair in FALLBACK_TEAMS.windows(2) {
        assert!(pair[0] < pair[1], "{} must sort before {}", pair[0], pair[1]);
    }
}

#[test]
fn focus_clears_the_filter_but_keeps_the_value() {
    let mut selector = TeamSelector::new();
    selector.commit("Duke");
    selector.focus();
    assert!(selector.open);
    assert_eq!(selector.search, "");
    assert_eq!(selector.value, "Duke");
    assert_eq!(selector.display_value(), "");
}

#[test]
fn typing_forwards_a_tentative_value() {
    let mut selector = TeamSelector::new();
    selector.focus();
    selector.input_char('d');
    selector.input_char('u');
    assert_eq!(selector.value, "du");
    assert_eq!(selector.display_value(), "du");
    selector.backspace();
    assert_eq!(selector.value, "d");
}

#[test]
fn commit_closes_and_sets_the_value() {
    let mut selector = TeamSelector::new();
    selector.focus();
    selector.input_char('d');
    selector.commit("Duke");
    assert!(!selector.open);
    assert_eq!(selector.value, "Duke");
    assert_eq!(selector.display_value(), "Duke");
    assert_eq!(selector.highlighted, 0);
}

#[test]
fn dismiss_closes_without_reverting_the_value() {
    let mut selector = TeamSelector::new();
    selector.commit("Duke");
    selector.focus();
    selector.input_char('x');
    selector.dismiss();
    assert!(!selector.open);
    // Typing already forwarded "x" as the tentative value; dismiss only
    // closes the panel, it does not roll that back.
    assert_eq!(selector.value, "x");
    assert_eq!(selector.display_value(), "x");
}

#[test]
fn highlight_moves_within_result_bounds() {
    let mut selector = TeamSelector::new();
    selector.focus();
    selector.highlight_next(3);
    selector.highlight_next(3);
    selector.highlight_next(3);
    assert_eq!(selector.highlighted, 2);
    selector.highlight_prev();
    assert_eq!(selector.highlighted, 1);
    selector.highlight_prev();
    selector.highlight_prev();
    assert_eq!(selector.highlighted, 0);
    selector.highlight_next(0);
    assert_eq!(selector.highlighted, 0);
}
