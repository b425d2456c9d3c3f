use std::collections::VecDeque;
use std::time::SystemTime;

use crate::api_fetch::{
    ApiError, BubbleTeam, CinderellaCandidate, ConferenceStats, TeamComparison, TeamProfile,
    TopTeam, TournamentPrediction, UpsetAlert,
};
use crate::team_search::{TeamSelector, fallback_catalog};

/// Seasons the backend has data for. 2020 is absent (cancelled tournament).
pub const SUPPORTED_YEARS: [u16; 6] = [2019, 2021, 2022, 2023, 2024, 2025];
pub const DEFAULT_YEAR: u16 = 2025;

pub const TOP_TEAMS_LIMIT: u16 = 25;
const LOG_CAP: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Overview,
    Predict,
    Compare,
    Bubble,
    Alerts,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertsTab {
    Upsets,
    Cinderella,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Probing,
    Connected,
    Down,
}

/// Which input has keyboard focus on the Compare screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareFocus {
    Team1,
    Team2,
}

#[derive(Debug, Clone)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Ready { data: T, fetched_at: SystemTime },
    Failed(String),
}

/// Per-view fetch lifecycle with a request-generation counter. Every issued
/// request captures the generation current at send time; a response whose
/// generation no longer matches is stale and must not be applied.
#[derive(Debug, Clone)]
pub struct FetchView<T> {
    generation: u64,
    pub state: FetchState<T>,
}

impl<T> Default for FetchView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FetchView<T> {
    pub fn new() -> Self {
        Self {
            generation: 0,
            state: FetchState::Idle,
        }
    }

    /// Starts a new fetch: supersedes any in-flight request and returns the
    /// generation the outgoing command must carry.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.state = FetchState::Loading;
        self.generation
    }

    /// Local validation failure. Bumps the generation so an in-flight reply
    /// for the previous parameters cannot overwrite the message.
    pub fn fail_local(&mut self, message: impl Into<String>) {
        self.generation += 1;
        self.state = FetchState::Failed(message.into());
    }

    /// Applies a fetch result if it is still current. Returns false when the
    /// response was stale and dropped.
    pub fn resolve(&mut self, generation: u64, result: Result<T, ApiError>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.state = match result {
            Ok(data) => FetchState::Ready {
                data,
                fetched_at: SystemTime::now(),
            },
            Err(err) => FetchState::Failed(err.to_string()),
        };
        true
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            FetchState::Ready { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading)
    }

    pub fn fetched_at(&self) -> Option<SystemTime> {
        match &self.state {
            FetchState::Ready { fetched_at, .. } => Some(*fetched_at),
            _ => None,
        }
    }
}

/// Upset alerts and Cinderella candidates are fetched as a pair and only
/// usable together.
#[derive(Debug, Clone)]
pub struct AlertsBundle {
    pub upsets: Vec<UpsetAlert>,
    pub cinderella: Vec<CinderellaCandidate>,
}

#[derive(Debug, Clone)]
pub enum Delta {
    BackendProbe(Result<(), ApiError>),
    SetPrediction {
        generation: u64,
        result: Result<TournamentPrediction, ApiError>,
    },
    SetComparison {
        generation: u64,
        result: Result<TeamComparison, ApiError>,
    },
    SetProfile {
        generation: u64,
        result: Result<TeamProfile, ApiError>,
    },
    SetBubbleTeams {
        generation: u64,
        result: Result<Vec<BubbleTeam>, ApiError>,
    },
    SetAlerts {
        generation: u64,
        result: Result<AlertsBundle, ApiError>,
    },
    SetTopTeams {
        generation: u64,
        result: Result<Vec<TopTeam>, ApiError>,
    },
    SetConferences {
        generation: u64,
        result: Result<Vec<ConferenceStats>, ApiError>,
    },
    SetCatalog {
        generation: u64,
        result: Result<Vec<String>, ApiError>,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    ProbeHealth,
    FetchPrediction {
        generation: u64,
        team: String,
        year: u16,
    },
    FetchComparison {
        generation: u64,
        team1: String,
        team2: String,
        year: u16,
    },
    FetchProfile {
        generation: u64,
        team: String,
        year: u16,
    },
    FetchBubbleTeams {
        generation: u64,
        year: u16,
    },
    FetchAlerts {
        generation: u64,
        year: u16,
    },
    FetchTopTeams {
        generation: u64,
        year: u16,
        limit: u16,
    },
    FetchConferences {
        generation: u64,
        year: u16,
    },
    FetchCatalog {
        generation: u64,
    },
}

/// All view state. Each view owns its fetch state and year parameter; one
/// view failing never clears a sibling's data.
#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub backend: BackendStatus,

    pub overview_year: u16,
    pub top_teams: FetchView<Vec<TopTeam>>,
    pub top_teams_selected: usize,
    pub conferences: FetchView<Vec<ConferenceStats>>,

    pub predict_year: u16,
    pub predict_selector: TeamSelector,
    pub prediction: FetchView<TournamentPrediction>,

    pub compare_year: u16,
    pub compare_team1: TeamSelector,
    pub compare_team2: TeamSelector,
    pub compare_focus: CompareFocus,
    pub comparison: FetchView<TeamComparison>,

    pub bubble_year: u16,
    pub bubble_teams: FetchView<Vec<BubbleTeam>>,
    pub bubble_selected: usize,

    pub alerts_year: u16,
    pub alerts_tab: AlertsTab,
    pub alerts: FetchView<AlertsBundle>,
    pub alerts_selected: usize,

    pub profile_year: u16,
    pub profile_selector: TeamSelector,
    pub profile: FetchView<TeamProfile>,

    // Fetched once per session; on failure the fallback snapshot is swapped
    // in instead of surfacing an error.
    pub catalog: FetchView<Vec<String>>,
    pub catalog_is_fallback: bool,

    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Overview,
            backend: BackendStatus::Probing,
            overview_year: DEFAULT_YEAR,
            top_teams: FetchView::new(),
            top_teams_selected: 0,
            conferences: FetchView::new(),
            predict_year: DEFAULT_YEAR,
            predict_selector: TeamSelector::new(),
            prediction: FetchView::new(),
            compare_year: DEFAULT_YEAR,
            compare_team1: TeamSelector::new(),
            compare_team2: TeamSelector::new(),
            compare_focus: CompareFocus::Team1,
            comparison: FetchView::new(),
            bubble_year: DEFAULT_YEAR,
            bubble_teams: FetchView::new(),
            bubble_selected: 0,
            alerts_year: DEFAULT_YEAR,
            alerts_tab: AlertsTab::Upsets,
            alerts: FetchView::new(),
            alerts_selected: 0,
            profile_year: DEFAULT_YEAR,
            profile_selector: TeamSelector::new(),
            profile: FetchView::new(),
            catalog: FetchView::new(),
            catalog_is_fallback: false,
            logs: VecDeque::with_capacity(LOG_CAP),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.logs.len() == LOG_CAP {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }

    /// Year parameter of the active screen.
    pub fn current_year(&self) -> u16 {
        match self.screen {
            Screen::Overview => self.overview_year,
            Screen::Predict => self.predict_year,
            Screen::Compare => self.compare_year,
            Screen::Bubble => self.bubble_year,
            Screen::Alerts => self.alerts_year,
            Screen::Profile => self.profile_year,
        }
    }

    /// Advances the active screen's year through the supported season set.
    /// Returns the new year so the caller can re-issue the view's fetch.
    pub fn cycle_year(&mut self) -> u16 {
        let year = self.current_year();
        let idx = SUPPORTED_YEARS.iter().position(|y| *y == year).unwrap_or(0);
        let next = SUPPORTED_YEARS[(idx + 1) % SUPPORTED_YEARS.len()];
        match self.screen {
            Screen::Overview => self.overview_year = next,
            Screen::Predict => self.predict_year = next,
            Screen::Compare => self.compare_year = next,
            Screen::Bubble => self.bubble_year = next,
            Screen::Alerts => self.alerts_year = next,
            Screen::Profile => self.profile_year = next,
        }
        next
    }

    pub fn focused_compare_selector(&mut self) -> &mut TeamSelector {
        match self.compare_focus {
            CompareFocus::Team1 => &mut self.compare_team1,
            CompareFocus::Team2 => &mut self.compare_team2,
        }
    }

    /// The selector currently accepting keystrokes on the active screen.
    pub fn active_selector(&mut self) -> Option<&mut TeamSelector> {
        match self.screen {
            Screen::Predict => Some(&mut self.predict_selector),
            Screen::Compare => Some(self.focused_compare_selector()),
            Screen::Profile => Some(&mut self.profile_selector),
            _ => None,
        }
    }

    pub fn catalog_teams(&self) -> &[String] {
        self.catalog.data().map(Vec::as_slice).unwrap_or(&[])
    }
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Overview => "OVERVIEW",
        Screen::Predict => "PREDICT",
        Screen::Compare => "COMPARE",
        Screen::Bubble => "BUBBLE",
        Screen::Alerts => "ALERTS",
        Screen::Profile => "PROFILE",
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::BackendProbe(result) => match result {
            Ok(()) => {
                state.backend = BackendStatus::Connected;
                state.push_log("[INFO] Backend reachable");
            }
            Err(err) => {
                state.backend = BackendStatus::Down;
                state.push_log(format!("[WARN] Backend probe failed: {err}"));
            }
        },
        Delta::SetPrediction { generation, result } => {
            state.prediction.resolve(generation, result);
        }
        Delta::SetComparison { generation, result } => {
            state.comparison.resolve(generation, result);
        }
        Delta::SetProfile { generation, result } => {
            state.profile.resolve(generation, result);
        }
        Delta::SetBubbleTeams { generation, result } => {
            if state.bubble_teams.resolve(generation, result) {
                state.bubble_selected = 0;
            }
        }
        Delta::SetAlerts { generation, result } => {
            if state.alerts.resolve(generation, result) {
                state.alerts_selected = 0;
            }
        }
        Delta::SetTopTeams { generation, result } => {
            if state.top_teams.resolve(generation, result) {
                state.top_teams_selected = 0;
            }
        }
        Delta::SetConferences { generation, result } => {
            state.conferences.resolve(generation, result);
        }
        Delta::SetCatalog { generation, result } => match result {
            Ok(teams) => {
                state.catalog_is_fallback = false;
                state.catalog.resolve(generation, Ok(teams));
            }
            Err(err) => {
                // The selector must keep working offline: substitute the
                // static snapshot instead of failing the component.
                let applied = state.catalog.resolve(generation, Ok(fallback_catalog()));
                if applied {
                    state.catalog_is_fallback = true;
                    state.push_log(format!("[WARN] Team catalog fetch failed ({err}), using built-in list"));
                }
            }
        },
        Delta::Log(line) => state.push_log(line),
    }
}
