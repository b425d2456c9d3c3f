//! Searchable team selection: a catalog fetched once per session, a static
//! fallback when the backend is unreachable, and bounded incremental
//! filtering over the current search text.

/// Result panels never show more than this many entries; a truncation notice
/// is rendered instead of the tail.
pub const MAX_RESULTS: usize = 100;

/// Snapshot of Division-I programs used when the catalog fetch fails. It will
/// drift from the live catalog over time; that is the intended degrade path.
pub const FALLBACK_TEAMS: [&str; 70] = [
    "Alabama", "Arizona", "Arizona State", "Arkansas", "Auburn",
    "BYU", "Baylor", "Boston College", "California", "Cincinnati",
    "Clemson", "Colorado", "Connecticut", "Creighton", "Duke",
    "Florida", "Florida State", "Georgetown", "Georgia", "Gonzaga",
    "Houston", "Illinois", "Indiana", "Iowa", "Iowa State",
    "Kansas", "Kansas State", "Kentucky", "LSU", "Louisville",
    "Marquette", "Maryland", "Memphis", "Miami", "Michigan",
    "Michigan State", "Minnesota", "Mississippi State", "Missouri", "Nebraska",
    "North Carolina", "Northwestern", "Notre Dame", "Ohio State", "Oklahoma",
    "Oklahoma State", "Oregon", "Penn State", "Pittsburgh", "Purdue",
    "Rutgers", "South Carolina", "Stanford", "Syracuse", "TCU",
    "Tennessee", "Texas", "Texas A&M", "Texas Tech", "UCLA",
    "USC", "Utah", "Vanderbilt", "Villanova", "Virginia",
    "Virginia Tech", "Wake Forest", "Washington", "West Virginia", "Wisconsin",
];

pub fn fallback_catalog() -> Vec<String> {
    FALLBACK_TEAMS.iter().map(|team| team.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Matches { teams: Vec<String>, truncated: bool },
    NoMatches { query: String },
}

/// Case-insensitive substring filter over the catalog, truncated to
/// [`MAX_RESULTS`]. An empty query matches the whole catalog.
pub fn filter_catalog(catalog: &[String], query: &str) -> SearchOutcome {
    let needle = query.to_lowercase();
    let mut teams = Vec::new();
    let mut truncated = false;
    for team in catalog {
        if !team.to_lowercase().contains(&needle) {
            continue;
        }
        if teams.len() == MAX_RESULTS {
            truncated = true;
            break;
        }
        teams.push(team.clone());
    }
    if teams.is_empty() {
        SearchOutcome::NoMatches {
            query: query.to_string(),
        }
    } else {
        SearchOutcome::Matches { teams, truncated }
    }
}

/// Controlled-value selector: `value` is what the owning view reads; while
/// the panel is open, typed text doubles as the filter and as a tentative
/// value forwarded on every keystroke.
#[derive(Debug, Clone, Default)]
pub struct TeamSelector {
    pub value: String,
    pub search: String,
    pub open: bool,
    pub highlighted: usize,
}

impl TeamSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the panel with a cleared filter, keeping the committed value.
    pub fn focus(&mut self) {
        self.open = true;
        self.search.clear();
        self.highlighted = 0;
    }

    pub fn input_char(&mut self, ch: char) {
        self.open = true;
        self.search.push(ch);
        self.value = self.search.clone();
        self.highlighted = 0;
    }

    pub fn backspace(&mut self) {
        if !self.open {
            self.open = true;
            self.search = self.value.clone();
        }
        self.search.pop();
        self.value = self.search.clone();
        self.highlighted = 0;
    }

    /// Commits an entry as the controlled value and closes the panel.
    pub fn commit(&mut self, team: &str) {
        self.value = team.to_string();
        self.search.clear();
        self.open = false;
        self.highlighted = 0;
    }

    /// Closes the panel without touching the committed value.
    pub fn dismiss(&mut self) {
        self.open = false;
        self.search.clear();
        self.highlighted = 0;
    }

    /// Text to render in the input box: the live filter while open, the
    /// committed value otherwise.
    pub fn display_value(&self) -> &str {
        if self.open { &self.search } else { &self.value }
    }

    pub fn highlight_next(&mut self, result_len: usize) {
        if result_len == 0 {
            self.highlighted = 0;
            return;
        }
        self.highlighted = (self.highlighted + 1).min(result_len - 1);
    }

    pub fn highlight_prev(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }
}
