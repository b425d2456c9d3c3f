use std::env;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::api_fetch;
use crate::state::{AlertsBundle, Delta, ProviderCommand};

/// Spawns the fetch worker: commands in, deltas out. Each command runs as an
/// independent job so a slow request never blocks the next one; staleness is
/// handled on the UI side by generation matching, not by cancelling here.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let pool = build_fetch_pool();

        for cmd in cmd_rx.iter() {
            let tx = tx.clone();
            let job: Box<dyn FnOnce() + Send> = match cmd {
                ProviderCommand::ProbeHealth => Box::new(move || {
                    let _ = tx.send(Delta::BackendProbe(api_fetch::fetch_health()));
                }),
                ProviderCommand::FetchPrediction {
                    generation,
                    team,
                    year,
                } => Box::new(move || {
                    let result = api_fetch::fetch_prediction(&team, year);
                    let _ = tx.send(Delta::SetPrediction { generation, result });
                }),
                ProviderCommand::FetchComparison {
                    generation,
                    team1,
                    team2,
                    year,
                } => Box::new(move || {
                    let result = api_fetch::fetch_comparison(&team1, &team2, year);
                    let _ = tx.send(Delta::SetComparison { generation, result });
                }),
                ProviderCommand::FetchProfile {
                    generation,
                    team,
                    year,
                } => Box::new(move || {
                    let result = api_fetch::fetch_team_profile(&team, year);
                    let _ = tx.send(Delta::SetProfile { generation, result });
                }),
                ProviderCommand::FetchBubbleTeams { generation, year } => Box::new(move || {
                    let result = api_fetch::fetch_bubble_teams(year);
                    let _ = tx.send(Delta::SetBubbleTeams { generation, result });
                }),
                ProviderCommand::FetchAlerts { generation, year } => Box::new(move || {
                    let result = fetch_alerts_bundle(year);
                    let _ = tx.send(Delta::SetAlerts { generation, result });
                }),
                ProviderCommand::FetchTopTeams {
                    generation,
                    year,
                    limit,
                } => Box::new(move || {
                    let result = api_fetch::fetch_top_teams(year, limit);
                    let _ = tx.send(Delta::SetTopTeams { generation, result });
                }),
                ProviderCommand::FetchConferences { generation, year } => Box::new(move || {
                    let result = api_fetch::fetch_conferences(year);
                    let _ = tx.send(Delta::SetConferences { generation, result });
                }),
                ProviderCommand::FetchCatalog { generation } => Box::new(move || {
                    let result = api_fetch::fetch_team_catalog();
                    let _ = tx.send(Delta::SetCatalog { generation, result });
                }),
            };

            if let Some(pool) = pool.as_ref() {
                pool.spawn(job);
            } else {
                thread::spawn(job);
            }
        }
    });
}

/// The alerts view needs both halves; fetch them concurrently and collapse
/// either failure into a single error for the view.
fn fetch_alerts_bundle(year: u16) -> Result<AlertsBundle, api_fetch::ApiError> {
    let (upsets, cinderella) = rayon::join(
        || api_fetch::fetch_upset_alerts(year),
        || api_fetch::fetch_cinderella_candidates(year),
    );
    match (upsets, cinderella) {
        (Ok(upsets), Ok(cinderella)) => Ok(AlertsBundle { upsets, cinderella }),
        (Err(err), _) | (_, Err(err)) => Err(err),
    }
}

fn build_fetch_pool() -> Option<rayon::ThreadPool> {
    let threads = env::var("MM_FETCH_THREADS")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(4)
        .clamp(1, 16);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .ok()
}
