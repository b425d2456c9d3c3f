use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// Base URL of the prediction backend, without a trailing slash.
pub fn api_base_url() -> String {
    let raw = env::var("MM_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
    raw.trim_end_matches('/').to_string()
}
