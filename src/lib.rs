pub mod api_fetch;
pub mod classify;
pub mod demo_feed;
pub mod http_client;
pub mod provider;
pub mod state;
pub mod team_search;
