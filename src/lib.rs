pub mod config;
pub mod feed;
pub mod football_data;
pub mod http_client;
pub mod league_data;
pub mod live;
pub mod logging;
pub mod matches_view;
pub mod replacements;
pub mod standings_view;
pub mod state;
