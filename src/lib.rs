pub mod api_football;
pub mod config;
pub mod error;
pub mod fetch_pool;
pub mod http_client;
pub mod insights;
pub mod logging;
pub mod model;
pub mod query_cache;
pub mod record;
pub mod service;
pub mod top_teams;
pub mod translit;
