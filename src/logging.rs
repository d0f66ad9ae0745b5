use std::env;
use std::io;

use tracing::Level;

/// Installs the stderr subscriber. Level comes from `LOG_LEVEL`, default warn.
pub fn init() {
    let level = env::var("LOG_LEVEL")
        .ok()
        .and_then(|raw| parse_level(&raw))
        .unwrap_or(Level::WARN);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

pub fn parse_level(raw: &str) -> Option<Level> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("warning") {
        return Some(Level::WARN);
    }
    raw.parse::<Level>().ok()
}
