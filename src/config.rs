use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";
pub const DEFAULT_API_HOST: &str = "v3.football.api-sports.io";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FETCH_PARALLELISM: usize = 4;
const DEFAULT_INSIGHTS_CACHE_SECS: u64 = 5 * 60;
const DEFAULT_TOP_TEAMS_CACHE_SECS: u64 = 10 * 60;
const DEFAULT_TOP_TEAMS_LIMIT: usize = 6;

// Premier League, La Liga, Serie A, Bundesliga, Ligue 1.
pub const DEFAULT_TOP_TEAM_LEAGUES: &[u32] = &[39, 140, 135, 78, 61];

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub api_host: String,
    pub timeout: Duration,
    pub fetch_parallelism: usize,
    pub insights_ttl: Duration,
    pub top_teams_ttl: Duration,
    pub top_team_leagues: Vec<u32>,
    pub top_teams_limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            fetch_parallelism: DEFAULT_FETCH_PARALLELISM,
            insights_ttl: Duration::from_secs(DEFAULT_INSIGHTS_CACHE_SECS),
            top_teams_ttl: Duration::from_secs(DEFAULT_TOP_TEAMS_CACHE_SECS),
            top_team_leagues: DEFAULT_TOP_TEAM_LEAGUES.to_vec(),
            top_teams_limit: DEFAULT_TOP_TEAMS_LIMIT,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_key = opt_env("API_FOOTBALL_KEY").map(|s| s.trim().to_string());
        let base_url = opt_env("API_FOOTBALL_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);
        let api_host = opt_env("API_FOOTBALL_HOST")
            .map(|s| s.trim().to_string())
            .unwrap_or(defaults.api_host);
        let timeout_secs = env_parse("API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS).clamp(1, 120);
        let fetch_parallelism =
            env_parse("FETCH_PARALLELISM", DEFAULT_FETCH_PARALLELISM).clamp(1, 16);
        let insights_secs = env_parse("INSIGHTS_CACHE_SECS", DEFAULT_INSIGHTS_CACHE_SECS);
        let top_teams_secs = env_parse("TOP_TEAMS_CACHE_SECS", DEFAULT_TOP_TEAMS_CACHE_SECS);
        let top_team_leagues = opt_env("TOP_TEAMS_LEAGUES")
            .map(|raw| parse_league_ids(&raw))
            .filter(|ids| !ids.is_empty())
            .unwrap_or(defaults.top_team_leagues);
        let top_teams_limit = env_parse("TOP_TEAMS_LIMIT", DEFAULT_TOP_TEAMS_LIMIT).clamp(1, 30);

        Self {
            api_key,
            base_url,
            api_host,
            timeout: Duration::from_secs(timeout_secs),
            fetch_parallelism,
            insights_ttl: Duration::from_secs(insights_secs),
            top_teams_ttl: Duration::from_secs(top_teams_secs),
            top_team_leagues,
            top_teams_limit,
        }
    }
}

/// Accepts ids separated by commas, semicolons or whitespace; junk is dropped.
pub fn parse_league_ids(raw: &str) -> Vec<u32> {
    let mut out = Vec::new();
    for part in raw.split([',', ';', ' ', '\t', '\n']) {
        if let Ok(id) = part.trim().parse::<u32>()
            && !out.contains(&id)
        {
            out.push(id);
        }
    }
    out
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|val| {
        if val.trim().is_empty() {
            None
        } else {
            Some(val)
        }
    })
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    opt_env(key)
        .and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}
