use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::api_football::{ApiFootballClient, FootballApi};
use crate::config::ApiConfig;
use crate::error::InsightsResult;
use crate::fetch_pool::FetchPool;
use crate::insights;
use crate::model::{Filter, StandingEntry, TeamInsights};
use crate::query_cache::QueryCache;
use crate::top_teams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub fn team_insights() -> Self {
        Self::new(3, Duration::from_millis(300))
    }

    pub fn top_teams() -> Self {
        Self::new(2, Duration::from_millis(300))
    }

    /// Re-runs `op` while it fails with a retryable error and attempts remain.
    pub fn run<T>(&self, label: &str, mut op: impl FnMut() -> InsightsResult<T>) -> InsightsResult<T> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    warn!(label, attempt, error = %err, "retrying");
                    if !self.delay.is_zero() {
                        thread::sleep(self.delay);
                    }
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InsightsKey {
    pub team_name: String,
    pub filter: Filter,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopTeamsKey {
    pub league_ids: Vec<u32>,
    pub season: i32,
    pub limit_per_league: usize,
}

/// Query layer in front of the resolver and the aggregator: caches results
/// per full input and applies the retry policy.
pub struct InsightsService<A> {
    api: A,
    pool: FetchPool,
    insights_cache: QueryCache<InsightsKey, TeamInsights>,
    top_teams_cache: QueryCache<TopTeamsKey, Vec<StandingEntry>>,
    insights_retry: RetryPolicy,
    top_teams_retry: RetryPolicy,
    default_leagues: Vec<u32>,
    default_limit: usize,
}

impl InsightsService<ApiFootballClient> {
    pub fn from_config(cfg: &ApiConfig) -> InsightsResult<Self> {
        let api = ApiFootballClient::new(cfg)?;
        Ok(Self::new(api, cfg))
    }
}

impl<A: FootballApi> InsightsService<A> {
    pub fn new(api: A, cfg: &ApiConfig) -> Self {
        Self {
            api,
            pool: FetchPool::new(cfg.fetch_parallelism),
            insights_cache: QueryCache::new(cfg.insights_ttl),
            top_teams_cache: QueryCache::new(cfg.top_teams_ttl),
            insights_retry: RetryPolicy::team_insights(),
            top_teams_retry: RetryPolicy::top_teams(),
            default_leagues: cfg.top_team_leagues.clone(),
            default_limit: cfg.top_teams_limit,
        }
    }

    pub fn with_retry(mut self, insights: RetryPolicy, top_teams: RetryPolicy) -> Self {
        self.insights_retry = insights;
        self.top_teams_retry = top_teams;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn team_insights(&self, team_name: &str, filter: Filter) -> InsightsResult<TeamInsights> {
        let key = InsightsKey {
            team_name: team_name.trim().to_string(),
            filter,
        };
        if let Some(hit) = self.insights_cache.get(&key) {
            return Ok(hit);
        }
        let result = self.insights_retry.run("team insights", || {
            insights::resolve(&self.api, &self.pool, &key.team_name, filter)
        })?;
        self.insights_cache.insert(key, result.clone());
        Ok(result)
    }

    pub fn top_teams(
        &self,
        league_ids: &[u32],
        season: Option<i32>,
        limit_per_league: usize,
    ) -> InsightsResult<Vec<StandingEntry>> {
        let key = TopTeamsKey {
            league_ids: league_ids.to_vec(),
            season: season.unwrap_or_else(top_teams::current_season),
            limit_per_league,
        };
        if let Some(hit) = self.top_teams_cache.get(&key) {
            return Ok(hit);
        }
        let result = self.top_teams_retry.run("top teams", || {
            top_teams::aggregate(
                &self.api,
                &self.pool,
                &key.league_ids,
                Some(key.season),
                key.limit_per_league,
            )
        })?;
        self.top_teams_cache.insert(key, result.clone());
        Ok(result)
    }

    /// Configured league set and limit for the current season.
    pub fn default_top_teams(&self) -> InsightsResult<Vec<StandingEntry>> {
        self.top_teams(&self.default_leagues, None, self.default_limit)
    }

    pub fn clear_cache(&self) {
        self.insights_cache.clear();
        self.top_teams_cache.clear();
    }
}
