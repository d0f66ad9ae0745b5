mod common;

use std::time::{Duration, Instant};

use common::{FakeApi, fixture, standing};
use pitchside::api_football::{ApiFootballClient, FixtureScope};
use pitchside::config::{ApiConfig, parse_league_ids};
use pitchside::error::InsightsError;
use pitchside::insights::RECENT_FIXTURES;
use pitchside::logging::parse_level;
use pitchside::model::Filter;
use pitchside::query_cache::QueryCache;
use pitchside::service::{InsightsService, RetryPolicy};
use tracing::Level;

const ZENIT: u32 = 596;

fn api() -> FakeApi {
    FakeApi::default()
        .with_team("Zenit", ZENIT, "Zenit Saint Petersburg")
        .with_seasons(ZENIT, &[2023])
        .with_fixtures(
            ZENIT,
            FixtureScope::Season(2023),
            vec![fixture(30, "2023-07-21T16:30:00+00:00", ZENIT, 3, Some(2), Some(1))],
        )
        .with_fixtures(
            ZENIT,
            FixtureScope::Last(RECENT_FIXTURES),
            vec![fixture(99, "2024-05-01T18:00:00+00:00", ZENIT, 6, Some(1), Some(0))],
        )
        .with_standings(39, 2024, Ok(vec![standing(39, 1, 40, 84, 45)]))
}

fn service(api: FakeApi) -> InsightsService<FakeApi> {
    let cfg = ApiConfig {
        fetch_parallelism: 1,
        ..ApiConfig::default()
    };
    InsightsService::new(api, &cfg).with_retry(
        RetryPolicy::new(3, Duration::ZERO),
        RetryPolicy::new(2, Duration::ZERO),
    )
}

#[test]
fn repeated_query_is_served_from_cache() {
    let svc = service(api());
    let first = svc.team_insights("Zenit", Filter::recent()).expect("first");
    let second = svc.team_insights("  Zenit ", Filter::recent()).expect("second");
    assert_eq!(first, second);
    assert_eq!(svc.api().count_calls("search:"), 1);
}

#[test]
fn cache_is_keyed_by_filter() {
    let svc = service(api());
    let recent = svc.team_insights("Zenit", Filter::recent()).expect("recent");
    let season = svc
        .team_insights("Zenit", Filter::season(Some(2023)))
        .expect("season");
    assert_eq!(recent.fixtures[0].id, 99);
    assert_eq!(season.fixtures[0].id, 30);
    assert_eq!(svc.api().count_calls("search:"), 2);
}

#[test]
fn transient_failures_are_retried() {
    let api = api()
        .fail_next(InsightsError::Network("reset".to_string()))
        .fail_next(InsightsError::upstream(Some(503), "unavailable"));
    let svc = service(api);
    let insights = svc.team_insights("Zenit", Filter::recent()).expect("third attempt succeeds");
    assert_eq!(insights.team.id, ZENIT);
    assert_eq!(svc.api().count_calls("search:"), 3);
}

#[test]
fn retries_are_bounded() {
    let api = api()
        .fail_next(InsightsError::Network("1".to_string()))
        .fail_next(InsightsError::Network("2".to_string()))
        .fail_next(InsightsError::Network("3".to_string()));
    let svc = service(api);
    let err = svc.team_insights("Zenit", Filter::recent()).expect_err("gives up");
    assert_eq!(err, InsightsError::Network("3".to_string()));
    assert_eq!(svc.api().count_calls("search:"), 3);
}

#[test]
fn team_not_found_is_never_retried_or_cached() {
    let svc = service(api());
    let err = svc
        .team_insights("Unknown FC XYZ", Filter::recent())
        .expect_err("unknown team");
    assert!(matches!(err, InsightsError::TeamNotFound { .. }));
    assert_eq!(svc.api().count_calls("search:"), 1);

    svc.team_insights("Unknown FC XYZ", Filter::recent())
        .expect_err("still unknown");
    assert_eq!(svc.api().count_calls("search:"), 2);
}

#[test]
fn top_teams_retry_once_then_cache() {
    let api = api().fail_next(InsightsError::Network("reset".to_string()));
    let svc = service(api);
    // Single league: the failed attempt leaves nothing, so the error bubbles
    // to the retry layer.
    let first = svc.top_teams(&[39], Some(2024), 6).expect("retried");
    let second = svc.top_teams(&[39], Some(2024), 6).expect("cached");
    assert_eq!(first, second);
    assert_eq!(svc.api().count_calls("standings:"), 2);

    svc.top_teams(&[39], Some(2024), 3).expect("different limit");
    assert_eq!(svc.api().count_calls("standings:"), 3);
}

#[test]
fn cache_entries_expire() {
    let cache: QueryCache<String, u32> = QueryCache::new(Duration::from_secs(300));
    let start = Instant::now();
    cache.insert_at("zenit".to_string(), 1, start);
    assert_eq!(cache.get_at(&"zenit".to_string(), start + Duration::from_secs(299)), Some(1));
    assert_eq!(cache.get_at(&"zenit".to_string(), start + Duration::from_secs(300)), None);
    assert!(cache.is_empty());
}

#[test]
fn zero_ttl_disables_cache() {
    let cache: QueryCache<u32, u32> = QueryCache::new(Duration::ZERO);
    cache.insert(1, 1);
    assert_eq!(cache.get(&1), None);
}

#[test]
fn missing_key_is_a_configuration_error() {
    let cfg = ApiConfig::default();
    let err = ApiFootballClient::new(&cfg).err().expect("no key configured");
    assert!(matches!(err, InsightsError::Configuration(_)));
    assert!(!err.is_retryable());
}

#[test]
fn league_ids_parse_loosely() {
    assert_eq!(parse_league_ids("39, 140;78 x 39"), vec![39, 140, 78]);
    assert!(parse_league_ids("").is_empty());
}

#[test]
fn restricted_season_does_not_trigger_retries() {
    let api = api()
        .with_seasons(ZENIT, &[2018, 2023])
        .with_fixture_failure(
            ZENIT,
            FixtureScope::Season(2018),
            InsightsError::upstream(None, "plan: Free plans do not have access to this season"),
        );
    let svc = service(api);
    let insights = svc.team_insights("Zenit", Filter::all()).expect("resolves");
    assert_eq!(insights.available_seasons, vec![2023]);
    assert_eq!(svc.api().count_calls("search:"), 1);
}

#[test]
fn log_levels_parse_case_insensitively() {
    assert_eq!(parse_level(" DEBUG "), Some(Level::DEBUG));
    assert_eq!(parse_level("warn"), Some(Level::WARN));
    assert_eq!(parse_level("Warning"), Some(Level::WARN));
    assert_eq!(parse_level("loud"), None);
}
