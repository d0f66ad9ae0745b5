use std::cmp::Reverse;

use tracing::{debug, info, warn};

use crate::api_football::{FixtureScope, FootballApi};
use crate::error::{InsightsError, InsightsResult};
use crate::fetch_pool::FetchPool;
use crate::model::{AppliedFilter, Filter, FilterMode, Fixture, TeamInsights, TeamProfile};
use crate::record::derive_record;
use crate::translit::{contains_cyrillic, transliterate};

pub const RECENT_FIXTURES: u32 = 10;

/// Fixtures of one season that produced at least one match.
#[derive(Debug, Clone)]
pub struct SeasonFixtures {
    pub season: i32,
    pub fixtures: Vec<Fixture>,
}

pub fn resolve<A>(
    api: &A,
    pool: &FetchPool,
    team_name: &str,
    filter: Filter,
) -> InsightsResult<TeamInsights>
where
    A: FootballApi + ?Sized,
{
    let query = team_name.trim();
    if query.is_empty() {
        return Err(InsightsError::EmptyQuery);
    }

    let profile = find_team(api, query)?;
    let team_id = profile.team.id;
    info!(team_id, team = %profile.team.name, "matched team");

    let seasons = discover_seasons(api, pool, team_id)?;
    let (fixtures, applied_season) = select_fixtures(api, team_id, filter, &seasons)?;
    let record = derive_record(team_id, &fixtures);

    Ok(TeamInsights {
        team: profile.team,
        venue: profile.venue,
        filters: AppliedFilter {
            mode: filter.mode,
            season: applied_season,
            matches_count: fixtures.len(),
        },
        record,
        fixtures,
        available_seasons: seasons.iter().map(|s| s.season).collect(),
    })
}

/// First upstream hit wins. A Cyrillic query with no hits is retried once
/// in Latin transliteration.
pub fn find_team<A>(api: &A, query: &str) -> InsightsResult<TeamProfile>
where
    A: FootballApi + ?Sized,
{
    let mut hits = api.search_teams(query)?;
    if hits.is_empty() && contains_cyrillic(query) {
        let latin = transliterate(query);
        info!(query, latin = %latin, "no hits, retrying transliterated");
        hits = api.search_teams(&latin)?;
    }
    hits.into_iter().next().ok_or_else(|| InsightsError::TeamNotFound {
        query: query.to_string(),
    })
}

/// Newest season first. Seasons without fixtures, or whose fetch fails
/// (e.g. outside the key's plan), are dropped; only a configuration error
/// aborts.
pub fn discover_seasons<A>(
    api: &A,
    pool: &FetchPool,
    team_id: u32,
) -> InsightsResult<Vec<SeasonFixtures>>
where
    A: FootballApi + ?Sized,
{
    let mut seasons = api.team_seasons(team_id)?;
    seasons.sort_unstable_by(|a, b| b.cmp(a));
    seasons.dedup();

    let fetched = pool.map(&seasons, |season| {
        api.fixtures(team_id, FixtureScope::Season(*season))
    });

    let mut out = Vec::with_capacity(seasons.len());
    for (season, fixtures) in seasons.into_iter().zip(fetched) {
        let fixtures = match fixtures {
            Ok(fixtures) => fixtures,
            Err(err @ InsightsError::Configuration(_)) => return Err(err),
            Err(err) => {
                warn!(team_id, season, error = %err, "season fixtures unavailable, skipping");
                continue;
            }
        };
        if fixtures.is_empty() {
            debug!(team_id, season, "season has no fixtures");
            continue;
        }
        out.push(SeasonFixtures { season, fixtures });
    }
    Ok(out)
}

fn select_fixtures<A>(
    api: &A,
    team_id: u32,
    filter: Filter,
    seasons: &[SeasonFixtures],
) -> InsightsResult<(Vec<Fixture>, Option<i32>)>
where
    A: FootballApi + ?Sized,
{
    let recent = || api.fixtures(team_id, FixtureScope::Last(RECENT_FIXTURES));

    match filter.mode {
        FilterMode::Recent => Ok((recent()?, None)),
        FilterMode::Season => {
            let Some(chosen) = pick_season(filter.season, seasons) else {
                return Ok((recent()?, None));
            };
            if let Some(requested) = filter.season
                && requested != chosen.season
            {
                info!(requested, applied = chosen.season, "season unavailable, using latest");
            }
            Ok((chosen.fixtures.clone(), Some(chosen.season)))
        }
        FilterMode::All => {
            if seasons.is_empty() {
                return Ok((recent()?, None));
            }
            let mut fixtures: Vec<Fixture> = seasons
                .iter()
                .flat_map(|s| s.fixtures.iter().cloned())
                .collect();
            sort_by_date_desc(&mut fixtures);
            Ok((fixtures, None))
        }
    }
}

/// Requested season when it has fixtures, otherwise the newest one.
pub fn pick_season(requested: Option<i32>, seasons: &[SeasonFixtures]) -> Option<&SeasonFixtures> {
    requested
        .and_then(|want| seasons.iter().find(|s| s.season == want))
        .or_else(|| seasons.first())
}

/// Unparseable dates sink to the end.
pub fn sort_by_date_desc(fixtures: &mut [Fixture]) {
    fixtures.sort_by_cached_key(|f| Reverse(f.kickoff_ts()));
}
