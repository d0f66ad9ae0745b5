use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{InsightsError, InsightsResult};
use crate::http_client::http_client;
use crate::model::{
    Fixture, FixtureStatus, LeagueRef, StandingEntry, Team, TeamProfile, TeamRef, Venue,
};

const KEY_HEADER: &str = "x-apisports-key";
const HOST_HEADER: &str = "x-apisports-host";
const ERROR_SNIPPET_CHARS: usize = 220;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureScope {
    Season(i32),
    Last(u32),
}

/// Read-only view of the upstream football API.
pub trait FootballApi: Sync {
    fn search_teams(&self, query: &str) -> InsightsResult<Vec<TeamProfile>>;
    fn team_seasons(&self, team_id: u32) -> InsightsResult<Vec<i32>>;
    fn fixtures(&self, team_id: u32, scope: FixtureScope) -> InsightsResult<Vec<Fixture>>;
    /// Main table of `league_id` for `season`, in upstream rank order.
    fn standings(&self, league_id: u32, season: i32) -> InsightsResult<Vec<StandingEntry>>;
}

pub struct ApiFootballClient {
    client: &'static Client,
    base_url: String,
    api_key: String,
    api_host: String,
}

impl ApiFootballClient {
    pub fn new(cfg: &ApiConfig) -> InsightsResult<Self> {
        let Some(api_key) = cfg.api_key.clone().filter(|k| !k.trim().is_empty()) else {
            return Err(InsightsError::Configuration(
                "API_FOOTBALL_KEY is not set".to_string(),
            ));
        };
        Ok(Self {
            client: http_client(cfg.timeout)?,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key,
            api_host: cfg.api_host.clone(),
        })
    }

    fn get(&self, what: &str, path: &str, query: &[(&str, String)]) -> InsightsResult<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "api-football request");
        let resp = self
            .client
            .get(&url)
            .query(query)
            .header(KEY_HEADER, self.api_key.as_str())
            .header(HOST_HEADER, self.api_host.as_str())
            .send()
            .map_err(|err| InsightsError::Network(format!("{what}: {err}")))?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|err| InsightsError::Network(format!("{what}: failed reading body: {err}")))?;
        if !status.is_success() {
            let detail = error_message_from_body(&body).unwrap_or_else(|| {
                let snippet = body_snippet(&body);
                if snippet.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    snippet
                }
            });
            return Err(InsightsError::upstream(
                Some(status.as_u16()),
                format!("{what}: {detail}"),
            ));
        }
        Ok(body)
    }
}

impl FootballApi for ApiFootballClient {
    fn search_teams(&self, query: &str) -> InsightsResult<Vec<TeamProfile>> {
        let body = self.get(
            "failed to search for team",
            "/teams",
            &[("search", query.to_string())],
        )?;
        parse_team_search_json(&body)
    }

    fn team_seasons(&self, team_id: u32) -> InsightsResult<Vec<i32>> {
        let body = self.get(
            "failed to load seasons",
            "/teams/seasons",
            &[("team", team_id.to_string())],
        )?;
        parse_team_seasons_json(&body)
    }

    fn fixtures(&self, team_id: u32, scope: FixtureScope) -> InsightsResult<Vec<Fixture>> {
        let scope_param = match scope {
            FixtureScope::Season(season) => ("season", season.to_string()),
            FixtureScope::Last(n) => ("last", n.to_string()),
        };
        let body = self.get(
            "failed to load fixtures",
            "/fixtures",
            &[("team", team_id.to_string()), scope_param],
        )?;
        parse_fixtures_json(&body)
    }

    fn standings(&self, league_id: u32, season: i32) -> InsightsResult<Vec<StandingEntry>> {
        let body = self.get(
            "failed to load standings",
            "/standings",
            &[("league", league_id.to_string()), ("season", season.to_string())],
        )?;
        parse_standings_json(&body)
    }
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    response: Value,
    #[serde(default)]
    errors: Value,
}

/// Flattens the `errors` member, which the API sends as a string, an array
/// or an object of strings/arrays. Empty shapes mean "no error".
pub fn flatten_api_errors(errors: &Value) -> Option<String> {
    let mut parts = Vec::new();
    collect_error_parts(errors, None, &mut parts);
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

fn collect_error_parts(v: &Value, key: Option<&str>, out: &mut Vec<String>) {
    match v {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return;
            }
            match key {
                Some(k) => out.push(format!("{k}: {s}")),
                None => out.push(s.to_string()),
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_error_parts(item, key, out);
            }
        }
        Value::Object(map) => {
            for (k, item) in map {
                collect_error_parts(item, Some(k.as_str()), out);
            }
        }
        Value::Number(n) => match key {
            Some(k) => out.push(format!("{k}: {n}")),
            None => out.push(n.to_string()),
        },
        Value::Null | Value::Bool(_) => {}
    }
}

/// A rejected or missing key is reported under the `token` member.
fn is_credentials_error(errors: &Value) -> bool {
    errors
        .as_object()
        .is_some_and(|map| map.get("token").is_some_and(|v| flatten_api_errors(v).is_some()))
}

fn error_message_from_body(body: &str) -> Option<String> {
    let envelope: RawEnvelope = serde_json::from_str(body.trim()).ok()?;
    flatten_api_errors(&envelope.errors)
}

fn body_snippet(body: &str) -> String {
    body.trim()
        .replace(['\n', '\r'], " ")
        .chars()
        .take(ERROR_SNIPPET_CHARS)
        .collect()
}

fn parse_envelope<T: DeserializeOwned>(raw: &str) -> InsightsResult<Vec<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let envelope: RawEnvelope = serde_json::from_str(trimmed)?;
    if let Some(message) = flatten_api_errors(&envelope.errors) {
        if is_credentials_error(&envelope.errors) {
            return Err(InsightsError::Configuration(message));
        }
        return Err(InsightsError::upstream(None, message));
    }
    match envelope.response {
        Value::Null => Ok(Vec::new()),
        response => Ok(serde_json::from_value(response)?),
    }
}

#[derive(Debug, Deserialize)]
struct TeamSearchItem {
    team: WireTeam,
    venue: Option<WireVenue>,
}

#[derive(Debug, Deserialize)]
struct WireTeam {
    id: u32,
    name: String,
    code: Option<String>,
    country: Option<String>,
    founded: Option<u16>,
    #[serde(default)]
    national: bool,
    logo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireVenue {
    name: Option<String>,
    city: Option<String>,
    capacity: Option<u32>,
    surface: Option<String>,
}

impl From<WireVenue> for Venue {
    fn from(v: WireVenue) -> Self {
        Venue {
            name: v.name,
            city: v.city,
            capacity: v.capacity,
            surface: v.surface,
        }
    }
}

pub fn parse_team_search_json(raw: &str) -> InsightsResult<Vec<TeamProfile>> {
    let items: Vec<TeamSearchItem> = parse_envelope(raw)?;
    Ok(items
        .into_iter()
        .map(|item| TeamProfile {
            team: Team {
                id: item.team.id,
                name: item.team.name,
                code: item.team.code,
                country: item.team.country.unwrap_or_default(),
                founded: item.team.founded,
                national: item.team.national,
                logo: item.team.logo.unwrap_or_default(),
            },
            venue: item.venue.map(Venue::from).filter(|v| !v.is_empty()),
        })
        .collect())
}

pub fn parse_team_seasons_json(raw: &str) -> InsightsResult<Vec<i32>> {
    parse_envelope(raw)
}

#[derive(Debug, Deserialize)]
struct FixtureItem {
    fixture: WireFixtureInfo,
    league: WireLeague,
    teams: WireSides,
    goals: WireGoals,
}

#[derive(Debug, Deserialize)]
struct WireFixtureInfo {
    id: u64,
    date: String,
    venue: Option<WireFixtureVenue>,
    status: WireStatus,
}

#[derive(Debug, Deserialize)]
struct WireFixtureVenue {
    name: Option<String>,
    city: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireStatus {
    long: Option<String>,
    short: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireLeague {
    id: u32,
    name: String,
    country: Option<String>,
    logo: Option<String>,
    season: i32,
    round: Option<String>,
}

impl From<WireLeague> for LeagueRef {
    fn from(l: WireLeague) -> Self {
        LeagueRef {
            id: l.id,
            name: l.name,
            country: l.country.unwrap_or_default(),
            logo: l.logo,
            season: l.season,
            round: l.round,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireSides {
    home: WireSide,
    away: WireSide,
}

#[derive(Debug, Deserialize)]
struct WireSide {
    id: u32,
    name: String,
    logo: Option<String>,
}

impl From<WireSide> for TeamRef {
    fn from(s: WireSide) -> Self {
        TeamRef {
            id: s.id,
            name: s.name,
            logo: s.logo.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireGoals {
    home: Option<u32>,
    away: Option<u32>,
}

pub fn parse_fixtures_json(raw: &str) -> InsightsResult<Vec<Fixture>> {
    let items: Vec<FixtureItem> = parse_envelope(raw)?;
    Ok(items
        .into_iter()
        .map(|item| {
            let venue = item
                .fixture
                .venue
                .map(|v| Venue {
                    name: v.name,
                    city: v.city,
                    ..Venue::default()
                })
                .filter(|v| !v.is_empty());
            Fixture {
                id: item.fixture.id,
                date: item.fixture.date,
                league: item.league.into(),
                home_team: item.teams.home.into(),
                away_team: item.teams.away.into(),
                home_goals: item.goals.home,
                away_goals: item.goals.away,
                status: FixtureStatus {
                    long: item.fixture.status.long.unwrap_or_default(),
                    short: item.fixture.status.short.unwrap_or_default(),
                },
                venue,
            }
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct StandingsItem {
    league: WireStandingsLeague,
}

#[derive(Debug, Deserialize)]
struct WireStandingsLeague {
    id: u32,
    name: String,
    country: Option<String>,
    logo: Option<String>,
    season: i32,
    #[serde(default)]
    standings: Vec<Vec<WireStandingRow>>,
}

#[derive(Debug, Deserialize)]
struct WireStandingRow {
    rank: u32,
    team: WireSide,
    #[serde(default)]
    points: i32,
    #[serde(rename = "goalsDiff", default)]
    goals_diff: i32,
    form: Option<String>,
    all: Option<WireStandingSplit>,
}

#[derive(Debug, Deserialize, Default)]
struct WireStandingSplit {
    played: Option<u32>,
    win: Option<u32>,
    draw: Option<u32>,
    lose: Option<u32>,
    goals: Option<WireGoalTotals>,
}

#[derive(Debug, Deserialize, Default)]
struct WireGoalTotals {
    #[serde(rename = "for")]
    goals_for: Option<u32>,
    against: Option<u32>,
}

/// Rows of the first table of the first league in the payload. Group-stage
/// competitions return one table per group; only the first is used.
pub fn parse_standings_json(raw: &str) -> InsightsResult<Vec<StandingEntry>> {
    let items: Vec<StandingsItem> = parse_envelope(raw)?;
    let Some(item) = items
        .into_iter()
        .find(|item| item.league.standings.iter().any(|table| !table.is_empty()))
    else {
        return Ok(Vec::new());
    };
    let WireStandingsLeague {
        id,
        name,
        country,
        logo,
        season,
        standings,
    } = item.league;
    let league = LeagueRef {
        id,
        name,
        country: country.unwrap_or_default(),
        logo,
        season,
        round: None,
    };
    let Some(table) = standings.into_iter().find(|table| !table.is_empty()) else {
        return Ok(Vec::new());
    };

    Ok(table
        .into_iter()
        .map(|row| {
            let all = row.all.unwrap_or_default();
            let goals = all.goals.unwrap_or_default();
            StandingEntry {
                rank: row.rank,
                team: row.team.into(),
                points: row.points,
                goals_diff: row.goals_diff,
                form: row.form.map(|f| f.trim().to_string()).filter(|f| !f.is_empty()),
                played: all.played.unwrap_or(0),
                wins: all.win.unwrap_or(0),
                draws: all.draw.unwrap_or(0),
                losses: all.lose.unwrap_or(0),
                goals_for: goals.goals_for.unwrap_or(0),
                goals_against: goals.against.unwrap_or(0),
                league: league.clone(),
            }
        })
        .collect())
}
