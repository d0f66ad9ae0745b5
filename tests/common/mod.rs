#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use pitchside::api_football::{FixtureScope, FootballApi};
use pitchside::error::{InsightsError, InsightsResult};
use pitchside::model::{
    Fixture, FixtureStatus, LeagueRef, StandingEntry, Team, TeamProfile, TeamRef,
};

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[derive(Default)]
pub struct FakeApi {
    pub teams: HashMap<String, Vec<TeamProfile>>,
    pub seasons: HashMap<u32, Vec<i32>>,
    pub fixtures: HashMap<(u32, FixtureScope), Vec<Fixture>>,
    pub standings: HashMap<(u32, i32), InsightsResult<Vec<StandingEntry>>>,
    pub fixture_failures: HashMap<(u32, FixtureScope), InsightsError>,
    /// Returned, in order, before any call is served.
    pub failures: Mutex<VecDeque<InsightsError>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn with_team(mut self, query: &str, id: u32, name: &str) -> Self {
        self.teams
            .entry(query.to_string())
            .or_default()
            .push(team_profile(id, name));
        self
    }

    pub fn with_seasons(mut self, team_id: u32, seasons: &[i32]) -> Self {
        self.seasons.insert(team_id, seasons.to_vec());
        self
    }

    pub fn with_fixtures(mut self, team_id: u32, scope: FixtureScope, fixtures: Vec<Fixture>) -> Self {
        self.fixtures.insert((team_id, scope), fixtures);
        self
    }

    pub fn with_fixture_failure(mut self, team_id: u32, scope: FixtureScope, err: InsightsError) -> Self {
        self.fixture_failures.insert((team_id, scope), err);
        self
    }

    pub fn with_standings(
        mut self,
        league_id: u32,
        season: i32,
        table: InsightsResult<Vec<StandingEntry>>,
    ) -> Self {
        self.standings.insert((league_id, season), table);
        self
    }

    pub fn fail_next(self, err: InsightsError) -> Self {
        self.failures.lock().unwrap().push_back(err);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) -> InsightsResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl FootballApi for FakeApi {
    fn search_teams(&self, query: &str) -> InsightsResult<Vec<TeamProfile>> {
        self.record(format!("search:{query}"))?;
        Ok(self.teams.get(query).cloned().unwrap_or_default())
    }

    fn team_seasons(&self, team_id: u32) -> InsightsResult<Vec<i32>> {
        self.record(format!("seasons:{team_id}"))?;
        Ok(self.seasons.get(&team_id).cloned().unwrap_or_default())
    }

    fn fixtures(&self, team_id: u32, scope: FixtureScope) -> InsightsResult<Vec<Fixture>> {
        let label = match scope {
            FixtureScope::Season(s) => format!("season={s}"),
            FixtureScope::Last(n) => format!("last={n}"),
        };
        self.record(format!("fixtures:{team_id}:{label}"))?;
        if let Some(err) = self.fixture_failures.get(&(team_id, scope)) {
            return Err(err.clone());
        }
        Ok(self
            .fixtures
            .get(&(team_id, scope))
            .cloned()
            .unwrap_or_default())
    }

    fn standings(&self, league_id: u32, season: i32) -> InsightsResult<Vec<StandingEntry>> {
        self.record(format!("standings:{league_id}:{season}"))?;
        self.standings
            .get(&(league_id, season))
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn team_profile(id: u32, name: &str) -> TeamProfile {
    TeamProfile {
        team: Team {
            id,
            name: name.to_string(),
            code: None,
            country: "Russia".to_string(),
            founded: Some(1925),
            national: false,
            logo: format!("https://media.example/teams/{id}.png"),
        },
        venue: None,
    }
}

pub fn team_ref(id: u32) -> TeamRef {
    TeamRef {
        id,
        name: format!("Team {id}"),
        logo: String::new(),
    }
}

pub fn league(id: u32, season: i32) -> LeagueRef {
    LeagueRef {
        id,
        name: format!("League {id}"),
        country: "Nowhere".to_string(),
        logo: None,
        season,
        round: None,
    }
}

pub fn fixture(
    id: u64,
    date: &str,
    home_id: u32,
    away_id: u32,
    home_goals: Option<u32>,
    away_goals: Option<u32>,
) -> Fixture {
    Fixture {
        id,
        date: date.to_string(),
        league: league(235, 2023),
        home_team: team_ref(home_id),
        away_team: team_ref(away_id),
        home_goals,
        away_goals,
        status: FixtureStatus {
            long: "Match Finished".to_string(),
            short: "FT".to_string(),
        },
        venue: None,
    }
}

pub fn standing(league_id: u32, rank: u32, team_id: u32, points: i32, goals_diff: i32) -> StandingEntry {
    StandingEntry {
        rank,
        team: team_ref(team_id),
        points,
        goals_diff,
        form: Some("WWDLW".to_string()),
        played: 10,
        wins: 0,
        draws: 0,
        losses: 0,
        goals_for: 0,
        goals_against: 0,
        league: league(league_id, 2024),
    }
}
