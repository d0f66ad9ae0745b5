use chrono::{DateTime, FixedOffset};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub code: Option<String>,
    pub country: String,
    pub founded: Option<u16>,
    pub national: bool,
    pub logo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Venue {
    pub name: Option<String>,
    pub city: Option<String>,
    pub capacity: Option<u32>,
    pub surface: Option<String>,
}

impl Venue {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.city.is_none() && self.capacity.is_none() && self.surface.is_none()
    }
}

/// One `/teams?search=` hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamProfile {
    pub team: Team,
    pub venue: Option<Venue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRef {
    pub id: u32,
    pub name: String,
    pub logo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueRef {
    pub id: u32,
    pub name: String,
    pub country: String,
    pub logo: Option<String>,
    pub season: i32,
    pub round: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureStatus {
    pub long: String,
    pub short: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fixture {
    pub id: u64,
    /// ISO-8601 kick-off as sent by the API, e.g. `2024-05-19T15:00:00+00:00`.
    pub date: String,
    pub league: LeagueRef,
    pub home_team: TeamRef,
    pub away_team: TeamRef,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub status: FixtureStatus,
    pub venue: Option<Venue>,
}

impl Fixture {
    pub fn kickoff(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.date.trim()).ok()
    }

    pub fn kickoff_ts(&self) -> Option<i64> {
        self.kickoff().map(|dt| dt.timestamp())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub struct Record {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl Record {
    pub fn matches(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Recent,
    Season,
    All,
}

impl FilterMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "recent" | "last" => Some(Self::Recent),
            "season" => Some(Self::Season),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Season => "season",
            Self::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub struct Filter {
    pub mode: FilterMode,
    pub season: Option<i32>,
}

impl Filter {
    pub fn recent() -> Self {
        Self::default()
    }

    pub fn season(season: Option<i32>) -> Self {
        Self {
            mode: FilterMode::Season,
            season,
        }
    }

    pub fn all() -> Self {
        Self {
            mode: FilterMode::All,
            season: None,
        }
    }
}

/// The filter that actually produced the fixture set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppliedFilter {
    pub mode: FilterMode,
    pub season: Option<i32>,
    pub matches_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamInsights {
    pub team: Team,
    pub venue: Option<Venue>,
    pub fixtures: Vec<Fixture>,
    pub record: Record,
    pub filters: AppliedFilter,
    pub available_seasons: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingEntry {
    pub rank: u32,
    pub team: TeamRef,
    pub points: i32,
    pub goals_diff: i32,
    pub form: Option<String>,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub league: LeagueRef,
}
