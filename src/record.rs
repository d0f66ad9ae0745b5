use std::cmp::Ordering;

use crate::model::{Fixture, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

/// Goals from the point of view of `team_id`. Unplayed sides count as 0.
pub fn attributed_goals(team_id: u32, fixture: &Fixture) -> (u32, u32) {
    let home = fixture.home_goals.unwrap_or(0);
    let away = fixture.away_goals.unwrap_or(0);
    if fixture.home_team.id == team_id {
        (home, away)
    } else {
        (away, home)
    }
}

pub fn classify(team_id: u32, fixture: &Fixture) -> Outcome {
    let (scored, conceded) = attributed_goals(team_id, fixture);
    match scored.cmp(&conceded) {
        Ordering::Greater => Outcome::Win,
        Ordering::Equal => Outcome::Draw,
        Ordering::Less => Outcome::Loss,
    }
}

pub fn derive_record(team_id: u32, fixtures: &[Fixture]) -> Record {
    fixtures.iter().fold(Record::default(), |mut acc, fixture| {
        let (scored, conceded) = attributed_goals(team_id, fixture);
        match classify(team_id, fixture) {
            Outcome::Win => acc.wins += 1,
            Outcome::Draw => acc.draws += 1,
            Outcome::Loss => acc.losses += 1,
        }
        acc.goals_for += scored;
        acc.goals_against += conceded;
        acc
    })
}
