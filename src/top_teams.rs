use std::cmp::Ordering;

use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, warn};

use crate::api_football::FootballApi;
use crate::error::{InsightsError, InsightsResult};
use crate::fetch_pool::FetchPool;
use crate::model::StandingEntry;

const FORM_WINDOW: usize = 5;

/// European seasons run July to June and are named after their first year.
pub fn season_for_date(date: NaiveDate) -> i32 {
    if date.month() >= 7 {
        date.year()
    } else {
        date.year() - 1
    }
}

pub fn current_season() -> i32 {
    season_for_date(Local::now().date_naive())
}

pub fn aggregate<A>(
    api: &A,
    pool: &FetchPool,
    league_ids: &[u32],
    season: Option<i32>,
    limit_per_league: usize,
) -> InsightsResult<Vec<StandingEntry>>
where
    A: FootballApi + ?Sized,
{
    let season = season.unwrap_or_else(current_season);
    let fetched = pool.map(league_ids, |league_id| api.standings(*league_id, season));

    let mut out = Vec::new();
    let mut first_err: Option<InsightsError> = None;
    let mut succeeded = 0usize;
    for (league_id, result) in league_ids.iter().zip(fetched) {
        match result {
            Ok(table) => {
                succeeded += 1;
                if table.is_empty() {
                    debug!(league_id, season, "no standings, skipping league");
                    continue;
                }
                out.extend(table.into_iter().take(limit_per_league));
            }
            Err(err @ InsightsError::Configuration(_)) => return Err(err),
            Err(err) => {
                warn!(league_id, season, error = %err, "standings unavailable, skipping league");
                first_err.get_or_insert(err);
            }
        }
    }

    if succeeded == 0
        && let Some(err) = first_err
    {
        return Err(err);
    }

    rank_entries(&mut out);
    Ok(out)
}

/// Points desc, goal difference desc, in-league rank asc. Stable, so
/// full ties keep league order.
pub fn rank_entries(entries: &mut [StandingEntry]) {
    entries.sort_by(compare_entries);
}

fn compare_entries(a: &StandingEntry, b: &StandingEntry) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goals_diff.cmp(&a.goals_diff))
        .then_with(|| a.rank.cmp(&b.rank))
}

/// Case-insensitive match against "team league country".
pub fn filter_entries<'a>(entries: &'a [StandingEntry], query: &str) -> Vec<&'a StandingEntry> {
    let needle = query.trim().to_lowercase();
    entries
        .iter()
        .filter(|e| {
            if needle.is_empty() {
                return true;
            }
            let haystack = format!("{} {} {}", e.team.name, e.league.name, e.league.country);
            haystack.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn format_form(form: Option<&str>) -> String {
    let letters: Vec<char> = form
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if letters.is_empty() {
        return "—".to_string();
    }
    let start = letters.len().saturating_sub(FORM_WINDOW);
    letters[start..]
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
