use anyhow::{Context, Result, anyhow};

use pitchside::api_football::FootballApi;
use pitchside::config::{ApiConfig, parse_league_ids};
use pitchside::logging;
use pitchside::model::{Filter, FilterMode, StandingEntry, TeamInsights};
use pitchside::record::{Outcome, attributed_goals, classify};
use pitchside::service::InsightsService;
use pitchside::top_teams::{filter_entries, format_form};

const USAGE: &str = "usage:
  pitchside team <name> [--mode recent|season|all] [--season YEAR] [--json]
  pitchside top [--leagues 39,140,...] [--season YEAR] [--limit N] [--filter TEXT] [--json]";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let Some((command, rest)) = args.split_first() else {
        println!("{USAGE}");
        return Ok(());
    };

    if matches!(command.as_str(), "help" | "--help" | "-h") {
        println!("{USAGE}");
        return Ok(());
    }

    let cfg = ApiConfig::from_env();
    let service = InsightsService::from_config(&cfg).map_err(|err| anyhow!(err.user_message()))?;

    match command.as_str() {
        "team" => run_team(&service, rest),
        "top" => run_top(&service, &cfg, rest),
        other => Err(anyhow!("unknown command {other}\n{USAGE}")),
    }
}

fn run_team<A: FootballApi>(
    service: &InsightsService<A>,
    args: &[String],
) -> Result<()> {
    let name = positional(args).join(" ");
    if name.trim().is_empty() {
        return Err(anyhow!("missing team name\n{USAGE}"));
    }
    let mode = match flag_value(args, "--mode") {
        Some(raw) => FilterMode::parse(raw).with_context(|| format!("invalid --mode {raw}"))?,
        None => FilterMode::Recent,
    };
    let season = flag_value(args, "--season")
        .map(|raw| raw.parse::<i32>().with_context(|| format!("invalid --season {raw}")))
        .transpose()?;
    let filter = Filter { mode, season };

    let insights = service
        .team_insights(&name, filter)
        .map_err(|err| anyhow!(err.user_message()))?;

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&insights)?);
    } else {
        print_insights(&insights);
    }
    Ok(())
}

fn run_top<A: FootballApi>(
    service: &InsightsService<A>,
    cfg: &ApiConfig,
    args: &[String],
) -> Result<()> {
    let leagues = flag_value(args, "--leagues")
        .map(parse_league_ids)
        .filter(|ids| !ids.is_empty())
        .unwrap_or_else(|| cfg.top_team_leagues.clone());
    let season = flag_value(args, "--season")
        .map(|raw| raw.parse::<i32>().with_context(|| format!("invalid --season {raw}")))
        .transpose()?;
    let limit = flag_value(args, "--limit")
        .map(|raw| raw.parse::<usize>().with_context(|| format!("invalid --limit {raw}")))
        .transpose()?
        .unwrap_or(cfg.top_teams_limit);

    let entries = service
        .top_teams(&leagues, season, limit)
        .map_err(|err| anyhow!(err.user_message()))?;
    let shown = filter_entries(&entries, flag_value(args, "--filter").unwrap_or_default());

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&shown)?);
    } else if shown.is_empty() {
        println!("No teams found.");
    } else {
        for entry in shown {
            print_standing(entry);
        }
    }
    Ok(())
}

fn print_insights(insights: &TeamInsights) {
    let team = &insights.team;
    println!("{} ({})", team.name, team.country);
    if let Some(founded) = team.founded {
        println!("Founded: {founded}");
    }
    if let Some(venue) = insights.venue.as_ref() {
        println!(
            "Venue: {} {}",
            venue.name.as_deref().unwrap_or("-"),
            venue.city.as_deref().unwrap_or("")
        );
    }
    let applied = &insights.filters;
    match applied.season {
        Some(season) => println!("Filter: {} {season}", applied.mode.label()),
        None => println!("Filter: {}", applied.mode.label()),
    }
    if !insights.available_seasons.is_empty() {
        let seasons = insights
            .available_seasons
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("Seasons: {seasons}");
    }
    let r = &insights.record;
    println!(
        "Matches: {}  W {}  D {}  L {}  Goals {}:{}",
        applied.matches_count, r.wins, r.draws, r.losses, r.goals_for, r.goals_against
    );
    println!();
    for fixture in &insights.fixtures {
        let (scored, conceded) = attributed_goals(team.id, fixture);
        let mark = match classify(team.id, fixture) {
            Outcome::Win => "W",
            Outcome::Draw => "D",
            Outcome::Loss => "L",
        };
        println!(
            "{}  {} {}-{} {}  [{}] {}  ({}:{})",
            fixture.date.get(..10).unwrap_or(fixture.date.as_str()),
            fixture.home_team.name,
            fixture
                .home_goals
                .map(|g| g.to_string())
                .unwrap_or_else(|| "-".to_string()),
            fixture
                .away_goals
                .map(|g| g.to_string())
                .unwrap_or_else(|| "-".to_string()),
            fixture.away_team.name,
            fixture.league.name,
            mark,
            scored,
            conceded
        );
    }
}

fn print_standing(entry: &StandingEntry) {
    println!(
        "{:>3} pts  {:+4}  #{:<2} {:<28} {} ({})  {}W {}D {}L  form {}",
        entry.points,
        entry.goals_diff,
        entry.rank,
        entry.team.name,
        entry.league.name,
        entry.league.country,
        entry.wins,
        entry.draws,
        entry.losses,
        format_form(entry.form.as_deref())
    );
}

fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut idx = 0;
    while idx < args.len() {
        let arg = args[idx].as_str();
        if arg == "--json" || (arg.starts_with("--") && arg.contains('=')) {
            idx += 1;
        } else if arg.starts_with("--") {
            idx += 2;
        } else {
            out.push(arg);
            idx += 1;
        }
    }
    out
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    for (idx, arg) in args.iter().enumerate() {
        if arg == name {
            return args.get(idx + 1).map(|s| s.as_str());
        }
        if let Some(value) = arg.strip_prefix(name).and_then(|r| r.strip_prefix('=')) {
            return Some(value);
        }
    }
    None
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}
