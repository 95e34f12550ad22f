use anyhow::{Context, Result};

use results_digest::config::{DigestConfig, data_path_arg};
use results_digest::dataset::load_records;
use results_digest::football::{SeasonOverview, TeamRecord, parse_match_line};
use results_digest::league::League;
use results_digest::logging::init_logging;
use results_digest::report::render_league_table;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging("football_season");

    let config = DigestConfig::from_env().context("invalid configuration")?;
    let path =
        data_path_arg(std::env::args().skip(1)).unwrap_or_else(|| config.football_path.clone());
    let fields = &config.tables.match_fields;

    let parsed = load_records(&path, config.encoding, |line| parse_match_line(line, fields))
        .with_context(|| format!("unable to load results from {}", path.display()))?;
    parsed.log_diagnostics(&path.display().to_string());
    let matches = parsed.records;

    println!("Read in {} matches", matches.len());
    let overview = SeasonOverview::from_matches(&matches);
    let (avg_home, avg_away) = overview.average_score();
    println!(
        "- contains {} home teams and {} away teams",
        overview.home_teams, overview.away_teams
    );
    println!(
        "- {} home goals and {} away goals",
        overview.home_goals, overview.away_goals
    );
    println!("- average score {avg_home}-{avg_away}");
    println!(
        "- {} home wins, {} away wins and {} draws",
        overview.home_wins, overview.away_wins, overview.draws
    );
    if let (Some(first), Some(last)) = (overview.first_date, overview.last_date) {
        println!("- played from {first} to {last}");
    }

    let record = TeamRecord::for_team(&matches, &config.highlight_team);
    println!(
        "- {} : {} home wins, {} away wins and {} draws",
        record.team, record.home_wins, record.away_wins, record.draws
    );

    println!();
    println!("Home goals scored frequencies:");
    for (goals, count) in &overview.home_goal_frequency {
        println!("{goals} goals : {count} matches");
    }
    println!();
    println!("Away goals scored frequencies:");
    for (goals, count) in &overview.away_goal_frequency {
        println!("{goals} goals : {count} matches");
    }
    println!();
    println!("Match score frequencies:");
    for ((home, away), count) in &overview.score_frequency {
        println!("Score {home}-{away} : {count} matches");
    }

    let league = League::from_matches(
        config.league_name.as_str(),
        &matches,
        &config.tables.league_ordering,
    );

    println!();
    println!("{}", league.name);
    print_lines(&render_league_table(league.positions()));

    println!();
    println!("Top of table:");
    print_lines(&render_league_table(league.top(config.table_length)));

    println!();
    println!("Bottom of table:");
    print_lines(&render_league_table(league.bottom(config.table_length)));

    println!();
    println!("Stats:");
    match league.points_stats() {
        Some(stats) => {
            println!("- points count: {}", stats.count);
            println!("- points average: {:.2}", stats.average);
            println!("- points sum: {}", stats.sum);
            println!("- points max: {}", stats.max);
            println!("- points min: {}", stats.min);
        }
        None => println!("- no teams in table"),
    }

    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
