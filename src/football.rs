use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::line_parser::{LineOutcome, is_skippable, parse_count, split_fields};

// Div,Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR,HTHG,HTAG,HTR,Referee,...
// E0,13/08/16,Burnley,Swansea,0,1,A,0,0,D,J Moss,...
pub const MATCH_HEADER_PREFIXES: &[&str] = &["Div,Date"];

const DATE_FORMATS: &[&str] = &["%d/%m/%y", "%d/%m/%Y"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultKind {
    HomeWin,
    AwayWin,
    Draw,
}

impl ResultKind {
    pub fn from_scores(home_goals: u32, away_goals: u32) -> Self {
        if home_goals > away_goals {
            ResultKind::HomeWin
        } else if home_goals < away_goals {
            ResultKind::AwayWin
        } else {
            ResultKind::Draw
        }
    }

    /// The single-letter full-time result column (`H`, `A`, `D`).
    pub fn from_code(raw: &str) -> Option<Self> {
        match raw.trim() {
            "H" => Some(ResultKind::HomeWin),
            "A" => Some(ResultKind::AwayWin),
            "D" => Some(ResultKind::Draw),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            ResultKind::HomeWin => 'H',
            ResultKind::AwayWin => 'A',
            ResultKind::Draw => 'D',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    Win,
    Lose,
    Draw,
}

impl OutcomeKind {
    pub fn from_goals(goals_for: u32, goals_against: u32) -> Self {
        if goals_for > goals_against {
            OutcomeKind::Win
        } else if goals_for < goals_against {
            OutcomeKind::Lose
        } else {
            OutcomeKind::Draw
        }
    }

    pub fn points(self) -> u32 {
        match self {
            OutcomeKind::Win => 3,
            OutcomeKind::Draw => 1,
            OutcomeKind::Lose => 0,
        }
    }
}

/// Column positions of a results file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchFieldMap {
    pub league: usize,
    pub date: usize,
    pub home_team: usize,
    pub away_team: usize,
    pub home_goals: usize,
    pub away_goals: usize,
    /// Full-time result letter. When present it must agree with the score.
    pub result: Option<usize>,
    pub min_fields: usize,
}

impl Default for MatchFieldMap {
    fn default() -> Self {
        Self {
            league: 0,
            date: 1,
            home_team: 2,
            away_team: 3,
            home_goals: 4,
            away_goals: 5,
            result: Some(6),
            min_fields: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub league: String,
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
}

impl MatchRecord {
    pub fn result(&self) -> ResultKind {
        ResultKind::from_scores(self.home_goals, self.away_goals)
    }

    pub fn match_score(&self) -> String {
        format!("{}-{}", self.home_goals, self.away_goals)
    }

    /// One outcome per side, home first.
    pub fn team_outcomes(&self) -> [TeamOutcome; 2] {
        [
            TeamOutcome::new(&self.home_team, true, self.home_goals, self.away_goals),
            TeamOutcome::new(&self.away_team, false, self.away_goals, self.home_goals),
        ]
    }
}

impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}-{} {}",
            self.date.format("%d/%m/%Y"),
            self.home_team,
            self.home_goals,
            self.away_goals,
            self.away_team
        )
    }
}

/// One side's view of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamOutcome {
    pub team: String,
    pub home: bool,
    pub goals_for: u32,
    pub goals_against: u32,
    pub outcome: OutcomeKind,
}

impl TeamOutcome {
    fn new(team: &str, home: bool, goals_for: u32, goals_against: u32) -> Self {
        Self {
            team: team.to_string(),
            home,
            goals_for,
            goals_against,
            outcome: OutcomeKind::from_goals(goals_for, goals_against),
        }
    }

    pub fn points(&self) -> u32 {
        self.outcome.points()
    }
}

pub fn parse_match_line(line: &str, map: &MatchFieldMap) -> LineOutcome<MatchRecord> {
    if is_skippable(line, MATCH_HEADER_PREFIXES) {
        return LineOutcome::Skip;
    }
    match parse_match_fields(line, map) {
        Ok(record) => LineOutcome::Record(record),
        Err(reason) => LineOutcome::Rejected(reason),
    }
}

fn parse_match_fields(line: &str, map: &MatchFieldMap) -> Result<MatchRecord, String> {
    // No quoting in this format.
    let fields = split_fields(line, None)?;
    if fields.len() < map.min_fields {
        return Err(format!(
            "insufficient fields ({} of {})",
            fields.len(),
            map.min_fields
        ));
    }
    let date_raw = field(&fields, map.date)?;
    let date = parse_match_date(date_raw).ok_or_else(|| format!("invalid date {date_raw:?}"))?;
    let home_goals = parse_count(field(&fields, map.home_goals)?, "home score")?;
    let away_goals = parse_count(field(&fields, map.away_goals)?, "away score")?;

    if let Some(idx) = map.result {
        let raw = field(&fields, idx)?;
        let declared = ResultKind::from_code(raw).ok_or_else(|| format!("invalid result {raw:?}"))?;
        let derived = ResultKind::from_scores(home_goals, away_goals);
        if declared != derived {
            return Err(format!(
                "result {} disagrees with score {home_goals}-{away_goals}",
                declared.code()
            ));
        }
    }

    let home_team = field(&fields, map.home_team)?.to_string();
    let away_team = field(&fields, map.away_team)?.to_string();
    if home_team.trim().is_empty() || away_team.trim().is_empty() {
        return Err("empty team name".to_string());
    }

    Ok(MatchRecord {
        league: field(&fields, map.league)?.to_string(),
        date,
        home_team,
        away_team,
        home_goals,
        away_goals,
    })
}

fn field(fields: &[String], idx: usize) -> Result<&str, String> {
    fields
        .get(idx)
        .map(String::as_str)
        .ok_or_else(|| format!("missing field {idx}"))
}

pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Headline numbers for a set of results.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonOverview {
    pub matches: usize,
    pub home_teams: usize,
    pub away_teams: usize,
    pub home_goals: u64,
    pub away_goals: u64,
    pub home_wins: usize,
    pub away_wins: usize,
    pub draws: usize,
    pub home_goal_frequency: BTreeMap<u32, usize>,
    pub away_goal_frequency: BTreeMap<u32, usize>,
    pub score_frequency: BTreeMap<(u32, u32), usize>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl SeasonOverview {
    pub fn from_matches(matches: &[MatchRecord]) -> Self {
        let home_teams: HashSet<&str> = matches.iter().map(|m| m.home_team.as_str()).collect();
        let away_teams: HashSet<&str> = matches.iter().map(|m| m.away_team.as_str()).collect();

        let mut home_goal_frequency = BTreeMap::new();
        let mut away_goal_frequency = BTreeMap::new();
        let mut score_frequency = BTreeMap::new();
        for m in matches {
            *home_goal_frequency.entry(m.home_goals).or_insert(0) += 1;
            *away_goal_frequency.entry(m.away_goals).or_insert(0) += 1;
            *score_frequency.entry((m.home_goals, m.away_goals)).or_insert(0) += 1;
        }

        let count_result = |kind: ResultKind| matches.iter().filter(|m| m.result() == kind).count();

        Self {
            matches: matches.len(),
            home_teams: home_teams.len(),
            away_teams: away_teams.len(),
            home_goals: matches.iter().map(|m| u64::from(m.home_goals)).sum(),
            away_goals: matches.iter().map(|m| u64::from(m.away_goals)).sum(),
            home_wins: count_result(ResultKind::HomeWin),
            away_wins: count_result(ResultKind::AwayWin),
            draws: count_result(ResultKind::Draw),
            home_goal_frequency,
            away_goal_frequency,
            score_frequency,
            first_date: matches.iter().map(|m| m.date).min(),
            last_date: matches.iter().map(|m| m.date).max(),
        }
    }

    /// Mean home and away goals per match, rounded to two places.
    pub fn average_score(&self) -> (f64, f64) {
        if self.matches == 0 {
            return (0.0, 0.0);
        }
        let n = self.matches as f64;
        (
            round2(self.home_goals as f64 / n),
            round2(self.away_goals as f64 / n),
        )
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Win/draw counts for one club, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRecord {
    pub team: String,
    pub home_wins: usize,
    pub away_wins: usize,
    pub draws: usize,
}

impl TeamRecord {
    pub fn for_team(matches: &[MatchRecord], team: &str) -> Self {
        let is_home = |m: &&MatchRecord| m.home_team.eq_ignore_ascii_case(team);
        let is_away = |m: &&MatchRecord| m.away_team.eq_ignore_ascii_case(team);
        Self {
            team: team.to_string(),
            home_wins: matches
                .iter()
                .filter(is_home)
                .filter(|m| m.result() == ResultKind::HomeWin)
                .count(),
            away_wins: matches
                .iter()
                .filter(is_away)
                .filter(|m| m.result() == ResultKind::AwayWin)
                .count(),
            draws: matches
                .iter()
                .filter(|m| is_home(m) || is_away(m))
                .filter(|m| m.result() == ResultKind::Draw)
                .count(),
        }
    }
}
