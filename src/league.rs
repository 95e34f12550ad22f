use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::football::{MatchRecord, OutcomeKind, TeamOutcome};
use crate::grouping::{fold_groups, partition_by};
use crate::ranking::{RankedEntry, SortDirection, bottom_n, rank_by, top_n};

/// A club's season, folded from its match outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeamSeasonSummary {
    pub team: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TeamSeasonSummary {
    pub fn from_outcomes(team: String, outcomes: &[TeamOutcome]) -> Self {
        let mut summary = Self {
            team,
            ..Self::default()
        };
        for o in outcomes {
            summary.played += 1;
            summary.points += o.points();
            summary.goals_for += o.goals_for;
            summary.goals_against += o.goals_against;
            match o.outcome {
                OutcomeKind::Win => summary.wins += 1,
                OutcomeKind::Draw => summary.draws += 1,
                OutcomeKind::Lose => summary.losses += 1,
            }
        }
        summary
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

/// Every team outcome, two per match, in match order.
pub fn team_outcomes(matches: &[MatchRecord]) -> Vec<TeamOutcome> {
    matches.iter().flat_map(MatchRecord::team_outcomes).collect()
}

/// One summary per team, in the order teams first appear in the results.
pub fn season_summaries(matches: &[MatchRecord]) -> Vec<TeamSeasonSummary> {
    let groups = partition_by(team_outcomes(matches), |o| o.team.clone());
    fold_groups(groups, |team, outcomes| {
        TeamSeasonSummary::from_outcomes(team, &outcomes)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeagueKey {
    Points,
    GoalDifference,
    GoalsFor,
    Wins,
    Played,
}

impl LeagueKey {
    fn value(self, s: &TeamSeasonSummary) -> i64 {
        match self {
            LeagueKey::Points => i64::from(s.points),
            LeagueKey::GoalDifference => s.goal_difference(),
            LeagueKey::GoalsFor => i64::from(s.goals_for),
            LeagueKey::Wins => i64::from(s.wins),
            LeagueKey::Played => i64::from(s.played),
        }
    }
}

/// Composite table order, compared key by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueOrdering {
    pub keys: Vec<(LeagueKey, SortDirection)>,
}

impl Default for LeagueOrdering {
    fn default() -> Self {
        Self {
            keys: vec![
                (LeagueKey::Points, SortDirection::Descending),
                (LeagueKey::GoalDifference, SortDirection::Descending),
            ],
        }
    }
}

impl LeagueOrdering {
    pub fn compare(&self, a: &TeamSeasonSummary, b: &TeamSeasonSummary) -> Ordering {
        self.keys
            .iter()
            .map(|(key, dir)| dir.apply(key.value(a).cmp(&key.value(b))))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointsStats {
    pub count: usize,
    pub sum: u64,
    pub min: u32,
    pub max: u32,
    pub average: f64,
}

#[derive(Debug, Clone)]
pub struct League {
    pub name: String,
    positions: Vec<RankedEntry<TeamSeasonSummary>>,
}

impl League {
    /// Rank `summaries` by `ordering`. Teams the ordering cannot separate keep
    /// their input order.
    pub fn new(name: impl Into<String>, summaries: Vec<TeamSeasonSummary>, ordering: &LeagueOrdering) -> Self {
        Self {
            name: name.into(),
            positions: rank_by(summaries, |a, b| ordering.compare(a, b)),
        }
    }

    pub fn from_matches(name: impl Into<String>, matches: &[MatchRecord], ordering: &LeagueOrdering) -> Self {
        Self::new(name, season_summaries(matches), ordering)
    }

    pub fn positions(&self) -> &[RankedEntry<TeamSeasonSummary>] {
        &self.positions
    }

    pub fn top(&self, n: usize) -> &[RankedEntry<TeamSeasonSummary>] {
        top_n(&self.positions, n)
    }

    pub fn bottom(&self, n: usize) -> &[RankedEntry<TeamSeasonSummary>] {
        bottom_n(&self.positions, n)
    }

    pub fn position_of(&self, team: &str) -> Option<&RankedEntry<TeamSeasonSummary>> {
        self.positions
            .iter()
            .find(|p| p.item.team.eq_ignore_ascii_case(team))
    }

    pub fn points_stats(&self) -> Option<PointsStats> {
        let points: Vec<u32> = self.positions.iter().map(|p| p.item.points).collect();
        let min = points.iter().copied().min()?;
        let max = points.iter().copied().max()?;
        let sum: u64 = points.iter().map(|&p| u64::from(p)).sum();
        Some(PointsStats {
            count: points.len(),
            sum,
            min,
            max,
            average: sum as f64 / points.len() as f64,
        })
    }
}
