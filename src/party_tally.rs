use std::collections::HashMap;
use std::fmt;

use rayon::prelude::*;

use crate::election::ConstituencySummary;
use crate::grouping::{Merge, merge_maps};

/// How one party did across every constituency it stood in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyTally {
    pub party: String,
    pub wins: u32,
    pub seconds: u32,
    pub thirds: u32,
    pub contested: u32,
    pub votes: u64,
}

impl PartyTally {
    pub fn new(party: impl Into<String>) -> Self {
        Self {
            party: party.into(),
            wins: 0,
            seconds: 0,
            thirds: 0,
            contested: 0,
            votes: 0,
        }
    }

    /// Record one candidacy finishing at 1-based `position`.
    pub fn add_result(&mut self, votes: u32, position: usize) {
        self.contested += 1;
        self.votes += u64::from(votes);
        match position {
            1 => self.wins += 1,
            2 => self.seconds += 1,
            3 => self.thirds += 1,
            _ => {}
        }
    }

    pub fn votes_per_win(&self) -> u64 {
        if self.wins == 0 {
            self.votes
        } else {
            self.votes / u64::from(self.wins)
        }
    }
}

impl Merge for PartyTally {
    fn merge(&mut self, other: Self) {
        self.wins += other.wins;
        self.seconds += other.seconds;
        self.thirds += other.thirds;
        self.contested += other.contested;
        self.votes += other.votes;
    }
}

impl fmt::Display for PartyTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : wins={}, seconds={}, thirds={}, contested={}, votes={}, votes per win={}",
            self.party,
            self.wins,
            self.seconds,
            self.thirds,
            self.contested,
            self.votes,
            self.votes_per_win()
        )
    }
}

fn accumulate(mut tallies: HashMap<String, PartyTally>, constituency: &ConstituencySummary) -> HashMap<String, PartyTally> {
    for (idx, candidate) in constituency.candidates.iter().enumerate() {
        tallies
            .entry(candidate.party_identifier.clone())
            .or_insert_with(|| PartyTally::new(candidate.party_identifier.as_str()))
            .add_result(candidate.votes, idx + 1);
    }
    tallies
}

pub fn tally_parties(constituencies: &[ConstituencySummary]) -> HashMap<String, PartyTally> {
    constituencies.iter().fold(HashMap::new(), accumulate)
}

/// Same totals as [`tally_parties`], folded on the rayon pool and combined
/// with [`merge_maps`].
pub fn tally_parties_parallel(constituencies: &[ConstituencySummary]) -> HashMap<String, PartyTally> {
    constituencies
        .par_iter()
        .fold(HashMap::new, accumulate)
        .reduce(HashMap::new, merge_maps)
}

/// Most wins first, then most votes, then party name, so the listing is the
/// same whichever tally produced the map.
pub fn ranked_tallies(tallies: HashMap<String, PartyTally>) -> Vec<PartyTally> {
    let mut out: Vec<PartyTally> = tallies.into_values().collect();
    out.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(b.votes.cmp(&a.votes))
            .then_with(|| a.party.cmp(&b.party))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_feed_the_right_counters() {
        let mut t = PartyTally::new("Labour");
        t.add_result(100, 1);
        t.add_result(50, 2);
        t.add_result(20, 3);
        t.add_result(5, 4);
        assert_eq!((t.wins, t.seconds, t.thirds, t.contested), (1, 1, 1, 4));
        assert_eq!(t.votes, 175);
        assert_eq!(t.votes_per_win(), 175);
    }

    #[test]
    fn votes_per_win_without_wins_is_total_votes() {
        let mut t = PartyTally::new("Monster Raving Loony");
        t.add_result(77, 5);
        assert_eq!(t.votes_per_win(), 77);
    }

    #[test]
    fn merge_adds_every_counter() {
        let mut a = PartyTally::new("SNP");
        a.add_result(10, 1);
        let mut b = PartyTally::new("SNP");
        b.add_result(7, 2);
        a.merge(b);
        assert_eq!((a.wins, a.seconds, a.contested, a.votes), (1, 1, 2, 17));
    }

    #[test]
    fn ranked_tallies_break_ties_by_votes_then_name() {
        let mut a = PartyTally::new("B");
        a.add_result(10, 2);
        let mut b = PartyTally::new("A");
        b.add_result(10, 2);
        let mut c = PartyTally::new("C");
        c.add_result(1, 1);
        let ranked = ranked_tallies(HashMap::from([
            ("B".to_string(), a),
            ("A".to_string(), b),
            ("C".to_string(), c),
        ]));
        let names: Vec<_> = ranked.iter().map(|t| t.party.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }
}
