use std::collections::HashSet;
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{DigestError, DigestResult};
use crate::grouping::{count_by, fold_groups, partition_by};
use crate::line_parser::{LineOutcome, is_skippable, parse_count, split_fields};
use crate::ranking::{RankedEntry, SortDirection, rank_by_key, top_n};

// RESULTS,,,,,,,
// ONS Code,PANO,Constituency,Surname,First name,Party,Party Identifer,Valid votes
// E14000530,7,Aldershot,WALLACE,Donna Maria,Green Party,Green Party,1090
pub const CANDIDATE_HEADER_PREFIXES: &[&str] = &["RESULTS", "ONS Code"];

/// Column positions of a candidate results file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateFieldMap {
    pub ons_code: usize,
    pub pano: usize,
    pub constituency: usize,
    pub surname: usize,
    pub first_name: usize,
    pub party: usize,
    pub party_identifier: usize,
    pub votes: usize,
    /// Exact number of fields a row carries once quoted commas are resolved.
    pub field_count: usize,
}

impl Default for CandidateFieldMap {
    fn default() -> Self {
        Self {
            ons_code: 0,
            pano: 1,
            constituency: 2,
            surname: 3,
            first_name: 4,
            party: 5,
            party_identifier: 6,
            votes: 7,
            field_count: 8,
        }
    }
}

impl CandidateFieldMap {
    /// Layout of the augmented dump written by `election_export`. The dump
    /// carries only the party identifier, so it fills both party columns.
    pub fn augmented_dump() -> Self {
        Self {
            ons_code: 0,
            pano: 1,
            constituency: 2,
            surname: 3,
            first_name: 4,
            party: 5,
            party_identifier: 5,
            votes: 6,
            field_count: 14,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    pub ons_code: String,
    pub pano: String,
    pub constituency: String,
    pub surname: String,
    pub first_name: String,
    /// Free-text party label; inconsistent across the file.
    pub party: String,
    pub party_identifier: String,
    pub votes: u32,
}

impl CandidateRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}

impl fmt::Display for CandidateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} {} / {} : {}",
            self.constituency, self.first_name, self.surname, self.party, self.votes
        )
    }
}

pub fn parse_candidate_line(line: &str, map: &CandidateFieldMap) -> LineOutcome<CandidateRecord> {
    if is_skippable(line, CANDIDATE_HEADER_PREFIXES) {
        return LineOutcome::Skip;
    }
    match parse_candidate_fields(line, map) {
        Ok(record) => LineOutcome::Record(record),
        Err(reason) => LineOutcome::Rejected(reason),
    }
}

fn parse_candidate_fields(line: &str, map: &CandidateFieldMap) -> Result<CandidateRecord, String> {
    let fields = split_fields(line, Some(map.field_count))?;
    if fields.len() < map.field_count {
        return Err(format!(
            "insufficient fields ({} of {})",
            fields.len(),
            map.field_count
        ));
    }
    let text = |idx: usize| -> String { fields.get(idx).map(|s| s.trim().to_string()).unwrap_or_default() };
    let votes_raw = fields.get(map.votes).map(String::as_str).unwrap_or_default();

    Ok(CandidateRecord {
        ons_code: text(map.ons_code),
        pano: text(map.pano),
        constituency: text(map.constituency),
        surname: text(map.surname),
        first_name: text(map.first_name),
        party: text(map.party),
        party_identifier: text(map.party_identifier),
        votes: parse_count(votes_raw, "vote count")?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Country {
    England,
    Scotland,
    Wales,
    #[serde(rename = "Northern Ireland")]
    NorthernIreland,
}

impl Country {
    pub fn label(self) -> &'static str {
        match self {
            Country::England => "England",
            Country::Scotland => "Scotland",
            Country::Wales => "Wales",
            Country::NorthernIreland => "Northern Ireland",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyCountry {
    pub party: String,
    pub country: Country,
}

/// Parties that only stand in one nation, used to place a constituency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryTable {
    pub default: Country,
    pub parties: Vec<PartyCountry>,
}

impl Default for CountryTable {
    fn default() -> Self {
        let entry = |party: &str, country| PartyCountry {
            party: party.to_string(),
            country,
        };
        Self {
            default: Country::England,
            parties: vec![
                entry("SNP", Country::Scotland),
                entry("Plaid Cymru", Country::Wales),
                entry("DUP", Country::NorthernIreland),
                entry("SDLP", Country::NorthernIreland),
                entry("UUP", Country::NorthernIreland),
                entry("Sinn Féin", Country::NorthernIreland),
            ],
        }
    }
}

impl CountryTable {
    pub fn lookup(&self, party_identifier: &str) -> Option<Country> {
        let wanted = party_identifier.trim().to_lowercase();
        self.parties
            .iter()
            .find(|p| p.party.to_lowercase() == wanted)
            .map(|p| p.country)
    }

    /// First party that implies a nation decides. A later party implying a
    /// different nation is reported and does not change the assignment.
    pub fn assign(&self, constituency: &str, candidates: &[CandidateRecord]) -> (Country, Vec<DigestError>) {
        let mut assigned: Option<Country> = None;
        let mut conflicts = Vec::new();
        for c in candidates {
            let Some(found) = self.lookup(&c.party_identifier) else {
                continue;
            };
            match assigned {
                None => assigned = Some(found),
                Some(current) if current == found => {}
                Some(current) => conflicts.push(DigestError::DataConsistency {
                    entity: constituency.to_string(),
                    detail: format!(
                        "{} implies {found} but constituency already placed in {current}",
                        c.party_identifier
                    ),
                }),
            }
        }
        (assigned.unwrap_or(self.default), conflicts)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstituencySummary {
    pub name: String,
    pub country: Country,
    /// Highest vote first; equal votes keep file order.
    pub candidates: Vec<CandidateRecord>,
    pub total_votes: u64,
    pub winning_party: String,
    pub winning_candidate: String,
    pub winning_votes: u32,
    pub majority: u32,
    pub winning_share: f64,
    pub losing_share: f64,
    pub conflicts: Vec<String>,
}

impl ConstituencySummary {
    pub fn build(name: String, mut candidates: Vec<CandidateRecord>, countries: &CountryTable) -> DigestResult<Self> {
        candidates.sort_by(|a, b| b.votes.cmp(&a.votes));
        let (winner, runner_up_votes, last_votes) = match candidates.as_slice() {
            [] => {
                return Err(DigestError::DataConsistency {
                    entity: name,
                    detail: "constituency without candidates".to_string(),
                });
            }
            [only] => (only, 0, only.votes),
            [first, second, .., last] => (first, second.votes, last.votes),
            [first, second] => (first, second.votes, second.votes),
        };

        let total_votes: u64 = candidates.iter().map(|c| u64::from(c.votes)).sum();
        let share = |votes: u32| {
            if total_votes == 0 {
                0.0
            } else {
                f64::from(votes) * 100.0 / total_votes as f64
            }
        };

        let (country, conflicts) = countries.assign(&name, &candidates);
        Ok(Self {
            country,
            total_votes,
            winning_party: winner.party_identifier.clone(),
            winning_candidate: format!("{}, {}", winner.surname, winner.first_name),
            winning_votes: winner.votes,
            majority: winner.votes - runner_up_votes,
            winning_share: share(winner.votes),
            losing_share: share(last_votes),
            conflicts: conflicts.iter().map(ToString::to_string).collect(),
            name,
            candidates,
        })
    }

    pub fn winner(&self) -> &CandidateRecord {
        &self.candidates[0]
    }

    pub fn last_place(&self) -> &CandidateRecord {
        &self.candidates[self.candidates.len() - 1]
    }
}

impl fmt::Display for ConstituencySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) : total votes {}, {} candidates : won by {} ({}) : {} votes, maj {}, share {} %",
            self.name,
            self.country,
            self.total_votes,
            self.candidates.len(),
            self.winning_party,
            self.winning_candidate,
            self.winning_votes,
            self.majority,
            self.winning_share.round()
        )
    }
}

/// Group candidates by constituency (first-seen order) and summarise each.
/// Country conflicts are logged and kept on the summary.
pub fn build_constituencies(records: &[CandidateRecord], countries: &CountryTable) -> Vec<ConstituencySummary> {
    let groups = partition_by(records.iter().cloned(), |c| c.constituency.clone());
    fold_groups(groups, |name, candidates| {
        ConstituencySummary::build(name, candidates, countries)
    })
    .into_iter()
    .filter_map(|built| match built {
        Ok(summary) => {
            for conflict in &summary.conflicts {
                warn!("{conflict}");
            }
            Some(summary)
        }
        Err(err) => {
            warn!("{err}");
            None
        }
    })
    .collect()
}

/// Seats per winning party, first-seen order.
pub fn seats_by_party<'a>(constituencies: impl IntoIterator<Item = &'a ConstituencySummary>) -> Vec<(String, usize)> {
    count_by(constituencies, |c| c.winning_party.clone())
}

/// Seats per winning party within each country, countries in first-seen order.
pub fn seats_by_country(constituencies: &[ConstituencySummary]) -> Vec<(Country, Vec<(String, usize)>)> {
    fold_groups(partition_by(constituencies.iter(), |c| c.country), |country, seats| {
        (country, seats_by_party(seats))
    })
}

/// The extremal listings printed for an election.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstituencyQuery {
    FewestWinnerVotes,
    MostWinnerVotes,
    SmallestMajority,
    SmallestWinningShare,
    LargestLosingShare,
}

impl ConstituencyQuery {
    pub const ALL: [ConstituencyQuery; 5] = [
        ConstituencyQuery::FewestWinnerVotes,
        ConstituencyQuery::MostWinnerVotes,
        ConstituencyQuery::SmallestMajority,
        ConstituencyQuery::SmallestWinningShare,
        ConstituencyQuery::LargestLosingShare,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConstituencyQuery::FewestWinnerVotes => "Smallest number of votes for the winner",
            ConstituencyQuery::MostWinnerVotes => "Largest number of votes for the winner",
            ConstituencyQuery::SmallestMajority => "Smallest majority",
            ConstituencyQuery::SmallestWinningShare => "Smallest winning share",
            ConstituencyQuery::LargestLosingShare => "Largest share for the last-placed candidate",
        }
    }

    /// The first `n` constituencies under this query's order.
    pub fn run(self, constituencies: &[ConstituencySummary], n: usize) -> Vec<RankedEntry<&ConstituencySummary>> {
        let items: Vec<&ConstituencySummary> = constituencies.iter().collect();
        let ranked = match self {
            ConstituencyQuery::FewestWinnerVotes => {
                rank_by_key(items, |c| c.winning_votes, SortDirection::Ascending)
            }
            ConstituencyQuery::MostWinnerVotes => {
                rank_by_key(items, |c| c.winning_votes, SortDirection::Descending)
            }
            ConstituencyQuery::SmallestMajority => {
                rank_by_key(items, |c| c.majority, SortDirection::Ascending)
            }
            ConstituencyQuery::SmallestWinningShare => {
                rank_by_key(items, |c| c.winning_share, SortDirection::Ascending)
            }
            ConstituencyQuery::LargestLosingShare => {
                rank_by_key(items, |c| c.losing_share, SortDirection::Descending)
            }
        };
        top_n(&ranked, n).to_vec()
    }
}

/// Distinct counts across the raw candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectionOverview {
    pub candidates: usize,
    pub constituencies: usize,
    pub parties: usize,
    pub surnames: usize,
    pub first_names: usize,
    pub full_names: usize,
    pub total_votes: u64,
}

impl ElectionOverview {
    pub fn from_records(records: &[CandidateRecord]) -> Self {
        fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> usize {
            values.collect::<HashSet<_>>().len()
        }
        Self {
            candidates: records.len(),
            constituencies: distinct(records.iter().map(|c| c.constituency.as_str())),
            parties: distinct(records.iter().map(|c| c.party_identifier.as_str())),
            surnames: distinct(records.iter().map(|c| c.surname.as_str())),
            first_names: distinct(records.iter().map(|c| c.first_name.as_str())),
            full_names: records
                .iter()
                .map(CandidateRecord::full_name)
                .collect::<HashSet<_>>()
                .len(),
            total_votes: records.iter().map(|c| u64::from(c.votes)).sum(),
        }
    }
}
