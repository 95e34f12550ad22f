use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::dataset::{TextEncoding, write_text};
use crate::election::{CandidateRecord, ConstituencySummary, Country};
use crate::error::DigestResult;
use crate::report::render_delimited_row;

pub const CSV_HEADER: [&str; 14] = [
    "ONS Code",
    "PANO",
    "Constituency",
    "Surname",
    "First name",
    "Full Party",
    "Valid votes",
    "Position",
    "Outcome",
    "Share",
    "Majority",
    "Candidate count",
    "Party",
    "Country",
];

pub const DEFAULT_ROW_LIMIT: usize = 10_000;

/// Parties kept by name in the dump; losing candidates of any other party
/// are reported under `other_label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyAllowList {
    pub parties: Vec<String>,
    pub other_label: String,
}

impl Default for PartyAllowList {
    fn default() -> Self {
        Self {
            parties: [
                "Conservative",
                "Labour",
                "Liberal Democrats",
                "SNP",
                "UKIP",
                "Green Party",
                "DUP",
                "Sinn Féin",
                "Plaid Cymru",
                "SDLP",
                "UUP",
                "Alliance",
                "Independent",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
            other_label: "Other".to_string(),
        }
    }
}

impl PartyAllowList {
    pub fn contains(&self, party_identifier: &str) -> bool {
        let wanted = party_identifier.trim().to_lowercase();
        self.parties.iter().any(|p| p.to_lowercase() == wanted)
    }

    /// Winners keep their identifier whatever it is. A trailing `Party` word
    /// is dropped from the result.
    pub fn simplify(&self, party_identifier: &str, position: usize) -> String {
        let kept = if position == 1 || self.contains(party_identifier) {
            party_identifier.trim()
        } else {
            self.other_label.as_str()
        };
        match kept.strip_suffix("Party") {
            Some(stem) => stem.trim().to_string(),
            None => kept.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner,
    Loser,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Winner => "Winner",
            Outcome::Loser => "Loser",
        }
    }
}

/// One candidate row of the dump, with the constituency-level facts folded in.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedCandidate<'a> {
    pub candidate: &'a CandidateRecord,
    /// 1-based, in vote order.
    pub position: usize,
    pub outcome: Outcome,
    /// Fraction of the constituency vote, 0..=1.
    pub share: f64,
    pub majority: u32,
    pub candidate_count: usize,
    pub simplified_party: String,
    pub country: Country,
}

impl AugmentedCandidate<'_> {
    fn fields(&self) -> Vec<String> {
        let c = self.candidate;
        vec![
            c.ons_code.clone(),
            c.pano.clone(),
            c.constituency.clone(),
            c.surname.clone(),
            c.first_name.clone(),
            c.party_identifier.clone(),
            c.votes.to_string(),
            self.position.to_string(),
            self.outcome.label().to_string(),
            format!("{:.3}", self.share),
            self.majority.to_string(),
            self.candidate_count.to_string(),
            self.simplified_party.clone(),
            self.country.to_string(),
        ]
    }
}

pub fn augment_constituency<'a>(
    constituency: &'a ConstituencySummary,
    allow: &PartyAllowList,
) -> Vec<AugmentedCandidate<'a>> {
    constituency
        .candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let position = idx + 1;
            let winner = position == 1;
            AugmentedCandidate {
                candidate: c,
                position,
                outcome: if winner { Outcome::Winner } else { Outcome::Loser },
                share: if constituency.total_votes == 0 {
                    0.0
                } else {
                    f64::from(c.votes) / constituency.total_votes as f64
                },
                majority: if winner { constituency.majority } else { 0 },
                candidate_count: constituency.candidates.len(),
                simplified_party: allow.simplify(&c.party_identifier, position),
                country: constituency.country,
            }
        })
        .collect()
}

/// Dump text (header plus at most `limit` rows), the protection warnings
/// raised while rendering it and the number of rows written.
pub fn render_augmented_csv(
    constituencies: &[ConstituencySummary],
    allow: &PartyAllowList,
    limit: usize,
) -> (String, Vec<String>, usize) {
    let mut out = String::new();
    let mut warnings = Vec::new();
    out.push_str(&CSV_HEADER.join(","));
    out.push('\n');

    let rows = constituencies
        .iter()
        .flat_map(|c| augment_constituency(c, allow))
        .take(limit);
    let mut written = 0usize;
    for row in rows {
        let (line, row_warnings) = render_delimited_row(&row.fields());
        warnings.extend(row_warnings);
        out.push_str(&line);
        out.push('\n');
        written += 1;
    }
    (out, warnings, written)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub rows: usize,
    pub warnings: Vec<String>,
}

/// Render and write the dump. Nothing is written when the output directory
/// is missing.
pub fn export_augmented_csv(
    path: &Path,
    constituencies: &[ConstituencySummary],
    allow: &PartyAllowList,
    encoding: TextEncoding,
    limit: usize,
) -> DigestResult<ExportReport> {
    let (text, warnings, rows) = render_augmented_csv(constituencies, allow, limit);
    for warning in &warnings {
        warn!("{warning}");
    }
    write_text(path, &text, encoding)?;
    info!("wrote {rows} augmented rows to {}", path.display());
    Ok(ExportReport {
        path: path.to_path_buf(),
        rows,
        warnings,
    })
}
