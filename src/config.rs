use std::env;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::dataset::{TextEncoding, read_text};
use crate::election::{CandidateFieldMap, CountryTable};
use crate::election_export::{DEFAULT_ROW_LIMIT, PartyAllowList};
use crate::error::{DigestError, DigestResult};
use crate::football::MatchFieldMap;
use crate::league::LeagueOrdering;

const DEFAULT_FOOTBALL_PATH: &str = "data/EnglishPremierLeagueResults2016-17.csv";
const DEFAULT_ELECTION_PATH: &str = "data/UKGeneralElection2017.csv";
const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_DUMP_FILE: &str = "ExtendedUKGeneralElection2017.csv";
const DEFAULT_LEAGUE_NAME: &str = "English Premier League 2016-17";
const DEFAULT_TEAM: &str = "Leicester";
const DEFAULT_TABLE_LENGTH: usize = 5;
const DEFAULT_LISTING_LENGTH: usize = 10;
const DEFAULT_TALLY_MIN_VOTES: u64 = 100_000;

/// Lookup tables and column layouts. Every field falls back to the layout of
/// the historical files, so a tables file only needs the parts it changes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetTables {
    pub countries: CountryTable,
    pub parties: PartyAllowList,
    pub match_fields: MatchFieldMap,
    pub candidate_fields: CandidateFieldMap,
    pub league_ordering: LeagueOrdering,
}

impl DatasetTables {
    pub fn load(path: &Path) -> DigestResult<Self> {
        let text = read_text(path, TextEncoding::Utf8)?;
        serde_json::from_str(&text)
            .map_err(|err| DigestError::Config(format!("{}: {err}", path.display())))
    }
}

#[derive(Debug, Clone)]
pub struct DigestConfig {
    pub football_path: PathBuf,
    pub election_path: PathBuf,
    pub output_dir: PathBuf,
    pub dump_file: String,
    pub encoding: TextEncoding,
    pub league_name: String,
    pub highlight_team: String,
    pub table_length: usize,
    pub listing_length: usize,
    pub dump_row_limit: usize,
    pub tally_min_votes: u64,
    pub parallel_tally: bool,
    pub tables: DatasetTables,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            football_path: PathBuf::from(DEFAULT_FOOTBALL_PATH),
            election_path: PathBuf::from(DEFAULT_ELECTION_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            dump_file: DEFAULT_DUMP_FILE.to_string(),
            encoding: TextEncoding::default(),
            league_name: DEFAULT_LEAGUE_NAME.to_string(),
            highlight_team: DEFAULT_TEAM.to_string(),
            table_length: DEFAULT_TABLE_LENGTH,
            listing_length: DEFAULT_LISTING_LENGTH,
            dump_row_limit: DEFAULT_ROW_LIMIT,
            tally_min_votes: DEFAULT_TALLY_MIN_VOTES,
            parallel_tally: false,
            tables: DatasetTables::default(),
        }
    }
}

impl DigestConfig {
    pub fn from_env() -> DigestResult<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> DigestResult<Self> {
        let opt = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let count = |key: &str, default: usize| -> DigestResult<usize> {
            match opt(key) {
                None => Ok(default),
                Some(raw) => match raw.parse::<usize>() {
                    Ok(n) if n > 0 => Ok(n),
                    _ => Err(DigestError::Config(format!(
                        "{key} must be a positive whole number, got {raw:?}"
                    ))),
                },
            }
        };
        let defaults = Self::default();

        let encoding = match opt("DIGEST_ENCODING") {
            Some(label) => TextEncoding::from_label(&label)
                .ok_or_else(|| DigestError::Config(format!("unknown encoding {label:?}")))?,
            None => defaults.encoding,
        };
        let tables = match opt("DIGEST_TABLES_PATH") {
            Some(path) => {
                info!("loading lookup tables from {path}");
                DatasetTables::load(Path::new(&path))?
            }
            None => defaults.tables,
        };

        let tally_min_votes = match opt("DIGEST_TALLY_MIN_VOTES") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                DigestError::Config(format!(
                    "DIGEST_TALLY_MIN_VOTES must be a whole number, got {raw:?}"
                ))
            })?,
            None => defaults.tally_min_votes,
        };

        Ok(Self {
            football_path: opt("DIGEST_FOOTBALL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.football_path),
            election_path: opt("DIGEST_ELECTION_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.election_path),
            output_dir: opt("DIGEST_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            dump_file: opt("DIGEST_DUMP_FILE").unwrap_or(defaults.dump_file),
            encoding,
            league_name: opt("DIGEST_LEAGUE_NAME").unwrap_or(defaults.league_name),
            highlight_team: opt("DIGEST_TEAM").unwrap_or(defaults.highlight_team),
            table_length: count("DIGEST_TABLE_LENGTH", defaults.table_length)?,
            listing_length: count("DIGEST_LISTING_LENGTH", defaults.listing_length)?,
            dump_row_limit: count("DIGEST_DUMP_ROW_LIMIT", defaults.dump_row_limit)?,
            tally_min_votes,
            parallel_tally: opt("DIGEST_PARALLEL_TALLY")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.parallel_tally),
            tables,
        })
    }

    pub fn dump_path(&self) -> PathBuf {
        self.output_dir.join(&self.dump_file)
    }
}

/// The optional positional data path. Anything that looks like a flag is
/// ignored with a warning.
pub fn data_path_arg(args: impl IntoIterator<Item = String>) -> Option<PathBuf> {
    let mut path = None;
    for arg in args {
        if arg.starts_with('-') {
            warn!("ignoring unknown argument {arg:?}");
        } else if path.is_none() && !arg.trim().is_empty() {
            path = Some(PathBuf::from(arg.trim()));
        }
    }
    path
}

fn parse_bool(raw: &str) -> bool {
    let t = raw.trim().to_ascii_lowercase();
    !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
}
