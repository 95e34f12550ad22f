//! Parse football results and general-election candidate files, fold them
//! into per-team and per-constituency summaries, rank them and render the
//! results as fixed-width tables or an augmented CSV dump.

pub mod config;
pub mod dataset;
pub mod election;
pub mod election_export;
pub mod error;
pub mod football;
pub mod grouping;
pub mod league;
pub mod line_parser;
pub mod logging;
pub mod party_tally;
pub mod ranking;
pub mod report;
