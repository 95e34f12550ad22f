use std::time::Instant;

use anyhow::{Context, Result};
use log::{error, info};

use results_digest::config::{DigestConfig, data_path_arg};
use results_digest::dataset::load_records;
use results_digest::election::{
    ConstituencyQuery, ElectionOverview, build_constituencies, parse_candidate_line,
    seats_by_country, seats_by_party,
};
use results_digest::election_export::export_augmented_csv;
use results_digest::logging::init_logging;
use results_digest::party_tally::{ranked_tallies, tally_parties, tally_parties_parallel};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging("general_election");

    let config = DigestConfig::from_env().context("invalid configuration")?;
    let path =
        data_path_arg(std::env::args().skip(1)).unwrap_or_else(|| config.election_path.clone());
    let fields = &config.tables.candidate_fields;

    let parsed = load_records(&path, config.encoding, |line| parse_candidate_line(line, fields))
        .with_context(|| format!("unable to load candidate results from {}", path.display()))?;
    parsed.log_diagnostics(&path.display().to_string());
    let results = parsed.records;

    println!("Read in {} candidate results", results.len());
    let overview = ElectionOverview::from_records(&results);
    println!();
    println!("Constituencies:        {}", overview.constituencies);
    println!("Parties:               {}", overview.parties);
    println!("Distinct surnames:     {}", overview.surnames);
    println!("Distinct first names:  {}", overview.first_names);
    println!("Distinct names:        {}", overview.full_names);
    println!();
    println!("Total votes : {}", overview.total_votes);

    let constituencies = build_constituencies(&results, &config.tables.countries);
    println!("Generated {} constituencies", constituencies.len());
    println!();
    for (party, seats) in seats_by_party(&constituencies) {
        println!("  {party} : {seats} seats");
    }

    println!();
    for (country, winners) in seats_by_country(&constituencies) {
        let total: usize = winners.iter().map(|(_, seats)| seats).sum();
        println!("{country} : {total} constituencies");
        for (party, seats) in winners {
            println!("  {party} : {seats} seats");
        }
    }

    for query in ConstituencyQuery::ALL {
        println!();
        println!("{}:", query.label());
        for entry in query.run(&constituencies, config.listing_length) {
            let c = entry.item;
            if query == ConstituencyQuery::LargestLosingShare {
                println!("{c} [ {}% {} ]", c.losing_share.round(), c.last_place());
            } else {
                println!("{c}");
            }
        }
    }

    let started = Instant::now();
    let tallies = if config.parallel_tally {
        tally_parties_parallel(&constituencies)
    } else {
        tally_parties(&constituencies)
    };
    info!(
        "tallied {} parties in {:?} (parallel={})",
        tallies.len(),
        started.elapsed(),
        config.parallel_tally
    );
    println!();
    println!("Produced party result for {} parties", tallies.len());
    println!();
    println!(
        "Parties with a win or {} votes:",
        config.tally_min_votes
    );
    for tally in ranked_tallies(tallies)
        .into_iter()
        .filter(|t| t.wins > 0 || t.votes >= config.tally_min_votes)
    {
        println!("{tally}");
    }

    let dump_path = config.dump_path();
    match export_augmented_csv(
        &dump_path,
        &constituencies,
        &config.tables.parties,
        config.encoding,
        config.dump_row_limit,
    ) {
        Ok(report) => {
            println!();
            println!(
                "Augmented CSV file produced in file: {} ({} rows)",
                report.path.display(),
                report.rows
            );
        }
        Err(err) => {
            error!("{err}");
            println!();
            println!("No augmented CSV file produced");
        }
    }

    Ok(())
}
