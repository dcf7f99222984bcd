mod cli;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use bpmn_sbvr::batch::{Batch, read_records};
use bpmn_sbvr::{Options, Shape, StencilMapping, TableLexicon, generate};
use clap::ArgMatches;
use log::warn;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let matches = cli::cli();
    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("rules", sub)) => rules(sub),
        Some(("batch", sub)) => batch(sub),
        _ => unreachable!("a subcommand is required"),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn options(matches: &ArgMatches) -> Options {
    Options {
        include_tags: matches.get_flag("tags"),
        max_resolve_passes: matches
            .get_one::<usize>("passes")
            .copied()
            .unwrap_or(Options::default().max_resolve_passes),
    }
}

fn lexicon(matches: &ArgMatches) -> Result<TableLexicon> {
    match matches.get_one::<PathBuf>("lexicon") {
        Some(path) => TableLexicon::from_path(path)
            .with_context(|| format!("Failed to load lexicon {}", path.display())),
        None => Ok(TableLexicon::english()),
    }
}

fn rules(matches: &ArgMatches) -> Result<()> {
    let input = match (
        matches.get_one::<String>("input"),
        matches.get_one::<PathBuf>("file"),
    ) {
        (Some(input), _) => input.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => unreachable!("input source group is required"),
    };

    let shape = Shape::from_json(&input)?;
    let sbvr = generate(
        &shape,
        &StencilMapping::sap_sam(),
        &lexicon(matches)?,
        &options(matches),
    )?;

    let mut out = io::stdout().lock();
    for line in sbvr.rule_lines() {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;
    for fact in sbvr.vocabulary() {
        writeln!(out, "{fact}")?;
    }

    if !sbvr.unexplained.is_empty() {
        warn!("Unexplained nodes: {}", sbvr.unexplained.join(", "));
    }
    Ok(())
}

fn batch(matches: &ArgMatches) -> Result<()> {
    let path = matches
        .get_one::<PathBuf>("file")
        .context("Missing model records file")?;
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let mut out: Box<dyn Write> = match matches.get_one::<PathBuf>("output") {
        Some(output) => Box::new(BufWriter::new(
            File::create(output)
                .with_context(|| format!("Failed to create {}", output.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let mapping = StencilMapping::sap_sam();
    let lexicon = lexicon(matches)?;
    let options = options(matches);
    let batch = Batch {
        mapping: &mapping,
        lexicon: &lexicon,
        options: &options,
        strict: matches.get_flag("strict"),
    };

    let mut records = vec![];
    let mut failed = 0;
    for (line, record) in read_records(BufReader::new(file)).enumerate() {
        match record {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Skipping record {}: {e}", line + 1);
                failed += 1;
            }
        }
    }

    for result in batch.process_batch(&records) {
        match result {
            Ok(sbvr) => writeln!(out, "{}", serde_json::to_string(&sbvr)?)?,
            Err(_) => failed += 1,
        }
    }
    out.flush()?;

    if failed > 0 {
        warn!("{failed} of {} records failed", records.len() + failed);
    }
    Ok(())
}
