use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use readsupport_core::RequestPayload;
use readsupport_core::consts::STDIN_PATH;
use readsupport_engine::{
    BatchOutcome, ClassifierConfig, ReportOptions, classify_payload, write_report,
};

pub fn run_classify(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .map(String::as_str)
        .unwrap_or(STDIN_PATH);

    let config = match matches.get_one::<String>("config") {
        Some(path) => ClassifierConfig::from_path(Path::new(path))
            .with_context(|| format!("Failed to load classifier config from {}", path))?,
        None => ClassifierConfig::default(),
    };

    let mut payload = RequestPayload::from_path(Path::new(input))
        .with_context(|| format!("Failed to read request payload from {}", input))?;
    if let Some(&strictness) = matches.get_one::<i64>("strictness") {
        payload.strictness = Some(strictness);
    }

    let outcome = match matches.get_one::<usize>("threads") {
        Some(&threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("Failed to build the worker pool")?;
            pool.install(|| classify_payload(payload, &config))
        }
        None => classify_payload(payload, &config),
    }
    .context("Request rejected")?;

    let options = ReportOptions {
        per_allele: matches.get_flag("per-allele"),
    };

    match matches.get_one::<String>("output") {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path))?;
            let mut writer = BufWriter::new(file);
            report(&mut writer, &outcome, &options)?;
            info!("Report written to {}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            report(&mut writer, &outcome, &options)?;
        }
    }

    Ok(())
}

fn report<W: Write>(
    writer: &mut W,
    outcome: &BatchOutcome,
    options: &ReportOptions,
) -> Result<()> {
    write_report(writer, outcome, options).context("Failed to write report")?;
    writer.flush()?;
    Ok(())
}
