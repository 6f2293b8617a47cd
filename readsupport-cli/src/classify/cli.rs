use clap::{Arg, ArgAction, Command, arg, value_parser};

use readsupport_core::consts::STDIN_PATH;

pub const CLASSIFY_CMD: &str = "classify";

pub fn create_classify_cli() -> Command {
    Command::new(CLASSIFY_CMD)
        .author("Databio")
        .about("Classify every read of a JSON request and print the read-support report.")
        .arg(
            Arg::new("input")
                .default_value(STDIN_PATH)
                .help("Request payload (JSON, optionally .gz); '-' reads stdin"),
        )
        .arg(
            arg!(--strictness <STRICTNESS>)
                .required(false)
                .value_parser(value_parser!(i64).range(0..=1))
                .help("0 = lenient, 1 = strict; overrides the payload"),
        )
        .arg(
            arg!(--config <CONFIG>)
                .required(false)
                .help("TOML file with classifier thresholds"),
        )
        .arg(
            arg!(--threads <THREADS>)
                .required(false)
                .value_parser(value_parser!(usize))
                .help("Worker threads (default: one per core)"),
        )
        .arg(
            Arg::new("per-allele")
                .long("per-allele")
                .action(ArgAction::SetTrue)
                .help("Also report strand counts for every alternate"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output path (default: stdout)"),
        )
}
