mod classify;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "readsupport";
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Decide which declared allele each aligned read supports at a small-variant locus.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Log more detail to stderr (-v debug, -vv trace)"),
        )
        .subcommand(classify::cli::create_classify_cli())
}

///
/// Logs go to stderr so they never mix with the protocol on stdout. Without `-v`, `RUST_LOG`
/// decides the level.
///
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(consts::DEFAULT_LOG_LEVEL)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        //
        // CLASSIFY
        //
        Some((classify::cli::CLASSIFY_CMD, matches)) => {
            classify::handlers::run_classify(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_parser_is_well_formed() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_classify_arguments() {
        let matches = build_parser()
            .try_get_matches_from([
                "readsupport",
                "classify",
                "request.json",
                "--strictness",
                "0",
                "--threads",
                "4",
                "--per-allele",
                "-vv",
            ])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 2);

        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, classify::cli::CLASSIFY_CMD);
        assert_eq!(sub.get_one::<String>("input").unwrap(), "request.json");
        assert_eq!(sub.get_one::<i64>("strictness"), Some(&0));
        assert_eq!(sub.get_one::<usize>("threads"), Some(&4));
        assert!(sub.get_flag("per-allele"));
    }

    #[rstest]
    fn test_input_defaults_to_stdin() {
        let matches = build_parser()
            .try_get_matches_from(["readsupport", "classify"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<String>("input").unwrap(), "-");
    }

    #[rstest]
    fn test_strictness_out_of_range_is_rejected() {
        let result =
            build_parser().try_get_matches_from(["readsupport", "classify", "--strictness", "2"]);
        assert!(result.is_err());
    }
}
