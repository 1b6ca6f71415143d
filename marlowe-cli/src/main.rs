//! Command-line interface for marlowe-log
//!
//! Converts one MARLOWE report log into a JSON and CSV output tree.
//!
//! Usage:
//!   marlowe `<input>` [--config `<file>`] [--output `<dir>`] [--tables `<mode>`]
//!           [--dump-raw] [--ignore-errors] [--strict] [--verbose]

use clap::{Arg, ArgAction, ArgMatches, Command};
use marlowe_config::{ConfigError, Loader, RunOptions};
use marlowe_log::marlowe::pipeline::Converter;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "marlowe=info,marlowe_log=info";
const VERBOSE_FILTER: &str = "marlowe=debug,marlowe_log=debug";

fn main() {
    let matches = Command::new("marlowe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert MARLOWE collision-cascade report logs into JSON and CSV")
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("Path to the report log")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output root directory"),
        )
        .arg(
            Arg::new("tables")
                .long("tables")
                .help("Which CSV tables to write")
                .value_parser(["cascade", "bundled", "both", "none"]),
        )
        .arg(
            Arg::new("dump-raw")
                .long("dump-raw")
                .help("Write the raw text of every block next to its output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ignore-errors")
                .long("ignore-errors")
                .help("Skip blocks that fail their grammar instead of aborting")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Fail on block start lines that are out of order")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log every block")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    let options = load_options(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    });
    debug!(?options, "resolved configuration");
    let input = matches
        .get_one::<String>("input")
        .expect("input is a required argument");

    match Converter::new(options).convert_path(input) {
        Ok(report) => println!("{}: {}", input, report),
        Err(e) => {
            eprintln!("Conversion failed: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults, then `--config`, then individual flags.
fn load_options(matches: &ArgMatches) -> Result<RunOptions, ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(root) = matches.get_one::<String>("output") {
        loader = loader.set_override("output.root", root.as_str())?;
    }
    if let Some(mode) = matches.get_one::<String>("tables") {
        loader = loader.set_override("output.tables", mode.as_str())?;
    }
    if matches.get_flag("dump-raw") {
        loader = loader.set_override("output.dump_raw_blocks", true)?;
    }
    if matches.get_flag("ignore-errors") {
        loader = loader.set_override("parsing.ignore_block_parse_error", true)?;
    }
    if matches.get_flag("strict") {
        loader = loader.set_override("parsing.transitions", "strict")?;
    }
    loader.build()
}
