use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use rusqlite_spatialite::fixtures::{DEFAULT_SHAPEFILE_PATH, brazil_states_import};
use rusqlite_spatialite::walkthrough::{self, Example, RunConfig};
use rusqlite_spatialite::{DEFAULT_EXTENSION_PATH, DatabaseTarget};

#[derive(Debug, Parser)]
#[command(name = "spatialite_app")]
#[command(about = "SQLite + SpatiaLite walkthroughs: a point catalog and a shapefile region lookup")]
struct Cli {
    /// ID of the example to run (1: point catalog, 2: shapefile region lookup).
    #[arg(short = 'i', long = "example-id")]
    example_id: Option<u8>,
    /// Name of the database file (if not provided, in-memory).
    #[arg(short = 'n', long = "db-name")]
    db_name: Option<PathBuf>,
    /// SpatiaLite library to load.
    #[arg(long, env = "SPATIALITE_EXTENSION", default_value = DEFAULT_EXTENSION_PATH)]
    extension: String,
    /// Shapefile imported by example 2, without the .shp extension.
    #[arg(long, default_value = DEFAULT_SHAPEFILE_PATH)]
    shapefile: String,
    /// SRID assigned to the imported shapefile geometries.
    #[arg(long)]
    shapefile_srid: Option<i32>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return exit_for_parse_error(err),
    };

    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // A missing id is reported like any other unknown one.
    let example = Example::try_from(cli.example_id.unwrap_or(0))?;

    let mut config = RunConfig::new(example, DatabaseTarget::from_db_name(cli.db_name));
    config.extension_path = cli.extension;
    config.shapefile = brazil_states_import(cli.shapefile, cli.shapefile_srid);

    walkthrough::run(&config)?;
    Ok(())
}

/// Help wins over any other flag, valid or not; every other parse error exits with 1.
fn exit_for_parse_error(err: clap::Error) -> ExitCode {
    let help = matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion);
    if help {
        let _ = err.print();
        return ExitCode::SUCCESS;
    }
    if help_requested(std::env::args_os().skip(1)) {
        let _ = Cli::command().print_help();
        println!();
        return ExitCode::SUCCESS;
    }

    let _ = err.print();
    ExitCode::FAILURE
}

/// Whether `-h`/`--help` appears as a flag. Scanning stops at `--` and at the
/// first positional argument, since anything from there on is not an option.
fn help_requested<I>(args: I) -> bool
where
    I: IntoIterator<Item = OsString>,
{
    let command = Cli::command();
    let value_flags: Vec<String> = command
        .get_arguments()
        .filter(|arg| arg.get_action().takes_values())
        .flat_map(|arg| {
            let short = arg.get_short().map(|short| format!("-{short}"));
            let long = arg.get_long().map(|long| format!("--{long}"));
            short.into_iter().chain(long)
        })
        .collect();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--" {
            return false;
        }
        if arg == "-h" || arg == "--help" {
            return true;
        }
        if value_flags.iter().any(|flag| arg == flag.as_str()) {
            args.next();
            continue;
        }
        if !arg.to_string_lossy().starts_with('-') {
            return false;
        }
    }
    false
}
