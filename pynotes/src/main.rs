//! # pynotes
//!
//! A CLI tool for counting or removing comments and docstrings in Python files.
//!
//! ## Overview
//!
//! pynotes is built on top of pynoteslib. It reports, per file, every
//! commentary line with its content plus the share of lines and characters
//! that are commentary, or strips that commentary in place while keeping
//! every line number stable.
//!
//! ## Usage
//!
//! ```bash
//! # Count commentary in the current directory
//! pynotes .
//!
//! # Count a single file, as JSON
//! pynotes app.py --output json
//!
//! # Remove commentary (a backup app.py.bak is written first)
//! pynotes app.py --remove
//!
//! # Remove in a tree, keeping every previous backup
//! pynotes src --remove --backup numbered --exclude "**/migrations/**"
//! ```

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use pynoteslib::{
    analyze, analyze_directory, strip, strip_directory, BackupMode, FileFailure, FilterConfig,
    StripOptions,
};
use serde::Serialize;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("pynotes")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Count or remove comments and docstrings in a .py file or a directory of .py files")
        .arg(
            Arg::new("path")
                .help("File or directory to process (defaults to current directory)")
                .default_value("."),
        )
        .arg(
            Arg::new("count")
                .short('c')
                .long("count")
                .action(ArgAction::SetTrue)
                .conflicts_with("remove")
                .help("Count commentary (default)"),
        )
        .arg(
            Arg::new("remove")
                .short('r')
                .long("remove")
                .action(ArgAction::SetTrue)
                .help("Remove commentary in place, writing a backup first"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["table", "json"])
                .default_value("table")
                .help("Output format"),
        )
        .arg(
            Arg::new("include")
                .short('i')
                .long("include")
                .action(ArgAction::Append)
                .help("Include files matching glob pattern"),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Exclude files matching glob pattern"),
        )
        .arg(
            Arg::new("backup")
                .long("backup")
                .value_parser(["overwrite", "numbered"])
                .default_value("overwrite")
                .help("Backup naming: replace <file>.py.bak or keep numbered copies"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet")
                .help("Log classification decisions to stderr"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Only log errors"),
        )
}

/// Install the stderr logger; RUST_LOG takes precedence over the flags
fn init_logging(matches: &ArgMatches) {
    let default_level = if matches.get_flag("verbose") {
        "debug"
    } else if matches.get_flag("quiet") {
        "error"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

/// Build filter config from matches
fn build_filter(matches: &ArgMatches) -> anyhow::Result<FilterConfig> {
    let mut filter = FilterConfig::new();

    if let Some(includes) = matches.get_many::<String>("include") {
        for pattern in includes {
            filter = filter.include(pattern)?;
        }
    }

    if let Some(excludes) = matches.get_many::<String>("exclude") {
        for pattern in excludes {
            filter = filter.exclude(pattern)?;
        }
    }

    Ok(filter)
}

fn build_strip_options(matches: &ArgMatches) -> anyhow::Result<StripOptions> {
    let mode = matches
        .get_one::<String>("backup")
        .map(|s| s.parse::<BackupMode>())
        .transpose()
        .map_err(anyhow::Error::msg)?
        .unwrap_or_default();
    Ok(StripOptions::new().backup(mode))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report_failures(failures: &[FileFailure]) {
    for failure in failures {
        eprintln!("Error: {}: {}", failure.path.display(), failure.error);
    }
}

fn file_name(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Handler for count mode. Returns whether every file was processed.
fn count_handler(path: &Path, matches: &ArgMatches, json: bool) -> anyhow::Result<bool> {
    if path.is_file() {
        let report =
            analyze(path).with_context(|| format!("cannot analyze {}", path.display()))?;
        if json {
            print_json(&report)?;
        } else {
            print!("{}", render::file_report(&report, &file_name(path)));
        }
        return Ok(true);
    }

    let filter = build_filter(matches)?;
    let batch = analyze_directory(path, &filter)?;
    if json {
        print_json(&batch)?;
    } else {
        print!("{}", render::batch_report(&batch, path));
    }
    report_failures(&batch.failures);
    Ok(!batch.has_failures())
}

/// Handler for remove mode. Returns whether every file was processed.
fn remove_handler(path: &Path, matches: &ArgMatches, json: bool) -> anyhow::Result<bool> {
    let options = build_strip_options(matches)?;

    if path.is_file() {
        let report = strip(path, &options)
            .with_context(|| format!("cannot remove commentary from {}", path.display()))?;
        if json {
            print_json(&report)?;
        } else {
            print!("{}", render::strip_report(&report, &file_name(path)));
        }
        return Ok(true);
    }

    let filter = build_filter(matches)?;
    let batch = strip_directory(path, &filter, &options)?;
    if json {
        print_json(&batch)?;
    } else {
        print!("{}", render::strip_batch(&batch, path));
    }
    report_failures(&batch.failures);
    Ok(!batch.has_failures())
}

fn run(matches: &ArgMatches) -> anyhow::Result<bool> {
    let path = matches
        .get_one::<String>("path")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let json = matches
        .get_one::<String>("output")
        .is_some_and(|s| s == "json");
    let remove = matches.get_flag("remove");
    log::debug!(
        "{} {}",
        if remove { "removing commentary in" } else { "counting commentary in" },
        path.display()
    );

    if remove {
        remove_handler(&path, matches, json)
    } else {
        count_handler(&path, matches, json)
    }
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(&matches);

    match run(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
