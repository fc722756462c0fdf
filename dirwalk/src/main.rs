//! # dirwalk
//!
//! A CLI that lists the files of a directory tree after applying layered
//! ignore rules.
//!
//! ## Overview
//!
//! dirwalk is built on top of dirwalklib. It prints the path of every file
//! that survives default ignore patterns, per-directory ignore files and
//! never-ignore overrides, relative to the directory being walked.
//!
//! ## Usage
//!
//! ```bash
//! # Direct children of the current directory
//! dirwalk
//!
//! # Whole tree, with the rules npm uses when publishing a package
//! dirwalk . --recurse --preset npm
//!
//! # Honour .gitignore files, skip logs, but always keep .env.example
//! dirwalk . -r --ignore-file .gitignore -x '*.log' -k .env.example
//!
//! # Rules from a JSON file, output as JSON
//! dirwalk . -r --config walker.json --output json
//!
//! # Fail on the first unreadable directory
//! dirwalk . -r --strict
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use dirwalklib::{DirWalker, WalkOptions, WalkerConfig};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod render;

use render::{render_json, JsonRenderer, OutputMode, TextRenderer};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("dirwalk")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("List directory contents with .gitignore/.npmignore-style filtering")
        .arg(
            Arg::new("path")
                .help("Directory to walk (defaults to current directory)")
                .default_value("."),
        )
        .arg(
            Arg::new("recurse")
                .short('r')
                .long("recurse")
                .visible_alias("recursive")
                .action(ArgAction::SetTrue)
                .help("Descend into subdirectories"),
        )
        .arg(
            Arg::new("sort")
                .short('s')
                .long("sort")
                .action(ArgAction::SetTrue)
                .help("Process each directory's entries in name order"),
        )
        .arg(
            Arg::new("never-ignore")
                .short('k')
                .long("never-ignore")
                .action(ArgAction::Append)
                .help("Always keep basenames matching glob pattern (can be specified multiple times)"),
        )
        .arg(
            Arg::new("default-ignore")
                .short('x')
                .long("default-ignore")
                .action(ArgAction::Append)
                .help("Ignore entries matching glob pattern in every directory"),
        )
        .arg(
            Arg::new("ignore-file")
                .long("ignore-file")
                .action(ArgAction::Append)
                .help("Per-directory ignore file; alternatives separated by commas, e.g. \".npmignore,.gitignore\""),
        )
        .arg(
            Arg::new("preset")
                .long("preset")
                .value_parser(["npm"])
                .help("Start from a built-in rule set"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Load rules from a JSON file (replaces --preset)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Output format"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help("Stop at the first error and exit with a failure status"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log walk decisions to stderr (-v debug, -vv trace)"),
        )
}

/// Initialize tracing; RUST_LOG takes precedence over -v
fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "dirwalk=debug,dirwalklib=debug",
        _ => "dirwalk=trace,dirwalklib=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Build walker config from matches: preset, then config file, then flags
fn build_config(matches: &ArgMatches) -> anyhow::Result<WalkerConfig> {
    let mut config = match matches.get_one::<String>("preset") {
        Some(name) => WalkerConfig::preset(name)?,
        None => WalkerConfig::new(),
    };

    if let Some(path) = matches.get_one::<PathBuf>("config") {
        config = WalkerConfig::from_json_file(path)?;
    }

    if let Some(patterns) = matches.get_many::<String>("never-ignore") {
        for pattern in patterns {
            config = config.never_ignore(pattern)?;
        }
    }

    if let Some(patterns) = matches.get_many::<String>("default-ignore") {
        for pattern in patterns {
            config = config.default_ignore(pattern)?;
        }
    }

    if let Some(specs) = matches.get_many::<String>("ignore-file") {
        for spec in specs {
            config = config.ignore_file(spec);
        }
    }

    Ok(config)
}

/// Extract walk options from matches
fn extract_options(matches: &ArgMatches) -> WalkOptions {
    WalkOptions::new()
        .with_recurse(matches.get_flag("recurse"))
        .with_sort(matches.get_flag("sort"))
}

fn run(matches: &ArgMatches) -> anyhow::Result<ExitCode> {
    let path = matches
        .get_one::<String>("path")
        .map(|s| s.as_str())
        .unwrap_or(".");
    let output: OutputMode = matches
        .get_one::<String>("output")
        .map(|s| s.parse())
        .transpose()
        .map_err(anyhow::Error::msg)?
        .unwrap_or_default();
    let strict = matches.get_flag("strict");

    let config = build_config(matches)?;
    debug!(?config, "walker configured");

    let walker = DirWalker::new(config);
    let options = extract_options(matches);

    let errors = match output {
        OutputMode::Text => {
            let mut renderer = TextRenderer::new(io::stdout().lock(), io::stderr(), strict);
            walker.walk_with(path, options, &mut renderer);
            if let Some(e) = renderer.closed.take() {
                if e.kind() != io::ErrorKind::BrokenPipe {
                    return Err(e).context("failed to write output");
                }
            }
            renderer.errors
        }
        OutputMode::Json => {
            let mut renderer = JsonRenderer::new(strict);
            walker.walk_with(path, options, &mut renderer);
            println!("{}", render_json(&renderer.report)?);
            renderer.report.errors.len()
        }
    };

    if strict && errors > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_tracing(matches.get_count("verbose"));

    match run(&matches) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
