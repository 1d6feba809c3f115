//! # The Hamster Command Line Utility
//!
//! Tracks your activities in a local database and registers the time spent in Redmine
//! when an activity linked to a Redmine issue is stopped.
//!
//! ## Configuration
//! Before using the Redmine integration, configure it with your API key:
//! ```bash
//! hamster config update --api-key YOUR_API_KEY --url https://redmine.example.com/ --enable
//! ```
//!
//! ## Usage Examples
//!
//! Start working on one of the issues assigned to you:
//! ```bash
//! hamster start "bug hunting@Hamster" --issue "Fix bug" --activity Development
//! ```
//!
//! Start working on any issue:
//! ```bash
//! hamster start "support@Customer" --issue-id 4711 --activity Support
//! ```
//!
//! Stop, registering the time spent:
//! ```bash
//! hamster stop
//! ```
//!
//! See what you have done today:
//! ```bash
//! hamster status
//! ```
use clap::Parser;
use cli::{Command, Opts};
use commands::{configuration, lookup, start, status, stop};
use env_logger::Env;
use log::debug;
use std::env;
use std::fs::File;
use std::process::exit;

use hamster::{error::HamsterError, ApplicationRuntime};

mod cli;
mod commands;

#[tokio::main]
async fn main() -> Result<(), HamsterError> {
    let opts: Opts = Opts::parse();

    configure_logging(&opts); // Handles the -v option

    match opts.cmd {
        Command::Start(start_opts) => start::execute(start_opts).await?,
        Command::Stop(stop_opts) => stop::execute(stop_opts).await?,
        Command::Status => status::execute()?,
        Command::Issues => lookup::list_issues().await?,
        Command::Activities => lookup::list_activities().await?,
        Command::Check => lookup::check().await?,
        Command::Config(config) => configuration::execute(config.cmd),
    }

    Ok(())
}

/// Creates the runtime, exiting if the configuration or database is unusable
fn get_runtime() -> ApplicationRuntime {
    match ApplicationRuntime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            match err {
                HamsterError::ApplicationConfig { .. } | HamsterError::TomlParse { .. } => {
                    eprintln!(
                        "Unable to read the configuration file: '{err}'. Use 'hamster config update' to create it"
                    );
                }
                _ => {
                    eprintln!("Failed to create runtime: '{err}'");
                }
            }

            exit(1);
        }
    }
}

fn configure_logging(opts: &Opts) {
    let mut tmp_dir = env::temp_dir();
    tmp_dir.push("hamster.log");

    if opts.verbosity.is_some() {
        println!("Logging to {}", &tmp_dir.to_string_lossy());
    }

    let target = match File::create(&tmp_dir) {
        Ok(file) => env_logger::Target::Pipe(Box::new(file)),
        Err(e) => {
            eprintln!("Unable to create {}: {e}", tmp_dir.to_string_lossy());
            env_logger::Target::Stderr
        }
    };

    // If nothing else was specified in RUST_LOG, use 'warn'
    env_logger::Builder::from_env(
        Env::default().default_filter_or(
            opts.verbosity
                .map_or_else(|| "warn".to_string(), |lvl| lvl.to_string()),
        ),
    )
    .target(target)
    .init();
    debug!("Logging started");
}
