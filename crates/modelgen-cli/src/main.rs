//! modelgen CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use modelgen_cli::{
    Args,
    error_adapter::{render, summary, to_reportables},
};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting modelgen");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = modelgen_cli::run(&args) {
        // Render each diagnostic independently
        let reportables = to_reportables(&err);
        for reportable in &reportables {
            error!("{}", render(reportable));
        }
        error!(summary = summary(&reportables); "Generation failed");

        process::exit(1);
    }

    info!("Completed successfully");
}
