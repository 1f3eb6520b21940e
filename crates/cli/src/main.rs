//! Main entry point for the forge CLI.
//!
//! This binary embeds the orchestrator core: it loads the workspace
//! configuration, runs plugin inference, builds the project and task
//! graphs, and drives layered execution.
//!
//! Exit codes: `0` when every task succeeds, `1` when any task fails, `2`
//! on configuration or cycle errors raised before execution, and `130`
//! when the run is interrupted.

#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::panic)]

mod cli;
mod commands;

use clap::Parser;
use std::process;

/// Exit code for configuration and planning errors.
const EXIT_CONFIG_ERROR: i32 = 2;

fn main() {
    let arguments = cli::Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .default_filter_or(if arguments.verbose { "info" } else { "warn" }),
    )
    .format_timestamp(None)
    .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("Failed to initialize async runtime: {error}");
            process::exit(1);
        }
    };

    match runtime.block_on(commands::dispatch(arguments)) {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("Error: {error}");
            process::exit(EXIT_CONFIG_ERROR);
        }
    }
}
