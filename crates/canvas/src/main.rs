// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Learning Canvas - command-line caller for the completion gateway.
//!
//! Exit codes: 0 on success, 1 on a configuration or input error, 2 when the
//! gateway returns a failure.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod cli;
mod commands;
mod logging;
mod output;
mod shutdown;

use std::process::ExitCode;
use std::sync::{Arc, RwLock};

use canvas_config::CanvasConfig;
use canvas_gateway::CompletionGateway;
use canvas_openrouter::API_KEY_ENV;
use canvas_security::RedactingWriter;
use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::output::{Outcome, Printer};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let printer = Printer::new(cli.json, cli.plain);

    let loaded = match &cli.config {
        Some(path) => canvas_config::load_and_validate_path(path),
        None => canvas_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            canvas_config::render_errors(&errors);
            return Outcome::Rejected.into();
        }
    };

    let secrets = Arc::new(RwLock::new(Vec::new()));
    for key in known_secrets(&config) {
        RedactingWriter::<std::io::Stderr>::add_secret(&secrets, key);
    }
    logging::init_tracing(&config.logging.log_level, secrets);

    let gateway = match CompletionGateway::from_config(&config) {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => return printer.rejected(&e.to_string()).into(),
    };
    shutdown::cancel_gateway_on(shutdown::install_signal_handler(), Arc::clone(&gateway));

    let result = match &cli.command {
        Commands::Draft(args) => commands::run_draft(&gateway, args, &printer).await,
        Commands::Hint(args) => commands::run_hint(&gateway, args, &printer).await,
        Commands::Content(args) => commands::run_content(&gateway, args, &printer).await,
        Commands::Status(args) => commands::run_status(&gateway, args, &printer).await,
    };

    match result {
        Ok(outcome) => outcome.into(),
        Err(e) => printer.rejected(&e.to_string()).into(),
    }
}

/// API key values to scrub from log output.
fn known_secrets(config: &CanvasConfig) -> Vec<String> {
    config
        .gateway
        .api_key
        .iter()
        .cloned()
        .chain(std::env::var(API_KEY_ENV).ok())
        .filter(|key| !key.is_empty())
        .collect()
}
