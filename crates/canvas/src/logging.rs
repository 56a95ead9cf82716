// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracing subscriber setup.

use std::sync::{Arc, RwLock};

use canvas_security::RedactingWriter;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber, writing redacted output to stderr.
///
/// `RUST_LOG` takes precedence over `log_level`.
pub fn init_tracing(log_level: &str, secrets: Arc<RwLock<Vec<String>>>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(move || RedactingWriter::new(std::io::stderr(), Arc::clone(&secrets)))
        .try_init();

    if let Err(e) = result {
        eprintln!("canvas: logging already initialized: {e}");
    }
}

fn default_directives(log_level: &str) -> String {
    format!("canvas={log_level},warn")
}
