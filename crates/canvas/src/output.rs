// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of gateway results for the terminal or as JSON.

use std::io::IsTerminal;
use std::process::ExitCode;

use canvas_core::FailureReason;
use canvas_gateway::{ApiStatus, GatewayResult};
use serde::Serialize;

/// How a command finished; maps onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Bad configuration or input.
    Rejected,
    /// The gateway returned a failure.
    Failed,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Rejected => ExitCode::from(1),
            Outcome::Failed => ExitCode::from(2),
        }
    }
}

/// JSON shape of a completion result.
#[derive(Debug, Serialize)]
pub struct ResultReport<'a> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
}

/// JSON shape of `canvas status`.
#[derive(Debug, Serialize)]
pub struct StatusReport<'a> {
    pub connected: bool,
    pub model: &'a str,
    pub error: Option<&'a str>,
}

/// Output settings shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    json: bool,
    color: bool,
}

impl Printer {
    pub fn new(json: bool, plain: bool) -> Self {
        Self {
            json,
            color: !plain && !json && std::io::stdout().is_terminal(),
        }
    }

    /// Prints a completion to stdout, or its failure message to stderr.
    pub fn result(&self, result: &GatewayResult) -> Outcome {
        if self.json {
            println!("{}", to_json(&result_report(result)));
        } else {
            match result {
                Ok(completion) => println!("{completion}"),
                Err(failure) => eprintln!("{}", self.error_line(&failure.message)),
            }
        }
        if result.is_ok() {
            Outcome::Success
        } else {
            Outcome::Failed
        }
    }

    pub fn status(&self, status: &ApiStatus) -> Outcome {
        if self.json {
            println!(
                "{}",
                to_json(&StatusReport {
                    connected: status.connected,
                    model: &status.model,
                    error: status.error.as_deref(),
                })
            );
        } else {
            println!("{}", render_status(status, self.color));
        }
        if status.connected {
            Outcome::Success
        } else {
            Outcome::Failed
        }
    }

    /// Reports a configuration or input error.
    pub fn rejected(&self, message: &str) -> Outcome {
        if self.json {
            println!(
                "{}",
                to_json(&ResultReport {
                    ok: false,
                    text: None,
                    reason: None,
                    message: Some(message),
                })
            );
        } else {
            eprintln!("{}", self.error_line(message));
        }
        Outcome::Rejected
    }

    fn error_line(&self, message: &str) -> String {
        if self.color {
            use colored::Colorize;
            format!("{} {message}", "error:".red().bold())
        } else {
            format!("error: {message}")
        }
    }
}

pub fn result_report(result: &GatewayResult) -> ResultReport<'_> {
    match result {
        Ok(completion) => ResultReport {
            ok: true,
            text: Some(completion.text()),
            reason: None,
            message: None,
        },
        Err(failure) => ResultReport {
            ok: false,
            text: None,
            reason: Some(failure.reason),
            message: Some(&failure.message),
        },
    }
}

pub fn render_status(status: &ApiStatus, use_color: bool) -> String {
    let mut lines = vec![
        String::new(),
        "  canvas status".to_string(),
        format!("  {}", "-".repeat(35)),
    ];

    let state = match (status.connected, use_color) {
        (true, true) => {
            use colored::Colorize;
            format!("{} {}", "✓".green(), "connected".green())
        }
        (false, true) => {
            use colored::Colorize;
            format!("{} {}", "✗".red(), "not connected".red())
        }
        (true, false) => "[OK] connected".to_string(),
        (false, false) => "[FAIL] not connected".to_string(),
    };
    lines.push(format!("    State:    {state}"));
    lines.push(format!("    Model:    {}", status.model));
    if let Some(error) = &status.error {
        lines.push(format!("    Error:    {error}"));
    }
    lines.push(String::new());
    lines.join("\n")
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
