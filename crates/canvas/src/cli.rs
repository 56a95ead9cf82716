// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line arguments.

use std::path::PathBuf;

use canvas_gateway::{Difficulty, QuestionType};
use clap::{Args, Parser, Subcommand};

/// The Learning Canvas - AI drafting and tutoring from the command line.
#[derive(Parser, Debug)]
#[command(name = "canvas", version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draft assignment questions for a class.
    Draft(DraftArgs),
    /// Ask the tutor for the next hint on a problem.
    Hint(HintArgs),
    /// Draft free-form assignment content.
    Content(ContentArgs),
    /// Check that the AI service is reachable.
    Status(StatusArgs),
}

#[derive(Args, Debug)]
pub struct DraftArgs {
    #[arg(long)]
    pub topic: String,

    /// Grade level, e.g. "5th Grade".
    #[arg(long = "grade")]
    pub grade_level: String,

    /// mcq, short-answer, essay, problem-set or true-false.
    #[arg(long = "type")]
    pub question_type: QuestionType,

    /// easy, medium or hard.
    #[arg(long)]
    pub difficulty: Difficulty,

    /// Number of questions.
    #[arg(long)]
    pub count: Option<u32>,

    /// Approximate word count (essay and short-answer only).
    #[arg(long)]
    pub words: Option<u32>,

    /// What the assignment should focus on.
    #[arg(long)]
    pub description: String,
}

#[derive(Args, Debug)]
pub struct HintArgs {
    #[arg(long)]
    pub question: String,

    /// The problem or assignment the question is about.
    #[arg(long, default_value = "")]
    pub context: String,

    /// JSON file with prior turns: `[{"role": "user", "content": "..."}]`.
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ContentArgs {
    #[arg(long, default_value = "")]
    pub subject: String,

    #[arg(long, default_value = "")]
    pub title: String,

    #[arg(long, default_value = "medium")]
    pub difficulty: Difficulty,

    #[arg(long)]
    pub prompt: String,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Require the provider to echo the probe phrase.
    #[arg(long)]
    pub strict: bool,
}
