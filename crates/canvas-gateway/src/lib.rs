// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion gateway for The Learning Canvas.
//!
//! Turns teacher and student requests into chat-completion calls, retries
//! transient provider failures with exponential backoff, and validates every
//! reply before it reaches the caller.
//!
//! # Components
//!
//! - [`CompletionGateway`] - public operations (drafts, hints, content, probe)
//! - [`request`] - request types validated at construction
//! - [`prompts`] - message builders for each operation
//! - [`retry`] - bounded retry loop and backoff policy
//! - [`validate`] - structure, empty-content and refusal checks

pub mod gateway;
pub mod prompts;
pub mod request;
pub mod retry;
pub mod state;
pub mod validate;

pub use gateway::{
    ApiStatus, CompletionGateway, DOUBT_FALLBACK_MESSAGE, DOUBT_REPHRASE_MESSAGE, GatewayResult,
    Sampling,
};
pub use request::{
    AssignmentDraftBuilder, AssignmentDraftRequest, ContentRequest, Difficulty,
    DoubtResolutionRequest, QuestionType,
};
pub use retry::RetryPolicy;
pub use validate::{Completion, ResponseValidator};
