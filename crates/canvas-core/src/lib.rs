// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Learning Canvas completion gateway.
//!
//! This crate provides the types shared between the provider transport and
//! the gateway: chat messages, the provider-agnostic request and reply,
//! failure classification, and the adapter traits transports implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{CanvasError, GatewayFailure};
pub use traits::{CompletionTransport, PluginAdapter};
pub use types::{
    ChatMessage, CompletionReply, CompletionRequest, FailureReason, HealthStatus, ReplyChoice,
    Role,
};
