// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted completion transport for deterministic testing.
//!
//! `ScriptedTransport` implements `CompletionTransport` by replaying queued
//! outcomes, recording every request it receives and the (tokio) instant of
//! each attempt so tests can assert on retry timing with a paused clock.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use canvas_core::{
    CanvasError, CompletionReply, CompletionRequest, CompletionTransport, FailureReason,
    GatewayFailure, HealthStatus, PluginAdapter,
};

type Outcome = Result<CompletionReply, GatewayFailure>;

/// A transport that returns pre-configured outcomes in FIFO order.
///
/// When the queue is empty the fallback outcome is returned; the default
/// fallback is a reply with the text "mock response".
pub struct ScriptedTransport {
    model: String,
    script: Mutex<VecDeque<Outcome>>,
    fallback: Outcome,
    requests: Mutex<Vec<CompletionRequest>>,
    attempt_times: Mutex<Vec<Instant>>,
}

impl ScriptedTransport {
    /// Create a transport with an empty script.
    pub fn new() -> Self {
        Self {
            model: "scripted-model".to_string(),
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(CompletionReply::text("mock response")),
            requests: Mutex::new(Vec::new()),
            attempt_times: Mutex::new(Vec::new()),
        }
    }

    /// Create a transport that answers every call with `text`.
    pub fn replying(text: &str) -> Self {
        Self::new().with_fallback(Ok(CompletionReply::text(text)))
    }

    /// Create a transport that fails every call with `reason`.
    pub fn failing(reason: FailureReason) -> Self {
        Self::new().with_fallback(Err(GatewayFailure::from_reason(reason)))
    }

    /// Set the model name reported by [`CompletionTransport::model`].
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Set the outcome returned once the script runs out.
    pub fn with_fallback(mut self, outcome: Outcome) -> Self {
        self.fallback = outcome;
        self
    }

    /// Queue a successful reply with a single choice.
    pub async fn push_reply(&self, text: &str) {
        self.push(Ok(CompletionReply::text(text))).await;
    }

    /// Queue a failure carrying the default message for `reason`.
    pub async fn push_failure(&self, reason: FailureReason) {
        self.push(Err(GatewayFailure::from_reason(reason))).await;
    }

    /// Queue an arbitrary outcome.
    pub async fn push(&self, outcome: Outcome) {
        self.script.lock().await.push_back(outcome);
    }

    /// Number of times `send` has been called.
    pub async fn attempts(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Every request received, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    /// The most recent request, if any.
    pub async fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().await.last().cloned()
    }

    /// Instant at which each attempt started.
    pub async fn attempt_times(&self) -> Vec<Instant> {
        self.attempt_times.lock().await.clone()
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted-transport"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, CanvasError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CanvasError> {
        Ok(())
    }
}

#[async_trait]
impl CompletionTransport for ScriptedTransport {
    fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, request: &CompletionRequest) -> Result<CompletionReply, GatewayFailure> {
        self.attempt_times.lock().await.push(Instant::now());
        self.requests.lock().await.push(request.clone());
        let next = self.script.lock().await.pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}
