// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The completion gateway: the public operations callers use.
//!
//! Every operation builds its messages, runs them through the retry loop and
//! validates the reply. The gateway holds only immutable configuration, the
//! shared transport and a root cancellation token, so it can serve any number
//! of concurrent calls.

use std::sync::Arc;

use canvas_config::CanvasConfig;
use canvas_core::{
    CanvasError, ChatMessage, CompletionRequest, CompletionTransport, FailureReason,
    GatewayFailure, HealthStatus,
};
use canvas_openrouter::OpenRouterTransport;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::prompts;
use crate::request::{AssignmentDraftRequest, ContentRequest, DoubtResolutionRequest};
use crate::retry::{RetryPolicy, send_with_retry};
use crate::state::CallState;
use crate::validate::{Completion, ResponseValidator};

/// Outcome of every gateway operation.
pub type GatewayResult = Result<Completion, GatewayFailure>;

/// Shown to students when a hint could not be produced for operational reasons.
pub const DOUBT_FALLBACK_MESSAGE: &str =
    "I'm having trouble right now. Please try asking your teacher or classmates for help.";

/// Shown to students when the provider answered but the hint was unusable.
pub const DOUBT_REPHRASE_MESSAGE: &str = "I couldn't come up with a useful hint for that. \
Try rephrasing your question, or ask your teacher or classmates for help.";

/// Sampling parameters for one operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Result of the connectivity probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiStatus {
    pub connected: bool,
    pub model: String,
    pub error: Option<String>,
}

/// Completion gateway over a [`CompletionTransport`].
pub struct CompletionGateway {
    transport: Arc<dyn CompletionTransport>,
    policy: RetryPolicy,
    validator: ResponseValidator,
    assignment: Sampling,
    doubt: Sampling,
    probe: Sampling,
    root: CancellationToken,
}

impl CompletionGateway {
    /// Builds a gateway with the OpenRouter transport described by `config`.
    pub fn from_config(config: &CanvasConfig) -> Result<Self, CanvasError> {
        let transport = OpenRouterTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), config))
    }

    /// Builds a gateway over an arbitrary transport.
    pub fn new(transport: Arc<dyn CompletionTransport>, config: &CanvasConfig) -> Self {
        let gateway = Self {
            policy: RetryPolicy::from(&config.retry),
            validator: ResponseValidator::new(&config.validation.extra_refusal_patterns),
            assignment: Sampling {
                temperature: config.assignment.temperature,
                max_tokens: config.assignment.max_tokens,
            },
            doubt: Sampling {
                temperature: config.doubt.temperature,
                max_tokens: config.doubt.max_tokens,
            },
            probe: Sampling {
                temperature: config.probe.temperature,
                max_tokens: config.probe.max_tokens,
            },
            root: CancellationToken::new(),
            transport,
        };
        info!(
            transport = gateway.transport.name(),
            model = gateway.transport.model(),
            max_retries = gateway.policy.max_retries,
            "completion gateway ready"
        );
        gateway
    }

    /// Model identifier sent with every request.
    pub fn model(&self) -> &str {
        self.transport.model()
    }

    /// Health reported by the underlying transport.
    pub async fn transport_health(&self) -> Result<HealthStatus, CanvasError> {
        self.transport.health_check().await
    }

    /// Drafts assignment content from a teacher's structured request.
    pub async fn generate_assignment_draft(&self, request: &AssignmentDraftRequest) -> GatewayResult {
        self.execute(
            "assignment_draft",
            prompts::assignment_messages(request),
            self.assignment,
        )
        .await
    }

    /// Produces the next hint for a student's doubt.
    ///
    /// Failures keep their reason but always carry a message that points the
    /// student to their teacher or classmates.
    pub async fn resolve_doubt(&self, request: &DoubtResolutionRequest) -> GatewayResult {
        self.execute("doubt_resolution", prompts::doubt_messages(request), self.doubt)
            .await
            .map_err(student_safe)
    }

    /// Drafts free-form content for the assignment calendar.
    pub async fn generate_content(&self, request: &ContentRequest) -> GatewayResult {
        self.execute(
            "content",
            prompts::content_messages(request),
            self.assignment,
        )
        .await
    }

    /// Probes the provider. `connected` is true whenever the round trip
    /// produced a valid completion.
    pub async fn api_status(&self) -> ApiStatus {
        let model = self.model().to_string();
        match self.probe().await {
            Ok(completion) => {
                if !echoes_probe(&completion) {
                    warn!(reply = completion.text(), "probe reply did not echo the expected phrase");
                }
                ApiStatus {
                    connected: true,
                    model,
                    error: None,
                }
            }
            Err(failure) => ApiStatus {
                connected: false,
                model,
                error: Some(failure.message),
            },
        }
    }

    /// Stricter probe: true only when the reply echoes the probe phrase.
    pub async fn check_connection(&self) -> bool {
        matches!(self.probe().await, Ok(completion) if echoes_probe(&completion))
    }

    /// Cancels every in-flight call and releases the transport.
    ///
    /// Calls made after shutdown fail immediately as cancelled.
    pub async fn shutdown(&self) {
        self.root.cancel();
        if let Err(e) = self.transport.shutdown().await {
            warn!(error = %e, "transport shutdown failed");
        }
        info!("completion gateway shut down");
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Builds the exact request an operation would send.
    pub fn completion_request(&self, messages: Vec<ChatMessage>, sampling: Sampling) -> CompletionRequest {
        CompletionRequest {
            model: self.transport.model().to_string(),
            messages,
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
        }
    }

    async fn probe(&self) -> GatewayResult {
        self.execute("probe", prompts::probe_messages(), self.probe).await
    }

    async fn execute(
        &self,
        operation: &'static str,
        messages: Vec<ChatMessage>,
        sampling: Sampling,
    ) -> GatewayResult {
        let call_id = Uuid::new_v4();
        let span = info_span!("completion", %call_id, operation);

        async {
            let request = self.completion_request(messages, sampling);
            let cancel = self.root.child_token();

            let reply =
                match send_with_retry(self.transport.as_ref(), &request, &self.policy, &cancel).await {
                    Ok(reply) => reply,
                    Err(failure) => return Err(failure),
                };

            debug!(state = %CallState::Validating, choices = reply.choices.len(), "validating reply");
            match self.validator.validate(&reply) {
                Ok(completion) => {
                    debug!(state = %CallState::Succeeded, chars = completion.text().len(), "completion accepted");
                    Ok(completion)
                }
                Err(failure) => {
                    warn!(state = %CallState::Failed, reason = %failure.reason, "completion rejected");
                    Err(failure)
                }
            }
        }
        .instrument(span)
        .await
    }
}

fn echoes_probe(completion: &Completion) -> bool {
    completion.text().to_lowercase().contains("successful")
}

fn student_safe(failure: GatewayFailure) -> GatewayFailure {
    let message = match failure.reason {
        FailureReason::EmptyContent | FailureReason::RefusalDetected => DOUBT_REPHRASE_MESSAGE,
        _ => DOUBT_FALLBACK_MESSAGE,
    };
    failure.with_message(message)
}
