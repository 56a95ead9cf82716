// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded retry with exponential backoff.
//!
//! The transport classifies each attempt; this loop only decides whether to
//! re-send. Retryable failures (rate limit, server unavailable, network) are
//! retried up to `max_retries` times with delays of `base * 2^n`; anything
//! else returns immediately. The same request is re-sent on every attempt.

use std::time::Duration;

use canvas_config::model::RetryConfig;
use canvas_core::{CompletionReply, CompletionRequest, CompletionTransport, GatewayFailure};
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::state::CallState;

/// Retry budget and backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub jitter: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `retry_index + 1`, excluding jitter.
    pub fn backoff(&self, retry_index: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry_index);
        self.base_delay.saturating_mul(factor)
    }

    /// Backoff plus a uniform random jitter in `0..=jitter`.
    pub fn delay_for(&self, retry_index: u32) -> Duration {
        let base = self.backoff(retry_index);
        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        if jitter_ms == 0 {
            return base;
        }
        let extra = rand::thread_rng().gen_range(0..=jitter_ms);
        base.saturating_add(Duration::from_millis(extra))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            jitter: Duration::from_millis(config.jitter_ms),
        }
    }
}

/// Sends `request` until it succeeds, fails terminally, or the budget runs out.
///
/// Exhaustion returns the last retryable failure. Cancellation aborts both
/// an in-flight attempt and a pending backoff sleep.
pub async fn send_with_retry(
    transport: &dyn CompletionTransport,
    request: &CompletionRequest,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<CompletionReply, GatewayFailure> {
    let mut retries: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(GatewayFailure::cancelled());
        }

        debug!(state = %CallState::Sending, attempt = retries + 1, "sending completion request");
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(GatewayFailure::cancelled()),
            outcome = transport.send(request) => outcome,
        };

        let failure = match outcome {
            Ok(reply) => return Ok(reply),
            Err(failure) => failure,
        };

        if !failure.is_retryable() {
            debug!(state = %CallState::Failed, reason = %failure.reason, "terminal failure, not retrying");
            return Err(failure);
        }

        if retries >= policy.max_retries {
            warn!(
                state = %CallState::Failed,
                reason = %failure.reason,
                attempts = retries + 1,
                "retry budget exhausted"
            );
            return Err(failure);
        }

        let delay = policy.delay_for(retries);
        retries += 1;
        warn!(
            state = %CallState::Retrying,
            reason = %failure.reason,
            retry = retries,
            max_retries = policy.max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "retrying after transient failure"
        );

        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(GatewayFailure::cancelled()),
            () = tokio::time::sleep(delay) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use canvas_core::{ChatMessage, FailureReason};
    use canvas_test_utils::ScriptedTransport;
    use tokio::time::Instant;

    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "scripted-model".into(),
            messages: vec![ChatMessage::system("s"), ChatMessage::user("u")],
            temperature: 0.2,
            max_tokens: 1500,
        }
    }

    fn gaps(times: &[Instant]) -> Vec<Duration> {
        times.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// The paused clock fires timers on millisecond ticks.
    fn assert_near(actual: Duration, expected: Duration) {
        let tolerance = Duration::from_millis(5);
        assert!(
            actual >= expected && actual <= expected + tolerance,
            "expected ~{expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn default_schedule_is_one_two_four_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    }

    #[test]
    fn backoff_saturates() {
        let policy = RetryPolicy {
            max_retries: 10,
            base_delay: Duration::from_secs(u64::MAX / 2),
            jitter: Duration::ZERO,
        };
        assert_eq!(policy.backoff(40), Duration::MAX);
    }

    #[test]
    fn jitter_stays_in_bounds() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            jitter: Duration::from_millis(50),
        };
        for _ in 0..100 {
            let delay = policy.delay_for(1);
            assert!(delay >= Duration::from_millis(200));
            assert!(delay <= Duration::from_millis(250));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_uses_full_budget_with_exponential_delays() {
        let transport = ScriptedTransport::failing(FailureReason::RateLimited);
        let failure = send_with_retry(
            &transport,
            &request(),
            &RetryPolicy::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert_eq!(failure.reason, FailureReason::RateLimited);
        assert_eq!(transport.attempts().await, 4);
        let gaps = gaps(&transport.attempt_times().await);
        assert_eq!(gaps.len(), 3);
        assert_near(gaps[0], Duration::from_secs(1));
        assert_near(gaps[1], Duration::from_secs(2));
        assert_near(gaps[2], Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_failure_returns_without_delay() {
        let transport = ScriptedTransport::failing(FailureReason::AuthError);
        let started = Instant::now();
        let failure = send_with_retry(
            &transport,
            &request(),
            &RetryPolicy::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert_eq!(failure.reason, FailureReason::AuthError);
        assert_eq!(transport.attempts().await, 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_failures() {
        let transport = ScriptedTransport::new();
        for _ in 0..3 {
            transport.push_failure(FailureReason::ServerUnavailable).await;
        }
        transport.push_reply("recovered").await;

        let reply = send_with_retry(
            &transport,
            &request(),
            &RetryPolicy::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(reply.first_content(), Some("recovered"));
        assert_eq!(transport.attempts().await, 4);
        let sent = transport.requests().await;
        assert!(sent.iter().all(|r| *r == request()), "retries must resend the same request");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_means_single_attempt() {
        let transport = ScriptedTransport::failing(FailureReason::NetworkError);
        let policy = RetryPolicy {
            max_retries: 0,
            ..RetryPolicy::default()
        };
        let failure = send_with_retry(&transport, &request(), &policy, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(failure.reason, FailureReason::NetworkError);
        assert_eq!(transport.attempts().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_backoff() {
        let transport = Arc::new(ScriptedTransport::failing(FailureReason::RateLimited));
        let cancel = CancellationToken::new();

        let task = {
            let transport = Arc::clone(&transport);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                send_with_retry(transport.as_ref(), &request(), &RetryPolicy::default(), &cancel).await
            })
        };

        // First attempt fails immediately; the loop is now in its 1 s backoff.
        tokio::time::sleep(Duration::from_millis(500)).await;
        let before = Instant::now();
        cancel.cancel();
        let failure = task.await.unwrap().unwrap_err();

        assert_eq!(failure, GatewayFailure::cancelled());
        assert_eq!(transport.attempts().await, 1);
        assert!(before.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn cancelled_token_sends_nothing() {
        let transport = ScriptedTransport::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let failure = send_with_retry(&transport, &request(), &RetryPolicy::default(), &cancel)
            .await
            .unwrap_err();
        assert_eq!(failure, GatewayFailure::cancelled());
        assert_eq!(transport.attempts().await, 0);
    }
}
