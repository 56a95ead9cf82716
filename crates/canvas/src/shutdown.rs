// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signal handling: Ctrl+C and SIGTERM cancel the running command.

use std::sync::Arc;

use canvas_gateway::CompletionGateway;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Installs handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is received.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        wait_for_signal().await;
        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Shuts the gateway down once `token` is cancelled, failing in-flight calls fast.
pub fn cancel_gateway_on(token: CancellationToken, gateway: Arc<CompletionGateway>) {
    tokio::spawn(async move {
        token.cancelled().await;
        gateway.shutdown().await;
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!(error = %e, "failed to install SIGTERM handler, listening for Ctrl+C only");
            ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        () = ctrl_c() => {}
        _ = sigterm.recv() => {
            info!("received SIGTERM, cancelling");
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C, cancelling"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use canvas_config::CanvasConfig;
    use canvas_core::GatewayFailure;
    use canvas_test_utils::ScriptedTransport;

    use super::*;

    #[tokio::test]
    async fn cancelled_token_shuts_gateway_down() {
        let transport = Arc::new(ScriptedTransport::new());
        let gateway = Arc::new(CompletionGateway::new(transport, &CanvasConfig::default()));
        let token = CancellationToken::new();

        cancel_gateway_on(token.clone(), Arc::clone(&gateway));
        token.cancel();

        for _ in 0..100 {
            if gateway.is_shut_down() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(gateway.is_shut_down());

        let failure = gateway.check_connection().await;
        assert!(!failure);
        assert_eq!(
            gateway.api_status().await.error,
            Some(GatewayFailure::cancelled().message)
        );
    }
}
