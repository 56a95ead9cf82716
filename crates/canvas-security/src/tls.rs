// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound URL policy: remote endpoints must use HTTPS.

use canvas_core::CanvasError;
use tracing::error;

/// Validate an endpoint URL before any request is sent to it.
///
/// - Loopback hosts (127.0.0.0/8, ::1, localhost) are allowed with any scheme.
/// - Remote hosts MUST use HTTPS, since every request carries the API key.
pub fn validate_url(url: &str) -> Result<(), CanvasError> {
    let parsed =
        url::Url::parse(url).map_err(|e| CanvasError::Security(format!("invalid URL: {e}")))?;

    if is_localhost(parsed.host_str().unwrap_or("")) {
        return Ok(());
    }

    if parsed.scheme() != "https" {
        error!(url = %url, "TLS required for remote endpoints");
        return Err(CanvasError::Security(
            "TLS required for remote endpoints -- use HTTPS".to_string(),
        ));
    }

    Ok(())
}

/// Check if a host refers to the local machine.
pub fn is_localhost(host: &str) -> bool {
    matches!(host, "::1" | "[::1]" | "localhost") || host.starts_with("127.")
}
