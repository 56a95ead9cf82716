// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Security helpers for the Learning Canvas gateway.
//!
//! Provides secret redaction for log output and the HTTPS policy applied to
//! the provider endpoint.

pub mod redact;
pub mod tls;

pub use redact::{redact, RedactingWriter, REDACTED};
pub use tls::{is_localhost, validate_url};
