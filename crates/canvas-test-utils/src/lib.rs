// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Learning Canvas gateway tests.
//!
//! Provides a scripted transport so gateway behavior can be tested without
//! network access.
//!
//! # Components
//!
//! - [`ScriptedTransport`] - Completion transport that replays queued outcomes

pub mod scripted_transport;

pub use scripted_transport::ScriptedTransport;
