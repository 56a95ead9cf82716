// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-call lifecycle states, recorded as the `state` field of log events.
//!
//! `Idle -> Sending -> {Retrying -> Sending | Validating | Failed}`, then
//! `Validating -> {Succeeded | Failed}`. Nothing outlives the call.

use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CallState {
    Sending,
    Retrying,
    Validating,
    Succeeded,
    Failed,
}
