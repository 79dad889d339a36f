// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Runtime building blocks for automa processes.
//!
//! - [`context`]: execution context identities and cancellation tokens
//! - [`sync`]: the owner-aware mutex, counting signal, rendezvous and stoplight
//!   composed into a [`SyncGate`](sync::SyncGate)

pub mod context;
pub mod sync;

pub use context::{CancellationToken, ContextId};
pub use sync::SyncGate;
