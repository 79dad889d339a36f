// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Synchronization primitives used by the process layer.
//!
//! - [`OwnerMutex`]: reentrant mutex owned by a [`ContextId`](crate::ContextId)
//! - [`Signal`]: cumulative counting signal (a counting semaphore)
//! - [`Rendezvous`]: strict meeting point for exactly two parties
//! - [`Stoplight`]: binary red/green gate
//!
//! [`SyncGate`] bundles one of each.

mod gate;
mod owner;
mod rendezvous;
mod signal;
mod stoplight;

pub use gate::SyncGate;
pub use owner::OwnerMutex;
pub use rendezvous::Rendezvous;
pub use signal::Signal;
pub use stoplight::Stoplight;
