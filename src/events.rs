// Copyright 2026 Prism Contributors
// SPDX-License-Identifier: Apache-2.0

//! Message bus — the shared sink for fetch progress and failures.
//!
//! A `tokio::sync::broadcast` channel carries [`ProviderEvent`] values to
//! any subscriber (CLI spinner, UI layer, logs). When no subscribers exist,
//! events are silently dropped (zero overhead).

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Events emitted while the provider talks to the backend. Serialized to
/// JSON for anything that streams them onward.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProviderEvent {
    /// A fetch began; `what` is a user-facing message ("Fetching runs...").
    FetchStarted { id: u64, what: String },
    /// The fetch with the given id completed and its message can be cleared.
    FetchFinished { id: u64 },
    /// A fetch failed. `what` names the operation, `error` the cause chain.
    FetchFailed { what: String, error: String },
}

/// Broadcast bus for provider events.
///
/// Message ids increase monotonically so subscribers can pair
/// started/finished events.
pub struct MessageBus {
    sender: broadcast::Sender<ProviderEvent>,
    next_id: AtomicU64,
}

impl MessageBus {
    /// Create a bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            next_id: AtomicU64::new(1),
        }
    }

    /// Announce a fetch and return its message id.
    pub fn begin(&self, what: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.emit(ProviderEvent::FetchStarted {
            id,
            what: what.into(),
        });
        id
    }

    /// Clear the message for a completed fetch.
    pub fn finish(&self, id: u64) {
        self.emit(ProviderEvent::FetchFinished { id });
    }

    /// Report a failed fetch.
    pub fn error(&self, what: &str, error: impl Display) {
        self.emit(ProviderEvent::FetchFailed {
            what: what.to_string(),
            error: format!("{error:#}"),
        });
    }

    /// Emit an event to all subscribers. Silently ignores if no subscribers.
    pub fn emit(&self, event: ProviderEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to receive all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.sender.subscribe()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new(64)
    }
}
