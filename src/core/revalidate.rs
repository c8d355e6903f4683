//! View invalidation signals and navigation
//!
//! Mutations do not render anything themselves; they tell the external
//! rendering/caching layer which cached view to discard, and where to send
//! the client next. The [`RevalidateBus`] decouples the two over a
//! `tokio::sync::broadcast` channel:
//!
//! ```text
//! create/update/delete ──▶ RevalidateBus::invalidate() ──▶ broadcast channel ──▶ cache subscribers
//! ```
//!
//! Publishing is fire-and-forget: with no subscriber attached the signal is
//! dropped silently.

use axum::response::{IntoResponse, Redirect, Response};
use tokio::sync::broadcast;

/// Logical path of the invoice listing view
pub const INVOICES_VIEW: &str = "/dashboard/invoices";

/// Broadcast bus carrying logical view paths to invalidate
#[derive(Clone, Debug)]
pub struct RevalidateBus {
    tx: broadcast::Sender<String>,
}

impl RevalidateBus {
    /// Create a new bus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to invalidation signals
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Request that the cached view at `view` be discarded and recomputed
    /// on next access. Never fails; without subscribers this is a no-op.
    pub fn invalidate(&self, view: &str) {
        match self.tx.send(view.to_string()) {
            Ok(subscribers) => {
                tracing::debug!(view, subscribers, "view invalidated");
            }
            Err(_) => {
                tracing::debug!(view, "view invalidated (no subscribers)");
            }
        }
    }

    /// Number of attached subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for RevalidateBus {
    fn default() -> Self {
        Self::new(64)
    }
}

/// A navigation signal: hand control to the routing layer, pointing the
/// client at `location`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    location: String,
}

impl Navigation {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl IntoResponse for Navigation {
    fn into_response(self) -> Response {
        Redirect::to(&self.location).into_response()
    }
}
