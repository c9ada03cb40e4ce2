//! Auth state-change events.
//!
//! Auth state changes travel over an explicit subscription channel
//! instead of ambient global state: interested parties subscribe, the
//! auth service publishes. The binary attaches a logging subscriber at
//! startup.

use tokio::sync::broadcast;

use terry_store_core::UserId;

const CHANNEL_CAPACITY: usize = 64;

/// A change in authentication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedUp { user_id: UserId },
    SignedIn { user_id: UserId },
    SignedOut { user_id: UserId },
    EmailVerified { user_id: UserId },
}

/// Broadcast channel for auth state changes.
///
/// Cheap to clone; publishing with no subscribers is a no-op.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    tx: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    /// Create a new event channel.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to auth state changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: AuthEvent) {
        // A send error only means nobody is listening right now.
        let _ = self.tx.send(event);
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}
