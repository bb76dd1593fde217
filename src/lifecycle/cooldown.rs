use crate::core::TicketId;
use crate::error::Result;
use crate::storage::TicketStore;
use chrono::Utc;
use std::time::Duration;

/// Suppresses repeated resolve requests for the same ticket
///
/// Claims are kept in the store's resolve-claims table, keyed by ticket id
/// and stamped in Unix seconds. Any process or admin sharing the data
/// directory sees the same claims.
#[derive(Debug, Clone, Copy)]
pub struct ResolveCooldown {
    window: Duration,
}

impl ResolveCooldown {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self { window }
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Claims the ticket unless a claim younger than the window exists
    pub fn try_claim(&self, store: &TicketStore, id: TicketId) -> Result<bool> {
        self.try_claim_at(store, id, Utc::now().timestamp())
    }

    pub fn try_claim_at(&self, store: &TicketStore, id: TicketId, now: i64) -> Result<bool> {
        let window = i64::try_from(self.window.as_secs()).unwrap_or(i64::MAX);
        store.claim_resolve(id, now, window)
    }

    /// Drops a claim whose resolve request did not go through
    pub fn release(&self, store: &TicketStore, id: TicketId) -> Result<()> {
        store.release_resolve(id)
    }
}
