//! Test fixtures shared across unit tests
//!
//! [`TestDesk`] is a file-backed support desk in a temporary directory;
//! [`memory_manager`] builds one over the in-memory backend with a caller
//! supplied command sink.

#![cfg(test)]

use crate::auth::AdminIdentity;
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::core::TicketId;
use crate::lifecycle::{CommandSink, LifecycleManager, RequestContext, SubmitOutcome};
use crate::storage::{DuplicateScope, MemoryBackend, TicketStore};
use crate::validation::{SubmissionForm, ValidationRules};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Fixed "today" so purchase-date checks are deterministic
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

/// A submission that passes every validator
pub fn sample_form(email: &str, description: &str) -> SubmissionForm {
    SubmissionForm {
        name: "Jane Doe".to_string(),
        email: email.to_string(),
        product: "laptop".to_string(),
        purchase_date: "2025-01-15".to_string(),
        description: description.to_string(),
    }
}

pub fn admin_identity() -> AdminIdentity {
    AdminIdentity {
        username: "manager1".to_string(),
        full_name: "Morgan Lee".to_string(),
        role: "Manager".to_string(),
    }
}

pub fn admin_context() -> RequestContext {
    RequestContext::for_admin(admin_identity()).with_origin("127.0.0.1")
}

/// Manager over a fresh in-memory store
pub fn memory_manager(commands: Arc<dyn CommandSink>) -> (Arc<MemoryBackend>, LifecycleManager) {
    let backend = Arc::new(MemoryBackend::new());
    let store = TicketStore::new(backend.clone(), DuplicateScope::default());
    let manager = LifecycleManager::new(
        store,
        Catalog::builtin(),
        ValidationRules::default(),
        commands,
        Duration::from_secs(60),
    );
    (backend, manager)
}

/// File-backed desk in a temporary data directory
pub struct TestDesk {
    pub temp_dir: TempDir,
    pub data_dir: PathBuf,
    pub manager: LifecycleManager,
}

impl TestDesk {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("data");
        let config = AppConfig {
            data_dir: data_dir.clone(),
            lock_timeout_ms: 2_000,
            ..AppConfig::default()
        };
        let manager = LifecycleManager::from_config(&config).expect("Failed to open desk");
        Self {
            temp_dir,
            data_dir,
            manager,
        }
    }

    /// Submits a valid ticket and returns its id
    pub fn submit(&self, email: &str, description: &str) -> TicketId {
        match self
            .manager
            .submit_on(&sample_form(email, description), today())
            .expect("submission accepted")
        {
            SubmitOutcome::Created { ticket_id, .. } => ticket_id,
            SubmitOutcome::Duplicate { existing } => panic!("unexpected duplicate of #{existing}"),
        }
    }

    /// Submits and promotes a ticket to the active queue
    pub fn submit_active(&self, email: &str, description: &str, queued_at: i64) -> TicketId {
        let id = self.submit(email, description);
        self.manager
            .store()
            .move_pending_to_active(id, queued_at)
            .expect("promotion succeeds");
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desk_creates_data_dir() {
        let desk = TestDesk::new();
        assert!(desk.data_dir.exists());
        let id = desk.submit("jane.doe@gmail.com", "My laptop screen flickers constantly");
        assert_eq!(id, TicketId::new(1001));
    }
}
