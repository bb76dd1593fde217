//! Append-only record of administrative actions
//!
//! Entries are never mutated or deleted. A failed write is reported to the
//! caller, which decides whether to surface it; lifecycle operations never
//! roll back because their audit entry could not be stored.

use crate::core::TicketId;
use crate::error::Result;
use crate::storage::{PartitionBackend, Row, Table};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Timestamp layout of the audit table
pub const AUDIT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder stored when the request origin is unknown
pub const UNKNOWN_ORIGIN: &str = "N/A";

/// Kind of administrative action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    Login,
    Logout,
    ResolveTicket,
    ChangePriority,
    /// Any action code written by another tool
    Other(String),
}

impl AuditAction {
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::ResolveTicket => "RESOLVE_TICKET",
            Self::ChangePriority => "CHANGE_PRIORITY",
            Self::Other(code) => code,
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "LOGIN" => Self::Login,
            "LOGOUT" => Self::Logout,
            "RESOLVE_TICKET" => Self::ResolveTicket,
            "CHANGE_PRIORITY" => Self::ChangePriority,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One audit record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: NaiveDateTime,
    pub actor_username: String,
    pub actor_name: String,
    pub action: AuditAction,
    pub ticket_id: Option<TicketId>,
    pub detail: String,
    pub origin: String,
}

impl AuditEntry {
    /// New entry stamped with the current local time
    pub fn new(
        actor_username: impl Into<String>,
        actor_name: impl Into<String>,
        action: AuditAction,
    ) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            actor_username: actor_username.into(),
            actor_name: actor_name.into(),
            action,
            ticket_id: None,
            detail: String::new(),
            origin: UNKNOWN_ORIGIN.to_string(),
        }
    }

    #[must_use]
    pub const fn with_ticket(mut self, id: TicketId) -> Self {
        self.ticket_id = Some(id);
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Option<&str>) -> Self {
        if let Some(origin) = origin.filter(|o| !o.trim().is_empty()) {
            self.origin = origin.to_string();
        }
        self
    }

    fn to_row(&self) -> Row {
        vec![
            self.timestamp.format(AUDIT_TIME_FORMAT).to_string(),
            self.actor_username.clone(),
            self.actor_name.clone(),
            self.action.code().to_string(),
            self.ticket_id.map(|id| id.to_string()).unwrap_or_default(),
            self.detail.clone(),
            self.origin.clone(),
        ]
    }

    /// Rows with fewer than six columns or an unparseable timestamp are skipped
    fn from_row(row: &[String]) -> Option<Self> {
        if row.len() < 6 {
            return None;
        }
        let timestamp = NaiveDateTime::parse_from_str(row[0].trim(), AUDIT_TIME_FORMAT).ok()?;
        Some(Self {
            timestamp,
            actor_username: row[1].clone(),
            actor_name: row[2].clone(),
            action: AuditAction::from_code(&row[3]),
            ticket_id: row[4].parse().ok(),
            detail: row[5].clone(),
            origin: row
                .get(6)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_ORIGIN.to_string()),
        })
    }
}

/// Audit table accessor
#[derive(Debug, Clone)]
pub struct AuditLog {
    backend: Arc<dyn PartitionBackend>,
}

impl AuditLog {
    pub fn new(backend: Arc<dyn PartitionBackend>) -> Self {
        Self { backend }
    }

    /// Appends one entry
    pub fn record(&self, entry: &AuditEntry) -> Result<()> {
        self.backend.append(Table::Audit, &entry.to_row())
    }

    /// All readable entries, newest first
    pub fn entries(&self) -> Result<Vec<AuditEntry>> {
        let mut entries: Vec<AuditEntry> = self
            .backend
            .scan(Table::Audit)?
            .iter()
            .filter_map(|row| AuditEntry::from_row(row))
            .collect();
        entries.reverse();
        Ok(entries)
    }
}
