//! Ticket lifecycle: submission, status lookup and administrative actions
//!
//! [`LifecycleManager`] owns no session state. Who is calling travels in a
//! [`RequestContext`]; the per-ticket resolve cooldown is kept in the store.
//!
//! ```text
//! submit ──> Pending ──(promoter)──> Active ──(resolve command + worker)──> Resolved
//!                                      │
//!                                      └── priority updates in place
//! ```

mod commands;
mod cooldown;

pub use commands::{
    COMMANDS_FILE, CommandSink, DrainReport, FileCommandChannel, ResolutionWorker, ResolveCommand,
};
pub use cooldown::ResolveCooldown;

#[cfg(test)]
pub use commands::MockCommandSink;

use crate::audit::{AuditAction, AuditEntry, AuditLog};
use crate::auth::{AdminDirectory, AdminIdentity};
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::core::{Priority, Ticket, TicketBuilder, TicketId, TicketState};
use crate::error::{IntakeError, Result};
use crate::storage::{Admission, FileBackend, TicketStore};
use crate::validation::{Field, Reason, SubmissionForm, ValidationRules, validate_submission};
use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Upper bound on tickets returned by a customer history lookup
pub const HISTORY_LIMIT: usize = 10;

const SECS_PER_HOUR: f64 = 3600.0;

/// Who is making a request and from where
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    admin: Option<AdminIdentity>,
    origin: Option<String>,
}

impl RequestContext {
    /// A customer or otherwise unauthenticated caller
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn for_admin(admin: AdminIdentity) -> Self {
        Self {
            admin: Some(admin),
            origin: None,
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    #[must_use]
    pub const fn admin(&self) -> Option<&AdminIdentity> {
        self.admin.as_ref()
    }

    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// The admin identity, or `Unauthorized` for anonymous callers
    pub fn require_admin(&self) -> Result<&AdminIdentity> {
        self.admin
            .as_ref()
            .ok_or_else(|| IntakeError::Unauthorized("administrator login required".to_string()))
    }
}

/// Result of a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Created {
        ticket_id: TicketId,
        /// `count(active) + count(pending)` right after the append
        queue_position: usize,
        correction_note: Option<String>,
    },
    /// The customer already has an open ticket for this issue
    Duplicate { existing: TicketId },
}

impl SubmitOutcome {
    #[must_use]
    pub const fn ticket_id(&self) -> TicketId {
        match self {
            Self::Created { ticket_id, .. } => *ticket_id,
            Self::Duplicate { existing } => *existing,
        }
    }

    /// Customer-facing confirmation text
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Created {
                ticket_id,
                queue_position,
                correction_note,
            } => {
                let note = correction_note.as_deref().unwrap_or_default();
                let position = match *queue_position {
                    n if n > 1 => format!("You are approximately #{n} in the queue."),
                    1 => "Your ticket will be processed next!".to_string(),
                    _ => "Your ticket will be processed shortly!".to_string(),
                };
                format!("Ticket #{ticket_id} created successfully!{note} {position}")
            }
            Self::Duplicate { existing } => format!(
                "You already have an open ticket for this issue (#{existing}). \
                 Please wait for resolution or check ticket status."
            ),
        }
    }
}

/// A ticket as seen by its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub state: TicketState,
    pub ticket: Ticket,
    /// 1-based position in the active queue
    pub position: Option<usize>,
    pub waited_secs: Option<i64>,
}

impl StatusReport {
    /// "N minutes" under an hour, otherwise "x.y hours"
    #[must_use]
    pub fn wait_label(&self) -> Option<String> {
        self.waited_secs.map(format_wait)
    }
}

#[allow(clippy::cast_precision_loss)]
fn format_wait(secs: i64) -> String {
    let hours = secs as f64 / SECS_PER_HOUR;
    if hours < 1.0 {
        format!("{:.0} minutes", hours * 60.0)
    } else {
        format!("{hours:.1} hours")
    }
}

/// Result of a resolve request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolveOutcome {
    /// A command was emitted to the resolution worker
    Requested { audit_recorded: bool },
    /// Repeat of a request made within the cooldown window; nothing was done
    Suppressed,
    /// The ticket is already in the resolved partition
    AlreadyResolved,
}

/// Result of a priority update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityChange {
    pub ticket_id: TicketId,
    pub old: Option<Priority>,
    pub new: Priority,
    pub audit_recorded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityCount {
    pub priority: String,
    pub count: usize,
}

/// Snapshot of the active queue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueStats {
    pub active: usize,
    pub pending: usize,
    pub average_wait_hours: f64,
    pub oldest_wait_hours: f64,
    /// Critical first, unset last
    pub by_priority: Vec<PriorityCount>,
}

/// Entry point for every ticket operation
pub struct LifecycleManager {
    store: TicketStore,
    audit: AuditLog,
    catalog: Catalog,
    rules: ValidationRules,
    commands: Arc<dyn CommandSink>,
    cooldown: ResolveCooldown,
}

impl std::fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("store", &self.store)
            .field("catalog", &self.catalog.len())
            .field("cooldown", &self.cooldown.window())
            .finish_non_exhaustive()
    }
}

impl LifecycleManager {
    pub fn new(
        store: TicketStore,
        catalog: Catalog,
        rules: ValidationRules,
        commands: Arc<dyn CommandSink>,
        cooldown_window: Duration,
    ) -> Self {
        let audit = AuditLog::new(Arc::clone(store.backend()));
        Self {
            store,
            audit,
            catalog,
            rules,
            commands,
            cooldown: ResolveCooldown::new(cooldown_window),
        }
    }

    /// Flat-file manager rooted at the configured data directory
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let backend = FileBackend::open(&config.data_dir, config.lock_timeout())?;
        let store = TicketStore::new(Arc::new(backend), config.duplicate_scope);
        let catalog = Catalog::load_or_builtin(config.catalog_path.as_deref())?;
        let channel = FileCommandChannel::new(&config.data_dir, config.lock_timeout());
        Ok(Self::new(
            store,
            catalog,
            config.effective_rules(),
            Arc::new(channel),
            config.resolve_cooldown(),
        ))
    }

    #[must_use]
    pub const fn store(&self) -> &TicketStore {
        &self.store
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Validates and queues a customer submission
    pub fn submit(&self, form: &SubmissionForm) -> Result<SubmitOutcome> {
        self.submit_on(form, Local::now().date_naive())
    }

    /// [`submit`](Self::submit) with an explicit "today" for the date checks
    pub fn submit_on(&self, form: &SubmissionForm, today: NaiveDate) -> Result<SubmitOutcome> {
        let valid = validate_submission(form, &self.catalog, &self.rules, today)?;
        let ticket = TicketBuilder::new()
            .customer_name(valid.name)
            .email(valid.email)
            .product(valid.product)
            .purchase_date(valid.purchase_date)
            .description(valid.description)
            .build();

        match self.store.admit(ticket)? {
            Admission::Duplicate(existing) => {
                info!("Rejected duplicate of ticket #{existing}");
                Ok(SubmitOutcome::Duplicate { existing })
            }
            Admission::Created(ticket) => {
                let queue_position = self.store.count_active()? + self.store.count_pending()?;
                Ok(SubmitOutcome::Created {
                    ticket_id: ticket.id,
                    queue_position,
                    correction_note: valid.correction_note,
                })
            }
        }
    }

    /// Looks up a ticket on behalf of the customer who owns `email`
    pub fn status(&self, id: TicketId, email: &str) -> Result<StatusReport> {
        self.status_at(id, email, Utc::now().timestamp())
    }

    /// [`status`](Self::status) with an explicit clock in Unix seconds
    pub fn status_at(&self, id: TicketId, email: &str, now: i64) -> Result<StatusReport> {
        let denied = || IntakeError::Unauthorized("email does not match this ticket".to_string());

        let active = self.store.scan_active()?;
        if let Some(index) = active.iter().position(|t| t.id == id) {
            let ticket = &active[index];
            if !ticket.email_matches(email) {
                return Err(denied());
            }
            return Ok(StatusReport {
                state: TicketState::Active,
                waited_secs: ticket.waited_secs(now),
                position: Some(index + 1),
                ticket: ticket.clone(),
            });
        }

        match self.store.scan_resolved()?.into_iter().find(|t| t.id == id) {
            Some(ticket) if !ticket.email_matches(email) => Err(denied()),
            Some(ticket) => Ok(StatusReport {
                state: TicketState::Resolved,
                ticket,
                position: None,
                waited_secs: None,
            }),
            None => Err(IntakeError::NotFound(id)),
        }
    }

    /// Asks the resolution worker to close an active ticket
    pub fn resolve(&self, ctx: &RequestContext, id: TicketId) -> Result<ResolveOutcome> {
        let admin = ctx.require_admin()?;

        match self.store.locate(id)? {
            Some((TicketState::Active, _)) => {}
            Some((TicketState::Resolved, _)) => return Ok(ResolveOutcome::AlreadyResolved),
            Some((TicketState::Pending, _)) | None => return Err(IntakeError::NotFound(id)),
        }

        if !self.cooldown.try_claim(&self.store, id)? {
            info!("Suppressed repeat resolve of #{id}");
            return Ok(ResolveOutcome::Suppressed);
        }

        let command = ResolveCommand {
            ticket_id: id,
            admin: admin.username.clone(),
        };
        if let Err(e) = self.commands.send(&command) {
            if let Err(release) = self.cooldown.release(&self.store, id) {
                warn!("Resolve claim for #{id} not released: {release}");
            }
            return Err(e);
        }
        info!("Resolve of #{id} requested by {}", admin.username);

        let entry = AuditEntry::new(&admin.username, &admin.full_name, AuditAction::ResolveTicket)
            .with_ticket(id)
            .with_detail(format!("Ticket #{id} resolved"))
            .with_origin(ctx.origin());
        Ok(ResolveOutcome::Requested {
            audit_recorded: self.record(&entry),
        })
    }

    /// Sets the priority of an active ticket
    pub fn update_priority(
        &self,
        ctx: &RequestContext,
        id: TicketId,
        priority: &str,
    ) -> Result<PriorityChange> {
        let admin = ctx.require_admin()?;
        let new: Priority = priority.parse().map_err(|_| {
            IntakeError::validation(Field::Priority, Reason::InvalidPriority(priority.to_string()))
        })?;

        let old = self.store.update_active_priority(id, new)?;
        let entry = AuditEntry::new(&admin.username, &admin.full_name, AuditAction::ChangePriority)
            .with_ticket(id)
            .with_detail(format!(
                "Priority changed: {} → {new}",
                Priority::label(old)
            ))
            .with_origin(ctx.origin());

        Ok(PriorityChange {
            ticket_id: id,
            old,
            new,
            audit_recorded: self.record(&entry),
        })
    }

    /// Verifies credentials and opens an admin context
    pub fn login(
        &self,
        directory: &dyn AdminDirectory,
        username: &str,
        password: &str,
        origin: Option<&str>,
    ) -> Result<RequestContext> {
        let Some(admin) = directory.verify(username, password)? else {
            warn!("Failed admin login for '{username}'");
            return Err(IntakeError::Unauthorized(
                "invalid administrator credentials".to_string(),
            ));
        };

        let entry = AuditEntry::new(&admin.username, &admin.full_name, AuditAction::Login)
            .with_detail(format!("{} logged in as {}", admin.full_name, admin.role))
            .with_origin(origin);
        self.record(&entry);

        let ctx = RequestContext::for_admin(admin);
        Ok(match origin {
            Some(origin) => ctx.with_origin(origin),
            None => ctx,
        })
    }

    /// Closes an admin context; returns whether the audit entry was stored
    pub fn logout(&self, ctx: &RequestContext) -> Result<bool> {
        let admin = ctx.require_admin()?;
        let entry = AuditEntry::new(&admin.username, &admin.full_name, AuditAction::Logout)
            .with_detail("Admin logged out")
            .with_origin(ctx.origin());
        Ok(self.record(&entry))
    }

    /// Audit entries, newest first
    pub fn activity_log(&self, ctx: &RequestContext) -> Result<Vec<AuditEntry>> {
        ctx.require_admin()?;
        self.audit.entries()
    }

    /// Queue size, wait times and priority mix
    pub fn queue_stats(&self, ctx: &RequestContext) -> Result<QueueStats> {
        self.queue_stats_at(ctx, Utc::now().timestamp())
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn queue_stats_at(&self, ctx: &RequestContext, now: i64) -> Result<QueueStats> {
        ctx.require_admin()?;
        let active = self.store.scan_active()?;
        let pending = self.store.count_pending()?;

        let waits: Vec<f64> = active
            .iter()
            .filter_map(|t| t.waited_secs(now))
            .map(|secs| secs as f64 / SECS_PER_HOUR)
            .collect();
        let average_wait_hours = if waits.is_empty() {
            0.0
        } else {
            waits.iter().sum::<f64>() / waits.len() as f64
        };
        let oldest_wait_hours = waits.iter().copied().fold(0.0, f64::max);

        let mut by_priority: Vec<PriorityCount> = Priority::all()
            .iter()
            .rev()
            .map(|p| PriorityCount {
                priority: p.to_string(),
                count: active.iter().filter(|t| t.priority == Some(*p)).count(),
            })
            .collect();
        by_priority.push(PriorityCount {
            priority: Priority::UNSET.to_string(),
            count: active.iter().filter(|t| t.priority.is_none()).count(),
        });

        Ok(QueueStats {
            active: active.len(),
            pending,
            average_wait_hours,
            oldest_wait_hours,
            by_priority,
        })
    }

    /// Earlier resolved tickets for a customer, oldest first
    pub fn customer_history(&self, ctx: &RequestContext, email: &str) -> Result<Vec<Ticket>> {
        ctx.require_admin()?;
        Ok(self
            .store
            .scan_resolved()?
            .into_iter()
            .filter(|t| t.email_matches(email))
            .take(HISTORY_LIMIT)
            .collect())
    }

    /// Catalog as served to client-side validators
    #[must_use]
    pub fn catalog_export(&self) -> serde_json::Value {
        self.catalog.export()
    }

    fn record(&self, entry: &AuditEntry) -> bool {
        match self.audit.record(entry) {
            Ok(()) => true,
            Err(e) => {
                warn!("Audit entry {} not recorded: {e}", entry.action);
                false
            }
        }
    }
}
