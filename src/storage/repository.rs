use super::backend::{PartitionBackend, Row, Table};
use super::codec::{decode, encode, row_id};
use super::duplicates::{DuplicateScope, description_key};
use super::lock::FileLock;
use super::sequencer;
use crate::core::{Priority, RESOLVED_AT_FORMAT, Ticket, TicketId, TicketState};
use crate::error::{IntakeError, Result};
use chrono::NaiveDateTime;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Result of admitting a new submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Stored in the pending partition under a freshly allocated id
    Created(Ticket),
    /// An open ticket with the same email and description already exists
    Duplicate(TicketId),
}

/// Exclusive right to mutate the partitions
///
/// Holds the in-process gate and, for file backends, the advisory lock.
/// Dropping the guard releases both.
#[derive(Debug)]
pub struct WriteGuard<'a> {
    _file: Option<FileLock>,
    _local: MutexGuard<'a, ()>,
}

/// Typed access to the ticket partitions
///
/// Every call re-reads the partitions it needs; nothing is cached. Reads do
/// not take the write gate, mutations always do.
#[derive(Debug)]
pub struct TicketStore {
    backend: Arc<dyn PartitionBackend>,
    scope: DuplicateScope,
    gate: Mutex<()>,
}

impl TicketStore {
    pub fn new(backend: Arc<dyn PartitionBackend>, scope: DuplicateScope) -> Self {
        Self {
            backend,
            scope,
            gate: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn backend(&self) -> &Arc<dyn PartitionBackend> {
        &self.backend
    }

    #[must_use]
    pub const fn scope(&self) -> DuplicateScope {
        self.scope
    }

    /// Enters the write gate
    pub fn begin(&self) -> Result<WriteGuard<'_>> {
        let local = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        let file = self.backend.lock()?;
        Ok(WriteGuard {
            _file: file,
            _local: local,
        })
    }

    fn scan_table(&self, table: Table) -> Result<Vec<Ticket>> {
        let rows = self.backend.scan(table)?;
        let total = rows.len();
        let tickets: Vec<Ticket> = rows.iter().filter_map(|row| decode(table, row)).collect();
        if tickets.len() < total {
            debug!(
                "Skipped {} non-ticket rows in {}",
                total - tickets.len(),
                table.file_name()
            );
        }
        Ok(tickets)
    }

    pub fn scan_pending(&self) -> Result<Vec<Ticket>> {
        self.scan_table(Table::Pending)
    }

    /// Active tickets in queue order
    pub fn scan_active(&self) -> Result<Vec<Ticket>> {
        self.scan_table(Table::Active)
    }

    pub fn scan_resolved(&self) -> Result<Vec<Ticket>> {
        self.scan_table(Table::Resolved)
    }

    pub fn count_pending(&self) -> Result<usize> {
        Ok(self.scan_pending()?.len())
    }

    pub fn count_active(&self) -> Result<usize> {
        Ok(self.scan_active()?.len())
    }

    /// Finds a ticket by id, searching active, then pending, then resolved
    pub fn locate(&self, id: TicketId) -> Result<Option<(TicketState, Ticket)>> {
        let searches = [
            (TicketState::Active, Table::Active),
            (TicketState::Pending, Table::Pending),
            (TicketState::Resolved, Table::Resolved),
        ];
        for (state, table) in searches {
            if let Some(ticket) = self.scan_table(table)?.into_iter().find(|t| t.id == id) {
                return Ok(Some((state, ticket)));
            }
        }
        Ok(None)
    }

    /// First open ticket with the same email and description key
    pub fn find_duplicate(&self, email: &str, description: &str) -> Result<Option<TicketId>> {
        let key = description_key(description);
        let mut tables = vec![Table::Active];
        if self.scope.includes_pending() {
            tables.push(Table::Pending);
        }

        for table in tables {
            let found = self
                .scan_table(table)?
                .into_iter()
                .find(|t| t.email_matches(email) && description_key(&t.description) == key);
            if let Some(ticket) = found {
                return Ok(Some(ticket.id));
            }
        }
        Ok(None)
    }

    /// One past the highest id in any partition; hold the gate while using it
    pub fn next_id(&self) -> Result<TicketId> {
        let pending = self.backend.scan(Table::Pending)?;
        let active = self.backend.scan(Table::Active)?;
        let resolved = self.backend.scan(Table::Resolved)?;
        Ok(sequencer::next_id([
            pending.as_slice(),
            active.as_slice(),
            resolved.as_slice(),
        ]))
    }

    /// Appends a ticket to the pending partition as-is
    pub fn append_pending(&self, ticket: &Ticket) -> Result<()> {
        let _guard = self.begin()?;
        self.backend
            .append(Table::Pending, &encode(Table::Pending, ticket))
    }

    /// Duplicate check, id allocation and pending append as one step
    ///
    /// The id on `ticket` is ignored and replaced by the allocated one.
    pub fn admit(&self, mut ticket: Ticket) -> Result<Admission> {
        let _guard = self.begin()?;

        if let Some(existing) = self.find_duplicate(&ticket.email, &ticket.description)? {
            debug!("Submission duplicates open ticket #{existing}");
            return Ok(Admission::Duplicate(existing));
        }

        ticket.id = self.next_id()?;
        self.backend
            .append(Table::Pending, &encode(Table::Pending, &ticket))?;
        info!("Ticket #{} queued as pending", ticket.id);
        Ok(Admission::Created(ticket))
    }

    /// Moves a pending ticket to the tail of the active queue
    ///
    /// The ticket is appended to active before it is removed from pending.
    pub fn move_pending_to_active(&self, id: TicketId, queued_at: i64) -> Result<Ticket> {
        let _guard = self.begin()?;

        let pending = self.backend.scan(Table::Pending)?;
        let position = pending
            .iter()
            .position(|row| row_id(row) == Some(id))
            .ok_or(IntakeError::NotFound(id))?;

        let mut row: Row = pending[position].clone();
        row.resize(6, String::new());
        row.push(Priority::UNSET.to_string());
        row.push(queued_at.to_string());
        let ticket = decode(Table::Active, &row).ok_or_else(|| {
            IntakeError::StoreUnavailable(format!("pending row for #{id} is malformed"))
        })?;

        self.backend.append(Table::Active, &row)?;
        let remaining: Vec<Row> = pending
            .into_iter()
            .enumerate()
            .filter_map(|(i, row)| (i != position).then_some(row))
            .collect();
        self.backend.replace(Table::Pending, &remaining)?;

        info!("Ticket #{id} promoted to active");
        Ok(ticket)
    }

    /// Rewrites the priority of one active ticket, returning the old value
    ///
    /// Row order and every other row are preserved verbatim.
    pub fn update_active_priority(
        &self,
        id: TicketId,
        priority: Priority,
    ) -> Result<Option<Priority>> {
        let _guard = self.begin()?;

        let mut rows = self.backend.scan(Table::Active)?;
        let row = rows
            .iter_mut()
            .find(|row| row_id(row) == Some(id) && decode(Table::Active, row).is_some())
            .ok_or(IntakeError::NotFound(id))?;

        let old = Priority::from_column(&row[6]);
        row[6] = priority.to_string();
        self.backend.replace(Table::Active, &rows)?;

        info!("Ticket #{id} priority {} -> {priority}", Priority::label(old));
        Ok(old)
    }

    /// Moves an active ticket to the resolved partition, stamping the resolver
    pub fn mark_resolved(
        &self,
        id: TicketId,
        resolver: &str,
        resolved_at: NaiveDateTime,
    ) -> Result<Ticket> {
        let _guard = self.begin()?;

        let active = self.backend.scan(Table::Active)?;
        let Some(position) = active
            .iter()
            .position(|row| row_id(row) == Some(id) && decode(Table::Active, row).is_some())
        else {
            let resolved = self.scan_table(Table::Resolved)?;
            if resolved.iter().any(|t| t.id == id) {
                return Err(IntakeError::AlreadyResolved(id));
            }
            return Err(IntakeError::NotFound(id));
        };

        let mut row: Row = active[position].clone();
        row.truncate(8);
        row.push(resolved_at.format(RESOLVED_AT_FORMAT).to_string());
        row.push(resolver.to_string());
        let ticket = decode(Table::Resolved, &row).ok_or_else(|| {
            IntakeError::StoreUnavailable(format!("active row for #{id} is malformed"))
        })?;

        self.backend.append(Table::Resolved, &row)?;
        let remaining: Vec<Row> = active
            .into_iter()
            .enumerate()
            .filter_map(|(i, row)| (i != position).then_some(row))
            .collect();
        self.backend.replace(Table::Active, &remaining)?;

        info!("Ticket #{id} resolved by {resolver}");
        Ok(ticket)
    }

    /// Records a resolve request for `id` unless one younger than `window_secs` exists
    ///
    /// Claims live in the store, so every process sharing the data directory
    /// sees them. Expired claims are pruned on the way.
    pub fn claim_resolve(&self, id: TicketId, now: i64, window_secs: i64) -> Result<bool> {
        let _guard = self.begin()?;

        let rows = self.backend.scan(Table::ResolveClaims)?;
        let total = rows.len();
        let mut live: Vec<Row> = rows
            .into_iter()
            .filter(|row| claim_time(row).is_none_or(|at| now - at < window_secs))
            .collect();

        if live
            .iter()
            .any(|row| row_id(row) == Some(id) && claim_time(row).is_some())
        {
            debug!("Resolve of #{id} already claimed");
            if live.len() < total {
                self.backend.replace(Table::ResolveClaims, &live)?;
            }
            return Ok(false);
        }

        if live.is_empty() {
            if let Some(header) = Table::ResolveClaims.header_row() {
                live.push(header);
            }
        }
        live.push(vec![id.to_string(), now.to_string()]);
        self.backend.replace(Table::ResolveClaims, &live)?;
        Ok(true)
    }

    /// Drops the resolve claim for `id`, if any
    pub fn release_resolve(&self, id: TicketId) -> Result<()> {
        let _guard = self.begin()?;

        let rows = self.backend.scan(Table::ResolveClaims)?;
        let total = rows.len();
        let remaining: Vec<Row> = rows
            .into_iter()
            .filter(|row| !(row_id(row) == Some(id) && claim_time(row).is_some()))
            .collect();
        if remaining.len() < total {
            self.backend.replace(Table::ResolveClaims, &remaining)?;
        }
        Ok(())
    }
}

/// Claim timestamp of a resolve-claims row; `None` for the header
fn claim_time(row: &[String]) -> Option<i64> {
    row_id(row)?;
    row.get(1)?.trim().parse().ok()
}
