//! Resolution command channel
//!
//! The intake side never moves a ticket to resolved itself. It emits a
//! `RESOLVE <id> <admin>` line, and a worker drains the channel and applies
//! each command to the store. [`ResolutionWorker`] is the reference worker.

use crate::core::TicketId;
use crate::error::{IntakeError, Result};
use crate::storage::{FileLock, TicketStore};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const COMMANDS_FILE: &str = "admin_commands.txt";
const COMMANDS_LOCK: &str = ".admin_commands.lock";

/// Request for the worker to resolve one active ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveCommand {
    pub ticket_id: TicketId,
    pub admin: String,
}

impl fmt::Display for ResolveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RESOLVE {} {}", self.ticket_id, self.admin)
    }
}

impl FromStr for ResolveCommand {
    type Err = IntakeError;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let (Some("RESOLVE"), Some(id), Some(admin), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(IntakeError::InvalidCommand(line.trim().to_string()));
        };
        let ticket_id = id
            .parse()
            .map_err(|_| IntakeError::InvalidCommand(line.trim().to_string()))?;
        Ok(Self {
            ticket_id,
            admin: admin.to_string(),
        })
    }
}

/// Destination for resolution commands
#[cfg_attr(test, mockall::automock)]
pub trait CommandSink: Send + Sync {
    fn send(&self, command: &ResolveCommand) -> Result<()>;
}

/// Line-oriented command file shared with the worker process
#[derive(Debug, Clone)]
pub struct FileCommandChannel {
    path: PathBuf,
    lock_path: PathBuf,
    lock_timeout: Duration,
}

impl FileCommandChannel {
    pub fn new(data_dir: &Path, lock_timeout: Duration) -> Self {
        Self {
            path: data_dir.join(COMMANDS_FILE),
            lock_path: data_dir.join(COMMANDS_LOCK),
            lock_timeout,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Takes every queued command and empties the channel
    ///
    /// Unparseable lines are dropped with a warning.
    pub fn drain(&self) -> Result<Vec<ResolveCommand>> {
        let _lock = FileLock::acquire(&self.lock_path, self.lock_timeout)?;
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        fs::write(&self.path, "")?;

        let commands = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match line.parse::<ResolveCommand>() {
                Ok(command) => Some(command),
                Err(e) => {
                    warn!("Dropping command line: {e}");
                    None
                }
            })
            .collect();
        Ok(commands)
    }
}

impl CommandSink for FileCommandChannel {
    fn send(&self, command: &ResolveCommand) -> Result<()> {
        let _lock = FileLock::acquire(&self.lock_path, self.lock_timeout)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format!("{command}\n").as_bytes())?;
        debug!("Queued '{command}'");
        Ok(())
    }
}

/// What one drain pass did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    pub resolved: Vec<TicketId>,
    /// Commands for tickets that were missing or already resolved
    pub skipped: Vec<TicketId>,
}

/// Applies queued resolve commands to the store
#[derive(Debug)]
pub struct ResolutionWorker<'a> {
    store: &'a TicketStore,
    channel: &'a FileCommandChannel,
}

impl<'a> ResolutionWorker<'a> {
    pub const fn new(store: &'a TicketStore, channel: &'a FileCommandChannel) -> Self {
        Self { store, channel }
    }

    /// Drains the channel once, stamping each resolution with `now`
    pub fn run_once(&self, now: NaiveDateTime) -> Result<DrainReport> {
        let mut report = DrainReport::default();
        for command in self.channel.drain()? {
            match self.store.mark_resolved(command.ticket_id, &command.admin, now) {
                Ok(_) => report.resolved.push(command.ticket_id),
                Err(IntakeError::NotFound(id) | IntakeError::AlreadyResolved(id)) => {
                    debug!("Skipping resolve for #{id}");
                    report.skipped.push(id);
                }
                Err(e) => return Err(e),
            }
        }
        info!(
            "Drained {} resolved, {} skipped",
            report.resolved.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}
