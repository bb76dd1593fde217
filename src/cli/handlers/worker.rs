//! Operator handlers standing in for the external promoter and resolver

use super::common::{HandlerContext, parse_ticket_id};
use crate::cli::output::OutputFormatter;
use crate::error::Result;
use crate::lifecycle::{FileCommandChannel, ResolutionWorker};
use chrono::{Local, Utc};

pub fn handle_promote(
    ctx: &HandlerContext,
    ticket: &str,
    formatter: &OutputFormatter,
) -> Result<()> {
    let id = parse_ticket_id(ticket)?;
    let ticket = ctx
        .manager
        .store()
        .move_pending_to_active(id, Utc::now().timestamp())?;

    formatter.emit(&ticket, |f| {
        f.success(&format!("Ticket #{} moved to the active queue", ticket.id));
    })
}

pub fn handle_drain(ctx: &HandlerContext, formatter: &OutputFormatter) -> Result<()> {
    let channel = FileCommandChannel::new(ctx.data_dir(), ctx.config.lock_timeout());
    let worker = ResolutionWorker::new(ctx.manager.store(), &channel);
    let report = worker.run_once(Local::now().naive_local())?;

    formatter.emit(&report, |f| {
        if report.resolved.is_empty() && report.skipped.is_empty() {
            f.info("No queued commands");
            return;
        }
        for id in &report.resolved {
            f.success(&format!("Resolved ticket #{id}"));
        }
        for id in &report.skipped {
            f.warning(&format!("Skipped ticket #{id} (missing or already resolved)"));
        }
    })
}
