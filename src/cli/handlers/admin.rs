//! Administrator handlers
//!
//! Each one runs inside a login/logout pair, so the audit log shows who ran
//! what from where.

use super::common::{HandlerContext, parse_ticket_id};
use crate::cli::AdminArgs;
use crate::cli::output::{OutputFormatter, cell};
use crate::core::Priority;
use crate::error::Result;
use crate::lifecycle::ResolveOutcome;
use serde_json::json;

pub fn handle_resolve(
    ctx: &HandlerContext,
    ticket: &str,
    admin: &AdminArgs,
    formatter: &OutputFormatter,
) -> Result<()> {
    let id = parse_ticket_id(ticket)?;
    let outcome = ctx.with_admin(admin, |session| ctx.manager.resolve(session, id))?;

    let payload = json!({ "ticket_id": id, "result": outcome });
    formatter.emit(&payload, |f| match outcome {
        ResolveOutcome::Requested { audit_recorded } => {
            f.success(&format!("Ticket #{id} marked for resolution"));
            if !audit_recorded {
                f.warning("Activity log could not be updated");
            }
        }
        ResolveOutcome::Suppressed => {
            f.warning(&format!("Ticket #{id} was just resolved; request ignored"));
        }
        ResolveOutcome::AlreadyResolved => f.info(&format!("Ticket #{id} is already resolved")),
    })
}

pub fn handle_priority(
    ctx: &HandlerContext,
    ticket: &str,
    level: &str,
    admin: &AdminArgs,
    formatter: &OutputFormatter,
) -> Result<()> {
    let id = parse_ticket_id(ticket)?;
    let change = ctx.with_admin(admin, |session| {
        ctx.manager.update_priority(session, id, level)
    })?;

    formatter.emit(&change, |f| {
        f.success(&format!(
            "Ticket #{} priority: {} → {}",
            change.ticket_id,
            Priority::label(change.old),
            change.new
        ));
        if !change.audit_recorded {
            f.warning("Activity log could not be updated");
        }
    })
}

pub fn handle_activity(
    ctx: &HandlerContext,
    limit: Option<usize>,
    admin: &AdminArgs,
    formatter: &OutputFormatter,
) -> Result<()> {
    let mut entries = ctx.with_admin(admin, |session| ctx.manager.activity_log(session))?;
    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    formatter.emit(&entries, |f| {
        if entries.is_empty() {
            f.info("No activity recorded");
            return;
        }
        f.info(&format!(
            "{} {} {} {} {}",
            cell("Time", 19),
            cell("Admin", 12),
            cell("Action", 16),
            cell("Ticket", 7),
            "Details"
        ));
        for entry in &entries {
            let ticket = entry.ticket_id.map(|id| id.to_string()).unwrap_or_default();
            f.info(&format!(
                "{} {} {} {} {}",
                cell(&entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(), 19),
                cell(&entry.actor_username, 12),
                cell(entry.action.code(), 16),
                cell(&ticket, 7),
                entry.detail
            ));
        }
    })
}

pub fn handle_stats(
    ctx: &HandlerContext,
    admin: &AdminArgs,
    formatter: &OutputFormatter,
) -> Result<()> {
    let stats = ctx.with_admin(admin, |session| ctx.manager.queue_stats(session))?;

    formatter.emit(&stats, |f| {
        f.info(&format!("Active tickets:  {}", stats.active));
        f.info(&format!("Pending tickets: {}", stats.pending));
        f.info(&format!("Average wait:    {:.1} hours", stats.average_wait_hours));
        f.info(&format!("Oldest wait:     {:.1} hours", stats.oldest_wait_hours));
        f.info("By priority:");
        for count in &stats.by_priority {
            f.info(&format!("  {} {}", cell(&count.priority, 9), count.count));
        }
    })
}

pub fn handle_history(
    ctx: &HandlerContext,
    email: &str,
    admin: &AdminArgs,
    formatter: &OutputFormatter,
) -> Result<()> {
    let tickets = ctx.with_admin(admin, |session| ctx.manager.customer_history(session, email))?;

    formatter.emit(&tickets, |f| {
        if tickets.is_empty() {
            f.info(&format!("No resolved tickets for {email}"));
            return;
        }
        for t in &tickets {
            let resolved = t
                .resolution
                .as_ref()
                .map(|r| format!("{} by {}", r.resolved_at.format("%Y-%m-%d"), r.resolved_by))
                .unwrap_or_default();
            f.info(&format!(
                "#{} {} {} {}",
                t.id,
                cell(ctx.manager.catalog().display_name(&t.product), 18),
                cell(&resolved, 24),
                t.description
            ));
        }
    })
}

pub fn handle_admin_add(
    ctx: &HandlerContext,
    username: &str,
    password: &str,
    full_name: &str,
    role: &str,
    formatter: &OutputFormatter,
) -> Result<()> {
    let identity = ctx
        .directory
        .add(username, password, full_name, role, ctx.manager.rules())?;

    formatter.emit(&identity, |f| {
        f.success(&format!(
            "Created {} account '{}' ({})",
            identity.role, identity.username, identity.full_name
        ));
    })
}
