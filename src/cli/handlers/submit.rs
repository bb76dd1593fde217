//! Customer-facing handlers: submit, status, catalog and account checks

use super::common::{HandlerContext, parse_ticket_id};
use crate::cli::output::OutputFormatter;
use crate::core::TicketState;
use crate::error::{IntakeError, Result};
use crate::lifecycle::SubmitOutcome;
use crate::validation::{Field, SubmissionForm, validate_password, validate_username};
use serde_json::json;

pub fn handle_submit(
    ctx: &HandlerContext,
    form: &SubmissionForm,
    formatter: &OutputFormatter,
) -> Result<()> {
    let outcome = ctx.manager.submit(form)?;
    formatter.emit(&outcome, |f| match &outcome {
        SubmitOutcome::Created { .. } => f.success(&outcome.message()),
        SubmitOutcome::Duplicate { .. } => f.warning(&outcome.message()),
    })
}

pub fn handle_status(
    ctx: &HandlerContext,
    ticket: &str,
    email: &str,
    formatter: &OutputFormatter,
) -> Result<()> {
    let id = parse_ticket_id(ticket)?;
    let report = ctx.manager.status(id, email)?;

    formatter.emit(&report, |f| {
        let t = &report.ticket;
        f.info(&format!("Ticket #{} - {}", t.id, report.state));
        f.info(&format!("  Product:   {}", ctx.manager.catalog().display_name(&t.product)));
        f.info(&format!("  Purchased: {}", t.purchase_date.format("%Y-%m-%d")));
        f.info(&format!("  Issue:     {}", t.description));
        match report.state {
            TicketState::Active => {
                if let Some(position) = report.position {
                    f.info(&format!("  Position:  #{position} in the queue"));
                }
                if let Some(wait) = report.wait_label() {
                    f.info(&format!("  Waiting:   {wait}"));
                }
            }
            TicketState::Resolved => {
                if let Some(resolution) = &t.resolution {
                    f.success(&format!(
                        "  Resolved {} by {}",
                        resolution.resolved_at.format("%Y-%m-%d %H:%M"),
                        resolution.resolved_by
                    ));
                }
            }
            TicketState::Pending => {}
        }
    })
}

pub fn handle_catalog(ctx: &HandlerContext, formatter: &OutputFormatter) -> Result<()> {
    formatter.json(&ctx.manager.catalog_export())
}

/// Runs the account validators without creating anything
pub fn handle_account_check(
    ctx: &HandlerContext,
    username: &str,
    password: &str,
    formatter: &OutputFormatter,
) -> Result<()> {
    let rules = ctx.manager.rules();
    validate_username(username, rules)
        .map_err(|reason| IntakeError::validation(Field::Username, reason))?;
    validate_password(password, rules)
        .map_err(|reason| IntakeError::validation(Field::Password, reason))?;

    formatter.emit(&json!({ "status": "ok", "username": username }), |f| {
        f.success(&format!("Username '{username}' and password are acceptable"));
    })
}
