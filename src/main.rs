//! ticket-intake - support ticket intake and lifecycle
//!
//! This is the main entry point for the ticket-intake CLI. It parses the
//! command line, sets up logging and dispatches to the command handlers.

use clap::Parser;
use std::process;
use ticket_intake::cli::handlers::{self, HandlerContext};
use ticket_intake::cli::{Cli, Commands, OutputFormatter};
use ticket_intake::error::{IntakeError, Result};
use ticket_intake::validation::SubmissionForm;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    let formatter = OutputFormatter::new(cli.json, cli.no_color);

    if let Err(e) = run(cli, &formatter) {
        handle_error(&e, &formatter);
        process::exit(1);
    }
}

/// Installs logging, opens the desk and runs the requested command
fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    init_logging(cli.verbose);

    let ctx = HandlerContext::new(cli.config.as_deref(), cli.data_dir)?;
    dispatch_command(cli.command, &ctx, formatter)
}

/// Logs go to stderr so `--json` output on stdout stays parseable
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn dispatch_command(
    command: Commands,
    ctx: &HandlerContext,
    formatter: &OutputFormatter,
) -> Result<()> {
    match command {
        Commands::Submit {
            name,
            email,
            product,
            purchase_date,
            description,
        } => {
            let form = SubmissionForm {
                name,
                email,
                product,
                purchase_date,
                description,
            };
            handlers::handle_submit(ctx, &form, formatter)
        },
        Commands::Status { ticket, email } => {
            handlers::handle_status(ctx, &ticket, &email, formatter)
        },
        Commands::Resolve { ticket, admin } => {
            handlers::handle_resolve(ctx, &ticket, &admin, formatter)
        },
        Commands::Priority {
            ticket,
            level,
            admin,
        } => handlers::handle_priority(ctx, &ticket, &level, &admin, formatter),
        Commands::Activity { limit, admin } => {
            handlers::handle_activity(ctx, limit, &admin, formatter)
        },
        Commands::Stats { admin } => handlers::handle_stats(ctx, &admin, formatter),
        Commands::History { email, admin } => {
            handlers::handle_history(ctx, &email, &admin, formatter)
        },
        Commands::Catalog => handlers::handle_catalog(ctx, formatter),
        Commands::Promote { ticket } => handlers::handle_promote(ctx, &ticket, formatter),
        Commands::Drain => handlers::handle_drain(ctx, formatter),
        Commands::AdminAdd {
            username,
            password,
            full_name,
            role,
        } => handlers::handle_admin_add(ctx, &username, &password, &full_name, &role, formatter),
        Commands::AccountCheck { username, password } => {
            handlers::handle_account_check(ctx, &username, &password, formatter)
        },
    }
}

/// Prints an error for the user
///
/// In JSON mode the error is a JSON object on stdout; otherwise a colored
/// message on stderr. Full debug output follows when debug logging is on.
fn handle_error(error: &IntakeError, formatter: &OutputFormatter) {
    formatter.error(&error.to_string());

    if formatter.is_json() {
        let field = match error {
            IntakeError::Validation { field, .. } => Some(field.to_string()),
            _ => None,
        };
        let _ = formatter.json(&serde_json::json!({
            "status": "error",
            "error": error.to_string(),
            "field": field,
            "user_error": error.is_user_error(),
        }));
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        eprintln!("\nDebug information:");
        eprintln!("{error:?}");
    }
}
