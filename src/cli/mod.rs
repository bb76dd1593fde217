//! Command-line interface for ticket-intake
//!
//! Customer commands (`submit`, `status`, `catalog`, `account-check`) need no
//! credentials. Admin commands authenticate with `--user`/`--password`
//! against `admins.csv` in the data directory; each invocation is one
//! audited session. `promote` and `drain` stand in for the external
//! promoter and resolution worker.

pub mod handlers;
pub mod output;

pub use output::OutputFormatter;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ticket-intake", version, about = "Support ticket intake and lifecycle")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the ticket partitions; overrides configuration
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Credentials for administrative commands
#[derive(Args, Debug, Clone)]
pub struct AdminArgs {
    /// Administrator username
    #[arg(long)]
    pub user: String,

    #[arg(long, env = "INTAKE_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Origin address recorded in the audit log
    #[arg(long)]
    pub origin: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a new support ticket
    Submit {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Product name; close misspellings are corrected
        #[arg(long)]
        product: String,

        /// YYYY-MM-DD; day-first and month-first forms are also accepted
        #[arg(long)]
        purchase_date: String,

        #[arg(long)]
        description: String,
    },

    /// Check a ticket's status
    Status {
        ticket: String,

        /// Email the ticket was submitted with
        #[arg(long)]
        email: String,
    },

    /// Ask the resolution worker to resolve an active ticket
    Resolve {
        ticket: String,

        #[command(flatten)]
        admin: AdminArgs,
    },

    /// Set the priority of an active ticket
    Priority {
        ticket: String,

        /// Low, Medium, High or Critical
        level: String,

        #[command(flatten)]
        admin: AdminArgs,
    },

    /// Show the admin activity log, newest first
    Activity {
        /// Show at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,

        #[command(flatten)]
        admin: AdminArgs,
    },

    /// Show queue statistics
    Stats {
        #[command(flatten)]
        admin: AdminArgs,
    },

    /// Show a customer's resolved tickets
    History {
        email: String,

        #[command(flatten)]
        admin: AdminArgs,
    },

    /// Print the product catalog as JSON
    Catalog,

    /// Move a pending ticket into the active queue
    Promote { ticket: String },

    /// Apply queued resolve commands
    Drain,

    /// Create an administrator account
    AdminAdd {
        username: String,

        #[arg(long, env = "INTAKE_NEW_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        full_name: String,

        #[arg(long, default_value = "Admin")]
        role: String,
    },

    /// Check a username and password against the account rules
    AccountCheck {
        username: String,

        #[arg(long)]
        password: String,
    },
}
