//! Command handlers, one function per subcommand

mod admin;
mod common;
mod submit;
mod worker;

pub use admin::{
    handle_activity, handle_admin_add, handle_history, handle_priority, handle_resolve,
    handle_stats,
};
pub use common::{HandlerContext, parse_ticket_id};
pub use submit::{handle_account_check, handle_catalog, handle_status, handle_submit};
pub use worker::{handle_drain, handle_promote};
