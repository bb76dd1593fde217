//! Core domain types
//!
//! Tickets, their identifiers and priorities, and the builder used to
//! assemble them from partition rows and tests.

mod builders;
mod priority;
mod ticket;

pub use builders::TicketBuilder;
pub use priority::Priority;
pub use ticket::{Resolution, Ticket, TicketId, TicketState, RESOLVED_AT_FORMAT};
