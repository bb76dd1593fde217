use super::Priority;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Layout of the `resolved_at` column
pub const RESOLVED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Globally unique, strictly increasing ticket number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(u64);

impl TicketId {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The id that follows this one
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for TicketId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Accepts surrounding whitespace and an optional leading `#`
impl FromStr for TicketId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        digits.parse().map(Self)
    }
}

/// Which partition a ticket currently lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketState {
    Pending,
    Active,
    Resolved,
}

impl fmt::Display for TicketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("Pending"),
            Self::Active => f.write_str("Open"),
            Self::Resolved => f.write_str("Resolved"),
        }
    }
}

/// Terminal attribution stamped by the resolution worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub resolved_at: NaiveDateTime,
    pub resolved_by: String,
}

/// A customer issue report
///
/// Which optional fields are populated depends on the partition the ticket
/// was read from: `queued_at` once active, `resolution` only once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub customer_name: String,
    pub email: String,
    pub product: String,
    pub purchase_date: NaiveDate,
    pub description: String,
    pub priority: Option<Priority>,
    /// Unix seconds at which the ticket entered the active queue
    pub queued_at: Option<i64>,
    pub resolution: Option<Resolution>,
}

impl Ticket {
    /// Case-insensitive comparison against the stored requester email
    #[must_use]
    pub fn email_matches(&self, claimed: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(claimed.trim())
    }

    /// Seconds spent in the active queue as of `now`
    #[must_use]
    pub fn waited_secs(&self, now: i64) -> Option<i64> {
        self.queued_at.map(|entered| (now - entered).max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TicketBuilder;

    #[test]
    fn test_ticket_id_parse() {
        assert_eq!("1001".parse::<TicketId>(), Ok(TicketId::new(1001)));
        assert_eq!(" #1042 ".parse::<TicketId>(), Ok(TicketId::new(1042)));
        assert!("abc".parse::<TicketId>().is_err());
        assert_eq!(TicketId::new(7).next(), TicketId::new(8));
    }

    #[test]
    fn test_email_matches_ignores_case() {
        let ticket = TicketBuilder::new().email("jane.doe@example.com").build();
        assert!(ticket.email_matches("Jane.Doe@Example.com "));
        assert!(!ticket.email_matches("john@example.com"));
    }

    #[test]
    fn test_waited_secs() {
        let ticket = TicketBuilder::new().queued_at(1_000).build();
        assert_eq!(ticket.waited_secs(4_600), Some(3_600));
        assert_eq!(ticket.waited_secs(500), Some(0));
        assert_eq!(TicketBuilder::new().build().waited_secs(10), None);
    }
}
