use super::lock::FileLock;
use crate::error::Result;
use std::fmt;

/// One raw record: the fields of a delimited line, in column order
pub type Row = Vec<String>;

/// Logical tables persisted by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// `[id, name, email, product, purchase_date, description]`
    Pending,
    /// Pending columns plus `[priority, queue_entry_time]`
    Active,
    /// Active columns plus `[resolved_at, resolved_by]`
    Resolved,
    /// `[timestamp, actor_username, actor_name, action, ticket_id, detail, origin_address]`
    Audit,
    /// `[ticket_id, claimed_at]`, open resolve requests in Unix seconds
    ResolveClaims,
}

impl Table {
    /// File name used by the flat-file layout; shared with the external
    /// promoter and resolver processes
    #[must_use]
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Pending => "pending_tickets.csv",
            Self::Active => "customer_support_tickets_updated.csv",
            Self::Resolved => "resolved_tickets.csv",
            Self::Audit => "admin_activity_log.csv",
            Self::ResolveClaims => "resolve_claims.csv",
        }
    }

    /// Header row written when the table is first created
    #[must_use]
    pub const fn header(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Pending => None,
            Self::Active => Some(&[
                "Ticket ID",
                "Customer Name",
                "Customer Email",
                "Product",
                "Purchase Date",
                "Issue Description",
                "Priority",
                "Queue Entry Time",
            ]),
            Self::Resolved => Some(&[
                "Ticket ID",
                "Customer Name",
                "Customer Email",
                "Product",
                "Purchase Date",
                "Issue Description",
                "Priority",
                "Queue Entry Time",
                "Resolved At",
                "Resolved By",
            ]),
            Self::Audit => Some(&[
                "Timestamp",
                "Admin Username",
                "Admin Name",
                "Action",
                "Ticket ID",
                "Details",
                "IP Address",
            ]),
            Self::ResolveClaims => Some(&["Ticket ID", "Claimed At"]),
        }
    }

    /// Header as an owned row
    #[must_use]
    pub fn header_row(&self) -> Option<Row> {
        self.header()
            .map(|cols| cols.iter().map(|c| (*c).to_string()).collect())
    }
}

/// Key-ordered raw storage for the partition tables
///
/// Implementations return rows in insertion order, including any header or
/// malformed rows; interpretation is left to the typed layer. `replace` must
/// be atomic with respect to concurrent `scan` calls.
pub trait PartitionBackend: Send + Sync + fmt::Debug {
    /// All rows of a table; a table that was never written is empty
    fn scan(&self, table: Table) -> Result<Vec<Row>>;

    /// Appends one row, creating the table (with its header) on first use
    fn append(&self, table: Table, row: &[String]) -> Result<()>;

    /// Replaces the whole table with `rows`
    fn replace(&self, table: Table, rows: &[Row]) -> Result<()>;

    /// Cross-process exclusion for mutations, if the medium needs one
    fn lock(&self) -> Result<Option<FileLock>>;
}
