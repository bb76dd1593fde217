//! Row layout of each partition
//!
//! Pending rows carry the six submission columns. Active rows add priority
//! (`N/A` when unset) and queue-entry time in Unix seconds. Resolved rows add
//! the local resolution timestamp and the resolving admin.

use super::backend::{Row, Table};
use crate::core::{Priority, Resolution, Ticket, TicketId, RESOLVED_AT_FORMAT};
use chrono::{NaiveDate, NaiveDateTime};

const PURCHASE_DATE_FORMAT: &str = "%Y-%m-%d";
const BASE_COLUMNS: usize = 6;
const ACTIVE_COLUMNS: usize = 8;
const RESOLVED_COLUMNS: usize = 10;

/// Leading ticket id of a row, if it has one
pub fn row_id(row: &[String]) -> Option<TicketId> {
    row.first()?.trim().parse().ok()
}

/// Serializes a ticket into the column layout of `table`
pub fn encode(table: Table, ticket: &Ticket) -> Row {
    let mut row = vec![
        ticket.id.to_string(),
        ticket.customer_name.clone(),
        ticket.email.clone(),
        ticket.product.clone(),
        ticket.purchase_date.format(PURCHASE_DATE_FORMAT).to_string(),
        ticket.description.clone(),
    ];

    if matches!(table, Table::Active | Table::Resolved) {
        row.push(Priority::label(ticket.priority).to_string());
        row.push(ticket.queued_at.map(|t| t.to_string()).unwrap_or_default());
    }

    if table == Table::Resolved {
        let (at, by) = ticket.resolution.as_ref().map_or_else(
            || (String::new(), String::new()),
            |r| {
                (
                    r.resolved_at.format(RESOLVED_AT_FORMAT).to_string(),
                    r.resolved_by.clone(),
                )
            },
        );
        row.push(at);
        row.push(by);
    }
    row
}

/// Parses a row of `table`; header and malformed rows yield `None`
pub fn decode(table: Table, row: &[String]) -> Option<Ticket> {
    let min_columns = match table {
        Table::Pending => BASE_COLUMNS,
        Table::Active => ACTIVE_COLUMNS,
        Table::Resolved => RESOLVED_COLUMNS,
        Table::Audit | Table::ResolveClaims => return None,
    };
    if row.len() < min_columns {
        return None;
    }

    let mut ticket = Ticket {
        id: row_id(row)?,
        customer_name: row[1].clone(),
        email: row[2].clone(),
        product: row[3].clone(),
        purchase_date: NaiveDate::parse_from_str(row[4].trim(), PURCHASE_DATE_FORMAT).ok()?,
        description: row[5].clone(),
        priority: None,
        queued_at: None,
        resolution: None,
    };

    if table != Table::Pending {
        ticket.priority = Priority::from_column(&row[6]);
        ticket.queued_at = row[7].trim().parse().ok();
    }

    if table == Table::Resolved {
        ticket.resolution =
            NaiveDateTime::parse_from_str(row[8].trim(), RESOLVED_AT_FORMAT)
                .ok()
                .map(|resolved_at| Resolution {
                    resolved_at,
                    resolved_by: row[9].clone(),
                });
    }
    Some(ticket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TicketBuilder;

    fn sample() -> Ticket {
        TicketBuilder::new()
            .id(TicketId::new(1042))
            .customer_name("Jane Doe")
            .email("jane@example.com")
            .product("laptop")
            .purchase_date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
            .description("Battery drains fast")
            .build()
    }

    #[test]
    fn test_pending_layout() {
        let row = encode(Table::Pending, &sample());
        assert_eq!(
            row,
            ["1042", "Jane Doe", "jane@example.com", "laptop", "2024-03-09", "Battery drains fast"]
        );
        assert_eq!(decode(Table::Pending, &row), Some(sample()));
    }

    #[test]
    fn test_active_layout_with_unset_priority() {
        let mut ticket = sample();
        ticket.queued_at = Some(1_700_000_000);
        let row = encode(Table::Active, &ticket);
        assert_eq!(row[6], "N/A");
        assert_eq!(row[7], "1700000000");
        assert_eq!(decode(Table::Active, &row), Some(ticket));
    }

    #[test]
    fn test_resolved_layout() {
        let at = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let mut ticket = sample();
        ticket.priority = Some(Priority::High);
        ticket.queued_at = Some(10);
        ticket.resolution = Some(Resolution {
            resolved_at: at,
            resolved_by: "admin".into(),
        });
        let row = encode(Table::Resolved, &ticket);
        assert_eq!(row[8], "2025-01-02 03:04:05");
        assert_eq!(decode(Table::Resolved, &row), Some(ticket));
    }

    #[test]
    fn test_header_and_short_rows_skipped() {
        let header = Table::Active.header_row().unwrap();
        assert!(decode(Table::Active, &header).is_none());
        assert!(decode(Table::Active, &["1001".to_string()]).is_none());
        assert_eq!(row_id(&header), None);
        assert_eq!(row_id(&["1001".to_string()]), Some(TicketId::new(1001)));
    }
}
