use super::backend::Row;
use super::codec::row_id;
use crate::core::TicketId;

/// First id ever issued on an empty store
pub const MIN_TICKET_ID: u64 = 1001;

/// Next id after every id found in `partitions`
///
/// Rows whose first column is not numeric (headers, corrupt lines) are
/// ignored. Callers must hold the write gate between this scan and the
/// append that consumes the id.
pub fn next_id<'a>(partitions: impl IntoIterator<Item = &'a [Row]>) -> TicketId {
    let highest = partitions
        .into_iter()
        .flat_map(|rows| rows.iter().filter_map(|row| row_id(row)))
        .map(|id| id.value())
        .fold(MIN_TICKET_ID - 1, u64::max);
    TicketId::new(highest + 1)
}
