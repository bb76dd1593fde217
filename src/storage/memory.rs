use super::backend::{PartitionBackend, Row, Table};
use super::lock::FileLock;
use crate::error::{IntakeError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// In-memory backend for tests and embedding
///
/// Emulates the flat-file layout (header rows included) so the typed layer
/// behaves identically over both.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<Table, Vec<Row>>>,
    failing: Mutex<HashSet<Table>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write to `table` fail with `StoreUnavailable`
    #[must_use]
    pub fn failing(self, table: Table) -> Self {
        self.failing_guard().insert(table);
        self
    }

    /// Seeds a table with raw rows, bypassing header emulation
    pub fn seed(&self, table: Table, rows: Vec<Row>) {
        self.tables_guard().insert(table, rows);
    }

    fn tables_guard(&self) -> MutexGuard<'_, HashMap<Table, Vec<Row>>> {
        self.tables.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn failing_guard(&self) -> MutexGuard<'_, HashSet<Table>> {
        self.failing.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check_writable(&self, table: Table) -> Result<()> {
        if self.failing_guard().contains(&table) {
            return Err(IntakeError::StoreUnavailable(format!(
                "{} is not writable",
                table.file_name()
            )));
        }
        Ok(())
    }
}

impl PartitionBackend for MemoryBackend {
    fn scan(&self, table: Table) -> Result<Vec<Row>> {
        Ok(self.tables_guard().get(&table).cloned().unwrap_or_default())
    }

    fn append(&self, table: Table, row: &[String]) -> Result<()> {
        self.check_writable(table)?;
        let mut tables = self.tables_guard();
        let rows = tables.entry(table).or_default();
        if rows.is_empty() {
            if let Some(header) = table.header_row() {
                rows.push(header);
            }
        }
        rows.push(row.to_vec());
        Ok(())
    }

    fn replace(&self, table: Table, rows: &[Row]) -> Result<()> {
        self.check_writable(table)?;
        self.tables_guard().insert(table, rows.to_vec());
        Ok(())
    }

    fn lock(&self) -> Result<Option<FileLock>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_emulated_on_first_append() {
        let backend = MemoryBackend::new();
        backend.append(Table::Resolved, &["1001".to_string()]).unwrap();
        let rows = backend.scan(Table::Resolved).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 10);
    }

    #[test]
    fn test_failing_table_rejects_writes() {
        let backend = MemoryBackend::new().failing(Table::Audit);
        assert!(backend.append(Table::Audit, &[]).is_err());
        assert!(backend.append(Table::Pending, &[]).is_ok());
    }
}
