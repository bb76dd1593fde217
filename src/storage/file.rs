use super::backend::{PartitionBackend, Row, Table};
use super::lock::FileLock;
use crate::error::Result;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

const LOCK_FILE: &str = ".intake.lock";

/// Flat-file backend: one comma-separated file per table inside `dir`
///
/// The file names and column layouts are shared with external worker
/// processes, so they must not change.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
    lock_timeout: Duration,
}

impl FileBackend {
    /// Opens (and creates if needed) the data directory
    pub fn open(dir: impl Into<PathBuf>, lock_timeout: Duration) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, lock_timeout })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path(&self, table: Table) -> PathBuf {
        self.dir.join(table.file_name())
    }

    fn encode(rows: &[&[String]]) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());
        for row in rows {
            writer.write_record(*row)?;
        }
        writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()).into())
    }
}

impl PartitionBackend for FileBackend {
    fn scan(&self, table: Table) -> Result<Vec<Row>> {
        let path = self.path(table);
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut rows = Vec::new();
        for record in reader.records() {
            match record {
                Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => warn!("Skipping unreadable line in {}: {e}", path.display()),
            }
        }
        Ok(rows)
    }

    fn append(&self, table: Table, row: &[String]) -> Result<()> {
        let path = self.path(table);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

        let header = table.header_row();
        let is_new = file.metadata()?.len() == 0;
        let mut rows: Vec<&[String]> = Vec::with_capacity(2);
        if let (true, Some(header)) = (is_new, header.as_ref()) {
            rows.push(header);
        }
        rows.push(row);

        // single write so concurrent appenders never interleave a line
        file.write_all(&Self::encode(&rows)?)?;
        file.sync_data()?;
        Ok(())
    }

    fn replace(&self, table: Table, rows: &[Row]) -> Result<()> {
        let path = self.path(table);
        let temp_path = path.with_extension("csv.tmp");
        let refs: Vec<&[String]> = rows.iter().map(Vec::as_slice).collect();

        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(&Self::encode(&refs)?)?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        debug!("Rewrote {} with {} rows", path.display(), rows.len());
        Ok(())
    }

    fn lock(&self) -> Result<Option<FileLock>> {
        FileLock::acquire(self.dir.join(LOCK_FILE), self.lock_timeout).map(Some)
    }
}
