// src/store.rs
// =============================================================================
// Append-only CSV dataset of user records.
//
// File layout:
// - UTF-8 with a byte-order mark (so Excel opens the Chinese text correctly)
// - one header row with the 21 column labels, written when the file is
//   created or found empty
// - one row per record, appended; existing rows are never rewritten
// - every data row ends with one blank column, kept for older consumers of
//   the file that expect it (the header has no such cell)
//
// By default the store never reads the file, it only appends to it.
// open_indexed() additionally loads the uids already present, for runs with
// `skip_recorded` on; rows it can't decode are logged and skipped.
// =============================================================================

use crate::record::{UserRecord, COLUMN_LABELS};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct CsvStore {
    path: PathBuf,
    known_ids: HashSet<String>,
}

impl CsvStore {
    /// Prepares the dataset at `path` for appending
    ///
    /// Creates parent directories but not the file, and never reads it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        debug!(path = %path.display(), "opened dataset");
        Ok(Self {
            path,
            known_ids: HashSet::new(),
        })
    }

    /// Same as open(), plus an index of the uids the file already holds
    pub fn open_indexed(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self::open(path)?;
        if store.path.is_file() {
            store.known_ids = load_known_ids(&store.path)?;
        }
        debug!(path = %store.path.display(), known = store.known_ids.len(), "indexed dataset");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a row for `uid` was written by this store, or was found by
    /// open_indexed()
    pub fn contains(&self, uid: &str) -> bool {
        self.known_ids.contains(uid)
    }

    /// Appends one row, writing the BOM and header first if the file is new
    pub fn append(&mut self, record: &UserRecord) -> Result<()> {
        // Append mode: whatever is already in the file stays untouched
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        // An empty file is a new dataset: BOM first, then the header
        let first_write = file.metadata()?.len() == 0;
        if first_write {
            file.write_all(UTF8_BOM)?;
        }

        // flexible: the header is one cell shorter than the data rows
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(file);
        if first_write {
            writer.write_record(COLUMN_LABELS)?;
        }

        // Data row plus the reserved blank column
        let mut row = record.to_row();
        row.push(String::new());
        writer.write_record(&row)?;

        // Flush now so a crash later in the run doesn't lose this row
        writer
            .flush()
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        self.known_ids.insert(record.id.clone());
        info!(uid = %record.id, screen_name = %record.screen_name, path = %self.path.display(), "user written");
        Ok(())
    }
}

// First column of every data row; the header row is skipped by the reader.
// Rows that aren't valid CSV or UTF-8 are skipped with a warning.
fn load_known_ids(path: &Path) -> Result<HashSet<String>> {
    let file = File::open(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut ids = HashSet::new();
    for (index, row) in reader.byte_records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(path = %path.display(), row = index + 1, error = %e, "unreadable row, ignoring it");
                continue;
            }
        };

        // Only the uid column has to decode; other columns may hold anything
        match row.get(0).map(std::str::from_utf8) {
            Some(Ok(uid)) if !uid.trim().is_empty() => {
                ids.insert(uid.trim().to_string());
            }
            Some(Err(_)) => {
                warn!(path = %path.display(), row = index + 1, "uid is not valid UTF-8, ignoring row");
            }
            _ => {}
        }
    }
    Ok(ids)
}
