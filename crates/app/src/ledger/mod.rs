mod csv;

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use fs2::FileExt;
use gauge_core::{LEDGER_HEADER, LedgerSummary, UsageLogEntry};

use crate::ledger::csv::{encode_row, entry_from_record, parse_records};

pub const ARCHIVE_DIR_NAME: &str = "archive";

/// Append-only CSV ledger of quota snapshots.
///
/// Every write opens and closes the file. `append` and `rotate` also hold an
/// exclusive lock on a `<file>.lock` sibling, so a rotation from another
/// process cannot interleave with an append.
#[derive(Debug)]
pub struct UsageLedger {
    path: PathBuf,
}

impl UsageLedger {
    /// Creates the ledger with its header if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let ledger = Self { path: path.into() };
        if let Some(dir) = ledger.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        ledger.ensure_header()?;
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, entry: &UsageLogEntry) -> io::Result<()> {
        let _lock = self.lock()?;
        self.ensure_header()?;
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(encode_row(entry).as_bytes())?;
        Ok(())
    }

    pub fn rotate(&mut self) -> io::Result<PathBuf> {
        self.rotate_at(Local::now().date_naive())
    }

    /// Moves the current file to `archive/<stem>_<YYYY>-<MM>.csv` and starts
    /// a fresh ledger. Existing archives are never overwritten.
    pub fn rotate_at(&mut self, day: NaiveDate) -> io::Result<PathBuf> {
        let _lock = self.lock()?;
        self.ensure_header()?;
        let archive_dir = self.archive_dir();
        fs::create_dir_all(&archive_dir)?;
        let archive_path = self.free_archive_path(&archive_dir, day);
        fs::rename(&self.path, &archive_path)?;
        self.ensure_header()?;
        tracing::info!(
            ledger = %self.path.display(),
            archive = %archive_path.display(),
            "rotated usage ledger"
        );
        Ok(archive_path)
    }

    pub fn read_all(&self) -> io::Result<Vec<UsageLogEntry>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        let mut records = parse_records(&text).into_iter();
        let Some(header) = records.next() else {
            return Ok(Vec::new());
        };
        let columns: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .map(|(index, name)| (name.trim(), index))
            .collect();
        Ok(records
            .map(|record| entry_from_record(&columns, &record))
            .collect())
    }

    pub fn summarize(&self) -> io::Result<LedgerSummary> {
        let mut summary = LedgerSummary::default();
        for entry in self.read_all()? {
            summary.add(&entry);
        }
        Ok(summary)
    }

    fn ensure_header(&self) -> io::Result<bool> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(mut file) => {
                file.write_all(LEDGER_HEADER.as_bytes())?;
                file.write_all(b"\n")?;
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn lock(&self) -> io::Result<File> {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("ledger"));
        name.push(".lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.path.with_file_name(name))?;
        file.lock_exclusive()?;
        Ok(file)
    }

    fn archive_dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(|dir| dir.join(ARCHIVE_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(ARCHIVE_DIR_NAME))
    }

    fn free_archive_path(&self, archive_dir: &Path, day: NaiveDate) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "ledger".to_string());
        let base = format!("{}_{:04}-{:02}", stem, day.year(), day.month());
        let first = archive_dir.join(format!("{base}.csv"));
        if !first.exists() {
            return first;
        }
        (2u32..)
            .map(|n| archive_dir.join(format!("{base}-{n}.csv")))
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }
}
