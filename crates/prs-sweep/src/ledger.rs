//! Result ledger bootstrap.
//!
//! The driver never writes timing rows itself; the sampling executable appends
//! them. This module only guarantees the header exists before the first trial.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use prs_core::errors::{ErrorInfo, SweepError};
use prs_core::size_label;
use serde::{Deserialize, Serialize};

/// Column names shared by every ledger file.
pub const LEDGER_HEADER: [&str; 4] = ["algo", "k", "num_threads", "time"];

/// State of a ledger after [`ensure_ready`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LedgerState {
    /// The file was absent and has been created with a header.
    Created,
    /// The file already existed and was left untouched.
    Present,
}

/// Path of the ledger for one (sweep label, thread count) pair:
/// `<results_dir>/<sweep_label>_<threads>_<size_label>.csv`.
pub fn ledger_path(results_dir: &Path, sweep_label: &str, thread_count: u32, n: u64) -> PathBuf {
    results_dir.join(format!(
        "{}_{}_{}.csv",
        sweep_label,
        thread_count,
        size_label(n)
    ))
}

/// Creates `path` with the ledger header unless it already exists.
///
/// Uses exclusive create so the existence check and the header write are a
/// single step. A missing parent directory is reported, never created.
pub fn ensure_ready(path: &Path) -> Result<LedgerState, SweepError> {
    let file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(LedgerState::Present),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(SweepError::FileSystem(
                ErrorInfo::new("ledger-dir-missing", "ledger directory does not exist")
                    .with_context("path", path.display().to_string())
                    .with_hint("create the results directory before starting the sweep"),
            ))
        }
        Err(err) => return Err(fs_error("ledger-create", path, err)),
    };
    write_header(path, file)?;
    Ok(LedgerState::Created)
}

fn write_header(path: &Path, file: File) -> Result<(), SweepError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    writer
        .write_record(LEDGER_HEADER)
        .map_err(|err| fs_error("ledger-write-header", path, err))?;
    let file = writer
        .into_inner()
        .map_err(|err| fs_error("ledger-flush", path, err))?;
    file.sync_all()
        .map_err(|err| fs_error("ledger-sync", path, err))
}

/// Number of data rows currently in the ledger, header excluded.
///
/// Rows come from an external program, so neither record length nor
/// encoding is enforced; a crashed child may leave a partial or binary row.
pub fn count_rows(path: &Path) -> Result<u64, SweepError> {
    if !path.exists() {
        return Ok(0);
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|err| fs_error("ledger-open", path, err))?;
    let mut rows = 0;
    for record in reader.byte_records() {
        record.map_err(|err| fs_error("ledger-read", path, err))?;
        rows += 1;
    }
    Ok(rows)
}

fn fs_error(code: &str, path: &Path, err: impl ToString) -> SweepError {
    SweepError::FileSystem(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}
