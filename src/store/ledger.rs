//! Response ledger: append-only CSV of supervisor decisions.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::models::ResponseRecord;

/// UTF-8 signature written at the start of every ledger file.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Append-only store of all past decisions.
#[derive(Debug, Clone)]
pub struct ResponseLedger {
    path: PathBuf,
}

impl ResponseLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load every record. A ledger that does not exist yet is empty.
    pub fn load_all(&self) -> Result<Vec<ResponseRecord>, AppError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let bytes = fs::read(&self.path).map_err(|e| {
            tracing::error!("Failed to read ledger {:?}: {:?}", self.path, e);
            AppError::Persistence(format!("Failed to read response ledger: {}", e))
        })?;

        Ok(read_records(
            bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]),
        ))
    }

    /// Append one record, writing the signature and header first when the file is new or empty.
    ///
    /// The record is synced to disk before this returns `Ok`.
    pub fn append(&self, record: &ResponseRecord) -> Result<(), AppError> {
        match write_record(&self.path, record) {
            Ok(()) => {
                tracing::info!(
                    "Saved response: {}, {}, {}",
                    record.employee_id,
                    record.date,
                    record.action.as_str()
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to save response to {:?}: {}", self.path, e);
                Err(AppError::Persistence(format!(
                    "Não foi possível salvar a resposta: {}",
                    e
                )))
            }
        }
    }
}

/// Parse ledger CSV content (without signature).
///
/// Rows that cannot be read are logged and skipped; the rest of the ledger stays usable.
pub fn read_records(data: &[u8]) -> Vec<ResponseRecord> {
    let mut reader = csv::ReaderBuilder::new().from_reader(data);

    reader
        .deserialize::<ResponseRecord>()
        .enumerate()
        .filter_map(|(index, row)| match row {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping malformed ledger row {}: {}", index + 1, e);
                None
            }
        })
        .collect()
}

fn write_record(path: &Path, record: &ResponseRecord) -> csv::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let write_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    if write_header {
        file.write_all(UTF8_BOM)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);
    writer.serialize(record)?;

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_data()?;
    Ok(())
}

/// Write `records` to a fresh CSV file with signature and header.
pub fn write_snapshot(path: &Path, records: &[ResponseRecord]) -> Result<(), AppError> {
    write_snapshot_file(path, records).map_err(|e| {
        tracing::error!("Failed to write {:?}: {}", path, e);
        AppError::Persistence(format!("Failed to write {}: {}", path.display(), e))
    })
}

fn write_snapshot_file(path: &Path, records: &[ResponseRecord]) -> csv::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(crate::models::LEDGER_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
