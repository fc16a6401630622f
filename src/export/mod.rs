//! Weekly export of the response ledger.
//!
//! Responses whose timestamp falls inside the Monday 00:00:00 to Sunday 23:59:59 window are
//! written to `respostas_<start>_a_<end>.csv`. Nothing schedules this; callers decide when.

use std::path::Path;

use chrono::{Datelike, Days, NaiveDateTime, NaiveTime, TimeDelta};

use crate::errors::AppError;
use crate::models::{ExportReport, ResponseRecord};
use crate::store::{write_snapshot, ResponseLedger};

/// A Monday-to-Sunday calendar week, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl WeekWindow {
    /// The week containing `reference`.
    pub fn containing(reference: NaiveDateTime) -> Self {
        let offset = reference.weekday().num_days_from_monday() as u64;
        let monday = reference.date() - Days::new(offset);
        let start = monday.and_time(NaiveTime::MIN);
        let end = start + TimeDelta::days(7) - TimeDelta::seconds(1);
        Self { start, end }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn file_name(&self) -> String {
        format!(
            "respostas_{}_a_{}.csv",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }

    /// Records responded to inside this window, in ledger order.
    pub fn select(&self, records: Vec<ResponseRecord>) -> Vec<ResponseRecord> {
        records
            .into_iter()
            .filter(|r| self.contains(r.responded_at))
            .collect()
    }
}

/// Export the week containing `reference` into `export_dir`. An empty ledger writes nothing.
pub fn export_week(
    ledger: &ResponseLedger,
    export_dir: &Path,
    reference: NaiveDateTime,
) -> Result<ExportReport, AppError> {
    let window = WeekWindow::containing(reference);
    let records = ledger.load_all()?;

    let mut report = ExportReport {
        written: false,
        window_start: window.start.date(),
        window_end: window.end.date(),
        file: None,
        records: 0,
    };

    if records.is_empty() {
        tracing::info!("Ledger is empty; skipping weekly export");
        return Ok(report);
    }

    std::fs::create_dir_all(export_dir).map_err(|e| {
        tracing::error!("Failed to create export directory {:?}: {:?}", export_dir, e);
        AppError::Persistence(format!("Failed to create export directory: {}", e))
    })?;

    let selected = window.select(records);
    let path = export_dir.join(window.file_name());
    write_snapshot(&path, &selected)?;

    tracing::info!(
        "Exported {} responses to {}",
        selected.len(),
        path.display()
    );

    report.written = true;
    report.file = Some(path.display().to_string());
    report.records = selected.len();
    Ok(report)
}
