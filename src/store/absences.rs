//! Absence source: the master spreadsheet of recorded absences.

use std::path::PathBuf;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::errors::AppError;
use crate::models::AbsenceRecord;

/// Required spreadsheet columns, in `AbsenceRecord` field order.
pub const ABSENCE_COLUMNS: [&str; 5] = [
    "Matrícula",
    "Funcionário",
    "Encarregado",
    "Data",
    "Dia da Semana",
];

/// Output format of absence dates.
pub const ABSENCE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Reads absence records from the first worksheet of a spreadsheet.
#[derive(Debug, Clone)]
pub struct AbsenceSource {
    path: PathBuf,
    header_row: usize,
}

impl AbsenceSource {
    pub fn new(path: impl Into<PathBuf>, header_row: usize) -> Self {
        Self {
            path: path.into(),
            header_row,
        }
    }

    /// Load every complete absence row, in sheet order.
    pub fn load_absences(&self) -> Result<Vec<AbsenceRecord>, AppError> {
        if !self.path.exists() {
            return Err(AppError::SourceUnavailable(format!(
                "Absence spreadsheet {} not found",
                self.path.display()
            )));
        }

        let mut workbook = open_workbook_auto(&self.path)?;
        let range = workbook.worksheet_range_at(0).ok_or_else(|| {
            AppError::SourceUnavailable("Absence spreadsheet has no worksheets".to_string())
        })??;

        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let rows = range
            .rows()
            .enumerate()
            .map(|(offset, cells)| (first_row + offset, cells));

        let absences = parse_rows(rows, self.header_row)?;
        tracing::debug!("Loaded {} absences from {:?}", absences.len(), self.path);
        Ok(absences)
    }
}

/// Turn `(sheet row, cells)` pairs into absence records.
///
/// Rows above `header_row` are ignored. Any row missing one of the required values is dropped.
fn parse_rows<'a>(
    rows: impl Iterator<Item = (usize, &'a [Data])>,
    header_row: usize,
) -> Result<Vec<AbsenceRecord>, AppError> {
    let mut columns: Option<[usize; 5]> = None;
    let mut absences = Vec::new();

    for (row_number, cells) in rows {
        if row_number < header_row {
            continue;
        }

        let Some(indexes) = columns else {
            if row_number > header_row {
                return Err(AppError::SourceUnavailable(format!(
                    "Header row {} not found in absence spreadsheet",
                    header_row
                )));
            }
            columns = Some(locate_columns(cells)?);
            continue;
        };

        let values: Vec<Option<&Data>> = indexes
            .iter()
            .map(|&index| cells.get(index).filter(|cell| cell_text(cell).is_some()))
            .collect();

        let [Some(id), Some(name), Some(supervisor), Some(date), Some(weekday)] = values.as_slice() else {
            continue;
        };

        let date = cell_date(date).ok_or_else(|| {
            AppError::SourceUnavailable(format!(
                "Unreadable date {:?} in absence spreadsheet row {}",
                cell_text(date).unwrap_or_default(),
                row_number + 1
            ))
        })?;

        absences.push(AbsenceRecord {
            employee_id: cell_text(id).unwrap_or_default(),
            employee_name: cell_text(name).unwrap_or_default(),
            supervisor: cell_text(supervisor).unwrap_or_default().to_uppercase(),
            date: date.format(ABSENCE_DATE_FORMAT).to_string(),
            weekday: cell_text(weekday).unwrap_or_default(),
        });
    }

    if columns.is_none() {
        return Err(AppError::SourceUnavailable(
            "Absence spreadsheet is empty".to_string(),
        ));
    }

    Ok(absences)
}

fn locate_columns(header: &[Data]) -> Result<[usize; 5], AppError> {
    let mut indexes = [0; 5];
    for (slot, name) in indexes.iter_mut().zip(ABSENCE_COLUMNS) {
        *slot = header
            .iter()
            .position(|cell| cell_text(cell).as_deref() == Some(name))
            .ok_or_else(|| {
                AppError::SourceUnavailable(format!(
                    "Column '{}' missing from absence spreadsheet",
                    name
                ))
            })?;
    }
    Ok(indexes)
}

/// Cell contents as trimmed text; blank and error cells are null.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Data::Int(v) => Some(v.to_string()),
        Data::Float(v) => Some(format_number(*v)),
        Data::DateTime(dt) => Some(format_number(dt.as_f64())),
        Data::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whole numbers render without a fraction so employee ids read `101`, not `101.0`.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => serial_to_date(dt.as_f64()),
        Data::Float(v) => serial_to_date(*v),
        Data::Int(v) => serial_to_date(*v as f64),
        Data::String(s) | Data::DateTimeIso(s) => parse_text_date(s.trim()),
        _ => None,
    }
}

/// Convert an Excel serial (days since 1899-12-30) to a date.
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

/// Parse a textual date, day first.
fn parse_text_date(s: &str) -> Option<NaiveDate> {
    let date_formats = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"];
    for fmt in date_formats.iter() {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    let datetime_formats = [
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}
