//! Absence record model loaded from the absence spreadsheet.

use serde::{Deserialize, Serialize};

/// One employee-date pair awaiting a supervisor's decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceRecord {
    pub employee_id: String,
    pub employee_name: String,
    /// Uppercased supervisor name
    pub supervisor: String,
    /// Absence date as `DD/MM/YYYY`
    pub date: String,
    pub weekday: String,
}

impl AbsenceRecord {
    /// Deduplication key shared with the response ledger.
    pub fn key(&self) -> (&str, &str) {
        (&self.employee_id, &self.date)
    }
}
