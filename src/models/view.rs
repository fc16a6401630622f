//! Response payloads for the review endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AbsenceRecord, ResponseRecord};

/// Where a user stands in the review flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ReviewStatus {
    AwaitingSupervisorSelection,
    Reviewing,
    /// Selection succeeded but every absence already had a response
    NothingPending,
    Complete,
}

/// Snapshot of a review flow rendered to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub state: ReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<String>,
    #[serde(default)]
    pub supervisors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<AbsenceRecord>,
    pub index: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ReviewView {
    /// The supervisor picker, optionally with a message explaining why the user is back there.
    pub fn selection(supervisors: Vec<String>, message: Option<String>) -> Self {
        Self {
            state: ReviewStatus::AwaitingSupervisorSelection,
            supervisor: None,
            supervisors,
            current: None,
            index: 0,
            total: 0,
            message,
        }
    }
}

/// Confirmed absences for one supervisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub supervisor: String,
    pub records: Vec<ResponseRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Outcome of a weekly export run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    pub written: bool,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub records: usize,
}
