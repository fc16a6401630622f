//! Sequential review of pending absences.
//!
//! A session is built when a supervisor is selected: every absence for that supervisor minus the
//! ones that already have a response in the ledger. The cursor then moves forward by one for each
//! decision written to the ledger, until it reaches the end of the sequence. Responses written
//! after construction do not filter the sequence again.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{AbsenceRecord, Action, ResponseRecord, ReviewStatus, ReviewView};
use crate::store::ResponseLedger;

/// Minimum justification length, counted in characters after trimming.
pub const MIN_JUSTIFICATION_LEN: usize = 5;

/// Messages shown to the supervisor.
pub mod messages {
    pub const INVALID_SUPERVISOR: &str =
        "Encarregado inválido ou não encontrado. Por favor, selecione na lista.";
    pub const NOTHING_PENDING: &str = "Nenhuma falta pendente para este encarregado.";
    pub const JUSTIFICATION_TOO_SHORT: &str =
        "Justificativa muito curta! Por favor, explique melhor.";
    pub const SESSION_INVALID: &str = "Sessão inválida. Carregue as faltas novamente.";
    pub const LOAD_FIRST: &str = "Por favor, carregue as faltas primeiro.";
    pub const NOTHING_CONFIRMED: &str = "Nenhuma falta confirmada por este encarregado.";
}

/// A decision submitted for the record under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Justify(String),
    Confirm,
    /// Any other action value; it neither writes nor advances.
    Unrecognized(String),
}

impl Decision {
    /// Interpret a submitted action value. The Portuguese form values are accepted too.
    pub fn parse(action: Option<&str>, justification: &str) -> Self {
        match action.map(str::trim) {
            Some("justify") | Some("justificar") => Decision::Justify(justification.to_string()),
            Some("confirm") | Some("confirmar") => Decision::Confirm,
            other => Decision::Unrecognized(other.unwrap_or_default().to_string()),
        }
    }
}

/// What a decision did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionOutcome {
    /// The record was written and the cursor advanced.
    Recorded(ResponseRecord),
    /// Unrecognized action; nothing changed.
    Ignored,
    /// The cursor was already past the last record.
    AlreadyComplete,
}

/// Per-user review state, kept in the session store between requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewSession {
    supervisor: String,
    pending: Vec<AbsenceRecord>,
    cursor: usize,
}

impl ReviewSession {
    /// Start a review for `supervisor_input`.
    ///
    /// The name is matched case-insensitively against the directory. An unknown name is a
    /// validation error and no session is produced.
    pub fn start(
        supervisor_input: &str,
        supervisors: &BTreeSet<String>,
        absences: Vec<AbsenceRecord>,
        responses: &[ResponseRecord],
    ) -> Result<Self, AppError> {
        let supervisor = supervisor_input.trim().to_uppercase();
        if supervisor.is_empty() || !supervisors.contains(&supervisor) {
            return Err(AppError::Validation(
                messages::INVALID_SUPERVISOR.to_string(),
            ));
        }

        let answered: HashSet<(&str, &str)> = responses
            .iter()
            .filter(|r| r.supervisor == supervisor)
            .map(ResponseRecord::key)
            .collect();

        let pending: Vec<AbsenceRecord> = absences
            .into_iter()
            .filter(|a| a.supervisor == supervisor && !answered.contains(&a.key()))
            .collect();

        tracing::info!(
            "Review started for {}: {} pending absences",
            supervisor,
            pending.len()
        );

        Ok(Self {
            supervisor,
            pending,
            cursor: 0,
        })
    }

    pub fn supervisor(&self) -> &str {
        &self.supervisor
    }

    pub fn pending(&self) -> &[AbsenceRecord] {
        &self.pending
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The record awaiting a decision, if any.
    pub fn current(&self) -> Option<&AbsenceRecord> {
        self.pending.get(self.cursor)
    }

    pub fn status(&self) -> ReviewStatus {
        if self.pending.is_empty() {
            ReviewStatus::NothingPending
        } else if self.cursor >= self.pending.len() {
            ReviewStatus::Complete
        } else {
            ReviewStatus::Reviewing
        }
    }

    /// Apply a decision to the current record.
    ///
    /// The cursor only advances once the ledger has accepted the record. A short justification
    /// or a failed write leaves the session exactly as it was.
    pub fn decide(
        &mut self,
        decision: Decision,
        responded_at: NaiveDateTime,
        ledger: &ResponseLedger,
    ) -> Result<DecisionOutcome, AppError> {
        let Some(absence) = self.current() else {
            return Ok(DecisionOutcome::AlreadyComplete);
        };

        let (action, justification) = match decision {
            Decision::Justify(text) => {
                let text = text.trim();
                if text.chars().count() < MIN_JUSTIFICATION_LEN {
                    tracing::warn!(
                        "Justification too short for {} on {}",
                        absence.employee_id,
                        absence.date
                    );
                    return Err(AppError::Validation(
                        messages::JUSTIFICATION_TOO_SHORT.to_string(),
                    ));
                }
                (Action::Justified, text.to_string())
            }
            Decision::Confirm => (Action::Confirmed, String::new()),
            Decision::Unrecognized(raw) => {
                tracing::warn!("Ignoring unrecognized action {:?}", raw);
                return Ok(DecisionOutcome::Ignored);
            }
        };

        let record = ResponseRecord::for_absence(
            absence,
            action,
            &justification,
            responded_at,
            &self.supervisor,
        );
        ledger.append(&record)?;
        self.cursor += 1;

        Ok(DecisionOutcome::Recorded(record))
    }

    /// Render the session for the client.
    pub fn view(&self, message: Option<String>) -> ReviewView {
        let state = self.status();
        let message = match state {
            ReviewStatus::NothingPending => {
                message.or_else(|| Some(messages::NOTHING_PENDING.to_string()))
            }
            _ => message,
        };

        ReviewView {
            state,
            supervisor: Some(self.supervisor.clone()),
            supervisors: vec![self.supervisor.clone()],
            current: self.current().cloned(),
            index: self.cursor().min(self.pending().len()),
            total: self.pending().len(),
            message,
        }
    }
}

/// Confirmed responses recorded by `supervisor`.
pub fn summarize(records: Vec<ResponseRecord>, supervisor: &str) -> Vec<ResponseRecord> {
    records
        .into_iter()
        .filter(|r| r.supervisor == supervisor && r.action == Action::Confirmed)
        .collect()
}
