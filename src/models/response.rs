//! Response ledger model. Field names map onto the ledger CSV columns.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::AbsenceRecord;

/// Ledger column order.
pub const LEDGER_COLUMNS: [&str; 7] = [
    "MATRICULA",
    "FUNCIONARIO",
    "DATA_FALTA",
    "ACAO",
    "JUSTIFICATIVA",
    "DATA_RESPOSTA",
    "ENCARREGADO",
];

/// Format of `DATA_RESPOSTA`.
pub const RESPONSE_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// `DATA_RESPOSTA` as spreadsheet apps write it back on re-save.
const RESPONSE_TIMESTAMP_WITH_SECONDS: &str = "%d/%m/%Y %H:%M:%S";

/// Decision recorded for an absence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Action {
    #[serde(alias = "Justificada")]
    Justified,
    #[serde(alias = "Confirmada")]
    Confirmed,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Justified => "Justified",
            Action::Confirmed => "Confirmed",
        }
    }
}

/// One row of the append-only response ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseRecord {
    #[serde(rename = "MATRICULA")]
    pub employee_id: String,
    #[serde(rename = "FUNCIONARIO")]
    pub employee_name: String,
    #[serde(rename = "DATA_FALTA")]
    pub date: String,
    #[serde(rename = "ACAO")]
    pub action: Action,
    #[serde(rename = "JUSTIFICATIVA", default)]
    pub justification: String,
    #[serde(rename = "DATA_RESPOSTA", with = "response_timestamp")]
    pub responded_at: NaiveDateTime,
    #[serde(rename = "ENCARREGADO")]
    pub supervisor: String,
}

impl ResponseRecord {
    /// Build the ledger row for a decision on `absence`.
    pub fn for_absence(
        absence: &AbsenceRecord,
        action: Action,
        justification: &str,
        responded_at: NaiveDateTime,
        supervisor: &str,
    ) -> Self {
        Self {
            employee_id: absence.employee_id.clone(),
            employee_name: absence.employee_name.clone(),
            date: absence.date.clone(),
            action,
            justification: justification.to_string(),
            responded_at,
            supervisor: supervisor.to_string(),
        }
    }

    /// Deduplication key shared with absence records.
    pub fn key(&self) -> (&str, &str) {
        (&self.employee_id, &self.date)
    }
}

/// `DD/MM/YYYY HH:MM` serde adapter for ledger timestamps.
mod response_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{RESPONSE_TIMESTAMP_FORMAT, RESPONSE_TIMESTAMP_WITH_SECONDS};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(RESPONSE_TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        NaiveDateTime::parse_from_str(raw, RESPONSE_TIMESTAMP_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, RESPONSE_TIMESTAMP_WITH_SECONDS))
            .map_err(serde::de::Error::custom)
    }
}
