//! Configuration module for the absence review backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the absence spreadsheet
    pub absences_path: PathBuf,
    /// Zero-based sheet row holding the absence column headers
    pub header_row: usize,
    /// Path to the response ledger CSV
    pub ledger_path: PathBuf,
    /// Path to the supervisor list (one name per line)
    pub supervisors_path: PathBuf,
    /// Directory receiving weekly export files
    pub export_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Idle lifetime of a review session
    pub session_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let absences_path = env::var("FALTAS_ABSENCES_PATH")
            .unwrap_or_else(|_| "faltas.xlsx".to_string())
            .into();

        let header_row = env::var("FALTAS_HEADER_ROW")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid FALTAS_HEADER_ROW: {}", e)))?;

        let ledger_path = env::var("FALTAS_LEDGER_PATH")
            .unwrap_or_else(|_| "respostas.csv".to_string())
            .into();

        let supervisors_path = env::var("FALTAS_SUPERVISORS_PATH")
            .unwrap_or_else(|_| "encarregados.txt".to_string())
            .into();

        let export_dir = env::var("FALTAS_EXPORT_DIR")
            .unwrap_or_else(|_| ".".to_string())
            .into();

        let bind_addr = env::var("FALTAS_BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid FALTAS_BIND_ADDR format: {}", e)))?;

        let log_level = env::var("FALTAS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let session_ttl = env::var("FALTAS_SESSION_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .map(Duration::from_secs)
            .map_err(|e| AppError::Config(format!("Invalid FALTAS_SESSION_TTL_SECS: {}", e)))?;

        Ok(Self {
            absences_path,
            header_row,
            ledger_path,
            supervisors_path,
            export_dir,
            bind_addr,
            log_level,
            session_ttl,
        })
    }
}
