//! Supervisor directory: one name per line.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::errors::AppError;

/// Flat list of supervisors allowed to review absences.
#[derive(Debug, Clone)]
pub struct SupervisorDirectory {
    path: PathBuf,
}

impl SupervisorDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// List the uppercased supervisor names. A missing file yields an empty set.
    pub fn list_supervisors(&self) -> Result<BTreeSet<String>, AppError> {
        if !self.path.exists() {
            tracing::warn!("Supervisor list {:?} not found", self.path);
            return Ok(BTreeSet::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            tracing::error!("Failed to read supervisor list {:?}: {:?}", self.path, e);
            AppError::SourceUnavailable(format!("Failed to read supervisor list: {}", e))
        })?;

        Ok(parse_supervisors(&content))
    }
}

fn parse_supervisors(content: &str) -> BTreeSet<String> {
    content
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_skips_blank_lines_and_uppercases() {
        let names = parse_supervisors("joao\n\n  Maria Silva  \r\n   \nJOAO\n");
        let names: Vec<_> = names.into_iter().collect();
        assert_eq!(names, vec!["JOAO".to_string(), "MARIA SILVA".to_string()]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let directory = SupervisorDirectory::new(temp_dir.path().join("encarregados.txt"));
        assert!(directory.list_supervisors().unwrap().is_empty());
    }

    #[test]
    fn test_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("encarregados.txt");
        std::fs::write(&path, "Pedro\nana\n").unwrap();

        let names = SupervisorDirectory::new(&path).list_supervisors().unwrap();
        assert!(names.contains("PEDRO"));
        assert!(names.contains("ANA"));
        assert_eq!(names.len(), 2);
    }
}
