use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupMode {
    Full,
    Differential,
}

impl From<bool> for BackupMode {
    fn from(differential: bool) -> Self {
        if differential {
            BackupMode::Differential
        } else {
            BackupMode::Full
        }
    }
}

/// Result of one strategy run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// First differential run of the day: the baseline was materialized, no archive written.
    BaselineCreated { path: PathBuf, files: usize },
    ArchiveCreated { path: PathBuf, files: usize },
    /// Differential run that found nothing to capture; no archive is written.
    NoChanges,
}

impl BackupOutcome {
    pub fn archive(&self) -> Option<&PathBuf> {
        match self {
            BackupOutcome::ArchiveCreated { path, .. } => Some(path),
            _ => None,
        }
    }
}
