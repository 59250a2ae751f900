use crate::core::backup::change_detector::ChangeDetector;
use crate::core::backup::differential_backup::DifferentialBackup;
use crate::core::backup::full_backup::FullBackup;
use crate::interface::archive_writer::ArchiveWriter;
use crate::model::backup_execution::{BackupMode, BackupOutcome};
use crate::model::comparison_mode::ComparisonMode;
use crate::model::error::Error;
use crate::model::ignore_predicate::IgnorePredicate;
use chrono::{Local, NaiveDateTime};
use std::path::Path;
use std::sync::Arc;

/// Full or differential, chosen from configuration when a job is built.
#[derive(Clone)]
pub enum BackupStrategy {
    Full(FullBackup),
    Differential(DifferentialBackup),
}

impl BackupStrategy {
    pub fn full(writer: Arc<dyn ArchiveWriter>, ignore: IgnorePredicate) -> Self {
        BackupStrategy::Full(FullBackup::new(writer, ignore))
    }

    pub fn differential(
        writer: Arc<dyn ArchiveWriter>,
        ignore: IgnorePredicate,
        comparison_mode: ComparisonMode,
    ) -> Self {
        BackupStrategy::Differential(DifferentialBackup::new(
            writer,
            ignore,
            ChangeDetector::new(comparison_mode),
        ))
    }

    pub fn from_mode(
        mode: BackupMode,
        writer: Arc<dyn ArchiveWriter>,
        ignore: IgnorePredicate,
        comparison_mode: ComparisonMode,
    ) -> Self {
        match mode {
            BackupMode::Full => Self::full(writer, ignore),
            BackupMode::Differential => Self::differential(writer, ignore, comparison_mode),
        }
    }

    pub fn mode(&self) -> BackupMode {
        match self {
            BackupStrategy::Full(_) => BackupMode::Full,
            BackupStrategy::Differential(_) => BackupMode::Differential,
        }
    }

    pub fn excluding(self, extra: IgnorePredicate) -> Self {
        match self {
            BackupStrategy::Full(strategy) => BackupStrategy::Full(strategy.excluding(extra)),
            BackupStrategy::Differential(strategy) => {
                BackupStrategy::Differential(strategy.excluding(extra))
            }
        }
    }

    pub fn backup(&self, source: &Path, root: &Path) -> Result<BackupOutcome, Error> {
        self.backup_at(source, root, Local::now().naive_local())
    }

    pub fn backup_at(
        &self,
        source: &Path,
        root: &Path,
        now: NaiveDateTime,
    ) -> Result<BackupOutcome, Error> {
        match self {
            BackupStrategy::Full(strategy) => strategy.backup_at(source, root, now),
            BackupStrategy::Differential(strategy) => strategy.backup_at(source, root, now),
        }
    }
}
