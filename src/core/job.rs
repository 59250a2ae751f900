use crate::core::backup::backup_strategy::BackupStrategy;
use crate::core::backup::exclude_nested;
use crate::core::io_manager::IOManager;
use crate::core::purge::retention_engine::RetentionEngine;
use crate::core::restore::exporter::Exporter;
use crate::interface::archive_writer::ArchiveWriter;
use crate::model::backup_execution::{BackupMode, BackupOutcome};
use crate::model::comparison_mode::ComparisonMode;
use crate::model::config::Config;
use crate::model::error::Error;
use crate::model::error::backup::BackupError;
use crate::model::error::task::TaskError;
use crate::model::log::backup::BackupLog;
use crate::model::retention_policy::RetentionPolicy;
use crate::platform::ZipArchiver;
use macros::log;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::Instant;

/// One unit of work for the engine. Every job targets exactly one BackupRoot.
#[derive(Clone)]
pub enum Job {
    Backup(BackupJob),
    Purge {
        root: PathBuf,
        policy: RetentionPolicy,
    },
    Export {
        root: PathBuf,
        entry_name: String,
        output_dir: PathBuf,
        mode: BackupMode,
        writer: Arc<dyn ArchiveWriter>,
    },
}

#[derive(Clone)]
pub struct BackupJob {
    pub subject: String,
    pub source: PathBuf,
    pub root: PathBuf,
    /// Directory holding every subject's BackupRoot, never archived itself.
    pub backup_directory: PathBuf,
    pub strategy: BackupStrategy,
    /// Run to completion before the walk so the source is flushed to disk.
    pub save_command: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Backup(BackupOutcome),
    Purged(usize),
    Exported(PathBuf),
    Failed(Error),
    /// Still waiting for a worker when the engine was terminated.
    Cancelled,
}

impl Job {
    /// Builds a backup job for a configured subject with the active settings.
    pub fn backup(config: &Config, subject: &str) -> Result<Self, Error> {
        let subject_config = config
            .subject(subject)
            .ok_or_else(|| TaskError::subject_not_found(subject))?;

        let writer: Arc<dyn ArchiveWriter> = Arc::new(ZipArchiver::new(config.archive_parameters()));
        let ignore = subject_config
            .ignore
            .clone()
            .into_predicate(&subject_config.source);
        let strategy = BackupStrategy::from_mode(
            BackupMode::from(config.general.differential),
            writer,
            ignore,
            ComparisonMode::from(config.general.check_file_content),
        );

        Ok(Job::Backup(BackupJob {
            subject: subject_config.name.clone(),
            source: subject_config.source.clone(),
            root: config.subject_root(subject),
            backup_directory: config.general.backup_directory.clone(),
            strategy,
            save_command: subject_config.save_command.clone(),
        }))
    }

    pub fn purge(config: &Config, root: PathBuf) -> Self {
        Job::Purge {
            root,
            policy: config.retention_policy(),
        }
    }

    pub fn export(
        config: &Config,
        subject: &str,
        entry_name: impl Into<String>,
        output_dir: PathBuf,
    ) -> Result<Self, Error> {
        if config.subject(subject).is_none() {
            Err(TaskError::subject_not_found(subject))?
        }

        Ok(Job::Export {
            root: config.subject_root(subject),
            entry_name: entry_name.into(),
            output_dir,
            mode: BackupMode::from(config.general.differential),
            writer: Arc::new(ZipArchiver::new(config.archive_parameters())),
        })
    }

    pub fn root(&self) -> &Path {
        match self {
            Job::Backup(job) => &job.root,
            Job::Purge { root, .. } => root,
            Job::Export { root, .. } => root,
        }
    }

    /// Runs on a blocking worker. Failures are logged here and reported in the outcome.
    pub fn run(self) -> JobOutcome {
        let result = match self {
            Job::Backup(job) => job.run().map(JobOutcome::Backup),
            Job::Purge { root, policy } => Ok(JobOutcome::Purged(RetentionEngine::purge(
                &root, &policy,
            ))),
            Job::Export {
                root,
                entry_name,
                output_dir,
                mode,
                writer,
            } => Exporter::new(writer)
                .export(&root, &entry_name, &output_dir, mode)
                .map(JobOutcome::Exported),
        };

        result.unwrap_or_else(|err| {
            log!(err);
            JobOutcome::Failed(err)
        })
    }
}

impl BackupJob {
    fn run(self) -> Result<BackupOutcome, Error> {
        let start = Instant::now();
        log!(BackupLog::Started {
            subject: self.subject.clone()
        });

        self.flush()?;
        IOManager::create_directory(&self.backup_directory)?;
        let strategy = self
            .strategy
            .excluding(exclude_nested(&self.source, &self.backup_directory));
        let outcome = strategy.backup(&self.source, &self.root)?;
        match &outcome {
            BackupOutcome::BaselineCreated { path, .. } => {
                log!(BackupLog::BaselineCreated { path: path.clone() })
            }
            BackupOutcome::ArchiveCreated { path, files } => log!(BackupLog::ArchiveCreated {
                path: path.clone(),
                files: *files
            }),
            BackupOutcome::NoChanges => log!(BackupLog::NoChanges {
                path: self.root.clone()
            }),
        }

        log!(BackupLog::Finished {
            subject: self.subject,
            elapsed_ms: start.elapsed().as_millis()
        });
        Ok(outcome)
    }

    fn flush(&self) -> Result<(), Error> {
        let Some((program, args)) = self
            .save_command
            .as_ref()
            .and_then(|command| command.split_first())
        else {
            return Ok(());
        };

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|err| BackupError::flush_failed(&self.subject, err))?;
        if !status.success() {
            Err(BackupError::flush_failed(&self.subject, status))?
        }
        Ok(())
    }
}
