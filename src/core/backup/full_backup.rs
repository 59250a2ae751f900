use crate::core::backup::archive_builder::ArchiveBuilder;
use crate::core::backup::prepare_run;
use crate::core::io_manager::IOManager;
use crate::interface::archive_writer::ArchiveWriter;
use crate::model::backup_execution::BackupOutcome;
use crate::model::backup_layout::archive_path;
use crate::model::error::Error;
use crate::model::ignore_predicate::IgnorePredicate;
use chrono::NaiveDateTime;
use std::path::Path;
use std::sync::Arc;

/// Archives every non-ignored regular file of the source tree.
#[derive(Clone)]
pub struct FullBackup {
    writer: Arc<dyn ArchiveWriter>,
    ignore: IgnorePredicate,
}

impl FullBackup {
    pub fn new(writer: Arc<dyn ArchiveWriter>, ignore: IgnorePredicate) -> Self {
        Self { writer, ignore }
    }

    /// Any failure aborts the run and discards the partial archive.
    /// Adds `extra` to the paths left out of every run.
    pub fn excluding(mut self, extra: IgnorePredicate) -> Self {
        self.ignore = self.ignore.or(extra);
        self
    }

    pub fn backup_at(
        &self,
        source: &Path,
        root: &Path,
        now: NaiveDateTime,
    ) -> Result<BackupOutcome, Error> {
        let ignore = prepare_run(source, root, &self.ignore)?;
        let files = IOManager::walk_files(source, &ignore).into_result()?;

        let destination = archive_path(root, now, self.writer.extension());
        let mut archive = ArchiveBuilder::begin(self.writer.as_ref(), destination)?;
        for file in &files {
            archive.add_file(file)?;
        }
        archive.finish()
    }
}
