use crate::core::io_manager::{IOManager, WalkedFile};
use crate::interface::archive_writer::{ArchiveHandle, ArchiveWriter};
use crate::model::backup_execution::BackupOutcome;
use crate::model::backup_layout::{entry_name, staging_path};
use crate::model::error::Error;
use crate::model::error::backup::BackupError;
use crate::utils::raii_guard::StagingGuard;
use std::path::PathBuf;

/// An archive being written under its staging name.
///
/// Only `finish` makes it visible under the final timestamped name; any other
/// exit path drops the handle and then the staged file.
pub struct ArchiveBuilder {
    // Declared before `staging` so the handle is closed before the file is removed.
    handle: Box<dyn ArchiveHandle>,
    staging: StagingGuard,
    destination: PathBuf,
    files: usize,
}

impl ArchiveBuilder {
    pub fn begin(writer: &dyn ArchiveWriter, destination: PathBuf) -> Result<Self, Error> {
        if destination.exists() {
            Err(BackupError::archive_already_exists(&destination))?
        }

        let staging = staging_path(&destination);
        if staging.exists() {
            IOManager::delete_file(&staging)?;
        }

        let handle = writer.create_archive(&staging)?;
        Ok(Self {
            handle,
            staging: StagingGuard::new(staging),
            destination,
            files: 0,
        })
    }

    pub fn add_file(&mut self, file: &WalkedFile) -> Result<(), Error> {
        self.handle.add_file(&file.path, &entry_name(&file.relative))?;
        self.files += 1;
        Ok(())
    }

    pub fn finish(self) -> Result<BackupOutcome, Error> {
        let ArchiveBuilder {
            handle,
            staging,
            destination,
            files,
        } = self;

        handle.close()?;
        if destination.exists() {
            Err(BackupError::archive_already_exists(&destination))?
        }
        staging.commit(&destination)?;

        Ok(BackupOutcome::ArchiveCreated {
            path: destination,
            files,
        })
    }
}
