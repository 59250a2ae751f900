use crate::core::io_manager::IOManager;
use crate::interface::archive_writer::ArchiveWriter;
use crate::model::backup_layout::{baseline_path, parse_archive_timestamp};
use crate::model::error::Error;
use crate::model::error::backup::BackupError;
use crate::model::error::io::IOError;
use crate::model::ignore_predicate::IgnorePredicate;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Rebuilds the full tree a differential archive stands for: the baseline of
/// the archive's day with the archive's files laid over it.
pub struct RestoreMerger {
    writer: Arc<dyn ArchiveWriter>,
}

impl RestoreMerger {
    pub fn new(writer: Arc<dyn ArchiveWriter>) -> Self {
        Self { writer }
    }

    /// Writes the merged tree to `destination`, which must not exist yet.
    ///
    /// Work happens in a scratch directory next to `destination` that is
    /// removed on every exit path; `destination` only appears once the merge
    /// completed.
    pub fn merge(&self, archive: &Path, destination: &Path) -> Result<PathBuf, Error> {
        let baseline = Self::baseline_of(archive)?;
        if destination.exists() {
            Err(BackupError::destination_exists(destination))?
        }

        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        IOManager::create_directory(parent)?;
        let scratch = tempfile::Builder::new()
            .prefix(".zipsphere-merge-")
            .tempdir_in(parent)
            .map_err(|err| IOError::create_directory_failed(parent, err))?;

        let merged = scratch.path().join("merged");
        let extracted = scratch.path().join("extracted");
        IOManager::create_directory(&merged)?;
        IOManager::create_directory(&extracted)?;

        for file in IOManager::walk_files(&baseline, &IgnorePredicate::none()).into_result()? {
            IOManager::copy_file(&file.path, &merged.join(&file.relative))?;
        }

        self.writer.extract_all(archive, &extracted)?;
        for file in IOManager::walk_files(&extracted, &IgnorePredicate::none()).into_result()? {
            IOManager::move_file(&file.path, &merged.join(&file.relative))?;
        }

        fs::rename(&merged, destination)
            .map_err(|err| IOError::move_file_failed(&merged, destination, err))?;
        Ok(destination.to_path_buf())
    }

    /// Sibling baseline matching the date in the archive's name.
    pub fn baseline_of(archive: &Path) -> Result<PathBuf, Error> {
        let name = archive
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(timestamp) = parse_archive_timestamp(&name) else {
            return Err(BackupError::invalid_archive_name(name).into());
        };

        let root = archive.parent().unwrap_or(Path::new("."));
        let baseline = baseline_path(root, timestamp.date());
        if !baseline.is_dir() {
            Err(BackupError::baseline_not_found(&baseline))?
        }
        Ok(baseline)
    }
}
