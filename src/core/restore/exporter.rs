use crate::core::backup::archive_builder::ArchiveBuilder;
use crate::core::io_manager::IOManager;
use crate::core::restore::restore_merger::RestoreMerger;
use crate::interface::archive_writer::ArchiveWriter;
use crate::model::backup_execution::BackupMode;
use crate::model::error::Error;
use crate::model::error::backup::BackupError;
use crate::model::error::io::IOError;
use crate::model::ignore_predicate::IgnorePredicate;
use crate::model::log::backup::BackupLog;
use macros::log;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Produces a standalone archive of one backup entry for use outside the BackupRoot.
pub struct Exporter {
    writer: Arc<dyn ArchiveWriter>,
}

impl Exporter {
    pub fn new(writer: Arc<dyn ArchiveWriter>) -> Self {
        Self { writer }
    }

    /// Exports `root/<entry_name>` to `<output_dir>/<subject>-<entry>.<ext>`.
    ///
    /// Baselines are archived as they are. An archive is copied verbatim in full
    /// mode and merged with its baseline first in differential mode.
    pub fn export(
        &self,
        root: &Path,
        entry_name: &str,
        output_dir: &Path,
        mode: BackupMode,
    ) -> Result<PathBuf, Error> {
        let entry = root.join(entry_name);
        if entry_name.is_empty() || !entry.exists() {
            Err(BackupError::entry_not_found(&entry))?
        }

        let destination = output_dir.join(self.output_name(root, &entry));
        if destination.exists() {
            Err(BackupError::destination_exists(&destination))?
        }
        IOManager::create_directory(output_dir)?;

        if entry.is_dir() {
            self.archive_directory(&entry, &destination)?;
        } else {
            match mode {
                BackupMode::Full => IOManager::copy_file(&entry, &destination)?,
                BackupMode::Differential => {
                    let scratch = tempfile::Builder::new()
                        .prefix(".zipsphere-export-")
                        .tempdir_in(output_dir)
                        .map_err(|err| IOError::create_directory_failed(output_dir, err))?;
                    let merged = RestoreMerger::new(self.writer.clone())
                        .merge(&entry, &scratch.path().join("merged"))?;
                    self.archive_directory(&merged, &destination)?;
                }
            }
        }

        log!(BackupLog::Exported {
            path: destination.clone()
        });
        Ok(destination)
    }

    fn output_name(&self, root: &Path, entry: &Path) -> String {
        let subject = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = if entry.is_dir() {
            entry.file_name()
        } else {
            entry.file_stem()
        }
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

        format!("{subject}-{stem}.{}", self.writer.extension())
    }

    fn archive_directory(&self, directory: &Path, destination: &Path) -> Result<(), Error> {
        let files = IOManager::walk_files(directory, &IgnorePredicate::none()).into_result()?;
        let mut archive = ArchiveBuilder::begin(self.writer.as_ref(), destination.to_path_buf())?;
        for file in &files {
            archive.add_file(file)?;
        }
        archive.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::archive_parameters::ArchiveParameters;
    use crate::platform::ZipArchiver;
    use std::fs::{self, File};
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn write(path: PathBuf, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn writer() -> Arc<dyn ArchiveWriter> {
        Arc::new(ZipArchiver::new(ArchiveParameters::default()))
    }

    fn read_entry(archive: &Path, name: &str) -> String {
        let mut zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
        let mut contents = String::new();
        std::io::Read::read_to_string(&mut zip.by_name(name).unwrap(), &mut contents).unwrap();
        contents
    }

    fn entry_names(archive: &Path) -> Vec<String> {
        let zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
        let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    fn differential_root(temp: &TempDir) -> PathBuf {
        let root = temp.path().join("backups").join("world");
        let baseline = root.join("full-backup-2026-05-01");
        write(baseline.join("a.txt"), "a");
        write(baseline.join("b.txt"), "b");

        let changed = temp.path().join("b.txt");
        write(changed.clone(), "b'");
        let mut handle = writer()
            .create_archive(&root.join("2026-05-01-10-00-00.zip"))
            .unwrap();
        handle.add_file(&changed, "b.txt").unwrap();
        handle.close().unwrap();
        root
    }

    #[test]
    fn full_archive_is_copied_verbatim() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("backups").join("world");
        write(root.join("2026-05-01-10-00-00.zip"), "zip bytes");
        let output = temp.path().join("exports");

        let exported = Exporter::new(writer())
            .export(&root, "2026-05-01-10-00-00.zip", &output, BackupMode::Full)
            .unwrap();

        assert_eq!(exported, output.join("world-2026-05-01-10-00-00.zip"));
        assert_eq!(fs::read_to_string(&exported).unwrap(), "zip bytes");
    }

    #[test]
    fn differential_archive_is_merged_with_its_baseline() {
        let temp = TempDir::new().unwrap();
        let root = differential_root(&temp);
        let output = temp.path().join("exports");

        let exported = Exporter::new(writer())
            .export(&root, "2026-05-01-10-00-00.zip", &output, BackupMode::Differential)
            .unwrap();

        assert_eq!(entry_names(&exported), vec!["a.txt", "b.txt"]);
        assert_eq!(read_entry(&exported, "a.txt"), "a");
        assert_eq!(read_entry(&exported, "b.txt"), "b'");
        assert_eq!(IOManager::list_directory(&output).unwrap(), vec![exported]);
    }

    #[test]
    fn baseline_is_archived_as_is() {
        let temp = TempDir::new().unwrap();
        let root = differential_root(&temp);
        let output = temp.path().join("exports");

        let exported = Exporter::new(writer())
            .export(&root, "full-backup-2026-05-01", &output, BackupMode::Differential)
            .unwrap();

        assert_eq!(exported, output.join("world-full-backup-2026-05-01.zip"));
        assert_eq!(read_entry(&exported, "b.txt"), "b");
    }

    #[test]
    fn missing_entry_is_reported() {
        let temp = TempDir::new().unwrap();
        let root = differential_root(&temp);

        let result = Exporter::new(writer()).export(
            &root,
            "2026-01-01-00-00-00.zip",
            &temp.path().join("exports"),
            BackupMode::Full,
        );

        assert!(matches!(
            result,
            Err(Error::Backup(BackupError::EntryNotFound { .. }))
        ));
    }
}
