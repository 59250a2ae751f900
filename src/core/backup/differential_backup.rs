use crate::core::backup::archive_builder::ArchiveBuilder;
use crate::core::backup::change_detector::ChangeDetector;
use crate::core::backup::prepare_run;
use crate::core::io_manager::{IOManager, WalkedFile};
use crate::interface::archive_writer::ArchiveWriter;
use crate::model::backup_execution::BackupOutcome;
use crate::model::backup_layout::{archive_path, baseline_path, staging_path};
use crate::model::error::Error;
use crate::model::ignore_predicate::IgnorePredicate;
use crate::model::log::backup::BackupLog;
use crate::utils::raii_guard::StagingGuard;
use chrono::NaiveDateTime;
use macros::log;
use std::path::Path;
use std::sync::Arc;

/// Captures changes against one baseline per calendar day.
///
/// The first run of a day copies the whole tree into `full-backup-<date>` and
/// writes no archive. Later runs that day archive only files the detector
/// flags; the baseline is never touched again. Files deleted from the source
/// are not recorded, so a restore from baseline plus archive brings them back.
#[derive(Clone)]
pub struct DifferentialBackup {
    writer: Arc<dyn ArchiveWriter>,
    ignore: IgnorePredicate,
    detector: ChangeDetector,
}

impl DifferentialBackup {
    pub fn new(
        writer: Arc<dyn ArchiveWriter>,
        ignore: IgnorePredicate,
        detector: ChangeDetector,
    ) -> Self {
        Self {
            writer,
            ignore,
            detector,
        }
    }

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

        let baseline = baseline_path(root, now.date());
        if !baseline.is_dir() {
            return Self::create_baseline(source, &baseline, &ignore);
        }

        let files = IOManager::walk_files(source, &ignore).into_result()?;
        let mut changed: Vec<&WalkedFile> = Vec::new();
        for file in &files {
            if self
                .detector
                .should_include(&file.path, &baseline.join(&file.relative))?
            {
                changed.push(file);
            }
        }

        if changed.is_empty() {
            return Ok(BackupOutcome::NoChanges);
        }

        let destination = archive_path(root, now, self.writer.extension());
        let mut archive = ArchiveBuilder::begin(self.writer.as_ref(), destination)?;
        for file in changed {
            archive.add_file(file)?;
        }
        archive.finish()
    }

    /// Best-effort copy into a staging directory, renamed into place once complete.
    fn create_baseline(
        source: &Path,
        baseline: &Path,
        ignore: &IgnorePredicate,
    ) -> Result<BackupOutcome, Error> {
        let staging = staging_path(baseline);
        if staging.exists() {
            IOManager::delete_directory(&staging)?;
        }
        IOManager::create_directory(&staging)?;
        let guard = StagingGuard::new(staging);

        let walk = IOManager::walk_files(source, ignore);
        for err in &walk.errors {
            log!(err);
        }

        let mut files = 0;
        for file in &walk.files {
            match IOManager::copy_file(&file.path, &guard.path().join(&file.relative)) {
                Ok(()) => files += 1,
                Err(err) => log!(
                    BackupLog::BaselineFileSkipped {
                        path: file.path.clone()
                    },
                    err
                ),
            }
        }

        guard.commit(baseline)?;
        Ok(BackupOutcome::BaselineCreated {
            path: baseline.to_path_buf(),
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::archive_parameters::ArchiveParameters;
    use crate::model::comparison_mode::ComparisonMode;
    use crate::platform::ZipArchiver;
    use chrono::NaiveDate;
    use std::fs::{self, File};
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn write_at(path: PathBuf, contents: &str, seconds: u64) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(seconds))
            .unwrap();
    }

    fn entry_names(archive: &Path) -> Vec<String> {
        let zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
        let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    fn strategy() -> DifferentialBackup {
        DifferentialBackup::new(
            Arc::new(ZipArchiver::new(ArchiveParameters::default())),
            IgnorePredicate::none(),
            ChangeDetector::new(ComparisonMode::Standard),
        )
    }

    fn fixture() -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("world");
        let root = temp.path().join("backups").join("world");
        write_at(source.join("a.txt"), "a", 1_000);
        write_at(source.join("region").join("b.txt"), "b", 1_000);
        (temp, source, root)
    }

    fn snapshot(dir: &Path) -> Vec<(PathBuf, Vec<u8>, SystemTime)> {
        let files = IOManager::walk_files(dir, &IgnorePredicate::none())
            .into_result()
            .unwrap();
        files
            .into_iter()
            .map(|file| {
                let modified = IOManager::modified_time(&file.path).unwrap();
                (file.relative, fs::read(&file.path).unwrap(), modified)
            })
            .collect()
    }

    #[test]
    fn first_run_creates_baseline_without_archive() {
        let (_temp, source, root) = fixture();

        let outcome = strategy().backup_at(&source, &root, at(1, 8)).unwrap();

        let baseline = root.join("full-backup-2026-05-01");
        assert_eq!(
            outcome,
            BackupOutcome::BaselineCreated {
                path: baseline.clone(),
                files: 2
            }
        );
        assert_eq!(fs::read_to_string(baseline.join("region/b.txt")).unwrap(), "b");
        assert_eq!(IOManager::list_directory(&root).unwrap(), vec![baseline]);
    }

    #[test]
    fn unchanged_second_run_writes_nothing() {
        let (_temp, source, root) = fixture();
        let backup = strategy();
        backup.backup_at(&source, &root, at(1, 8)).unwrap();
        let baseline = root.join("full-backup-2026-05-01");
        let before = snapshot(&baseline);

        let outcome = backup.backup_at(&source, &root, at(1, 9)).unwrap();

        assert_eq!(outcome, BackupOutcome::NoChanges);
        assert_eq!(snapshot(&baseline), before);
        assert_eq!(IOManager::list_directory(&root).unwrap(), vec![baseline]);
    }

    #[test]
    fn later_run_archives_only_changed_and_new_files() {
        let (_temp, source, root) = fixture();
        let backup = strategy();
        backup.backup_at(&source, &root, at(1, 8)).unwrap();
        let baseline = root.join("full-backup-2026-05-01");
        let before = snapshot(&baseline);

        write_at(source.join("region").join("b.txt"), "b changed", 2_000);
        write_at(source.join("new.txt"), "new", 1_000);

        let outcome = backup.backup_at(&source, &root, at(1, 9)).unwrap();
        let archive = root.join("2026-05-01-09-00-00.zip");
        assert_eq!(
            outcome,
            BackupOutcome::ArchiveCreated {
                path: archive.clone(),
                files: 2
            }
        );
        assert_eq!(entry_names(&archive), vec!["new.txt", "region/b.txt"]);
        assert_eq!(snapshot(&baseline), before);
    }

    #[test]
    fn deletions_are_not_recorded() {
        let (_temp, source, root) = fixture();
        let backup = strategy();
        backup.backup_at(&source, &root, at(1, 8)).unwrap();

        fs::remove_file(source.join("a.txt")).unwrap();
        let outcome = backup.backup_at(&source, &root, at(1, 9)).unwrap();

        assert_eq!(outcome, BackupOutcome::NoChanges);
        assert!(root.join("full-backup-2026-05-01").join("a.txt").exists());
    }

    #[test]
    fn next_day_starts_a_fresh_baseline() {
        let (_temp, source, root) = fixture();
        let backup = strategy();
        backup.backup_at(&source, &root, at(1, 8)).unwrap();

        fs::remove_file(source.join("a.txt")).unwrap();
        write_at(source.join("c.txt"), "c", 3_000);

        let outcome = backup.backup_at(&source, &root, at(2, 8)).unwrap();
        let day_two = root.join("full-backup-2026-05-02");
        assert_eq!(
            outcome,
            BackupOutcome::BaselineCreated {
                path: day_two.clone(),
                files: 2
            }
        );
        let relative: Vec<PathBuf> = snapshot(&day_two).into_iter().map(|(path, ..)| path).collect();
        assert_eq!(relative, vec![PathBuf::from("c.txt"), PathBuf::from("region/b.txt")]);
        assert!(root.join("full-backup-2026-05-01").join("a.txt").exists());
    }

    #[test]
    fn stale_staging_directory_is_replaced() {
        let (_temp, source, root) = fixture();
        let stale = root.join("full-backup-2026-05-01.part");
        write_at(stale.join("leftover.txt"), "x", 1_000);

        strategy().backup_at(&source, &root, at(1, 8)).unwrap();

        let baseline = root.join("full-backup-2026-05-01");
        assert!(!stale.exists());
        assert!(!baseline.join("leftover.txt").exists());
        assert!(baseline.join("a.txt").exists());
    }
}
