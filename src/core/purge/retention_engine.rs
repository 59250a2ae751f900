use crate::core::io_manager::IOManager;
use crate::model::backup_layout::BackupEntry;
use crate::model::error::Error;
use crate::model::error::io::IOError;
use crate::model::log::purge::PurgeLog;
use crate::model::retention_policy::RetentionPolicy;
use chrono::{DateTime, Local, NaiveDate};
use macros::log;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

/// Reclaims space in BackupRoots.
///
/// Age is counted in local calendar days. Baselines age by the date in their
/// name and today's baseline is always kept. Archives age by their modify time
/// and expire the same day when `expiration_days` is zero; a future modify
/// time never expires. `max_count` then trims the remaining archives oldest
/// first, ties broken by file name. Names that do not parse as managed
/// artifacts are left alone, and a failure on one entry is logged without
/// stopping the pass.
pub struct RetentionEngine;

impl RetentionEngine {
    pub fn purge(root: &Path, policy: &RetentionPolicy) -> usize {
        Self::purge_at(root, policy, Local::now())
    }

    /// Returns the number of deleted entries (archives plus baseline subtrees).
    pub fn purge_at(root: &Path, policy: &RetentionPolicy, now: DateTime<Local>) -> usize {
        if !root.is_dir() {
            return 0;
        }

        let start = Instant::now();
        log!(PurgeLog::Started {
            root: root.to_path_buf()
        });

        let entries = match IOManager::list_directory(root) {
            Ok(entries) => entries,
            Err(err) => {
                log!(err);
                return 0;
            }
        };

        let today = now.date_naive();
        let mut deleted = 0;
        let mut kept_archives: Vec<(PathBuf, SystemTime)> = Vec::new();

        for entry in entries {
            let is_dir = match fs::symlink_metadata(&entry) {
                Ok(metadata) => metadata.is_dir(),
                Err(err) => {
                    Self::skip(&entry, IOError::get_metadata_failed(&entry, err).into());
                    continue;
                }
            };

            match BackupEntry::classify(entry, is_dir) {
                BackupEntry::Baseline { path, date } => {
                    if policy.is_baseline_expired(age_in_days(today, date)) {
                        deleted += Self::delete(&path, IOManager::delete_directory);
                    }
                }
                BackupEntry::Archive { path, .. } => {
                    let modified = match IOManager::modified_time(&path) {
                        Ok(modified) => modified,
                        Err(err) => {
                            Self::skip(&path, err);
                            continue;
                        }
                    };

                    let modified_day = DateTime::<Local>::from(modified).date_naive();
                    if policy.is_archive_expired(age_in_days(today, modified_day)) {
                        deleted += Self::delete(&path, IOManager::delete_file);
                    } else {
                        kept_archives.push((path, modified));
                    }
                }
                BackupEntry::Unmanaged(_) => {}
            }
        }

        if let Some(max_count) = policy.max_count
            && kept_archives.len() > max_count
        {
            kept_archives.sort_by(|(left_path, left_time), (right_path, right_time)| {
                left_time.cmp(right_time).then_with(|| left_path.cmp(right_path))
            });
            let excess = kept_archives.len() - max_count;
            for (path, _) in kept_archives.iter().take(excess) {
                deleted += Self::delete(path, IOManager::delete_file);
            }
        }

        if let Ok(true) = IOManager::is_empty_directory(root)
            && let Err(err) = fs::remove_dir(root)
        {
            log!(IOError::delete_directory_failed(root, err));
        }

        let elapsed_ms = start.elapsed().as_millis();
        if deleted == 0 {
            log!(PurgeLog::NothingExpired { elapsed_ms });
        } else {
            log!(PurgeLog::ExpiredDeleted {
                count: deleted,
                elapsed_ms
            });
        }

        deleted
    }

    /// Purges every subject directory under the backup directory in one pass.
    ///
    /// For callers outside the engine, such as a one-shot maintenance run. It
    /// does not take the engine's busy-root guard; the timer submits one purge
    /// job per root from `subject_roots` instead.
    pub fn purge_all(backup_directory: &Path, policy: &RetentionPolicy) -> usize {
        Self::subject_roots(backup_directory)
            .iter()
            .map(|root| Self::purge(root, policy))
            .sum()
    }

    /// BackupRoots found directly under the backup directory.
    pub fn subject_roots(backup_directory: &Path) -> Vec<PathBuf> {
        if !backup_directory.is_dir() {
            return Vec::new();
        }

        match IOManager::list_directory(backup_directory) {
            Ok(entries) => entries.into_iter().filter(|entry| entry.is_dir()).collect(),
            Err(err) => {
                log!(err);
                Vec::new()
            }
        }
    }

    fn delete(path: &Path, remove: fn(&Path) -> Result<(), Error>) -> usize {
        match remove(path) {
            Ok(()) => {
                log!(PurgeLog::EntryDeleted {
                    path: path.to_path_buf()
                });
                1
            }
            Err(err) => {
                Self::skip(path, err);
                0
            }
        }
    }

    fn skip(path: &Path, err: Error) {
        log!(
            PurgeLog::EntrySkipped {
                path: path.to_path_buf()
            },
            err
        );
    }
}

fn age_in_days(today: NaiveDate, day: NaiveDate) -> i64 {
    (today - day).num_days()
}
