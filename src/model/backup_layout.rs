//! Naming of the artifacts inside a BackupRoot.
//!
//! `full-backup-YYYY-MM-DD/` is the baseline mirror of one calendar day and
//! `yyyy-MM-dd-HH-mm-ss.<ext>` is a timestamped archive. Anything else found in
//! a BackupRoot is not managed by this crate and is left alone.

use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Component, Path, PathBuf};

pub const BASELINE_PREFIX: &str = "full-backup-";
pub const BASELINE_DATE_FORMAT: &str = "%Y-%m-%d";
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";
pub const STAGING_SUFFIX: &str = ".part";

pub fn baseline_name(date: NaiveDate) -> String {
    format!("{BASELINE_PREFIX}{}", date.format(BASELINE_DATE_FORMAT))
}

pub fn baseline_path(root: &Path, date: NaiveDate) -> PathBuf {
    root.join(baseline_name(date))
}

pub fn archive_name(timestamp: NaiveDateTime, extension: &str) -> String {
    format!("{}.{extension}", timestamp.format(ARCHIVE_TIMESTAMP_FORMAT))
}

pub fn archive_path(root: &Path, timestamp: NaiveDateTime, extension: &str) -> PathBuf {
    root.join(archive_name(timestamp, extension))
}

/// Sibling path a directory or file is built under before being renamed into place.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(STAGING_SUFFIX);
    path.with_file_name(name)
}

pub fn parse_baseline_date(name: &str) -> Option<NaiveDate> {
    let date = name.strip_prefix(BASELINE_PREFIX)?;
    NaiveDate::parse_from_str(date, BASELINE_DATE_FORMAT).ok()
}

pub fn parse_archive_timestamp(name: &str) -> Option<NaiveDateTime> {
    let (stem, extension) = name.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(stem, ARCHIVE_TIMESTAMP_FORMAT).ok()
}

/// Entry name inside an archive: relative path components joined with `/`.
pub fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupEntry {
    Baseline { path: PathBuf, date: NaiveDate },
    Archive { path: PathBuf, timestamp: NaiveDateTime },
    Unmanaged(PathBuf),
}

impl BackupEntry {
    pub fn classify(path: PathBuf, is_dir: bool) -> Self {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return BackupEntry::Unmanaged(path);
        };

        if is_dir {
            match parse_baseline_date(name) {
                Some(date) => BackupEntry::Baseline { path, date },
                None => BackupEntry::Unmanaged(path),
            }
        } else {
            match parse_archive_timestamp(name) {
                Some(timestamp) => BackupEntry::Archive { path, timestamp },
                None => BackupEntry::Unmanaged(path),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 30)
            .unwrap()
    }

    #[test]
    fn names_follow_layout() {
        let root = Path::new("/backups/world");
        assert_eq!(
            baseline_path(root, timestamp().date()),
            PathBuf::from("/backups/world/full-backup-2026-03-09")
        );
        assert_eq!(
            archive_path(root, timestamp(), "zip"),
            PathBuf::from("/backups/world/2026-03-09-07-05-30.zip")
        );
        assert_eq!(
            staging_path(&root.join("full-backup-2026-03-09")),
            PathBuf::from("/backups/world/full-backup-2026-03-09.part")
        );
    }

    #[test]
    fn parses_managed_names() {
        assert_eq!(
            parse_baseline_date("full-backup-2026-03-09"),
            Some(timestamp().date())
        );
        assert_eq!(
            parse_archive_timestamp("2026-03-09-07-05-30.zip"),
            Some(timestamp())
        );
    }

    #[test]
    fn rejects_malformed_names() {
        assert_eq!(parse_baseline_date("full-backup-2026-13-40"), None);
        assert_eq!(parse_baseline_date("full-backup-2026-03-09.part"), None);
        assert_eq!(parse_baseline_date("backup-2026-03-09"), None);
        assert_eq!(parse_archive_timestamp("2026-03-09-07-05-30.zip.part"), None);
        assert_eq!(parse_archive_timestamp("notes.zip"), None);
        assert_eq!(parse_archive_timestamp("2026-03-09-07-05-30"), None);
    }

    #[test]
    fn classifies_by_shape() {
        let root = PathBuf::from("/r");
        assert!(matches!(
            BackupEntry::classify(root.join("full-backup-2026-03-09"), true),
            BackupEntry::Baseline { .. }
        ));
        assert!(matches!(
            BackupEntry::classify(root.join("full-backup-2026-03-09"), false),
            BackupEntry::Unmanaged(_)
        ));
        assert!(matches!(
            BackupEntry::classify(root.join("2026-03-09-07-05-30.zip"), false),
            BackupEntry::Archive { .. }
        ));
        assert!(matches!(
            BackupEntry::classify(root.join("2026-03-09-07-05-30.zip"), true),
            BackupEntry::Unmanaged(_)
        ));
    }

    #[test]
    fn entry_names_use_forward_slashes() {
        let relative = Path::new("region").join("r.0.0.mca");
        assert_eq!(entry_name(&relative), "region/r.0.0.mca");
    }
}
