pub mod archive_builder;
pub mod backup_strategy;
pub mod change_detector;
pub mod differential_backup;
pub mod full_backup;

use crate::core::io_manager::IOManager;
use crate::model::error::Error;
use crate::model::error::backup::BackupError;
use crate::model::ignore_predicate::IgnorePredicate;
use std::fs;
use std::path::Path;

/// Checks the source and creates the BackupRoot, returning the caller's
/// predicate extended so the BackupRoot is never walked when it lives inside
/// the source tree.
fn prepare_run(source: &Path, root: &Path, ignore: &IgnorePredicate) -> Result<IgnorePredicate, Error> {
    if !source.is_dir() {
        Err(BackupError::source_not_found(source))?
    }
    IOManager::create_directory(root)?;

    Ok(ignore.clone().or(exclude_nested(source, root)))
}

/// Ignores `directory` when it lies under `source`. Both must exist; a path
/// that cannot be resolved excludes nothing.
pub fn exclude_nested(source: &Path, directory: &Path) -> IgnorePredicate {
    match (fs::canonicalize(source), fs::canonicalize(directory)) {
        (Ok(source_canonical), Ok(directory_canonical)) => {
            match directory_canonical.strip_prefix(&source_canonical) {
                Ok(relative) => IgnorePredicate::path(source.join(relative)),
                Err(_) => IgnorePredicate::none(),
            }
        }
        _ => IgnorePredicate::none(),
    }
}
