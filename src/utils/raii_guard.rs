use crate::model::error::Error;
use crate::model::error::io::IOError;
use macros::log;
use std::fs;
use std::path::{Path, PathBuf};

/// Owns a file or directory that is still being built under a staging name.
///
/// Unless `commit` renames it into place, the staged path is removed on drop,
/// so an aborted run never leaves a half-written artifact under a final name.
pub struct StagingGuard {
    path: PathBuf,
    committed: bool,
}

impl StagingGuard {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn commit(mut self, destination: &Path) -> Result<(), Error> {
        fs::rename(&self.path, destination)
            .map_err(|err| IOError::move_file_failed(&self.path, destination, err))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagingGuard {
    fn drop(&mut self) {
        if self.committed {
            return;
        }

        let result = match fs::symlink_metadata(&self.path) {
            Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(&self.path)
                .map_err(|err| IOError::delete_directory_failed(&self.path, err)),
            Ok(_) => fs::remove_file(&self.path)
                .map_err(|err| IOError::delete_file_failed(&self.path, err)),
            Err(_) => Ok(()),
        };

        if let Err(err) = result {
            log!(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn uncommitted_file_is_removed() {
        let temp = TempDir::new().unwrap();
        let staged = temp.path().join("a.zip.part");
        fs::write(&staged, b"partial").unwrap();

        drop(StagingGuard::new(staged.clone()));
        assert!(!staged.exists());
    }

    #[test]
    fn uncommitted_directory_is_removed() {
        let temp = TempDir::new().unwrap();
        let staged = temp.path().join("full-backup-2026-01-01.part");
        fs::create_dir_all(staged.join("region")).unwrap();
        fs::write(staged.join("region").join("r.mca"), b"x").unwrap();

        drop(StagingGuard::new(staged.clone()));
        assert!(!staged.exists());
    }

    #[test]
    fn committed_path_is_renamed_and_kept() {
        let temp = TempDir::new().unwrap();
        let staged = temp.path().join("a.zip.part");
        let destination = temp.path().join("a.zip");
        fs::write(&staged, b"done").unwrap();

        StagingGuard::new(staged.clone()).commit(&destination).unwrap();
        assert!(!staged.exists());
        assert_eq!(fs::read(&destination).unwrap(), b"done");
    }
}
