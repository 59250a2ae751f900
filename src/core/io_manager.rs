use crate::model::error::Error;
use crate::model::error::io::IOError;
use crate::model::ignore_predicate::IgnorePredicate;
use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A regular file found under a walked tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    pub path: PathBuf,
    pub relative: PathBuf,
}

/// Files collected by a walk plus every error hit on the way.
///
/// Callers choose the policy: all-or-nothing runs turn the first error into a
/// failure, best-effort runs log the errors and keep the files.
#[derive(Debug, Default)]
pub struct TreeWalk {
    pub files: Vec<WalkedFile>,
    pub errors: Vec<Error>,
}

impl TreeWalk {
    pub fn into_result(self) -> Result<Vec<WalkedFile>, Error> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.files),
        }
    }
}

pub struct IOManager;

impl IOManager {
    pub fn create_directory(path: &Path) -> Result<(), Error> {
        fs::create_dir_all(path).map_err(|err| IOError::create_directory_failed(path, err))?;
        Ok(())
    }

    /// Entries of `path`, sorted by name.
    pub fn list_directory(path: &Path) -> Result<Vec<PathBuf>, Error> {
        let reader = fs::read_dir(path).map_err(|err| IOError::read_directory_failed(path, err))?;
        let mut entries = Vec::new();
        for entry in reader {
            let entry = entry.map_err(|err| IOError::read_directory_failed(path, err))?;
            entries.push(entry.path());
        }
        entries.sort();
        Ok(entries)
    }

    pub fn is_empty_directory(path: &Path) -> Result<bool, Error> {
        let mut reader =
            fs::read_dir(path).map_err(|err| IOError::read_directory_failed(path, err))?;
        Ok(reader.next().is_none())
    }

    /// Copies a regular file, creating missing parents and keeping the source modify time.
    pub fn copy_file(source: &Path, destination: &Path) -> Result<(), Error> {
        if let Some(parent) = destination.parent() {
            Self::create_directory(parent)?;
        }
        fs::copy(source, destination)
            .map_err(|err| IOError::copy_file_failed(source, destination, err))?;

        let modified = Self::modified_time(source)?;
        File::options()
            .write(true)
            .open(destination)
            .and_then(|file| file.set_modified(modified))
            .map_err(|err| IOError::set_metadata_failed(destination, err))?;
        Ok(())
    }

    /// Moves a regular file over `destination`, replacing whatever file is there.
    pub fn move_file(source: &Path, destination: &Path) -> Result<(), Error> {
        if let Some(parent) = destination.parent() {
            Self::create_directory(parent)?;
        }
        if fs::rename(source, destination).is_ok() {
            return Ok(());
        }

        // Rename fails across filesystems.
        fs::copy(source, destination)
            .map_err(|err| IOError::move_file_failed(source, destination, err))?;
        Self::delete_file(source)
    }

    pub fn delete_file(path: &Path) -> Result<(), Error> {
        fs::remove_file(path).map_err(|err| IOError::delete_file_failed(path, err))?;
        Ok(())
    }

    pub fn delete_directory(path: &Path) -> Result<(), Error> {
        fs::remove_dir_all(path).map_err(|err| IOError::delete_directory_failed(path, err))?;
        Ok(())
    }

    pub fn modified_time(path: &Path) -> Result<SystemTime, Error> {
        fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .map_err(|err| IOError::get_metadata_failed(path, err).into())
    }

    /// Byte-for-byte comparison. Returns true on the first differing byte or length.
    pub fn contents_differ(left: &Path, right: &Path) -> Result<bool, Error> {
        let mut left_reader =
            File::open(left).map_err(|err| IOError::read_file_failed(left, err))?;
        let mut right_reader =
            File::open(right).map_err(|err| IOError::read_file_failed(right, err))?;

        let mut left_buffer = [0; 65536];
        let mut right_buffer = [0; 65536];
        loop {
            let left_read = read_full(&mut left_reader, &mut left_buffer)
                .map_err(|err| IOError::read_file_failed(left, err))?;
            let right_read = read_full(&mut right_reader, &mut right_buffer)
                .map_err(|err| IOError::read_file_failed(right, err))?;

            if left_read != right_read || left_buffer[..left_read] != right_buffer[..right_read] {
                return Ok(true);
            }
            if left_read == 0 {
                return Ok(false);
            }
        }
    }

    /// Sequential breadth-first walk collecting regular files under `root`.
    ///
    /// Ignored entries are skipped, ignored directories are not descended into.
    /// Symlinks to files are followed, symlinks to directories are not.
    pub fn walk_files(root: &Path, ignore: &IgnorePredicate) -> TreeWalk {
        let mut walk = TreeWalk::default();
        let mut queue = VecDeque::from([root.to_path_buf()]);

        while let Some(current_dir) = queue.pop_front() {
            let entries = match Self::list_directory(&current_dir) {
                Ok(entries) => entries,
                Err(err) => {
                    walk.errors.push(err);
                    continue;
                }
            };

            for entry in entries {
                if ignore.test(&entry) {
                    continue;
                }

                let metadata = match fs::symlink_metadata(&entry) {
                    Ok(metadata) if metadata.file_type().is_symlink() => match fs::metadata(&entry) {
                        Ok(target) if target.is_file() => target,
                        Ok(_) => continue,
                        Err(err) => {
                            walk.errors.push(IOError::get_metadata_failed(&entry, err).into());
                            continue;
                        }
                    },
                    Ok(metadata) => metadata,
                    Err(err) => {
                        walk.errors.push(IOError::get_metadata_failed(&entry, err).into());
                        continue;
                    }
                };

                if metadata.is_dir() {
                    queue.push_back(entry);
                } else if metadata.is_file() {
                    match entry.strip_prefix(root) {
                        Ok(relative) => walk.files.push(WalkedFile {
                            relative: relative.to_path_buf(),
                            path: entry.clone(),
                        }),
                        Err(err) => walk
                            .errors
                            .push(IOError::read_directory_failed(&entry, err).into()),
                    }
                }
            }
        }

        walk
    }
}

fn read_full(reader: &mut impl Read, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
