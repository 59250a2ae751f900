use crate::interface::archive_writer::{ArchiveHandle, ArchiveWriter};
use crate::model::archive_parameters::ArchiveParameters;
use crate::model::error::Error;
use crate::model::error::backup::BackupError;
use crate::model::error::io::IOError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub struct ZipArchiver {
    parameters: ArchiveParameters,
}

impl ZipArchiver {
    pub fn new(parameters: ArchiveParameters) -> Self {
        Self { parameters }
    }
}

fn file_options(parameters: ArchiveParameters, length: u64) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(parameters.compression_level.deflate_level()))
        .large_file(length >= u64::from(u32::MAX))
}

impl ArchiveWriter for ZipArchiver {
    fn extension(&self) -> &str {
        "zip"
    }

    fn create_archive(&self, path: &Path) -> Result<Box<dyn ArchiveHandle>, Error> {
        let file = File::create_new(path).map_err(|err| match err.kind() {
            io::ErrorKind::AlreadyExists => BackupError::archive_already_exists(path),
            _ => BackupError::archive_write_failed(path, err),
        })?;

        Ok(Box::new(ZipArchiveHandle {
            path: path.to_path_buf(),
            writer: ZipWriter::new(BufWriter::new(file)),
            parameters: self.parameters,
        }))
    }

    fn extract_all(&self, archive: &Path, destination: &Path) -> Result<(), Error> {
        let file = File::open(archive).map_err(|err| IOError::read_file_failed(archive, err))?;
        let mut zip =
            ZipArchive::new(file).map_err(|err| BackupError::archive_extract_failed(archive, err))?;
        zip.extract(destination)
            .map_err(|err| BackupError::archive_extract_failed(archive, err))?;
        Ok(())
    }
}

struct ZipArchiveHandle {
    path: PathBuf,
    writer: ZipWriter<BufWriter<File>>,
    parameters: ArchiveParameters,
}

impl ArchiveHandle for ZipArchiveHandle {
    fn add_file(&mut self, source: &Path, name_in_archive: &str) -> Result<(), Error> {
        let mut input = File::open(source).map_err(|err| IOError::read_file_failed(source, err))?;
        let length = input
            .metadata()
            .map_err(|err| IOError::get_metadata_failed(source, err))?
            .len();
        self.writer
            .start_file(name_in_archive, file_options(self.parameters, length))
            .map_err(|err| BackupError::archive_write_failed(&self.path, err))?;
        io::copy(&mut input, &mut self.writer)
            .map_err(|err| BackupError::archive_write_failed(&self.path, err))?;
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), Error> {
        let path = self.path;
        let mut buffered = self
            .writer
            .finish()
            .map_err(|err| BackupError::archive_write_failed(&path, err))?;
        buffered
            .flush()
            .map_err(|err| BackupError::archive_write_failed(&path, err))?;
        buffered
            .get_ref()
            .sync_all()
            .map_err(|err| BackupError::archive_write_failed(&path, err))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn writes_and_extracts_nested_entries() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("level.dat");
        fs::write(&source, b"level data").unwrap();

        let archiver = ZipArchiver::new(ArchiveParameters::default());
        let archive = temp.path().join("out.zip");
        let mut handle = archiver.create_archive(&archive).unwrap();
        handle.add_file(&source, "region/level.dat").unwrap();
        handle.close().unwrap();

        let destination = temp.path().join("extract");
        archiver.extract_all(&archive, &destination).unwrap();
        assert_eq!(
            fs::read(destination.join("region").join("level.dat")).unwrap(),
            b"level data"
        );
    }

    #[test]
    fn refuses_to_overwrite_existing_archive() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("out.zip");
        fs::write(&archive, b"existing").unwrap();

        let archiver = ZipArchiver::new(ArchiveParameters::default());
        let result = archiver.create_archive(&archive);
        assert!(matches!(
            result,
            Err(Error::Backup(BackupError::ArchiveAlreadyExists { .. }))
        ));
        assert_eq!(fs::read(&archive).unwrap(), b"existing");
    }
}
