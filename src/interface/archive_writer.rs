use crate::model::error::Error;
use std::path::Path;

/// Container format used for archives.
///
/// Strategies only ever see this trait, so the on-disk format is decided by
/// whoever constructs them.
pub trait ArchiveWriter: Send + Sync {
    /// File extension of produced archives, without the leading dot.
    fn extension(&self) -> &str;

    /// Starts a new archive at `path`. The file must not exist yet.
    fn create_archive(&self, path: &Path) -> Result<Box<dyn ArchiveHandle>, Error>;

    /// Extracts every entry of `archive` below `destination`.
    fn extract_all(&self, archive: &Path, destination: &Path) -> Result<(), Error>;
}

pub trait ArchiveHandle: Send {
    fn add_file(&mut self, source: &Path, name_in_archive: &str) -> Result<(), Error>;

    /// Flushes and finalizes the archive. Dropping a handle without closing it
    /// leaves an incomplete file behind.
    fn close(self: Box<Self>) -> Result<(), Error>;
}
