pub mod backup;
pub mod io;
pub mod system;
pub mod task;

use crate::model::error::backup::BackupError;
use crate::model::error::io::IOError;
use crate::model::error::system::SystemError;
use crate::model::error::task::TaskError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum Error {
    #[error(transparent)]
    Backup(#[from] BackupError),
    #[error(transparent)]
    IO(#[from] IOError),
    #[error(transparent)]
    System(#[from] SystemError),
    #[error(transparent)]
    Task(#[from] TaskError),
}

impl Error {
    pub fn level(&self) -> tracing::Level {
        match self {
            Error::Backup(err) => err.level(),
            Error::IO(err) => err.level(),
            Error::System(err) => err.level(),
            Error::Task(err) => err.level(),
        }
    }

    pub fn log(&self) {
        match self {
            Error::Backup(err) => err.log(),
            Error::IO(err) => err.log(),
            Error::System(err) => err.log(),
            Error::Task(err) => err.log(),
        }
    }
}
