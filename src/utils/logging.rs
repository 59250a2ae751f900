use crate::model::error::Error;
use crate::model::error::io::IOError;
use crate::model::error::system::SystemError;
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE_PREFIX: &str = "zipsphere.log";

pub struct Logging;

impl Logging {
    /// Installs the global subscriber. The returned guard flushes the file
    /// writer on drop and must outlive every log call.
    pub fn initialize(log_directory: &Path) -> Result<WorkerGuard, Error> {
        fs::create_dir_all(log_directory)
            .map_err(|err| IOError::create_directory_failed(log_directory, err))?;

        let file_appender = tracing_appender::rolling::daily(log_directory, LOG_FILE_PREFIX);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .with(fmt::layer().with_ansi(false).with_writer(file_writer))
            .try_init()
            .map_err(SystemError::logging_init_failed)?;

        log_panics::init();

        Ok(guard)
    }
}
