use macros::traceable;
use std::path::PathBuf;

traceable! {
    SystemError {
        #[error("Configuration not found: {path}")]
        ConfigNotFound { path: PathBuf } => tracing::Level::ERROR,

        #[error("Invalid configuration")]
        InvalidConfig => tracing::Level::ERROR,

        #[error("Failed to initialize logging")]
        LoggingInitFailed => tracing::Level::ERROR,

        #[error("Failed to install signal handler")]
        SignalHandlerFailed => tracing::Level::ERROR,

        #[no_source]
        #[error("Failed to send shutdown signal")]
        ShutdownSignalFailed => tracing::Level::ERROR,
    }
}
