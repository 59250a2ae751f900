use macros::loggable;
use std::path::PathBuf;

loggable! {
    SystemLog {
        #[error("Initializing")]
        Initializing => tracing::Level::INFO,

        #[error("Initialization completed")]
        InitializeComplete => tracing::Level::INFO,

        #[error("Online")]
        Online => tracing::Level::INFO,

        #[error("Configuration reloaded: {path}")]
        ConfigReloaded { path: PathBuf } => tracing::Level::INFO,

        #[error("Unknown compression level '{value}', falling back to normal")]
        UnknownCompressionLevel { value: String } => tracing::Level::WARN,

        #[error("Termination in process")]
        Terminating => tracing::Level::INFO,

        #[error("Termination completed")]
        TerminateComplete => tracing::Level::INFO,
    }
}
