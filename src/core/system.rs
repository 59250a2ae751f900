use crate::core::app_config::AppConfig;
use crate::core::backup_engine::BackupEngine;
use crate::core::schedule::timer::ScheduleTimer;
use crate::model::error::Error;
use crate::model::error::system::SystemError;
use crate::model::error::task::TaskError;
use crate::model::log::system::SystemLog;
use crate::utils::logging::Logging;
use macros::log;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing_appender::non_blocking::WorkerGuard;

pub struct System {
    app_config: Arc<AppConfig>,
    engine: Arc<BackupEngine>,
    timer_shutdown: oneshot::Sender<()>,
    timer_refresh: mpsc::UnboundedSender<()>,
    timer_handle: JoinHandle<()>,
    _log_guard: WorkerGuard,
}

impl System {
    pub async fn initialize() -> Result<Self, Error> {
        let app_config = Arc::new(AppConfig::load()?);
        let config = app_config.now().await;
        let log_guard = Logging::initialize(&config.general.log_directory)?;
        log!(SystemLog::Initializing);

        let engine = Arc::new(BackupEngine::new(config.general.max_concurrency));
        let (timer_shutdown, shutdown_rx) = oneshot::channel();
        let (timer_refresh, refresh_rx) = mpsc::unbounded_channel();
        let timer = ScheduleTimer::new(app_config.clone(), engine.clone(), shutdown_rx, refresh_rx);
        let timer_handle = tokio::spawn(timer.run());

        log!(SystemLog::InitializeComplete);
        Ok(Self {
            app_config,
            engine,
            timer_shutdown,
            timer_refresh,
            timer_handle,
            _log_guard: log_guard,
        })
    }

    /// Runs until Ctrl-C. On unix, SIGHUP reloads the configuration.
    pub async fn run(&self) -> Result<(), Error> {
        log!(SystemLog::Online);

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut hangup =
                signal(SignalKind::hangup()).map_err(SystemError::signal_handler_failed)?;
            loop {
                tokio::select! {
                    result = tokio::signal::ctrl_c() => {
                        result.map_err(SystemError::signal_handler_failed)?;
                        break;
                    }
                    _ = hangup.recv() => self.reload().await,
                }
            }
        }

        #[cfg(not(unix))]
        tokio::signal::ctrl_c()
            .await
            .map_err(SystemError::signal_handler_failed)?;

        Ok(())
    }

    /// Swaps in the configuration file's current content. The engine keeps its
    /// workers and only adjusts its permit count.
    pub async fn reload(&self) {
        match self.app_config.reload().await {
            Ok(config) => {
                self.engine.resize(config.general.max_concurrency);
                if self.timer_refresh.send(()).is_err() {
                    log!(SystemError::ShutdownSignalFailed);
                }
                log!(SystemLog::ConfigReloaded {
                    path: self.app_config.path().to_path_buf()
                });
            }
            Err(err) => log!(err),
        }
    }

    pub async fn terminate(self) {
        log!(SystemLog::Terminating);

        if self.timer_shutdown.send(()).is_err() {
            log!(SystemError::ShutdownSignalFailed);
        }
        if let Err(err) = self.timer_handle.await {
            log!(TaskError::thread_panic(err));
        }
        self.engine.terminate().await;

        log!(SystemLog::TerminateComplete);
    }
}
