use crate::core::app_config::AppConfig;
use crate::core::backup_engine::BackupEngine;
use crate::core::job::Job;
use crate::core::purge::retention_engine::RetentionEngine;
use crate::core::schedule::schedule_table::{Schedule, ScheduleTarget};
use crate::model::config::Config;
use crate::model::error::system::SystemError;
use macros::log;
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, sleep_until};

const IDLE_WAKEUP: Duration = Duration::from_secs(60);

/// Turns configured intervals into jobs for the engine.
pub struct ScheduleTimer {
    app_config: Arc<AppConfig>,
    engine: Arc<BackupEngine>,
    shutdown_rx: Option<oneshot::Receiver<()>>,
    refresh_rx: mpsc::UnboundedReceiver<()>,
}

impl ScheduleTimer {
    pub fn new(
        app_config: Arc<AppConfig>,
        engine: Arc<BackupEngine>,
        shutdown_rx: oneshot::Receiver<()>,
        refresh_rx: mpsc::UnboundedReceiver<()>,
    ) -> Self {
        ScheduleTimer {
            app_config,
            engine,
            shutdown_rx: Some(shutdown_rx),
            refresh_rx,
        }
    }

    pub async fn run(mut self) {
        let Some(mut shutdown_rx) = self.shutdown_rx.take() else {
            log!(SystemError::ShutdownSignalFailed);
            return;
        };

        let config = self.app_config.now().await;
        for target in Schedule::startup_targets(&config) {
            self.dispatch(&config, target);
        }
        let mut schedule = Schedule::from_config(&config, Instant::now());

        loop {
            let wakeup = schedule
                .next_run()
                .unwrap_or_else(|| Instant::now() + IDLE_WAKEUP);
            select! {
                biased;
                _ = &mut shutdown_rx => break,
                refresh = self.refresh_rx.recv() => {
                    if refresh.is_none() {
                        break;
                    }
                    let config = self.app_config.now().await;
                    schedule = Schedule::from_config(&config, Instant::now());
                    continue;
                }
                _ = sleep_until(wakeup) => {}
            }

            let config = self.app_config.now().await;
            for target in schedule.take_due(Instant::now()) {
                self.dispatch(&config, target);
            }
        }
    }

    /// Submits without waiting; each job logs its own result.
    fn dispatch(&self, config: &Config, target: ScheduleTarget) {
        let jobs = match target {
            ScheduleTarget::Backup(subject) => match Job::backup(config, &subject) {
                Ok(job) => vec![job],
                Err(err) => {
                    log!(err);
                    return;
                }
            },
            ScheduleTarget::Purge => {
                RetentionEngine::subject_roots(&config.general.backup_directory)
                    .into_iter()
                    .map(|root| Job::purge(config, root))
                    .collect()
            }
        };

        for job in jobs {
            if let Err(err) = self.engine.submit(job) {
                log!(err);
            }
        }
    }
}
