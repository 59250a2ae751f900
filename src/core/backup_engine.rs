use crate::core::job::{Job, JobOutcome};
use crate::model::error::Error;
use crate::model::error::task::TaskError;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::join_all;
use macros::log;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Semaphore, oneshot};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Completion side of a submitted job.
pub struct JobHandle {
    pub uuid: Uuid,
    receiver: oneshot::Receiver<JobOutcome>,
}

impl JobHandle {
    pub async fn wait(self) -> JobOutcome {
        self.receiver.await.unwrap_or(JobOutcome::Cancelled)
    }
}

/// Worker pool running backup, purge and export jobs.
///
/// At most one job per BackupRoot is queued or running; a second request for
/// the same root is rejected, never queued. Parallelism across roots is
/// bounded by `max_concurrency` permits and every job runs to completion on a
/// single blocking worker.
pub struct BackupEngine {
    busy_roots: Arc<DashMap<PathBuf, Uuid>>,
    running_jobs: DashMap<Uuid, JoinHandle<()>>,
    semaphore: Arc<Semaphore>,
    permits: AtomicUsize,
    shutting_down: AtomicBool,
}

impl BackupEngine {
    pub fn new(max_concurrency: usize) -> Self {
        let permits = max_concurrency.max(1);
        Self {
            busy_roots: Arc::new(DashMap::new()),
            running_jobs: DashMap::new(),
            semaphore: Arc::new(Semaphore::new(permits)),
            permits: AtomicUsize::new(permits),
            shutting_down: AtomicBool::new(false),
        }
    }

    pub fn submit(&self, job: Job) -> Result<JobHandle, Error> {
        if self.shutting_down.load(Ordering::SeqCst) {
            Err(TaskError::ShuttingDown)?
        }

        let root = job.root().to_path_buf();
        let uuid = Uuid::new_v4();
        match self.busy_roots.entry(root.clone()) {
            Entry::Occupied(_) => Err(TaskError::root_busy(&root))?,
            Entry::Vacant(entry) => {
                entry.insert(uuid);
            }
        }

        let (tx, rx) = oneshot::channel();
        let busy_roots = self.busy_roots.clone();
        let semaphore = self.semaphore.clone();
        let handle = tokio::spawn(async move {
            let outcome = match semaphore.acquire_owned().await {
                Ok(permit) => {
                    let outcome = match tokio::task::spawn_blocking(move || job.run()).await {
                        Ok(outcome) => outcome,
                        Err(err) => {
                            let err = Error::from(TaskError::thread_panic(err));
                            log!(err);
                            JobOutcome::Failed(err)
                        }
                    };
                    drop(permit);
                    outcome
                }
                Err(_) => JobOutcome::Cancelled,
            };

            busy_roots.remove(&root);
            // The submitter may have dropped its handle.
            let _ = tx.send(outcome);
        });

        self.running_jobs.retain(|_, handle| !handle.is_finished());
        self.running_jobs.insert(uuid, handle);
        Ok(JobHandle { uuid, receiver: rx })
    }

    pub fn is_busy(&self, root: &Path) -> bool {
        self.busy_roots.contains_key(root)
    }

    pub fn max_concurrency(&self) -> usize {
        self.permits.load(Ordering::SeqCst)
    }

    /// Changes the number of permits without rebuilding the pool. Running jobs
    /// keep their permits; a shrink takes effect as they are released.
    pub fn resize(&self, max_concurrency: usize) {
        let target = max_concurrency.max(1);
        let current = self.permits.swap(target, Ordering::SeqCst);

        if target > current {
            self.semaphore.add_permits(target - current);
        } else if target < current {
            let excess = current - target;
            let remaining = excess - self.semaphore.forget_permits(excess);
            if remaining > 0 {
                let semaphore = self.semaphore.clone();
                tokio::spawn(async move {
                    if let Ok(permits) = semaphore.acquire_many_owned(remaining as u32).await {
                        permits.forget();
                    }
                });
            }
        }
    }

    /// Rejects new jobs, cancels jobs still waiting for a permit and waits for
    /// running jobs to finish.
    pub async fn terminate(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
        self.semaphore.close();

        let uuids: Vec<Uuid> = self.running_jobs.iter().map(|pair| *pair.key()).collect();
        let handles: Vec<JoinHandle<()>> = uuids
            .iter()
            .filter_map(|uuid| self.running_jobs.remove(uuid).map(|(_, handle)| handle))
            .collect();

        for result in join_all(handles).await {
            if let Err(err) = result {
                log!(TaskError::thread_panic(err));
            }
        }
    }
}
