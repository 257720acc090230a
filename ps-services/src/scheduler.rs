//! Cancellable background jobs.
//!
//! A `ScheduledTask` owns the tokio task it spawned. Cancelling (or dropping)
//! it wakes the job's `select!` and aborts the task, so no tick runs after
//! `cancel` returns.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

/// Handle to a spawned periodic, delayed or long-running job.
pub struct ScheduledTask {
    name: String,
    handle: Option<JoinHandle<()>>,
    cancel: Arc<Notify>,
}

impl ScheduledTask {
    /// Run `job` every `period`. The first run happens one period after spawning.
    pub fn every<F, Fut>(name: impl Into<String>, period: Duration, mut job: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let cancel = Arc::new(Notify::new());
        let stop = cancel.clone();
        let label = name.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick of a tokio interval completes immediately
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        trace!("scheduled task {label} tick");
                        job().await;
                    }
                    _ = stop.notified() => {
                        debug!("scheduled task {label} cancelled");
                        break;
                    }
                }
            }
        });

        debug!("scheduled task {name} started (every {period:?})");
        Self {
            name,
            handle: Some(handle),
            cancel,
        }
    }

    /// Run `job` once after `delay` unless cancelled first.
    pub fn after<Fut>(name: impl Into<String>, delay: Duration, job: Fut) -> Self
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::spawn(name, async move {
            tokio::time::sleep(delay).await;
            job.await;
        })
    }

    /// Run an arbitrary future until it finishes or the task is cancelled.
    pub fn spawn<Fut>(name: impl Into<String>, job: Fut) -> Self
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let cancel = Arc::new(Notify::new());
        let stop = cancel.clone();
        let label = name.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = job => trace!("task {label} finished"),
                _ = stop.notified() => debug!("task {label} cancelled"),
            }
        });

        Self {
            name,
            handle: Some(handle),
            cancel,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the job has completed or been cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Stop the job. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.cancel.notify_one();
            handle.abort();
            debug!("scheduled task {} stopped", self.name);
        }
    }

    /// Wait for a one-shot job to complete on its own.
    pub async fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_every_runs_periodically_until_cancelled() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let mut task = ScheduledTask::every("counter", Duration::from_secs(10), move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        task.cancel();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_after_can_be_cancelled() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let task = ScheduledTask::after("once", Duration::from_secs(2), async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        drop(task);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_after_runs_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let task = ScheduledTask::after("once", Duration::from_secs(2), async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        task.join().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
