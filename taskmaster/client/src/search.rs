use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Quiet period before a search term is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Runs at most one job at a time, each after a quiet period.
///
/// Scheduling a job aborts the pending one and advances the generation.
/// A job that has already started its request when it is superseded can
/// still observe that through its [`Ticket`] and drop its result.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

/// Identifies one scheduled job.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: Arc<AtomicU64>,
    issued: u64,
}

impl Ticket {
    /// True until another job is scheduled on the same debouncer.
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.issued
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `job` once the quiet period passes without another call.
    pub fn schedule<F, Fut>(&mut self, job: F)
    where
        F: FnOnce(Ticket) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.spawn_after(self.delay, job);
    }

    /// Runs `job` right away, still superseding whatever was pending.
    pub fn run_now<F, Fut>(&mut self, job: F)
    where
        F: FnOnce(Ticket) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.spawn_after(Duration::ZERO, job);
    }

    fn spawn_after<F, Fut>(&mut self, delay: Duration, job: F)
    where
        F: FnOnce(Ticket) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.invalidate();
        let work = job(ticket);
        self.pending = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            work.await;
        }));
    }

    /// Aborts the pending job and makes every outstanding ticket stale.
    pub fn cancel(&mut self) {
        self.invalidate();
    }

    fn invalidate(&mut self) -> Ticket {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        let issued = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            generation: self.generation.clone(),
            issued,
        }
    }

    /// True while a scheduled job has not finished.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
