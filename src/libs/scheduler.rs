//! Background task scheduling for blocking database work.
//!
//! The [`Scheduler`] owns a private tokio runtime and exposes three
//! primitives on top of it:
//!
//! - [`Scheduler::run_async`]: fire-and-forget work on the elastic blocking
//!   pool (threads are added on demand and reaped when idle)
//! - [`Scheduler::run_async_after_delay`]: one-shot work after a delay,
//!   cancellable until it fires
//! - [`Scheduler::run_repeating`]: fixed-delay repetition, cancellable
//!
//! Timers are driven by a small fixed set of runtime workers
//! ([`SchedulerConfig::timer_workers`]); the work itself always runs on the
//! blocking pool so a slow database call never stalls a timer.
//!
//! ## Ownership
//!
//! There is no global instance. The process entry point builds one
//! scheduler, shares it (behind an `Arc`) with everything that needs it and
//! calls [`Scheduler::shutdown`] once on exit. Delayed and repeating tasks
//! are tracked in a registry owned by the scheduler; callers only hold an
//! opaque [`TaskId`]. Entries leave the registry when cancelled or, for
//! one-shot tasks, when they fire.
//!
//! ## Cancellation
//!
//! Cancelling suppresses future executions only. A run that has already
//! started is never interrupted. Cancelling an unknown or already cancelled
//! task is a no-op.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use logbook::libs::scheduler::{Scheduler, SchedulerConfig};
//! use std::time::Duration;
//!
//! let scheduler = Scheduler::start(SchedulerConfig::default())?;
//! scheduler.run_async(Box::new(|| println!("on a worker thread")))?;
//! let id = scheduler.run_repeating(|| println!("tick"), Duration::ZERO, Duration::from_secs(1))?;
//! scheduler.cancel_task(id);
//! scheduler.shutdown();
//! # Ok::<(), logbook::libs::scheduler::SchedulerError>(())
//! ```

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// A unit of fire-and-forget work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("scheduler has been shut down")]
    ShutDown,
    #[error("failed to start worker runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Anything that can take a job off the caller's thread.
///
/// [`Scheduler`] is the production implementation; [`InlineRunner`] runs
/// jobs synchronously and stands in for it in tests.
pub trait TaskRunner: Send + Sync {
    fn run_async(&self, job: Job) -> Result<(), SchedulerError>;
}

/// Runs every job immediately on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineRunner;

impl TaskRunner for InlineRunner {
    fn run_async(&self, job: Job) -> Result<(), SchedulerError> {
        job();
        Ok(())
    }
}

/// Opaque handle to a delayed or repeating task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Runtime worker threads driving timers.
    pub timer_workers: usize,
    /// How long [`Scheduler::shutdown`] waits for in-flight work.
    pub shutdown_grace: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timer_workers: 4,
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

type Registry = Arc<Mutex<HashMap<TaskId, JoinHandle<()>>>>;

pub struct Scheduler {
    runtime: Mutex<Option<Runtime>>,
    handle: Handle,
    accepting: AtomicBool,
    next_id: AtomicU64,
    tasks: Registry,
    shutdown_grace: Duration,
}

impl Scheduler {
    /// Builds the runtime and starts accepting work.
    pub fn start(config: SchedulerConfig) -> Result<Scheduler, SchedulerError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.timer_workers.max(1))
            .thread_name("logbook-worker")
            .enable_time()
            .build()?;
        let handle = runtime.handle().clone();
        info!("scheduler started with {} timer workers", config.timer_workers.max(1));

        Ok(Scheduler {
            runtime: Mutex::new(Some(runtime)),
            handle,
            accepting: AtomicBool::new(true),
            next_id: AtomicU64::new(1),
            tasks: Arc::new(Mutex::new(HashMap::new())),
            shutdown_grace: config.shutdown_grace,
        })
    }

    /// Submits `job` to the blocking pool and returns immediately.
    ///
    /// There is no ordering between separate submissions.
    pub fn run_async(&self, job: Job) -> Result<(), SchedulerError> {
        self.ensure_accepting()?;
        let blocking = self.handle.spawn_blocking(job);
        self.handle.spawn(async move {
            if let Err(e) = blocking.await {
                error!("background job failed: {e}");
            }
        });
        Ok(())
    }

    /// Runs `job` once after `delay`. The returned id cancels it until it
    /// starts.
    pub fn run_async_after_delay(&self, job: Job, delay: Duration) -> Result<TaskId, SchedulerError> {
        self.ensure_accepting()?;
        let id = self.next_task_id();
        let tasks = Arc::clone(&self.tasks);

        // Registry lock is held across the spawn so the task cannot fire and
        // deregister before it is registered.
        let mut registry = self.tasks.lock();
        let handle = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            tasks.lock().remove(&id);
            if let Err(e) = tokio::task::spawn_blocking(job).await {
                error!("{id} failed: {e}");
            }
        });
        registry.insert(id, handle);
        debug!("scheduled {id} after {delay:?}");
        Ok(id)
    }

    /// Runs `work` after `initial_delay`, then again `interval` after each
    /// run completes (fixed delay, not fixed rate).
    pub fn run_repeating<F>(&self, work: F, initial_delay: Duration, interval: Duration) -> Result<TaskId, SchedulerError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.ensure_accepting()?;
        let id = self.next_task_id();
        let work = Arc::new(work);

        let mut registry = self.tasks.lock();
        let handle = self.handle.spawn(async move {
            tokio::time::sleep(initial_delay).await;
            loop {
                let run = Arc::clone(&work);
                if let Err(e) = tokio::task::spawn_blocking(move || run()).await {
                    error!("{id} run failed: {e}");
                }
                tokio::time::sleep(interval).await;
            }
        });
        registry.insert(id, handle);
        debug!("scheduled repeating {id} every {interval:?}");
        Ok(id)
    }

    /// Stops future executions of `id`. Returns whether the task was still
    /// registered.
    pub fn cancel_task(&self, id: TaskId) -> bool {
        match self.tasks.lock().remove(&id) {
            Some(handle) => {
                handle.abort();
                debug!("cancelled {id}");
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        let drained: Vec<(TaskId, JoinHandle<()>)> = self.tasks.lock().drain().collect();
        for (id, handle) in drained {
            handle.abort();
            debug!("cancelled {id}");
        }
    }

    /// Whether `id` is still pending (delayed) or still repeating.
    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.lock().contains_key(&id)
    }

    pub fn scheduled_count(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Stops accepting work, cancels periodic tasks and waits up to the
    /// configured grace period for running jobs before tearing the runtime
    /// down. Calling it again does nothing.
    ///
    /// Must not be called from a thread owned by this scheduler.
    pub fn shutdown(&self) {
        self.accepting.store(false, Ordering::SeqCst);
        self.cancel_all();
        let runtime = self.runtime.lock().take();
        if let Some(runtime) = runtime {
            info!("shutting down scheduler, waiting up to {:?}", self.shutdown_grace);
            runtime.shutdown_timeout(self.shutdown_grace);
        }
    }

    pub fn is_shut_down(&self) -> bool {
        !self.accepting.load(Ordering::SeqCst)
    }

    fn ensure_accepting(&self) -> Result<(), SchedulerError> {
        if self.accepting.load(Ordering::SeqCst) {
            Ok(())
        } else {
            warn!("rejected work submitted after shutdown");
            Err(SchedulerError::ShutDown)
        }
    }

    fn next_task_id(&self) -> TaskId {
        TaskId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl TaskRunner for Scheduler {
    fn run_async(&self, job: Job) -> Result<(), SchedulerError> {
        Scheduler::run_async(self, job)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.get_mut().take() {
            runtime.shutdown_background();
        }
    }
}
