//! Completion callbacks delivered on the main thread.
//!
//! Work submitted through a [`Dispatcher`] runs on a [`TaskRunner`]; its
//! result is handed to a callback, and that callback is queued on a
//! [`UiQueue`] instead of being run on the worker. The thread that owns the
//! queue (the command loop in `main`) drains it, so callbacks that touch the
//! terminal never race each other or the prompt.
//!
//! ```rust
//! use logbook::libs::dispatch::{ui_channel, Dispatcher};
//! use logbook::libs::scheduler::InlineRunner;
//! use std::sync::Arc;
//!
//! let (sender, mut queue) = ui_channel();
//! let dispatcher = Dispatcher::new(Arc::new(InlineRunner), sender);
//! dispatcher.run_with_callback(|| 2 + 2, |sum| assert_eq!(sum, 4)).unwrap();
//! assert_eq!(queue.drain(), 1);
//! ```

use super::scheduler::{SchedulerError, TaskRunner};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

pub type Callback = Box<dyn FnOnce() + Send + 'static>;

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Creates a connected sender/queue pair.
pub fn ui_channel() -> (UiSender, UiQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UiSender { tx }, UiQueue { rx })
}

/// Posting side of the UI queue. Cheap to clone into worker closures.
#[derive(Clone)]
pub struct UiSender {
    tx: UnboundedSender<Callback>,
}

impl UiSender {
    /// Queues `callback` for the main thread. Returns `false` when the queue
    /// is gone, in which case the callback is dropped unrun.
    pub fn post(&self, callback: impl FnOnce() + Send + 'static) -> bool {
        if self.tx.send(Box::new(callback)).is_err() {
            debug!("ui queue closed, dropping callback");
            return false;
        }
        true
    }
}

/// Receiving side of the UI queue, owned by the main thread.
pub struct UiQueue {
    rx: UnboundedReceiver<Callback>,
}

impl UiQueue {
    /// Runs every callback queued so far and returns how many ran.
    pub fn drain(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(callback) = self.rx.try_recv() {
            callback();
            ran += 1;
        }
        ran
    }

    /// Blocks until one callback arrives and runs it. Returns `false` once
    /// every sender has been dropped and the queue is empty.
    ///
    /// Must not be called from inside an async runtime.
    pub fn run_next(&mut self) -> bool {
        match self.rx.blocking_recv() {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Like [`UiQueue::run_next`] but gives up after `timeout`.
    pub fn run_next_timeout(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            match self.rx.try_recv() {
                Ok(callback) => {
                    callback();
                    return true;
                }
                Err(TryRecvError::Disconnected) => return false,
                Err(TryRecvError::Empty) if Instant::now() >= deadline => return false,
                Err(TryRecvError::Empty) => thread::sleep(POLL_INTERVAL),
            }
        }
    }
}

/// Runs work off the caller's thread and routes its result to the UI queue.
#[derive(Clone)]
pub struct Dispatcher {
    runner: Arc<dyn TaskRunner>,
    ui: UiSender,
}

impl Dispatcher {
    pub fn new(runner: Arc<dyn TaskRunner>, ui: UiSender) -> Self {
        Self { runner, ui }
    }

    /// Submits `work` to the runner; when it finishes, `callback` receives
    /// its result on the UI queue.
    ///
    /// If `work` panics the callback is not called, but it is still dropped
    /// on the UI queue so the queue owner wakes up and sees it go.
    ///
    /// Fails only when the runner no longer accepts work.
    pub fn run_with_callback<T, W, C>(&self, work: W, callback: C) -> Result<(), SchedulerError>
    where
        T: Send + 'static,
        W: FnOnce() -> T + Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        let ui = self.ui.clone();
        self.runner.run_async(Box::new(move || match panic::catch_unwind(AssertUnwindSafe(work)) {
            Ok(result) => {
                ui.post(move || callback(result));
            }
            Err(_) => {
                error!("background work panicked, dropping its callback");
                ui.post(move || drop(callback));
            }
        }))
    }

    /// Submits `work` with no completion callback.
    pub fn run(&self, work: impl FnOnce() + Send + 'static) -> Result<(), SchedulerError> {
        self.runner.run_async(Box::new(work))
    }
}
