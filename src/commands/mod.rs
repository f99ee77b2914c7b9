//! Command-line front end.
//!
//! Every subcommand opens a [`Session`], issues its manager calls through
//! the async API and lets [`Session::call`] run the completion callbacks on
//! the main thread. The session is closed on the way out whether or not the
//! command succeeded, which saves the configuration and stops the
//! scheduler.

pub mod aircraft;
pub mod config;
pub mod export;
pub mod flight;
pub mod stats;

use crate::libs::dispatch::UiQueue;
use crate::libs::logbook::Logbook;
use crate::libs::messages::Message;
use crate::libs::scheduler::SchedulerError;
use crate::msg_error_anyhow;
use anyhow::Result;
use clap::{Parser, Subcommand};
use parking_lot::Mutex;
use std::sync::Arc;

/// Completion callback handed to an async manager call.
pub type Reply<T> = Box<dyn FnOnce(T) + Send + 'static>;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Manage aircraft", arg_required_else_help = true)]
    Aircraft(aircraft::AircraftArgs),
    #[command(about = "Log and review flights", arg_required_else_help = true)]
    Flight(flight::FlightArgs),
    #[command(about = "Show logbook statistics")]
    Stats,
    #[command(about = "Export a table to CSV", arg_required_else_help = true)]
    Export(export::ExportArgs),
    #[command(about = "Change settings", arg_required_else_help = true)]
    Config(config::ConfigArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        cli.execute(Session::open()?)
    }

    /// Runs the parsed command against `session` and closes it afterwards.
    /// A command that fails still closes the session; its error wins.
    pub fn execute(self, mut session: Session) -> Result<()> {
        let result = match self.command {
            Commands::Aircraft(args) => aircraft::cmd(args, &mut session),
            Commands::Flight(args) => flight::cmd(args, &mut session),
            Commands::Stats => stats::cmd(&mut session),
            Commands::Export(args) => export::cmd(args, &mut session),
            Commands::Config(args) => config::cmd(args, &mut session),
        };

        let closed = session.close();
        result.and(closed)
    }
}

/// An open logbook plus the queue its callbacks arrive on.
pub struct Session {
    logbook: Logbook,
    queue: UiQueue,
}

impl Session {
    pub fn open() -> Result<Session> {
        let (logbook, queue) = Logbook::open()?;
        Ok(Session { logbook, queue })
    }

    pub fn new(logbook: Logbook, queue: UiQueue) -> Self {
        Self { logbook, queue }
    }

    pub fn logbook(&self) -> &Logbook {
        &self.logbook
    }

    pub fn logbook_mut(&mut self) -> &mut Logbook {
        &mut self.logbook
    }

    /// Issues one async call and runs queued callbacks until its own reply
    /// has arrived, then returns that reply.
    ///
    /// Fails when the reply is dropped without being called, which is what
    /// happens to the callback of work that panicked.
    pub fn call<T, F>(&mut self, submit: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Reply<T>) -> Result<(), SchedulerError>,
    {
        let slot: Arc<Mutex<Option<T>>> = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&slot);
        submit(Box::new(move |value| *sink.lock() = Some(value)))?;

        loop {
            if let Some(value) = slot.lock().take() {
                return Ok(value);
            }
            if Arc::strong_count(&slot) == 1 {
                return Err(msg_error_anyhow!(Message::BackgroundWorkRejected("background work failed".to_string())));
            }
            if !self.queue.run_next() {
                return Err(msg_error_anyhow!(Message::BackgroundWorkRejected("callback queue closed".to_string())));
            }
        }
    }

    pub fn close(self) -> Result<()> {
        self.logbook.close()
    }
}
