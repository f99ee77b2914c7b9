//! # Logbook
//!
//! A personal flight logbook: aircraft and flights stored in an embedded
//! SQLite database, with simple statistics and CSV export.
//!
//! ## Layout
//!
//! - [`db`]: the generic record store and the aircraft/flight managers
//! - [`libs`]: domain types, scheduler, configuration, messages and views
//! - [`commands`]: the `logbook` command-line front end
//!
//! ## Usage
//!
//! ```rust,no_run
//! use logbook::libs::logbook::Logbook;
//!
//! let (logbook, _queue) = Logbook::open()?;
//! let flights = logbook.flights().get_all_blocking();
//! println!("{} flights logged", flights.len());
//! logbook.close()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod commands;
pub mod db;
pub mod libs;
