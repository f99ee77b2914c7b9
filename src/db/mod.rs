//! Persistence layer.
//!
//! - [`db`]: the generic record store over SQLite tables
//! - [`value`]: the tagged cell type and row records it returns
//! - [`aircraft`] and [`flights`]: typed managers for the two logbook tables,
//!   each with blocking and scheduler-backed variants of every operation
//!
//! ## Usage
//!
//! ```rust,no_run
//! use logbook::db::{aircraft::AircraftManager, db::Db};
//! use logbook::libs::aircraft::Aircraft;
//! use logbook::libs::airframe::Airframe;
//! use logbook::libs::dispatch::{ui_channel, Dispatcher};
//! use logbook::libs::scheduler::InlineRunner;
//! use std::sync::Arc;
//!
//! let (sender, _queue) = ui_channel();
//! let manager = AircraftManager::new(Db::open("logbook.db")?, Dispatcher::new(Arc::new(InlineRunner), sender));
//! manager.create_table();
//! manager.add_blocking(&Aircraft::new("C-FXCD", Airframe::A320, "CFM56"));
//! # Ok::<(), logbook::db::db::StoreError>(())
//! ```

pub mod aircraft;
pub mod db;
pub mod flights;
pub mod value;
