//! Startup and shutdown of a logbook session.
//!
//! [`Logbook::open`] performs every startup step in order and fails on the
//! first one that does not succeed:
//!
//! 1. create the working directory
//! 2. load the configuration
//! 3. open the database and test a connection
//! 4. start the scheduler
//! 5. create the `aircraft` and `flights` tables
//! 6. check the airframe catalog and that every stored airframe code is
//!    known
//!
//! It returns the session together with the [`UiQueue`] that receives the
//! completion callbacks of every async manager call. The caller keeps the
//! queue on its own thread and drains it.
//!
//! [`Logbook::close`] saves the configuration and shuts the scheduler down
//! with the configured grace period.

use super::airframe::Airframe;
use super::config::Config;
use super::data_storage::DataStorage;
use super::dispatch::{ui_channel, Dispatcher, UiQueue};
use super::messages::Message;
use super::scheduler::Scheduler;
use crate::db::aircraft::{self, AircraftManager};
use crate::db::db::{Db, DB_FILE_NAME};
use crate::db::flights::{self, FlightManager};
use crate::{msg_bail_anyhow, msg_error_anyhow};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub struct Logbook {
    storage: DataStorage,
    config: Config,
    db: Db,
    scheduler: Arc<Scheduler>,
    aircraft: AircraftManager,
    flights: FlightManager,
}

impl Logbook {
    /// Opens the session in the default application data directory.
    pub fn open() -> Result<(Logbook, UiQueue)> {
        Self::open_at(DataStorage::new())
    }

    pub fn open_at(storage: DataStorage) -> Result<(Logbook, UiQueue)> {
        storage
            .ensure_dir()
            .map_err(|e| msg_error_anyhow!(Message::WorkingDirFailed(e.to_string())))?;

        let config = Config::read_from(&storage).map_err(|e| msg_error_anyhow!(Message::ConfigLoadError(e.to_string())))?;

        let db = Db::open(storage.base_path().join(DB_FILE_NAME))
            .map_err(|e| msg_error_anyhow!(Message::DatabaseUnavailable(e.to_string())))?;
        if !db.test_connection() {
            msg_bail_anyhow!(Message::DatabaseUnavailable(db.path().display().to_string()));
        }

        let scheduler = Arc::new(
            Scheduler::start(config.scheduler()).map_err(|e| msg_error_anyhow!(Message::SchedulerStartFailed(e.to_string())))?,
        );
        let (sender, queue) = ui_channel();
        let dispatcher = Dispatcher::new(scheduler.clone(), sender);

        let aircraft = AircraftManager::new(db.clone(), dispatcher.clone());
        let flights = FlightManager::new(db.clone(), dispatcher);

        // Dropping `scheduler` on these early returns tears the runtime down.
        if !aircraft.create_table() {
            msg_bail_anyhow!(Message::TableCreateFailed(aircraft::TABLE.to_string()));
        }
        if !flights.create_table() {
            msg_bail_anyhow!(Message::TableCreateFailed(flights::TABLE.to_string()));
        }
        Airframe::validate_catalog().map_err(|e| msg_error_anyhow!(Message::AirframeCatalogInvalid(e.to_string())))?;
        aircraft
            .verify_airframes()
            .map_err(|e| msg_error_anyhow!(Message::UnknownAirframeCodes(e.to_string())))?;

        info!("logbook opened at {}", storage.base_path().display());
        Ok((
            Logbook {
                storage,
                config,
                db,
                scheduler,
                aircraft,
                flights,
            },
            queue,
        ))
    }

    pub fn aircraft(&self) -> &AircraftManager {
        &self.aircraft
    }

    pub fn flights(&self) -> &FlightManager {
        &self.flights
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Directory CSV exports are written to.
    pub fn export_dir(&self) -> PathBuf {
        self.config.export_dir()
    }

    /// Saves the configuration and stops the scheduler.
    ///
    /// The scheduler is shut down even when saving fails; the save error is
    /// returned afterwards.
    pub fn close(self) -> Result<()> {
        let saved = self
            .config
            .save_to(&self.storage)
            .map_err(|e| msg_error_anyhow!(Message::ConfigSaveError(e.to_string())));
        self.scheduler.shutdown();
        info!("logbook closed");
        saved
    }
}
