use crate::db::db::Db;
use crate::db::flights::FlightManager;
use crate::db::value::{Record, Value};
use crate::libs::aircraft::Aircraft;
use crate::libs::airframe::{Airframe, AirframeError};
use crate::libs::dispatch::Dispatcher;
use crate::libs::export::Exporter;
use crate::libs::formatter::sum_durations;
use crate::libs::scheduler::SchedulerError;
use anyhow::Result;
use chrono::Duration;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

pub const TABLE: &str = "aircraft";
pub const COL_REGISTRATION: &str = "registration";
pub const COL_AIRFRAME: &str = "airframe";
pub const COL_ENGINE: &str = "engine";

const COLUMNS: [&str; 3] = [COL_REGISTRATION, COL_AIRFRAME, COL_ENGINE];
const TYPES: [&str; 3] = ["TEXT PRIMARY KEY NOT NULL UNIQUE", "TEXT", "TEXT"];

/// Typed access to the `aircraft` table.
///
/// Every read and write comes in two forms: a `*_blocking` method that runs
/// on the caller's thread, and a method of the same base name that runs the
/// blocking form through the [`Dispatcher`] and hands the result to a
/// callback on the UI queue. The async forms only fail when the scheduler
/// no longer accepts work.
#[derive(Clone)]
pub struct AircraftManager {
    db: Db,
    dispatcher: Dispatcher,
}

impl AircraftManager {
    pub fn new(db: Db, dispatcher: Dispatcher) -> Self {
        Self { db, dispatcher }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Creates the `aircraft` table if it is missing.
    pub fn create_table(&self) -> bool {
        self.db.create_table(TABLE, &COLUMNS, &TYPES, None)
    }

    /// Reads every aircraft. Rows without a registration or with an unknown
    /// airframe code are skipped.
    pub fn get_all_blocking(&self) -> Vec<Aircraft> {
        self.db.get_all_rows(TABLE, &[], None).iter().filter_map(aircraft_from_record).collect()
    }

    pub fn get_all(&self, callback: impl FnOnce(Vec<Aircraft>) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.get_all_blocking(), callback)
    }

    /// Looks up one aircraft. `None` as the key answers `None` without
    /// touching the database.
    pub fn get_by_registration_blocking(&self, registration: Option<&str>) -> Option<Aircraft> {
        let registration = registration?;
        self.db
            .get_rows(TABLE, COL_REGISTRATION, registration, &[], None)
            .iter()
            .find_map(aircraft_from_record)
    }

    pub fn get_by_registration(
        &self,
        registration: Option<String>,
        callback: impl FnOnce(Option<Aircraft>) + Send + 'static,
    ) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher
            .run_with_callback(move || this.get_by_registration_blocking(registration.as_deref()), callback)
    }

    /// Inserts the aircraft, or overwrites airframe and engine when the
    /// registration already exists.
    pub fn add_blocking(&self, aircraft: &Aircraft) -> bool {
        self.db.upsert_row(
            TABLE,
            COL_REGISTRATION,
            aircraft.registration(),
            &[
                (COL_AIRFRAME, Value::from(aircraft.airframe().code())),
                (COL_ENGINE, Value::from(aircraft.engine())),
            ],
        )
    }

    pub fn add(&self, aircraft: Aircraft, callback: impl FnOnce(bool) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.add_blocking(&aircraft), callback)
    }

    /// Deletes by registration. Removing a registration that does not exist
    /// still reports success.
    pub fn remove_blocking(&self, registration: &str) -> bool {
        self.db.delete_row(TABLE, COL_REGISTRATION, registration)
    }

    pub fn remove(&self, registration: String, callback: impl FnOnce(bool) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.remove_blocking(&registration), callback)
    }

    /// Sum of the durations of every flight flown on `aircraft`.
    ///
    /// Flights are matched by registration; flights whose aircraft no longer
    /// resolves are ignored.
    pub fn flight_time_blocking(&self, aircraft: &Aircraft) -> Duration {
        let flights = self.flights().get_all_blocking();
        sum_durations(
            flights
                .iter()
                .filter(|f| f.aircraft().is_some_and(|a| a.registration() == aircraft.registration()))
                .map(|f| f.duration()),
        )
    }

    pub fn flight_time(&self, aircraft: Aircraft, callback: impl FnOnce(Duration) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.flight_time_blocking(&aircraft), callback)
    }

    /// The aircraft with the greatest total flight time, or `None` when no
    /// aircraft is recorded.
    ///
    /// Totals are keyed by duration in an ordered map and the last entry
    /// wins, so among aircraft with equal totals the one read last is kept.
    pub fn most_used_blocking(&self) -> Option<Aircraft> {
        let flights = self.flights().get_all_blocking();
        let mut by_time: BTreeMap<Duration, Aircraft> = BTreeMap::new();
        for aircraft in self.get_all_blocking() {
            let total = sum_durations(
                flights
                    .iter()
                    .filter(|f| f.aircraft().is_some_and(|a| a.registration() == aircraft.registration()))
                    .map(|f| f.duration()),
            );
            by_time.insert(total, aircraft);
        }
        by_time.pop_last().map(|(_, aircraft)| aircraft)
    }

    pub fn most_used(&self, callback: impl FnOnce(Option<Aircraft>) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.most_used_blocking(), callback)
    }

    /// Checks that every airframe code stored in the table is known.
    ///
    /// Returns the first unknown code as an error. `NULL` codes are ignored
    /// here and skipped at read time.
    pub fn verify_airframes(&self) -> Result<(), AirframeError> {
        for value in self.db.get_column(TABLE, COL_AIRFRAME, Some("GROUP BY \"airframe\"")) {
            if let Some(code) = value.as_text() {
                Airframe::from_str(code)?;
            }
        }
        Ok(())
    }

    /// Writes the table to CSV in `dir`, registration column excluded.
    pub fn export_blocking(&self, dir: &Path) -> Result<PathBuf> {
        Exporter::new(self.db.clone(), dir).export_table(TABLE, COL_REGISTRATION)
    }

    pub fn export(&self, dir: PathBuf, callback: impl FnOnce(Result<PathBuf>) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.export_blocking(&dir), callback)
    }

    fn flights(&self) -> FlightManager {
        FlightManager::new(self.db.clone(), self.dispatcher.clone())
    }
}

/// Maps one `aircraft` row to an [`Aircraft`].
///
/// A missing engine reads as an empty string. A missing registration or an
/// unknown airframe code drops the row.
pub(crate) fn aircraft_from_record(record: &Record) -> Option<Aircraft> {
    let registration = record.text(COL_REGISTRATION)?;
    let code = record.text(COL_AIRFRAME).unwrap_or_default();
    let airframe = match Airframe::from_str(code) {
        Ok(airframe) => airframe,
        Err(e) => {
            warn!("skipping aircraft {registration}: {e}");
            return None;
        }
    };
    let engine = record.text(COL_ENGINE).unwrap_or_default();
    Some(Aircraft::new(registration, airframe, engine))
}
