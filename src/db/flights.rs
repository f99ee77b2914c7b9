use crate::db::aircraft::{aircraft_from_record, AircraftManager};
use crate::db::db::Db;
use crate::db::value::{Record, Value};
use crate::libs::aircraft::Aircraft;
use crate::libs::dispatch::Dispatcher;
use crate::libs::export::Exporter;
use crate::libs::flight::Flight;
use crate::libs::formatter::sum_durations;
use crate::libs::scheduler::SchedulerError;
use anyhow::Result;
use chrono::Duration;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

pub const TABLE: &str = "flights";
pub const COL_UUID: &str = "uuid";
pub const COL_FLIGHT_NUMBER: &str = "flightnumber";
pub const COL_DEPARTURE: &str = "dep";
pub const COL_ARRIVAL: &str = "arr";
pub const COL_DEPARTURE_TIME: &str = "departuretime";
pub const COL_ARRIVAL_TIME: &str = "arrivaltime";
pub const COL_AIRCRAFT: &str = "aircraft";

const COLUMNS: [&str; 7] = [
    COL_UUID,
    COL_FLIGHT_NUMBER,
    COL_DEPARTURE,
    COL_ARRIVAL,
    COL_DEPARTURE_TIME,
    COL_ARRIVAL_TIME,
    COL_AIRCRAFT,
];
const TYPES: [&str; 7] = ["TEXT PRIMARY KEY UNIQUE NOT NULL", "TEXT", "TEXT", "TEXT", "INTEGER", "INTEGER", "TEXT"];

const MOST_FREQUENT_DEPARTURE: &str = "GROUP BY \"dep\" ORDER BY COUNT(\"dep\") DESC LIMIT 1";
const MOST_FREQUENT_ARRIVAL: &str = "GROUP BY \"arr\" ORDER BY COUNT(\"arr\") DESC LIMIT 1";

/// Typed access to the `flights` table plus the logbook aggregates.
///
/// Follows the same blocking/async split as
/// [`AircraftManager`](crate::db::aircraft::AircraftManager). The `aircraft`
/// column holds a registration that is resolved against the `aircraft`
/// table on every read; a registration that no longer resolves yields a
/// flight without an aircraft.
#[derive(Clone)]
pub struct FlightManager {
    db: Db,
    dispatcher: Dispatcher,
}

impl FlightManager {
    pub fn new(db: Db, dispatcher: Dispatcher) -> Self {
        Self { db, dispatcher }
    }

    /// Creates the `flights` table if it is missing.
    pub fn create_table(&self) -> bool {
        self.db.create_table(TABLE, &COLUMNS, &TYPES, None)
    }

    /// Reads every flight in table order. Rows whose key is not a valid
    /// UUID are skipped.
    pub fn get_all_blocking(&self) -> Vec<Flight> {
        let records = self.db.get_all_rows(TABLE, &[], None);
        if records.is_empty() {
            return Vec::new();
        }
        let index = self.aircraft_index();
        records
            .iter()
            .filter_map(|r| flight_from_record(r, |reg| index.get(reg).cloned()))
            .collect()
    }

    pub fn get_all(&self, callback: impl FnOnce(Vec<Flight>) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.get_all_blocking(), callback)
    }

    /// Looks up one flight by id; `None` answers `None` without a query.
    pub fn get_by_id_blocking(&self, id: Option<Uuid>) -> Option<Flight> {
        let id = id?;
        self.db
            .get_rows(TABLE, COL_UUID, &id.to_string(), &[], None)
            .iter()
            .find_map(|r| flight_from_record(r, |reg| self.aircraft().get_by_registration_blocking(Some(reg))))
    }

    pub fn get_by_id(&self, id: Option<Uuid>, callback: impl FnOnce(Option<Flight>) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.get_by_id_blocking(id), callback)
    }

    /// Every flight logged under `flight_number`. Flight numbers are not
    /// unique, so this may return several.
    pub fn get_by_flight_number_blocking(&self, flight_number: &str) -> Vec<Flight> {
        let records = self.db.get_rows(TABLE, COL_FLIGHT_NUMBER, flight_number, &[], None);
        if records.is_empty() {
            return Vec::new();
        }
        let index = self.aircraft_index();
        records
            .iter()
            .filter_map(|r| flight_from_record(r, |reg| index.get(reg).cloned()))
            .collect()
    }

    pub fn get_by_flight_number(
        &self,
        flight_number: String,
        callback: impl FnOnce(Vec<Flight>) + Send + 'static,
    ) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher
            .run_with_callback(move || this.get_by_flight_number_blocking(&flight_number), callback)
    }

    /// Inserts the flight or overwrites every column of an existing one with
    /// the same id.
    pub fn add_blocking(&self, flight: &Flight) -> bool {
        self.db.upsert_row(
            TABLE,
            COL_UUID,
            &flight.id().to_string(),
            &[
                (COL_FLIGHT_NUMBER, Value::from(flight.flight_number())),
                (COL_DEPARTURE, Value::from(flight.departure())),
                (COL_ARRIVAL, Value::from(flight.arrival())),
                (COL_DEPARTURE_TIME, Value::from(flight.departure_time_millis())),
                (COL_ARRIVAL_TIME, Value::from(flight.arrival_time_millis())),
                (COL_AIRCRAFT, Value::from(flight.aircraft().map(Aircraft::registration))),
            ],
        )
    }

    pub fn add(&self, flight: Flight, callback: impl FnOnce(bool) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.add_blocking(&flight), callback)
    }

    /// Deletes by id. Succeeds even when no row matched.
    pub fn remove_blocking(&self, id: &Uuid) -> bool {
        self.db.delete_row(TABLE, COL_UUID, &id.to_string())
    }

    pub fn remove(&self, id: Uuid, callback: impl FnOnce(bool) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.remove_blocking(&id), callback)
    }

    /// Sum of all flight durations.
    pub fn total_flight_time_blocking(&self) -> Duration {
        sum_durations(self.get_all_blocking().iter().map(Flight::duration))
    }

    pub fn total_flight_time(&self, callback: impl FnOnce(Duration) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.total_flight_time_blocking(), callback)
    }

    /// The flight with the greatest duration. Among equally long flights the
    /// first one read wins.
    pub fn longest_flight_blocking(&self) -> Option<Flight> {
        self.get_all_blocking().into_iter().min_by_key(|f| Reverse(f.duration()))
    }

    pub fn longest_flight(&self, callback: impl FnOnce(Option<Flight>) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.longest_flight_blocking(), callback)
    }

    /// Number of stored flights, `-1` if the count failed.
    pub fn total_count_blocking(&self) -> i64 {
        self.db.get_row_count(TABLE)
    }

    pub fn total_count(&self, callback: impl FnOnce(i64) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.total_count_blocking(), callback)
    }

    pub fn most_frequent_departure_blocking(&self) -> Option<String> {
        self.most_frequent(COL_DEPARTURE, MOST_FREQUENT_DEPARTURE)
    }

    pub fn most_frequent_departure(&self, callback: impl FnOnce(Option<String>) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.most_frequent_departure_blocking(), callback)
    }

    pub fn most_frequent_arrival_blocking(&self) -> Option<String> {
        self.most_frequent(COL_ARRIVAL, MOST_FREQUENT_ARRIVAL)
    }

    pub fn most_frequent_arrival(&self, callback: impl FnOnce(Option<String>) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.most_frequent_arrival_blocking(), callback)
    }

    /// Writes the table to CSV in `dir`, uuid column excluded.
    pub fn export_blocking(&self, dir: &Path) -> Result<PathBuf> {
        Exporter::new(self.db.clone(), dir).export_table(TABLE, COL_UUID)
    }

    pub fn export(&self, dir: PathBuf, callback: impl FnOnce(Result<PathBuf>) + Send + 'static) -> Result<(), SchedulerError> {
        let this = self.clone();
        self.dispatcher.run_with_callback(move || this.export_blocking(&dir), callback)
    }

    fn most_frequent(&self, column: &str, clause: &str) -> Option<String> {
        self.db
            .get_column(TABLE, column, Some(clause))
            .into_iter()
            .find_map(|v| v.as_text().map(str::to_string))
    }

    fn aircraft(&self) -> AircraftManager {
        AircraftManager::new(self.db.clone(), self.dispatcher.clone())
    }

    /// All aircraft keyed by registration, read in one query.
    fn aircraft_index(&self) -> HashMap<String, Aircraft> {
        self.db
            .get_all_rows(crate::db::aircraft::TABLE, &[], None)
            .iter()
            .filter_map(aircraft_from_record)
            .map(|a| (a.registration().to_string(), a))
            .collect()
    }
}

/// Maps one `flights` row. Missing text columns read as empty and missing
/// times as the epoch; only an unparsable id drops the row.
fn flight_from_record(record: &Record, resolve: impl Fn(&str) -> Option<Aircraft>) -> Option<Flight> {
    let raw_id = record.text(COL_UUID).unwrap_or_default();
    let id = match Uuid::parse_str(raw_id) {
        Ok(id) => id,
        Err(e) => {
            debug!("skipping flight row with id {raw_id:?}: {e}");
            return None;
        }
    };
    let aircraft = record.text(COL_AIRCRAFT).and_then(&resolve);

    Some(Flight::new(
        id,
        record.text(COL_FLIGHT_NUMBER).unwrap_or_default(),
        record.text(COL_DEPARTURE).unwrap_or_default(),
        record.text(COL_ARRIVAL).unwrap_or_default(),
        record.integer(COL_DEPARTURE_TIME).unwrap_or_default(),
        record.integer(COL_ARRIVAL_TIME).unwrap_or_default(),
        aircraft,
    ))
}
