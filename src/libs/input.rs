//! Validation of user-entered aircraft and flight data.
//!
//! Input is checked here, before any manager call, and each rule maps to
//! one [`InputError`] whose text tells the user what to correct. Rules are
//! applied in field order and the first failure is reported.
//!
//! A flight cannot be fully validated up front because its aircraft must
//! exist in the store. [`validate_flight`] therefore returns a
//! [`FlightDraft`]; the caller resolves the registration and only then turns
//! the draft into a [`Flight`] with [`FlightDraft::into_flight`].

use super::aircraft::Aircraft;
use super::airframe::Airframe;
use super::flight::Flight;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("An invalid aircraft registration was provided")]
    Registration,
    #[error("An invalid airframe was provided")]
    Airframe,
    #[error("An invalid engine was provided")]
    Engine,
    #[error("An invalid or no aircraft is selected")]
    Aircraft,
    #[error("An invalid flight number was provided")]
    FlightNumber,
    #[error("An invalid departure ICAO code was provided")]
    Departure,
    #[error("An invalid arrival ICAO code was provided")]
    Arrival,
    #[error("An invalid departure date was provided")]
    DepartureDate,
    #[error("An invalid arrival date was provided")]
    ArrivalDate,
}

/// A flight whose fields passed validation but whose aircraft has not been
/// resolved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightDraft {
    pub registration: String,
    pub flight_number: String,
    pub departure: String,
    pub arrival: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

impl FlightDraft {
    /// Completes the draft with the resolved aircraft and a fresh id.
    pub fn into_flight(self, aircraft: Aircraft) -> Flight {
        Flight::create(
            self.flight_number,
            self.departure,
            self.arrival,
            self.departure_time,
            self.arrival_time,
            aircraft,
        )
    }
}

/// Checks the three aircraft fields. `airframe` may be a catalog code, a
/// model name or a full name.
pub fn validate_aircraft(registration: &str, airframe: &str, engine: &str) -> Result<Aircraft, InputError> {
    let registration = required(registration, InputError::Registration)?;
    let airframe_input = required(airframe, InputError::Airframe)?;
    let engine = required(engine, InputError::Engine)?;
    let airframe = Airframe::lookup(airframe_input).ok_or(InputError::Airframe)?;

    Ok(Aircraft::new(registration, airframe, engine))
}

/// Checks the flight fields and parses both dates.
///
/// `aircraft` is either a bare registration or an aircraft display string
/// such as `Airbus A320 CFM56 (C-FXCD)`.
pub fn validate_flight(
    aircraft: &str,
    flight_number: &str,
    departure: &str,
    arrival: &str,
    departure_date: &str,
    arrival_date: &str,
) -> Result<FlightDraft, InputError> {
    let aircraft = required(aircraft, InputError::Aircraft)?;
    let flight_number = required(flight_number, InputError::FlightNumber)?;
    let departure = required(departure, InputError::Departure)?;
    let arrival = required(arrival, InputError::Arrival)?;
    let departure_date = required(departure_date, InputError::DepartureDate)?;
    let arrival_date = required(arrival_date, InputError::ArrivalDate)?;

    let departure_time = Flight::parse_date(departure_date).map_err(|_| InputError::DepartureDate)?;
    let arrival_time = Flight::parse_date(arrival_date).map_err(|_| InputError::ArrivalDate)?;

    let registration = Aircraft::parse_registration(aircraft).unwrap_or_else(|| aircraft.to_string());

    Ok(FlightDraft {
        registration,
        flight_number: flight_number.to_string(),
        departure: departure.to_string(),
        arrival: arrival.to_string(),
        departure_time,
        arrival_time,
    })
}

fn required(value: &str, error: InputError) -> Result<&str, InputError> {
    let value = value.trim();
    if value.is_empty() {
        Err(error)
    } else {
        Ok(value)
    }
}
