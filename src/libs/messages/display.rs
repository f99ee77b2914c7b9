//! Text for every [`Message`] variant.
//!
//! Grouped by the same categories as the enum. Callers never format user
//! text themselves, which keeps wording consistent between the listing,
//! statistics and error paths.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === AIRCRAFT MESSAGES ===
            Message::AircraftAdded(reg) => format!("Aircraft {} saved", reg),
            Message::AircraftAddFailed(reg) => format!("Failed to save aircraft {}", reg),
            Message::AircraftRemoved(reg) => format!("Aircraft {} removed", reg),
            Message::AircraftRemoveFailed(reg) => format!("Failed to remove aircraft {}", reg),
            Message::AircraftNotFound(reg) => format!("Aircraft {} not found", reg),
            Message::AircraftListEmpty => "No aircraft recorded yet".to_string(),
            Message::AircraftHeader => "Aircraft".to_string(),
            Message::ConfirmDeleteAircraft(reg) => format!("Are you sure you want to delete aircraft {}?", reg),

            // === FLIGHT MESSAGES ===
            Message::FlightAdded(number) => format!("Flight {} saved", number),
            Message::FlightAddFailed(number) => format!("Failed to save flight {}", number),
            Message::FlightRemoved(id) => format!("Flight {} removed", id),
            Message::FlightRemoveFailed(id) => format!("Failed to remove flight {}", id),
            Message::FlightNotFound(key) => format!("Flight {} not found", key),
            Message::FlightsListEmpty => "No flights logged yet".to_string(),
            Message::FlightsHeader => "Flights".to_string(),
            Message::ConfirmDeleteFlight(flight) => format!("Are you sure you want to delete flight {}?", flight),

            // === STATISTICS MESSAGES ===
            Message::StatsHeader => "Logbook statistics".to_string(),
            Message::StatsNoFlights => "No flights logged yet, nothing to summarize".to_string(),

            // === EXPORT MESSAGES ===
            Message::ExportCompleted(path) => format!("Export completed successfully: {}", path),
            Message::ExportFailed(error) => format!("Export failed: {}", error),
            Message::ExportTableMissing(table) => format!("Table {} does not exist or has no columns", table),

            // === CONFIG MESSAGES ===
            Message::ConfigLoadError(error) => format!("Failed to load configuration: {}", error),
            Message::ConfigSaveError(error) => format!("Failed to save configuration: {}", error),
            Message::DarkModeSet(on) => format!("Dark mode {}", if *on { "enabled" } else { "disabled" }),

            // === STARTUP AND SHUTDOWN MESSAGES ===
            Message::WorkingDirFailed(error) => format!("Failed to create working directory: {}", error),
            Message::DatabaseUnavailable(path) => format!("Failed to connect to database at {}", path),
            Message::TableCreateFailed(table) => format!("Failed to create table {}", table),
            Message::UnknownAirframeCodes(codes) => format!("Database contains unknown airframe codes: {}", codes),
            Message::AirframeCatalogInvalid(error) => format!("Airframe catalog is inconsistent: {}", error),
            Message::SchedulerStartFailed(error) => format!("Failed to start background workers: {}", error),
            Message::BackgroundWorkRejected(error) => format!("Background work was rejected: {}", error),

            // === INPUT MESSAGES ===
            Message::InvalidInput(detail) => format!("Invalid Input; {}", detail),
            Message::OperationCancelled => "Operation cancelled".to_string(),
        };

        write!(f, "{}", text)
    }
}
