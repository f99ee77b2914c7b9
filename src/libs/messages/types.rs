/// Every user-facing message the logbook prints.
///
/// Text lives in the `Display` impl in `display.rs`; call sites only pick a
/// variant and pass it to one of the `msg_*!` macros.
#[derive(Debug, Clone)]
pub enum Message {
    // === AIRCRAFT MESSAGES ===
    AircraftAdded(String),
    AircraftAddFailed(String),
    AircraftRemoved(String),
    AircraftRemoveFailed(String),
    AircraftNotFound(String),
    AircraftListEmpty,
    AircraftHeader,
    ConfirmDeleteAircraft(String),

    // === FLIGHT MESSAGES ===
    FlightAdded(String),
    FlightAddFailed(String),
    FlightRemoved(String),
    FlightRemoveFailed(String),
    FlightNotFound(String),
    FlightsListEmpty,
    FlightsHeader,
    ConfirmDeleteFlight(String),

    // === STATISTICS MESSAGES ===
    StatsHeader,
    StatsNoFlights,

    // === EXPORT MESSAGES ===
    ExportCompleted(String),
    ExportFailed(String),
    ExportTableMissing(String),

    // === CONFIG MESSAGES ===
    ConfigLoadError(String),
    ConfigSaveError(String),
    DarkModeSet(bool),

    // === STARTUP AND SHUTDOWN MESSAGES ===
    WorkingDirFailed(String),
    DatabaseUnavailable(String),
    TableCreateFailed(String),
    UnknownAirframeCodes(String),
    AirframeCatalogInvalid(String),
    SchedulerStartFailed(String),
    BackgroundWorkRejected(String),

    // === INPUT MESSAGES ===
    InvalidInput(String),
    OperationCancelled,
}
