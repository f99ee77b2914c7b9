use super::aircraft::Aircraft;
use super::formatter::format_duration;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Display and input format for flight times, always rendered in UTC,
/// e.g. `2024/03/01 14:05 +00:00`.
pub const DATE_FORMAT: &str = "%Y/%m/%d %H:%M %:z";

/// A logged flight.
///
/// Times are epoch milliseconds in UTC. The duration is derived and is not
/// validated: an arrival before the departure gives a negative flight time.
/// `aircraft` is resolved by registration when the flight is read back and
/// is `None` when that registration no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flight {
    id: Uuid,
    flight_number: String,
    departure: String,
    arrival: String,
    departure_time_millis: i64,
    arrival_time_millis: i64,
    aircraft: Option<Aircraft>,
}

impl Flight {
    pub fn new(
        id: Uuid,
        flight_number: impl Into<String>,
        departure: impl Into<String>,
        arrival: impl Into<String>,
        departure_time_millis: i64,
        arrival_time_millis: i64,
        aircraft: Option<Aircraft>,
    ) -> Self {
        Self {
            id,
            flight_number: flight_number.into(),
            departure: departure.into(),
            arrival: arrival.into(),
            departure_time_millis,
            arrival_time_millis,
            aircraft,
        }
    }

    /// Builds a new flight with a freshly generated id.
    pub fn create(
        flight_number: impl Into<String>,
        departure: impl Into<String>,
        arrival: impl Into<String>,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
        aircraft: Aircraft,
    ) -> Self {
        Self::new(
            Uuid::new_v4(),
            flight_number,
            departure,
            arrival,
            departure_time.timestamp_millis(),
            arrival_time.timestamp_millis(),
            Some(aircraft),
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn flight_number(&self) -> &str {
        &self.flight_number
    }

    pub fn departure(&self) -> &str {
        &self.departure
    }

    pub fn arrival(&self) -> &str {
        &self.arrival
    }

    pub fn departure_time_millis(&self) -> i64 {
        self.departure_time_millis
    }

    pub fn arrival_time_millis(&self) -> i64 {
        self.arrival_time_millis
    }

    pub fn aircraft(&self) -> Option<&Aircraft> {
        self.aircraft.as_ref()
    }

    pub fn departure_date(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.departure_time_millis).unwrap_or_default()
    }

    pub fn arrival_date(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.arrival_time_millis).unwrap_or_default()
    }

    /// Arrival minus departure, saturated at the bounds of `Duration` for
    /// stored times too far apart to represent.
    pub fn duration(&self) -> Duration {
        let millis = self.arrival_time_millis.saturating_sub(self.departure_time_millis);
        Duration::try_milliseconds(millis).unwrap_or(if millis < 0 { Duration::MIN } else { Duration::MAX })
    }

    pub fn format_date(date: &DateTime<Utc>) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parses a date written in [`DATE_FORMAT`]; any offset is accepted and
    /// converted to UTC.
    pub fn parse_date(input: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        Ok(DateTime::parse_from_str(input.trim(), DATE_FORMAT)?.with_timezone(&Utc))
    }

    /// Short single-line form used by the statistics view.
    pub fn summary(&self) -> String {
        format!(
            "{} {} -> {} ({})",
            self.flight_number,
            self.departure,
            self.arrival,
            format_duration(&self.duration())
        )
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let aircraft = self.aircraft.as_ref().map_or_else(|| "Unknown aircraft".to_string(), ToString::to_string);
        write!(
            f,
            "{},{} -> {},{}-{},{}",
            self.flight_number,
            self.departure,
            self.arrival,
            Self::format_date(&self.departure_date()),
            Self::format_date(&self.arrival_date()),
            aircraft
        )
    }
}
