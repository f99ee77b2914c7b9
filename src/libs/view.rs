use super::aircraft::Aircraft;
use super::flight::Flight;
use super::formatter::format_duration;
use prettytable::{row, Table};
use anyhow::Result;

pub struct View {}

impl View {
    pub fn aircraft(aircraft: &[Aircraft]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["REGISTRATION", "AIRFRAME", "ENGINE", "WEIGHT CLASS"]);
        for a in aircraft {
            table.add_row(row![a.registration(), a.airframe().full_name(), a.engine(), a.airframe().weight_class()]);
        }
        table.printstd();

        Ok(())
    }

    pub fn flights(flights: &[Flight]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "FLIGHT", "DEP", "ARR", "DEPARTURE", "ARRIVAL", "DURATION", "AIRCRAFT"]);
        for flight in flights {
            // Flights whose registration no longer resolves are still listed.
            let aircraft = flight.aircraft().map_or_else(|| "-".to_string(), ToString::to_string);
            table.add_row(row![
                flight.id(),
                flight.flight_number(),
                flight.departure(),
                flight.arrival(),
                Flight::format_date(&flight.departure_date()),
                Flight::format_date(&flight.arrival_date()),
                format_duration(&flight.duration()),
                aircraft
            ]);
        }
        table.printstd();

        Ok(())
    }

    /// Two-column key/value table used by `stats` and `show`.
    pub fn details(rows: &[(&str, String)]) -> Result<()> {
        let mut table = Table::new();
        for (label, value) in rows {
            table.add_row(row![b -> label, value]);
        }
        table.printstd();

        Ok(())
    }
}
