use super::Session;
use crate::{
    libs::{aircraft::Aircraft, flight::Flight, formatter::format_duration, input, messages::Message, view::View},
    msg_bail_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};
use uuid::Uuid;

#[derive(Debug, Args)]
pub struct FlightArgs {
    #[command(subcommand)]
    command: FlightCommand,
}

#[derive(Debug, Subcommand)]
enum FlightCommand {
    /// Log a flight
    Add {
        /// Flight number, e.g. AC123
        flight_number: String,
        /// Registration of the aircraft flown
        #[arg(short, long)]
        aircraft: String,
        /// Departure ICAO code
        #[arg(short, long)]
        from: String,
        /// Arrival ICAO code
        #[arg(short, long)]
        to: String,
        /// Departure time, e.g. "2024/03/01 14:05 +00:00"
        #[arg(long)]
        departs: String,
        /// Arrival time, e.g. "2024/03/01 17:35 +00:00"
        #[arg(long)]
        arrives: String,
    },
    /// List logged flights
    List {
        /// Only flights with this flight number
        #[arg(short, long)]
        number: Option<String>,
    },
    /// Remove a flight by id
    Remove {
        /// Flight id
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show one flight
    Show {
        /// Flight id
        id: String,
    },
}

pub fn cmd(args: FlightArgs, session: &mut Session) -> Result<()> {
    match args.command {
        FlightCommand::Add {
            flight_number,
            aircraft,
            from,
            to,
            departs,
            arrives,
        } => handle_add(session, &aircraft, &flight_number, &from, &to, &departs, &arrives),
        FlightCommand::List { number } => handle_list(session, number),
        FlightCommand::Remove { id, yes } => handle_remove(session, &id, yes),
        FlightCommand::Show { id } => handle_show(session, &id),
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_add(
    session: &mut Session,
    aircraft: &str,
    flight_number: &str,
    from: &str,
    to: &str,
    departs: &str,
    arrives: &str,
) -> Result<()> {
    let draft = match input::validate_flight(aircraft, flight_number, from, to, departs, arrives) {
        Ok(draft) => draft,
        Err(e) => {
            msg_bail_anyhow!(Message::InvalidInput(e.to_string()));
        }
    };

    // The aircraft must be resolved before the flight is stored.
    let manager = session.logbook().aircraft().clone();
    let registration = draft.registration.clone();
    let Some(aircraft) = session.call::<Option<Aircraft>, _>(move |reply| manager.get_by_registration(Some(registration), reply))? else {
        msg_bail_anyhow!(Message::InvalidInput(input::InputError::Aircraft.to_string()));
    };

    let flight = draft.into_flight(aircraft);
    let number = flight.flight_number().to_string();
    let manager = session.logbook().flights().clone();
    if session.call(move |reply| manager.add(flight, reply))? {
        msg_success!(Message::FlightAdded(number));
    } else {
        msg_bail_anyhow!(Message::FlightAddFailed(number));
    }
    Ok(())
}

fn handle_list(session: &mut Session, number: Option<String>) -> Result<()> {
    let manager = session.logbook().flights().clone();
    let flights: Vec<Flight> = match number {
        Some(number) => session.call(move |reply| manager.get_by_flight_number(number, reply))?,
        None => session.call(move |reply| manager.get_all(reply))?,
    };

    if flights.is_empty() {
        msg_info!(Message::FlightsListEmpty);
        return Ok(());
    }

    msg_print!(Message::FlightsHeader, true);
    View::flights(&flights)?;
    Ok(())
}

fn handle_remove(session: &mut Session, id: &str, yes: bool) -> Result<()> {
    let Some(flight) = find_flight(session, id)? else {
        msg_bail_anyhow!(Message::FlightNotFound(id.to_string()));
    };

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteFlight(flight.summary()).to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }
    }

    let manager = session.logbook().flights().clone();
    let id = flight.id();
    if session.call(move |reply| manager.remove(id, reply))? {
        msg_success!(Message::FlightRemoved(id.to_string()));
    } else {
        msg_bail_anyhow!(Message::FlightRemoveFailed(id.to_string()));
    }
    Ok(())
}

fn handle_show(session: &mut Session, id: &str) -> Result<()> {
    let Some(flight) = find_flight(session, id)? else {
        msg_bail_anyhow!(Message::FlightNotFound(id.to_string()));
    };

    let aircraft = flight.aircraft().map_or_else(|| "-".to_string(), ToString::to_string);
    View::details(&[
        ("Id", flight.id().to_string()),
        ("Flight number", flight.flight_number().to_string()),
        ("Departure", flight.departure().to_string()),
        ("Arrival", flight.arrival().to_string()),
        ("Departure time", Flight::format_date(&flight.departure_date())),
        ("Arrival time", Flight::format_date(&flight.arrival_date())),
        ("Duration", format_duration(&flight.duration())),
        ("Aircraft", aircraft),
    ])?;
    Ok(())
}

/// Looks a flight up by the id typed on the command line. An id that is not
/// a UUID is passed on as `None`, which the manager answers with `None`.
fn find_flight(session: &mut Session, id: &str) -> Result<Option<Flight>> {
    let id = Uuid::parse_str(id.trim()).ok();
    let manager = session.logbook().flights().clone();
    session.call(move |reply| manager.get_by_id(id, reply))
}
