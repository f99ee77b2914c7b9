use super::Session;
use crate::{
    libs::{aircraft::Aircraft, formatter::format_duration, input, messages::Message, view::View},
    msg_bail_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::Duration;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct AircraftArgs {
    #[command(subcommand)]
    command: AircraftCommand,
}

#[derive(Debug, Subcommand)]
enum AircraftCommand {
    /// Add an aircraft, or update it if the registration exists
    Add {
        /// Registration, e.g. C-FXCD
        registration: String,
        /// Airframe code or name, e.g. A320 or "Airbus A320neo"
        #[arg(short, long)]
        airframe: String,
        /// Engine type
        #[arg(short, long)]
        engine: String,
    },
    /// List all aircraft
    List,
    /// Remove an aircraft
    Remove {
        /// Registration to remove
        registration: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show one aircraft with its total flight time
    Show {
        /// Registration to show
        registration: String,
    },
}

pub fn cmd(args: AircraftArgs, session: &mut Session) -> Result<()> {
    match args.command {
        AircraftCommand::Add {
            registration,
            airframe,
            engine,
        } => handle_add(session, &registration, &airframe, &engine),
        AircraftCommand::List => handle_list(session),
        AircraftCommand::Remove { registration, yes } => handle_remove(session, registration, yes),
        AircraftCommand::Show { registration } => handle_show(session, registration),
    }
}

fn handle_add(session: &mut Session, registration: &str, airframe: &str, engine: &str) -> Result<()> {
    let aircraft = match input::validate_aircraft(registration, airframe, engine) {
        Ok(aircraft) => aircraft,
        Err(e) => {
            msg_bail_anyhow!(Message::InvalidInput(e.to_string()));
        }
    };

    let manager = session.logbook().aircraft().clone();
    let registration = aircraft.registration().to_string();
    if session.call(move |reply| manager.add(aircraft, reply))? {
        msg_success!(Message::AircraftAdded(registration));
    } else {
        msg_bail_anyhow!(Message::AircraftAddFailed(registration));
    }
    Ok(())
}

fn handle_list(session: &mut Session) -> Result<()> {
    let manager = session.logbook().aircraft().clone();
    let aircraft: Vec<Aircraft> = session.call(move |reply| manager.get_all(reply))?;

    if aircraft.is_empty() {
        msg_info!(Message::AircraftListEmpty);
        return Ok(());
    }

    msg_print!(Message::AircraftHeader, true);
    View::aircraft(&aircraft)?;
    Ok(())
}

fn handle_remove(session: &mut Session, registration: String, yes: bool) -> Result<()> {
    let manager = session.logbook().aircraft().clone();
    let lookup = registration.clone();
    let Some(aircraft) = session.call::<Option<Aircraft>, _>(move |reply| manager.get_by_registration(Some(lookup), reply))? else {
        msg_bail_anyhow!(Message::AircraftNotFound(registration));
    };

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteAircraft(aircraft.to_string()).to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }
    }

    let manager = session.logbook().aircraft().clone();
    let key = registration.clone();
    if session.call(move |reply| manager.remove(key, reply))? {
        msg_success!(Message::AircraftRemoved(registration));
    } else {
        msg_bail_anyhow!(Message::AircraftRemoveFailed(registration));
    }
    Ok(())
}

fn handle_show(session: &mut Session, registration: String) -> Result<()> {
    let manager = session.logbook().aircraft().clone();
    let lookup = registration.clone();
    let Some(aircraft) = session.call::<Option<Aircraft>, _>(move |reply| manager.get_by_registration(Some(lookup), reply))? else {
        msg_bail_anyhow!(Message::AircraftNotFound(registration));
    };

    let manager = session.logbook().aircraft().clone();
    let target = aircraft.clone();
    let flight_time: Duration = session.call(move |reply| manager.flight_time(target, reply))?;

    let airframe = aircraft.airframe();
    View::details(&[
        ("Registration", aircraft.registration().to_string()),
        ("Manufacturer", airframe.manufacturer().to_string()),
        ("Airframe", airframe.name().to_string()),
        ("Engine", aircraft.engine().to_string()),
        ("Weight class", airframe.weight_class().to_string()),
        ("Flight time", format_duration(&flight_time)),
    ])?;
    Ok(())
}
