use super::Session;
use crate::{
    libs::{aircraft::Aircraft, flight::Flight, formatter::format_duration, messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::Duration;

pub fn cmd(session: &mut Session) -> Result<()> {
    let flights = session.logbook().flights().clone();
    let aircraft = session.logbook().aircraft().clone();

    let count: i64 = {
        let flights = flights.clone();
        session.call(move |reply| flights.total_count(reply))?
    };
    if count <= 0 {
        msg_info!(Message::StatsNoFlights);
        return Ok(());
    }

    let total: Duration = {
        let flights = flights.clone();
        session.call(move |reply| flights.total_flight_time(reply))?
    };
    let longest: Option<Flight> = {
        let flights = flights.clone();
        session.call(move |reply| flights.longest_flight(reply))?
    };
    let departure: Option<String> = {
        let flights = flights.clone();
        session.call(move |reply| flights.most_frequent_departure(reply))?
    };
    let arrival: Option<String> = session.call(move |reply| flights.most_frequent_arrival(reply))?;
    let most_used: Option<Aircraft> = session.call(move |reply| aircraft.most_used(reply))?;

    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    msg_print!(Message::StatsHeader, true);
    View::details(&[
        ("Flights", count.to_string()),
        ("Total flight time", format_duration(&total)),
        ("Longest flight", or_dash(longest.as_ref().map(Flight::summary))),
        ("Most used aircraft", or_dash(most_used.as_ref().map(ToString::to_string))),
        ("Most frequent departure", or_dash(departure)),
        ("Most frequent arrival", or_dash(arrival)),
    ])?;
    Ok(())
}
