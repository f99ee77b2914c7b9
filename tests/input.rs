#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use logbook::libs::aircraft::Aircraft;
    use logbook::libs::airframe::Airframe;
    use logbook::libs::input::{validate_aircraft, validate_flight, InputError};
    use logbook::libs::messages::Message;

    const DEP: &str = "2024/03/01 14:05 +00:00";
    const ARR: &str = "2024/03/01 17:35 +00:00";

    #[test]
    fn test_valid_aircraft() {
        let aircraft = validate_aircraft(" C-FXCD ", "Airbus A320neo", "LEAP-1A").unwrap();
        assert_eq!(aircraft, Aircraft::new("C-FXCD", Airframe::A320Neo, "LEAP-1A"));
        assert_eq!(validate_aircraft("C-FXCD", "B737_MAX_8", "LEAP-1B").unwrap().airframe(), Airframe::B737Max8);
    }

    #[test]
    fn test_aircraft_rules_in_order() {
        assert_eq!(validate_aircraft("", "", ""), Err(InputError::Registration));
        assert_eq!(validate_aircraft("C-FXCD", "  ", "CFM56"), Err(InputError::Airframe));
        assert_eq!(validate_aircraft("C-FXCD", "A320", ""), Err(InputError::Engine));
        assert_eq!(validate_aircraft("C-FXCD", "Concorde", "Olympus"), Err(InputError::Airframe));
    }

    #[test]
    fn test_valid_flight_draft() {
        let draft = validate_flight("Airbus A320 CFM56 (C-FXCD)", "AC123", "CYYZ", "CYVR", DEP, ARR).unwrap();
        assert_eq!(draft.registration, "C-FXCD");
        assert_eq!(draft.departure_time, Utc.with_ymd_and_hms(2024, 3, 1, 14, 5, 0).unwrap());

        let bare = validate_flight("C-GABC", "AC1", "CYYZ", "KJFK", DEP, ARR).unwrap();
        assert_eq!(bare.registration, "C-GABC");

        let aircraft = Aircraft::new("C-GABC", Airframe::B787_9, "GEnx-1B");
        let flight = bare.into_flight(aircraft.clone());
        assert_eq!(flight.aircraft(), Some(&aircraft));
        assert_eq!(flight.flight_number(), "AC1");
    }

    #[test]
    fn test_flight_rules() {
        assert_eq!(validate_flight("", "AC1", "CYYZ", "KJFK", DEP, ARR), Err(InputError::Aircraft));
        assert_eq!(validate_flight("C-FXCD", "", "CYYZ", "KJFK", DEP, ARR), Err(InputError::FlightNumber));
        assert_eq!(validate_flight("C-FXCD", "AC1", "", "KJFK", DEP, ARR), Err(InputError::Departure));
        assert_eq!(validate_flight("C-FXCD", "AC1", "CYYZ", "", DEP, ARR), Err(InputError::Arrival));
        assert_eq!(validate_flight("C-FXCD", "AC1", "CYYZ", "KJFK", "", ARR), Err(InputError::DepartureDate));
        assert_eq!(validate_flight("C-FXCD", "AC1", "CYYZ", "KJFK", DEP, ""), Err(InputError::ArrivalDate));
        assert_eq!(
            validate_flight("C-FXCD", "AC1", "CYYZ", "KJFK", "yesterday", ARR),
            Err(InputError::DepartureDate)
        );
        assert_eq!(
            validate_flight("C-FXCD", "AC1", "CYYZ", "KJFK", DEP, "2024-03-01T17:35Z"),
            Err(InputError::ArrivalDate)
        );
    }

    #[test]
    fn test_corrective_messages() {
        assert_eq!(
            Message::InvalidInput(InputError::Registration.to_string()).to_string(),
            "Invalid Input; An invalid aircraft registration was provided"
        );
        assert_eq!(
            Message::InvalidInput(InputError::Aircraft.to_string()).to_string(),
            "Invalid Input; An invalid or no aircraft is selected"
        );
        assert_eq!(
            Message::InvalidInput(InputError::Departure.to_string()).to_string(),
            "Invalid Input; An invalid departure ICAO code was provided"
        );
    }
}
