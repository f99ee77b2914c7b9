use super::airframe::Airframe;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A specific tail: registration, airframe model and engine.
///
/// Equality and hashing cover all three fields. The registration is the
/// primary key of the `aircraft` table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aircraft {
    registration: String,
    airframe: Airframe,
    engine: String,
}

impl Aircraft {
    pub fn new(registration: impl Into<String>, airframe: Airframe, engine: impl Into<String>) -> Self {
        Self {
            registration: registration.into(),
            airframe,
            engine: engine.into(),
        }
    }

    pub fn registration(&self) -> &str {
        &self.registration
    }

    pub fn airframe(&self) -> Airframe {
        self.airframe
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// Recovers the registration from the display form produced by
    /// `Display`, e.g. `Airbus A320 CFM56 (C-FXCD)` gives `C-FXCD`.
    ///
    /// Returns `None` when the string has no parenthesised registration.
    pub fn parse_registration(display: &str) -> Option<String> {
        let open = display.rfind('(')?;
        let close = display[open..].find(')')? + open;
        let registration = display[open + 1..close].trim();
        (!registration.is_empty()).then(|| registration.to_string())
    }
}

impl fmt::Display for Aircraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.airframe.full_name(), self.engine, self.registration)
    }
}
