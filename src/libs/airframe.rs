//! Compiled-in airframe catalog and weight classes.
//!
//! An [`Airframe`] is an aircraft model (an Airbus A320, a Boeing 787-9),
//! as opposed to a tail-specific [`crate::libs::aircraft::Aircraft`]. The
//! catalog is read-only reference data and is never persisted; aircraft rows
//! store only the stable [`Airframe::code`], which [`Airframe::from_code`]
//! maps back through the same table.
//!
//! ## Usage
//!
//! ```rust
//! use logbook::libs::airframe::{Airframe, WeightClass};
//!
//! let airframe = Airframe::from_code("A320_NEO").unwrap();
//! assert_eq!(airframe.full_name(), "Airbus A320neo");
//! assert_eq!(airframe.weight_class(), WeightClass::Large);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Coarse size category derived from maximum take-off weight.
///
/// Each class carries an inclusive lower and exclusive upper bound in pounds.
/// `Special` covers outsized aircraft regardless of weight and `Unknown` is a
/// sentinel with deliberately invalid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightClass {
    Special,
    Heavy,
    Large,
    Medium,
    Small,
    Unknown,
}

impl WeightClass {
    /// Classes that take part in weight-based classification, heaviest first.
    const BANDS: [WeightClass; 4] = [WeightClass::Heavy, WeightClass::Large, WeightClass::Medium, WeightClass::Small];

    pub fn name(&self) -> &'static str {
        match self {
            WeightClass::Special => "SPECIAL",
            WeightClass::Heavy => "Heavy",
            WeightClass::Large => "Large",
            WeightClass::Medium => "Medium",
            WeightClass::Small => "Small",
            WeightClass::Unknown => "UNKNOWN",
        }
    }

    pub fn min_weight_lbs(&self) -> i64 {
        match self {
            WeightClass::Special | WeightClass::Small => 0,
            WeightClass::Heavy => 300_000,
            WeightClass::Large => 41_000,
            WeightClass::Medium => 12_500,
            WeightClass::Unknown => -1,
        }
    }

    pub fn max_weight_lbs(&self) -> i64 {
        match self {
            WeightClass::Special | WeightClass::Heavy => i64::from(i32::MAX),
            WeightClass::Large => 300_000,
            WeightClass::Medium => 41_000,
            WeightClass::Small => 12_500,
            WeightClass::Unknown => -1,
        }
    }

    /// Picks the band whose `[min, max)` range contains `mtow_lbs`.
    ///
    /// Negative weights and weights beyond every band map to `Unknown`.
    /// `Special` is assigned by catalog entry, never by weight.
    pub fn from_max_takeoff_weight(mtow_lbs: i64) -> WeightClass {
        Self::BANDS
            .into_iter()
            .find(|class| mtow_lbs >= class.min_weight_lbs() && mtow_lbs < class.max_weight_lbs())
            .unwrap_or(WeightClass::Unknown)
    }
}

impl fmt::Display for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AirframeError {
    #[error("unknown airframe code `{0}`")]
    UnknownCode(String),
    #[error("airframe code `{0}` appears more than once in the catalog")]
    DuplicateCode(&'static str),
}

/// Airframe models known to the logbook.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Airframe {
    // Airbus
    A318,
    A319,
    A319Neo,
    A320,
    A320Neo,
    A321,
    A321Neo,
    A330_200,
    A330_300,
    A330_800,
    A330_900,
    A350_900,
    A350_1000,
    A380,

    // Boeing
    B737_700,
    B737_800,
    B737_900,
    B737Max7,
    B737Max8,
    B737Max9,
    B737Max10,
    B747_8,
    B777_200Lr,
    B777_300Er,
    B777X,
    B787_8,
    B787_9,
    B787_10,
}

struct CatalogEntry {
    airframe: Airframe,
    code: &'static str,
    manufacturer: &'static str,
    name: &'static str,
    weight_class: WeightClass,
}

const fn entry(airframe: Airframe, code: &'static str, manufacturer: &'static str, name: &'static str, weight_class: WeightClass) -> CatalogEntry {
    CatalogEntry {
        airframe,
        code,
        manufacturer,
        name,
        weight_class,
    }
}

/// The bidirectional code table. Order matches the enum declaration so that
/// `CATALOG[airframe as usize]` is the airframe's own entry.
static CATALOG: [CatalogEntry; 28] = [
    entry(Airframe::A318, "A318", "Airbus", "A318", WeightClass::Large),
    entry(Airframe::A319, "A319", "Airbus", "A319", WeightClass::Large),
    entry(Airframe::A319Neo, "A319_NEO", "Airbus", "A319neo", WeightClass::Large),
    entry(Airframe::A320, "A320", "Airbus", "A320", WeightClass::Large),
    entry(Airframe::A320Neo, "A320_NEO", "Airbus", "A320neo", WeightClass::Large),
    entry(Airframe::A321, "A321", "Airbus", "A321", WeightClass::Large),
    entry(Airframe::A321Neo, "A321_NEO", "Airbus", "A321neo", WeightClass::Large),
    entry(Airframe::A330_200, "A330_200", "Airbus", "A330-200", WeightClass::Heavy),
    entry(Airframe::A330_300, "A330_300", "Airbus", "A330-300", WeightClass::Heavy),
    entry(Airframe::A330_800, "A330_800", "Airbus", "A330-800", WeightClass::Heavy),
    entry(Airframe::A330_900, "A330_900", "Airbus", "A330-900", WeightClass::Heavy),
    entry(Airframe::A350_900, "A350_900", "Airbus", "A350-900", WeightClass::Heavy),
    entry(Airframe::A350_1000, "A350_1000", "Airbus", "A350-1000", WeightClass::Heavy),
    entry(Airframe::A380, "A380", "Airbus", "A380", WeightClass::Special),
    entry(Airframe::B737_700, "B737_700", "Boeing", "B737-700", WeightClass::Large),
    entry(Airframe::B737_800, "B737_800", "Boeing", "B737-800", WeightClass::Large),
    entry(Airframe::B737_900, "B737_900", "Boeing", "B737-900", WeightClass::Large),
    entry(Airframe::B737Max7, "B737_MAX_7", "Boeing", "B737 MAX 7", WeightClass::Large),
    entry(Airframe::B737Max8, "B737_MAX_8", "Boeing", "B737 MAX 8", WeightClass::Large),
    entry(Airframe::B737Max9, "B737_MAX_9", "Boeing", "B737 MAX 9", WeightClass::Large),
    entry(Airframe::B737Max10, "B737_MAX_10", "Boeing", "B737 MAX 10", WeightClass::Large),
    entry(Airframe::B747_8, "B747_8", "Boeing", "B747-8", WeightClass::Heavy),
    entry(Airframe::B777_200Lr, "B777_200LR", "Boeing", "B777-200LR", WeightClass::Heavy),
    entry(Airframe::B777_300Er, "B777_300ER", "Boeing", "B777-300ER", WeightClass::Heavy),
    entry(Airframe::B777X, "B777X", "Boeing", "B777X", WeightClass::Heavy),
    entry(Airframe::B787_8, "B787_8", "Boeing", "B787-8", WeightClass::Heavy),
    entry(Airframe::B787_9, "B787_9", "Boeing", "B787-9", WeightClass::Heavy),
    entry(Airframe::B787_10, "B787_10", "Boeing", "B787-10", WeightClass::Heavy),
];

impl Airframe {
    fn entry(&self) -> &'static CatalogEntry {
        &CATALOG[*self as usize]
    }

    /// Every airframe in catalog order.
    pub fn all() -> impl Iterator<Item = Airframe> {
        CATALOG.iter().map(|e| e.airframe)
    }

    /// Stable identifier written to the database.
    pub fn code(&self) -> &'static str {
        self.entry().code
    }

    pub fn manufacturer(&self) -> &'static str {
        self.entry().manufacturer
    }

    /// Model name without the manufacturer, e.g. `A320neo`.
    pub fn name(&self) -> &'static str {
        self.entry().name
    }

    /// Manufacturer and model, e.g. `Airbus A320neo`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.manufacturer(), self.name())
    }

    pub fn weight_class(&self) -> WeightClass {
        self.entry().weight_class
    }

    pub fn from_code(code: &str) -> Option<Airframe> {
        let code = code.trim();
        CATALOG.iter().find(|e| e.code == code).map(|e| e.airframe)
    }

    pub fn by_name(name: &str) -> Option<Airframe> {
        let name = name.trim();
        CATALOG.iter().find(|e| e.name == name).map(|e| e.airframe)
    }

    pub fn by_full_name(full_name: &str) -> Option<Airframe> {
        let full_name = full_name.trim();
        Self::all().find(|a| a.full_name() == full_name)
    }

    pub fn by_manufacturer(manufacturer: &str) -> Vec<Airframe> {
        let manufacturer = manufacturer.trim();
        CATALOG.iter().filter(|e| e.manufacturer == manufacturer).map(|e| e.airframe).collect()
    }

    /// Resolves user input given as a code, a model name or a full name.
    pub fn lookup(input: &str) -> Option<Airframe> {
        Self::from_code(input).or_else(|| Self::by_name(input)).or_else(|| Self::by_full_name(input))
    }

    /// Checks that the code table is consistent: each entry sits at its
    /// airframe's position and no code is used twice.
    pub fn validate_catalog() -> Result<(), AirframeError> {
        let mut seen = HashSet::new();
        for (index, e) in CATALOG.iter().enumerate() {
            if e.airframe as usize != index || !seen.insert(e.code) {
                return Err(AirframeError::DuplicateCode(e.code));
            }
        }
        Ok(())
    }
}

impl FromStr for Airframe {
    type Err = AirframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| AirframeError::UnknownCode(s.to_string()))
    }
}

impl fmt::Display for Airframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.manufacturer(), self.name())
    }
}
