//! Physical units carried by response stages.
//!
//! Codes follow the conventions used in station metadata (`M/S`, `V`,
//! `COUNTS`, ...). Units compare by identity, so a chain can check that
//! every stage consumes exactly what the previous stage produced.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Input or output unit of a response stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Ground velocity.
    MetersPerSecond,
    /// Ground acceleration.
    MetersPerSecondSquared,
    /// Ground displacement.
    Meters,
    /// Electrical potential.
    Volts,
    /// Digitizer output.
    Counts,
    /// Temperature.
    DegreesCelsius,
    /// Pressure (infrasound).
    Pascals,
    /// Any unit without a dedicated variant, stored as its code.
    Other(String),
}

impl Unit {
    /// Metadata code for this unit.
    pub fn code(&self) -> &str {
        match self {
            Unit::MetersPerSecond => "M/S",
            Unit::MetersPerSecondSquared => "M/S**2",
            Unit::Meters => "M",
            Unit::Volts => "V",
            Unit::Counts => "COUNTS",
            Unit::DegreesCelsius => "DEGC",
            Unit::Pascals => "PA",
            Unit::Other(code) => code,
        }
    }

    /// Human-readable description used alongside the code.
    pub fn description(&self) -> &str {
        match self {
            Unit::MetersPerSecond => "Velocity in meters per second",
            Unit::MetersPerSecondSquared => "Acceleration in meters per second squared",
            Unit::Meters => "Displacement in meters",
            Unit::Volts => "Volts",
            Unit::Counts => "Digital counts",
            Unit::DegreesCelsius => "Temperature in degrees Celsius",
            Unit::Pascals => "Pressure in pascals",
            Unit::Other(code) => code,
        }
    }

    /// Returns `true` for ground-motion units.
    pub fn is_ground_motion(&self) -> bool {
        matches!(
            self,
            Unit::MetersPerSecond | Unit::MetersPerSecondSquared | Unit::Meters
        )
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Unit {
    type Err = core::convert::Infallible;

    /// Known codes match case-insensitively; anything else is kept as
    /// written, minus surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        let unit = match code.to_ascii_uppercase().as_str() {
            "M/S" => Unit::MetersPerSecond,
            "M/S**2" | "M/S^2" | "M/S/S" => Unit::MetersPerSecondSquared,
            "M" => Unit::Meters,
            "V" => Unit::Volts,
            "COUNTS" | "COUNT" => Unit::Counts,
            "DEGC" | "C" => Unit::DegreesCelsius,
            "PA" => Unit::Pascals,
            _ => Unit::Other(code.to_string()),
        };
        Ok(unit)
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        match code.parse() {
            Ok(unit) => Ok(unit),
            Err(never) => match never {},
        }
    }
}
