//! Instrument tables: named sensors and digitizers.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::digitizer::DigitizerModel;
use crate::error::ConfigError;
use crate::sensor::{PolynomialSensorModel, SensorModel};

/// Sensors by serial number, polynomial sensors by name, digitizers by
/// model.
///
/// Lookups return `Option`; the `require_*` variants turn a miss into a
/// [`ConfigError`] for callers that cannot continue without the entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentTable {
    /// Linear sensors keyed by serial number.
    #[serde(default)]
    pub sensors: BTreeMap<String, SensorModel>,
    /// Polynomial sensors keyed by name.
    #[serde(default)]
    pub polynomial_sensors: BTreeMap<String, PolynomialSensorModel>,
    /// Digitizers keyed by model name.
    #[serde(default)]
    pub digitizers: BTreeMap<String, DigitizerModel>,
}

impl InstrumentTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The factory table bundled with the library.
    pub fn factory() -> Self {
        crate::factory_table::factory_table()
    }

    /// Look up a sensor by serial number.
    pub fn sensor(&self, serial: &str) -> Option<&SensorModel> {
        self.sensors.get(serial)
    }

    /// Look up a sensor, failing with [`ConfigError::UnknownSensor`].
    pub fn require_sensor(&self, serial: &str) -> Result<&SensorModel, ConfigError> {
        self.sensor(serial)
            .ok_or_else(|| ConfigError::UnknownSensor(serial.to_string()))
    }

    /// Look up a polynomial sensor by name.
    pub fn polynomial_sensor(&self, name: &str) -> Option<&PolynomialSensorModel> {
        self.polynomial_sensors.get(name)
    }

    /// Look up a polynomial sensor, failing with
    /// [`ConfigError::UnknownPolynomialSensor`].
    pub fn require_polynomial_sensor(&self, name: &str) -> Result<&PolynomialSensorModel, ConfigError> {
        self.polynomial_sensor(name)
            .ok_or_else(|| ConfigError::UnknownPolynomialSensor(name.to_string()))
    }

    /// Look up a digitizer by model name.
    pub fn digitizer(&self, model: &str) -> Option<&DigitizerModel> {
        self.digitizers.get(model)
    }

    /// Look up a digitizer, failing with [`ConfigError::UnknownDigitizer`].
    pub fn require_digitizer(&self, model: &str) -> Result<&DigitizerModel, ConfigError> {
        self.digitizer(model)
            .ok_or_else(|| ConfigError::UnknownDigitizer(model.to_string()))
    }

    /// Add or replace a sensor.
    pub fn insert_sensor(&mut self, serial: impl Into<String>, sensor: SensorModel) {
        self.sensors.insert(serial.into(), sensor);
    }

    /// Add or replace a digitizer.
    pub fn insert_digitizer(&mut self, model: impl Into<String>, digitizer: DigitizerModel) {
        self.digitizers.insert(model.into(), digitizer);
    }

    /// Merge `other` over this table. Entries in `other` replace entries
    /// with the same key.
    pub fn merge(&mut self, other: InstrumentTable) {
        self.sensors.extend(other.sensors);
        self.polynomial_sensors.extend(other.polynomial_sensors);
        self.digitizers.extend(other.digitizers);
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.sensors.len() + self.polynomial_sensors.len() + self.digitizers.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load a table from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let table = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), entries = table.len(), "loaded instrument table");
        Ok(table)
    }

    /// Parse a table from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the table to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the table to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use seisresp_core::{TransferDomain, Unit};

    fn sensor(gain: f64) -> SensorModel {
        SensorModel {
            name: "test sensor".into(),
            generator_constant: gain,
            reference_frequency: 1.0,
            domain: TransferDomain::LaplaceRadians,
            input_unit: Unit::MetersPerSecond,
            output_unit: Unit::Volts,
            poles: vec![Complex64::new(-1.0, 1.0), Complex64::new(-1.0, -1.0)],
            zeros: vec![Complex64::new(0.0, 0.0)],
        }
    }

    #[test]
    fn lookup_found_and_not_found() {
        let mut table = InstrumentTable::new();
        table.insert_sensor("T0001", sensor(100.0));
        assert!(table.sensor("T0001").is_some());
        assert!(table.sensor("T0002").is_none());
        assert!(matches!(
            table.require_sensor("T0002"),
            Err(ConfigError::UnknownSensor(ref s)) if s == "T0002"
        ));
        assert!(matches!(
            table.require_digitizer("none"),
            Err(ConfigError::UnknownDigitizer(_))
        ));
        assert!(matches!(
            table.require_polynomial_sensor("none"),
            Err(ConfigError::UnknownPolynomialSensor(_))
        ));
    }

    #[test]
    fn merge_overrides_matching_keys() {
        let mut base = InstrumentTable::new();
        base.insert_sensor("A", sensor(1.0));
        base.insert_sensor("B", sensor(2.0));

        let mut user = InstrumentTable::new();
        user.insert_sensor("B", sensor(20.0));
        user.insert_sensor("C", sensor(3.0));

        base.merge(user);
        assert_eq!(base.sensors.len(), 3);
        assert_eq!(base.sensor("A").unwrap().generator_constant, 1.0);
        assert_eq!(base.sensor("B").unwrap().generator_constant, 20.0);
    }

    #[test]
    fn toml_round_trip_keeps_complex_roots() {
        let mut table = InstrumentTable::new();
        table.insert_sensor("T0001", sensor(844.49));
        let text = table.to_toml().unwrap();
        let back = InstrumentTable::from_toml(&text).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn empty_document_is_empty_table() {
        let table = InstrumentTable::from_toml("").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let result = InstrumentTable::from_toml("[sensors.x]\ngenerator_constant = ");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn missing_file_is_read_error() {
        let result = InstrumentTable::load("/nonexistent/instruments.toml");
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
