//! Station configuration and channel response assembly.
//!
//! ```toml
//! [[channels]]
//! network = "AM"
//! station = "OMDBO"
//! location = "00"
//! channel = "HHZ"
//! sample_rate = 125.0
//! sensor = "yuma2-u2"
//! digitizer = "seiscape2"
//!
//! [[channels]]
//! network = "AM"
//! station = "OMDBO"
//! location = "00"
//! channel = "LKO"
//! sample_rate = 125.0
//! polynomial_sensor = "lm35"
//! digitizer = "seiscape2"
//! ```

use std::path::Path;

use seisresp_core::{ResponseChain, compose};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::table::InstrumentTable;

/// One recorded channel and the instruments behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Network code.
    pub network: String,
    /// Station code.
    pub station: String,
    /// Location code, often empty or `"00"`.
    #[serde(default)]
    pub location: String,
    /// Channel code.
    pub channel: String,
    /// Recorded sample rate (Hz).
    pub sample_rate: f64,
    /// Serial number of a linear sensor. `None` with no polynomial sensor
    /// means the digitizer input is recorded directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor: Option<String>,
    /// Name of a polynomial sensor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polynomial_sensor: Option<String>,
    /// Digitizer model.
    pub digitizer: String,
}

impl ChannelConfig {
    /// `NET.STA.LOC.CHA` identifier.
    pub fn seed_id(&self) -> String {
        format!("{}.{}.{}.{}", self.network, self.station, self.location, self.channel)
    }
}

/// Channels of one or more stations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Configured channels.
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

impl StationConfig {
    /// Load a station configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse a station configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Convert to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Find a channel by its `NET.STA.LOC.CHA` identifier.
    pub fn channel(&self, seed_id: &str) -> Option<&ChannelConfig> {
        self.channels.iter().find(|c| c.seed_id() == seed_id)
    }
}

/// Build the response chain of a channel from the instrument table.
///
/// A sample rate that disagrees with the digitizer's decimation is logged
/// but does not stop assembly; the recorded rate is what the data carries.
pub fn channel_response(table: &InstrumentTable, channel: &ChannelConfig) -> Result<ResponseChain, ConfigError> {
    let sensor = match (&channel.sensor, &channel.polynomial_sensor) {
        (Some(_), Some(_)) => return Err(ConfigError::AmbiguousSensor(channel.seed_id())),
        (Some(serial), None) => Some(table.require_sensor(serial)?.stage()),
        (None, Some(name)) => Some(table.require_polynomial_sensor(name)?.stage()),
        (None, None) => None,
    };

    let digitizer = table.require_digitizer(&channel.digitizer)?;
    let modeled_rate = digitizer.output_sample_rate();
    if (modeled_rate - channel.sample_rate).abs() > 1e-6 * channel.sample_rate.abs() {
        tracing::warn!(
            channel = %channel.seed_id(),
            recorded = channel.sample_rate,
            modeled = modeled_rate,
            "digitizer decimation does not reproduce the recorded sample rate"
        );
    }

    let chain = compose(sensor, &digitizer.stages()?)?;
    tracing::debug!(channel = %channel.seed_id(), stages = chain.len(), "assembled channel response");
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seisresp_core::{Sensitivity, Unit};

    fn channel(sensor: Option<&str>, polynomial: Option<&str>) -> ChannelConfig {
        ChannelConfig {
            network: "AM".into(),
            station: "OMDBO".into(),
            location: "00".into(),
            channel: "HHZ".into(),
            sample_rate: 125.0,
            sensor: sensor.map(String::from),
            polynomial_sensor: polynomial.map(String::from),
            digitizer: "seiscape2".into(),
        }
    }

    #[test]
    fn seed_id_joins_codes() {
        assert_eq!(channel(None, None).seed_id(), "AM.OMDBO.00.HHZ");
    }

    #[test]
    fn sensor_channel_has_velocity_input() {
        let table = InstrumentTable::factory();
        let chain = channel_response(&table, &channel(Some("yuma2-u2"), None)).unwrap();
        assert_eq!(chain.len(), 6);
        assert_eq!(chain.input_unit(), &Unit::MetersPerSecond);
        assert_eq!(chain.output_unit(), &Unit::Counts);
    }

    #[test]
    fn no_sensor_gives_digitizer_only_chain() {
        let table = InstrumentTable::factory();
        let chain = channel_response(&table, &channel(None, None)).unwrap();
        assert_eq!(chain.len(), 5);
        assert_eq!(chain.input_unit(), &Unit::Volts);
    }

    #[test]
    fn polynomial_channel_has_polynomial_sensitivity() {
        let table = InstrumentTable::factory();
        let chain = channel_response(&table, &channel(None, Some("lm35"))).unwrap();
        assert!(matches!(chain.sensitivity(), Some(Sensitivity::Polynomial { .. })));
    }

    #[test]
    fn both_sensors_is_ambiguous() {
        let table = InstrumentTable::factory();
        let result = channel_response(&table, &channel(Some("yuma2-u2"), Some("lm35")));
        assert!(matches!(result, Err(ConfigError::AmbiguousSensor(_))));
    }

    #[test]
    fn unknown_sensor_is_reported() {
        let table = InstrumentTable::factory();
        let result = channel_response(&table, &channel(Some("T9999"), None));
        assert!(matches!(result, Err(ConfigError::UnknownSensor(ref s)) if s == "T9999"));
    }

    #[test]
    fn station_toml_lists_channels() {
        let config = StationConfig::from_toml(
            r#"
[[channels]]
network = "AM"
station = "OMDBO"
channel = "HDF"
sample_rate = 125.0
digitizer = "seiscape2"
"#,
        )
        .unwrap();
        assert_eq!(config.channels.len(), 1);
        assert_eq!(config.channels[0].location, "");
        assert!(config.channel("AM.OMDBO..HDF").is_some());
        assert!(config.channel("AM.OMDBO..HHZ").is_none());
    }
}
