//! Factory instrument table bundled with the library.
//!
//! Always available without external files; a user table loaded from disk
//! is merged over it.

use crate::InstrumentTable;

/// Sensor serial numbers in the factory table.
pub static FACTORY_SENSORS: &[&str] = &["yuma2-u2"];

/// Digitizer models in the factory table.
pub static FACTORY_DIGITIZERS: &[&str] = &["psn-adc24", "psn-adc24-direct", "seiscape2"];

/// TOML source of the factory table, embedded at compile time.
pub const FACTORY_TABLE_TOML: &str = r#"
# Yuma2 force-balance broadband, mechanical rev 4.3, electrical rev 4.0.
[sensors.yuma2-u2]
name = "Yuma2 mechanical rev 4.3, electrical rev 4.0"
generator_constant = 844.49
reference_frequency = 1.0
domain = "LAPLACE (RADIANS/SECOND)"
input_unit = "M/S"
output_unit = "V"
poles = [
    [-0.085842, 0.0008651],
    [-0.085842, -0.0008651],
    [-209.7, 0.0],
    [-1000.0, 0.0],
    [-1002632.0, 0.0],
]
zeros = [
    [0.0, 0.0],
    [-0.000004181, 0.0],
]

# LM35 centigrade temperature sensor, 10 mV per degree.
[polynomial_sensors.lm35]
name = "LM35 temperature sensor"
input_unit = "DEGC"
output_unit = "V"
coefficients = [0.0, 100.0]
approximation_domain = [2.0, 150.0]

# AD7175 sigma-delta board: divide by 8 with a 93 Hz RC pole, 8 MHz
# modulator, sinc5 to 250 kHz, then sinc1 averaging to 125 Hz per channel.
[digitizers.seiscape2]
name = "seiscape2"
vref = 2.5
divider = 8.0
anti_alias_pole = -586.0
pga_gain = 1.0
bits = 24
modulator_rate = 8000000.0
reference_frequency = 1.0

[[digitizers.seiscape2.sinc_stages]]
order = 5
length = 12
factor = 32

[[digitizers.seiscape2.sinc_stages]]
order = 1
length = 2000
factor = 2000
input_rate = 250000.0

# PSN-ADC24 seismic inputs (divide by 17). The internal decimation chain is
# not modeled, so the modulator rate is the recorded rate.
[digitizers.psn-adc24]
name = "psn-adc24"
vref = 2.5
divider = 17.0
pga_gain = 1.0
bits = 24
modulator_rate = 100.0
reference_frequency = 1.0

# PSN-ADC24 auxiliary inputs wired without a divider (temperature channel).
[digitizers.psn-adc24-direct]
name = "psn-adc24-direct"
vref = 2.5
divider = 1.0
pga_gain = 1.0
bits = 24
modulator_rate = 100.0
reference_frequency = 1.0
"#;

/// Parse the factory table.
pub fn factory_table() -> InstrumentTable {
    InstrumentTable::from_toml(FACTORY_TABLE_TOML).unwrap_or_default()
}

/// Returns `true` if `serial` names a factory sensor.
pub fn is_factory_sensor(serial: &str) -> bool {
    FACTORY_SENSORS.contains(&serial)
}
