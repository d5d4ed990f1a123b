//! Instrument configuration for seisresp.
//!
//! Sensors and digitizers are described once, in TOML instrument tables,
//! and combined per channel into a [`ResponseChain`](seisresp_core::ResponseChain).
//!
//! # Features
//!
//! - **Instrument tables**: sensors by serial, polynomial sensors, digitizers by model
//! - **Factory table**: built-in entries that are always available
//! - **Station configuration**: channels and the instruments behind them
//! - **Validation**: physical plausibility of every table entry
//! - **Paths**: platform-specific location of the user table
//!
//! # Example
//!
//! ```rust
//! use seisresp_config::{ChannelConfig, InstrumentTable, channel_response};
//!
//! let table = InstrumentTable::factory();
//! let channel = ChannelConfig {
//!     network: "AM".into(),
//!     station: "OMDBO".into(),
//!     location: "00".into(),
//!     channel: "HHZ".into(),
//!     sample_rate: 125.0,
//!     sensor: Some("yuma2-u2".into()),
//!     polynomial_sensor: None,
//!     digitizer: "seiscape2".into(),
//! };
//!
//! let chain = channel_response(&table, &channel).unwrap();
//! let counts_per_mps = chain.sensitivity().and_then(|s| s.scalar()).unwrap();
//! assert!(counts_per_mps > 3.0e8);
//! ```

mod digitizer;
mod error;
mod sensor;
mod station;
mod table;

/// Platform-specific paths for configuration.
pub mod paths;

/// Instrument table validation.
pub mod validation;

/// Factory instrument table bundled with the library.
pub mod factory_table;

pub use digitizer::{DigitizerModel, SincStageConfig};
pub use error::ConfigError;
pub use factory_table::{FACTORY_DIGITIZERS, FACTORY_SENSORS, is_factory_sensor};
pub use paths::{ensure_user_config_dir, load_user_or_factory, user_config_dir, user_instrument_table_path};
pub use sensor::{PolynomialSensorModel, SensorModel};
pub use station::{ChannelConfig, StationConfig, channel_response};
pub use table::InstrumentTable;
pub use validation::{ValidationError, ValidationResult, validate_table};
