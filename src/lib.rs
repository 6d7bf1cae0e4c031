mod bus;
mod error;
mod history;
mod measurement;
mod service;
mod sht30;


pub(crate) use bus::Bus;

pub use error::*;
pub use history::History;
pub use measurement::{Measurement, BOARD_TEMP_UNAVAILABLE};
pub use service::{run, Sensor, Service};
pub use sht30::SensorClient;
