//! SHT3x single-shot measurement protocol and the Linux bus client built on it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use i2cdev::linux::LinuxI2CDevice;

use crate::{Bus, Error, Measurement, Result};

/// I2C bus the sensor is wired to.
const BUS_NUMBER: u8 = 1;

/// SHT3x default slave address (0x45 when the ADDR pin is pulled high).
const SLAVE_ADDR: u16 = 0x44;

/// Single-shot measurement, high repeatability, clock stretching enabled. With clock
/// stretching the sensor holds SCL until the measurement is done, so the response can be
/// read back immediately after the command.
const CMD_MEASURE: [u8; 2] = [0x2c, 0x06];

/// Measurement frame layout: T MSB, T LSB, CRC, RH MSB, RH LSB, CRC.
pub(crate) const FRAME_LEN: usize = 6;

/// SoC temperature exposed by the kernel in millidegrees Celsius.
const THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Runs one measurement transaction: triggers a conversion and reads the raw frame back.
/// A short command write aborts the transaction before any read reaches the bus.
pub(crate) fn measure(bus: &mut impl Bus) -> Result<(f64, f64)> {
    let wrote = bus.write(&CMD_MEASURE)?;
    if wrote != CMD_MEASURE.len() {
        return Err(Error::BusWrite {
            wrote,
            expected: CMD_MEASURE.len(),
        });
    }

    let mut frame = [0u8; FRAME_LEN];
    let read = bus.read(&mut frame)?;
    if read != FRAME_LEN {
        return Err(Error::BusRead {
            read,
            expected: FRAME_LEN,
        });
    }

    Ok(decode(&frame))
}

/// Converts a raw measurement frame to (temperature in °C, relative humidity in %).
/// The CRC bytes at offsets 2 and 5 are not verified.
fn decode(frame: &[u8; FRAME_LEN]) -> (f64, f64) {
    let raw_temp = u16::from_be_bytes([frame[0], frame[1]]);
    let raw_hum = u16::from_be_bytes([frame[3], frame[4]]);
    let temperature = -45.0 + 175.0 * f64::from(raw_temp) / 65535.0;
    let humidity = 100.0 * f64::from(raw_hum) / 65535.0;
    (temperature, humidity)
}

/// Board temperature from a thermal zone file, best effort. A missing or garbled file
/// yields `None` and never fails the caller.
fn board_temp(path: &Path) -> Option<f64> {
    let text = fs::read_to_string(path).ok()?;
    let millidegrees: f64 = text.trim().parse().ok()?;
    Some(millidegrees / 1000.0)
}

fn timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Client for a single SHT30 on a fixed Linux I2C bus.
///
/// Every [`read_sensor`](Self::read_sensor) call opens the device anew and drops it when
/// the transaction is over, so the bus file descriptor never outlives the call, on error
/// paths included.
pub struct SensorClient {
    device: PathBuf,
    thermal_zone: PathBuf,
}

impl SensorClient {
    pub fn new() -> Self {
        Self {
            device: PathBuf::from(format!("/dev/i2c-{BUS_NUMBER}")),
            thermal_zone: PathBuf::from(THERMAL_ZONE),
        }
    }

    /// Performs one measurement transaction and returns the finished record. The
    /// timestamp is taken last, once the bus exchange and the board temperature read have
    /// both completed.
    pub fn read_sensor(&self) -> Result<Measurement> {
        let (sensor_temp_c, humidity_pct) = {
            let mut device = LinuxI2CDevice::new(&self.device, SLAVE_ADDR)?;
            measure(&mut device)?
        };

        let board_temp_c = board_temp(&self.thermal_zone);

        Ok(Measurement {
            timestamp_ms: timestamp_ms(),
            board_temp_c,
            sensor_temp_c,
            humidity_pct,
        })
    }
}

impl Default for SensorClient {
    fn default() -> Self {
        Self::new()
    }
}
