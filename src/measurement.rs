use std::fmt;

/// Sentinel written at the wire boundary when the board temperature is unavailable.
pub const BOARD_TEMP_UNAVAILABLE: f64 = -9999.0;

/// One complete sensor reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// Milliseconds since the Unix epoch, taken when the transaction returned.
    pub timestamp_ms: u64,
    /// Board/SoC temperature in °C; `None` when the thermal zone could not be read.
    pub board_temp_c: Option<f64>,
    /// Ambient temperature in °C.
    pub sensor_temp_c: f64,
    /// Relative humidity in percent, not clamped.
    pub humidity_pct: f64,
}

impl fmt::Display for Measurement {
    /// CSV line consumed by the weather station: timestamp, ambient temperature, board
    /// temperature, relative humidity. Temperatures are rendered with two decimals,
    /// humidity with one.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{:.2},{:.2},{:.1}",
            self.timestamp_ms,
            self.sensor_temp_c,
            self.board_temp_c.unwrap_or(BOARD_TEMP_UNAVAILABLE),
            self.humidity_pct
        )
    }
}
