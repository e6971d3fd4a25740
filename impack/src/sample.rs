//! Converted sensor samples

use serde::{Deserialize, Serialize};

/// One record converted to physical units
///
/// Axis units depend on the sensor: g for the accelerometers, degrees per
/// second for the gyroscope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Raw microsecond counter from the record
    pub timestamp_us: u32,
    /// Timestamp in seconds
    pub time_s: f64,
    /// X axis
    pub x: f64,
    /// Y axis
    pub y: f64,
    /// Z axis
    pub z: f64,
}

impl Sample {
    /// Axis values as an array
    pub fn axes(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Euclidean norm of the three axes
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}
