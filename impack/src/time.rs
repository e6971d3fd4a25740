//! Timestamp field of an IMpack log record
//!
//! The logger stamps every record with the value of a free-running
//! microsecond counter. The counter is 32 bits wide and wraps roughly every
//! 71.6 minutes; no attempt is made to unwrap it here.

use bytemuck::{Pod, Zeroable};

/// Seconds per counter tick
pub const SECONDS_PER_TICK: f64 = 1e-6;

/// 4-byte little-endian microsecond counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct LoggerTime([u8; 4]);

impl LoggerTime {
    /// Create from raw bytes as they appear in the log
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Create from a counter value
    pub fn from_micros(micros: u32) -> Self {
        Self(micros.to_le_bytes())
    }

    /// Raw counter value in microseconds
    pub fn as_micros(&self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    /// Counter value converted to seconds
    pub fn as_seconds(&self) -> f64 {
        self.as_micros() as f64 * SECONDS_PER_TICK
    }
}
