//! Fixed-size record as stored in an IMpack log file

use bytemuck::{Pod, Zeroable};

use crate::sample::Sample;
use crate::sensor::SensorTag;
use crate::time::LoggerTime;

/// One 12-byte log record
///
/// Layout, little-endian, no padding:
/// ```text
/// u32 timestamp_us | i16 axis_x | i16 axis_y | i16 axis_z | u16 tag
/// ```
///
/// Fields are kept as byte arrays so the struct has alignment 1 and can be
/// cast directly out of an unaligned file buffer. The axis bytes are left
/// uninterpreted because their byte order depends on the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct RawPacket {
    /// Microsecond counter at the time the sample was read (4 bytes)
    pub time: LoggerTime,

    /// X, Y, Z axis words as stored (2 bytes each)
    pub axes: [[u8; 2]; 3],

    /// Sensor tag (2 bytes, little-endian)
    pub tag: [u8; 2],
}

impl RawPacket {
    /// Record size in bytes
    pub const PACKET_SIZE: usize = 12;

    /// Build a record from decoded field values, encoding the axes
    /// little-endian
    pub fn new(timestamp_us: u32, axes: [i16; 3], tag: u16) -> Self {
        Self {
            time: LoggerTime::from_micros(timestamp_us),
            axes: axes.map(i16::to_le_bytes),
            tag: tag.to_le_bytes(),
        }
    }

    /// Raw tag value
    pub fn tag_raw(&self) -> u16 {
        u16::from_le_bytes(self.tag)
    }

    /// Sensor that produced this record, if the tag is known
    pub fn sensor(&self) -> Option<SensorTag> {
        SensorTag::from_raw(self.tag_raw())
    }

    /// Convert this record to physical units using the rule for `sensor`
    /// and the given full-scale range.
    pub fn to_sample(&self, sensor: SensorTag, range: f64) -> Sample {
        let conversion = sensor.conversion();
        let [x, y, z] = self.axes.map(|bytes| conversion.convert(bytes, range));
        Sample {
            timestamp_us: self.time.as_micros(),
            time_s: self.time.as_seconds(),
            x,
            y,
            z,
        }
    }
}
