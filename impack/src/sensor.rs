//! Sensor identification and per-sensor conversion rules
//!
//! Every record carries a 16-bit tag naming the device that produced it. The
//! firmware reuses the data-ready interrupt pin mask of each sensor as its
//! tag, which is why the values look arbitrary.
//!
//! The dispatch from tag to conversion is a fixed table: all four sensors
//! share the same scale law, and only the ADXL37x differs in how the two
//! bytes of each axis are ordered.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw counts corresponding to the full-scale range (2^15)
pub const FULL_SCALE_COUNTS: f64 = 32768.0;

/// Raw tag values as written by the logger firmware
pub mod tag_id {
    /// LSM6DSx accelerometer (INT1 pin mask)
    pub const LSM_ACCEL: u16 = 0x1000;
    /// LSM6DSx gyroscope (INT2 pin mask)
    pub const LSM_GYRO: u16 = 0x0020;
    /// IIS3DWB accelerometer
    pub const IIS_ACCEL: u16 = 0x8000;
    /// ADXL37x high-g accelerometer
    pub const ADXL_ACCEL: u16 = 0x0010;
}

/// Byte order of the three axis words inside a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisByteOrder {
    /// Bytes stored LSB first, like the rest of the record
    Little,
    /// Bytes stored MSB first; the ADXL37x streams its data registers this way
    Big,
}

impl AxisByteOrder {
    /// Decode a two-byte axis word as a signed 16-bit count
    pub fn decode(self, bytes: [u8; 2]) -> i16 {
        match self {
            AxisByteOrder::Little => i16::from_le_bytes(bytes),
            AxisByteOrder::Big => i16::from_be_bytes(bytes),
        }
    }
}

/// Conversion rule from raw axis bytes to physical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    /// How the two bytes of each axis are ordered
    pub byte_order: AxisByteOrder,
    /// Count value that maps to the configured full-scale range
    pub full_scale_counts: f64,
}

impl Conversion {
    /// Create a conversion rule with the standard 16-bit full scale
    pub const fn new(byte_order: AxisByteOrder) -> Self {
        Self {
            byte_order,
            full_scale_counts: FULL_SCALE_COUNTS,
        }
    }

    /// Physical units per raw count for a given full-scale range
    pub fn units_per_count(&self, range: f64) -> f64 {
        range / self.full_scale_counts
    }

    /// Convert one raw axis word to physical units.
    ///
    /// ADXL37x data is left-justified 12-bit, so scaling the full 16-bit
    /// word by `range / 2^15` gives the same result as shifting out the low
    /// nibble and scaling by `range / 2^11`.
    pub fn convert(&self, bytes: [u8; 2], range: f64) -> f64 {
        self.byte_order.decode(bytes) as f64 * self.units_per_count(range)
    }
}

/// Rule used by the LSM6DSx and IIS3DWB sensors
pub const STANDARD: Conversion = Conversion::new(AxisByteOrder::Little);

/// Rule used by the ADXL37x
pub const BYTE_SWAPPED: Conversion = Conversion::new(AxisByteOrder::Big);

/// Sensor that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorTag {
    /// LSM6DSx accelerometer (accelerometer-A), in g
    LsmAccel,
    /// LSM6DSx gyroscope (gyroscope-A), in degrees per second
    LsmGyro,
    /// IIS3DWB wideband accelerometer (accelerometer-B), in g
    IisAccel,
    /// ADXL37x high-g accelerometer (accelerometer-C), in g
    AdxlAccel,
}

impl SensorTag {
    /// All sensors in output order
    pub const ALL: [SensorTag; 4] = [
        SensorTag::LsmAccel,
        SensorTag::LsmGyro,
        SensorTag::IisAccel,
        SensorTag::AdxlAccel,
    ];

    /// Look up a sensor by its raw tag value
    ///
    /// Returns `None` for values the logger does not produce.
    pub fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            tag_id::LSM_ACCEL => Some(SensorTag::LsmAccel),
            tag_id::LSM_GYRO => Some(SensorTag::LsmGyro),
            tag_id::IIS_ACCEL => Some(SensorTag::IisAccel),
            tag_id::ADXL_ACCEL => Some(SensorTag::AdxlAccel),
            _ => None,
        }
    }

    /// Raw tag value written by the logger
    pub fn raw(self) -> u16 {
        match self {
            SensorTag::LsmAccel => tag_id::LSM_ACCEL,
            SensorTag::LsmGyro => tag_id::LSM_GYRO,
            SensorTag::IisAccel => tag_id::IIS_ACCEL,
            SensorTag::AdxlAccel => tag_id::ADXL_ACCEL,
        }
    }

    /// Position of this sensor in [`SensorTag::ALL`]
    pub fn index(self) -> usize {
        match self {
            SensorTag::LsmAccel => 0,
            SensorTag::LsmGyro => 1,
            SensorTag::IisAccel => 2,
            SensorTag::AdxlAccel => 3,
        }
    }

    /// Conversion rule for this sensor
    pub fn conversion(self) -> &'static Conversion {
        match self {
            SensorTag::LsmAccel | SensorTag::LsmGyro | SensorTag::IisAccel => &STANDARD,
            SensorTag::AdxlAccel => &BYTE_SWAPPED,
        }
    }

    /// Human readable device name
    pub fn name(self) -> &'static str {
        match self {
            SensorTag::LsmAccel => "LSM6DSx Accelerometer",
            SensorTag::LsmGyro => "LSM6DSx Gyroscope",
            SensorTag::IisAccel => "IIS3DWB Accelerometer",
            SensorTag::AdxlAccel => "ADXL37x Accelerometer",
        }
    }

    /// Physical unit of converted axis values
    pub fn unit(self) -> &'static str {
        match self {
            SensorTag::LsmGyro => "dps",
            _ => "g",
        }
    }

    /// True for the gyroscope, false for the three accelerometers
    pub fn is_gyro(self) -> bool {
        matches!(self, SensorTag::LsmGyro)
    }
}

impl fmt::Display for SensorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (tag 0x{:04X})", self.name(), self.raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_raw_known_tags() {
        assert_eq!(SensorTag::from_raw(0x1000), Some(SensorTag::LsmAccel));
        assert_eq!(SensorTag::from_raw(0x0020), Some(SensorTag::LsmGyro));
        assert_eq!(SensorTag::from_raw(0x8000), Some(SensorTag::IisAccel));
        assert_eq!(SensorTag::from_raw(0x0010), Some(SensorTag::AdxlAccel));
    }

    #[test]
    fn test_from_raw_unknown_tags() {
        assert_eq!(SensorTag::from_raw(0xFFFF), None);
        assert_eq!(SensorTag::from_raw(0x0000), None);
        assert_eq!(SensorTag::from_raw(0x1010), None);
    }

    #[test]
    fn test_raw_roundtrip_and_index() {
        for (i, tag) in SensorTag::ALL.iter().enumerate() {
            assert_eq!(SensorTag::from_raw(tag.raw()), Some(*tag));
            assert_eq!(tag.index(), i);
        }
    }

    #[test]
    fn test_only_adxl_is_byte_swapped() {
        for tag in SensorTag::ALL {
            let expected = if tag == SensorTag::AdxlAccel {
                AxisByteOrder::Big
            } else {
                AxisByteOrder::Little
            };
            assert_eq!(tag.conversion().byte_order, expected);
        }
    }

    #[test]
    fn test_byte_order_decode() {
        assert_eq!(AxisByteOrder::Little.decode([0x34, 0x12]), 0x1234);
        assert_eq!(AxisByteOrder::Big.decode([0x34, 0x12]), 0x3412);
        assert_eq!(AxisByteOrder::Big.decode([0x00, 0x01]), 1);
        assert_eq!(AxisByteOrder::Big.decode([0xFF, 0xF0]), -16);
    }

    #[test]
    fn test_standard_full_scale() {
        let v = STANDARD.convert(32767i16.to_le_bytes(), 16.0);
        assert_relative_eq!(v, 32767.0 * 16.0 / 32768.0, epsilon = 1e-12);

        let v = STANDARD.convert((-32768i16).to_le_bytes(), 16.0);
        assert_relative_eq!(v, -16.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_is_exact() {
        assert_eq!(STANDARD.convert([0, 0], 2000.0), 0.0);
        assert_eq!(BYTE_SWAPPED.convert([0, 0], 400.0), 0.0);
    }

    #[test]
    fn test_adxl_matches_12_bit_scaling() {
        // 12-bit count of 100 left-justified into 16 bits, MSB first
        let word = (100i16 << 4).to_be_bytes();
        let v = BYTE_SWAPPED.convert(word, 400.0);
        assert_relative_eq!(v, 100.0 * 400.0 / 2048.0, epsilon = 1e-12);
    }

    #[test]
    fn test_units() {
        assert_eq!(SensorTag::LsmGyro.unit(), "dps");
        assert!(SensorTag::LsmGyro.is_gyro());
        for tag in [SensorTag::LsmAccel, SensorTag::IisAccel, SensorTag::AdxlAccel] {
            assert_eq!(tag.unit(), "g");
            assert!(!tag.is_gyro());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            SensorTag::AdxlAccel.to_string(),
            "ADXL37x Accelerometer (tag 0x0010)"
        );
    }
}
