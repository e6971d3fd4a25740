//! Full-scale range configuration for unit conversion
//!
//! The ranges are a property of how the sensors were configured at record
//! time and cannot be recovered from the log itself. Defaults match the
//! logger's factory settings.

use serde::{Deserialize, Serialize};

use crate::demux::DemuxError;
use crate::sensor::SensorTag;

/// Default LSM6DSx accelerometer range in g
pub const DEFAULT_LSM_ACCEL_RANGE_G: f64 = 32.0;

/// Default LSM6DSx gyroscope range in degrees per second
pub const DEFAULT_LSM_GYRO_RANGE_DPS: f64 = 2000.0;

/// Default IIS3DWB accelerometer range in g
pub const DEFAULT_IIS_ACCEL_RANGE_G: f64 = 16.0;

/// ADXL37x range in g, fixed by the part (ADXL373 is +/-400 g)
pub const ADXL37X_RANGE_G: f64 = 400.0;

/// Full-scale range for each sensor, used as the numerator of the
/// counts-to-units scale factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// LSM6DSx accelerometer range (g)
    pub lsm_accel_range_g: f64,
    /// LSM6DSx gyroscope range (deg/s)
    pub lsm_gyro_range_dps: f64,
    /// IIS3DWB accelerometer range (g)
    pub iis_accel_range_g: f64,
    /// ADXL37x accelerometer range (g)
    pub adxl_accel_range_g: f64,
}

impl ConversionConfig {
    /// Create a configuration from the four ranges, in [`SensorTag::ALL`] order
    pub fn new(
        lsm_accel_range_g: f64,
        lsm_gyro_range_dps: f64,
        iis_accel_range_g: f64,
        adxl_accel_range_g: f64,
    ) -> Self {
        Self {
            lsm_accel_range_g,
            lsm_gyro_range_dps,
            iis_accel_range_g,
            adxl_accel_range_g,
        }
    }

    /// Configured range for a sensor
    pub fn range(&self, sensor: SensorTag) -> f64 {
        match sensor {
            SensorTag::LsmAccel => self.lsm_accel_range_g,
            SensorTag::LsmGyro => self.lsm_gyro_range_dps,
            SensorTag::IisAccel => self.iis_accel_range_g,
            SensorTag::AdxlAccel => self.adxl_accel_range_g,
        }
    }

    /// Return a copy with one sensor's range replaced
    pub fn with_range(mut self, sensor: SensorTag, range: f64) -> Self {
        match sensor {
            SensorTag::LsmAccel => self.lsm_accel_range_g = range,
            SensorTag::LsmGyro => self.lsm_gyro_range_dps = range,
            SensorTag::IisAccel => self.iis_accel_range_g = range,
            SensorTag::AdxlAccel => self.adxl_accel_range_g = range,
        }
        self
    }

    /// Return a copy with each `Some` range replaced, in [`SensorTag::ALL`]
    /// order. `None` keeps the current value.
    pub fn with_overrides(self, overrides: [Option<f64>; 4]) -> Self {
        SensorTag::ALL
            .into_iter()
            .zip(overrides)
            .fold(self, |config, (sensor, range)| match range {
                Some(range) => config.with_range(sensor, range),
                None => config,
            })
    }

    /// Check that a sensor's range is usable and return it.
    ///
    /// A range must be finite and strictly positive. Only sensors that
    /// actually appear in a log are checked, so an unused sensor may carry
    /// any value.
    pub fn validate_for(&self, sensor: SensorTag) -> Result<f64, DemuxError> {
        let range = self.range(sensor);
        if range.is_finite() && range > 0.0 {
            Ok(range)
        } else {
            Err(DemuxError::Config { sensor, range })
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_LSM_ACCEL_RANGE_G,
            DEFAULT_LSM_GYRO_RANGE_DPS,
            DEFAULT_IIS_ACCEL_RANGE_G,
            ADXL37X_RANGE_G,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LoggerSettings;

    #[test]
    fn test_default_ranges() {
        let config = ConversionConfig::default();
        assert_eq!(config.range(SensorTag::LsmAccel), 32.0);
        assert_eq!(config.range(SensorTag::LsmGyro), 2000.0);
        assert_eq!(config.range(SensorTag::IisAccel), 16.0);
        assert_eq!(config.range(SensorTag::AdxlAccel), 400.0);
    }

    #[test]
    fn test_with_range() {
        let config = ConversionConfig::default().with_range(SensorTag::LsmGyro, 250.0);
        assert_eq!(config.lsm_gyro_range_dps, 250.0);
        assert_eq!(config.lsm_accel_range_g, 32.0);
    }

    #[test]
    fn test_overrides_beat_settings() {
        let settings = LoggerSettings::parse(
            "LSM6DSx_accel_range_g = 8\nLSM6DSx_gyro_range_dps = 250\nIIS3DWB_accel_range_g = 4\n",
        );
        let config = settings
            .conversion_config()
            .with_overrides([Some(16.0), None, Some(2.0), None]);

        assert_eq!(config.lsm_accel_range_g, 16.0);
        assert_eq!(config.lsm_gyro_range_dps, 250.0);
        assert_eq!(config.iis_accel_range_g, 2.0);
        assert_eq!(config.adxl_accel_range_g, ADXL37X_RANGE_G);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let config = ConversionConfig::new(4.0, 125.0, 8.0, 200.0);
        assert_eq!(config.with_overrides([None; 4]), config);
        assert_eq!(
            ConversionConfig::default()
                .with_overrides([None, None, None, Some(200.0)])
                .adxl_accel_range_g,
            200.0
        );
    }

    #[test]
    fn test_validate_accepts_positive() {
        let config = ConversionConfig::default();
        for sensor in SensorTag::ALL {
            assert_eq!(config.validate_for(sensor).unwrap(), config.range(sensor));
        }
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        for bad in [0.0, -4.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let config = ConversionConfig::default().with_range(SensorTag::IisAccel, bad);
            match config.validate_for(SensorTag::IisAccel) {
                Err(DemuxError::Config { sensor, .. }) => {
                    assert_eq!(sensor, SensorTag::IisAccel)
                }
                other => panic!("Expected Config error for {bad}, got {other:?}"),
            }
            // Other sensors are unaffected
            assert!(config.validate_for(SensorTag::LsmAccel).is_ok());
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ConversionConfig::new(8.0, 500.0, 4.0, 200.0);
        let json = serde_json::to_string(&config).unwrap();
        let loaded: ConversionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, config);
    }
}
