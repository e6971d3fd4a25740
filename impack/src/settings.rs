//! Reader for the logger's `settings.txt`
//!
//! The logger keeps its configuration on the SD card next to the recordings
//! as `id = value` lines, with optional `#` comment lines. Reading the file
//! that was on the card during a recording recovers the full-scale ranges
//! needed to convert that recording.
//!
//! Parsing follows the firmware: for each setting, the first line that
//! starts with the setting id and carries an allowed value wins. Anything
//! missing or out of range falls back to the factory default.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{ConversionConfig, ADXL37X_RANGE_G};
use crate::sensor::SensorTag;

/// Setting identifiers used by the logger firmware
pub mod setting_id {
    pub const LSM_ACCEL_ENABLED: &str = "LSM6DSx_accel_enabled";
    pub const LSM_ACCEL_RANGE: &str = "LSM6DSx_accel_range_g";
    pub const LSM_GYRO_ENABLED: &str = "LSM6DSx_gyro_enabled";
    pub const LSM_GYRO_RANGE: &str = "LSM6DSx_gyro_range_dps";
    pub const IIS_ACCEL_ENABLED: &str = "IIS3DWB_accel_enabled";
    pub const IIS_ACCEL_RANGE: &str = "IIS3DWB_accel_range_g";
    pub const ADXL_ACCEL_ENABLED: &str = "ADXL37x_accel_enabled";
}

/// Name of the settings file on the logger's SD card
pub const SETTINGS_FILE: &str = "settings.txt";

const SETTING_DELIMITER: char = '=';

/// Definition of one setting: id, factory default, and allowed values
/// (empty means any value)
#[derive(Debug, Clone, Copy)]
struct SettingDef {
    id: &'static str,
    default: i32,
    allowed: &'static [i32],
}

const ENABLE_VALUES: &[i32] = &[0, 1];

const SETTING_DEFS: [SettingDef; 7] = [
    SettingDef {
        id: setting_id::LSM_ACCEL_ENABLED,
        default: 1,
        allowed: ENABLE_VALUES,
    },
    SettingDef {
        id: setting_id::LSM_ACCEL_RANGE,
        default: 32,
        allowed: &[4, 8, 16, 32],
    },
    SettingDef {
        id: setting_id::LSM_GYRO_ENABLED,
        default: 1,
        allowed: ENABLE_VALUES,
    },
    SettingDef {
        id: setting_id::LSM_GYRO_RANGE,
        default: 2000,
        allowed: &[125, 250, 500, 1000, 2000],
    },
    SettingDef {
        id: setting_id::IIS_ACCEL_ENABLED,
        default: 1,
        allowed: ENABLE_VALUES,
    },
    SettingDef {
        id: setting_id::IIS_ACCEL_RANGE,
        default: 16,
        allowed: &[2, 4, 8, 16],
    },
    SettingDef {
        id: setting_id::ADXL_ACCEL_ENABLED,
        default: 1,
        allowed: ENABLE_VALUES,
    },
];

/// Errors reading a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Settings recovered from a logger settings file
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerSettings {
    values: BTreeMap<&'static str, i32>,
    defaulted: Vec<&'static str>,
}

impl LoggerSettings {
    /// Parse the text of a settings file.
    ///
    /// Never fails: settings that cannot be found are set to their default
    /// and listed by [`defaulted`](Self::defaulted).
    pub fn parse(text: &str) -> Self {
        let mut values = BTreeMap::new();
        let mut defaulted = Vec::new();

        for def in SETTING_DEFS.iter() {
            match find_setting(text, def) {
                Some(value) => {
                    values.insert(def.id, value);
                }
                None => {
                    log::warn!(
                        "Setting {} missing or invalid, using default {}",
                        def.id,
                        def.default
                    );
                    values.insert(def.id, def.default);
                    defaulted.push(def.id);
                }
            }
        }

        Self { values, defaulted }
    }

    /// Read and parse a settings file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Value of a setting by id, `None` for ids this reader does not know
    pub fn get(&self, id: &str) -> Option<i32> {
        self.values.get(id).copied()
    }

    /// Settings that fell back to their default
    pub fn defaulted(&self) -> &[&'static str] {
        &self.defaulted
    }

    /// True if every setting was read from the file
    pub fn fully_parsed(&self) -> bool {
        self.defaulted.is_empty()
    }

    /// Whether a sensor was enabled for the recording
    pub fn sensor_enabled(&self, sensor: SensorTag) -> bool {
        let id = match sensor {
            SensorTag::LsmAccel => setting_id::LSM_ACCEL_ENABLED,
            SensorTag::LsmGyro => setting_id::LSM_GYRO_ENABLED,
            SensorTag::IisAccel => setting_id::IIS_ACCEL_ENABLED,
            SensorTag::AdxlAccel => setting_id::ADXL_ACCEL_ENABLED,
        };
        self.get(id).unwrap_or(1) != 0
    }

    /// Conversion ranges implied by these settings
    pub fn conversion_config(&self) -> ConversionConfig {
        let range = |id: &str| self.get(id).map(f64::from).unwrap_or_default();
        ConversionConfig::new(
            range(setting_id::LSM_ACCEL_RANGE),
            range(setting_id::LSM_GYRO_RANGE),
            range(setting_id::IIS_ACCEL_RANGE),
            ADXL37X_RANGE_G,
        )
    }
}

/// First allowed value for `def` in `text`
fn find_setting(text: &str, def: &SettingDef) -> Option<i32> {
    text.lines()
        .filter(|line| line.starts_with(def.id))
        .filter_map(|line| line.split_once(SETTING_DELIMITER))
        .map(|(_, value)| parse_leading_int(value))
        .find(|value| def.allowed.is_empty() || def.allowed.contains(value))
}

/// Parse a leading integer the way C `atoi` does: skip whitespace, accept
/// an optional sign, read digits, ignore the rest. No digits gives 0.
fn parse_leading_int(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            (acc * 10 + i64::from(d - b'0')).min(i64::from(i32::MAX) + 1)
        });

    let value = if negative { -magnitude } else { magnitude };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const FACTORY_FILE: &str = "\
LSM6DSx_accel_enabled = 1
LSM6DSx_accel_odr_hz = 6660
LSM6DSx_accel_range_g = 32
LSM6DSx_accel_lpf = 2
LSM6DSx_gyro_enabled = 1
LSM6DSx_gyro_odr_hz = 6660
LSM6DSx_gyro_range_dps = 2000
IIS3DWB_accel_enabled = 1
IIS3DWB_accel_range_g = 16
ADXL37x_accel_enabled = 1
ADXL37x_accel_odr_hz = 5120
recording_length_ms = 5000
";

    #[test]
    fn test_parse_factory_file() {
        let settings = LoggerSettings::parse(FACTORY_FILE);
        assert!(settings.fully_parsed());
        assert_eq!(settings.conversion_config(), ConversionConfig::default());
        for sensor in SensorTag::ALL {
            assert!(settings.sensor_enabled(sensor));
        }
    }

    #[test]
    fn test_parse_custom_ranges() {
        let text = "\
# accelerometer range
LSM6DSx_accel_range_g = 8
LSM6DSx_gyro_range_dps = 250

IIS3DWB_accel_range_g = 2
IIS3DWB_accel_enabled = 0
";
        let settings = LoggerSettings::parse(text);
        let config = settings.conversion_config();
        assert_eq!(config.lsm_accel_range_g, 8.0);
        assert_eq!(config.lsm_gyro_range_dps, 250.0);
        assert_eq!(config.iis_accel_range_g, 2.0);
        assert_eq!(config.adxl_accel_range_g, 400.0);
        assert!(!settings.sensor_enabled(SensorTag::IisAccel));
        assert!(settings.sensor_enabled(SensorTag::LsmAccel));
    }

    #[test]
    fn test_disallowed_value_falls_back() {
        let settings = LoggerSettings::parse("LSM6DSx_accel_range_g = 12\n");
        assert_eq!(settings.get(setting_id::LSM_ACCEL_RANGE), Some(32));
        assert!(settings.defaulted().contains(&setting_id::LSM_ACCEL_RANGE));
        assert!(!settings.fully_parsed());
    }

    #[test]
    fn test_later_allowed_line_wins_over_disallowed() {
        let text = "LSM6DSx_gyro_range_dps = 300\nLSM6DSx_gyro_range_dps = 500\n";
        let settings = LoggerSettings::parse(text);
        assert_eq!(settings.get(setting_id::LSM_GYRO_RANGE), Some(500));
    }

    #[test]
    fn test_first_allowed_line_wins() {
        let text = "IIS3DWB_accel_range_g = 4\nIIS3DWB_accel_range_g = 8\n";
        let settings = LoggerSettings::parse(text);
        assert_eq!(settings.get(setting_id::IIS_ACCEL_RANGE), Some(4));
    }

    #[test]
    fn test_commented_line_ignored() {
        let text = "# LSM6DSx_accel_range_g = 4\nLSM6DSx_accel_range_g=16\n";
        let settings = LoggerSettings::parse(text);
        assert_eq!(settings.get(setting_id::LSM_ACCEL_RANGE), Some(16));
    }

    #[test]
    fn test_missing_delimiter_ignored() {
        let settings = LoggerSettings::parse("LSM6DSx_accel_range_g 4\n");
        assert_eq!(settings.get(setting_id::LSM_ACCEL_RANGE), Some(32));
    }

    #[test]
    fn test_empty_file_all_defaults() {
        let settings = LoggerSettings::parse("");
        assert_eq!(settings.defaulted().len(), SETTING_DEFS.len());
        assert_eq!(settings.conversion_config(), ConversionConfig::default());
    }

    #[test]
    fn test_unknown_id() {
        let settings = LoggerSettings::parse(FACTORY_FILE);
        assert_eq!(settings.get("recording_length_ms"), None);
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int(" 32"), 32);
        assert_eq!(parse_leading_int("2000 # dps"), 2000);
        assert_eq!(parse_leading_int("-7x"), -7);
        assert_eq!(parse_leading_int("+5"), 5);
        assert_eq!(parse_leading_int("abc"), 0);
        assert_eq!(parse_leading_int(""), 0);
        assert_eq!(parse_leading_int("99999999999"), i32::MAX);
        assert_eq!(parse_leading_int("-99999999999"), i32::MIN);
    }

    #[test]
    fn test_load_missing_file() {
        let result = LoggerSettings::load(Path::new("/nonexistent/settings.txt"));
        assert!(matches!(result, Err(SettingsError::Io { .. })));
    }
}
