//! CSV export of demuxed streams
//!
//! Follows the layout and naming of the per-sensor files the logger writes
//! when on-device data formatting is enabled: one file per sensor, named
//! after the recording number, with the raw microsecond timestamp in the
//! first column. Values come from the f64 conversion here, so the last
//! decimal can differ from the logger's own output.

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::demux::SensorStreams;
use crate::sample::Sample;
use crate::sensor::SensorTag;

/// Errors writing CSV output
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// CSV file name for a sensor and recording number, e.g. `LSM_ac3.csv`
pub fn csv_file_name(sensor: SensorTag, recording: u16) -> String {
    let prefix = match sensor {
        SensorTag::LsmAccel => "LSM_ac",
        SensorTag::LsmGyro => "LSM_gy",
        SensorTag::IisAccel => "IIS_ac",
        SensorTag::AdxlAccel => "ADX_ac",
    };
    format!("{prefix}{recording}.csv")
}

/// Column headers for a sensor's CSV file
pub fn csv_header(sensor: SensorTag) -> [&'static str; 4] {
    if sensor.is_gyro() {
        ["Time (us)", "Rate_x (dps)", "Rate_y (dps)", "Rate_z (dps)"]
    } else {
        ["Time (us)", "Accel_x (g)", "Accel_y (g)", "Accel_z (g)"]
    }
}

/// Write one sensor's samples as CSV to any writer
pub fn write_csv<W: Write>(
    writer: W,
    sensor: SensorTag,
    samples: &[Sample],
) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(csv_header(sensor))?;

    for sample in samples {
        out.write_record([
            sample.timestamp_us.to_string(),
            format!("{:.6}", sample.x),
            format!("{:.6}", sample.y),
            format!("{:.6}", sample.z),
        ])?;
    }

    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write a CSV file for every sensor with at least one sample.
///
/// Creates `dir` if needed. Returns the paths written, in
/// [`SensorTag::ALL`] order.
pub fn export_csv_dir(
    dir: &Path,
    recording: u16,
    streams: &SensorStreams,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    for (sensor, samples) in streams.iter() {
        if samples.is_empty() {
            continue;
        }

        let path = dir.join(csv_file_name(sensor, recording));
        let file = std::fs::File::create(&path).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        write_csv(std::io::BufWriter::new(file), sensor, samples)?;

        log::info!(
            "Wrote {} {} samples to {}",
            samples.len(),
            sensor.name(),
            path.display()
        );
        written.push(path);
    }

    Ok(written)
}
