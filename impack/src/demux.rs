//! Demultiplexing of an interleaved IMpack log into per-sensor streams
//!
//! The logger writes records from all four sensors into one file in the
//! order they were read. [`demux`] splits that stream by tag and converts
//! each record to physical units. Records with a tag the logger never
//! produces are counted and dropped rather than treated as errors.

use std::path::Path;

use thiserror::Error;

use crate::config::ConversionConfig;
use crate::packet::RawPacket;
use crate::sample::Sample;
use crate::sensor::SensorTag;

/// Errors that abort a decode pass
#[derive(Debug, Error)]
pub enum DemuxError {
    #[error("Log length {len} is not a multiple of the {record_size}-byte record size")]
    Format { len: usize, record_size: usize },

    #[error("Invalid full-scale range {range} for {sensor}, must be positive and finite")]
    Config { sensor: SensorTag, range: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Converted samples for each sensor, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorStreams {
    pub lsm_accel: Vec<Sample>,
    pub lsm_gyro: Vec<Sample>,
    pub iis_accel: Vec<Sample>,
    pub adxl_accel: Vec<Sample>,
    /// Records dropped because their tag was not recognized
    pub unknown_records: usize,
}

impl SensorStreams {
    /// Samples for one sensor
    pub fn get(&self, sensor: SensorTag) -> &[Sample] {
        match sensor {
            SensorTag::LsmAccel => &self.lsm_accel,
            SensorTag::LsmGyro => &self.lsm_gyro,
            SensorTag::IisAccel => &self.iis_accel,
            SensorTag::AdxlAccel => &self.adxl_accel,
        }
    }

    fn get_mut(&mut self, sensor: SensorTag) -> &mut Vec<Sample> {
        match sensor {
            SensorTag::LsmAccel => &mut self.lsm_accel,
            SensorTag::LsmGyro => &mut self.lsm_gyro,
            SensorTag::IisAccel => &mut self.iis_accel,
            SensorTag::AdxlAccel => &mut self.adxl_accel,
        }
    }

    /// Iterate over `(sensor, samples)` in [`SensorTag::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (SensorTag, &[Sample])> {
        SensorTag::ALL.into_iter().map(move |tag| (tag, self.get(tag)))
    }

    /// Number of recognized records
    pub fn total_samples(&self) -> usize {
        SensorTag::ALL.iter().map(|tag| self.get(*tag).len()).sum()
    }

    /// Number of records in the log, recognized or not
    pub fn total_records(&self) -> usize {
        self.total_samples() + self.unknown_records
    }

    /// Split into the four sequences (LSM accel, LSM gyro, IIS accel, ADXL accel)
    pub fn into_parts(self) -> (Vec<Sample>, Vec<Sample>, Vec<Sample>, Vec<Sample>) {
        (self.lsm_accel, self.lsm_gyro, self.iis_accel, self.adxl_accel)
    }
}

/// Incremental demultiplexer shared by the buffer and stream entry points
///
/// Ranges are validated the first time a sensor is seen, so a bad range for
/// a sensor absent from the log never raises an error.
#[derive(Debug)]
pub struct Demuxer<'a> {
    config: &'a ConversionConfig,
    ranges: [Option<f64>; 4],
    streams: SensorStreams,
    first_unknown_tag: Option<u16>,
}

impl<'a> Demuxer<'a> {
    pub fn new(config: &'a ConversionConfig) -> Self {
        Self {
            config,
            ranges: [None; 4],
            streams: SensorStreams::default(),
            first_unknown_tag: None,
        }
    }

    /// Convert one record and append it to its sensor's stream
    pub fn push(&mut self, packet: &RawPacket) -> Result<(), DemuxError> {
        let Some(sensor) = packet.sensor() else {
            self.streams.unknown_records += 1;
            self.first_unknown_tag.get_or_insert(packet.tag_raw());
            return Ok(());
        };

        let range = self.range_for(sensor)?;
        self.streams
            .get_mut(sensor)
            .push(packet.to_sample(sensor, range));
        Ok(())
    }

    fn range_for(&mut self, sensor: SensorTag) -> Result<f64, DemuxError> {
        let slot = &mut self.ranges[sensor.index()];
        if let Some(range) = *slot {
            return Ok(range);
        }
        let range = self.config.validate_for(sensor)?;
        *slot = Some(range);
        Ok(range)
    }

    /// Finish the pass and hand back the streams
    pub fn finish(self) -> SensorStreams {
        let streams = self.streams;

        if let Some(tag) = self.first_unknown_tag {
            log::warn!(
                "Dropped {} records with unrecognized tags (first: 0x{:04X})",
                streams.unknown_records,
                tag
            );
        }
        log::debug!(
            "Demuxed {} records: {} LSM accel, {} LSM gyro, {} IIS accel, {} ADXL accel",
            streams.total_records(),
            streams.lsm_accel.len(),
            streams.lsm_gyro.len(),
            streams.iis_accel.len(),
            streams.adxl_accel.len(),
        );

        streams
    }
}

/// View a log buffer as a slice of records.
///
/// Fails if the buffer length is not a whole number of records; a trailing
/// partial record means the framing cannot be trusted.
pub fn split_records(buffer: &[u8]) -> Result<&[RawPacket], DemuxError> {
    let format_error = || DemuxError::Format {
        len: buffer.len(),
        record_size: RawPacket::PACKET_SIZE,
    };

    if buffer.len() % RawPacket::PACKET_SIZE != 0 {
        return Err(format_error());
    }
    bytemuck::try_cast_slice(buffer).map_err(|_| format_error())
}

/// Split an in-memory log into per-sensor streams in physical units.
///
/// # Arguments
///
/// * `buffer` - Complete contents of a log file
/// * `config` - Full-scale range of each sensor
///
/// # Returns
///
/// The four converted streams, or an error if the buffer is not a whole
/// number of records or a sensor present in the log has an invalid range.
/// No partial result is returned on error.
pub fn demux(buffer: &[u8], config: &ConversionConfig) -> Result<SensorStreams, DemuxError> {
    let records = split_records(buffer)?;

    let mut demuxer = Demuxer::new(config);
    for record in records {
        demuxer.push(record)?;
    }
    Ok(demuxer.finish())
}

/// Read a log file into memory and demux it
pub fn demux_file(path: &Path, config: &ConversionConfig) -> Result<SensorStreams, DemuxError> {
    let buffer = std::fs::read(path)?;
    log::debug!("Read {} bytes from {}", buffer.len(), path.display());
    demux(&buffer, config)
}
