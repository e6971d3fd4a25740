//! Per-sensor recording statistics

use std::path::Path;

use serde::Serialize;

use crate::demux::SensorStreams;
use crate::sample::Sample;
use crate::sensor::SensorTag;
use crate::time::SECONDS_PER_TICK;

/// Statistics for one sensor's stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSummary {
    pub sensor: SensorTag,
    pub name: &'static str,
    pub unit: &'static str,
    pub samples: usize,
    /// Time of the first sample in seconds
    pub first_time_s: Option<f64>,
    /// Time of the last sample in seconds
    pub last_time_s: Option<f64>,
    /// Elapsed time across the stream, counting through counter wraps
    pub span_s: f64,
    /// Average sample rate over the span
    pub mean_rate_hz: Option<f64>,
    /// Number of times the timestamp went backwards
    pub timestamp_wraps: usize,
    /// Largest absolute value seen on each axis
    pub peak_abs: [f64; 3],
    /// Largest vector magnitude across the three axes
    pub peak_magnitude: f64,
}

impl SensorSummary {
    pub fn from_samples(sensor: SensorTag, samples: &[Sample]) -> Self {
        let mut span_us: u64 = 0;
        let mut timestamp_wraps = 0;
        for pair in samples.windows(2) {
            let (prev, next) = (pair[0].timestamp_us, pair[1].timestamp_us);
            if next < prev {
                timestamp_wraps += 1;
            }
            span_us += u64::from(next.wrapping_sub(prev));
        }

        if timestamp_wraps > 0 {
            log::warn!(
                "{}: timestamp went backwards {} times, assuming counter wrap",
                sensor.name(),
                timestamp_wraps
            );
        }

        let peak_abs = samples.iter().fold([0.0f64; 3], |peak, s| {
            let axes = s.axes();
            [
                peak[0].max(axes[0].abs()),
                peak[1].max(axes[1].abs()),
                peak[2].max(axes[2].abs()),
            ]
        });

        let peak_magnitude = samples
            .iter()
            .map(Sample::magnitude)
            .fold(0.0f64, f64::max);

        let span_s = span_us as f64 * SECONDS_PER_TICK;
        let mean_rate_hz = (span_s > 0.0).then(|| (samples.len() - 1) as f64 / span_s);

        Self {
            sensor,
            name: sensor.name(),
            unit: sensor.unit(),
            samples: samples.len(),
            first_time_s: samples.first().map(|s| s.time_s),
            last_time_s: samples.last().map(|s| s.time_s),
            span_s,
            mean_rate_hz,
            timestamp_wraps,
            peak_abs,
            peak_magnitude,
        }
    }
}

/// Statistics for a whole recording
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordingSummary {
    pub total_records: usize,
    pub unknown_records: usize,
    pub sensors: Vec<SensorSummary>,
}

impl RecordingSummary {
    pub fn from_streams(streams: &SensorStreams) -> Self {
        Self {
            total_records: streams.total_records(),
            unknown_records: streams.unknown_records,
            sensors: streams
                .iter()
                .map(|(sensor, samples)| SensorSummary::from_samples(sensor, samples))
                .collect(),
        }
    }

    /// Summary for one sensor
    pub fn sensor(&self, sensor: SensorTag) -> Option<&SensorSummary> {
        self.sensors.iter().find(|s| s.sensor == sensor)
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}
