//! IMpack multi-sensor log decoding
//!
//! The IMpack logger records four inertial sensors into a single binary
//! file of fixed 12-byte records, interleaved in the order the samples were
//! read. This crate splits such a file back into one stream per sensor and
//! converts the raw counts to seconds, g, and degrees per second.
//!
//! # Example
//!
//! ```no_run
//! use impack::{demux_file, ConversionConfig, SensorTag};
//! use std::path::Path;
//!
//! let config = ConversionConfig::default().with_range(SensorTag::LsmAccel, 16.0);
//! let streams = demux_file(Path::new("DATA0.DAT"), &config).unwrap();
//! for sample in &streams.lsm_accel {
//!     println!("{:.6} {:.3} {:.3} {:.3}", sample.time_s, sample.x, sample.y, sample.z);
//! }
//! ```

pub mod config;
pub mod demux;
pub mod export;
mod packet;
mod reader;
mod sample;
pub mod sensor;
pub mod settings;
pub mod summary;
mod time;

pub use config::ConversionConfig;
pub use demux::{demux, demux_file, split_records, DemuxError, Demuxer, SensorStreams};
pub use export::{csv_file_name, export_csv_dir, write_csv, ExportError};
pub use packet::RawPacket;
pub use reader::{demux_reader, PacketReader};
pub use sample::Sample;
pub use sensor::{tag_id, AxisByteOrder, Conversion, SensorTag};
pub use settings::{LoggerSettings, SettingsError};
pub use summary::{RecordingSummary, SensorSummary};
pub use time::LoggerTime;
