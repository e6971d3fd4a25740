//! Decode an IMpack log file into per-sensor streams.
//!
//! Prints a summary of each sensor's stream and optionally writes the
//! converted data as CSV files and the summary as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use impack::{
    demux_file, export_csv_dir, ConversionConfig, LoggerSettings, RecordingSummary, SensorTag,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Split an IMpack log into per-sensor streams in physical units"
)]
struct Args {
    /// Binary log file written by the logger (e.g. DATA0.DAT)
    input: PathBuf,

    /// Logger settings file to take the sensor ranges from
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// LSM6DSx accelerometer full-scale range in g
    #[arg(long)]
    lsm_accel_range: Option<f64>,

    /// LSM6DSx gyroscope full-scale range in deg/s
    #[arg(long)]
    lsm_gyro_range: Option<f64>,

    /// IIS3DWB accelerometer full-scale range in g
    #[arg(long)]
    iis_range: Option<f64>,

    /// ADXL37x accelerometer full-scale range in g
    #[arg(long)]
    adxl_range: Option<f64>,

    /// Directory to write per-sensor CSV files into
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Recording number used in CSV file names
    #[arg(short, long, default_value_t = 0)]
    recording: u16,

    /// Write the recording summary as JSON to this path
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

impl Args {
    /// Ranges from the settings file (or factory defaults), then any
    /// command line overrides
    fn conversion_config(&self) -> Result<ConversionConfig> {
        let config = match &self.settings {
            Some(path) => {
                let settings = LoggerSettings::load(path)?;
                if !settings.fully_parsed() {
                    log::warn!(
                        "{} settings defaulted: {}",
                        settings.defaulted().len(),
                        settings.defaulted().join(", ")
                    );
                }
                for sensor in SensorTag::ALL {
                    if !settings.sensor_enabled(sensor) {
                        log::info!("{} was disabled for this recording", sensor.name());
                    }
                }
                settings.conversion_config()
            }
            None => ConversionConfig::default(),
        };

        Ok(config.with_overrides([
            self.lsm_accel_range,
            self.lsm_gyro_range,
            self.iis_range,
            self.adxl_range,
        ]))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = args.conversion_config()?;
    println!(
        "Ranges: LSM accel {} g, LSM gyro {} dps, IIS accel {} g, ADXL accel {} g",
        config.lsm_accel_range_g,
        config.lsm_gyro_range_dps,
        config.iis_accel_range_g,
        config.adxl_accel_range_g
    );

    let streams = demux_file(&args.input, &config)
        .with_context(|| format!("Failed to decode {}", args.input.display()))?;
    let summary = RecordingSummary::from_streams(&streams);

    println!(
        "Parsed {} records from {} ({} unrecognized)",
        summary.total_records,
        args.input.display(),
        summary.unknown_records
    );
    println!(
        "{:<24} {:>9} {:>10} {:>10} {:>10} {:>6} {:>10}  peak |x|,|y|,|z|",
        "sensor", "samples", "start (s)", "span (s)", "rate (Hz)", "wraps", "peak |v|"
    );
    for s in &summary.sensors {
        println!(
            "{:<24} {:>9} {:>10.4} {:>10.4} {:>10.1} {:>6} {:>10.3}  {:.3}, {:.3}, {:.3} {}",
            s.name,
            s.samples,
            s.first_time_s.unwrap_or(0.0),
            s.span_s,
            s.mean_rate_hz.unwrap_or(0.0),
            s.timestamp_wraps,
            s.peak_magnitude,
            s.peak_abs[0],
            s.peak_abs[1],
            s.peak_abs[2],
            s.unit
        );
    }

    if let Some(dir) = &args.csv_dir {
        let written = export_csv_dir(dir, args.recording, &streams)?;
        println!("Wrote {} CSV files to {}", written.len(), dir.display());
    }

    if let Some(path) = &args.summary_json {
        summary
            .save_to_file(path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
