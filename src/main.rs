use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use touchtone::audio::{SampleSource, WavFileSource};
use touchtone::config::{DecoderConfig, DurationMs};
use touchtone::output::{Formatter, OutputFormat, create_formatter};
use touchtone::decode_source;

#[derive(Parser, Debug)]
#[command(name = "touchtone")]
#[command(about = "Decode DTMF (touch-tone) key-presses from WAV files", long_about = None)]
struct Args {
    /// WAV files to decode
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// TOML decoder configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Minimum key-press duration (e.g. "24", "24ms", "0.024s")
    #[arg(long)]
    min_duration: Option<DurationMs>,

    /// Averaging window (must divide the minimum duration)
    #[arg(long)]
    window: Option<DurationMs>,

    /// Silence floor on mean window energy
    #[arg(long)]
    power_threshold: Option<f64>,

    /// Allowed frequency deviation as a fraction (0.035 = 3.5%)
    #[arg(long)]
    tolerance: Option<f64>,

    /// Filter length as a multiple of the averaging window
    #[arg(long)]
    filter_scale: Option<usize>,

    /// Samples read from the file per chunk
    #[arg(long, default_value_t = 4096)]
    chunk_size: usize,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn build_config(args: &Args) -> anyhow::Result<DecoderConfig> {
    let mut config = match &args.config {
        Some(path) => DecoderConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DecoderConfig::default(),
    };

    if let Some(d) = args.min_duration {
        config.min_tone_duration_ms = d.as_ms();
    }
    if let Some(d) = args.window {
        config.accumulator_duration_ms = d.as_ms();
    }
    if let Some(p) = args.power_threshold {
        config.power_threshold = p;
    }
    if let Some(t) = args.tolerance {
        config.amplitude_tolerance = t;
    }
    if let Some(s) = args.filter_scale {
        config.filter_length_scale = s;
    }

    // Catch a bad duration ratio before opening any file
    config.duration_threshold()?;

    Ok(config)
}

fn decode_file(
    path: &Path,
    config: &DecoderConfig,
    formatter: &dyn Formatter,
    chunk_size: usize,
    multiple: bool,
) -> anyhow::Result<usize> {
    let mut source =
        WavFileSource::new(path, chunk_size).with_context(|| format!("opening {}", path.display()))?;

    log::info!(
        "Decoding {} ({} Hz, {}-bit)",
        path.display(),
        source.sample_rate(),
        source.bits_per_sample()
    );

    if multiple && formatter.inline() {
        print!("{}: ", path.display());
    }

    let mut stdout = std::io::stdout();
    let summary = decode_source(&mut source, config, |detection| {
        let record = formatter.format(detection);
        if formatter.inline() {
            print!("{}", record);
            let _ = stdout.flush();
        } else {
            println!("{}", record);
        }
    })
    .with_context(|| format!("decoding {}", path.display()))?;

    log::debug!(
        "{}: {} samples, {} windows, {} detections, {} trailing samples discarded",
        path.display(),
        summary.samples,
        summary.windows,
        summary.detections,
        summary.discarded_samples
    );

    if formatter.inline() {
        if summary.detections == 0 {
            print!("No tones detected.");
        }
        println!();
    }

    Ok(summary.detections)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = build_config(&args)?;
    let formatter = create_formatter(args.format, args.verbose > 0);

    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    let multiple = args.files.len() > 1;
    let mut total = 0;
    for path in &args.files {
        total += decode_file(path, &config, formatter.as_ref(), args.chunk_size, multiple)?;
    }

    if !formatter.inline() && total == 0 {
        eprintln!("No tones detected.");
    }

    Ok(())
}
