use clap::Parser;
use rolling_stats::Stats;
use serde::Serialize;
use std::path::{Path, PathBuf};

use touchtone::audio::{SampleSource, WavFileSource};
use touchtone::config::DecoderConfig;
use touchtone::constants::{COLUMN_FREQUENCIES_HZ, NUM_LINES, ROW_FREQUENCIES_HZ};
use touchtone::DtmfProcessor;

#[derive(Parser, Debug)]
#[command(name = "analyze_wav")]
#[command(about = "Report DTMF detector statistics for WAV files", long_about = None)]
struct Args {
    /// WAV files to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// TOML decoder configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Debug, Clone, Serialize)]
struct StatsSummary {
    count: usize,
    mean: f32,
    std_dev: f32,
    min: f32,
    max: f32,
}

impl StatsSummary {
    fn from_stats(stats: &Stats<f32>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct LineAnalysis {
    frequency_hz: f64,
    energy: Option<StatsSummary>,
}

#[derive(Debug, Clone, Serialize)]
struct FileAnalysis {
    filename: String,
    sample_rate: u32,
    samples: u64,
    windows: u64,
    silent_windows: u64,
    keys: String,
    mean_energy: Option<StatsSummary>,
    lines: Vec<LineAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
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

    let config = match &args.config {
        Some(path) => DecoderConfig::from_toml_file(path)?,
        None => DecoderConfig::default(),
    };

    let results: Vec<FileAnalysis> = args
        .files
        .iter()
        .map(|path| analyze_file(path, &config))
        .collect();

    match args.format {
        OutputFormat::Text => print_text(&results),
        OutputFormat::Csv => print_csv(&results),
        OutputFormat::Json => print_json(&results)?,
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn analyze_file(path: &Path, config: &DecoderConfig) -> FileAnalysis {
    match analyze_file_impl(path, config) {
        Ok(analysis) => analysis,
        Err(e) => FileAnalysis {
            filename: display_name(path),
            sample_rate: 0,
            samples: 0,
            windows: 0,
            silent_windows: 0,
            keys: String::new(),
            mean_energy: None,
            lines: Vec::new(),
            error: Some(e.to_string()),
        },
    }
}

fn analyze_file_impl(path: &Path, config: &DecoderConfig) -> anyhow::Result<FileAnalysis> {
    let mut source = WavFileSource::new(path, 4096)?;
    let sample_rate = source.sample_rate();
    let mut processor = DtmfProcessor::new(config, sample_rate, source.bits_per_sample())?;
    let power_threshold = processor.params().power_threshold;

    let mut line_stats: [Stats<f32>; NUM_LINES] = std::array::from_fn(|_| Stats::new());
    let mut mean_stats: Stats<f32> = Stats::new();
    let mut silent_windows = 0;
    let mut keys = String::new();

    while let Some(buffer) = source.next_buffer()? {
        for report in processor.process_windows(&buffer)? {
            mean_stats.update(report.mean as f32);
            if report.mean < power_threshold {
                silent_windows += 1;
                continue;
            }
            for (stats, &energy) in line_stats.iter_mut().zip(report.energies.as_array()) {
                stats.update(energy as f32);
            }
            if let Some(key) = report.key {
                keys.push(key.as_char());
            }
        }
    }

    let summary = processor.finish();

    let lines = ROW_FREQUENCIES_HZ
        .iter()
        .chain(COLUMN_FREQUENCIES_HZ.iter())
        .zip(line_stats.iter())
        .map(|(&frequency_hz, stats)| LineAnalysis {
            frequency_hz,
            energy: StatsSummary::from_stats(stats),
        })
        .collect();

    Ok(FileAnalysis {
        filename: display_name(path),
        sample_rate,
        samples: summary.samples,
        windows: summary.windows,
        silent_windows,
        keys,
        mean_energy: StatsSummary::from_stats(&mean_stats),
        lines,
        error: None,
    })
}

fn print_text(results: &[FileAnalysis]) {
    println!(
        "{:<40} {:>8} {:>10} {:>8} {:>8}  {}",
        "File", "Rate", "Samples", "Windows", "Silent", "Keys"
    );
    println!("{}", "-".repeat(96));

    for result in results {
        if let Some(ref err) = result.error {
            println!("{:<40} ERROR: {}", result.filename, err);
            continue;
        }
        println!(
            "{:<40} {:>8} {:>10} {:>8} {:>8}  {}",
            result.filename,
            result.sample_rate,
            result.samples,
            result.windows,
            result.silent_windows,
            result.keys
        );
    }

    for result in results {
        if result.error.is_some() {
            continue;
        }

        eprintln!();
        eprintln!("Line energy for {} (non-silent windows):", result.filename);
        if let Some(ref mean) = result.mean_energy {
            eprintln!(
                "  Window mean: {:.4} ± {:.4} (max {:.4})",
                mean.mean, mean.std_dev, mean.max
            );
        }
        for line in &result.lines {
            match line.energy {
                Some(ref e) => eprintln!(
                    "  {:>6.0} Hz: {:.4} ± {:.4} (max {:.4})",
                    line.frequency_hz, e.mean, e.std_dev, e.max
                ),
                None => eprintln!("  {:>6.0} Hz: -", line.frequency_hz),
            }
        }
    }
}

fn print_csv(results: &[FileAnalysis]) {
    let line_headers: Vec<String> = ROW_FREQUENCIES_HZ
        .iter()
        .chain(COLUMN_FREQUENCIES_HZ.iter())
        .map(|f| format!("energy_{:.0}", f))
        .collect();
    println!(
        "filename,sample_rate,samples,windows,silent_windows,keys,{},error",
        line_headers.join(",")
    );

    for result in results {
        let energies: Vec<String> = if result.lines.is_empty() {
            vec![String::new(); NUM_LINES]
        } else {
            result
                .lines
                .iter()
                .map(|l| {
                    l.energy
                        .as_ref()
                        .map(|s| format!("{:.6}", s.mean))
                        .unwrap_or_default()
                })
                .collect()
        };
        let error = result.error.as_deref().unwrap_or("");

        println!(
            "{},{},{},{},{},{},{},{}",
            result.filename,
            result.sample_rate,
            result.samples,
            result.windows,
            result.silent_windows,
            result.keys,
            energies.join(","),
            error
        );
    }
}

fn print_json(results: &[FileAnalysis]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    println!("{}", json);
    Ok(())
}
