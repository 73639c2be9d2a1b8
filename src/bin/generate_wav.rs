use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use touchtone::dtmf::parse_keys;
use touchtone::save_wav;
use touchtone::simulation::{NoiseConfig, SequenceConfig, apply_noise, generate_key_sequence};

#[derive(Parser, Debug)]
#[command(name = "generate_wav")]
#[command(about = "Generate synthetic DTMF WAV files for decoder testing")]
struct Args {
    /// Keys to dial, e.g. "0123456789*#ABCD"
    keys: String,

    /// Output WAV file
    #[arg(short, long, default_value = "dtmf.wav")]
    output: PathBuf,

    /// TOML file with [sequence] and [noise] sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 8000)]
    sample_rate: u32,

    /// Tone-on time per key in seconds (CLI override)
    #[arg(long)]
    tone: Option<f32>,

    /// Silence between keys in seconds (CLI override)
    #[arg(long)]
    gap: Option<f32>,

    /// Per-tone amplitude, 0-0.5 (CLI override)
    #[arg(long)]
    amplitude: Option<f32>,

    /// AWGN SNR in dB (CLI override)
    #[arg(long)]
    snr: Option<f32>,

    /// Seed for reproducible noise
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TomlConfig {
    sequence: Option<SequenceConfig>,
    noise: Option<NoiseConfig>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let file_config: TomlConfig = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => TomlConfig::default(),
    };

    let mut sequence = file_config.sequence.unwrap_or_default();
    if let Some(tone) = args.tone {
        sequence.tone_secs = tone;
    }
    if let Some(gap) = args.gap {
        sequence.gap_secs = gap;
    }
    if let Some(amplitude) = args.amplitude {
        sequence.amplitude = amplitude;
    }
    if !(0.0..=0.5).contains(&sequence.amplitude) {
        bail!("amplitude must be within 0-0.5, got {}", sequence.amplitude);
    }

    let mut noise = file_config.noise.unwrap_or_default();
    if let Some(snr) = args.snr {
        noise.snr_db = Some(snr);
    }
    if let Some(seed) = args.seed {
        noise.seed = Some(seed);
    }

    let keys = parse_keys(&args.keys).map_err(anyhow::Error::msg)?;
    if keys.is_empty() {
        bail!("no keys given");
    }

    let mut samples = generate_key_sequence(&keys, &sequence, args.sample_rate);
    apply_noise(&mut samples, &noise);

    save_wav(&args.output, &samples, args.sample_rate)
        .with_context(|| format!("writing {}", args.output.display()))?;

    eprintln!(
        "Wrote {} keys ({} samples at {} Hz) to {}",
        keys.len(),
        samples.len(),
        args.sample_rate,
        args.output.display()
    );

    Ok(())
}
