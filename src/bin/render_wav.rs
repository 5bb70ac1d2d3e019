//! Offline host: runs a WAV file through one filter instance per channel.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use biquad_cascade::{
    FilterInstance, InstanceConfig, PluginLifecycle, PluginRegistry, Preset,
};
use clap::Parser;
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input WAV file
    input: PathBuf,

    /// Output WAV file (32-bit float)
    output: PathBuf,

    /// Plugin label, e.g. lr4_lowpass. Overrides the preset's plugin.
    #[arg(short, long)]
    plugin: Option<String>,

    /// JSON preset with plugin label, control values and instance config
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Control override as symbol=value, repeatable
    #[arg(short, long = "set", value_parser = parse_control)]
    set: Vec<(String, f32)>,

    /// Samples per run() call
    #[arg(short, long, default_value_t = 512)]
    block_size: usize,
}

fn parse_control(arg: &str) -> std::result::Result<(String, f32), String> {
    let (symbol, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected symbol=value, got {arg:?}"))?;
    let value = value
        .trim()
        .parse()
        .map_err(|e| format!("bad value for {symbol}: {e}"))?;
    Ok((symbol.trim().to_string(), value))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let registry = PluginRegistry::new();

    let preset = match &args.preset {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read preset {}", path.display()))?;
            Preset::from_json(&json)?
        }
        None => Preset::default(),
    };
    let label = args
        .plugin
        .clone()
        .or_else(|| Some(preset.plugin.clone()).filter(|p| !p.is_empty()))
        .ok_or_else(|| {
            let labels: Vec<_> = registry.descriptors().map(|d| d.label).collect();
            anyhow!("no plugin given; use --plugin or a preset ({})", labels.join(", "))
        })?;
    if args.block_size == 0 {
        bail!("block size must be positive");
    }

    let mut controls = preset.controls.clone();
    controls.extend(args.set.iter().cloned());

    render(&registry, &label, controls, preset.config, &args)
}

fn render(
    registry: &PluginRegistry,
    label: &str,
    mut controls: HashMap<String, f32>,
    config: InstanceConfig,
    args: &Args,
) -> Result<()> {
    let mut reader = hound::WavReader::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let spec = reader.spec();
    let sample_rate = spec.sample_rate as f32;
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match (spec.bits_per_sample, spec.sample_format) {
        (32, hound::SampleFormat::Float) => reader.samples::<f32>().collect::<Result<_, _>>()?,
        (16, hound::SampleFormat::Int) => reader
            .samples::<i16>()
            .map(|s| s.map(|s| s as f32 / i16::MAX as f32))
            .collect::<Result<_, _>>()?,
        (24, hound::SampleFormat::Int) => reader
            .samples::<i32>()
            .map(|s| s.map(|s| s as f32 / 8_388_607.0))
            .collect::<Result<_, _>>()?,
        (32, hound::SampleFormat::Int) => reader
            .samples::<i32>()
            .map(|s| s.map(|s| s as f32 / i32::MAX as f32))
            .collect::<Result<_, _>>()?,
        (bits, format) => bail!("unsupported WAV format: {bits} bits {format:?}"),
    };

    let variant = registry
        .find(label)
        .ok_or_else(|| anyhow!("unknown plugin {label:?}"))?;
    let descriptor = variant.descriptor();
    for (symbol, value) in controls.iter_mut() {
        let Some(hint) = descriptor
            .find_port(symbol)
            .and_then(|port| descriptor.ports[port].hint)
        else {
            continue;
        };
        let clamped = hint.clamp(*value, sample_rate);
        if clamped != *value {
            warn!("{symbol}={value} is outside the control range, using {clamped}");
            *value = clamped;
        }
    }

    let mut instances: Vec<FilterInstance> = Vec::with_capacity(channels);
    for _ in 0..channels {
        let mut instance = registry.instantiate(label, sample_rate, config.clone())?;
        instance.bind_controls(&controls)?;
        instance.activate();
        instances.push(instance);
    }

    let frames = samples.len() / channels.max(1);
    info!(
        "rendering {} frames x {} channels through {} at {} Hz",
        frames, channels, descriptor.label, spec.sample_rate
    );

    let mut rendered = vec![0.0f32; samples.len()];
    let mut input = vec![0.0f32; args.block_size];
    let mut output = vec![0.0f32; args.block_size];
    for (ch, instance) in instances.iter_mut().enumerate() {
        for start in (0..frames).step_by(args.block_size) {
            let len = args.block_size.min(frames - start);
            for (i, x) in input[..len].iter_mut().enumerate() {
                *x = samples[(start + i) * channels + ch];
            }
            instance.run(&input[..len], &mut output[..len]);
            for (i, y) in output[..len].iter().enumerate() {
                rendered[(start + i) * channels + ch] = *y;
            }
        }
    }

    let out_spec = hound::WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&args.output, out_spec)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    for sample in rendered {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    for instance in instances {
        instance.cleanup();
    }
    info!("wrote {}", args.output.display());
    Ok(())
}
