//! Stages a parameter vector into a running instance's live parameter segment.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use biquad_cascade::{InstanceConfig, LiveParameterWriter, PluginRegistry, Preset};
use clap::Parser;
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Plugin label of the target instance
    #[arg(short, long)]
    plugin: String,

    /// Channel id the instance was configured with
    #[arg(short, long)]
    id: u64,

    /// Segment directory (defaults to the instance config default)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Segment name prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Preset whose controls form the base vector; defaults otherwise
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Control value as symbol=value, repeatable
    #[arg(short, long = "set", value_parser = parse_control)]
    set: Vec<(String, f32)>,

    /// Wait up to this many milliseconds for the instance to consume the update
    #[arg(long)]
    wait_ms: Option<u64>,
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
    let variant = registry
        .find(&args.plugin)
        .ok_or_else(|| anyhow!("unknown plugin {:?}", args.plugin))?;
    let descriptor = variant.descriptor();

    let mut params = descriptor.default_parameters();
    let mut overrides: Vec<(String, f32)> = Vec::new();
    if let Some(path) = &args.preset {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read preset {}", path.display()))?;
        overrides.extend(Preset::from_json(&json)?.controls);
    }
    overrides.extend(args.set.iter().cloned());
    for (symbol, value) in overrides {
        let index = (0..descriptor.parameter_count())
            .find(|&i| descriptor.parameter_port(i).symbol == symbol)
            .ok_or_else(|| anyhow!("{} has no tunable control {symbol:?}", descriptor.label))?;
        params[index] = value;
    }

    let defaults = InstanceConfig::default();
    let dir = args.dir.unwrap_or(defaults.channel_dir);
    let prefix = args.prefix.unwrap_or(defaults.channel_prefix);
    let found = LiveParameterWriter::discover(&dir, &prefix, descriptor.channel_tag, args.id)?;
    let Some(path) = found.first() else {
        bail!(
            "no segment for {} id {} in {}",
            descriptor.channel_tag,
            args.id,
            dir.display()
        );
    };
    if found.len() > 1 {
        warn!("{} segments match, using the newest", found.len());
    }

    let mut writer = LiveParameterWriter::open(path, descriptor.parameter_count())?;
    writer.stage(&params)?;
    info!("staged {:?} into {}", params, path.display());

    if let Some(wait) = args.wait_ms {
        let deadline = Instant::now() + Duration::from_millis(wait);
        while writer.is_pending() {
            if Instant::now() >= deadline {
                bail!("update not consumed within {wait} ms");
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        info!("update consumed");
    }
    Ok(())
}
