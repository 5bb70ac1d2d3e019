use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use atomic_float::AtomicF32;

use super::*;
use crate::config::InstanceConfig;
use crate::error::FilterError;
use crate::live_params::LiveParameterWriter;
use crate::traits::PluginLifecycle;

const SAMPLE_RATE: f32 = 48_000.0;

fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "biquad_cascade_plugins_{test}_{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn config_in(dir: &Path, lazy: bool) -> InstanceConfig {
    InstanceConfig {
        channel_dir: dir.to_path_buf(),
        lazy_channel_setup: lazy,
        ..InstanceConfig::default()
    }
}

fn controls(pairs: &[(&str, f32)]) -> HashMap<String, f32> {
    pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
}

fn cell_for(
    cells: &[Option<Arc<AtomicF32>>],
    descriptor: &PluginDescriptor,
    symbol: &str,
) -> Arc<AtomicF32> {
    let port = descriptor.find_port(symbol).unwrap();
    Arc::clone(cells[port].as_ref().unwrap())
}

#[test]
fn port_tables_match_topologies() {
    for variant in PluginVariant::ALL {
        let d = variant.descriptor();
        assert_eq!(d.port_count(), d.channel_port() + 1, "{}", d.label);
        assert_eq!(d.ports[0].kind, PortKind::AudioInput);
        assert_eq!(d.ports[1].kind, PortKind::AudioOutput);
        assert_eq!(d.port_role(d.channel_port()), Some(PortRole::ChannelName));
        assert_eq!(d.port_role(2), Some(PortRole::Parameter(0)));
        assert_eq!(d.port_role(d.port_count()), None);
        assert_eq!(d.parameter_port(d.topology.output_gain).symbol, "gain");
        for port in &d.ports[2..] {
            assert_eq!(port.kind, PortKind::Control);
            assert!(port.hint.is_some());
        }
    }
    assert_eq!(PARAMETRIC_EQ_DESCRIPTOR.parameter_count(), 16);
    assert_eq!(LR4_LOWPASS_DESCRIPTOR.parameter_count(), 2);
}

#[test]
fn frequency_hints_scale_with_sample_rate() {
    let cutoff = LR4_LOWPASS_DESCRIPTOR.parameter_port(0).hint.unwrap();
    assert_eq!(cutoff.bounds(SAMPLE_RATE), (0.0, 24_000.0));
    assert_eq!(cutoff.clamp(30_000.0, SAMPLE_RATE), 24_000.0);
    let gain = LR4_LOWPASS_DESCRIPTOR.parameter_port(1).hint.unwrap();
    assert_eq!(gain.clamp(-20.0, SAMPLE_RATE), -12.0);
    assert_eq!(
        PARAMETRIC_EQ_DESCRIPTOR.default_parameters()[..3],
        [440.0, 0.0, 1.0]
    );
}

#[test]
fn registry_looks_up_by_label_and_index() {
    let registry = PluginRegistry::new();
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.find("lr4_highpass"), Some(PluginVariant::Lr4Highpass));
    assert_eq!(registry.find("nope"), None);
    assert_eq!(registry.descriptor(0).unwrap().unique_id, 5541);
    assert!(registry.descriptor(3).is_none());
    let ids: Vec<u32> = registry.descriptors().map(|d| d.unique_id).collect();
    assert_eq!(ids, vec![5541, 5542, 5543]);
    assert!(matches!(
        registry.instantiate("nope", SAMPLE_RATE, InstanceConfig::default()),
        Err(FilterError::UnknownPlugin(_))
    ));
    assert!(matches!(
        registry.instantiate("lr4_lowpass", 0.0, InstanceConfig::default()),
        Err(FilterError::InvalidSampleRate(_))
    ));
}

#[test]
fn connect_port_rejects_audio_and_unknown_ports() {
    let mut instance =
        FilterInstance::instantiate(PluginVariant::Lr4Lowpass, SAMPLE_RATE, InstanceConfig::default())
            .unwrap();
    let cell = Arc::new(AtomicF32::new(0.0));
    assert!(matches!(
        instance.connect_port(1, Arc::clone(&cell)),
        Err(FilterError::NotAControlPort(1))
    ));
    assert!(matches!(
        instance.connect_port(5, Arc::clone(&cell)),
        Err(FilterError::UnknownPort {
            port: 5,
            port_count: 5
        })
    ));
    assert!(instance.connect_port(4, cell).is_ok());
}

#[test]
fn bind_controls_rejects_unknown_symbols() {
    let mut instance =
        FilterInstance::instantiate(PluginVariant::ParametricEq, SAMPLE_RATE, InstanceConfig::default())
            .unwrap();
    assert!(matches!(
        instance.bind_controls(&controls(&[("cutoff", 100.0)])),
        Err(FilterError::Config(_))
    ));
    assert!(matches!(
        instance.bind_controls(&controls(&[("in", 1.0)])),
        Err(FilterError::NotAControlPort(0))
    ));
}

#[test]
fn default_eq_passes_signal_through() {
    let mut instance =
        FilterInstance::instantiate(PluginVariant::ParametricEq, SAMPLE_RATE, InstanceConfig::default())
            .unwrap();
    instance.bind_controls(&HashMap::new()).unwrap();
    instance.activate();
    assert!(instance.live_channel().is_none());

    let input: Vec<f32> = (0..512).map(|i| (i as f32 * 0.05).sin()).collect();
    let mut output = vec![0.0; 512];
    instance.run(&input, &mut output);
    for (x, y) in input.iter().zip(&output) {
        assert!((x - y).abs() < 1e-3, "{x} vs {y}");
    }
}

#[test]
fn unbound_controls_use_defaults() {
    let mut instance =
        FilterInstance::instantiate(PluginVariant::Lr4Lowpass, SAMPLE_RATE, InstanceConfig::default())
            .unwrap();
    instance.activate();
    let mut output = [0.0; 4];
    instance.run(&[1.0; 4], &mut output);
    assert_eq!(instance.parameters(), &[440.0, 0.0]);
}

#[test]
fn output_gain_applies_at_dc() {
    let mut instance =
        FilterInstance::instantiate(PluginVariant::Lr4Lowpass, SAMPLE_RATE, InstanceConfig::default())
            .unwrap();
    instance
        .bind_controls(&controls(&[("cutoff", 1_000.0), ("gain", -6.0)]))
        .unwrap();
    instance.activate();

    let mut buffer = vec![1.0; 9_600];
    instance.run_in_place(&mut buffer);
    let expected = 10f32.powf(-6.0 / 20.0);
    let last = *buffer.last().unwrap();
    assert!((last - expected).abs() < 1e-3, "{last} vs {expected}");
}

#[test]
fn host_changes_apply_on_next_block() {
    let mut instance =
        FilterInstance::instantiate(PluginVariant::Lr4Highpass, SAMPLE_RATE, InstanceConfig::default())
            .unwrap();
    let cells = instance.bind_controls(&HashMap::new()).unwrap();
    instance.activate();
    let cutoff = cell_for(&cells, &LR4_HIGHPASS_DESCRIPTOR, "cutoff");

    let mut output = [0.0; 8];
    instance.run(&[0.0; 8], &mut output);
    assert_eq!(instance.parameters()[0], 440.0);

    cutoff.store(2_000.0, Ordering::Relaxed);
    instance.run(&[0.0; 8], &mut output);
    assert_eq!(instance.parameters()[0], 2_000.0);
}

#[test]
fn live_update_overwrites_host_controls() {
    let dir = scratch_dir("live_update");
    let mut instance =
        FilterInstance::instantiate(PluginVariant::Lr4Lowpass, SAMPLE_RATE, config_in(&dir, false))
            .unwrap();
    let cells = instance
        .bind_controls(&controls(&[("channel", 7.0)]))
        .unwrap();
    instance.activate();

    let path = instance.live_channel().unwrap().path().to_path_buf();
    let file_name = path.file_name().unwrap().to_str().unwrap().to_string();
    assert!(file_name.starts_with("t5_Lr4Lowpass_7_"), "{file_name}");

    let mut writer = LiveParameterWriter::open(&path, 2).unwrap();
    writer.stage(&[1_000.0, -6.0]).unwrap();

    let mut output = [0.0; 16];
    instance.run(&[0.0; 16], &mut output);
    assert_eq!(instance.parameters(), &[1_000.0, -6.0]);
    assert!(!writer.is_pending());
    let cutoff = cell_for(&cells, &LR4_LOWPASS_DESCRIPTOR, "cutoff");
    let gain = cell_for(&cells, &LR4_LOWPASS_DESCRIPTOR, "gain");
    assert_eq!(cutoff.load(Ordering::Relaxed), 1_000.0);
    assert_eq!(gain.load(Ordering::Relaxed), -6.0);

    // Nothing staged: the host's next write wins.
    cutoff.store(300.0, Ordering::Relaxed);
    instance.run(&[0.0; 16], &mut output);
    assert_eq!(instance.parameters(), &[300.0, -6.0]);

    instance.cleanup();
    assert!(!path.exists());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn channel_is_created_only_in_activate_by_default() {
    let dir = scratch_dir("eager");
    let mut instance =
        FilterInstance::instantiate(PluginVariant::Lr4Highpass, SAMPLE_RATE, config_in(&dir, false))
            .unwrap();
    let cells = instance.bind_controls(&HashMap::new()).unwrap();
    instance.activate();
    assert!(instance.live_channel().is_none());

    cell_for(&cells, &LR4_HIGHPASS_DESCRIPTOR, "channel").store(3.0, Ordering::Relaxed);
    let mut output = [0.0; 4];
    instance.run(&[0.0; 4], &mut output);
    assert!(instance.live_channel().is_none());

    assert!(instance.prepare_live_channel().is_some());
    assert_eq!(instance.live_channel().unwrap().parameter_count(), 2);

    drop(instance);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn lazy_setup_creates_channel_from_run() {
    let dir = scratch_dir("lazy");
    let mut instance =
        FilterInstance::instantiate(PluginVariant::ParametricEq, SAMPLE_RATE, config_in(&dir, true))
            .unwrap();
    let cells = instance.bind_controls(&HashMap::new()).unwrap();
    instance.activate();
    assert!(instance.live_channel().is_none());

    cell_for(&cells, &PARAMETRIC_EQ_DESCRIPTOR, "channel").store(12.0, Ordering::Relaxed);
    let mut output = [0.0; 4];
    instance.run(&[0.0; 4], &mut output);
    let channel = instance.live_channel().unwrap();
    assert_eq!(channel.parameter_count(), 16);
    assert_eq!(std::fs::metadata(channel.path()).unwrap().len(), 17 * 4);

    drop(instance);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn failed_setup_is_not_retried() {
    let dir = std::env::temp_dir().join(format!(
        "biquad_cascade_plugins_missing_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    let mut instance =
        FilterInstance::instantiate(PluginVariant::Lr4Lowpass, SAMPLE_RATE, config_in(&dir, true))
            .unwrap();
    instance
        .bind_controls(&controls(&[("cutoff", 1_000.0), ("channel", 9.0)]))
        .unwrap();
    instance.activate();
    assert!(instance.live_channel().is_none());

    // Filtering keeps working without the channel.
    let mut output = [0.0; 64];
    instance.run(&[1.0; 64], &mut output);
    assert!(output.iter().all(|y| y.is_finite()));
    assert!(output[63] > 0.0);

    std::fs::create_dir_all(&dir).unwrap();
    instance.run(&[1.0; 64], &mut output);
    assert!(instance.prepare_live_channel().is_none());
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    std::fs::remove_dir_all(&dir).unwrap();
}
