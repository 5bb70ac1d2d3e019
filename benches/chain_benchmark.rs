// benches/chain_benchmark.rs
#![feature(test)]
extern crate test;

use std::collections::HashMap;

use biquad_cascade::{
    FilterChain, FilterInstance, InstanceConfig, PluginLifecycle, PluginVariant,
};
use test::Bencher;

const BUFFER_SIZE: usize = 512;
const SAMPLE_RATE: f32 = 48000.0;

fn eq_controls() -> Vec<f32> {
    vec![
        120.0, 3.0, 0.7, // low shelf
        400.0, -4.0, 1.4, // peaking 1
        2500.0, 2.0, 0.9, // peaking 2
        6000.0, -3.0, 2.0, // peaking 3
        9000.0, 4.0, 0.7, // high shelf
        -1.5, // gain
    ]
}

fn signal() -> Vec<f32> {
    (0..BUFFER_SIZE)
        .map(|i| (i as f32 * 0.031).sin() * 0.5)
        .collect()
}

#[bench]
fn bench_parametric_eq_block(b: &mut Bencher) {
    let mut chain =
        FilterChain::new(PluginVariant::ParametricEq.descriptor().topology, SAMPLE_RATE).unwrap();
    let controls = eq_controls();
    let input = signal();
    let mut output = vec![0.0f32; BUFFER_SIZE];

    b.iter(|| {
        chain.process(&controls, &input, &mut output);
        test::black_box(&output);
    });
}

#[bench]
fn bench_lr4_crossover_pair(b: &mut Bencher) {
    let mut low =
        FilterChain::new(PluginVariant::Lr4Lowpass.descriptor().topology, SAMPLE_RATE).unwrap();
    let mut high =
        FilterChain::new(PluginVariant::Lr4Highpass.descriptor().topology, SAMPLE_RATE).unwrap();
    let controls = [1000.0, 0.0];
    let input = signal();
    let mut out_low = vec![0.0f32; BUFFER_SIZE];
    let mut out_high = vec![0.0f32; BUFFER_SIZE];

    b.iter(|| {
        low.process(&controls, &input, &mut out_low);
        high.process(&controls, &input, &mut out_high);
        test::black_box((&out_low, &out_high));
    });
}

#[bench]
fn bench_instance_with_bound_controls(b: &mut Bencher) {
    let mut instance = FilterInstance::instantiate(
        PluginVariant::ParametricEq,
        SAMPLE_RATE,
        InstanceConfig::default(),
    )
    .unwrap();
    instance.bind_controls(&HashMap::new()).unwrap();
    instance.activate();
    let input = signal();
    let mut output = vec![0.0f32; BUFFER_SIZE];

    b.iter(|| {
        // Process multiple blocks per iteration to amortize timer overhead
        for _ in 0..8 {
            instance.run(&input, &mut output);
        }
        test::black_box(&output);
    });
}
