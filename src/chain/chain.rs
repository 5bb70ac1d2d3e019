use crate::biquad::FilterStage;
use crate::error::{FilterError, Result};
use crate::utils::db_to_gain;

use super::topology::Topology;

/// Runs a [`Topology`] over mono blocks.
///
/// Every stage processes the whole block before the next one starts, reading
/// the previous stage's output in place. Coefficients are recomputed from the
/// control vector on every call; only the delay lines persist.
#[derive(Debug)]
pub struct FilterChain {
    topology: &'static Topology,
    sample_rate: f32,
    stages: Vec<FilterStage>,
}

impl FilterChain {
    pub fn new(topology: &'static Topology, sample_rate: f32) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(FilterError::InvalidSampleRate(sample_rate));
        }
        let count = topology.stage_count();
        let mut stages = Vec::new();
        stages
            .try_reserve_exact(count)
            .map_err(|_| FilterError::Allocation { stages: count })?;
        stages.resize(count, FilterStage::new());
        Ok(Self {
            topology,
            sample_rate,
            stages,
        })
    }

    pub fn topology(&self) -> &'static Topology {
        self.topology
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    /// Zeroes every delay line (stream start).
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }

    /// Filters `input` into `output` using `controls` (one value per tunable control).
    ///
    /// Processes `min(input.len(), output.len())` samples. The output gain is
    /// fused into the last stage.
    pub fn process(&mut self, controls: &[f32], input: &[f32], output: &mut [f32]) {
        let len = input.len().min(output.len());
        let (input, output) = (&input[..len], &mut output[..len]);
        if self.stages.is_empty() {
            let gain = db_to_gain(controls[self.topology.output_gain]);
            for (out, &x) in output.iter_mut().zip(input) {
                *out = x * gain;
            }
            return;
        }
        self.run(controls, Some(input), output);
    }

    /// Like [`FilterChain::process`] for hosts that hand in one shared buffer.
    pub fn process_in_place(&mut self, controls: &[f32], buffer: &mut [f32]) {
        if self.stages.is_empty() {
            let gain = db_to_gain(controls[self.topology.output_gain]);
            buffer.iter_mut().for_each(|x| *x *= gain);
            return;
        }
        self.run(controls, None, buffer);
    }

    fn run(&mut self, controls: &[f32], mut input: Option<&[f32]>, output: &mut [f32]) {
        let output_gain = db_to_gain(controls[self.topology.output_gain]);
        let last = self.stages.len() - 1;
        let mut stages = self.stages.iter_mut().enumerate();

        for band in self.topology.bands {
            let coeffs = band.coefficients(controls, self.sample_rate);
            for _ in 0..band.passes {
                let Some((index, stage)) = stages.next() else {
                    return;
                };
                let gain = (index == last).then_some(output_gain);
                match input.take() {
                    Some(input) => stage.process(&coeffs, input, output, gain),
                    None => stage.process_in_place(&coeffs, output, gain),
                }
            }
        }
    }
}
