use super::BiquadCoefficients;

/// Delay line of one second-order section (Direct Form I).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StageState {
    pub xn1: f32, // x[n-1]
    pub xn2: f32, // x[n-2]
    pub yn1: f32, // y[n-1]
    pub yn2: f32, // y[n-2]
}

/// One biquad section of a cascade.
///
/// Owns only its delay line. Coefficients are handed in per block so the same
/// stage can follow control changes without keeping stale values around.
#[derive(Clone, Copy, Debug, Default)]
pub struct FilterStage {
    state: StageState,
}

impl FilterStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    /// Clears the delay line. Called on activation only.
    pub fn reset(&mut self) {
        self.state = StageState::default();
    }

    #[inline(always)]
    fn tick(&mut self, c: &BiquadCoefficients, xn: f32) -> f32 {
        let s = &mut self.state;
        let yn = c.b0 * xn + c.b1 * s.xn1 + c.b2 * s.xn2 - c.a1 * s.yn1 - c.a2 * s.yn2;
        s.xn2 = s.xn1;
        s.xn1 = xn;
        s.yn2 = s.yn1;
        s.yn1 = yn;
        yn
    }

    /// Filters `input` into `output`, optionally scaling what is written by `gain`.
    ///
    /// The gain never feeds back into the delay line. Processes
    /// `min(input.len(), output.len())` samples.
    pub fn process(
        &mut self,
        coeffs: &BiquadCoefficients,
        input: &[f32],
        output: &mut [f32],
        gain: Option<f32>,
    ) {
        match gain {
            Some(gain) => {
                for (out, &x) in output.iter_mut().zip(input) {
                    *out = self.tick(coeffs, x) * gain;
                }
            }
            None => {
                for (out, &x) in output.iter_mut().zip(input) {
                    *out = self.tick(coeffs, x);
                }
            }
        }
    }

    /// Same as [`FilterStage::process`] but overwrites `buffer` with its own output.
    pub fn process_in_place(
        &mut self,
        coeffs: &BiquadCoefficients,
        buffer: &mut [f32],
        gain: Option<f32>,
    ) {
        match gain {
            Some(gain) => {
                for sample in buffer.iter_mut() {
                    *sample = self.tick(coeffs, *sample) * gain;
                }
            }
            None => {
                for sample in buffer.iter_mut() {
                    *sample = self.tick(coeffs, *sample);
                }
            }
        }
    }
}
