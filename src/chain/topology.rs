use crate::biquad::{BiquadCoefficients, FilterType, BUTTERWORTH_Q};

/// One band of a cascade: a filter family plus where its controls live.
///
/// Indices point into the variant's tunable control vector (port order, audio
/// ports excluded). A band with `passes > 1` reuses one coefficient set for
/// that many series sections, each with its own delay line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandSpec {
    pub filter_type: FilterType,
    pub frequency: usize,
    pub gain: Option<usize>,
    pub q: Option<usize>,
    pub passes: usize,
}

impl BandSpec {
    const fn shaped(filter_type: FilterType, first_control: usize) -> Self {
        Self {
            filter_type,
            frequency: first_control,
            gain: Some(first_control + 1),
            q: Some(first_control + 2),
            passes: 1,
        }
    }

    const fn linkwitz_riley(filter_type: FilterType, frequency: usize) -> Self {
        Self {
            filter_type,
            frequency,
            gain: None,
            q: None,
            passes: 2,
        }
    }

    /// Coefficients for this band from the current control values.
    pub fn coefficients(&self, controls: &[f32], sample_rate: f32) -> BiquadCoefficients {
        let gain = self.gain.map_or(0.0, |i| controls[i]);
        let q = self.q.map_or(BUTTERWORTH_Q as f32, |i| controls[i]);
        BiquadCoefficients::calculate(
            self.filter_type,
            controls[self.frequency],
            gain,
            q,
            sample_rate,
        )
    }
}

/// A fixed cascade layout.
#[derive(Debug, PartialEq)]
pub struct Topology {
    pub bands: &'static [BandSpec],
    /// Control index of the overall output gain (dB).
    pub output_gain: usize,
    /// Number of tunable controls, output gain included.
    pub parameter_count: usize,
}

impl Topology {
    /// Total number of biquad sections.
    pub fn stage_count(&self) -> usize {
        self.bands.iter().map(|band| band.passes).sum()
    }
}

/// Low shelf → three peaking bands → high shelf, frequency/gain/Q per band.
pub static PARAMETRIC_EQ: Topology = Topology {
    bands: &[
        BandSpec::shaped(FilterType::LowShelf, 0),
        BandSpec::shaped(FilterType::Peaking, 3),
        BandSpec::shaped(FilterType::Peaking, 6),
        BandSpec::shaped(FilterType::Peaking, 9),
        BandSpec::shaped(FilterType::HighShelf, 12),
    ],
    output_gain: 15,
    parameter_count: 16,
};

/// 24 dB/octave Linkwitz-Riley low-pass: a Butterworth section run twice.
pub static LR4_LOWPASS: Topology = Topology {
    bands: &[BandSpec::linkwitz_riley(FilterType::ButterworthLowPass, 0)],
    output_gain: 1,
    parameter_count: 2,
};

/// 24 dB/octave Linkwitz-Riley high-pass.
pub static LR4_HIGHPASS: Topology = Topology {
    bands: &[BandSpec::linkwitz_riley(FilterType::ButterworthHighPass, 0)],
    output_gain: 1,
    parameter_count: 2,
};
