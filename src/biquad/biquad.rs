use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Butterworth quality factor (1/√2) used by the Linkwitz-Riley sections.
pub const BUTTERWORTH_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Response families a single biquad section can be configured for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterType {
    LowShelf,
    Peaking,
    HighShelf,
    /// Fixed Q of 1/√2, no gain.
    ButterworthLowPass,
    /// Fixed Q of 1/√2, no gain.
    ButterworthHighPass,
}

impl FilterType {
    /// Whether the family reads the gain and Q controls.
    pub fn uses_gain_and_q(self) -> bool {
        matches!(
            self,
            FilterType::LowShelf | FilterType::Peaking | FilterType::HighShelf
        )
    }
}

/// Biquad coefficients with `a0` already divided out.
///
/// The recurrence is `y[n] = b0·x[n] + b1·x[n-1] + b2·x[n-2] − a1·y[n-1] − a2·y[n-2]`,
/// so nothing is divided at runtime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Cookbook intermediates shared by every family.
struct Prewarp {
    cs: f64,
    alpha: f64,
}

impl Prewarp {
    fn new(frequency: f32, q: f64, sample_rate: f32) -> Self {
        let w0 = 2.0 * PI * frequency as f64 / sample_rate as f64;
        let (sn, cs) = w0.sin_cos();
        Self {
            cs,
            alpha: sn / (2.0 * q),
        }
    }
}

impl BiquadCoefficients {
    /// Pass-through section.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Derives coefficients for `filter_type` (Audio EQ Cookbook, R. Bristow-Johnson).
    ///
    /// `frequency` is in Hz and expected in `(0, sample_rate / 2)`, `gain_db` in dB and
    /// `q` positive. Out-of-range values are not rejected; they yield well-defined but
    /// degenerate responses. Butterworth families ignore `gain_db` and `q`.
    pub fn calculate(
        filter_type: FilterType,
        frequency: f32,
        gain_db: f32,
        q: f32,
        sample_rate: f32,
    ) -> Self {
        match filter_type {
            FilterType::LowShelf => Self::low_shelf(frequency, gain_db, q, sample_rate),
            FilterType::Peaking => Self::peaking(frequency, gain_db, q, sample_rate),
            FilterType::HighShelf => Self::high_shelf(frequency, gain_db, q, sample_rate),
            FilterType::ButterworthLowPass => Self::butterworth_lowpass(frequency, sample_rate),
            FilterType::ButterworthHighPass => Self::butterworth_highpass(frequency, sample_rate),
        }
    }

    pub fn low_shelf(frequency: f32, gain_db: f32, q: f32, sample_rate: f32) -> Self {
        let Prewarp { cs, alpha } = Prewarp::new(frequency, q as f64, sample_rate);
        let a = shelf_amplitude(gain_db);
        let beta = 2.0 * a.sqrt() * alpha;
        Self::normalized(
            a * ((a + 1.0) - (a - 1.0) * cs + beta),
            2.0 * a * ((a - 1.0) - (a + 1.0) * cs),
            a * ((a + 1.0) - (a - 1.0) * cs - beta),
            (a + 1.0) + (a - 1.0) * cs + beta,
            -2.0 * ((a - 1.0) + (a + 1.0) * cs),
            (a + 1.0) + (a - 1.0) * cs - beta,
        )
    }

    pub fn high_shelf(frequency: f32, gain_db: f32, q: f32, sample_rate: f32) -> Self {
        let Prewarp { cs, alpha } = Prewarp::new(frequency, q as f64, sample_rate);
        let a = shelf_amplitude(gain_db);
        let beta = 2.0 * a.sqrt() * alpha;
        Self::normalized(
            a * ((a + 1.0) + (a - 1.0) * cs + beta),
            -2.0 * a * ((a - 1.0) + (a + 1.0) * cs),
            a * ((a + 1.0) + (a - 1.0) * cs - beta),
            (a + 1.0) - (a - 1.0) * cs + beta,
            2.0 * ((a - 1.0) - (a + 1.0) * cs),
            (a + 1.0) - (a - 1.0) * cs - beta,
        )
    }

    pub fn peaking(frequency: f32, gain_db: f32, q: f32, sample_rate: f32) -> Self {
        let Prewarp { cs, alpha } = Prewarp::new(frequency, q as f64, sample_rate);
        let a = shelf_amplitude(gain_db);
        Self::normalized(
            1.0 + alpha * a,
            -2.0 * cs,
            1.0 - alpha * a,
            1.0 + alpha / a,
            -2.0 * cs,
            1.0 - alpha / a,
        )
    }

    pub fn butterworth_lowpass(frequency: f32, sample_rate: f32) -> Self {
        let Prewarp { cs, alpha } = Prewarp::new(frequency, BUTTERWORTH_Q, sample_rate);
        Self::normalized(
            (1.0 - cs) / 2.0,
            1.0 - cs,
            (1.0 - cs) / 2.0,
            1.0 + alpha,
            -2.0 * cs,
            1.0 - alpha,
        )
    }

    pub fn butterworth_highpass(frequency: f32, sample_rate: f32) -> Self {
        let Prewarp { cs, alpha } = Prewarp::new(frequency, BUTTERWORTH_Q, sample_rate);
        Self::normalized(
            (1.0 + cs) / 2.0,
            -(1.0 + cs),
            (1.0 + cs) / 2.0,
            1.0 + alpha,
            -2.0 * cs,
            1.0 - alpha,
        )
    }

    /// Divides every raw coefficient by `a0`.
    fn normalized(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        let norm = 1.0 / a0;
        Self {
            b0: (b0 * norm) as f32,
            b1: (b1 * norm) as f32,
            b2: (b2 * norm) as f32,
            a1: (a1 * norm) as f32,
            a2: (a2 * norm) as f32,
        }
    }
}

/// `A = 10^(gain/40)`, the square root of the linear gain at the shelf/peak.
#[inline]
fn shelf_amplitude(gain_db: f32) -> f64 {
    10f64.powf(gain_db as f64 / 40.0)
}
