pub mod biquad;
mod stage;

pub use biquad::{BiquadCoefficients, FilterType, BUTTERWORTH_Q};
pub use stage::{FilterStage, StageState};
