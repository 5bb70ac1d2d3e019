mod chain;
pub mod topology;

pub use chain::FilterChain;
pub use topology::{BandSpec, Topology, LR4_HIGHPASS, LR4_LOWPASS, PARAMETRIC_EQ};
