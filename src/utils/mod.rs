pub mod gain;

pub use gain::*;
