pub mod biquad;
pub mod chain;
pub mod config;
pub mod error;
pub mod live_params;
pub mod plugins;
pub mod traits;
pub mod utils;

pub use biquad::{BiquadCoefficients, FilterStage, FilterType};
pub use chain::{FilterChain, Topology};
pub use config::{InstanceConfig, Preset};
pub use error::{ChannelError, FilterError, Result};
pub use live_params::{ChannelName, LiveParameterChannel, LiveParameterWriter};
pub use plugins::{FilterInstance, PluginDescriptor, PluginRegistry, PluginVariant};
pub use traits::{ControlCell, PluginLifecycle};
pub use utils::*;
