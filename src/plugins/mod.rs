pub mod descriptor;
mod instance;
mod registry;
#[cfg(test)]
mod tests;

pub use descriptor::{
    PluginDescriptor, PluginVariant, PortDescriptor, PortKind, PortRole, RangeHint,
    LR4_HIGHPASS_DESCRIPTOR, LR4_LOWPASS_DESCRIPTOR, PARAMETRIC_EQ_DESCRIPTOR,
};
pub use instance::FilterInstance;
pub use registry::PluginRegistry;
