use std::sync::Arc;

use atomic_float::AtomicF32;

use crate::config::InstanceConfig;
use crate::error::Result;
use crate::plugins::PluginVariant;

/// A host-owned control location. The host writes it between blocks; the
/// instance reads it every block and may overwrite it with live parameters.
pub type ControlCell = Arc<AtomicF32>;

/// The five calls a plugin host makes over an instance's lifetime.
///
/// A host-boundary layer translates its ABI (descriptor callbacks, port
/// pointers) into these operations. Calls for one instance are sequential.
pub trait PluginLifecycle {
    /// Constructs an instance for `variant` at a fixed sample rate.
    fn instantiate(variant: PluginVariant, sample_rate: f32, config: InstanceConfig) -> Result<Self>
    where
        Self: Sized;

    /// Binds a control port to a host-owned location.
    fn connect_port(&mut self, port: usize, location: ControlCell) -> Result<()>;

    /// Prepares for streaming: clears filter history and performs any setup
    /// that must not happen on the audio thread.
    fn activate(&mut self);

    /// Processes one block of `min(input.len(), output.len())` samples.
    fn run(&mut self, input: &[f32], output: &mut [f32]);

    /// Tears the instance down and releases external resources.
    fn cleanup(self)
    where
        Self: Sized;
}
