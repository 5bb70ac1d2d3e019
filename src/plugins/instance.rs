use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use atomic_float::AtomicF32;

use crate::chain::FilterChain;
use crate::config::InstanceConfig;
use crate::error::{FilterError, Result};
use crate::live_params::{ChannelName, LiveParameterChannel};
use crate::traits::{ControlCell, PluginLifecycle};

use super::descriptor::{PluginDescriptor, PluginVariant, PortKind, PortRole};

/// One running filter: a chain, its control bindings and an optional live
/// parameter channel.
///
/// Controls that were never connected keep their range-hint defaults.
#[derive(Debug)]
pub struct FilterInstance {
    variant: PluginVariant,
    config: InstanceConfig,
    created: Duration,
    chain: FilterChain,
    controls: Vec<Option<ControlCell>>,
    channel_name: Option<ControlCell>,
    /// Parameter vector applied to the last block.
    snapshot: Vec<f32>,
    live_channel: Option<LiveParameterChannel>,
    channel_failed: bool,
}

impl FilterInstance {
    pub fn variant(&self) -> PluginVariant {
        self.variant
    }

    pub fn descriptor(&self) -> &'static PluginDescriptor {
        self.variant.descriptor()
    }

    pub fn sample_rate(&self) -> f32 {
        self.chain.sample_rate()
    }

    pub fn chain(&self) -> &FilterChain {
        &self.chain
    }

    /// Parameter values used for the most recent block.
    pub fn parameters(&self) -> &[f32] {
        &self.snapshot
    }

    pub fn live_channel(&self) -> Option<&LiveParameterChannel> {
        self.live_channel.as_ref()
    }

    /// Creates the live parameter channel if the channel-name control is
    /// nonzero and no earlier attempt failed.
    ///
    /// Called from [`PluginLifecycle::activate`]; hosts that set the channel
    /// name later may call it again before streaming resumes.
    pub fn prepare_live_channel(&mut self) -> Option<&Path> {
        if self.live_channel.is_none() && !self.channel_failed {
            self.open_live_channel();
        }
        self.live_channel.as_ref().map(|channel| channel.path())
    }

    fn open_live_channel(&mut self) {
        let Some(cell) = &self.channel_name else {
            return;
        };
        let id = ChannelName::id_from_control(cell.load(Ordering::Relaxed));
        if id == 0 {
            return;
        }
        let descriptor = self.variant.descriptor();
        let name = ChannelName {
            prefix: &self.config.channel_prefix,
            tag: descriptor.channel_tag,
            id,
            created: self.created,
        };
        match LiveParameterChannel::create(
            &self.config.channel_dir,
            &name,
            descriptor.parameter_count(),
        ) {
            Ok(channel) => {
                log::info!(
                    "{}: live parameters at {}",
                    descriptor.label,
                    channel.path().display()
                );
                self.live_channel = Some(channel);
            }
            Err(e) => {
                log::warn!(
                    "{}: live parameter channel disabled: {e}",
                    descriptor.label
                );
                self.channel_failed = true;
            }
        }
    }

    /// Creates a cell for every control port, initialised from `values` (keyed
    /// by port symbol) or the port's default, and connects it.
    ///
    /// Returns the cells indexed by port; audio ports get `None`.
    pub fn bind_controls(
        &mut self,
        values: &HashMap<String, f32>,
    ) -> Result<Vec<Option<ControlCell>>> {
        let descriptor = self.variant.descriptor();
        for symbol in values.keys() {
            match descriptor.find_port(symbol) {
                Some(port) if descriptor.ports[port].kind == PortKind::Control => {}
                Some(port) => return Err(FilterError::NotAControlPort(port)),
                None => {
                    return Err(FilterError::Config(format!(
                        "{} has no control named {symbol:?}",
                        descriptor.label
                    )))
                }
            }
        }

        let mut cells = Vec::with_capacity(descriptor.port_count());
        for (port, desc) in descriptor.ports.iter().enumerate() {
            if desc.kind != PortKind::Control {
                cells.push(None);
                continue;
            }
            let value = values
                .get(desc.symbol)
                .copied()
                .unwrap_or_else(|| desc.default_value());
            let cell: ControlCell = Arc::new(AtomicF32::new(value));
            self.connect_port(port, Arc::clone(&cell))?;
            cells.push(Some(cell));
        }
        Ok(cells)
    }

    /// Like [`PluginLifecycle::run`] for a buffer shared between input and output.
    pub fn run_in_place(&mut self, buffer: &mut [f32]) {
        self.begin_block();
        self.chain.process_in_place(&self.snapshot, buffer);
    }

    fn begin_block(&mut self) {
        if self.config.lazy_channel_setup && self.live_channel.is_none() && !self.channel_failed {
            self.open_live_channel();
        }

        for (value, cell) in self.snapshot.iter_mut().zip(&self.controls) {
            if let Some(cell) = cell {
                *value = cell.load(Ordering::Relaxed);
            }
        }

        let Some(channel) = &mut self.live_channel else {
            return;
        };
        if channel.poll(&mut self.snapshot) {
            // Live values replace the host's until the host writes again.
            for (value, cell) in self.snapshot.iter().zip(&self.controls) {
                if let Some(cell) = cell {
                    cell.store(*value, Ordering::Relaxed);
                }
            }
        }
    }
}

impl PluginLifecycle for FilterInstance {
    fn instantiate(variant: PluginVariant, sample_rate: f32, config: InstanceConfig) -> Result<Self> {
        let descriptor = variant.descriptor();
        let chain = FilterChain::new(descriptor.topology, sample_rate)?;
        let created = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Ok(Self {
            variant,
            config,
            created,
            chain,
            controls: vec![None; descriptor.parameter_count()],
            channel_name: None,
            snapshot: descriptor.default_parameters(),
            live_channel: None,
            channel_failed: false,
        })
    }

    fn connect_port(&mut self, port: usize, location: ControlCell) -> Result<()> {
        let descriptor = self.variant.descriptor();
        match descriptor.port_role(port) {
            Some(PortRole::Parameter(index)) => self.controls[index] = Some(location),
            Some(PortRole::ChannelName) => self.channel_name = Some(location),
            Some(PortRole::AudioInput | PortRole::AudioOutput) => {
                return Err(FilterError::NotAControlPort(port))
            }
            None => {
                return Err(FilterError::UnknownPort {
                    port,
                    port_count: descriptor.port_count(),
                })
            }
        }
        Ok(())
    }

    fn activate(&mut self) {
        self.chain.reset();
        self.prepare_live_channel();
        log::debug!(
            "{} activated at {} Hz",
            self.variant.descriptor().label,
            self.chain.sample_rate()
        );
    }

    fn run(&mut self, input: &[f32], output: &mut [f32]) {
        self.begin_block();
        self.chain.process(&self.snapshot, input, output);
    }

    fn cleanup(self) {
        log::debug!("{} cleaned up", self.variant.descriptor().label);
    }
}
