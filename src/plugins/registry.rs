use rustc_hash::FxHashMap;

use crate::config::InstanceConfig;
use crate::error::{FilterError, Result};
use crate::traits::PluginLifecycle;

use super::descriptor::{PluginDescriptor, PluginVariant};
use super::instance::FilterInstance;

/// Index of the plugins this crate provides, built once by the host layer.
pub struct PluginRegistry {
    variants: Vec<PluginVariant>,
    by_label: FxHashMap<&'static str, usize>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        let variants = PluginVariant::ALL.to_vec();
        let by_label = variants
            .iter()
            .enumerate()
            .map(|(index, variant)| (variant.descriptor().label, index))
            .collect();
        Self { variants, by_label }
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Descriptor at `index`, or `None` past the end (host enumeration).
    pub fn descriptor(&self, index: usize) -> Option<&'static PluginDescriptor> {
        self.variants.get(index).map(|variant| variant.descriptor())
    }

    pub fn find(&self, label: &str) -> Option<PluginVariant> {
        self.by_label.get(label).map(|&index| self.variants[index])
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &'static PluginDescriptor> + '_ {
        self.variants.iter().map(|variant| variant.descriptor())
    }

    pub fn instantiate(
        &self,
        label: &str,
        sample_rate: f32,
        config: InstanceConfig,
    ) -> Result<FilterInstance> {
        let variant = self
            .find(label)
            .ok_or_else(|| FilterError::UnknownPlugin(label.to_string()))?;
        FilterInstance::instantiate(variant, sample_rate, config)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
