use serde::{Deserialize, Serialize};

use crate::chain::{Topology, LR4_HIGHPASS, LR4_LOWPASS, PARAMETRIC_EQ};

const MAKER: &str = "Juergen Herrmann (t-5@t-5.eu)";
const COPYRIGHT: &str = "3-clause BSD licence";

/// The filter variants this crate provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PluginVariant {
    ParametricEq,
    Lr4Lowpass,
    Lr4Highpass,
}

impl PluginVariant {
    pub const ALL: [PluginVariant; 3] = [
        PluginVariant::ParametricEq,
        PluginVariant::Lr4Lowpass,
        PluginVariant::Lr4Highpass,
    ];

    pub fn descriptor(self) -> &'static PluginDescriptor {
        match self {
            PluginVariant::ParametricEq => &PARAMETRIC_EQ_DESCRIPTOR,
            PluginVariant::Lr4Lowpass => &LR4_LOWPASS_DESCRIPTOR,
            PluginVariant::Lr4Highpass => &LR4_HIGHPASS_DESCRIPTOR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortKind {
    AudioInput,
    AudioOutput,
    Control,
}

/// What a port index means to an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortRole {
    AudioInput,
    AudioOutput,
    /// Tunable control at this index of the parameter vector.
    Parameter(usize),
    /// Live parameter channel id; zero disables the channel.
    ChannelName,
}

/// Bounds and default for a control port.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeHint {
    pub lower: f32,
    pub upper: f32,
    /// Bounds are fractions of the sample rate.
    pub sample_rate_relative: bool,
    pub logarithmic: bool,
    pub default: f32,
}

impl RangeHint {
    pub fn bounds(&self, sample_rate: f32) -> (f32, f32) {
        if self.sample_rate_relative {
            (self.lower * sample_rate, self.upper * sample_rate)
        } else {
            (self.lower, self.upper)
        }
    }

    pub fn clamp(&self, value: f32, sample_rate: f32) -> f32 {
        let (lower, upper) = self.bounds(sample_rate);
        value.clamp(lower, upper)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortDescriptor {
    /// Short identifier used by presets.
    pub symbol: &'static str,
    pub name: &'static str,
    pub kind: PortKind,
    pub hint: Option<RangeHint>,
}

impl PortDescriptor {
    const fn audio(symbol: &'static str, name: &'static str, kind: PortKind) -> Self {
        Self {
            symbol,
            name,
            kind,
            hint: None,
        }
    }

    const fn control(symbol: &'static str, name: &'static str, hint: RangeHint) -> Self {
        Self {
            symbol,
            name,
            kind: PortKind::Control,
            hint: Some(hint),
        }
    }

    const fn frequency(symbol: &'static str, name: &'static str) -> Self {
        Self::control(
            symbol,
            name,
            RangeHint {
                lower: 0.0,
                upper: 0.5,
                sample_rate_relative: true,
                logarithmic: true,
                default: 440.0,
            },
        )
    }

    const fn gain(symbol: &'static str, name: &'static str) -> Self {
        Self::control(
            symbol,
            name,
            RangeHint {
                lower: -12.0,
                upper: 12.0,
                sample_rate_relative: false,
                logarithmic: false,
                default: 0.0,
            },
        )
    }

    const fn q(symbol: &'static str, name: &'static str) -> Self {
        Self::control(
            symbol,
            name,
            RangeHint {
                lower: 0.1,
                upper: 10.0,
                sample_rate_relative: false,
                logarithmic: false,
                default: 1.0,
            },
        )
    }

    const fn channel_name() -> Self {
        Self::control(
            "channel",
            "MMAP-Filename-Part",
            RangeHint {
                lower: 0.0,
                upper: 10_000_000_000.0,
                sample_rate_relative: false,
                logarithmic: false,
                default: 0.0,
            },
        )
    }

    /// Default value for control ports, zero for audio ports.
    pub fn default_value(&self) -> f32 {
        self.hint.map_or(0.0, |hint| hint.default)
    }
}

/// Static metadata for one variant.
///
/// Port order is fixed: audio input, audio output, the tunable controls in
/// parameter-vector order, then the channel-name control.
#[derive(Debug, PartialEq)]
pub struct PluginDescriptor {
    pub unique_id: u32,
    pub label: &'static str,
    pub name: &'static str,
    pub maker: &'static str,
    pub copyright: &'static str,
    /// Plugin-type component of live parameter segment names.
    pub channel_tag: &'static str,
    pub topology: &'static Topology,
    pub ports: &'static [PortDescriptor],
}

const FIRST_PARAMETER_PORT: usize = 2;

impl PluginDescriptor {
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    pub fn parameter_count(&self) -> usize {
        self.topology.parameter_count
    }

    pub fn channel_port(&self) -> usize {
        FIRST_PARAMETER_PORT + self.parameter_count()
    }

    pub fn port_role(&self, port: usize) -> Option<PortRole> {
        match port {
            0 => Some(PortRole::AudioInput),
            1 => Some(PortRole::AudioOutput),
            p if p == self.channel_port() => Some(PortRole::ChannelName),
            p if p < self.channel_port() => Some(PortRole::Parameter(p - FIRST_PARAMETER_PORT)),
            _ => None,
        }
    }

    /// Descriptor of the parameter at `index` in the parameter vector.
    pub fn parameter_port(&self, index: usize) -> &'static PortDescriptor {
        &self.ports[FIRST_PARAMETER_PORT + index]
    }

    pub fn find_port(&self, symbol: &str) -> Option<usize> {
        self.ports.iter().position(|port| port.symbol == symbol)
    }

    /// Default parameter vector taken from the range hints.
    pub fn default_parameters(&self) -> Vec<f32> {
        (0..self.parameter_count())
            .map(|i| self.parameter_port(i).default_value())
            .collect()
    }
}

static PARAMETRIC_EQ_PORTS: [PortDescriptor; 19] = [
    PortDescriptor::audio("in", "Input", PortKind::AudioInput),
    PortDescriptor::audio("out", "Output", PortKind::AudioOutput),
    PortDescriptor::frequency("low_freq", "Low Shelf Frequency [Hz]"),
    PortDescriptor::gain("low_gain", "Low Shelf Gain [dB]"),
    PortDescriptor::q("low_q", "Low Shelf Q"),
    PortDescriptor::frequency("p1_freq", "Peaking EQ 1 Frequency [Hz]"),
    PortDescriptor::gain("p1_gain", "Peaking EQ 1 Gain [dB]"),
    PortDescriptor::q("p1_q", "Peaking EQ 1 Q"),
    PortDescriptor::frequency("p2_freq", "Peaking EQ 2 Frequency [Hz]"),
    PortDescriptor::gain("p2_gain", "Peaking EQ 2 Gain [dB]"),
    PortDescriptor::q("p2_q", "Peaking EQ 2 Q"),
    PortDescriptor::frequency("p3_freq", "Peaking EQ 3 Frequency [Hz]"),
    PortDescriptor::gain("p3_gain", "Peaking EQ 3 Gain [dB]"),
    PortDescriptor::q("p3_q", "Peaking EQ 3 Q"),
    PortDescriptor::frequency("high_freq", "High Shelf Frequency [Hz]"),
    PortDescriptor::gain("high_gain", "High Shelf Gain [dB]"),
    PortDescriptor::q("high_q", "High Shelf Q"),
    PortDescriptor::gain("gain", "Overall Gain [dB]"),
    PortDescriptor::channel_name(),
];

static LR4_PORTS: [PortDescriptor; 5] = [
    PortDescriptor::audio("in", "Input", PortKind::AudioInput),
    PortDescriptor::audio("out", "Output", PortKind::AudioOutput),
    PortDescriptor::frequency("cutoff", "Cutoff Frequency [Hz]"),
    PortDescriptor::gain("gain", "Overall Gain [dB]"),
    PortDescriptor::channel_name(),
];

pub static PARAMETRIC_EQ_DESCRIPTOR: PluginDescriptor = PluginDescriptor {
    unique_id: 5541,
    label: "3band_parameq_with_shelves",
    name: "T5's 3-Band Parametric with Shelves",
    maker: MAKER,
    copyright: COPYRIGHT,
    channel_tag: "3BandParamEqWithShelves",
    topology: &PARAMETRIC_EQ,
    ports: &PARAMETRIC_EQ_PORTS,
};

pub static LR4_LOWPASS_DESCRIPTOR: PluginDescriptor = PluginDescriptor {
    unique_id: 5542,
    label: "lr4_lowpass",
    name: "T5's LR-4 Low Pass",
    maker: MAKER,
    copyright: COPYRIGHT,
    channel_tag: "Lr4Lowpass",
    topology: &LR4_LOWPASS,
    ports: &LR4_PORTS,
};

pub static LR4_HIGHPASS_DESCRIPTOR: PluginDescriptor = PluginDescriptor {
    unique_id: 5543,
    label: "lr4_highpass",
    name: "T5's LR-4 High Pass",
    maker: MAKER,
    copyright: COPYRIGHT,
    channel_tag: "Lr4Highpass",
    topology: &LR4_HIGHPASS,
    ports: &LR4_PORTS,
};
