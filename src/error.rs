//! Error types for instance construction and live parameter channels.

use std::path::PathBuf;

/// Errors raised while constructing, binding or configuring a filter instance.
#[derive(Debug)]
pub enum FilterError {
    /// The host supplied a sample rate that is not a positive finite number.
    InvalidSampleRate(f32),
    /// Stage state for the cascade could not be allocated.
    Allocation { stages: usize },
    /// A port index outside the variant's port table.
    UnknownPort { port: usize, port_count: usize },
    /// An audio port was passed where a control port is required.
    NotAControlPort(usize),
    /// No plugin with this label is registered.
    UnknownPlugin(String),
    /// Configuration or preset could not be parsed or applied.
    Config(String),
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSampleRate(rate) => write!(f, "invalid sample rate: {rate}"),
            Self::Allocation { stages } => {
                write!(f, "failed to allocate state for {stages} filter stages")
            }
            Self::UnknownPort { port, port_count } => {
                write!(f, "port {port} out of range (plugin has {port_count} ports)")
            }
            Self::NotAControlPort(port) => write!(f, "port {port} is not a control port"),
            Self::UnknownPlugin(label) => write!(f, "unknown plugin label: {label}"),
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for FilterError {}

/// Errors raised while setting up or writing a shared-memory parameter channel.
#[derive(Debug)]
pub enum ChannelError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The backing segment is smaller than flag + parameter vector.
    TooSmall {
        path: PathBuf,
        len: u64,
        required: u64,
    },
    /// A staged vector does not match the channel's parameter count.
    ParameterCount { expected: usize, actual: usize },
}

impl ChannelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl std::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::TooSmall {
                path,
                len,
                required,
            } => write!(
                f,
                "{}: segment is {len} bytes, need at least {required}",
                path.display()
            ),
            Self::ParameterCount { expected, actual } => {
                write!(f, "expected {expected} parameters, got {actual}")
            }
        }
    }
}

impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for instance operations.
pub type Result<T> = std::result::Result<T, FilterError>;
