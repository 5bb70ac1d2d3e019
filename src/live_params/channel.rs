use std::fmt;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;

use super::Segment;
use crate::error::ChannelError;

/// Deterministic segment name: `{prefix}_{tag}_{id}_{secs:011}.{nanos:09}`.
///
/// `created` is the owning instance's creation time since the Unix epoch, so two
/// instances configured with the same id still get distinct segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelName<'a> {
    pub prefix: &'a str,
    pub tag: &'a str,
    pub id: u64,
    pub created: Duration,
}

impl ChannelName<'_> {
    /// Rounds the host's channel-name control value to the integer id used in names.
    pub fn id_from_control(value: f32) -> u64 {
        value.round().max(0.0) as u64
    }
}

impl fmt::Display for ChannelName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{:011}.{:09}",
            self.prefix,
            self.tag,
            self.id,
            self.created.as_secs(),
            self.created.subsec_nanos()
        )
    }
}

/// Consumer side of a live parameter segment, owned by one filter instance.
///
/// The backing file is removed when the channel is dropped.
pub struct LiveParameterChannel {
    segment: Segment,
    parameter_count: usize,
}

impl LiveParameterChannel {
    /// Creates a zeroed segment for `parameter_count` values under `dir`.
    pub fn create(
        dir: &Path,
        name: &ChannelName<'_>,
        parameter_count: usize,
    ) -> Result<Self, ChannelError> {
        let path = dir.join(name.to_string());
        let segment = Segment::create(&path, parameter_count + 1)?;
        Ok(Self {
            segment,
            parameter_count,
        })
    }

    pub fn path(&self) -> &Path {
        &self.segment.path
    }

    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    /// Copies a staged vector into `controls` and clears the flag.
    ///
    /// Returns `false` and leaves `controls` untouched when nothing is staged.
    /// Only the first `min(parameter_count, controls.len())` values are written.
    pub fn poll(&mut self, controls: &mut [f32]) -> bool {
        let count = self.parameter_count.min(controls.len());
        let cells = self.segment.cells();
        let Some((flag, params)) = cells.split_first() else {
            return false;
        };
        if f32::from_bits(flag.load(Ordering::Acquire)) == 0.0 {
            return false;
        }
        for (control, cell) in controls[..count].iter_mut().zip(params) {
            *control = f32::from_bits(cell.load(Ordering::Relaxed));
        }
        flag.store(0f32.to_bits(), Ordering::Release);
        true
    }
}

impl Drop for LiveParameterChannel {
    fn drop(&mut self) {
        let path = &self.segment.path;
        match std::fs::remove_file(path) {
            Ok(()) => log::debug!("removed live parameter segment {}", path.display()),
            Err(e) => log::warn!(
                "failed to remove live parameter segment {}: {e}",
                path.display()
            ),
        }
    }
}

impl fmt::Debug for LiveParameterChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveParameterChannel")
            .field("path", &self.segment.path)
            .field("parameter_count", &self.parameter_count)
            .finish()
    }
}
