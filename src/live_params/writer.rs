use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use super::Segment;
use crate::error::ChannelError;

/// Producer side of a live parameter segment, used by the external process.
pub struct LiveParameterWriter {
    segment: Segment,
    parameter_count: usize,
}

impl LiveParameterWriter {
    /// Maps an existing segment created by a running instance.
    pub fn open(path: &Path, parameter_count: usize) -> Result<Self, ChannelError> {
        Ok(Self {
            segment: Segment::open(path, parameter_count + 1)?,
            parameter_count,
        })
    }

    pub fn path(&self) -> &Path {
        &self.segment.path
    }

    /// Writes a full parameter vector and raises the changed flag.
    ///
    /// Overwrites any update the instance has not consumed yet.
    pub fn stage(&mut self, params: &[f32]) -> Result<(), ChannelError> {
        if params.len() != self.parameter_count {
            return Err(ChannelError::ParameterCount {
                expected: self.parameter_count,
                actual: params.len(),
            });
        }
        let cells = self.segment.cells();
        for (cell, value) in cells[1..].iter().zip(params) {
            cell.store(value.to_bits(), Ordering::Relaxed);
        }
        cells[0].store(1f32.to_bits(), Ordering::Release);
        Ok(())
    }

    /// Whether the last staged vector is still waiting to be consumed.
    pub fn is_pending(&mut self) -> bool {
        f32::from_bits(self.segment.cells()[0].load(Ordering::Acquire)) != 0.0
    }

    /// Lists segments in `dir` created for `tag` with channel id `id`, newest first.
    pub fn discover(
        dir: &Path,
        prefix: &str,
        tag: &str,
        id: u64,
    ) -> Result<Vec<PathBuf>, ChannelError> {
        let stem = format!("{prefix}_{tag}_{id}_");
        let mut found: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| ChannelError::io(dir, e))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with(&stem))
            })
            .map(|entry| entry.path())
            .collect();
        // Zero-padded timestamps sort chronologically.
        found.sort_unstable_by(|a, b| b.cmp(a));
        Ok(found)
    }
}
