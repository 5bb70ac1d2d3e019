//! Shared-memory channel through which another process can push a complete
//! parameter vector into a running filter instance.
//!
//! Segment layout, one 32-bit float per slot:
//!
//! ```text
//! [changed_flag, param_0, param_1, ..., param_{n-1}]
//! ```
//!
//! A nonzero flag means a new vector is staged. The consumer copies it out once
//! per block and writes the flag back to zero. There is no queue: a second
//! update staged before the first is consumed simply replaces it.

mod channel;
mod writer;

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicU32;

use memmap2::MmapMut;

use crate::error::ChannelError;

pub use channel::{ChannelName, LiveParameterChannel};
pub use writer::LiveParameterWriter;

const SLOT_BYTES: u64 = std::mem::size_of::<f32>() as u64;

/// A mapped file viewed as `scalars` atomic 32-bit slots.
struct Segment {
    path: PathBuf,
    map: MmapMut,
    scalars: usize,
}

impl Segment {
    fn required_len(scalars: usize) -> u64 {
        scalars as u64 * SLOT_BYTES
    }

    /// Creates (or truncates) the backing file and maps it zero-filled.
    fn create(path: &Path, scalars: usize) -> Result<Self, ChannelError> {
        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options
            .open(path)
            .map_err(|e| ChannelError::io(path, e))?;
        file.set_len(Self::required_len(scalars))
            .map_err(|e| ChannelError::io(path, e))?;
        Self::map(path, &file, scalars)
    }

    /// Maps an existing segment, checking it is large enough.
    fn open(path: &Path, scalars: usize) -> Result<Self, ChannelError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| ChannelError::io(path, e))?;
        let len = file
            .metadata()
            .map_err(|e| ChannelError::io(path, e))?
            .len();
        let required = Self::required_len(scalars);
        if len < required {
            return Err(ChannelError::TooSmall {
                path: path.to_path_buf(),
                len,
                required,
            });
        }
        Self::map(path, &file, scalars)
    }

    fn map(path: &Path, file: &File, scalars: usize) -> Result<Self, ChannelError> {
        // SAFETY: the file is meant to be shared with another process. Every access
        // to the mapping goes through `cells`, i.e. through atomics, so concurrent
        // external writes cannot produce a data race on our side.
        let map = unsafe { MmapMut::map_mut(file) }.map_err(|e| ChannelError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            map,
            scalars,
        })
    }

    fn cells(&mut self) -> &[AtomicU32] {
        let ptr = self.map.as_mut_ptr().cast::<AtomicU32>();
        // SAFETY: mappings are page aligned, which satisfies `AtomicU32`'s alignment.
        // The mapping is at least `scalars * 4` bytes (checked or set on
        // construction) and lives as long as `self`. `AtomicU32` has the same
        // in-memory representation as `u32`.
        unsafe { std::slice::from_raw_parts(ptr, self.scalars) }
    }
}
