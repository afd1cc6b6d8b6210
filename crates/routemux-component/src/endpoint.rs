//! Buffer endpoints as seen by the copy driver.
//!
//! An endpoint is one connected pipeline buffer: the kernels read or write
//! its samples through [`SampleSource`]/[`SampleSink`], and the driver uses
//! the accounting half of the trait to size each cycle and to commit it.

use routemux_core::{SampleSink, SampleSource};

/// A pipeline buffer connected to the component.
///
/// Byte counts refer to whole samples in the buffer's container width; the
/// driver converts them to frames with the configured format.
pub trait Endpoint: SampleSource + SampleSink {
    /// Pipeline owning the component at the other end of this buffer.
    fn pipeline_id(&self) -> u32;

    /// Interleaved channels carried by the buffer.
    fn channels(&self) -> u16;

    /// Whether the component at the other end is ready to stream.
    ///
    /// An inactive endpoint is skipped for the cycle, never an error.
    fn is_active(&self) -> bool;

    /// Bytes readable from the read position.
    fn avail_bytes(&self) -> usize;

    /// Bytes writable at the write position.
    fn free_bytes(&self) -> usize;

    /// Commits `bytes` written at the write position.
    fn produce(&mut self, bytes: usize);

    /// Releases `bytes` read from the read position.
    fn consume(&mut self, bytes: usize);

    /// Bytes in one frame of `sample_bytes`-wide samples.
    fn frame_bytes(&self, sample_bytes: usize) -> usize {
        usize::from(self.channels()) * sample_bytes
    }

    /// Complete frames readable.
    fn avail_frames(&self, sample_bytes: usize) -> usize {
        self.avail_bytes()
            .checked_div(self.frame_bytes(sample_bytes))
            .unwrap_or(0)
    }

    /// Complete frames writable.
    fn free_frames(&self, sample_bytes: usize) -> usize {
        self.free_bytes()
            .checked_div(self.frame_bytes(sample_bytes))
            .unwrap_or(0)
    }
}

/// Read view of an endpoint, for the kernels.
#[inline]
pub(crate) fn as_source<'a>(endpoint: &'a (dyn Endpoint + 'a)) -> &'a dyn SampleSource {
    endpoint
}

/// Write view of an endpoint, for the kernels.
#[inline]
pub(crate) fn as_sink<'a>(endpoint: &'a mut (dyn Endpoint + 'a)) -> &'a mut dyn SampleSink {
    endpoint
}
