//! Fragment accessors used by the routing kernels.
//!
//! The kernels never see buffer layout. They address samples by index
//! relative to the current read (source) or write (sink) position, and the
//! buffer implementation resolves that index to storage, wrapping around a
//! circular buffer if it has one.
//!
//! Plain `Vec<i16>`/`Vec<i32>` and fixed arrays implement both traits as
//! linear, non-wrapping buffers, which is what tests and offline tools use.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Read side of an interleaved sample buffer.
///
/// `idx` counts samples (not bytes) from the buffer's read position.
/// Callers guarantee `idx` stays inside the data the buffer reports as
/// available.
pub trait SampleSource {
    /// Reads a 16-bit sample.
    fn read_s16(&self, idx: usize) -> i16;

    /// Reads a 32-bit container (also used for 24-bit samples in 32 bits).
    fn read_s32(&self, idx: usize) -> i32;
}

/// Write side of an interleaved sample buffer.
///
/// `idx` counts samples from the buffer's write position. Callers guarantee
/// `idx` stays inside the space the buffer reports as free.
pub trait SampleSink {
    /// Writes a 16-bit sample.
    fn write_s16(&mut self, idx: usize, value: i16);

    /// Writes a 32-bit container.
    fn write_s32(&mut self, idx: usize, value: i32);
}

/// Element types usable as linear sample storage.
///
/// Conversions between container widths truncate when narrowing and
/// sign-extend when widening.
pub trait LinearSample: Copy {
    /// Narrows or passes through to a 16-bit sample.
    fn to_s16(self) -> i16;
    /// Widens or passes through to a 32-bit container.
    fn to_s32(self) -> i32;
    /// Builds the element from a 16-bit sample.
    fn from_s16(value: i16) -> Self;
    /// Builds the element from a 32-bit container.
    fn from_s32(value: i32) -> Self;
}

impl LinearSample for i16 {
    #[inline]
    fn to_s16(self) -> i16 {
        self
    }
    #[inline]
    fn to_s32(self) -> i32 {
        i32::from(self)
    }
    #[inline]
    fn from_s16(value: i16) -> Self {
        value
    }
    #[inline]
    fn from_s32(value: i32) -> Self {
        value as i16
    }
}

impl LinearSample for i32 {
    #[inline]
    fn to_s16(self) -> i16 {
        self as i16
    }
    #[inline]
    fn to_s32(self) -> i32 {
        self
    }
    #[inline]
    fn from_s16(value: i16) -> Self {
        i32::from(value)
    }
    #[inline]
    fn from_s32(value: i32) -> Self {
        value
    }
}

impl<T: LinearSample> SampleSource for Vec<T> {
    #[inline]
    fn read_s16(&self, idx: usize) -> i16 {
        self[idx].to_s16()
    }

    #[inline]
    fn read_s32(&self, idx: usize) -> i32 {
        self[idx].to_s32()
    }
}

impl<T: LinearSample> SampleSink for Vec<T> {
    #[inline]
    fn write_s16(&mut self, idx: usize, value: i16) {
        self[idx] = T::from_s16(value);
    }

    #[inline]
    fn write_s32(&mut self, idx: usize, value: i32) {
        self[idx] = T::from_s32(value);
    }
}

impl<T: LinearSample, const N: usize> SampleSource for [T; N] {
    #[inline]
    fn read_s16(&self, idx: usize) -> i16 {
        self[idx].to_s16()
    }

    #[inline]
    fn read_s32(&self, idx: usize) -> i32 {
        self[idx].to_s32()
    }
}

impl<T: LinearSample, const N: usize> SampleSink for [T; N] {
    #[inline]
    fn write_s16(&mut self, idx: usize, value: i16) {
        self[idx] = T::from_s16(value);
    }

    #[inline]
    fn write_s32(&mut self, idx: usize, value: i32) {
        self[idx] = T::from_s32(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "std"))]
    use alloc::vec;

    #[test]
    fn vec_i16_reads_and_widens() {
        let buf: Vec<i16> = vec![-3, 7];
        assert_eq!(buf.read_s16(1), 7);
        assert_eq!(buf.read_s32(0), -3);
    }

    #[test]
    fn array_i32_writes_both_widths() {
        let mut buf = [0i32; 2];
        buf.write_s16(0, -5);
        buf.write_s32(1, 0x00ff_ffff);
        assert_eq!(buf, [-5, 0x00ff_ffff]);
    }

    #[test]
    fn narrowing_write_truncates() {
        let mut buf = [0i16; 1];
        buf.write_s32(0, 0x0001_0002);
        assert_eq!(buf[0], 2);
    }
}
