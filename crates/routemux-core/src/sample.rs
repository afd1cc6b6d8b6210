//! Sample width strategies and saturating conversions.
//!
//! Each supported width is a zero-sized type implementing [`SampleWidth`].
//! The routing kernels are written once, generic over the width, and
//! monomorphised per format in the dispatch table. The only things that vary
//! between widths are the accumulator type, how a stored sample is widened
//! into it, and the range the accumulator saturates to on write-back.
//!
//! Accumulators are wide enough that summing every channel of every stream
//! (8 channels x 4 streams) cannot overflow before the final saturation:
//! `i32` holds 32 full-scale 24-bit samples, and 32-bit samples accumulate
//! in `i64`.

use core::fmt::Debug;
use core::ops::AddAssign;

use crate::buffer::{SampleSink, SampleSource};
use crate::format::FrameFormat;

/// Largest value representable in 24 bits.
pub const INT24_MAX: i32 = (1 << 23) - 1;
/// Smallest value representable in 24 bits.
pub const INT24_MIN: i32 = -(1 << 23);

/// Sign-extends the low 24 bits of a 32-bit container.
///
/// Bits 24..32 of the input are ignored.
#[inline]
pub const fn sign_extend_s24(raw: i32) -> i32 {
    (raw << 8) >> 8
}

/// Clamps to the `i16` range.
#[inline]
pub fn sat_int16(x: i32) -> i16 {
    x.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Clamps to the signed 24-bit range. The result still lives in an `i32`.
#[inline]
pub fn sat_int24(x: i32) -> i32 {
    x.clamp(INT24_MIN, INT24_MAX)
}

/// Clamps to the `i32` range.
#[inline]
pub fn sat_int32(x: i64) -> i32 {
    x.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Read/widen/saturate/write strategy for one sample width.
pub trait SampleWidth: 'static {
    /// Frame format this width services.
    const FORMAT: FrameFormat;

    /// Accumulator wide enough for a full mux sum without overflow.
    type Acc: Copy + Default + AddAssign + PartialEq + Debug;

    /// Reads the sample at `idx` and widens it to the accumulator.
    fn load<S: SampleSource + ?Sized>(source: &S, idx: usize) -> Self::Acc;

    /// Saturates `acc` to the target width and writes it at `idx`.
    fn store<D: SampleSink + ?Sized>(sink: &mut D, idx: usize, acc: Self::Acc);
}

/// 16-bit samples in 16-bit containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct S16;

/// 24-bit samples in the low bits of 32-bit containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct S24;

/// 32-bit samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct S32;

impl SampleWidth for S16 {
    const FORMAT: FrameFormat = FrameFormat::S16Le;
    type Acc = i32;

    #[inline]
    fn load<S: SampleSource + ?Sized>(source: &S, idx: usize) -> i32 {
        i32::from(source.read_s16(idx))
    }

    #[inline]
    fn store<D: SampleSink + ?Sized>(sink: &mut D, idx: usize, acc: i32) {
        sink.write_s16(idx, sat_int16(acc));
    }
}

impl SampleWidth for S24 {
    const FORMAT: FrameFormat = FrameFormat::S24_4Le;
    type Acc = i32;

    #[inline]
    fn load<S: SampleSource + ?Sized>(source: &S, idx: usize) -> i32 {
        sign_extend_s24(source.read_s32(idx))
    }

    #[inline]
    fn store<D: SampleSink + ?Sized>(sink: &mut D, idx: usize, acc: i32) {
        sink.write_s32(idx, sat_int24(acc));
    }
}

impl SampleWidth for S32 {
    const FORMAT: FrameFormat = FrameFormat::S32Le;
    type Acc = i64;

    #[inline]
    fn load<S: SampleSource + ?Sized>(source: &S, idx: usize) -> i64 {
        i64::from(source.read_s32(idx))
    }

    #[inline]
    fn store<D: SampleSink + ?Sized>(sink: &mut D, idx: usize, acc: i64) {
        sink.write_s32(idx, sat_int32(acc));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_extension_from_bit_23() {
        assert_eq!(sign_extend_s24(0x0000_0001), 1);
        assert_eq!(sign_extend_s24(0x00ff_ffff), -1);
        assert_eq!(sign_extend_s24(0x0080_0000), INT24_MIN);
        assert_eq!(sign_extend_s24(0x007f_ffff), INT24_MAX);
        // Garbage in the top byte is discarded.
        assert_eq!(sign_extend_s24(0x7f00_0005_u32 as i32), 5);
        assert_eq!(sign_extend_s24(0xab80_0000_u32 as i32), INT24_MIN);
    }

    #[test]
    fn saturation_passes_in_range_values() {
        assert_eq!(sat_int16(-1234), -1234);
        assert_eq!(sat_int24(4_000_000), 4_000_000);
        assert_eq!(sat_int32(-2_000_000_000), -2_000_000_000);
    }

    #[test]
    fn saturation_clamps_instead_of_wrapping() {
        assert_eq!(sat_int16(40_000), i16::MAX);
        assert_eq!(sat_int16(-40_000), i16::MIN);
        assert_eq!(sat_int24(INT24_MAX + 1), INT24_MAX);
        assert_eq!(sat_int24(INT24_MIN - 1), INT24_MIN);
        assert_eq!(sat_int32(i64::from(i32::MAX) + 1), i32::MAX);
        assert_eq!(sat_int32(i64::from(i32::MIN) * 3), i32::MIN);
    }

    #[test]
    fn s24_store_keeps_32_bit_container() {
        let mut sink = [0i32; 1];
        S24::store(&mut sink, 0, -5);
        assert_eq!(sink[0], -5);
        S24::store(&mut sink, 0, i32::MAX);
        assert_eq!(sink[0], INT24_MAX);
    }

    #[test]
    fn s24_load_sign_extends() {
        let source = [0x00ff_fffe_i32];
        assert_eq!(S24::load(&source, 0), -2);
    }

    #[test]
    fn s32_accumulates_past_i32() {
        let source = [i32::MAX, i32::MAX];
        let mut acc = S32::load(&source, 0);
        acc += S32::load(&source, 1);
        assert_eq!(acc, 2 * i64::from(i32::MAX));
        let mut sink = [0i32; 1];
        S32::store(&mut sink, 0, acc);
        assert_eq!(sink[0], i32::MAX);
    }
}
