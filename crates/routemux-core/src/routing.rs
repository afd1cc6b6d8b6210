//! Mux and demux kernels.
//!
//! Both kernels are generic over [`SampleWidth`] and take trait objects for
//! their buffers, so one instantiation per width fits the function pointer
//! types of the dispatch table. Neither kernel checks buffer space: the copy
//! driver has already clamped `frames` to what every buffer can take.

use crate::buffer::{SampleSink, SampleSource};
use crate::config::{MAX_CHANNELS, MAX_STREAMS, RouteConfig, StreamRoute};
use crate::sample::SampleWidth;

/// Source slots of one mux pass, indexed like the configured routes.
///
/// `None` marks a slot with no connected, ready buffer this cycle; it
/// contributes nothing.
pub type MuxSources<'a> = [Option<&'a dyn SampleSource>; MAX_STREAMS];

/// Sums the channels selected by `mask` in the frame starting at `offset`.
///
/// Bit `i` of `mask` selects the sample at `offset + i`, for `i` below
/// `channels`. A zero mask returns zero without reading the source.
#[inline]
pub fn accumulate<W: SampleWidth, S: SampleSource + ?Sized>(
    source: &S,
    channels: u8,
    offset: usize,
    mask: u8,
) -> W::Acc {
    let mut acc = W::Acc::default();
    if mask == 0 {
        return acc;
    }

    for ch in 0..usize::from(channels).min(MAX_CHANNELS) {
        if mask & (1 << ch) != 0 {
            acc += W::load(source, offset + ch);
        }
    }
    acc
}

/// Routes one source stream into one sink stream.
///
/// The source carries `config.channels()` interleaved channels; the sink
/// carries `route.channels`. Output channel `ch` of each frame is the sum of
/// the source channels selected by `route.mask[ch]`, saturated to the width.
pub fn demux<W: SampleWidth>(
    sink: &mut dyn SampleSink,
    source: &dyn SampleSource,
    frames: usize,
    config: &RouteConfig,
    route: &StreamRoute,
) {
    let in_channels = primary_channels(config);
    let out_channels = usize::from(route.channels).min(MAX_CHANNELS);

    for frame in 0..frames {
        let in_offset = frame * usize::from(in_channels);
        let out_offset = frame * out_channels;
        for out_ch in 0..out_channels {
            let acc = accumulate::<W, _>(source, in_channels, in_offset, route.mask[out_ch]);
            W::store(sink, out_offset + out_ch, acc);
        }
    }
}

/// Mixes every active source slot into one sink stream.
///
/// Slot `j` is read with the channel count and masks of
/// `config.streams()[j]`; the sink carries `config.channels()` channels.
/// Contributions from all sources are summed first and saturated once per
/// output sample, so a mix that only fits after combination is not clipped
/// early.
pub fn mux<W: SampleWidth>(
    sink: &mut dyn SampleSink,
    sources: &MuxSources<'_>,
    frames: usize,
    config: &RouteConfig,
) {
    let out_channels = usize::from(primary_channels(config));
    let routes = config.streams();

    for frame in 0..frames {
        let out_offset = frame * out_channels;
        for out_ch in 0..out_channels {
            let mut acc = W::Acc::default();
            for (slot, route) in sources.iter().zip(routes) {
                let Some(source) = slot else {
                    continue;
                };
                acc += accumulate::<W, _>(
                    *source,
                    route.channels,
                    frame * usize::from(route.channels),
                    route.mask_for(out_ch),
                );
            }
            W::store(sink, out_offset + out_ch, acc);
        }
    }
}

#[inline]
fn primary_channels(config: &RouteConfig) -> u8 {
    config.channels().min(MAX_CHANNELS as u16) as u8
}
