//! Property-based tests for the routing kernels and the wire codec.
//!
//! Kernel outputs are compared against a naive per-sample reference that
//! widens to i64 and clamps once at the end.

use proptest::prelude::*;
use routemux_core::{
    FrameFormat, MAX_CHANNELS, MAX_STREAMS, MuxSources, RouteConfig, S16, S24, S32, StreamRoute,
    accumulate, demux, mux, sign_extend_s24, wire,
};

/// Masked sum of one frame, computed in i64.
fn reference_sum(frame: &[i64], mask: u8) -> i64 {
    frame
        .iter()
        .enumerate()
        .filter(|(ch, _)| mask & (1 << ch) != 0)
        .map(|(_, &v)| v)
        .sum()
}

fn clamp_to(bits: u32, value: i64) -> i64 {
    let max = (1i64 << (bits - 1)) - 1;
    value.clamp(-max - 1, max)
}

/// One mask per output channel, one to eight channels.
fn masks_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=MAX_CHANNELS)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// A zero mask contributes zero whatever the source holds.
    #[test]
    fn zero_mask_contributes_nothing(
        frame in prop::array::uniform8(any::<i32>()),
        channels in 0u8..=8,
    ) {
        prop_assert_eq!(accumulate::<S32, _>(&frame, channels, 0, 0), 0i64);
        prop_assert_eq!(accumulate::<S24, _>(&frame, channels, 0, 0), 0);
    }

    /// The 32-bit accumulator holds the exact masked sum.
    #[test]
    fn s32_accumulate_is_exact(
        frame in prop::array::uniform8(any::<i32>()),
        mask in any::<u8>(),
    ) {
        let wide: Vec<i64> = frame.iter().map(|&v| i64::from(v)).collect();
        prop_assert_eq!(
            accumulate::<S32, _>(&frame, 8, 0, mask),
            reference_sum(&wide, mask)
        );
    }

    /// 16-bit demux equals the clamped reference for any routing.
    #[test]
    fn s16_demux_matches_reference(
        in_channels in 1u16..=8,
        masks in masks_strategy(),
        samples in prop::collection::vec(any::<i16>(), 64),
    ) {
        let route = StreamRoute::new(7, &masks);
        let config = RouteConfig::new(FrameFormat::S16Le, in_channels, vec![route]).unwrap();
        let frames = samples.len() / usize::from(in_channels);
        let mut sink = vec![0i16; frames * masks.len()];

        demux::<S16>(&mut sink, &samples, frames, &config, &route);

        for frame in 0..frames {
            let start = frame * usize::from(in_channels);
            let wide: Vec<i64> = samples[start..start + usize::from(in_channels)]
                .iter()
                .map(|&v| i64::from(v))
                .collect();
            for (ch, &mask) in masks.iter().enumerate() {
                let expected = clamp_to(16, reference_sum(&wide, mask));
                prop_assert_eq!(i64::from(sink[frame * masks.len() + ch]), expected);
            }
        }
    }

    /// 24-bit output always stays inside the signed 24-bit range.
    #[test]
    fn s24_demux_stays_in_range(
        samples in prop::collection::vec(-(1i32 << 23)..(1i32 << 23), 32),
        mask in any::<u8>(),
    ) {
        let route = StreamRoute::new(1, &[mask]);
        let config = RouteConfig::new(FrameFormat::S24_4Le, 8, vec![route]).unwrap();
        let mut sink = vec![0i32; 4];

        demux::<S24>(&mut sink, &samples, 4, &config, &route);

        for (frame, &out) in sink.iter().enumerate() {
            prop_assert!((-(1 << 23)..(1 << 23)).contains(&out));
            let wide: Vec<i64> = samples[frame * 8..frame * 8 + 8]
                .iter()
                .map(|&v| i64::from(sign_extend_s24(v)))
                .collect();
            prop_assert_eq!(i64::from(out), clamp_to(24, reference_sum(&wide, mask)));
        }
    }

    /// Mux saturates the sum over every source, not each source alone.
    #[test]
    fn s32_mux_saturates_once(
        inputs in prop::collection::vec(prop::collection::vec(any::<i32>(), 2), MAX_STREAMS),
        masks in prop::collection::vec(0u8..4, MAX_STREAMS),
    ) {
        // Two channels per source, both feeding output channel 0.
        let streams = (0..MAX_STREAMS)
            .map(|j| StreamRoute {
                pipeline_id: j as u32,
                channels: 2,
                mask: [masks[j], 0, 0, 0, 0, 0, 0, 0],
            })
            .collect();
        let config = RouteConfig::new(FrameFormat::S32Le, 1, streams).unwrap();
        let sources: MuxSources<'_> = [
            Some(&inputs[0]),
            Some(&inputs[1]),
            Some(&inputs[2]),
            Some(&inputs[3]),
        ];
        let mut sink = vec![0i32; 1];

        mux::<S32>(&mut sink, &sources, 1, &config);

        let total: i64 = inputs
            .iter()
            .zip(&masks)
            .map(|(input, &mask)| {
                let wide: Vec<i64> = input.iter().map(|&v| i64::from(v)).collect();
                reference_sum(&wide, mask)
            })
            .sum();
        prop_assert_eq!(i64::from(sink[0]), clamp_to(32, total));
    }

    /// Any valid configuration survives the wire codec unchanged.
    #[test]
    fn wire_preserves_valid_configs(
        raw_format in 0u16..8,
        channels in 0u16..=8,
        routes in prop::collection::btree_map(any::<u32>(), masks_strategy(), 0..=MAX_STREAMS),
    ) {
        let streams = routes
            .iter()
            .map(|(&pid, masks)| StreamRoute::new(pid, masks))
            .collect();
        let config = RouteConfig::new(FrameFormat::from_raw(raw_format), channels, streams).unwrap();

        let blob = wire::encode(&config);
        prop_assert_eq!(blob.len(), wire::encoded_len(config.num_streams()));
        prop_assert_eq!(wire::decode(&blob).unwrap(), config);
    }

    /// Decoding arbitrary bytes never panics.
    #[test]
    fn wire_decode_total(bytes in prop::collection::vec(any::<u8>(), 0..96)) {
        let _ = wire::decode(&bytes);
    }
}
