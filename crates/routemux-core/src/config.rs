//! Routing configuration model.
//!
//! A [`RouteConfig`] is built once, validated as a whole, and then treated as
//! immutable. Replacing a configuration means building a new value; nothing
//! in this module edits a validated configuration in place, so a rejected
//! update can never leave a half-written one behind.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::error::RouteError;
use crate::format::FrameFormat;

/// Maximum number of streams one component routes.
pub const MAX_STREAMS: usize = 4;

/// Platform-wide maximum channel count of a single stream.
///
/// Also the width of a routing mask: channel `i` of the counterpart stream
/// is selected by bit `i`.
pub const MAX_CHANNELS: usize = 8;

/// Platform-wide maximum number of streams on one pipeline core.
pub const PLATFORM_MAX_STREAMS: usize = 16;

const _: () = assert!(MAX_STREAMS < PLATFORM_MAX_STREAMS);
const _: () = assert!(MAX_CHANNELS <= u8::BITS as usize);

/// Routing descriptor of one logical stream.
///
/// `mask[ch]` selects which channels of the counterpart stream feed channel
/// `ch` of this stream. Masks past `channels` are carried (they are part of
/// the wire layout) but never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StreamRoute {
    /// Owning pipeline, unique within one configuration.
    pub pipeline_id: u32,
    /// Interleaved channels carried by this stream.
    pub channels: u8,
    /// Per-channel routing masks.
    pub mask: [u8; MAX_CHANNELS],
}

impl StreamRoute {
    /// Creates a route with one mask per channel.
    ///
    /// The channel count is `masks.len()`; masks beyond [`MAX_CHANNELS`] are
    /// dropped, and [`RouteConfig::new`] rejects the route if that happens
    /// because `channels` still records the requested count.
    pub fn new(pipeline_id: u32, masks: &[u8]) -> Self {
        let mut mask = [0u8; MAX_CHANNELS];
        for (dst, &src) in mask.iter_mut().zip(masks) {
            *dst = src;
        }
        Self {
            pipeline_id,
            channels: u8::try_from(masks.len()).unwrap_or(u8::MAX),
            mask,
        }
    }

    /// Creates a route whose mask count differs from its channel count.
    ///
    /// A mux route is indexed by output channel: it needs one mask per
    /// primary channel while its bits select among `channels` source
    /// channels. Only the first [`MAX_CHANNELS`] masks fit, so callers
    /// building routes from external input check the mask count first.
    pub fn with_channels(pipeline_id: u32, channels: u8, masks: &[u8]) -> Self {
        Self {
            channels,
            ..Self::new(pipeline_id, masks)
        }
    }

    /// Masks of the channels this stream actually carries.
    pub fn masks(&self) -> &[u8] {
        &self.mask[..usize::from(self.channels).min(MAX_CHANNELS)]
    }

    /// Mask for one channel, zero past the end.
    #[inline]
    pub fn mask_for(&self, channel: usize) -> u8 {
        self.mask.get(channel).copied().unwrap_or(0)
    }
}

/// Full routing configuration of one component instance.
///
/// Invariants, checked by [`new()`](Self::new) and every replacement:
///
/// - at most [`MAX_STREAMS`] routes
/// - pipeline ids pairwise distinct
/// - every channel count (primary and per route) at most [`MAX_CHANNELS`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteConfig {
    frame_format: FrameFormat,
    channels: u16,
    streams: Vec<StreamRoute>,
}

impl RouteConfig {
    /// An empty configuration: no routes, no channels.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds and validates a configuration.
    ///
    /// `channels` is the primary side: the single source of a demux, the
    /// single sink of a mux.
    pub fn new(
        frame_format: FrameFormat,
        channels: u16,
        streams: Vec<StreamRoute>,
    ) -> Result<Self, RouteError> {
        let config = Self {
            frame_format,
            channels,
            streams,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every invariant of the model.
    pub fn validate(&self) -> Result<(), RouteError> {
        validate_primary_channels(self.channels)?;

        if self.streams.len() > MAX_STREAMS {
            return Err(RouteError::TooManyStreams {
                count: self.streams.len(),
                max: MAX_STREAMS,
            });
        }

        for (i, route) in self.streams.iter().enumerate() {
            if usize::from(route.channels) > MAX_CHANNELS {
                return Err(RouteError::TooManyChannels {
                    pipeline_id: route.pipeline_id,
                    channels: usize::from(route.channels),
                    max: MAX_CHANNELS,
                });
            }
            if self.streams[..i]
                .iter()
                .any(|other| other.pipeline_id == route.pipeline_id)
            {
                return Err(RouteError::DuplicatePipeline(route.pipeline_id));
            }
        }

        Ok(())
    }

    /// Frame format shared by every stream.
    #[inline]
    pub fn frame_format(&self) -> FrameFormat {
        self.frame_format
    }

    /// Channel count of the primary side.
    #[inline]
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Routes in configuration order. A route's index is its mux slot.
    #[inline]
    pub fn streams(&self) -> &[StreamRoute] {
        &self.streams
    }

    /// Number of configured routes.
    #[inline]
    pub fn num_streams(&self) -> usize {
        self.streams.len()
    }

    /// Index of the route owned by `pipeline_id` (linear search).
    pub fn stream_index(&self, pipeline_id: u32) -> Option<usize> {
        self.streams
            .iter()
            .position(|route| route.pipeline_id == pipeline_id)
    }

    /// Route owned by `pipeline_id`.
    pub fn route(&self, pipeline_id: u32) -> Option<&StreamRoute> {
        self.streams
            .iter()
            .find(|route| route.pipeline_id == pipeline_id)
    }

    /// Copy of this configuration with negotiated stream parameters applied.
    ///
    /// Routes are kept as they are.
    pub fn with_stream_params(
        &self,
        frame_format: FrameFormat,
        channels: u16,
    ) -> Result<Self, RouteError> {
        validate_primary_channels(channels)?;
        Ok(Self {
            frame_format,
            channels,
            streams: self.streams.clone(),
        })
    }
}

fn validate_primary_channels(channels: u16) -> Result<(), RouteError> {
    if usize::from(channels) > MAX_CHANNELS {
        return Err(RouteError::TooManyPrimaryChannels {
            channels: usize::from(channels),
            max: MAX_CHANNELS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "std"))]
    use alloc::vec;

    fn four_streams() -> Vec<StreamRoute> {
        vec![
            StreamRoute::new(1, &[1, 2]),
            StreamRoute::new(3, &[1, 2]),
            StreamRoute::new(5, &[1, 2]),
            StreamRoute::new(7, &[1, 2]),
        ]
    }

    #[test]
    fn accepts_max_streams() {
        let config = RouteConfig::new(FrameFormat::S16Le, 2, four_streams()).unwrap();
        assert_eq!(config.num_streams(), MAX_STREAMS);
        assert_eq!(config.streams()[2].pipeline_id, 5);
        assert_eq!(config.streams()[2].masks(), &[1, 2]);
    }

    #[test]
    fn rejects_one_stream_too_many() {
        let mut streams = four_streams();
        streams.push(StreamRoute::new(9, &[1]));
        assert_eq!(
            RouteConfig::new(FrameFormat::S16Le, 2, streams),
            Err(RouteError::TooManyStreams {
                count: MAX_STREAMS + 1,
                max: MAX_STREAMS
            })
        );
    }

    #[test]
    fn rejects_repeated_pipeline_id() {
        let mut streams = four_streams();
        streams[3] = StreamRoute::new(1, &[1, 2]);
        assert_eq!(
            RouteConfig::new(FrameFormat::S16Le, 2, streams),
            Err(RouteError::DuplicatePipeline(1))
        );
    }

    #[test]
    fn rejects_wide_streams() {
        let masks = [1u8; MAX_CHANNELS + 1];
        let err = RouteConfig::new(FrameFormat::S16Le, 2, vec![StreamRoute::new(4, &masks)])
            .unwrap_err();
        assert!(matches!(
            err,
            RouteError::TooManyChannels { pipeline_id: 4, .. }
        ));

        let err = RouteConfig::new(FrameFormat::S16Le, 9, Vec::new()).unwrap_err();
        assert!(matches!(err, RouteError::TooManyPrimaryChannels { .. }));
    }

    #[test]
    fn stream_index_by_pipeline() {
        let mut streams = vec![
            StreamRoute::new(0, &[1]),
            StreamRoute::new(2, &[1]),
            StreamRoute::new(4, &[1]),
            StreamRoute::new(15, &[1]),
        ];
        let config = RouteConfig::new(FrameFormat::S16Le, 1, streams.clone()).unwrap();
        assert_eq!(config.stream_index(15), Some(3));
        assert_eq!(config.stream_index(1), None);

        streams.truncate(1);
        let config = RouteConfig::new(FrameFormat::S16Le, 1, streams).unwrap();
        assert_eq!(config.route(0).map(|r| r.channels), Some(1));
        assert!(config.route(2).is_none());
    }

    #[test]
    fn stream_params_keep_routes() {
        let config = RouteConfig::new(FrameFormat::S16Le, 2, four_streams()).unwrap();
        let negotiated = config
            .with_stream_params(FrameFormat::S32Le, 4)
            .unwrap();
        assert_eq!(negotiated.frame_format(), FrameFormat::S32Le);
        assert_eq!(negotiated.channels(), 4);
        assert_eq!(negotiated.streams(), config.streams());

        assert!(config.with_stream_params(FrameFormat::S32Le, 16).is_err());
    }

    #[test]
    fn with_channels_keeps_all_masks() {
        let route = StreamRoute::with_channels(3, 1, &[0b1, 0b0, 0b1]);
        assert_eq!(route.channels, 1);
        assert_eq!(route.mask_for(2), 0b1);
        assert_eq!(route.masks(), &[0b1]);
    }

    #[test]
    fn mask_for_past_end_is_zero() {
        let route = StreamRoute::new(1, &[0xff]);
        assert_eq!(route.mask_for(0), 0xff);
        assert_eq!(route.mask_for(1), 0);
        assert_eq!(route.mask_for(MAX_CHANNELS + 3), 0);
    }
}
