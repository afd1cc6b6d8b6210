//! Configuration and codec errors.

use thiserror::Error;

/// Reasons a routing configuration or blob is rejected.
///
/// All of these are invalid-argument conditions: the caller's previous valid
/// configuration stays in force.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// More routes than a component can hold.
    #[error("too many streams: {count} (max {max})")]
    TooManyStreams {
        /// Routes requested.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// Two routes claim the same pipeline.
    #[error("duplicate pipeline id {0}")]
    DuplicatePipeline(u32),

    /// A route carries more channels than the platform supports.
    #[error("stream for pipeline {pipeline_id} has {channels} channels (max {max})")]
    TooManyChannels {
        /// Pipeline owning the route.
        pipeline_id: u32,
        /// Channels requested.
        channels: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// The primary side carries more channels than the platform supports.
    #[error("primary stream has {channels} channels (max {max})")]
    TooManyPrimaryChannels {
        /// Channels requested.
        channels: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// A blob ended before its declared contents.
    #[error("truncated blob: need {needed} bytes, got {got}")]
    Truncated {
        /// Bytes the header promises.
        needed: usize,
        /// Bytes actually present.
        got: usize,
    },

    /// A blob carries bytes past its declared contents.
    #[error("blob has {extra} trailing bytes")]
    TrailingBytes {
        /// Bytes past the last route.
        extra: usize,
    },

    /// Storage for the route list could not be allocated.
    #[error("out of memory allocating {streams} routes")]
    OutOfMemory {
        /// Routes that were being allocated.
        streams: usize,
    },
}
