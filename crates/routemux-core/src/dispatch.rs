//! Format-keyed table of routing kernels.
//!
//! Resolved once when a component prepares (or when a new configuration is
//! published), never per frame. Formats absent from [`KERNELS`], such as
//! floating point, have no kernel and cannot be prepared.

use crate::buffer::{SampleSink, SampleSource};
use crate::config::{RouteConfig, StreamRoute};
use crate::format::FrameFormat;
use crate::routing::{self, MuxSources};
use crate::sample::{S16, S24, S32};

/// Mux kernel: every active source slot into one sink.
pub type MuxFn = fn(&mut dyn SampleSink, &MuxSources<'_>, usize, &RouteConfig);

/// Demux kernel: the primary source into one sink route.
pub type DemuxFn = fn(&mut dyn SampleSink, &dyn SampleSource, usize, &RouteConfig, &StreamRoute);

/// The `(mux, demux)` pair servicing one frame format.
#[derive(Debug, Clone, Copy)]
pub struct RoutingKernel {
    /// Format this pair is instantiated for.
    pub format: FrameFormat,
    /// Combiner kernel.
    pub mux: MuxFn,
    /// Splitter kernel.
    pub demux: DemuxFn,
}

/// Every registered kernel pair, in lookup order.
pub static KERNELS: [RoutingKernel; 3] = [
    RoutingKernel {
        format: FrameFormat::S16Le,
        mux: routing::mux::<S16>,
        demux: routing::demux::<S16>,
    },
    RoutingKernel {
        format: FrameFormat::S24_4Le,
        mux: routing::mux::<S24>,
        demux: routing::demux::<S24>,
    },
    RoutingKernel {
        format: FrameFormat::S32Le,
        mux: routing::mux::<S32>,
        demux: routing::demux::<S32>,
    },
];

/// Kernel pair for `format`, or `None` if the format is not routable.
pub fn kernel_for(format: FrameFormat) -> Option<&'static RoutingKernel> {
    let kernel = KERNELS.iter().find(|k| k.format == format);
    #[cfg(feature = "tracing")]
    if kernel.is_none() {
        tracing::debug!("no routing kernel for frame format {format}");
    }
    kernel
}

/// Mux kernel for `format`.
pub fn mux_fn(format: FrameFormat) -> Option<MuxFn> {
    kernel_for(format).map(|k| k.mux)
}

/// Demux kernel for `format`.
pub fn demux_fn(format: FrameFormat) -> Option<DemuxFn> {
    kernel_for(format).map(|k| k.demux)
}
