//! Per-cycle copy driver.
//!
//! Both directions follow the same shape: size the cycle from a single look
//! at every endpoint's accounting, run the kernel once, then commit produce
//! and consume counts. Nothing is committed for an endpoint the cycle did
//! not write or read.

use routemux_core::{MAX_STREAMS, MuxSources, RouteConfig, RoutingKernel};

use crate::endpoint::{Endpoint, as_sink, as_source};
use crate::error::MuxError;
use crate::xrun::{XrunEvent, XrunKind};

/// Outcome of one successful copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyReport {
    /// Frames moved through the kernel.
    pub frames: usize,
    /// Endpoints skipped this cycle because they had nothing to move.
    pub xruns: usize,
}

/// One-source, many-sink cycle.
///
/// Every serviced sink receives the same number of frames, the minimum over
/// them; the source is consumed by that amount once. Sinks without a route,
/// with the wrong channel count, or with a stopped peer are skipped. A sink
/// that could take zero frames is reported through `on_xrun` and skipped;
/// if every routed sink is in that situation the cycle fails with
/// [`MuxError::Xrun`] and no accounting changes.
pub(crate) fn demux_copy(
    kernel: &RoutingKernel,
    sample_bytes: usize,
    config: &RouteConfig,
    sources: &mut [&mut dyn Endpoint],
    sinks: &mut [&mut dyn Endpoint],
    on_xrun: &mut dyn FnMut(XrunEvent),
) -> Result<CopyReport, MuxError> {
    if sinks.is_empty() {
        return Ok(CopyReport::default());
    }
    let Some(source) = sources.first() else {
        return Ok(CopyReport::default());
    };
    if !source.is_active() {
        tracing::trace!("demux source not active, skipping cycle");
        return Ok(CopyReport::default());
    }
    check_primary(config, &**source)?;

    let avail = source.avail_frames(sample_bytes);

    // (sink index, route index) of every sink serviced this cycle.
    let mut targets = [(0usize, 0usize); MAX_STREAMS];
    let mut count = 0;
    let mut frames = usize::MAX;
    let mut xruns = 0;
    let mut last_xrun = XrunKind::Underrun;

    for (i, sink) in sinks.iter().enumerate() {
        if !sink.is_active() {
            continue;
        }
        let Some(r) = config.stream_index(sink.pipeline_id()) else {
            continue;
        };
        let route = &config.streams()[r];
        if sink.channels() != u16::from(route.channels) {
            tracing::debug!(
                pipeline_id = route.pipeline_id,
                route = route.channels,
                endpoint = sink.channels(),
                "demux sink channel count disagrees with its route"
            );
            continue;
        }
        if targets[..count].iter().any(|&(_, used)| used == r) {
            continue;
        }

        let free = sink.free_frames(sample_bytes);
        let sink_frames = avail.min(free);
        if sink_frames == 0 {
            let kind = if avail == 0 {
                XrunKind::Underrun
            } else {
                XrunKind::Overrun
            };
            tracing::trace!(pipeline_id = route.pipeline_id, %kind, "demux sink xrun");
            on_xrun(XrunEvent {
                kind,
                pipeline_id: route.pipeline_id,
                frames: avail.max(free),
            });
            xruns += 1;
            last_xrun = kind;
            continue;
        }

        targets[count] = (i, r);
        count += 1;
        frames = frames.min(sink_frames);
    }

    if count == 0 {
        if xruns > 0 {
            return Err(MuxError::Xrun(last_xrun));
        }
        return Ok(CopyReport { frames: 0, xruns });
    }

    let source = &*sources[0];
    for &(i, r) in &targets[..count] {
        let route = &config.streams()[r];
        let sink = &mut *sinks[i];
        (kernel.demux)(as_sink(&mut *sink), as_source(source), frames, config, route);
        let bytes = frames * sink.frame_bytes(sample_bytes);
        sink.produce(bytes);
    }

    let bytes = frames * sources[0].frame_bytes(sample_bytes);
    sources[0].consume(bytes);

    Ok(CopyReport { frames, xruns })
}

/// Many-source, one-sink cycle.
///
/// The first sink is the output. Each source is matched to its route slot by
/// pipeline id; unmatched, stopped or misconfigured sources are absent and
/// contribute silence. The frame count is the minimum over the sink's free
/// space and every present source's data; zero fails with
/// [`MuxError::Xrun`] before anything is written.
pub(crate) fn mux_copy(
    kernel: &RoutingKernel,
    sample_bytes: usize,
    config: &RouteConfig,
    sources: &mut [&mut dyn Endpoint],
    sinks: &mut [&mut dyn Endpoint],
    on_xrun: &mut dyn FnMut(XrunEvent),
) -> Result<CopyReport, MuxError> {
    if sources.is_empty() {
        return Ok(CopyReport::default());
    }
    let Some(sink) = sinks.first_mut() else {
        return Ok(CopyReport::default());
    };
    if !sink.is_active() {
        tracing::trace!("mux sink not active, skipping cycle");
        return Ok(CopyReport::default());
    }
    check_primary(config, &**sink)?;

    // Source index per route slot.
    let mut slots: [Option<usize>; MAX_STREAMS] = [None; MAX_STREAMS];
    for (i, source) in sources.iter().enumerate() {
        if !source.is_active() {
            continue;
        }
        let Some(j) = config.stream_index(source.pipeline_id()) else {
            continue;
        };
        let route = &config.streams()[j];
        if source.channels() != u16::from(route.channels) {
            tracing::debug!(
                pipeline_id = route.pipeline_id,
                route = route.channels,
                endpoint = source.channels(),
                "mux source channel count disagrees with its route"
            );
            continue;
        }
        if slots[j].is_none() {
            slots[j] = Some(i);
        }
    }

    if slots.iter().all(Option::is_none) {
        return Ok(CopyReport::default());
    }

    let free = sink.free_frames(sample_bytes);
    let mut frames = free;
    let mut starved = None;
    for i in slots.iter().flatten().copied() {
        let avail = sources[i].avail_frames(sample_bytes);
        if avail < frames {
            frames = avail;
            starved = Some(sources[i].pipeline_id());
        }
    }

    if frames == 0 {
        let (kind, pipeline_id) = match starved {
            Some(pipeline_id) if free > 0 => (XrunKind::Underrun, pipeline_id),
            _ => (XrunKind::Overrun, sink.pipeline_id()),
        };
        tracing::trace!(pipeline_id, %kind, "mux xrun");
        on_xrun(XrunEvent {
            kind,
            pipeline_id,
            frames: 0,
        });
        return Err(MuxError::Xrun(kind));
    }

    {
        let mut inputs: MuxSources<'_> = [None; MAX_STREAMS];
        for (input, slot) in inputs.iter_mut().zip(&slots) {
            if let Some(i) = *slot {
                *input = Some(as_source(&*sources[i]));
            }
        }
        (kernel.mux)(as_sink(&mut **sink), &inputs, frames, config);
    }

    let bytes = frames * sink.frame_bytes(sample_bytes);
    sink.produce(bytes);
    for i in slots.iter().flatten().copied() {
        let bytes = frames * sources[i].frame_bytes(sample_bytes);
        sources[i].consume(bytes);
    }

    Ok(CopyReport { frames, xruns: 0 })
}

fn check_primary(config: &RouteConfig, endpoint: &dyn Endpoint) -> Result<(), MuxError> {
    if endpoint.channels() != config.channels() {
        return Err(MuxError::ChannelMismatch {
            expected: config.channels(),
            got: endpoint.channels(),
        });
    }
    Ok(())
}
