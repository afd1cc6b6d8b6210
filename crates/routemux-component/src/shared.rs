//! Configuration hand-off between the control path and the copy path.
//!
//! The control path (command handler, parameter negotiation) may run on a
//! different thread than the copy driver. It builds a complete, validated
//! [`RouteSnapshot`] and publishes it with one `ArcSwap::store`; the copy
//! driver loads the current snapshot once per cycle and uses it for the whole
//! cycle. A rejected update never reaches the `ArcSwap`, so the copy path
//! sees either the old configuration or the new one, never a mix.
//!
//! Writers serialize on a `Mutex` so a read-modify-write such as parameter
//! negotiation cannot lose a concurrent `set_values`. The same lock holds the
//! frame format pinned by prepare: from prepare until reset, an update that
//! would change the format is rejected. The copy path never touches that
//! lock.

use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};
use parking_lot::Mutex;
use routemux_core::{FrameFormat, RouteConfig, RoutingKernel, kernel_for, wire};

use crate::error::MuxError;

/// One published configuration.
#[derive(Debug, Clone)]
pub struct RouteSnapshot {
    config: RouteConfig,
}

impl RouteSnapshot {
    /// Wraps a validated configuration.
    pub fn new(config: RouteConfig) -> Self {
        Self { config }
    }

    /// The routing configuration.
    pub fn config(&self) -> &RouteConfig {
        &self.config
    }
}

/// Kernel and sample size fixed when a component prepares.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PreparedKernel {
    pub(crate) kernel: &'static RoutingKernel,
    pub(crate) sample_bytes: usize,
}

struct RouteTable {
    current: ArcSwap<RouteSnapshot>,
    /// Format pinned by prepare, `None` while the component is unprepared.
    writer: Mutex<Option<FrameFormat>>,
}

/// Cloneable handle to a component's configuration.
///
/// Every clone publishes to and reads from the same component.
#[derive(Clone)]
pub struct ControlHandle {
    table: Arc<RouteTable>,
}

impl ControlHandle {
    /// Creates a table holding `config`.
    pub fn new(config: RouteConfig) -> Self {
        Self {
            table: Arc::new(RouteTable {
                current: ArcSwap::from_pointee(RouteSnapshot::new(config)),
                writer: Mutex::new(None),
            }),
        }
    }

    /// Wait-free view of the current snapshot.
    #[inline]
    pub fn load(&self) -> Guard<Arc<RouteSnapshot>> {
        self.table.current.load()
    }

    /// Owned reference to the current snapshot.
    pub fn snapshot(&self) -> Arc<RouteSnapshot> {
        self.table.current.load_full()
    }

    /// Frame format fixed by the last prepare, if the component is prepared.
    pub fn pinned_format(&self) -> Option<FrameFormat> {
        *self.table.writer.lock()
    }

    /// Validates and publishes a whole configuration.
    pub fn publish(&self, config: RouteConfig) -> Result<(), MuxError> {
        config.validate()?;
        let pinned = self.table.writer.lock();
        self.store(*pinned, config)
    }

    /// Decodes a routing blob and publishes it.
    ///
    /// On any error the current configuration stays in force.
    pub fn set_values(&self, blob: &[u8]) -> Result<(), MuxError> {
        let config = wire::decode(blob).inspect_err(|err| {
            tracing::warn!(%err, len = blob.len(), "routing blob rejected");
        })?;
        let pinned = self.table.writer.lock();
        self.store(*pinned, config)
    }

    /// Serializes the current configuration.
    pub fn get_values(&self) -> Vec<u8> {
        wire::encode(self.load().config())
    }

    /// Applies negotiated stream parameters to the current configuration.
    pub fn apply_params(&self, frame_format: FrameFormat, channels: u16) -> Result<(), MuxError> {
        let pinned = self.table.writer.lock();
        let config = self
            .load()
            .config()
            .with_stream_params(frame_format, channels)?;
        self.store(*pinned, config)
    }

    /// Resolves the kernel for the current format and pins that format.
    ///
    /// Nothing is pinned when the format has no kernel.
    pub(crate) fn pin_kernel(&self) -> Result<PreparedKernel, MuxError> {
        let mut pinned = self.table.writer.lock();
        let format = self.load().config().frame_format();
        let (Some(kernel), Some(sample_bytes)) = (kernel_for(format), format.sample_bytes())
        else {
            return Err(MuxError::UnsupportedFormat(format));
        };
        *pinned = Some(format);
        tracing::debug!(%format, "routing kernel resolved");
        Ok(PreparedKernel {
            kernel,
            sample_bytes,
        })
    }

    /// Releases the pinned format.
    pub(crate) fn unpin(&self) {
        *self.table.writer.lock() = None;
    }

    fn store(&self, pinned: Option<FrameFormat>, config: RouteConfig) -> Result<(), MuxError> {
        if let Some(active) = pinned
            && config.frame_format() != active
        {
            tracing::warn!(
                %active,
                requested = %config.frame_format(),
                "format change rejected while prepared"
            );
            return Err(MuxError::FormatLocked {
                active,
                requested: config.frame_format(),
            });
        }
        tracing::debug!(
            format = %config.frame_format(),
            channels = config.channels(),
            streams = config.num_streams(),
            "routing configuration published"
        );
        self.table
            .current
            .store(Arc::new(RouteSnapshot::new(config)));
        Ok(())
    }
}

impl std::fmt::Debug for ControlHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlHandle")
            .field("current", &*self.load())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routemux_core::{MAX_STREAMS, RouteError, StreamRoute};

    fn stereo_split() -> RouteConfig {
        RouteConfig::new(
            FrameFormat::S16Le,
            2,
            vec![StreamRoute::new(1, &[0b01]), StreamRoute::new(2, &[0b10])],
        )
        .unwrap()
    }

    #[test]
    fn pinned_format_rejects_format_changes() {
        let handle = ControlHandle::new(stereo_split());
        let prepared = handle.pin_kernel().unwrap();
        assert_eq!(prepared.kernel.format, FrameFormat::S16Le);
        assert_eq!(prepared.sample_bytes, 2);
        assert_eq!(handle.pinned_format(), Some(FrameFormat::S16Le));

        let err = handle.apply_params(FrameFormat::S32Le, 2).unwrap_err();
        assert_eq!(
            err,
            MuxError::FormatLocked {
                active: FrameFormat::S16Le,
                requested: FrameFormat::S32Le,
            }
        );
        assert_eq!(handle.load().config().frame_format(), FrameFormat::S16Le);

        // Same format still goes through.
        handle.apply_params(FrameFormat::S16Le, 2).unwrap();

        handle.unpin();
        handle.apply_params(FrameFormat::S32Le, 2).unwrap();
        assert_eq!(handle.load().config().frame_format(), FrameFormat::S32Le);
    }

    #[test]
    fn unroutable_format_is_not_pinned() {
        let handle = ControlHandle::new(RouteConfig::empty());
        handle.apply_params(FrameFormat::Float, 2).unwrap();

        assert_eq!(
            handle.pin_kernel().unwrap_err(),
            MuxError::UnsupportedFormat(FrameFormat::Float)
        );
        assert_eq!(handle.pinned_format(), None);
    }

    #[test]
    fn rejected_blob_keeps_previous() {
        let handle = ControlHandle::new(stereo_split());
        let before = handle.get_values();

        let mut too_many = before.clone();
        too_many[4] = (MAX_STREAMS + 1) as u8;
        assert!(matches!(
            handle.set_values(&too_many),
            Err(MuxError::Route(RouteError::TooManyStreams { .. }))
        ));
        assert_eq!(handle.get_values(), before);
        assert_eq!(*handle.load().config(), stereo_split());
    }

    #[test]
    fn params_keep_routes() {
        let handle = ControlHandle::new(stereo_split());
        handle.apply_params(FrameFormat::S24_4Le, 2).unwrap();

        let snap = handle.snapshot();
        assert_eq!(snap.config().frame_format(), FrameFormat::S24_4Le);
        assert_eq!(snap.config().streams(), stereo_split().streams());
    }

    #[test]
    fn snapshots_outlive_updates() {
        let handle = ControlHandle::new(stereo_split());
        let old = handle.snapshot();
        handle.publish(RouteConfig::empty()).unwrap();

        assert_eq!(old.config().num_streams(), 2);
        assert_eq!(handle.load().config().num_streams(), 0);
    }
}
