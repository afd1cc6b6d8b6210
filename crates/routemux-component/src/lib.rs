//! Routemux Component - the mux/demux pipeline component
//!
//! Wraps the routing kernels of [`routemux_core`] in a pipeline component:
//! construction from a host descriptor, control commands, the lifecycle state
//! machine, and the per-cycle copy driver that sizes each cycle from the
//! connected buffers and commits their accounting.
//!
//! # Threads
//!
//! The configuration is published through an `ArcSwap`, so a
//! [`ControlHandle`] on a control thread can replace it while the pipeline
//! thread is inside [`MuxComponent::copy`]. Each copy loads the configuration
//! once and sees one complete version of it.
//!
//! # Example
//!
//! ```rust
//! use routemux_component::{ComponentType, Endpoint, MuxComponent, RingBuffer, Trigger};
//! use routemux_core::{FrameFormat, RouteConfig, StreamRoute};
//!
//! let config = RouteConfig::new(
//!     FrameFormat::S16Le,
//!     2,
//!     vec![StreamRoute::new(1, &[0b01]), StreamRoute::new(2, &[0b10])],
//! )
//! .unwrap();
//! let mut demux = MuxComponent::new(ComponentType::Demux, 7, 0, config).unwrap();
//! demux.prepare().unwrap();
//! demux.trigger(Trigger::Start).unwrap();
//!
//! let mut source = RingBuffer::new(0, 2, 64);
//! source.push_s16(&[10, 20, 11, 21]);
//! let mut left = RingBuffer::new(1, 1, 64);
//! let mut right = RingBuffer::new(2, 1, 64);
//!
//! let report = demux.copy(&mut [&mut source], &mut [&mut left, &mut right]).unwrap();
//! assert_eq!(report.frames, 2);
//!
//! let mut out = Vec::new();
//! right.pop_s16(&mut out);
//! assert_eq!(out, [20, 21]);
//! assert_eq!(source.avail_bytes(), 0);
//! ```

pub mod component;
pub mod copy;
pub mod endpoint;
pub mod error;
pub mod ipc;
pub mod ring;
pub mod shared;
pub mod state;
pub mod xrun;

pub use component::MuxComponent;
pub use copy::CopyReport;
pub use endpoint::Endpoint;
pub use error::{EINVAL, EIO, MuxError};
pub use ipc::{CommandReply, ComponentDescriptor, ComponentType, ControlMessage};
pub use ring::RingBuffer;
pub use shared::{ControlHandle, RouteSnapshot};
pub use state::{ComponentState, Trigger};
pub use xrun::{XrunEvent, XrunHandler, XrunKind};
