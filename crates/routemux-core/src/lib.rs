//! Routemux Core - channel routing kernels for audio mux/demux components
//!
//! This crate holds the sample-routing engine of a mux/demux pipeline
//! component: the per-width accumulate and write-back routines, the format
//! dispatch table, and the routing configuration model with its wire codec.
//! Everything here runs without allocation once a configuration is built.
//!
//! # Core Abstractions
//!
//! ## Sample Widths
//!
//! - [`SampleWidth`] - Read/widen/saturate/write strategy per sample width
//! - [`S16`], [`S24`], [`S32`] - The three supported widths
//! - [`sat_int16`], [`sat_int24`], [`sat_int32`], [`sign_extend_s24`] - Scalar helpers
//!
//! ## Buffers
//!
//! - [`SampleSource`] / [`SampleSink`] - Fragment accessors the kernels read and write through
//!
//! ## Routing
//!
//! - [`accumulate`] - Masked sum of one frame's channels
//! - [`demux`] - One source, one route, one sink
//! - [`mux`] - Up to [`MAX_STREAMS`] sources into one sink, saturating once per sample
//! - [`RoutingKernel`] / [`kernel_for`] - Format-keyed `(mux, demux)` table
//!
//! ## Configuration
//!
//! - [`StreamRoute`] - Pipeline id, channel count and per-channel masks
//! - [`RouteConfig`] - Frame format, primary channel count and validated routes
//! - [`wire`] - Byte-exact blob codec for the control channel
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc` for the route list).
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! routemux-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use routemux_core::{FrameFormat, RouteConfig, StreamRoute, kernel_for};
//!
//! // Split a stereo stream: left to pipeline 1, right to pipeline 2.
//! let config = RouteConfig::new(
//!     FrameFormat::S16Le,
//!     2,
//!     vec![StreamRoute::new(1, &[0b01]), StreamRoute::new(2, &[0b10])],
//! )
//! .unwrap();
//!
//! let kernel = kernel_for(config.frame_format()).unwrap();
//! let source: [i16; 4] = [100, -7, 200, -9];
//! let mut left = [0i16; 2];
//! (kernel.demux)(&mut left, &source, 2, &config, &config.streams()[0]);
//! assert_eq!(left, [100, 200]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod buffer;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod routing;
pub mod sample;
pub mod wire;

pub use buffer::{SampleSink, SampleSource};
pub use config::{MAX_CHANNELS, MAX_STREAMS, PLATFORM_MAX_STREAMS, RouteConfig, StreamRoute};
pub use dispatch::{DemuxFn, KERNELS, MuxFn, RoutingKernel, demux_fn, kernel_for, mux_fn};
pub use error::RouteError;
pub use format::FrameFormat;
pub use routing::{MuxSources, accumulate, demux, mux};
pub use sample::{S16, S24, S32, SampleWidth, sat_int16, sat_int24, sat_int32, sign_extend_s24};
