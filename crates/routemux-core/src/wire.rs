//! Binary layout of a routing configuration.
//!
//! This is the blob the control sender transmits. All fields are little
//! endian and the layout is fixed:
//!
//! ```text
//! header (8 bytes)
//!   u16 frame_format
//!   u16 channels        primary side
//!   u16 num_streams
//!   u16 reserved
//! route (16 bytes) x num_streams
//!   u32 pipeline_id
//!   u8  channels
//!   u8  mask[8]
//!   u8  reserved[3]     keeps the next route 4-byte aligned
//! ```
//!
//! Decoding rejects a blob whose length disagrees with its header, and runs
//! the full [`RouteConfig`] validation before returning.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::config::{MAX_CHANNELS, MAX_STREAMS, RouteConfig, StreamRoute};
use crate::error::RouteError;
use crate::format::FrameFormat;

/// Size of the configuration header.
pub const HEADER_SIZE: usize = 8;

/// Padding after the mask array of one route.
pub const ROUTE_PADDING: usize = (4 - (1 + MAX_CHANNELS) % 4) % 4;

/// Size of one encoded route.
pub const ROUTE_SIZE: usize = 4 + 1 + MAX_CHANNELS + ROUTE_PADDING;

const _: () = assert!(ROUTE_SIZE % 4 == 0);

/// Encoded size of a configuration with `num_streams` routes.
pub const fn encoded_len(num_streams: usize) -> usize {
    HEADER_SIZE + num_streams * ROUTE_SIZE
}

/// Serializes a configuration.
pub fn encode(config: &RouteConfig) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(config.num_streams()));
    out.extend_from_slice(&config.frame_format().raw().to_le_bytes());
    out.extend_from_slice(&config.channels().to_le_bytes());
    out.extend_from_slice(&(config.num_streams() as u16).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    for route in config.streams() {
        encode_route(route, &mut out);
    }
    out
}

fn encode_route(route: &StreamRoute, out: &mut Vec<u8>) {
    out.extend_from_slice(&route.pipeline_id.to_le_bytes());
    out.push(route.channels);
    out.extend_from_slice(&route.mask);
    out.extend_from_slice(&[0u8; ROUTE_PADDING]);
}

/// Parses and validates a configuration blob.
pub fn decode(bytes: &[u8]) -> Result<RouteConfig, RouteError> {
    let mut reader = Reader::new(bytes);
    let frame_format = FrameFormat::from_raw(reader.u16()?);
    let channels = reader.u16()?;
    let num_streams = usize::from(reader.u16()?);
    let _reserved = reader.u16()?;

    if num_streams > MAX_STREAMS {
        return Err(RouteError::TooManyStreams {
            count: num_streams,
            max: MAX_STREAMS,
        });
    }

    let needed = encoded_len(num_streams);
    if bytes.len() < needed {
        return Err(RouteError::Truncated {
            needed,
            got: bytes.len(),
        });
    }
    if bytes.len() > needed {
        return Err(RouteError::TrailingBytes {
            extra: bytes.len() - needed,
        });
    }

    let mut streams = Vec::new();
    streams
        .try_reserve_exact(num_streams)
        .map_err(|_| RouteError::OutOfMemory {
            streams: num_streams,
        })?;
    for _ in 0..num_streams {
        streams.push(decode_route(&mut reader)?);
    }

    RouteConfig::new(frame_format, channels, streams)
}

fn decode_route(reader: &mut Reader<'_>) -> Result<StreamRoute, RouteError> {
    let pipeline_id = reader.u32()?;
    let channels = reader.u8()?;
    let mask = reader.array::<MAX_CHANNELS>()?;
    let _padding = reader.array::<ROUTE_PADDING>()?;
    Ok(StreamRoute {
        pipeline_id,
        channels,
        mask,
    })
}

/// Little-endian cursor over a byte slice.
///
/// Every read past the end fails with [`RouteError::Truncated`] carrying the
/// length the read would have needed.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Starts reading at the first byte.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Unread tail of the input.
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    /// Reads `N` raw bytes.
    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], RouteError> {
        let end = self.pos + N;
        let Some(chunk) = self.bytes.get(self.pos..end) else {
            return Err(RouteError::Truncated {
                needed: end,
                got: self.bytes.len(),
            });
        };
        self.pos = end;
        let mut out = [0u8; N];
        out.copy_from_slice(chunk);
        Ok(out)
    }

    /// Reads one byte.
    pub fn u8(&mut self) -> Result<u8, RouteError> {
        self.array::<1>().map(|[b]| b)
    }

    /// Reads a little-endian `u16`.
    pub fn u16(&mut self) -> Result<u16, RouteError> {
        self.array().map(u16::from_le_bytes)
    }

    /// Reads a little-endian `u32`.
    pub fn u32(&mut self) -> Result<u32, RouteError> {
        self.array().map(u32::from_le_bytes)
    }
}
