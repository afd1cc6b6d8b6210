//! Host messages: the construction descriptor and control commands.
//!
//! Descriptor layout, little endian:
//!
//! ```text
//! component header (28 bytes)
//!   u32 size, u32 cmd, u32 id, u32 type, u32 pipeline_id, u32 reserved[2]
//! config block (32 bytes)
//!   u32 size (must be 32), u32 cmd, u32 periods_sink, u32 periods_source,
//!   u32 preload_count, u32 frame_fmt, u32 reserved[2]
//! payload
//!   u32 size, u8 data[size]   routing configuration blob
//! ```

use routemux_core::RouteError;
use routemux_core::wire::Reader;

use crate::error::MuxError;

/// Size of the encoded component header.
pub const COMP_HEADER_SIZE: usize = 28;

/// Size of the encoded config block, as it must be declared.
pub const COMP_CONFIG_SIZE: u32 = 32;

/// Component type tag of a combiner.
pub const COMP_TYPE_MUX: u32 = 17;

/// Component type tag of a splitter.
pub const COMP_TYPE_DEMUX: u32 = 18;

/// Set a scalar control value.
pub const CMD_SET_VALUE: u32 = 100;
/// Read a scalar control value.
pub const CMD_GET_VALUE: u32 = 101;
/// Set a binary control blob.
pub const CMD_SET_DATA: u32 = 102;
/// Read a binary control blob.
pub const CMD_GET_DATA: u32 = 103;

/// Volume control.
pub const CTRL_TYPE_VOLUME: u32 = 0;
/// Enumerated control.
pub const CTRL_TYPE_ENUM: u32 = 1;
/// On/off switch.
pub const CTRL_TYPE_SWITCH: u32 = 2;
/// Opaque binary data.
pub const CTRL_TYPE_BINARY: u32 = 3;

/// Direction of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// Many sources into one sink.
    Mux,
    /// One source into many sinks.
    Demux,
}

impl ComponentType {
    /// Parses a wire tag.
    pub fn from_raw(raw: u32) -> Result<Self, MuxError> {
        match raw {
            COMP_TYPE_MUX => Ok(Self::Mux),
            COMP_TYPE_DEMUX => Ok(Self::Demux),
            other => Err(MuxError::UnknownComponentType(other)),
        }
    }

    /// Wire tag.
    pub fn raw(self) -> u32 {
        match self {
            Self::Mux => COMP_TYPE_MUX,
            Self::Demux => COMP_TYPE_DEMUX,
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Mux => "mux",
            Self::Demux => "demux",
        }
    }
}

/// Generic component header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompHeader {
    /// Total message size.
    pub size: u32,
    /// Host command word.
    pub cmd: u32,
    /// Component id.
    pub id: u32,
    /// Component type tag.
    pub comp_type: u32,
    /// Pipeline the component belongs to.
    pub pipeline_id: u32,
}

/// Generic component config block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompConfig {
    /// Declared block size.
    pub size: u32,
    /// Host command word.
    pub cmd: u32,
    /// Sink buffer periods.
    pub periods_sink: u32,
    /// Source buffer periods.
    pub periods_source: u32,
    /// Periods to preload before start.
    pub preload_count: u32,
    /// Frame format tag.
    pub frame_fmt: u32,
}

impl Default for CompConfig {
    fn default() -> Self {
        Self {
            size: COMP_CONFIG_SIZE,
            cmd: 0,
            periods_sink: 2,
            periods_source: 2,
            preload_count: 0,
            frame_fmt: 0,
        }
    }
}

/// Construction message for a mux or demux component.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentDescriptor {
    /// Component header.
    pub header: CompHeader,
    /// Config block.
    pub config: CompConfig,
    /// Initial routing configuration blob; empty for an empty configuration.
    pub payload: Vec<u8>,
}

impl ComponentDescriptor {
    /// Descriptor for a component with the given identity and payload.
    pub fn new(kind: ComponentType, id: u32, pipeline_id: u32, payload: Vec<u8>) -> Self {
        let mut desc = Self {
            header: CompHeader {
                size: 0,
                cmd: 0,
                id,
                comp_type: kind.raw(),
                pipeline_id,
            },
            config: CompConfig::default(),
            payload,
        };
        desc.header.size = desc.encoded_len() as u32;
        desc
    }

    /// Encoded size.
    pub fn encoded_len(&self) -> usize {
        COMP_HEADER_SIZE + COMP_CONFIG_SIZE as usize + 4 + self.payload.len()
    }

    /// Serializes the descriptor.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        let h = &self.header;
        for word in [h.size, h.cmd, h.id, h.comp_type, h.pipeline_id, 0, 0] {
            out.extend_from_slice(&word.to_le_bytes());
        }
        let c = &self.config;
        for word in [
            c.size,
            c.cmd,
            c.periods_sink,
            c.periods_source,
            c.preload_count,
            c.frame_fmt,
            0,
            0,
        ] {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parses a descriptor.
    ///
    /// The config block must declare exactly [`COMP_CONFIG_SIZE`] bytes, and
    /// the payload length must match the bytes that follow it.
    pub fn decode(bytes: &[u8]) -> Result<Self, MuxError> {
        let mut r = Reader::new(bytes);

        let header = CompHeader {
            size: r.u32()?,
            cmd: r.u32()?,
            id: r.u32()?,
            comp_type: r.u32()?,
            pipeline_id: r.u32()?,
        };
        r.array::<8>()?;

        let config = CompConfig {
            size: r.u32()?,
            cmd: r.u32()?,
            periods_sink: r.u32()?,
            periods_source: r.u32()?,
            preload_count: r.u32()?,
            frame_fmt: r.u32()?,
        };
        r.array::<8>()?;
        if config.size != COMP_CONFIG_SIZE {
            return Err(MuxError::SizeMismatch {
                declared: config.size,
                expected: COMP_CONFIG_SIZE,
            });
        }

        let size = r.u32()? as usize;
        let rest = r.remaining();
        if rest.len() < size {
            return Err(RouteError::Truncated {
                needed: r.position() + size,
                got: bytes.len(),
            }
            .into());
        }
        if rest.len() > size {
            return Err(RouteError::TrailingBytes {
                extra: rest.len() - size,
            }
            .into());
        }

        Ok(Self {
            header,
            config,
            payload: rest.to_vec(),
        })
    }
}

/// A control command addressed to a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMessage {
    /// Command id (`CMD_*`).
    pub cmd: u32,
    /// Control type (`CTRL_TYPE_*`).
    pub control: u32,
    /// Command data.
    pub data: Vec<u8>,
}

impl ControlMessage {
    /// Set-binary-data command carrying a routing blob.
    pub fn set_data(blob: Vec<u8>) -> Self {
        Self {
            cmd: CMD_SET_DATA,
            control: CTRL_TYPE_BINARY,
            data: blob,
        }
    }

    /// Get-binary-data command.
    pub fn get_data() -> Self {
        Self {
            cmd: CMD_GET_DATA,
            control: CTRL_TYPE_BINARY,
            data: Vec::new(),
        }
    }
}

/// Result of a successful control command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    /// The command was applied.
    Done,
    /// The command returned data.
    Data(Vec<u8>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_round_trip() {
        let desc = ComponentDescriptor::new(ComponentType::Demux, 2543, 3245, vec![1, 2, 3]);
        let bytes = desc.encode();
        assert_eq!(bytes.len(), 28 + 32 + 4 + 3);
        assert_eq!(desc.header.size as usize, bytes.len());
        assert_eq!(ComponentDescriptor::decode(&bytes), Ok(desc));
    }

    #[test]
    fn config_size_must_match() {
        for declared in [14, 31, 33, 3245] {
            let mut desc = ComponentDescriptor::new(ComponentType::Mux, 1, 1, Vec::new());
            desc.config.size = declared;
            assert_eq!(
                ComponentDescriptor::decode(&desc.encode()),
                Err(MuxError::SizeMismatch {
                    declared,
                    expected: COMP_CONFIG_SIZE
                })
            );
        }
    }

    #[test]
    fn payload_length_is_checked() {
        let bytes = ComponentDescriptor::new(ComponentType::Mux, 1, 1, vec![9; 4]).encode();
        assert!(matches!(
            ComponentDescriptor::decode(&bytes[..bytes.len() - 1]),
            Err(MuxError::Route(RouteError::Truncated { .. }))
        ));

        let mut long = bytes.clone();
        long.push(0);
        assert_eq!(
            ComponentDescriptor::decode(&long),
            Err(MuxError::Route(RouteError::TrailingBytes { extra: 1 }))
        );
    }

    #[test]
    fn truncated_header() {
        assert!(matches!(
            ComponentDescriptor::decode(&[0; 20]),
            Err(MuxError::Route(RouteError::Truncated { .. }))
        ));
    }

    #[test]
    fn component_type_tags() {
        assert_eq!(ComponentType::from_raw(COMP_TYPE_MUX), Ok(ComponentType::Mux));
        assert_eq!(ComponentType::from_raw(18), Ok(ComponentType::Demux));
        assert_eq!(
            ComponentType::from_raw(0),
            Err(MuxError::UnknownComponentType(0))
        );
    }
}
