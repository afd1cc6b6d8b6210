//! Frame format identifiers.

use core::fmt;

/// Sample encoding of every stream handled by one component.
///
/// The raw `u16` tag is what travels in the routing blob. Tags this crate
/// has no name for are kept as [`FrameFormat::Unknown`] so a blob decodes and
/// re-encodes byte for byte; such formats simply have no routing kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameFormat {
    /// 16-bit signed, little endian.
    #[default]
    S16Le,
    /// 24-bit signed in the low bits of a 32-bit little-endian container.
    S24_4Le,
    /// 32-bit signed, little endian.
    S32Le,
    /// 32-bit IEEE float. Recognised, never routed.
    Float,
    /// Any other tag.
    Unknown(u16),
}

impl FrameFormat {
    /// Decodes a wire tag.
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            0 => Self::S16Le,
            1 => Self::S24_4Le,
            2 => Self::S32Le,
            3 => Self::Float,
            other => Self::Unknown(other),
        }
    }

    /// Wire tag of this format.
    pub const fn raw(self) -> u16 {
        match self {
            Self::S16Le => 0,
            Self::S24_4Le => 1,
            Self::S32Le => 2,
            Self::Float => 3,
            Self::Unknown(other) => other,
        }
    }

    /// Bytes occupied by one sample in its container, or `None` for tags
    /// with no known layout.
    pub const fn sample_bytes(self) -> Option<usize> {
        match self {
            Self::S16Le => Some(2),
            Self::S24_4Le | Self::S32Le | Self::Float => Some(4),
            Self::Unknown(_) => None,
        }
    }

    /// Significant bits per sample.
    pub const fn valid_bits(self) -> Option<u16> {
        match self {
            Self::S16Le => Some(16),
            Self::S24_4Le => Some(24),
            Self::S32Le | Self::Float => Some(32),
            Self::Unknown(_) => None,
        }
    }

    /// Short lowercase name, as used in route files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::S16Le => "s16le",
            Self::S24_4Le => "s24le",
            Self::S32Le => "s32le",
            Self::Float => "float",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Parses a route-file name (`s16le`, `s24le`, `s24_4le`, `s32le`, `float`).
    pub fn from_name(name: &str) -> Option<Self> {
        const NAMES: [(&str, FrameFormat); 7] = [
            ("s16le", FrameFormat::S16Le),
            ("s16_le", FrameFormat::S16Le),
            ("s24le", FrameFormat::S24_4Le),
            ("s24_4le", FrameFormat::S24_4Le),
            ("s32le", FrameFormat::S32Le),
            ("s32_le", FrameFormat::S32Le),
            ("float", FrameFormat::Float),
        ];
        NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, fmt)| fmt)
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(raw) => write!(f, "unknown({raw})"),
            known => f.write_str(known.name()),
        }
    }
}
