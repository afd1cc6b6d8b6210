//! Buffer-level underrun/overrun notification.

use std::fmt;

/// Which side of a copy ran dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XrunKind {
    /// The source had no complete frame available.
    Underrun,
    /// The sink had no room for a complete frame.
    Overrun,
}

impl fmt::Display for XrunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Underrun => "underrun",
            Self::Overrun => "overrun",
        })
    }
}

/// One zero-frame endpoint in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XrunEvent {
    /// Underrun or overrun.
    pub kind: XrunKind,
    /// Pipeline of the endpoint that could not be serviced.
    pub pipeline_id: u32,
    /// Frames the other side could have moved.
    pub frames: usize,
}

/// Receiver for xrun events, normally the owning pipeline.
///
/// Called from the copy path: implementations must not block.
pub trait XrunHandler: Send {
    /// Handles one event.
    fn on_xrun(&mut self, event: XrunEvent);
}

impl<F> XrunHandler for F
where
    F: FnMut(XrunEvent) + Send,
{
    fn on_xrun(&mut self, event: XrunEvent) {
        self(event);
    }
}
