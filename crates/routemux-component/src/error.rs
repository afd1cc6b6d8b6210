//! Component error types.

use routemux_core::{FrameFormat, RouteError};
use thiserror::Error;

use crate::state::{ComponentState, Trigger};
use crate::xrun::XrunKind;

/// Invalid argument.
pub const EINVAL: i32 = 22;

/// I/O shortage: a cycle that could not process a single frame.
pub const EIO: i32 = 5;

/// Errors surfaced by a mux/demux component.
///
/// Nothing here is fatal. Every failure leaves the component in the state
/// it had before the call, with its previous configuration in force.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MuxError {
    /// The routing configuration or its blob was rejected.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// The construction descriptor's config block has the wrong size.
    #[error("config block size {declared}, expected {expected}")]
    SizeMismatch {
        /// Size the descriptor declares.
        declared: u32,
        /// Size of the config block structure.
        expected: u32,
    },

    /// The construction descriptor names a component type other than mux or demux.
    #[error("unknown component type {0}")]
    UnknownComponentType(u32),

    /// A control command other than get/set binary data.
    #[error("unsupported command {0}")]
    UnsupportedCommand(u32),

    /// A control type other than binary data.
    #[error("unsupported control type {0}")]
    UnsupportedControl(u32),

    /// No routing kernel exists for the configured frame format.
    #[error("unsupported frame format {0}")]
    UnsupportedFormat(FrameFormat),

    /// A configuration update would change the format fixed at prepare.
    #[error("frame format is {active} until reset, cannot switch to {requested}")]
    FormatLocked {
        /// Format the prepared kernel handles.
        active: FrameFormat,
        /// Format the rejected update carries.
        requested: FrameFormat,
    },

    /// Stream parameters arrived after the component left the ready state.
    #[error("cannot negotiate parameters in state {0}")]
    ParamsNotReady(ComponentState),

    /// The trigger is not allowed from the current state.
    #[error("cannot {trigger} from {from}")]
    InvalidTransition {
        /// State when the trigger arrived.
        from: ComponentState,
        /// Rejected trigger.
        trigger: Trigger,
    },

    /// Copy was called before the component was prepared or while paused.
    #[error("copy in state {0}")]
    NotRunning(ComponentState),

    /// The primary endpoint's channel count disagrees with the configuration.
    #[error("primary endpoint has {got} channels, configuration expects {expected}")]
    ChannelMismatch {
        /// Channels the configuration expects.
        expected: u16,
        /// Channels the endpoint carries.
        got: u16,
    },

    /// Not one frame could be processed this cycle.
    #[error("{0}: no frames processed")]
    Xrun(XrunKind),
}

impl MuxError {
    /// Negative status code for this error.
    ///
    /// Data-shortage cycles report `-EIO`; every other failure is an invalid
    /// argument.
    pub fn errno(&self) -> i32 {
        match self {
            Self::Xrun(_) => -EIO,
            _ => -EINVAL,
        }
    }
}
