//! The mux/demux component instance.

use routemux_core::{FrameFormat, RouteConfig, wire};

use crate::copy::{CopyReport, demux_copy, mux_copy};
use crate::endpoint::Endpoint;
use crate::error::MuxError;
use crate::ipc::{
    CMD_GET_DATA, CMD_SET_DATA, CTRL_TYPE_BINARY, CommandReply, ComponentDescriptor, ComponentType,
    ControlMessage,
};
use crate::shared::{ControlHandle, PreparedKernel};
use crate::state::{ComponentState, Trigger};
use crate::xrun::{XrunEvent, XrunHandler};

/// A channel-routing component.
///
/// The routing configuration lives behind a [`ControlHandle`]; clones of it
/// may reconfigure the component from another thread while [`copy`] runs.
/// Lifecycle calls (`trigger`, `prepare`, `reset`, `copy`) take `&mut self`
/// and belong to the pipeline thread.
///
/// Prepare fixes the routing kernel and the frame format until the next
/// reset. Route masks may still change while running; a format change is
/// rejected with [`MuxError::FormatLocked`].
///
/// [`copy`]: Self::copy
pub struct MuxComponent {
    kind: ComponentType,
    id: u32,
    pipeline_id: u32,
    state: ComponentState,
    control: ControlHandle,
    prepared: Option<PreparedKernel>,
    xrun: Option<Box<dyn XrunHandler>>,
}

impl MuxComponent {
    /// Creates a component in [`ComponentState::Ready`].
    pub fn new(
        kind: ComponentType,
        id: u32,
        pipeline_id: u32,
        config: RouteConfig,
    ) -> Result<Self, MuxError> {
        config.validate()?;
        tracing::debug!(
            kind = kind.name(),
            id,
            pipeline_id,
            streams = config.num_streams(),
            "component created"
        );
        Ok(Self {
            kind,
            id,
            pipeline_id,
            state: ComponentState::Ready,
            control: ControlHandle::new(config),
            prepared: None,
            xrun: None,
        })
    }

    /// Creates a component from a parsed construction descriptor.
    ///
    /// An empty payload gives an empty configuration.
    pub fn from_descriptor(desc: &ComponentDescriptor) -> Result<Self, MuxError> {
        let kind = ComponentType::from_raw(desc.header.comp_type)?;
        let config = if desc.payload.is_empty() {
            RouteConfig::empty()
        } else {
            wire::decode(&desc.payload)?
        };
        Self::new(kind, desc.header.id, desc.header.pipeline_id, config)
    }

    /// Parses a construction descriptor and creates the component.
    pub fn from_ipc(bytes: &[u8]) -> Result<Self, MuxError> {
        let desc = ComponentDescriptor::decode(bytes).inspect_err(|err| {
            tracing::warn!(%err, "construction descriptor rejected");
        })?;
        Self::from_descriptor(&desc)
    }

    /// Mux or demux.
    pub fn kind(&self) -> ComponentType {
        self.kind
    }

    /// Component id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Pipeline the component belongs to.
    pub fn pipeline_id(&self) -> u32 {
        self.pipeline_id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ComponentState {
        self.state
    }

    /// Copy of the active routing configuration.
    pub fn config(&self) -> RouteConfig {
        self.control.load().config().clone()
    }

    /// Handle for reconfiguring from another thread.
    pub fn control(&self) -> ControlHandle {
        self.control.clone()
    }

    /// Installs the pipeline's xrun receiver.
    pub fn set_xrun_handler(&mut self, handler: impl XrunHandler + 'static) {
        self.xrun = Some(Box::new(handler));
    }

    /// Replaces the routing configuration from a blob.
    pub fn set_values(&self, blob: &[u8]) -> Result<(), MuxError> {
        self.control.set_values(blob)
    }

    /// Serialized active routing configuration.
    pub fn get_values(&self) -> Vec<u8> {
        self.control.get_values()
    }

    /// Handles a control command.
    ///
    /// Only binary data is understood: set-data replaces the configuration,
    /// get-data returns it.
    pub fn cmd(&self, msg: &ControlMessage) -> Result<CommandReply, MuxError> {
        match msg.cmd {
            CMD_SET_DATA | CMD_GET_DATA if msg.control != CTRL_TYPE_BINARY => {
                Err(MuxError::UnsupportedControl(msg.control))
            }
            CMD_SET_DATA => {
                self.set_values(&msg.data)?;
                Ok(CommandReply::Done)
            }
            CMD_GET_DATA => Ok(CommandReply::Data(self.get_values())),
            other => {
                tracing::warn!(id = self.id, cmd = other, "unsupported command");
                Err(MuxError::UnsupportedCommand(other))
            }
        }
    }

    /// Stores the stream parameters negotiated by the owning device.
    ///
    /// Only accepted in [`ComponentState::Ready`].
    pub fn params(&self, frame_format: FrameFormat, channels: u16) -> Result<(), MuxError> {
        if self.state != ComponentState::Ready {
            tracing::warn!(id = self.id, state = %self.state, "params outside ready");
            return Err(MuxError::ParamsNotReady(self.state));
        }
        self.control.apply_params(frame_format, channels)
    }

    /// Resolves the routing kernel and moves to [`ComponentState::Prepare`].
    pub fn prepare(&mut self) -> Result<(), MuxError> {
        self.trigger(Trigger::Prepare)
    }

    /// Applies a pipeline trigger.
    ///
    /// Prepare additionally requires a kernel for the configured format;
    /// without one the component stays where it is.
    pub fn trigger(&mut self, trigger: Trigger) -> Result<(), MuxError> {
        let next = self.state.on_trigger(trigger).inspect_err(|err| {
            tracing::warn!(id = self.id, %err, "trigger rejected");
        })?;

        if trigger == Trigger::Prepare {
            let prepared = self.control.pin_kernel().inspect_err(|err| {
                tracing::warn!(id = self.id, %err, "no routing kernel");
            })?;
            self.prepared = Some(prepared);
        }

        tracing::debug!(id = self.id, from = %self.state, to = %next, "state change");
        self.state = next;
        if next == ComponentState::Ready {
            self.release_kernel();
        }
        Ok(())
    }

    /// Returns to [`ComponentState::Ready`], keeping the configuration.
    pub fn reset(&mut self) {
        self.state = ComponentState::Ready;
        self.release_kernel();
        tracing::debug!(id = self.id, "reset");
    }

    fn release_kernel(&mut self) {
        self.prepared = None;
        self.control.unpin();
    }

    /// Runs one processing cycle.
    ///
    /// A demux reads the first source and writes every routed sink; a mux
    /// reads every routed source and writes the first sink. The
    /// configuration is loaded once for the whole cycle; the kernel is the
    /// one resolved at prepare.
    pub fn copy(
        &mut self,
        sources: &mut [&mut dyn Endpoint],
        sinks: &mut [&mut dyn Endpoint],
    ) -> Result<CopyReport, MuxError> {
        let PreparedKernel {
            kernel,
            sample_bytes,
        } = match self.prepared {
            Some(prepared) if self.state.can_copy() => prepared,
            _ => return Err(MuxError::NotRunning(self.state)),
        };

        let snapshot = self.control.load();
        let config = snapshot.config();

        let mut notify = |event: XrunEvent| {
            if let Some(handler) = self.xrun.as_mut() {
                handler.on_xrun(event);
            }
        };

        match self.kind {
            ComponentType::Demux => {
                demux_copy(kernel, sample_bytes, config, sources, sinks, &mut notify)
            }
            ComponentType::Mux => mux_copy(kernel, sample_bytes, config, sources, sinks, &mut notify),
        }
    }
}

impl std::fmt::Debug for MuxComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MuxComponent")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("pipeline_id", &self.pipeline_id)
            .field("state", &self.state)
            .field("control", &self.control)
            .field("prepared", &self.prepared.map(|p| p.kernel.format))
            .field("xrun_handler", &self.xrun.is_some())
            .finish()
    }
}
