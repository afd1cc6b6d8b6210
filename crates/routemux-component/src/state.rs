//! Lifecycle state machine.

use std::fmt;

use crate::error::MuxError;

/// Lifecycle state of a component.
///
/// A component is created in [`Ready`](Self::Ready); there is no separate
/// uninitialized state because construction either succeeds completely or
/// returns no object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentState {
    /// Constructed or reset; configuration may change freely.
    Ready,
    /// Kernel resolved, waiting to start.
    Prepare,
    /// Running; copy is called every period.
    Active,
    /// Stopped mid-stream, resumable.
    Paused,
}

/// Pipeline trigger commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Resolve the routing kernel.
    Prepare,
    /// Begin streaming.
    Start,
    /// Resume after pause.
    Release,
    /// Hold streaming.
    Pause,
    /// End streaming, back to prepared.
    Stop,
    /// Abort everything and return to ready.
    Reset,
}

impl ComponentState {
    /// State after `trigger`, or the error if the transition is not allowed.
    ///
    /// | trigger | from | to |
    /// |---------|------|----|
    /// | prepare | ready | prepare |
    /// | start | prepare, paused | active |
    /// | release | paused | active |
    /// | pause | active | paused |
    /// | stop | active, paused | prepare |
    /// | reset | any | ready |
    pub fn on_trigger(self, trigger: Trigger) -> Result<Self, MuxError> {
        use ComponentState::{Active, Paused, Prepare, Ready};

        let next = match (trigger, self) {
            (Trigger::Reset, _) => Some(Ready),
            (Trigger::Prepare, Ready) => Some(Prepare),
            (Trigger::Start, Prepare | Paused) => Some(Active),
            (Trigger::Release, Paused) => Some(Active),
            (Trigger::Pause, Active) => Some(Paused),
            (Trigger::Stop, Active | Paused) => Some(Prepare),
            _ => None,
        };

        next.ok_or(MuxError::InvalidTransition {
            from: self,
            trigger,
        })
    }

    /// Whether the copy driver may run in this state.
    pub fn can_copy(self) -> bool {
        matches!(self, Self::Prepare | Self::Active)
    }

    /// Lowercase name for logs and messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Prepare => "prepare",
            Self::Active => "active",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Trigger {
    /// Lowercase name for logs and messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::Start => "start",
            Self::Release => "release",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [ComponentState; 4] = [
        ComponentState::Ready,
        ComponentState::Prepare,
        ComponentState::Active,
        ComponentState::Paused,
    ];

    #[test]
    fn reset_from_anywhere() {
        for state in ALL_STATES {
            assert_eq!(state.on_trigger(Trigger::Reset), Ok(ComponentState::Ready));
        }
    }

    #[test]
    fn prepare_only_from_ready() {
        assert_eq!(
            ComponentState::Ready.on_trigger(Trigger::Prepare),
            Ok(ComponentState::Prepare)
        );
        for state in &ALL_STATES[1..] {
            assert!(state.on_trigger(Trigger::Prepare).is_err());
        }
    }

    #[test]
    fn streaming_cycle() {
        let mut state = ComponentState::Ready;
        for (trigger, expected) in [
            (Trigger::Prepare, ComponentState::Prepare),
            (Trigger::Start, ComponentState::Active),
            (Trigger::Pause, ComponentState::Paused),
            (Trigger::Release, ComponentState::Active),
            (Trigger::Stop, ComponentState::Prepare),
            (Trigger::Start, ComponentState::Active),
        ] {
            state = state.on_trigger(trigger).unwrap();
            assert_eq!(state, expected);
        }
    }

    #[test]
    fn rejected_transitions_name_both_ends() {
        assert_eq!(
            ComponentState::Ready.on_trigger(Trigger::Pause),
            Err(MuxError::InvalidTransition {
                from: ComponentState::Ready,
                trigger: Trigger::Pause
            })
        );
        assert!(ComponentState::Prepare.on_trigger(Trigger::Release).is_err());
        assert!(ComponentState::Prepare.on_trigger(Trigger::Stop).is_err());
    }

    #[test]
    fn copy_allowed_states() {
        assert!(!ComponentState::Ready.can_copy());
        assert!(ComponentState::Prepare.can_copy());
        assert!(ComponentState::Active.can_copy());
        assert!(!ComponentState::Paused.can_copy());
    }
}
