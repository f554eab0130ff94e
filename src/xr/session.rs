//! Activation state: phase, milestone flags and the last failure.

use std::fmt;

use super::error::ArFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    PathSelecting,
    /// Native viewer hand-off; terminal on success
    ViewerHandoff,
    SessionRequesting,
    ContextBinding,
    ReferenceSpaceBinding,
    Running,
    Ended,
    Failed,
}

impl SessionPhase {
    /// Whether an activation in this phase still owns the live state
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            Self::PathSelecting
                | Self::SessionRequesting
                | Self::ContextBinding
                | Self::ReferenceSpaceBinding
                | Self::Running
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::PathSelecting => "PathSelecting",
            Self::ViewerHandoff => "ViewerHandoff",
            Self::SessionRequesting => "SessionRequesting",
            Self::ContextBinding => "ContextBinding",
            Self::ReferenceSpaceBinding => "ReferenceSpaceBinding",
            Self::Running => "Running",
            Self::Ended => "Ended",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress markers for diagnostics. Never read for control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Milestones {
    pub model_loaded: bool,
    pub support_checked: bool,
    pub session_created: bool,
    pub context_compatible: bool,
    pub reference_space_acquired: bool,
}

impl Milestones {
    pub fn entries(&self) -> [(&'static str, bool); 5] {
        [
            ("modelLoaded", self.model_loaded),
            ("supportChecked", self.support_checked),
            ("sessionCreated", self.session_created),
            ("contextCompatible", self.context_compatible),
            ("referenceSpaceAcquired", self.reference_space_acquired),
        ]
    }
}

/// State of the most recent activation attempt
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub milestones: Milestones,
    pub last_error: Option<ArFailure>,
}

impl SessionState {
    pub fn begin(model_loaded: bool) -> Self {
        Self {
            phase: SessionPhase::PathSelecting,
            milestones: Milestones {
                model_loaded,
                ..Milestones::default()
            },
            last_error: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.phase.is_live()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_phases_are_not_live() {
        for phase in [
            SessionPhase::Idle,
            SessionPhase::ViewerHandoff,
            SessionPhase::Ended,
            SessionPhase::Failed,
        ] {
            assert!(!phase.is_live(), "{phase}");
        }
        assert!(SessionPhase::Running.is_live());
    }

    #[test]
    fn test_begin_carries_model_flag() {
        let state = SessionState::begin(true);
        assert_eq!(state.phase, SessionPhase::PathSelecting);
        assert!(state.milestones.model_loaded);
        assert!(!state.milestones.session_created);
        assert!(state.last_error.is_none());
    }
}
