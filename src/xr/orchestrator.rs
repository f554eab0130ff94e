//! # AR Session Orchestrator
//!
//! Drives one AR activation from the user's request to a running immersive
//! session, a native viewer hand-off or a classified failure.
//!
//! The immersive path is a strictly linear sequence of one-shot platform
//! negotiations:
//!
//! ```text
//! Idle -> PathSelecting -> SessionRequesting -> ContextBinding
//!      -> ReferenceSpaceBinding -> Running -> Ended
//! ```
//!
//! `PathSelecting` may instead branch to `ViewerHandoff` (terminal success)
//! and any live phase may drop to `Failed`. Each phase boundary checks the
//! activation's [`CancelToken`] and whether the platform already ended the
//! session.
//!
//! All state lives behind `Rc<RefCell<_>>` with borrows that never span an
//! `.await`, so pointer input keeps flowing while a platform call is pending.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, error, info, trace, warn};

use crate::diagnostics::{compose_failure_report, DiagnosticEntry, DiagnosticsLog};
use crate::gfx::engine::{InlineView, ViewerHandles};
use crate::ui::status::StatusSurface;

use super::cancel::CancelToken;
use super::capability::{CapabilityProfile, PlatformFamily};
use super::error::{ActivationError, ArFailure, FailureKind};
use super::platform::{
    FrameHandle, Platform, ReferenceSpace, ReferenceSpaceType, SessionInit, SessionMode,
    ViewerLink, XrSession, XrSystem,
};
use super::session::{SessionPhase, SessionState};

/// How a successful activation resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The native viewer was invoked
    HandedOff,
    /// The immersive session is running
    Presenting,
    /// Cancelled, or ended by the platform before it started running
    Ended,
}

/// Resources of a created immersive session
struct LiveSession {
    session: Rc<dyn XrSession>,
    reference_space: Option<ReferenceSpace>,
    frame: Option<FrameHandle>,
    inline: Option<InlineView>,
}

impl LiveSession {
    /// Deregisters the frame callback, lets go of the session and hands the
    /// camera and surface back to the inline viewer.
    fn release(self, end_session: bool, handles: &ViewerHandles) {
        if let Some(handle) = self.frame {
            self.session.cancel_animation_frame(handle);
        }
        if end_session {
            if let Err(err) = self.session.end() {
                warn!("Ending immersive session failed: {err}");
            }
        }
        if let Some(space) = self.reference_space {
            trace!("Released {} reference space {}", space.kind.as_str(), space.id);
        }
        if let Some(view) = self.inline {
            handles.restore_inline_view(&view);
            debug!(
                "Inline view restored at {}x{}",
                view.surface_size.0, view.surface_size.1
            );
        }
    }
}

#[derive(Default)]
struct Shared {
    state: SessionState,
    live: Option<LiveSession>,
    generation: u64,
    cancel: CancelToken,
}

/// Why the negotiation stopped before reaching `Running`
enum Interrupt {
    Cancelled,
    Ended,
    Failed(ArFailure),
}

impl From<ArFailure> for Interrupt {
    fn from(failure: ArFailure) -> Self {
        Self::Failed(failure)
    }
}

pub struct ArOrchestrator {
    profile: CapabilityProfile,
    platform: Platform,
    handles: ViewerHandles,
    status: Rc<dyn StatusSurface>,
    native_asset_url: String,
    diagnostics: Rc<RefCell<DiagnosticsLog>>,
    shared: Rc<RefCell<Shared>>,
    model_loaded: Cell<bool>,
    frames_presented: Rc<Cell<u64>>,
}

impl ArOrchestrator {
    pub fn new(
        profile: CapabilityProfile,
        platform: Platform,
        handles: ViewerHandles,
        status: Rc<dyn StatusSurface>,
        native_asset_url: impl Into<String>,
    ) -> Self {
        Self {
            profile,
            platform,
            handles,
            status,
            native_asset_url: native_asset_url.into(),
            diagnostics: Rc::new(RefCell::new(DiagnosticsLog::new())),
            shared: Rc::new(RefCell::new(Shared::default())),
            model_loaded: Cell::new(false),
            frames_presented: Rc::new(Cell::new(0)),
        }
    }

    pub fn profile(&self) -> &CapabilityProfile {
        &self.profile
    }

    /// Recorded in the `modelLoaded` milestone of later activations
    pub fn set_model_loaded(&self, loaded: bool) {
        self.model_loaded.set(loaded);
    }

    pub fn phase(&self) -> SessionPhase {
        self.shared.borrow().state.phase
    }

    /// State of the most recent activation attempt
    pub fn state(&self) -> SessionState {
        self.shared.borrow().state.clone()
    }

    /// Whether the device currently owns the camera pose
    pub fn is_presenting(&self) -> bool {
        self.phase() == SessionPhase::Running
    }

    pub fn diagnostics(&self) -> Vec<DiagnosticEntry> {
        self.diagnostics.borrow().entries().to_vec()
    }

    /// Frames for which a viewer pose resolved and the scene was presented
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented.get()
    }

    pub async fn activate(&self) -> Result<ActivationOutcome, ActivationError> {
        self.activate_with(CancelToken::new()).await
    }

    /// Runs one activation. Rejected with [`ActivationError::Busy`] while
    /// another activation is live.
    pub async fn activate_with(
        &self,
        cancel: CancelToken,
    ) -> Result<ActivationOutcome, ActivationError> {
        let generation = {
            let mut shared = self.shared.borrow_mut();
            if shared.state.is_live() {
                warn!(
                    "AR activation rejected, phase {} still live",
                    shared.state.phase
                );
                return Err(ActivationError::Busy(shared.state.phase));
            }
            shared.generation += 1;
            shared.state = SessionState::begin(self.model_loaded.get());
            shared.cancel = cancel.clone();
            shared.generation
        };

        self.diagnostics.borrow_mut().reset();
        self.record(format!(
            "AR activation requested ({})",
            self.profile.platform_family
        ));

        match self.profile.platform_family {
            PlatformFamily::Unsupported => Err(self.fail(ArFailure::unavailable())),
            PlatformFamily::ViewerOnly => self.hand_off(),
            PlatformFamily::ImmersiveCapable => {
                let Some(xr) = self.platform.xr.clone() else {
                    return Err(self.fail(ArFailure::unavailable()));
                };

                self.status.set_loading(true);
                match self.negotiate(xr.as_ref(), generation, &cancel).await {
                    Ok(()) => {
                        self.status.set_loading(false);
                        Ok(ActivationOutcome::Presenting)
                    }
                    Err(Interrupt::Cancelled) => {
                        self.finish_cancelled();
                        Ok(ActivationOutcome::Ended)
                    }
                    Err(Interrupt::Ended) => Ok(ActivationOutcome::Ended),
                    Err(Interrupt::Failed(failure)) => Err(self.fail(failure)),
                }
            }
        }
    }

    /// Cancels the current activation. A running session is ended.
    pub fn cancel(&self) {
        let (token, running) = {
            let shared = self.shared.borrow();
            (
                shared.cancel.clone(),
                shared.state.phase == SessionPhase::Running,
            )
        };
        token.cancel();
        if running {
            self.end_session();
        }
    }

    /// Asks the platform to end the live session. Teardown happens when the
    /// session's `end` event fires.
    pub fn end_session(&self) {
        let session = self
            .shared
            .borrow()
            .live
            .as_ref()
            .map(|live| live.session.clone());
        if let Some(session) = session {
            if let Err(err) = session.end() {
                warn!("Ending immersive session failed: {err}");
            }
        }
    }

    fn hand_off(&self) -> Result<ActivationOutcome, ActivationError> {
        self.enter(SessionPhase::ViewerHandoff);
        let link = ViewerLink::ar(self.native_asset_url.clone());
        self.record(format!("Opening native AR viewer: {}", link.href));

        match self.platform.native_viewer.open(&link) {
            Ok(()) => {
                self.record("Native AR viewer invoked");
                Ok(ActivationOutcome::HandedOff)
            }
            Err(err) => Err(self.fail(ArFailure::classified(
                FailureKind::ViewerInvocationError,
                err,
            ))),
        }
    }

    async fn negotiate(
        &self,
        xr: &dyn XrSystem,
        generation: u64,
        cancel: &CancelToken,
    ) -> Result<(), Interrupt> {
        let mode = SessionMode::ImmersiveAr;

        self.enter(SessionPhase::SessionRequesting);
        self.record(format!("Checking {} support", mode.as_str()));
        let supported = xr
            .is_session_supported(mode)
            .await
            .map_err(|err| self.rejected(cancel, ArFailure::from_session_request(err)))?;
        self.update(|state| state.milestones.support_checked = true);
        self.record(format!("{} supported: {supported}", mode.as_str()));
        if !supported {
            return Err(ArFailure::not_supported().into());
        }
        self.checkpoint(cancel)?;

        self.record(format!("Requesting {} session", mode.as_str()));
        let session = xr
            .request_session(mode, &SessionInit::immersive_ar())
            .await
            .map_err(|err| self.rejected(cancel, ArFailure::from_session_request(err)))?;
        self.attach_session(session.clone(), generation);
        self.record("Session created");
        self.checkpoint(cancel)?;

        self.enter(SessionPhase::ContextBinding);
        self.record("Making rendering context XR compatible");
        let compatible = self.handles.renderer.borrow_mut().make_xr_compatible();
        compatible
            .await
            .map_err(|err| {
                self.rejected(cancel, ArFailure::classified(FailureKind::ContextIncompatible, err))
            })?;
        self.update(|state| state.milestones.context_compatible = true);
        self.record("Rendering context is XR compatible");
        self.checkpoint(cancel)?;

        self.enter(SessionPhase::ReferenceSpaceBinding);
        let layer = self.handles.renderer.borrow().xr_layer();
        session
            .update_render_state(layer)
            .map_err(|err| {
                self.rejected(cancel, ArFailure::classified(FailureKind::ReferenceSpaceError, err))
            })?;
        self.record("Render layer bound");
        let space = session
            .request_reference_space(ReferenceSpaceType::Local)
            .await
            .map_err(|err| {
                self.rejected(cancel, ArFailure::classified(FailureKind::ReferenceSpaceError, err))
            })?;
        self.update(|state| state.milestones.reference_space_acquired = true);
        self.record(format!("{} reference space acquired", space.kind.as_str()));
        self.checkpoint(cancel)?;

        self.start_frame_loop(session.as_ref(), space);
        self.enter(SessionPhase::Running);
        self.record("AR session started");
        info!("AR session started successfully");
        Ok(())
    }

    fn checkpoint(&self, cancel: &CancelToken) -> Result<(), Interrupt> {
        if cancel.is_cancelled() {
            return Err(Interrupt::Cancelled);
        }
        if self.phase() == SessionPhase::Ended {
            return Err(Interrupt::Ended);
        }
        Ok(())
    }

    /// A platform call rejected. Rejections that arrive after the
    /// activation was cancelled or the session ended are not failures.
    fn rejected(&self, cancel: &CancelToken, failure: ArFailure) -> Interrupt {
        match self.checkpoint(cancel) {
            Err(interrupt) => {
                debug!("Ignoring rejection after interrupt: {}", failure.message);
                interrupt
            }
            Ok(()) => Interrupt::Failed(failure),
        }
    }

    fn attach_session(&self, session: Rc<dyn XrSession>, generation: u64) {
        {
            let mut shared = self.shared.borrow_mut();
            shared.state.milestones.session_created = true;
            shared.live = Some(LiveSession {
                session: session.clone(),
                reference_space: None,
                frame: None,
                inline: None,
            });
        }

        let shared = Rc::downgrade(&self.shared);
        let handles = self.handles.clone();
        let diagnostics = self.diagnostics.clone();
        let status = self.status.clone();
        session.on_end(Box::new(move || {
            on_session_end(shared, generation, &handles, diagnostics, status);
        }));
    }

    fn start_frame_loop(&self, session: &dyn XrSession, space: ReferenceSpace) {
        let inline = self.handles.inline_view();
        let handles = self.handles.clone();
        let frames = self.frames_presented.clone();
        let pose_space = space.clone();

        let handle = session.request_animation_frame(Box::new(move |_time, frame| {
            let Some(pose) = frame.viewer_pose(&pose_space) else {
                trace!("No viewer pose this frame");
                return;
            };
            let Some(view) = pose.views.first() else {
                return;
            };
            handles.present_view(view);
            frames.set(frames.get() + 1);
        }));

        if let Some(live) = self.shared.borrow_mut().live.as_mut() {
            live.reference_space = Some(space);
            live.frame = Some(handle);
            live.inline = Some(inline);
        }
    }

    /// Enters `Failed`: ends a created session, then reports the failure
    /// with the full diagnostics trail.
    fn fail(&self, failure: ArFailure) -> ActivationError {
        error!("AR session error: {} ({})", failure.message, failure.kind);
        self.record(format!("Activation failed: {}", failure.kind));

        let (live, milestones) = {
            let mut shared = self.shared.borrow_mut();
            shared.state.phase = SessionPhase::Failed;
            shared.state.last_error = Some(failure.clone());
            (shared.live.take(), shared.state.milestones)
        };
        if let Some(live) = live {
            live.release(true, &self.handles);
            self.record("Live session ended after failure");
        }

        self.status.set_loading(false);
        let report = compose_failure_report(&failure, &self.diagnostics.borrow(), &milestones);
        self.status.show_failure(&report);
        self.status
            .append_debug(&format!("Error: {}", failure.message));

        ActivationError::Failed(failure)
    }

    fn finish_cancelled(&self) {
        let live = {
            let mut shared = self.shared.borrow_mut();
            shared.state.phase = SessionPhase::Ended;
            shared.live.take()
        };
        if let Some(live) = live {
            live.release(true, &self.handles);
        }
        self.record("Activation cancelled");
        self.status.set_loading(false);
    }

    fn enter(&self, phase: SessionPhase) {
        debug!("AR phase -> {phase}");
        self.shared.borrow_mut().state.phase = phase;
    }

    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        f(&mut self.shared.borrow_mut().state);
    }

    fn record(&self, message: impl Into<String>) {
        self.diagnostics.borrow_mut().record(message);
    }
}

/// Handles the session's `end` event for activation `generation`
fn on_session_end(
    shared: Weak<RefCell<Shared>>,
    generation: u64,
    handles: &ViewerHandles,
    diagnostics: Rc<RefCell<DiagnosticsLog>>,
    status: Rc<dyn StatusSurface>,
) {
    let Some(shared) = shared.upgrade() else {
        return;
    };

    let live = {
        let mut shared = shared.borrow_mut();
        if shared.generation != generation || !shared.state.is_live() {
            return;
        }
        shared.state.phase = SessionPhase::Ended;
        shared.live.take()
    };
    if let Some(live) = live {
        live.release(false, handles);
    }

    diagnostics.borrow_mut().record("AR session ended");
    status.set_loading(false);
}
