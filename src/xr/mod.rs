//! # AR activation
//!
//! Capability detection, the platform seam and the orchestrator that
//! negotiates an AR presentation on the current device.

pub mod cancel;
pub mod capability;
pub mod error;
pub mod orchestrator;
pub mod platform;
pub mod session;

pub use cancel::CancelToken;
pub use capability::{detect_capabilities, CapabilityProfile, HostEnvironment, PlatformFamily};
pub use error::{ActivationError, ArFailure, FailureKind};
pub use orchestrator::{ActivationOutcome, ArOrchestrator};
pub use platform::{NativeViewer, Platform, PlatformError, XrSession, XrSystem};
pub use session::{Milestones, SessionPhase, SessionState};
