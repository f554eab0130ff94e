//! Failure classification for AR activation.

use std::fmt;

use super::platform::{PlatformError, PlatformErrorName};
use super::session::SessionPhase;

const FAILURE_PREFIX: &str = "AR session failed: ";
const UNAVAILABLE_MESSAGE: &str = "AR not available on this device/browser.";
const UNKNOWN_MESSAGE: &str = "Unknown error occurred.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The device or browser lacks AR entirely
    Unsupported,
    PermissionRequired,
    AccessDenied,
    /// Immersive mode was rejected
    NotSupported,
    /// The native hand-off call itself raised
    ViewerInvocationError,
    ContextIncompatible,
    ReferenceSpaceError,
    Unknown,
}

impl FailureKind {
    /// Classification of a failed session request, keyed on the error name
    pub fn from_session_request(err: &PlatformError) -> Self {
        match err.name {
            PlatformErrorName::Security => Self::PermissionRequired,
            PlatformErrorName::NotAllowed => Self::AccessDenied,
            PlatformErrorName::NotSupported => Self::NotSupported,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unsupported => "Unsupported",
            Self::PermissionRequired => "PermissionRequired",
            Self::AccessDenied => "AccessDenied",
            Self::NotSupported => "NotSupported",
            Self::ViewerInvocationError => "ViewerInvocationError",
            Self::ContextIncompatible => "ContextIncompatible",
            Self::ReferenceSpaceError => "ReferenceSpaceError",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal AR activation failure: classification, the message shown to
/// the user and the platform error that caused it, if any
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ArFailure {
    pub kind: FailureKind,
    pub message: String,
    #[source]
    pub cause: Option<PlatformError>,
}

impl ArFailure {
    pub fn unavailable() -> Self {
        Self {
            kind: FailureKind::Unsupported,
            message: UNAVAILABLE_MESSAGE.to_string(),
            cause: None,
        }
    }

    pub fn not_supported() -> Self {
        Self {
            kind: FailureKind::NotSupported,
            message: format!("{FAILURE_PREFIX}AR is not supported on your device or browser."),
            cause: None,
        }
    }

    /// Failure of the session request or support query
    pub fn from_session_request(err: PlatformError) -> Self {
        Self::classified(FailureKind::from_session_request(&err), err)
    }

    /// Failure with a fixed classification; the message still follows the
    /// platform error name so permission problems read the same everywhere
    pub fn classified(kind: FailureKind, err: PlatformError) -> Self {
        Self {
            kind,
            message: format!("{FAILURE_PREFIX}{}", user_message(&err)),
            cause: Some(err),
        }
    }
}

fn user_message(err: &PlatformError) -> String {
    match err.name {
        PlatformErrorName::Security => "Camera permission is required.".to_string(),
        PlatformErrorName::NotAllowed => "Camera access is not allowed.".to_string(),
        PlatformErrorName::NotSupported => {
            "AR is not supported on your device or browser.".to_string()
        }
        _ if err.message.is_empty() => UNKNOWN_MESSAGE.to_string(),
        _ => err.message.clone(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
    /// An activation is already live; the request was rejected untouched
    #[error("an AR activation is already in progress (phase: {0})")]
    Busy(SessionPhase),
    #[error(transparent)]
    Failed(#[from] ArFailure),
}

impl ActivationError {
    pub fn failure(&self) -> Option<&ArFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Busy(_) => None,
        }
    }
}
