//! # Platform seam
//!
//! Traits for the host services the orchestrator negotiates with: the
//! immersive-session API and the native AR viewer. Implementations wrap the
//! real platform objects; every asynchronous platform call is a
//! [`LocalBoxFuture`] resolving once, so the whole negotiation runs on the
//! host's single-threaded event loop.

use std::fmt;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

/// Closed set of error names reported by immersive platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformErrorName {
    /// Blocked by the security context, e.g. missing camera permission
    Security,
    /// The user or a policy refused access
    NotAllowed,
    /// The requested mode or feature is unavailable
    NotSupported,
    InvalidState,
    Other,
}

impl PlatformErrorName {
    /// Maps a platform-reported error name onto the closed set
    pub fn from_name(name: &str) -> Self {
        match name {
            "SecurityError" => Self::Security,
            "NotAllowedError" => Self::NotAllowed,
            "NotSupportedError" => Self::NotSupported,
            "InvalidStateError" => Self::InvalidState,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Security => "SecurityError",
            Self::NotAllowed => "NotAllowedError",
            Self::NotSupported => "NotSupportedError",
            Self::InvalidState => "InvalidStateError",
            Self::Other => "Error",
        }
    }
}

impl fmt::Display for PlatformErrorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by a platform call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{name}: {message}")]
pub struct PlatformError {
    pub name: PlatformErrorName,
    pub message: String,
}

impl PlatformError {
    pub fn new(name: PlatformErrorName, message: impl Into<String>) -> Self {
        Self {
            name,
            message: message.into(),
        }
    }

    /// Builds an error from a raw platform name such as `"NotAllowedError"`
    pub fn named(name: &str, message: impl Into<String>) -> Self {
        Self::new(PlatformErrorName::from_name(name), message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    ImmersiveAr,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImmersiveAr => "immersive-ar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSpaceType {
    Viewer,
    Local,
    LocalFloor,
}

impl ReferenceSpaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Local => "local",
            Self::LocalFloor => "local-floor",
        }
    }
}

/// Feature negotiation passed with a session request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInit {
    pub required_features: Vec<String>,
    pub optional_features: Vec<String>,
}

impl SessionInit {
    /// `local` reference space required, `dom-overlay` optional
    pub fn immersive_ar() -> Self {
        Self {
            required_features: vec![ReferenceSpaceType::Local.as_str().to_string()],
            optional_features: vec!["dom-overlay".to_string()],
        }
    }
}

/// Render-target layer description bound to a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XrLayer {
    pub antialias: bool,
    pub alpha: bool,
    pub framebuffer_scale: f32,
}

impl Default for XrLayer {
    fn default() -> Self {
        Self {
            antialias: true,
            alpha: true,
            framebuffer_scale: 1.0,
        }
    }
}

/// Opaque handle to an acquired reference space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSpace {
    pub kind: ReferenceSpaceType,
    pub id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One view of a resolved pose, with the layer viewport it renders into
#[derive(Debug, Clone, PartialEq)]
pub struct XrView {
    /// Column-major world transform of the view
    pub transform: [f32; 16],
    pub viewport: Viewport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerPose {
    pub views: Vec<XrView>,
}

/// Frame handed to frame callbacks
pub trait XrFrame {
    /// Resolves the viewer pose against `space`; `None` while tracking is lost
    fn viewer_pose(&self, space: &ReferenceSpace) -> Option<ViewerPose>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u32);

/// Called with the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnMut(f64, &dyn XrFrame)>;

pub type EndListener = Box<dyn FnOnce()>;

/// A live immersive session
pub trait XrSession {
    fn update_render_state(&self, layer: XrLayer) -> Result<(), PlatformError>;

    fn request_reference_space(
        &self,
        kind: ReferenceSpaceType,
    ) -> LocalBoxFuture<'static, Result<ReferenceSpace, PlatformError>>;

    /// Registers `callback` for every presented frame until cancelled
    fn request_animation_frame(&self, callback: FrameCallback) -> FrameHandle;

    fn cancel_animation_frame(&self, handle: FrameHandle);

    /// Registers a listener for the session's `end` event
    fn on_end(&self, listener: EndListener);

    fn end(&self) -> Result<(), PlatformError>;
}

/// Entry point of the immersive-session API
pub trait XrSystem {
    fn is_session_supported(&self, mode: SessionMode)
        -> LocalBoxFuture<'static, Result<bool, PlatformError>>;

    fn request_session(
        &self,
        mode: SessionMode,
        init: &SessionInit,
    ) -> LocalBoxFuture<'static, Result<Rc<dyn XrSession>, PlatformError>>;
}

/// Link handed to the native AR viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerLink {
    pub href: String,
    pub rel: &'static str,
}

impl ViewerLink {
    pub fn ar(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: "ar",
        }
    }
}

/// Platform-native AR viewer. Opening is fire-and-forget; only errors raised
/// by the invocation itself are observable.
pub trait NativeViewer {
    fn open(&self, link: &ViewerLink) -> Result<(), PlatformError>;
}

/// The platform services available to an activation
#[derive(Clone)]
pub struct Platform {
    pub xr: Option<Rc<dyn XrSystem>>,
    pub native_viewer: Rc<dyn NativeViewer>,
}
