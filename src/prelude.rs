//! # arview Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use arview::prelude::*;
//!
//! let env = HostEnvironment {
//!     platform: "iPhone".to_string(),
//!     ..HostEnvironment::default()
//! };
//! assert_eq!(detect_capabilities(&env).platform_family, PlatformFamily::ViewerOnly);
//! ```

pub use crate::app::ArViewerApp;
pub use crate::config::ViewerConfig;

pub use crate::assets::{AssetSource, FileAssetSource, LoadedAsset};
pub use crate::gfx::{
    Light, ObjectId, PerspectiveCamera, RenderBackend, Scene, SceneObject, Transform,
    ViewerHandles,
};
pub use crate::input::{DragController, PointerEvent, PointerTracker};
pub use crate::ui::{debug_panel, DebugInfo, StatusBoard, StatusSurface};
pub use crate::xr::{
    detect_capabilities, ActivationError, ActivationOutcome, ArFailure, ArOrchestrator,
    CancelToken, CapabilityProfile, FailureKind, HostEnvironment, NativeViewer, Platform,
    PlatformError, PlatformFamily, SessionPhase, XrSession, XrSystem,
};

pub use cgmath::{Point2, Vector3};
