//! Runtime capability detection. Computed once at startup; the resulting
//! [`CapabilityProfile`] picks the AR activation path.

use std::fmt;

/// Platform identifiers of devices that hand AR off to a native viewer
const VIEWER_PLATFORMS: [&str; 6] = [
    "iPad Simulator",
    "iPhone Simulator",
    "iPod Simulator",
    "iPad",
    "iPhone",
    "iPod",
];

/// Desktop-class marker some tablets report alongside touch support
const DESKTOP_CLASS_MARKER: &str = "Mac";

/// Raw signals read from the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnvironment {
    pub platform: String,
    pub user_agent: String,
    /// Whether touch-end events are supported
    pub touch_end_supported: bool,
    /// Whether an immersive-session capability object is present
    pub has_immersive_api: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformFamily {
    ViewerOnly,
    ImmersiveCapable,
    Unsupported,
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ViewerOnly => "viewer-only",
            Self::ImmersiveCapable => "immersive-capable",
            Self::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityProfile {
    pub platform_family: PlatformFamily,
    pub has_immersive_api: bool,
}

impl CapabilityProfile {
    pub fn is_viewer_only(&self) -> bool {
        self.platform_family == PlatformFamily::ViewerOnly
    }
}

/// Classifies the host. Viewer-only detection wins over immersive support.
pub fn detect_capabilities(env: &HostEnvironment) -> CapabilityProfile {
    let converged_tablet = env.user_agent.contains(DESKTOP_CLASS_MARKER) && env.touch_end_supported;
    let viewer_only = VIEWER_PLATFORMS.contains(&env.platform.as_str()) || converged_tablet;

    let platform_family = if viewer_only {
        PlatformFamily::ViewerOnly
    } else if env.has_immersive_api {
        PlatformFamily::ImmersiveCapable
    } else {
        PlatformFamily::Unsupported
    };

    CapabilityProfile {
        platform_family,
        has_immersive_api: env.has_immersive_api,
    }
}
