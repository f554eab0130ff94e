//! Viewer configuration.

use cgmath::Vector3;

use crate::input::DEFAULT_ROTATE_SENSITIVITY;

/// Quick Look sample model used for the native viewer hand-off
pub const DEFAULT_NATIVE_ASSET_URL: &str =
    "https://developer.apple.com/augmented-reality/quick-look/models/teapot/teapot.usdz";

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Primary OBJ model shown in the page
    pub asset_url: String,
    /// Packaged model opened by the native AR viewer
    pub native_asset_url: String,
    /// Radians of rotation per dragged pixel
    pub rotate_sensitivity: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance of the camera from the origin along +Z
    pub camera_z: f32,
    /// Where a successfully loaded model is placed
    pub asset_position: Vector3<f32>,
    /// Initial output surface size in pixels
    pub surface_size: (u32, u32),
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            asset_url: "models/model.obj".to_string(),
            native_asset_url: DEFAULT_NATIVE_ASSET_URL.to_string(),
            rotate_sensitivity: DEFAULT_ROTATE_SENSITIVITY,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_z: 5.0,
            asset_position: Vector3::new(0.0, 0.0, 1.0),
            surface_size: (1200, 800),
        }
    }
}

impl ViewerConfig {
    pub fn with_asset_url(mut self, url: impl Into<String>) -> Self {
        self.asset_url = url.into();
        self
    }

    pub fn with_native_asset_url(mut self, url: impl Into<String>) -> Self {
        self.native_asset_url = url.into();
        self
    }

    pub fn with_rotate_sensitivity(mut self, sensitivity: f32) -> Self {
        self.rotate_sensitivity = sensitivity;
        self
    }

    pub fn with_surface_size(mut self, width: u32, height: u32) -> Self {
        self.surface_size = (width, height);
        self
    }

    pub fn aspect(&self) -> f32 {
        let (width, height) = self.surface_size;
        if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }
}
