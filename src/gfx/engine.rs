//! The rendering-engine seam. The viewer treats the rasterizer as opaque:
//! anything that can size an output surface, draw a scene through a camera
//! and make its context usable by an immersive session.

use std::cell::RefCell;
use std::rc::Rc;

use cgmath::Matrix4;
use futures::future::LocalBoxFuture;

use super::camera::PerspectiveCamera;
use super::scene::Scene;
use crate::xr::platform::{PlatformError, XrLayer, XrView};

pub trait RenderBackend {
    fn resize(&mut self, width: u32, height: u32);

    fn size(&self) -> (u32, u32);

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera);

    /// Marks the graphics context compatible with immersive presentation
    fn make_xr_compatible(&mut self) -> LocalBoxFuture<'static, Result<(), PlatformError>>;

    /// Render-target layer to bind to an immersive session
    fn xr_layer(&self) -> XrLayer {
        XrLayer::default()
    }
}

/// Camera transform and output size of the inline viewer, saved while a
/// device pose drives them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlineView {
    pub camera: Matrix4<f32>,
    pub surface_size: (u32, u32),
}

/// Shared handles to the scene, camera and renderer
///
/// Cloned into per-frame callbacks; every borrow is released before control
/// returns to the event loop.
#[derive(Clone)]
pub struct ViewerHandles {
    pub scene: Rc<RefCell<Scene>>,
    pub camera: Rc<RefCell<PerspectiveCamera>>,
    pub renderer: Rc<RefCell<dyn RenderBackend>>,
}

impl ViewerHandles {
    pub fn new(
        scene: Scene,
        camera: PerspectiveCamera,
        renderer: Rc<RefCell<dyn RenderBackend>>,
    ) -> Self {
        Self {
            scene: Rc::new(RefCell::new(scene)),
            camera: Rc::new(RefCell::new(camera)),
            renderer,
        }
    }

    pub fn render(&self) {
        let scene = self.scene.borrow();
        let camera = self.camera.borrow();
        self.renderer.borrow_mut().render(&scene, &camera);
    }

    /// Sizes the output to the view's viewport, moves the camera to the
    /// view's pose and draws the scene
    pub fn present_view(&self, view: &XrView) {
        self.renderer
            .borrow_mut()
            .resize(view.viewport.width, view.viewport.height);
        self.camera.borrow_mut().set_world_matrix(&view.transform);
        self.render();
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.camera.borrow_mut().resize_projection(width, height);
        self.renderer.borrow_mut().resize(width, height);
    }

    pub fn inline_view(&self) -> InlineView {
        InlineView {
            camera: self.camera.borrow().world_matrix(),
            surface_size: self.renderer.borrow().size(),
        }
    }

    /// Puts the camera and output surface back where the inline viewer had
    /// them
    pub fn restore_inline_view(&self, view: &InlineView) {
        self.camera.borrow_mut().set_world(view.camera);
        let (width, height) = view.surface_size;
        self.resize(width, height);
    }
}
