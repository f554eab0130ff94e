//! The viewer context object: owns the scene, camera and renderer handles,
//! the interaction controller and the AR orchestrator, and routes host
//! events between them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cgmath::{Deg, Vector3};
use log::{info, trace};
use winit::event::WindowEvent;

use crate::assets::{load_primary_asset, AssetSource, LoadedAsset};
use crate::config::ViewerConfig;
use crate::gfx::{ObjectId, PerspectiveCamera, RenderBackend, Scene, ViewerHandles};
use crate::input::{DragController, PointerEvent, PointerTracker};
use crate::ui::{DebugInfo, StatusSurface};
use crate::xr::{
    detect_capabilities, ActivationError, ActivationOutcome, ArOrchestrator, CapabilityProfile,
    HostEnvironment, Platform,
};

/// One independent viewer instance
///
/// Every method takes `&self`, so pointer input can be handled while an AR
/// activation future is still pending.
pub struct ArViewerApp {
    config: ViewerConfig,
    environment: HostEnvironment,
    handles: ViewerHandles,
    controller: RefCell<DragController>,
    tracker: RefCell<PointerTracker>,
    orchestrator: ArOrchestrator,
    displayed: Cell<Option<ObjectId>>,
}

impl ArViewerApp {
    pub fn new(
        config: ViewerConfig,
        environment: HostEnvironment,
        renderer: Rc<RefCell<dyn RenderBackend>>,
        platform: Platform,
        status: Rc<dyn StatusSurface>,
    ) -> Self {
        let profile = detect_capabilities(&environment);
        info!(
            "Platform: {}, immersive API: {}, AR path: {}",
            environment.platform, profile.has_immersive_api, profile.platform_family
        );

        let mut camera = PerspectiveCamera::new(
            Deg(config.fov_degrees),
            config.aspect(),
            config.near,
            config.far,
        );
        camera.set_position(Vector3::new(0.0, 0.0, config.camera_z));

        let (width, height) = config.surface_size;
        renderer.borrow_mut().resize(width, height);

        let handles = ViewerHandles::new(Scene::new(), camera, renderer);
        let orchestrator = ArOrchestrator::new(
            profile,
            platform,
            handles.clone(),
            status,
            config.native_asset_url.clone(),
        );

        let controller = DragController::new(config.rotate_sensitivity);

        Self {
            config,
            environment,
            handles,
            controller: RefCell::new(controller),
            tracker: RefCell::new(PointerTracker::new()),
            orchestrator,
            displayed: Cell::new(None),
        }
    }

    /// Loads the configured model, or the placeholder if that fails, and
    /// makes it the drag target
    pub async fn load_scene(&self, source: &dyn AssetSource) -> LoadedAsset {
        let loaded = load_primary_asset(
            source,
            &self.config.asset_url,
            &self.handles.scene,
            self.config.asset_position,
        )
        .await;
        self.displayed.set(Some(loaded.id));
        self.orchestrator.set_model_loaded(!loaded.is_placeholder);
        loaded
    }

    /// Applies pointer input to the displayed object. While an immersive
    /// session owns the pose only releases get through, so a drag never
    /// outlives the session.
    pub fn handle_pointer(&self, event: &PointerEvent) -> bool {
        if self.orchestrator.is_presenting() {
            if matches!(event, PointerEvent::Up | PointerEvent::TouchEnd(_)) {
                self.controller.borrow_mut().handle(event, None);
            }
            trace!("Pointer input ignored while presenting");
            return false;
        }

        let mut scene = self.handles.scene.borrow_mut();
        let target = self.displayed.get().and_then(|id| scene.object_mut(id));
        self.controller.borrow_mut().handle(event, target)
    }

    pub fn handle_window_event(&self, event: &WindowEvent) {
        if let WindowEvent::Resized(size) = event {
            self.resize(size.width, size.height);
            return;
        }

        let pointer = self.tracker.borrow_mut().translate(event);
        if let Some(pointer) = pointer {
            self.handle_pointer(&pointer);
        }
    }

    /// Runs the AR activation for this device
    pub async fn request_ar(&self) -> Result<ActivationOutcome, ActivationError> {
        let outcome = self.orchestrator.activate().await;
        if matches!(outcome, Ok(ActivationOutcome::Presenting)) {
            // The device pose takes over; a drag still held is abandoned.
            self.controller.borrow_mut().pointer_up();
        }
        outcome
    }

    pub fn cancel_ar(&self) {
        self.orchestrator.cancel();
    }

    /// Renders one animation tick
    pub fn tick(&self) {
        self.handles.render();
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.handles.resize(width, height);
    }

    pub fn debug_info(&self) -> DebugInfo {
        DebugInfo::new(
            &self.environment,
            self.orchestrator.profile(),
            self.orchestrator.phase(),
        )
    }

    pub fn profile(&self) -> &CapabilityProfile {
        self.orchestrator.profile()
    }

    pub fn orchestrator(&self) -> &ArOrchestrator {
        &self.orchestrator
    }

    pub fn handles(&self) -> &ViewerHandles {
        &self.handles
    }

    pub fn displayed_object(&self) -> Option<ObjectId> {
        self.displayed.get()
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
}
