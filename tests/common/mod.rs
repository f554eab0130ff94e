//! Scripted platform, renderer and asset doubles shared by the integration tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use arview::gfx::{PerspectiveCamera, RenderBackend, Scene};
use arview::prelude::*;
use arview::xr::platform::{
    EndListener, FrameCallback, FrameHandle, ReferenceSpace, ReferenceSpaceType, SessionInit,
    SessionMode, ViewerLink, ViewerPose, Viewport, XrFrame, XrLayer, XrView,
};
use cgmath::Matrix4;
use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};

pub const CUBE_OBJ: &str = "o cube\n\
v -0.5 -0.5 0.5\nv 0.5 -0.5 0.5\nv 0.5 0.5 0.5\nv -0.5 0.5 0.5\n\
f 1 2 3\nf 3 4 1\n";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn immersive_env() -> HostEnvironment {
    HostEnvironment {
        platform: "Linux armv8l".to_string(),
        user_agent: "Mozilla/5.0 (Linux; Android 14; Pixel 8) Chrome/126".to_string(),
        touch_end_supported: true,
        has_immersive_api: true,
    }
}

pub fn ios_env() -> HostEnvironment {
    HostEnvironment {
        platform: "iPhone".to_string(),
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)".to_string(),
        touch_end_supported: true,
        has_immersive_api: false,
    }
}

pub fn desktop_env() -> HostEnvironment {
    HostEnvironment {
        platform: "Win32".to_string(),
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
        touch_end_supported: false,
        has_immersive_api: false,
    }
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub size: (u32, u32),
    pub resizes: Vec<(u32, u32)>,
    pub renders: usize,
    pub last_camera: Option<Matrix4<f32>>,
    pub xr_compatible_error: Option<PlatformError>,
    pub on_make_compatible: Option<Box<dyn Fn()>>,
}

impl RenderBackend for RecordingRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.resizes.push((width, height));
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn render(&mut self, _scene: &Scene, camera: &PerspectiveCamera) {
        self.renders += 1;
        self.last_camera = Some(camera.world_matrix());
    }

    fn make_xr_compatible(&mut self) -> LocalBoxFuture<'static, Result<(), PlatformError>> {
        if let Some(hook) = &self.on_make_compatible {
            hook();
        }
        let result = match &self.xr_compatible_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        };
        async move { result }.boxed_local()
    }
}

struct MockFrame(Option<ViewerPose>);

impl XrFrame for MockFrame {
    fn viewer_pose(&self, _space: &ReferenceSpace) -> Option<ViewerPose> {
        self.0.clone()
    }
}

pub fn pose(transform: [f32; 16], width: u32, height: u32) -> ViewerPose {
    ViewerPose {
        views: vec![XrView {
            transform,
            viewport: Viewport {
                x: 0,
                y: 0,
                width,
                height,
            },
        }],
    }
}

#[derive(Default)]
pub struct MockSession {
    pub calls: RefCell<Vec<&'static str>>,
    pub layers: RefCell<Vec<XrLayer>>,
    pub render_state_error: RefCell<Option<PlatformError>>,
    pub reference_space_error: RefCell<Option<PlatformError>>,
    callbacks: RefCell<BTreeMap<u32, FrameCallback>>,
    next_handle: Cell<u32>,
    end_listeners: RefCell<Vec<EndListener>>,
    ended: Cell<bool>,
}

impl MockSession {
    pub fn active_callbacks(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn is_ended(&self) -> bool {
        self.ended.get()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == call).count()
    }

    /// Runs every registered frame callback once
    pub fn tick(&self, pose: Option<ViewerPose>) {
        let frame = MockFrame(pose);
        let mut callbacks = std::mem::take(&mut *self.callbacks.borrow_mut());
        for callback in callbacks.values_mut() {
            callback(16.0, &frame);
        }
        self.callbacks.borrow_mut().extend(callbacks);
    }

    /// Dispatches the `end` event
    pub fn fire_end(&self) {
        self.ended.set(true);
        let listeners = std::mem::take(&mut *self.end_listeners.borrow_mut());
        for listener in listeners {
            listener();
        }
    }
}

impl XrSession for MockSession {
    fn update_render_state(&self, layer: XrLayer) -> Result<(), PlatformError> {
        self.calls.borrow_mut().push("updateRenderState");
        self.layers.borrow_mut().push(layer);
        match self.render_state_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn request_reference_space(
        &self,
        kind: ReferenceSpaceType,
    ) -> LocalBoxFuture<'static, Result<ReferenceSpace, PlatformError>> {
        self.calls.borrow_mut().push("requestReferenceSpace");
        let result = match self.reference_space_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(ReferenceSpace { kind, id: 1 }),
        };
        async move { result }.boxed_local()
    }

    fn request_animation_frame(&self, callback: FrameCallback) -> FrameHandle {
        self.calls.borrow_mut().push("requestAnimationFrame");
        let id = self.next_handle.get() + 1;
        self.next_handle.set(id);
        self.callbacks.borrow_mut().insert(id, callback);
        FrameHandle(id)
    }

    fn cancel_animation_frame(&self, handle: FrameHandle) {
        self.calls.borrow_mut().push("cancelAnimationFrame");
        self.callbacks.borrow_mut().remove(&handle.0);
    }

    fn on_end(&self, listener: EndListener) {
        self.end_listeners.borrow_mut().push(listener);
    }

    fn end(&self) -> Result<(), PlatformError> {
        self.calls.borrow_mut().push("end");
        self.fire_end();
        Ok(())
    }
}

pub struct MockXr {
    pub calls: RefCell<Vec<&'static str>>,
    pub supported: RefCell<Result<bool, PlatformError>>,
    pub session_error: RefCell<Option<PlatformError>>,
    pub requested_features: RefCell<Option<SessionInit>>,
    pub session: Rc<MockSession>,
    support_gate: RefCell<Option<oneshot::Receiver<bool>>>,
    on_request: RefCell<Option<Box<dyn Fn()>>>,
}

impl MockXr {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            supported: RefCell::new(Ok(true)),
            session_error: RefCell::new(None),
            requested_features: RefCell::new(None),
            session: Rc::new(MockSession::default()),
            support_gate: RefCell::new(None),
            on_request: RefCell::new(None),
        }
    }

    /// Keeps the support query pending until the returned sender fires
    pub fn gate_support_query(&self) -> oneshot::Sender<bool> {
        let (tx, rx) = oneshot::channel();
        *self.support_gate.borrow_mut() = Some(rx);
        tx
    }

    /// Runs `hook` when a session is requested
    pub fn on_request(&self, hook: impl Fn() + 'static) {
        *self.on_request.borrow_mut() = Some(Box::new(hook));
    }
}

impl XrSystem for MockXr {
    fn is_session_supported(
        &self,
        _mode: SessionMode,
    ) -> LocalBoxFuture<'static, Result<bool, PlatformError>> {
        self.calls.borrow_mut().push("isSessionSupported");
        if let Some(gate) = self.support_gate.borrow_mut().take() {
            return async move { Ok(gate.await.unwrap_or(false)) }.boxed_local();
        }
        let result = self.supported.borrow().clone();
        async move { result }.boxed_local()
    }

    fn request_session(
        &self,
        _mode: SessionMode,
        init: &SessionInit,
    ) -> LocalBoxFuture<'static, Result<Rc<dyn XrSession>, PlatformError>> {
        self.calls.borrow_mut().push("requestSession");
        *self.requested_features.borrow_mut() = Some(init.clone());
        if let Some(hook) = self.on_request.borrow().as_ref() {
            hook();
        }
        let result: Result<Rc<dyn XrSession>, PlatformError> =
            match self.session_error.borrow().clone() {
                Some(err) => Err(err),
                None => Ok(self.session.clone() as Rc<dyn XrSession>),
            };
        async move { result }.boxed_local()
    }
}

#[derive(Default)]
pub struct RecordingViewer {
    pub opened: RefCell<Vec<ViewerLink>>,
    pub error: RefCell<Option<PlatformError>>,
}

impl NativeViewer for RecordingViewer {
    fn open(&self, link: &ViewerLink) -> Result<(), PlatformError> {
        self.opened.borrow_mut().push(link.clone());
        match self.error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

pub struct MemoryAssets(HashMap<String, Vec<u8>>);

impl MemoryAssets {
    pub fn with(url: &str, contents: &str) -> Self {
        let mut files = HashMap::new();
        files.insert(url.to_string(), contents.as_bytes().to_vec());
        Self(files)
    }
}

impl AssetSource for MemoryAssets {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, anyhow::Result<Vec<u8>>> {
        let result = self
            .0
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("404 Not Found: {url}"));
        async move { result }.boxed_local()
    }
}

/// A viewer wired to recording doubles
pub struct Harness {
    pub app: ArViewerApp,
    pub renderer: Rc<RefCell<RecordingRenderer>>,
    pub xr: Rc<MockXr>,
    pub viewer: Rc<RecordingViewer>,
    pub status: Rc<StatusBoard>,
}

impl Harness {
    pub fn new(env: HostEnvironment) -> Self {
        Self::build(env, ViewerConfig::default(), MockXr::new(), RecordingRenderer::default())
    }

    pub fn with_xr(env: HostEnvironment, xr: MockXr) -> Self {
        Self::build(env, ViewerConfig::default(), xr, RecordingRenderer::default())
    }

    pub fn build(
        env: HostEnvironment,
        config: ViewerConfig,
        xr: MockXr,
        renderer: RecordingRenderer,
    ) -> Self {
        init_logger();

        let renderer = Rc::new(RefCell::new(renderer));
        let xr = Rc::new(xr);
        let viewer = Rc::new(RecordingViewer::default());
        let status = Rc::new(StatusBoard::new());

        let backend: Rc<RefCell<dyn RenderBackend>> = renderer.clone();
        let platform = Platform {
            xr: Some(xr.clone() as Rc<dyn XrSystem>),
            native_viewer: viewer.clone() as Rc<dyn NativeViewer>,
        };
        let app = ArViewerApp::new(
            config,
            env,
            backend,
            platform,
            status.clone() as Rc<dyn StatusSurface>,
        );

        Self {
            app,
            renderer,
            xr,
            viewer,
            status,
        }
    }

    pub fn load_cube(&self) -> LoadedAsset {
        let assets = MemoryAssets::with(&self.app.config().asset_url, CUBE_OBJ);
        pollster::block_on(self.app.load_scene(&assets))
    }

    pub fn session(&self) -> &MockSession {
        &self.xr.session
    }

    pub fn rotation(&self) -> (f32, f32) {
        let scene = self.app.handles().scene.borrow();
        let object = self
            .app
            .displayed_object()
            .and_then(|id| scene.object(id))
            .expect("displayed object");
        (object.transform.rotation.x.0, object.transform.rotation.y.0)
    }
}
