//! # Graphics Module
//!
//! The viewer's side of the rendering engine: scene graph, camera, procedural
//! geometry and the [`RenderBackend`] trait the actual rasterizer implements.
//!
//! - **Scene** ([`scene`]) - displayed objects, their transforms and lights
//! - **Camera** ([`camera`]) - perspective camera driven by the host or by a device pose
//! - **Geometry** ([`geometry`]) - mesh data and the placeholder cube
//! - **Engine** ([`engine`]) - renderer trait and shared handles

pub mod camera;
pub mod engine;
pub mod geometry;
pub mod scene;

pub use camera::PerspectiveCamera;
pub use engine::{InlineView, RenderBackend, ViewerHandles};
pub use scene::{Light, ObjectId, Scene, SceneObject, Transform};
