//! # Input
//!
//! Drag-to-rotate interaction for the displayed object. [`PointerTracker`]
//! turns winit window events into [`PointerEvent`]s and [`DragController`]
//! applies them to the object's rotation. Only a single pointer stream is
//! supported; multi-touch gestures are ignored.

pub mod controller;
pub mod winit_input;

use cgmath::Point2;

pub use controller::{DragController, DragState, DEFAULT_ROTATE_SENSITIVITY};
pub use winit_input::PointerTracker;

/// Pointer or touch input in surface pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Down(Point2<f32>),
    Move(Point2<f32>),
    Up,
    /// All touches active after a touch started
    TouchStart(Vec<Point2<f32>>),
    /// All touches active after a touch moved
    TouchMove(Vec<Point2<f32>>),
    /// Touches still active after one ended
    TouchEnd(Vec<Point2<f32>>),
}
