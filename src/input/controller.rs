use cgmath::{Point2, Rad};
use log::trace;

use super::PointerEvent;
use crate::gfx::scene::SceneObject;

/// Radians of rotation per pixel dragged
pub const DEFAULT_ROTATE_SENSITIVITY: f32 = 0.01;

/// Drag bookkeeping for the single supported pointer stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub active: bool,
    pub last_pointer: Point2<f32>,
}

impl Default for DragState {
    fn default() -> Self {
        Self {
            active: false,
            last_pointer: Point2::new(0.0, 0.0),
        }
    }
}

/// Maps drag deltas onto the target object's rotation
///
/// Horizontal motion turns the object around Y, vertical motion around X.
/// Rotation is purely additive and never clamped.
pub struct DragController {
    pub sensitivity: f32,
    drag: DragState,
}

impl DragController {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            sensitivity,
            drag: DragState::default(),
        }
    }

    pub fn state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.active
    }

    /// Dispatches `event`; returns true when the target was rotated
    pub fn handle(&mut self, event: &PointerEvent, target: Option<&mut SceneObject>) -> bool {
        match event {
            PointerEvent::Down(point) => {
                self.pointer_down(*point);
                false
            }
            PointerEvent::Move(point) => target.is_some_and(|t| self.pointer_move(*point, t)),
            PointerEvent::Up => {
                self.pointer_up();
                false
            }
            PointerEvent::TouchStart(touches) => {
                self.touch_start(touches);
                false
            }
            PointerEvent::TouchMove(touches) => target.is_some_and(|t| self.touch_move(touches, t)),
            PointerEvent::TouchEnd(_) => {
                self.touch_end();
                false
            }
        }
    }

    pub fn pointer_down(&mut self, point: Point2<f32>) {
        self.drag = DragState {
            active: true,
            last_pointer: point,
        };
    }

    pub fn pointer_move(&mut self, point: Point2<f32>, target: &mut SceneObject) -> bool {
        if !self.drag.active {
            return false;
        }

        let delta = point - self.drag.last_pointer;
        target.rotate_by(
            Rad(delta.y * self.sensitivity),
            Rad(delta.x * self.sensitivity),
        );
        self.drag.last_pointer = point;
        trace!("drag delta ({}, {})", delta.x, delta.y);
        true
    }

    pub fn pointer_up(&mut self) {
        self.drag.active = false;
    }

    /// Starts a drag only for a single touch
    pub fn touch_start(&mut self, touches: &[Point2<f32>]) {
        if let [touch] = touches {
            self.pointer_down(*touch);
        }
    }

    pub fn touch_move(&mut self, touches: &[Point2<f32>], target: &mut SceneObject) -> bool {
        match touches {
            [touch] => self.pointer_move(*touch, target),
            _ => false,
        }
    }

    pub fn touch_end(&mut self) {
        self.pointer_up();
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATE_SENSITIVITY)
    }
}
