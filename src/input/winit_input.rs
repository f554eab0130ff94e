use std::collections::BTreeMap;

use cgmath::Point2;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent},
};

use super::PointerEvent;

/// Converts winit window events into [`PointerEvent`]s
///
/// Winit reports touches one id at a time; the tracker keeps the set of
/// active touches so the controller can tell single from multi-touch.
#[derive(Debug)]
pub struct PointerTracker {
    cursor: Point2<f32>,
    touches: BTreeMap<u64, Point2<f32>>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self {
            cursor: Point2::new(0.0, 0.0),
            touches: BTreeMap::new(),
        }
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => Some(self.mouse_button(*state)),
            WindowEvent::CursorMoved { position, .. } => Some(self.cursor_moved(*position)),
            WindowEvent::Touch(Touch {
                phase,
                location,
                id,
                ..
            }) => Some(self.touch(*phase, *id, *location)),
            _ => None,
        }
    }

    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    pub(crate) fn mouse_button(&mut self, state: ElementState) -> PointerEvent {
        match state {
            ElementState::Pressed => PointerEvent::Down(self.cursor),
            ElementState::Released => PointerEvent::Up,
        }
    }

    pub(crate) fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> PointerEvent {
        self.cursor = to_point(position);
        PointerEvent::Move(self.cursor)
    }

    pub(crate) fn touch(
        &mut self,
        phase: TouchPhase,
        id: u64,
        location: PhysicalPosition<f64>,
    ) -> PointerEvent {
        match phase {
            TouchPhase::Started => {
                self.touches.insert(id, to_point(location));
                PointerEvent::TouchStart(self.active_points())
            }
            TouchPhase::Moved => {
                self.touches.insert(id, to_point(location));
                PointerEvent::TouchMove(self.active_points())
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.remove(&id);
                PointerEvent::TouchEnd(self.active_points())
            }
        }
    }

    fn active_points(&self) -> Vec<Point2<f32>> {
        self.touches.values().copied().collect()
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn to_point(position: PhysicalPosition<f64>) -> Point2<f32> {
    Point2::new(position.x as f32, position.y as f32)
}
