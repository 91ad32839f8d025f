//! Pointer drag
//!
//! A body grabbed under the pointer is steered so that every tick it closes
//! a fixed fraction (`stiffness`) of the gap to the pointer. This mirrors a
//! position-based mouse constraint without a joint.

use glam::Vec2;

use super::engine::BodyHandle;

#[derive(Debug, Clone)]
pub struct DragState {
    stiffness: f32,
    grabbed: Option<BodyHandle>,
    pointer: Vec2,
}

impl DragState {
    pub fn new(stiffness: f32) -> Self {
        Self {
            stiffness: stiffness.clamp(0.0, 1.0),
            grabbed: None,
            pointer: Vec2::ZERO,
        }
    }

    pub fn press(&mut self, handle: BodyHandle, point: Vec2) {
        self.grabbed = Some(handle);
        self.pointer = point;
    }

    /// Track the pointer (also while nothing is grabbed)
    pub fn move_to(&mut self, point: Vec2) {
        self.pointer = point;
    }

    pub fn release(&mut self) {
        self.grabbed = None;
    }

    pub fn grabbed(&self) -> Option<BodyHandle> {
        self.grabbed
    }

    /// Grabbed body and where it is being pulled
    pub fn target(&self) -> Option<(BodyHandle, Vec2)> {
        self.grabbed.map(|h| (h, self.pointer))
    }

    /// Velocity that closes `stiffness` of the gap within one step of `dt`
    pub fn velocity_towards(&self, position: Vec2, pointer: Vec2, dt: f32) -> Vec2 {
        if dt <= 0.0 {
            return Vec2::ZERO;
        }
        (pointer - position) * self.stiffness / dt
    }
}
