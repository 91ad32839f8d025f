//! The physics engine seam
//!
//! The scene never integrates or resolves collisions itself. It talks to a
//! rigid-body engine through `PhysicsEngine`, in tick-based units: pixels,
//! y pointing down, one tick = 1/60 s, gravity as a unitless factor and
//! forces that act for a single tick.

use glam::Vec2;

use crate::texture::SpriteKind;

/// Opaque body id, allocated by the engine in increasing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

/// Collider geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

impl Shape {
    /// Whether a point in the body's local frame lies inside
    pub fn contains_local(&self, p: Vec2) -> bool {
        match *self {
            Shape::Circle { radius } => p.length_squared() <= radius * radius,
            Shape::Rect { half_extents } => p.x.abs() <= half_extents.x && p.y.abs() <= half_extents.y,
        }
    }
}

/// Surface and mass parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub restitution: f32,
    pub friction: f32,
    pub friction_static: f32,
    pub density: f32,
}

impl Material {
    /// Spawned drones and cameras
    pub const SPAWNED: Material = Material {
        restitution: 0.5,
        friction: 0.7,
        friction_static: 1.0,
        density: 0.005,
    };
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: 0.0,
            friction: 0.1,
            friction_static: 0.5,
            density: 0.001,
        }
    }
}

/// Texture to draw a body with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRef {
    pub kind: SpriteKind,
    /// Drawn size relative to the sprite's native canvas
    pub scale: f32,
}

/// Everything needed to create a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub position: Vec2,
    pub shape: Shape,
    pub angle: f32,
    /// Radians per tick
    pub angular_velocity: f32,
    pub material: Material,
    pub sprite: Option<SpriteRef>,
    pub is_static: bool,
}

impl BodyDesc {
    /// Invisible immovable rectangle centered at `center`
    pub fn fixed_rect(center: Vec2, size: Vec2) -> Self {
        Self {
            position: center,
            shape: Shape::Rect {
                half_extents: size * 0.5,
            },
            angle: 0.0,
            angular_velocity: 0.0,
            material: Material::default(),
            sprite: None,
            is_static: true,
        }
    }
}

/// Snapshot of a body for rendering and force decisions
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub handle: BodyHandle,
    pub position: Vec2,
    pub angle: f32,
    pub shape: Shape,
    pub mass: f32,
    pub sprite: Option<SpriteRef>,
    pub is_static: bool,
}

impl BodyState {
    /// Whether a world-space point lies inside the collider
    pub fn contains(&self, point: Vec2) -> bool {
        let local = Vec2::from_angle(-self.angle).rotate(point - self.position);
        self.shape.contains_local(local)
    }
}

/// The narrow interface the scene consumes
pub trait PhysicsEngine {
    /// Create a body and add it to the world
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle;

    /// Remove a body; false if it was not in the world
    fn remove_body(&mut self, handle: BodyHandle) -> bool;

    /// All bodies, in creation order
    fn bodies(&self) -> Vec<BodyState>;

    fn body(&self, handle: BodyHandle) -> Option<BodyState>;

    /// Number of non-static bodies
    fn dynamic_count(&self) -> usize {
        self.bodies().iter().filter(|b| !b.is_static).count()
    }

    /// Apply a one-tick force at a world point
    fn apply_force(&mut self, handle: BodyHandle, point: Vec2, force: Vec2);

    fn set_gravity(&mut self, gravity: Vec2);

    fn gravity(&self) -> Vec2;

    /// Topmost (most recently created) dynamic body under a point
    fn body_at(&self, point: Vec2) -> Option<BodyHandle> {
        self.bodies()
            .into_iter()
            .rev()
            .find(|b| !b.is_static && b.contains(point))
            .map(|b| b.handle)
    }

    /// Pointer pressed: grab whatever is under it
    fn pointer_down(&mut self, point: Vec2);

    fn pointer_move(&mut self, point: Vec2);

    fn pointer_up(&mut self);

    /// Advance the world by `dt` seconds
    fn step(&mut self, dt: f32);
}

/// In-memory engine that records every call instead of simulating
#[cfg(test)]
pub mod testing {
    use super::*;

    /// One call into the engine, in order
    #[derive(Debug, Clone, PartialEq)]
    pub enum EngineCall {
        Add(BodyHandle),
        Remove(BodyHandle),
        Force(BodyHandle, Vec2, Vec2),
        Gravity(Vec2),
        Step,
    }

    #[derive(Debug, Default)]
    pub struct RecordingEngine {
        next_id: u32,
        pub bodies: Vec<(BodyHandle, BodyDesc)>,
        pub calls: Vec<EngineCall>,
        pub gravity: Vec2,
        pub grabbed: Option<BodyHandle>,
        pub pointer: Option<Vec2>,
    }

    impl RecordingEngine {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn desc(&self, handle: BodyHandle) -> Option<&BodyDesc> {
            self.bodies.iter().find(|(h, _)| *h == handle).map(|(_, d)| d)
        }

        pub fn forces(&self) -> Vec<(BodyHandle, Vec2, Vec2)> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    EngineCall::Force(h, p, f) => Some((*h, *p, *f)),
                    _ => None,
                })
                .collect()
        }

        pub fn steps(&self) -> usize {
            self.calls.iter().filter(|c| **c == EngineCall::Step).count()
        }
    }

    impl PhysicsEngine for RecordingEngine {
        fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
            self.next_id += 1;
            let handle = BodyHandle(self.next_id);
            self.bodies.push((handle, desc.clone()));
            self.calls.push(EngineCall::Add(handle));
            handle
        }

        fn remove_body(&mut self, handle: BodyHandle) -> bool {
            let before = self.bodies.len();
            self.bodies.retain(|(h, _)| *h != handle);
            self.calls.push(EngineCall::Remove(handle));
            self.bodies.len() != before
        }

        fn bodies(&self) -> Vec<BodyState> {
            self.bodies
                .iter()
                .map(|(handle, d)| BodyState {
                    handle: *handle,
                    position: d.position,
                    angle: d.angle,
                    shape: d.shape,
                    mass: 1.0,
                    sprite: d.sprite,
                    is_static: d.is_static,
                })
                .collect()
        }

        fn body(&self, handle: BodyHandle) -> Option<BodyState> {
            self.bodies().into_iter().find(|b| b.handle == handle)
        }

        fn apply_force(&mut self, handle: BodyHandle, point: Vec2, force: Vec2) {
            self.calls.push(EngineCall::Force(handle, point, force));
        }

        fn set_gravity(&mut self, gravity: Vec2) {
            self.gravity = gravity;
            self.calls.push(EngineCall::Gravity(gravity));
        }

        fn gravity(&self) -> Vec2 {
            self.gravity
        }

        fn pointer_down(&mut self, point: Vec2) {
            self.pointer = Some(point);
            self.grabbed = self.body_at(point);
        }

        fn pointer_move(&mut self, point: Vec2) {
            self.pointer = Some(point);
        }

        fn pointer_up(&mut self) {
            self.grabbed = None;
        }

        fn step(&mut self, _dt: f32) {
            self.calls.push(EngineCall::Step);
        }
    }
}
