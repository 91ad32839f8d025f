//! `PhysicsEngine` backed by rapier2d
//!
//! Converts the page's tick-based engine units into rapier's SI-style units
//! (pixels, seconds). Bodies keep a small sidecar record with their shape and
//! sprite so the renderer does not need to look at rapier types.

use std::collections::BTreeMap;

use glam::Vec2;
use rapier2d::prelude::*;

use super::engine::{BodyDesc, BodyHandle, BodyState, PhysicsEngine, Shape, SpriteRef};
use super::interaction::DragState;
use crate::consts::{SIM_DT, SIM_DT_MS};

/// Gravity factor 1.0 accelerates at 1000 px/s² (0.001 px/ms²)
pub const GRAVITY_SCALE: f32 = 1000.0;

/// A one-tick force F changes velocity by F/m · tick² px/tick, i.e.
/// F/m · tick_ms² / tick_s px/s. As an impulse that is F · this factor.
pub const FORCE_TO_IMPULSE: f32 = SIM_DT_MS * SIM_DT_MS / SIM_DT;

/// Ticks per second, for angular velocity conversion
const TICKS_PER_SECOND: f32 = 1.0 / SIM_DT;

struct Tracked {
    rigid: RigidBodyHandle,
    shape: Shape,
    sprite: Option<SpriteRef>,
}

/// Manages the rapier2d physics world
pub struct RapierEngine {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    /// Gravity in engine units (factor of `GRAVITY_SCALE`)
    gravity: Vec2,
    tracked: BTreeMap<BodyHandle, Tracked>,
    next_id: u32,
    drag: DragState,
}

impl RapierEngine {
    pub fn new(drag_stiffness: f32) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: SIM_DT,
            ..Default::default()
        };

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            pipeline: PhysicsPipeline::new(),
            integration_parameters,
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            gravity: Vec2::ZERO,
            tracked: BTreeMap::new(),
            next_id: 1,
            drag: DragState::new(drag_stiffness),
        }
    }

    fn build_collider(desc: &BodyDesc) -> Collider {
        let builder = match desc.shape {
            Shape::Circle { radius } => ColliderBuilder::ball(radius),
            Shape::Rect { half_extents } => ColliderBuilder::cuboid(half_extents.x, half_extents.y),
        };
        builder
            .restitution(desc.material.restitution)
            .friction(desc.material.friction)
            .density(desc.material.density)
            // Bounce takes the livelier surface, grip the slicker one
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .build()
    }

    fn snapshot(&self, handle: BodyHandle, tracked: &Tracked) -> Option<BodyState> {
        let body = self.rigid_body_set.get(tracked.rigid)?;
        let translation = body.translation();
        Some(BodyState {
            handle,
            position: Vec2::new(translation.x, translation.y),
            angle: body.rotation().angle(),
            shape: tracked.shape,
            mass: body.mass(),
            sprite: tracked.sprite,
            is_static: !body.is_dynamic(),
        })
    }

    fn wake_all(&mut self) {
        for (_, body) in self.rigid_body_set.iter_mut() {
            if body.is_dynamic() {
                body.wake_up(true);
            }
        }
    }

    /// Steer the grabbed body towards the pointer
    fn apply_drag(&mut self) {
        let Some((grabbed, pointer)) = self.drag.target() else {
            return;
        };
        let Some(tracked) = self.tracked.get(&grabbed) else {
            self.drag.release();
            return;
        };
        if let Some(body) = self.rigid_body_set.get_mut(tracked.rigid) {
            let translation = body.translation();
            let position = Vec2::new(translation.x, translation.y);
            let velocity = self.drag.velocity_towards(position, pointer, SIM_DT);
            body.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }
}

impl PhysicsEngine for RapierEngine {
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let builder = if desc.is_static {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
        };
        let rigid_body = builder
            .translation(vector![desc.position.x, desc.position.y])
            .rotation(desc.angle)
            .angvel(desc.angular_velocity * TICKS_PER_SECOND)
            .build();

        let rigid = self.rigid_body_set.insert(rigid_body);
        self.collider_set.insert_with_parent(
            Self::build_collider(desc),
            rigid,
            &mut self.rigid_body_set,
        );

        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        self.tracked.insert(
            handle,
            Tracked {
                rigid,
                shape: desc.shape,
                sprite: desc.sprite,
            },
        );
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let Some(tracked) = self.tracked.remove(&handle) else {
            return false;
        };
        if self.drag.grabbed() == Some(handle) {
            self.drag.release();
        }
        // Removing the body also removes its attached collider
        self.rigid_body_set
            .remove(
                tracked.rigid,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some()
    }

    fn bodies(&self) -> Vec<BodyState> {
        self.tracked
            .iter()
            .filter_map(|(handle, tracked)| self.snapshot(*handle, tracked))
            .collect()
    }

    fn body(&self, handle: BodyHandle) -> Option<BodyState> {
        let tracked = self.tracked.get(&handle)?;
        self.snapshot(handle, tracked)
    }

    fn dynamic_count(&self) -> usize {
        self.tracked
            .values()
            .filter(|t| {
                self.rigid_body_set
                    .get(t.rigid)
                    .is_some_and(|b| b.is_dynamic())
            })
            .count()
    }

    fn apply_force(&mut self, handle: BodyHandle, point: Vec2, force: Vec2) {
        let Some(tracked) = self.tracked.get(&handle) else {
            return;
        };
        if let Some(body) = self.rigid_body_set.get_mut(tracked.rigid) {
            let impulse = force * FORCE_TO_IMPULSE;
            body.apply_impulse_at_point(vector![impulse.x, impulse.y], point![point.x, point.y], true);
        }
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
        // Resting bodies must notice a tilt
        self.wake_all();
    }

    fn gravity(&self) -> Vec2 {
        self.gravity
    }

    fn pointer_down(&mut self, point: Vec2) {
        if let Some(handle) = self.body_at(point) {
            log::debug!("Grabbed body {:?}", handle);
            self.drag.press(handle, point);
        }
    }

    fn pointer_move(&mut self, point: Vec2) {
        self.drag.move_to(point);
    }

    fn pointer_up(&mut self) {
        self.drag.release();
    }

    fn step(&mut self, dt: f32) {
        self.apply_drag();

        self.integration_parameters.dt = dt;
        let gravity = vector![
            self.gravity.x * GRAVITY_SCALE,
            self.gravity.y * GRAVITY_SCALE
        ];
        let physics_hooks = ();
        let event_handler = ();

        self.pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &physics_hooks,
            &event_handler,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::engine::Material;

    fn ball_at(x: f32, y: f32) -> BodyDesc {
        BodyDesc {
            position: Vec2::new(x, y),
            shape: Shape::Circle { radius: 12.0 },
            angle: 0.0,
            angular_velocity: 0.0,
            material: Material::SPAWNED,
            sprite: None,
            is_static: false,
        }
    }

    #[test]
    fn test_add_remove() {
        let mut engine = RapierEngine::new(0.2);
        let floor = engine.add_body(&BodyDesc::fixed_rect(Vec2::new(0.0, 100.0), Vec2::new(200.0, 20.0)));
        let ball = engine.add_body(&ball_at(0.0, 0.0));
        assert_eq!(engine.bodies().len(), 2);
        assert_eq!(engine.dynamic_count(), 1);
        assert!(engine.body(floor).unwrap().is_static);

        assert!(engine.remove_body(ball));
        assert!(!engine.remove_body(ball));
        assert_eq!(engine.dynamic_count(), 0);
        assert_eq!(engine.bodies().len(), 1);
    }

    #[test]
    fn test_gravity_pulls_down_screen() {
        let mut engine = RapierEngine::new(0.2);
        engine.set_gravity(Vec2::new(0.0, 0.8));
        let ball = engine.add_body(&ball_at(0.0, 0.0));
        for _ in 0..30 {
            engine.step(SIM_DT);
        }
        let y = engine.body(ball).unwrap().position.y;
        // Half a second at 800 px/s² is roughly 100 px
        assert!(y > 50.0 && y < 150.0, "y = {}", y);
    }

    #[test]
    fn test_ball_rests_on_floor() {
        let mut engine = RapierEngine::new(0.2);
        engine.set_gravity(Vec2::new(0.0, 0.8));
        engine.add_body(&BodyDesc::fixed_rect(Vec2::new(0.0, 100.0), Vec2::new(400.0, 20.0)));
        let ball = engine.add_body(&ball_at(0.0, 0.0));
        for _ in 0..300 {
            engine.step(SIM_DT);
        }
        let y = engine.body(ball).unwrap().position.y;
        // Floor top at 90, ball radius 12
        assert!((y - 78.0).abs() < 3.0, "y = {}", y);
    }

    #[test]
    fn test_force_nudges_body() {
        let mut engine = RapierEngine::new(0.2);
        let ball = engine.add_body(&ball_at(0.0, 0.0));
        let position = engine.body(ball).unwrap().position;
        engine.apply_force(ball, position, Vec2::new(0.01, 0.0));
        engine.step(SIM_DT);
        assert!(engine.body(ball).unwrap().position.x > 0.0);
    }

    #[test]
    fn test_drag_pulls_towards_pointer() {
        let mut engine = RapierEngine::new(0.2);
        let ball = engine.add_body(&ball_at(0.0, 0.0));
        engine.pointer_down(Vec2::new(2.0, 0.0));
        engine.pointer_move(Vec2::new(100.0, 0.0));
        for _ in 0..60 {
            engine.step(SIM_DT);
        }
        let x = engine.body(ball).unwrap().position.x;
        assert!(x > 80.0, "x = {}", x);

        engine.pointer_up();
        engine.pointer_down(Vec2::new(500.0, 500.0));
        assert_eq!(engine.drag.grabbed(), None);
    }

    #[test]
    fn test_removing_grabbed_body_releases_drag() {
        let mut engine = RapierEngine::new(0.2);
        let ball = engine.add_body(&ball_at(0.0, 0.0));
        engine.pointer_down(Vec2::ZERO);
        assert_eq!(engine.drag.grabbed(), Some(ball));
        engine.remove_body(ball);
        assert_eq!(engine.drag.grabbed(), None);
        engine.step(SIM_DT);
    }
}
