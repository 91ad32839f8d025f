//! Floor and side walls
//!
//! Exactly one set of three static colliders exists at a time. A rebuild
//! removes the old set before adding the new one, so there is never a moment
//! with duplicate colliders.

use glam::Vec2;

use super::engine::{BodyDesc, BodyHandle, PhysicsEngine};
use super::world::{Viewport, World};

/// The three static colliders currently in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundarySet {
    pub floor: BodyHandle,
    pub left_wall: BodyHandle,
    pub right_wall: BodyHandle,
}

impl BoundarySet {
    pub fn handles(&self) -> [BodyHandle; 3] {
        [self.floor, self.left_wall, self.right_wall]
    }
}

/// Geometry of a boundary set (centers and full sizes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryLayout {
    pub floor_center: Vec2,
    pub floor_size: Vec2,
    pub left_center: Vec2,
    pub right_center: Vec2,
    pub wall_size: Vec2,
}

impl BoundaryLayout {
    /// Floor raised by `floor_offset`; walls one thickness outside the edges
    /// and twice the viewport height so nothing escapes sideways
    pub fn compute(viewport: Viewport, floor_offset: f32, wall_thickness: f32) -> Self {
        let Viewport { width, height } = viewport;
        Self {
            floor_center: Vec2::new(width / 2.0, height + wall_thickness / 2.0 - floor_offset),
            floor_size: Vec2::new(width, wall_thickness),
            left_center: Vec2::new(-wall_thickness, height / 2.0),
            right_center: Vec2::new(width + wall_thickness, height / 2.0),
            wall_size: Vec2::new(wall_thickness, height * 2.0),
        }
    }

    /// Top surface of the floor
    pub fn floor_top(&self) -> f32 {
        self.floor_center.y - self.floor_size.y / 2.0
    }
}

/// Owns the boundary set
#[derive(Debug, Default)]
pub struct BoundaryManager {
    current: Option<BoundarySet>,
    rebuilds: u32,
}

impl BoundaryManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<BoundarySet> {
        self.current
    }

    /// Number of times boundaries have been built
    pub fn rebuilds(&self) -> u32 {
        self.rebuilds
    }

    /// Replace the boundary set to fit the world's viewport
    pub fn rebuild<E: PhysicsEngine>(&mut self, world: &mut World<E>) -> BoundarySet {
        let viewport = world.viewport();
        let breakpoint = viewport.breakpoint();
        let layout = BoundaryLayout::compute(
            viewport,
            world.config.floor_offset(breakpoint),
            world.config.wall_thickness,
        );

        if let Some(old) = self.current.take() {
            for handle in old.handles() {
                world.engine.remove_body(handle);
            }
        }

        let set = BoundarySet {
            floor: world
                .engine
                .add_body(&BodyDesc::fixed_rect(layout.floor_center, layout.floor_size)),
            left_wall: world
                .engine
                .add_body(&BodyDesc::fixed_rect(layout.left_center, layout.wall_size)),
            right_wall: world
                .engine
                .add_body(&BodyDesc::fixed_rect(layout.right_center, layout.wall_size)),
        };
        self.current = Some(set);
        self.rebuilds += 1;

        log::info!(
            "Boundaries rebuilt for {}x{} ({}, floor at {})",
            viewport.width,
            viewport.height,
            breakpoint.as_str(),
            layout.floor_top()
        );

        set
    }
}

/// Width-only resize filter
///
/// Mobile browsers resize the viewport height while the address bar slides
/// in and out during scroll; only a width change of at least `threshold`
/// counts as a structural resize.
#[derive(Debug, Clone)]
pub struct ResizeGate {
    last_width: f32,
    threshold: f32,
}

impl ResizeGate {
    pub fn new(initial_width: f32, threshold: f32) -> Self {
        Self {
            last_width: initial_width,
            threshold,
        }
    }

    pub fn last_width(&self) -> f32 {
        self.last_width
    }

    /// True iff `|new_width - last_width| >= threshold`; records the width
    /// only when it passes
    pub fn should_rebuild(&mut self, new_width: f32) -> bool {
        if (new_width - self.last_width).abs() < self.threshold {
            return false;
        }
        self.last_width = new_width;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeroConfig;
    use crate::sim::engine::testing::{EngineCall, RecordingEngine};
    use crate::sim::engine::Shape;
    use proptest::prelude::*;

    fn world(width: f32, height: f32) -> World<RecordingEngine> {
        World::new(
            RecordingEngine::new(),
            HeroConfig::default(),
            Viewport::new(width, height),
            3,
        )
    }

    #[test]
    fn test_desktop_layout() {
        let layout = BoundaryLayout::compute(Viewport::new(1024.0, 600.0), 10.0, 60.0);
        assert_eq!(layout.floor_center, Vec2::new(512.0, 620.0));
        assert_eq!(layout.floor_size, Vec2::new(1024.0, 60.0));
        assert_eq!(layout.floor_top(), 590.0);
        assert_eq!(layout.left_center, Vec2::new(-60.0, 300.0));
        assert_eq!(layout.right_center, Vec2::new(1084.0, 300.0));
        assert_eq!(layout.wall_size, Vec2::new(60.0, 1200.0));
    }

    #[test]
    fn test_mobile_floor_uses_larger_margin() {
        let mut world = world(400.0, 800.0);
        let mut manager = BoundaryManager::new();
        let set = manager.rebuild(&mut world);

        let floor = world.engine.desc(set.floor).unwrap();
        assert!(floor.is_static);
        assert_eq!(floor.position, Vec2::new(200.0, 750.0));
        // Floor top 80 px above the bottom edge
        let Shape::Rect { half_extents } = floor.shape else {
            panic!("floor should be a rectangle");
        };
        assert_eq!(floor.position.y - half_extents.y, 720.0);
    }

    #[test]
    fn test_rebuild_removes_before_adding() {
        let mut world = world(1024.0, 600.0);
        let mut manager = BoundaryManager::new();
        let first = manager.rebuild(&mut world);
        world.engine.calls.clear();

        world.set_viewport(Viewport::new(1280.0, 600.0));
        let second = manager.rebuild(&mut world);

        let calls = &world.engine.calls;
        assert_eq!(calls.len(), 6);
        for (i, handle) in first.handles().iter().enumerate() {
            assert_eq!(calls[i], EngineCall::Remove(*handle));
        }
        for (i, handle) in second.handles().iter().enumerate() {
            assert_eq!(calls[3 + i], EngineCall::Add(*handle));
        }
        // Exactly one set in the world
        assert_eq!(world.engine.bodies().iter().filter(|b| b.is_static).count(), 3);
        assert_eq!(manager.current(), Some(second));
        assert_eq!(manager.rebuilds(), 2);
    }

    #[test]
    fn test_height_only_change_never_rebuilds() {
        let mut gate = ResizeGate::new(390.0, 50.0);
        assert!(!gate.should_rebuild(390.0));
        assert_eq!(gate.last_width(), 390.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut gate = ResizeGate::new(1000.0, 50.0);
        assert!(!gate.should_rebuild(1049.0));
        assert!(gate.should_rebuild(1050.0));
        assert_eq!(gate.last_width(), 1050.0);
        // Compared against the last rebuild, not the last event
        assert!(!gate.should_rebuild(1020.0));
        assert!(gate.should_rebuild(1000.0));
    }

    proptest! {
        #[test]
        fn prop_gate_matches_threshold(last in 0.0f32..4000.0, new in 0.0f32..4000.0) {
            let mut gate = ResizeGate::new(last, 50.0);
            let expected = (new - last).abs() >= 50.0;
            prop_assert_eq!(gate.should_rebuild(new), expected);
            prop_assert_eq!(gate.last_width(), if expected { new } else { last });
        }
    }
}
