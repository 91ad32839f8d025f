//! Population control and weighted spawning
//!
//! A repeating timer drops one body above the viewport per period while the
//! dynamic population is below the cap. At startup a short staggered burst
//! ignores the cap so the hero is never empty.

use std::f32::consts::TAU;
use std::ops::Range;

use glam::Vec2;
use rand::Rng;

use super::engine::{BodyDesc, BodyHandle, Material, PhysicsEngine, Shape, SpriteRef};
use super::world::World;
use crate::config::HeroConfig;
use crate::texture::SpriteKind;

/// Cumulative distribution lookup table
#[derive(Debug, Clone)]
pub struct Cdf<T: Copy> {
    /// (cumulative upper bound, value), ascending, last bound is 1.0
    entries: Vec<(f32, T)>,
}

impl<T: Copy> Cdf<T> {
    /// Build from relative weights (need not sum to one)
    pub fn from_weights(weights: &[(f32, T)]) -> Self {
        let total: f32 = weights.iter().map(|(w, _)| w.max(0.0)).sum();
        let mut acc = 0.0;
        let mut entries: Vec<(f32, T)> = weights
            .iter()
            .map(|(w, value)| {
                acc += if total > 0.0 {
                    w.max(0.0) / total
                } else {
                    1.0 / weights.len() as f32
                };
                (acc, *value)
            })
            .collect();
        if let Some(last) = entries.last_mut() {
            last.0 = 1.0;
        }
        Self { entries }
    }

    /// Value for a uniform draw `u` in [0, 1); `None` only for an empty table
    pub fn pick(&self, u: f32) -> Option<T> {
        self.entries
            .iter()
            .find(|(bound, _)| u < *bound)
            .or(self.entries.last())
            .map(|(_, value)| *value)
    }

    pub fn bounds(&self) -> impl Iterator<Item = f32> + '_ {
        self.entries.iter().map(|(b, _)| *b)
    }
}

/// First-level spawn category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnCategory {
    Drone,
    Camera,
}

impl SpawnCategory {
    /// Uniform scale variant range
    pub fn scale_range(&self) -> Range<f32> {
        match self {
            SpawnCategory::Drone => 0.8..1.2,
            SpawnCategory::Camera => 0.7..1.0,
        }
    }
}

/// Two-stage weighted selection: category, then camera style
#[derive(Debug, Clone)]
pub struct SpawnTable {
    categories: Cdf<SpawnCategory>,
    cameras: Cdf<SpriteKind>,
}

impl SpawnTable {
    pub fn new(drone_share: f32) -> Self {
        Self {
            categories: Cdf::from_weights(&[
                (drone_share, SpawnCategory::Drone),
                (1.0 - drone_share, SpawnCategory::Camera),
            ]),
            cameras: Cdf::from_weights(&[
                (1.0, SpriteKind::CameraModern),
                (1.0, SpriteKind::CameraCinema),
                (1.0, SpriteKind::CameraVintage),
            ]),
        }
    }

    pub fn category(&self, r: f32) -> SpawnCategory {
        self.categories.pick(r).unwrap_or(SpawnCategory::Camera)
    }

    pub fn camera_split(&self, u: f32) -> SpriteKind {
        self.cameras.pick(u).unwrap_or(SpriteKind::CameraModern)
    }

    /// Draw a category, and for cameras a second value for the style
    pub fn select<R: Rng>(&self, rng: &mut R) -> (SpawnCategory, SpriteKind) {
        match self.category(rng.random()) {
            SpawnCategory::Drone => (SpawnCategory::Drone, SpriteKind::Drone),
            SpawnCategory::Camera => (SpawnCategory::Camera, self.camera_split(rng.random())),
        }
    }
}

impl Default for SpawnTable {
    fn default() -> Self {
        Self::new(HeroConfig::default().drone_share)
    }
}

/// Keep a spawn x inside `[padding, width - padding]`
///
/// Surfaces narrower than two paddings collapse to their center.
pub fn clamp_spawn_x(x: f32, width: f32, padding: f32) -> f32 {
    if width < padding * 2.0 {
        return width / 2.0;
    }
    x.clamp(padding, width - padding)
}

/// One rolled spawn, before it becomes a body
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPlan {
    pub kind: SpriteKind,
    pub scale: f32,
    pub position: Vec2,
    pub radius: f32,
    pub angle: f32,
    /// Radians per tick
    pub angular_velocity: f32,
}

impl SpawnPlan {
    pub fn roll<R: Rng>(rng: &mut R, table: &SpawnTable, width: f32, config: &HeroConfig) -> Self {
        let (category, kind) = table.select(rng);
        let scale = rng.random_range(category.scale_range());

        let x = clamp_spawn_x(rng.random::<f32>() * width, width, config.spawn_padding);
        let size = config.base_size * scale;

        Self {
            kind,
            scale,
            position: Vec2::new(x, config.spawn_y),
            radius: size * config.collider_factor,
            angle: rng.random::<f32>() * TAU,
            angular_velocity: (rng.random::<f32>() - 0.5) * 2.0 * config.max_spin,
        }
    }

    pub fn body_desc(&self, config: &HeroConfig) -> BodyDesc {
        BodyDesc {
            position: self.position,
            shape: Shape::Circle {
                radius: self.radius,
            },
            angle: self.angle,
            angular_velocity: self.angular_velocity,
            material: Material::SPAWNED,
            sprite: Some(SpriteRef {
                kind: self.kind,
                scale: self.scale * config.sprite_scale,
            }),
            is_static: false,
        }
    }
}

/// Repeating timer driven by elapsed frame time
#[derive(Debug, Clone, Default)]
pub struct SpawnClock {
    elapsed_ms: f32,
}

impl SpawnClock {
    /// Advance by `dt_ms`; returns how many periods completed
    pub fn advance(&mut self, dt_ms: f32, interval_ms: u32) -> u32 {
        let interval = interval_ms.max(1) as f32;
        self.elapsed_ms += dt_ms.max(0.0);
        let mut fires = 0;
        while self.elapsed_ms >= interval {
            self.elapsed_ms -= interval;
            fires += 1;
        }
        fires
    }
}

/// One-time staggered startup spawns at 0, stagger, 2·stagger, ...
#[derive(Debug, Clone)]
pub struct BurstSchedule {
    total: u32,
    fired: u32,
    elapsed_ms: f32,
    stagger_ms: f32,
}

impl BurstSchedule {
    pub fn new(total: u32, stagger_ms: f32) -> Self {
        Self {
            total,
            fired: 0,
            elapsed_ms: 0.0,
            stagger_ms,
        }
    }

    /// Advance by `dt_ms`; returns how many burst spawns became due
    pub fn advance(&mut self, dt_ms: f32) -> u32 {
        if self.is_done() {
            return 0;
        }
        self.elapsed_ms += dt_ms.max(0.0);
        let due = if self.stagger_ms <= 0.0 {
            self.total
        } else {
            ((self.elapsed_ms / self.stagger_ms).floor() as u32 + 1).min(self.total)
        };
        let newly = due.saturating_sub(self.fired);
        self.fired = self.fired.max(due);
        newly
    }

    pub fn is_done(&self) -> bool {
        self.fired >= self.total
    }

    pub fn fired(&self) -> u32 {
        self.fired
    }
}

/// Spawn decisions for the scene
#[derive(Debug, Clone)]
pub struct Spawner {
    table: SpawnTable,
    clock: SpawnClock,
    burst: BurstSchedule,
    spawned: u64,
}

impl Spawner {
    /// Uses the world's current settings for the burst size
    pub fn new<E: PhysicsEngine>(world: &World<E>) -> Self {
        Self {
            table: SpawnTable::new(world.config.drone_share),
            clock: SpawnClock::default(),
            burst: BurstSchedule::new(
                world.settings().initial_burst_count,
                world.config.burst_stagger_ms,
            ),
            spawned: 0,
        }
    }

    /// Bodies created so far
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn burst_done(&self) -> bool {
        self.burst.is_done()
    }

    /// Create one body unconditionally
    pub fn spawn<E: PhysicsEngine>(&mut self, world: &mut World<E>) -> BodyHandle {
        let width = world.viewport().width;
        let plan = SpawnPlan::roll(&mut world.rng, &self.table, width, &world.config);
        let handle = world.engine.add_body(&plan.body_desc(&world.config));
        self.spawned += 1;
        log::debug!(
            "Spawned {} {:?} at x={:.0} (scale {:.2})",
            plan.kind.as_str(),
            handle,
            plan.position.x,
            plan.scale
        );
        handle
    }

    /// Timer path: spawn only while the dynamic population is below the cap
    pub fn try_spawn<E: PhysicsEngine>(&mut self, world: &mut World<E>) -> Option<BodyHandle> {
        if world.engine.dynamic_count() >= world.settings().max_bodies {
            return None;
        }
        Some(self.spawn(world))
    }

    /// Run due burst spawns and timer ticks; returns bodies created
    pub fn advance<E: PhysicsEngine>(&mut self, world: &mut World<E>, dt_ms: f32) -> usize {
        let mut created = 0;

        for _ in 0..self.burst.advance(dt_ms) {
            self.spawn(world);
            created += 1;
        }

        let fires = self.clock.advance(dt_ms, world.settings().spawn_interval_ms);
        for _ in 0..fires {
            if self.try_spawn(world).is_some() {
                created += 1;
            }
        }

        created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::engine::testing::RecordingEngine;
    use crate::sim::world::Viewport;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn world(width: f32) -> World<RecordingEngine> {
        World::new(
            RecordingEngine::new(),
            HeroConfig::default(),
            Viewport::new(width, 700.0),
            42,
        )
    }

    fn fill_dynamic(world: &mut World<RecordingEngine>, count: usize) {
        let mut spawner = Spawner::new(world);
        for _ in 0..count {
            spawner.spawn(world);
        }
    }

    #[test]
    fn test_table_lookups() {
        let table = SpawnTable::new(0.2);
        assert_eq!(table.category(0.0), SpawnCategory::Drone);
        assert_eq!(table.category(0.1999), SpawnCategory::Drone);
        assert_eq!(table.category(0.2), SpawnCategory::Camera);
        assert_eq!(table.category(0.9999), SpawnCategory::Camera);

        assert_eq!(table.camera_split(0.0), SpriteKind::CameraModern);
        assert_eq!(table.camera_split(0.34), SpriteKind::CameraCinema);
        assert_eq!(table.camera_split(0.67), SpriteKind::CameraVintage);
        assert_eq!(table.camera_split(0.9999), SpriteKind::CameraVintage);
    }

    #[test]
    fn test_cdf_last_bound_is_one() {
        let cdf = Cdf::from_weights(&[(1.0, 'a'), (1.0, 'b'), (1.0, 'c')]);
        let bounds: Vec<f32> = cdf.bounds().collect();
        assert!((bounds[0] - 1.0 / 3.0).abs() < 1e-6);
        assert!((bounds[1] - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(bounds[2], 1.0);
        // Out-of-range draws land on the last entry
        assert_eq!(cdf.pick(1.0), Some('c'));
        assert_eq!(Cdf::<char>::from_weights(&[]).pick(0.5), None);
    }

    #[test]
    fn test_distribution_converges() {
        let table = SpawnTable::new(0.2);
        let mut rng = Pcg32::seed_from_u64(2024);
        let n = 20_000;
        let mut counts = [0usize; 4];
        let mut cameras = 0usize;
        for _ in 0..n {
            let (category, kind) = table.select(&mut rng);
            counts[kind.index()] += 1;
            if category == SpawnCategory::Camera {
                cameras += 1;
            }
        }

        let drone_share = counts[0] as f32 / n as f32;
        assert!((drone_share - 0.2).abs() < 0.015, "drone share {}", drone_share);
        for kind in &SpriteKind::ALL[1..] {
            let share = counts[kind.index()] as f32 / cameras as f32;
            assert!((share - 1.0 / 3.0).abs() < 0.02, "{} share {}", kind.as_str(), share);
        }
    }

    #[test]
    fn test_plan_ranges() {
        let config = HeroConfig::default();
        let table = SpawnTable::default();
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..2_000 {
            let plan = SpawnPlan::roll(&mut rng, &table, 1024.0, &config);
            let range = if plan.kind.is_camera() { 0.7..1.0 } else { 0.8..1.2 };
            assert!(range.contains(&plan.scale));
            assert!((plan.radius - 60.0 * plan.scale * 0.45).abs() < 1e-4);
            assert_eq!(plan.position.y, -100.0);
            assert!((0.0..TAU).contains(&plan.angle));
            assert!(plan.angular_velocity >= -0.075 && plan.angular_velocity < 0.075);
        }
    }

    #[test]
    fn test_body_desc_material_and_sprite() {
        let config = HeroConfig::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let plan = SpawnPlan::roll(&mut rng, &SpawnTable::default(), 800.0, &config);
        let desc = plan.body_desc(&config);
        assert!(!desc.is_static);
        assert_eq!(desc.material, Material::SPAWNED);
        assert_eq!(desc.material.density, 0.005);
        let sprite = desc.sprite.unwrap();
        assert_eq!(sprite.kind, plan.kind);
        assert!((sprite.scale - plan.scale * 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_narrow_surface_spawns_at_center() {
        assert_eq!(clamp_spawn_x(5.0, 80.0, 50.0), 40.0);
        assert_eq!(clamp_spawn_x(0.0, 100.0, 50.0), 50.0);
    }

    #[test]
    fn test_cap_blocks_timer_spawns() {
        let mut world = world(400.0);
        let cap = world.settings().max_bodies;
        fill_dynamic(&mut world, cap);

        let mut spawner = Spawner::new(&world);
        assert_eq!(spawner.try_spawn(&mut world), None);
        assert_eq!(world.engine.dynamic_count(), cap);
    }

    #[test]
    fn test_cap_ignores_static_bodies() {
        let mut world = world(400.0);
        let cap = world.settings().max_bodies;
        for _ in 0..10 {
            world
                .engine
                .add_body(&BodyDesc::fixed_rect(Vec2::ZERO, Vec2::ONE));
        }
        fill_dynamic(&mut world, cap - 1);

        let mut spawner = Spawner::new(&world);
        assert!(spawner.try_spawn(&mut world).is_some());
        assert_eq!(spawner.try_spawn(&mut world), None);
    }

    #[test]
    fn test_clock_period() {
        let mut clock = SpawnClock::default();
        assert_eq!(clock.advance(299.0, 300), 0);
        assert_eq!(clock.advance(1.0, 300), 1);
        assert_eq!(clock.advance(650.0, 300), 2);
        // Interval change is picked up on the next advance
        assert_eq!(clock.advance(560.0, 600), 1);
    }

    #[test]
    fn test_burst_is_staggered() {
        let mut burst = BurstSchedule::new(10, 100.0);
        assert_eq!(burst.advance(0.0), 1);
        assert_eq!(burst.advance(99.0), 0);
        assert_eq!(burst.advance(1.0), 1);
        assert_eq!(burst.advance(350.0), 3);
        assert_eq!(burst.advance(10_000.0), 5);
        assert!(burst.is_done());
        assert_eq!(burst.advance(100.0), 0);
        assert_eq!(burst.fired(), 10);
    }

    #[test]
    fn test_burst_bypasses_cap() {
        let mut world = world(400.0);
        let cap = world.settings().max_bodies;
        fill_dynamic(&mut world, cap);

        let mut spawner = Spawner::new(&world);
        let created = spawner.advance(&mut world, 1_000.0);
        // Ten burst spawns, the one timer tick is refused
        assert_eq!(created, 10);
        assert_eq!(spawner.spawned(), 10);
        assert_eq!(world.engine.dynamic_count(), cap + 10);
        assert!(spawner.burst_done());
    }

    #[test]
    fn test_timer_spawns_until_cap() {
        let mut world = world(1024.0);
        let mut spawner = Spawner::new(&world);
        // Two minutes of 50 ms frames
        for _ in 0..2_400 {
            spawner.advance(&mut world, 50.0);
            assert!(world.engine.dynamic_count() <= world.settings().max_bodies);
        }
        assert_eq!(world.engine.dynamic_count(), 200);
    }

    proptest! {
        #[test]
        fn prop_spawn_x_within_padding(x in -5000.0f32..5000.0, width in 100.0f32..4000.0) {
            let clamped = clamp_spawn_x(x, width, 50.0);
            prop_assert!(clamped >= 50.0 && clamped <= width - 50.0);
        }

        #[test]
        fn prop_rolled_x_within_padding(seed in any::<u64>(), width in 100.0f32..4000.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let plan = SpawnPlan::roll(&mut rng, &SpawnTable::default(), width, &HeroConfig::default());
            prop_assert!(plan.position.x >= 50.0 && plan.position.x <= width - 50.0);
        }

        #[test]
        fn prop_no_spawn_at_or_over_cap(extra in 0usize..20) {
            let mut world = world(400.0);
            let cap = world.settings().max_bodies;
            fill_dynamic(&mut world, cap + extra);
            let mut spawner = Spawner::new(&world);
            prop_assert!(spawner.try_spawn(&mut world).is_none());
        }
    }
}
