//! The hero scene: everything one page's physics surface needs
//!
//! Host events map one-to-one onto methods here. Time only moves through
//! `advance`, which drives the spawn timers and the fixed-step engine.

use glam::Vec2;

use super::boundary::{BoundaryManager, BoundarySet, ResizeGate};
use super::engine::{BodyState, PhysicsEngine};
use super::forces::{ScreenRotation, ScrollJitter, apply_tilt};
use super::spawner::Spawner;
use super::world::{Viewport, World};
use crate::config::HeroConfig;
use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, SIM_DT, SIM_DT_MS};
use crate::settings::SpawnSettings;
use crate::texture::TextureCache;

/// What one call to `advance` did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub spawned: usize,
    pub substeps: u32,
}

pub struct HeroScene<E: PhysicsEngine> {
    world: World<E>,
    boundaries: BoundaryManager,
    resize_gate: ResizeGate,
    spawner: Spawner,
    scroll: ScrollJitter,
    textures: TextureCache,
    accumulator_ms: f32,
}

impl<E: PhysicsEngine> HeroScene<E> {
    /// Build the scene: textures, boundaries, and the startup burst schedule
    pub fn new(engine: E, config: HeroConfig, viewport: Viewport, scroll_offset: f32, seed: u64) -> Self {
        let config = config.validated();
        let mut world = World::new(engine, config, viewport, seed);

        let mut textures = TextureCache::new();
        textures.warm();

        let mut boundaries = BoundaryManager::new();
        boundaries.rebuild(&mut world);

        let resize_gate = ResizeGate::new(viewport.width, world.config.resize_threshold);
        let scroll = ScrollJitter::new(
            scroll_offset,
            world.config.scroll_threshold,
            world.config.scroll_force,
        );
        let spawner = Spawner::new(&world);

        let settings = world.settings();
        log::info!(
            "Hero scene ready: {}x{} {} (cap {}, every {} ms, burst {})",
            viewport.width,
            viewport.height,
            viewport.breakpoint().as_str(),
            settings.max_bodies,
            settings.spawn_interval_ms,
            settings.initial_burst_count
        );

        Self {
            world,
            boundaries,
            resize_gate,
            spawner,
            scroll,
            textures,
            accumulator_ms: 0.0,
        }
    }

    /// Container resized; rebuilds boundaries and settings only for a
    /// structural width change
    pub fn on_resize(&mut self, viewport: Viewport) -> bool {
        if !self.resize_gate.should_rebuild(viewport.width) {
            return false;
        }
        self.world.set_viewport(viewport);
        self.boundaries.rebuild(&mut self.world);
        true
    }

    /// Page scrolled to `offset`; returns the jitter magnitude if it fired
    pub fn on_scroll(&mut self, offset: f32) -> Option<f32> {
        self.scroll.on_scroll(&mut self.world, offset)
    }

    /// Device orientation reading; returns the new horizontal gravity
    pub fn on_orientation(
        &mut self,
        rotation: Option<ScreenRotation>,
        beta: Option<f32>,
        gamma: Option<f32>,
    ) -> Option<f32> {
        apply_tilt(&mut self.world, rotation, beta, gamma)
    }

    pub fn pointer_down(&mut self, point: Vec2) {
        self.world.engine.pointer_down(point);
    }

    pub fn pointer_move(&mut self, point: Vec2) {
        self.world.engine.pointer_move(point);
    }

    pub fn pointer_up(&mut self) {
        self.world.engine.pointer_up();
    }

    /// Advance by one frame of wall time
    pub fn advance(&mut self, frame_ms: f32) -> FrameReport {
        let dt_ms = frame_ms.clamp(0.0, MAX_FRAME_MS);
        let spawned = self.spawner.advance(&mut self.world, dt_ms);

        self.accumulator_ms += dt_ms;
        let mut substeps = 0;
        while self.accumulator_ms >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            self.world.engine.step(SIM_DT);
            self.accumulator_ms -= SIM_DT_MS;
            substeps += 1;
        }

        FrameReport { spawned, substeps }
    }

    pub fn world(&self) -> &World<E> {
        &self.world
    }

    pub fn engine(&self) -> &E {
        &self.world.engine
    }

    pub fn settings(&self) -> SpawnSettings {
        self.world.settings()
    }

    pub fn viewport(&self) -> Viewport {
        self.world.viewport()
    }

    pub fn boundaries(&self) -> Option<BoundarySet> {
        self.boundaries.current()
    }

    pub fn bodies(&self) -> Vec<BodyState> {
        self.world.engine.bodies()
    }

    /// Number of spawned bodies currently in the world
    pub fn population(&self) -> usize {
        self.world.engine.dynamic_count()
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn textures_mut(&mut self) -> &mut TextureCache {
        &mut self.textures
    }
}
