//! Shared simulation context
//!
//! One `World` per page. It owns the engine, the seeded RNG, the tunables,
//! the current viewport and the settings derived from it. Components borrow
//! it mutably for the duration of one decision; nothing holds a copy.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::engine::PhysicsEngine;
use crate::config::HeroConfig;
use crate::settings::{Breakpoint, SpawnSettings, compute_settings};

/// Size of the rendering surface in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn breakpoint(&self) -> Breakpoint {
        Breakpoint::from_width(self.width)
    }
}

pub struct World<E: PhysicsEngine> {
    pub engine: E,
    pub rng: Pcg32,
    pub config: HeroConfig,
    viewport: Viewport,
    settings: SpawnSettings,
}

impl<E: PhysicsEngine> World<E> {
    /// Create the world and set gravity once (straight down)
    pub fn new(mut engine: E, config: HeroConfig, viewport: Viewport, seed: u64) -> Self {
        engine.set_gravity(Vec2::new(0.0, config.gravity_y));
        Self {
            engine,
            rng: Pcg32::seed_from_u64(seed),
            config,
            viewport,
            settings: compute_settings(viewport.width),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn settings(&self) -> SpawnSettings {
        self.settings
    }

    /// Adopt a new viewport and re-derive settings; true if they changed
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        self.viewport = viewport;
        let settings = compute_settings(viewport.width);
        let changed = settings != self.settings;
        if changed {
            log::info!(
                "Spawn settings now {} (cap {}, every {} ms)",
                viewport.breakpoint().as_str(),
                settings.max_bodies,
                settings.spawn_interval_ms
            );
        }
        self.settings = settings;
        changed
    }
}
