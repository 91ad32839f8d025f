//! Environmental forces: device tilt and page scroll
//!
//! Tilt steers horizontal gravity (vertical stays fixed). A scroll of more
//! than a few pixels kicks every dynamic body with a small random force.

use glam::Vec2;
use rand::Rng;

use super::engine::PhysicsEngine;
use super::world::World;

/// Screen orientation relative to the device's natural portrait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenRotation {
    Portrait,
    /// Rotated 90 degrees
    LandscapeLeft,
    /// Rotated -90 (reported by some hosts as 270)
    LandscapeRight,
}

impl ScreenRotation {
    /// `None` for angles the tilt mapping doesn't handle (e.g. upside down)
    pub fn from_angle(degrees: i32) -> Option<Self> {
        match degrees {
            0 => Some(ScreenRotation::Portrait),
            90 => Some(ScreenRotation::LandscapeLeft),
            -90 | 270 => Some(ScreenRotation::LandscapeRight),
            _ => None,
        }
    }

    /// Prefer the screen orientation angle, then the legacy window angle;
    /// hosts reporting neither are treated as portrait
    pub fn from_host(screen_angle: Option<i32>, legacy_angle: Option<i32>) -> Option<Self> {
        Self::from_angle(screen_angle.or(legacy_angle).unwrap_or(0))
    }
}

/// Horizontal gravity from the device's tilt angles (degrees)
///
/// Portrait reads left/right tilt (`gamma`), landscape reads front/back tilt
/// (`beta`, negated for -90). Returns `None` when the axis that matters is
/// missing or not a number.
pub fn tilt_to_gravity_x(
    rotation: ScreenRotation,
    beta: Option<f32>,
    gamma: Option<f32>,
    divisor: f32,
) -> Option<f32> {
    let tilt = match rotation {
        ScreenRotation::Portrait => gamma?,
        ScreenRotation::LandscapeLeft => beta?,
        ScreenRotation::LandscapeRight => -beta?,
    };
    if !tilt.is_finite() || divisor <= 0.0 {
        return None;
    }
    Some((tilt / divisor).clamp(-1.0, 1.0))
}

/// Apply a tilt reading to gravity; returns the new horizontal component
pub fn apply_tilt<E: PhysicsEngine>(
    world: &mut World<E>,
    rotation: Option<ScreenRotation>,
    beta: Option<f32>,
    gamma: Option<f32>,
) -> Option<f32> {
    let gx = tilt_to_gravity_x(rotation?, beta, gamma, world.config.tilt_divisor)?;
    let gravity = world.engine.gravity();
    world.engine.set_gravity(Vec2::new(gx, gravity.y));
    Some(gx)
}

/// Scroll-triggered jitter with a dead zone
#[derive(Debug, Clone)]
pub struct ScrollJitter {
    last_offset: f32,
    threshold: f32,
    force: f32,
}

impl ScrollJitter {
    pub fn new(initial_offset: f32, threshold: f32, force: f32) -> Self {
        Self {
            last_offset: initial_offset,
            threshold,
            force,
        }
    }

    /// Offset at the last scroll that produced a jitter
    pub fn last_offset(&self) -> f32 {
        self.last_offset
    }

    /// Handle a new scroll offset; returns the jitter magnitude if one fired
    ///
    /// Fires only when the offset moved strictly more than the threshold
    /// since the last firing. Every dynamic body gets one force at its
    /// position, each axis uniform in `[-magnitude/2, magnitude/2)`.
    pub fn on_scroll<E: PhysicsEngine>(&mut self, world: &mut World<E>, offset: f32) -> Option<f32> {
        if (offset - self.last_offset).abs() <= self.threshold {
            return None;
        }
        self.last_offset = offset;

        let magnitude = self.force * world.rng.random::<f32>();
        let mut nudged = 0;
        for body in world.engine.bodies() {
            if body.is_static {
                continue;
            }
            let force = Vec2::new(
                (world.rng.random::<f32>() - 0.5) * magnitude,
                (world.rng.random::<f32>() - 0.5) * magnitude,
            );
            world.engine.apply_force(body.handle, body.position, force);
            nudged += 1;
        }
        log::debug!(
            "Scroll to {:.0}: jitter {:.4} on {} bodies",
            offset,
            magnitude,
            nudged
        );
        Some(magnitude)
    }
}
