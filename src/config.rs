//! Scene tunables
//!
//! Defaults reproduce the landing page look. A host page can override any
//! subset through a JSON attribute on the container element, e.g.
//! `data-hero-config='{"gravity_y": 0.6}'`.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::settings::Breakpoint;

/// Every number the scene uses that is not a responsive setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    // === World ===
    /// Vertical gravity, set once at startup (engine units)
    pub gravity_y: f32,

    // === Boundaries ===
    /// Thickness of floor and walls
    pub wall_thickness: f32,
    /// Floor raised above the bottom edge on desktop
    pub floor_offset_desktop: f32,
    /// Floor raised above the bottom edge on mobile (clears browser chrome)
    pub floor_offset_mobile: f32,
    /// Minimum width change that rebuilds boundaries
    pub resize_threshold: f32,

    // === Spawning ===
    /// Share of spawns that are drones (rest split evenly over three cameras)
    pub drone_share: f32,
    /// Sprite size before scale variant
    pub base_size: f32,
    /// Collider radius as a fraction of the scaled size
    pub collider_factor: f32,
    /// Sprite drawn at this fraction of the scale variant
    pub sprite_scale: f32,
    /// Horizontal inset for spawn positions
    pub spawn_padding: f32,
    /// Spawn height (negative is above the visible top edge)
    pub spawn_y: f32,
    /// Initial spin is uniform in [-max_spin, max_spin) rad/tick
    pub max_spin: f32,
    /// Delay between initial burst spawns
    pub burst_stagger_ms: f32,

    // === Environmental forces ===
    /// Scroll distance that must be exceeded before jitter fires
    pub scroll_threshold: f32,
    /// Upper bound of the random scroll jitter magnitude
    pub scroll_force: f32,
    /// Tilt degrees per unit of horizontal gravity
    pub tilt_divisor: f32,

    // === Interaction ===
    /// Pointer drag stiffness (fraction of the gap closed per tick)
    pub drag_stiffness: f32,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            gravity_y: 0.8,

            wall_thickness: 60.0,
            floor_offset_desktop: 10.0,
            floor_offset_mobile: 80.0,
            resize_threshold: 50.0,

            drone_share: 0.2,
            base_size: 60.0,
            collider_factor: 0.45,
            sprite_scale: 0.9,
            spawn_padding: 50.0,
            spawn_y: -100.0,
            max_spin: 0.075,
            burst_stagger_ms: 100.0,

            scroll_threshold: 5.0,
            scroll_force: 0.005,
            tilt_divisor: 50.0,

            drag_stiffness: 0.2,
        }
    }
}

impl HeroConfig {
    /// Parse overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: HeroConfig = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Parse overrides, falling back to defaults on any error
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(config)) => {
                log::info!("Loaded hero config overrides");
                config
            }
            Some(Err(e)) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Floor inset for a viewport class
    pub fn floor_offset(&self, breakpoint: Breakpoint) -> f32 {
        match breakpoint {
            Breakpoint::Mobile => self.floor_offset_mobile,
            Breakpoint::Desktop => self.floor_offset_desktop,
        }
    }

    /// Replace values that would break the scene with defaults
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        fn fix(name: &str, value: &mut f32, fallback: f32, ok: impl Fn(f32) -> bool) {
            if !value.is_finite() || !ok(*value) {
                log::warn!("Hero config `{}` = {} rejected, using {}", name, value, fallback);
                *value = fallback;
            }
        }

        fix("wall_thickness", &mut self.wall_thickness, defaults.wall_thickness, |v| v > 0.0);
        fix("resize_threshold", &mut self.resize_threshold, defaults.resize_threshold, |v| v >= 0.0);
        fix("scroll_threshold", &mut self.scroll_threshold, defaults.scroll_threshold, |v| v >= 0.0);
        fix("tilt_divisor", &mut self.tilt_divisor, defaults.tilt_divisor, |v| v > 0.0);
        fix("base_size", &mut self.base_size, defaults.base_size, |v| v > 0.0);
        fix("collider_factor", &mut self.collider_factor, defaults.collider_factor, |v| v > 0.0);
        fix("spawn_padding", &mut self.spawn_padding, defaults.spawn_padding, |v| v >= 0.0);
        fix("burst_stagger_ms", &mut self.burst_stagger_ms, defaults.burst_stagger_ms, |v| v >= 0.0);
        fix("drone_share", &mut self.drone_share, defaults.drone_share, |v| (0.0..=1.0).contains(&v));
        fix("drag_stiffness", &mut self.drag_stiffness, defaults.drag_stiffness, |v| (0.0..=1.0).contains(&v));
        fix("gravity_y", &mut self.gravity_y, defaults.gravity_y, |_| true);
        fix("scroll_force", &mut self.scroll_force, defaults.scroll_force, |v| v >= 0.0);
        fix("max_spin", &mut self.max_spin, defaults.max_spin, |v| v >= 0.0);
        fix("sprite_scale", &mut self.sprite_scale, defaults.sprite_scale, |v| v > 0.0);
        fix("floor_offset_desktop", &mut self.floor_offset_desktop, defaults.floor_offset_desktop, |_| true);
        fix("floor_offset_mobile", &mut self.floor_offset_mobile, defaults.floor_offset_mobile, |_| true);
        fix("spawn_y", &mut self.spawn_y, defaults.spawn_y, |_| true);

        self
    }
}
