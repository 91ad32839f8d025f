//! Gearfall - decorative falling drones and cameras for a landing page hero
//!
//! Core modules:
//! - `sim`: Spawner, boundaries, environmental forces and the physics engine seam
//! - `texture`: Procedural sprite generation (software 2D canvas)
//! - `settings`: Responsive breakpoints and spawn settings
//! - `config`: Tunables, overridable from the host page
//! - `platform`: Browser wiring (DOM, events, Canvas 2D drawing)

pub mod config;
pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod texture;

pub use config::HeroConfig;
pub use error::{Error, Result};
pub use settings::{Breakpoint, SpawnSettings, compute_settings};

/// Scene configuration constants
pub mod consts {
    /// Fixed physics timestep (60 Hz, one engine "tick")
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Fixed physics timestep in milliseconds
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame we account for (tab switches produce huge gaps)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Viewport widths below this are treated as mobile
    pub const MOBILE_BREAKPOINT: f32 = 768.0;

    /// DOM id of the element hosting the hero surface
    pub const CONTAINER_ID: &str = "hero-canvas-container";
    /// Optional JSON tunables on the container element
    pub const CONFIG_ATTRIBUTE: &str = "data-hero-config";
}
