//! Responsive spawn settings
//!
//! Derived fresh from the viewport width every time it matters; never stored
//! across page loads.

use serde::{Deserialize, Serialize};

use crate::consts::MOBILE_BREAKPOINT;

/// Viewport class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Breakpoint {
    Mobile,
    #[default]
    Desktop,
}

impl Breakpoint {
    /// Classify a viewport width (mobile is strictly below 768)
    pub fn from_width(width: f32) -> Self {
        if width < MOBILE_BREAKPOINT {
            Breakpoint::Mobile
        } else {
            Breakpoint::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Breakpoint::Mobile => "mobile",
            Breakpoint::Desktop => "desktop",
        }
    }

    /// Population cap for this class
    pub fn max_bodies(&self) -> usize {
        match self {
            Breakpoint::Mobile => 60,
            Breakpoint::Desktop => 200,
        }
    }

    /// Spawn timer period in milliseconds
    pub fn spawn_interval_ms(&self) -> u32 {
        match self {
            Breakpoint::Mobile => 600,
            Breakpoint::Desktop => 300,
        }
    }

    /// Bodies dropped at startup regardless of the cap
    pub fn initial_burst_count(&self) -> u32 {
        10
    }

    pub fn settings(&self) -> SpawnSettings {
        SpawnSettings {
            max_bodies: self.max_bodies(),
            spawn_interval_ms: self.spawn_interval_ms(),
            initial_burst_count: self.initial_burst_count(),
        }
    }
}

/// Population and cadence for the spawner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnSettings {
    /// Maximum live dynamic bodies at a timer spawn decision
    pub max_bodies: usize,
    /// Spawn timer period
    pub spawn_interval_ms: u32,
    /// Staggered spawns at startup (bypasses the cap)
    pub initial_burst_count: u32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Breakpoint::default().settings()
    }
}

/// Map a viewport width to its spawn settings
pub fn compute_settings(width: f32) -> SpawnSettings {
    Breakpoint::from_width(width).settings()
}
