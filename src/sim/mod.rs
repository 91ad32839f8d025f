//! Simulation module
//!
//! Everything that decides what happens in the hero lives here. It never
//! touches the DOM:
//! - Time advances only through `HeroScene::advance`
//! - Seeded RNG only
//! - Rigid-body physics behind the `PhysicsEngine` trait

pub mod boundary;
pub mod engine;
pub mod forces;
pub mod interaction;
pub mod rapier;
pub mod scene;
pub mod spawner;
pub mod world;

pub use boundary::{BoundaryLayout, BoundaryManager, BoundarySet, ResizeGate};
pub use engine::{BodyDesc, BodyHandle, BodyState, Material, PhysicsEngine, Shape, SpriteRef};
pub use forces::{ScreenRotation, ScrollJitter, apply_tilt, tilt_to_gravity_x};
pub use interaction::DragState;
pub use rapier::RapierEngine;
pub use scene::{FrameReport, HeroScene};
pub use spawner::{
    BurstSchedule, Cdf, SpawnCategory, SpawnClock, SpawnPlan, SpawnTable, Spawner, clamp_spawn_x,
};
pub use world::{Viewport, World};
