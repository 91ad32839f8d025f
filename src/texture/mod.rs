//! Procedural sprite textures
//!
//! Sprites are drawn once on a software canvas and handed to the platform
//! layer as raw RGBA, so the same pixels come out in the browser, natively
//! and in tests.

pub mod canvas;
pub mod sdf;
pub mod sprites;

pub use canvas::{Canvas, Color, SpriteImage};
pub use sprites::{SpriteKind, TextureCache, generate};
