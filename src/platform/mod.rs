//! Platform layer
//!
//! The browser host: finds the hero container, draws bodies with Canvas 2D
//! and forwards resize, scroll, orientation and pointer events to the scene.
//! Native builds have no platform layer; the binary drives the scene headless.

#[cfg(target_arch = "wasm32")]
pub mod web;
