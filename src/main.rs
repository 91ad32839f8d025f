//! Gearfall entry point
//!
//! On the web this mounts the hero scene. Natively it runs the scene
//! headless at a desktop and a mobile viewport and reports the population.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    gearfall::platform::web::start();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gearfall (native) starting...");
    log::info!("The hero surface needs a browser - build for wasm32 and mount it in a page with #hero-canvas-container");

    use gearfall::sim::Viewport;
    run_headless("desktop", Viewport::new(1280.0, 720.0));
    run_headless("mobile", Viewport::new(400.0, 800.0));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simulate 20 seconds at 60 fps, with one scroll and one tilt along the way
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(label: &str, viewport: gearfall::sim::Viewport) {
    use gearfall::HeroConfig;
    use gearfall::sim::{HeroScene, RapierEngine, ScreenRotation};

    const FPS: u32 = 60;
    const SECONDS: u32 = 20;

    let config = HeroConfig::default();
    let mut scene = HeroScene::new(
        RapierEngine::new(config.drag_stiffness),
        config,
        viewport,
        0.0,
        42,
    );

    for frame in 1..=FPS * SECONDS {
        scene.advance(1000.0 / FPS as f32);

        if frame == FPS * 5 {
            scene.on_scroll(400.0);
        }
        if frame == FPS * 10 {
            scene.on_orientation(Some(ScreenRotation::Portrait), Some(0.0), Some(20.0));
        }
        if frame % (FPS * 5) == 0 {
            log::info!(
                "[{}] t={}s population {}/{}",
                label,
                frame / FPS,
                scene.population(),
                scene.settings().max_bodies
            );
        }
    }

    let floor_top = viewport.height - scene.world().config.floor_offset(viewport.breakpoint());
    let below_floor = scene
        .bodies()
        .iter()
        .filter(|b| !b.is_static && b.position.y > floor_top)
        .count();

    println!(
        "{:>8}: {}x{} spawned {} population {}/{} (below floor: {})",
        label,
        viewport.width,
        viewport.height,
        scene.spawner().spawned(),
        scene.population(),
        scene.settings().max_bodies,
        below_floor
    );
}
