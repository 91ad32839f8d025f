//! Browser wiring: container lookup, Canvas 2D drawing, and host events
//!
//! The scene lives in an `Rc<RefCell<App>>` shared by the event closures and
//! the animation frame loop. Closures are leaked for the page lifetime.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{
    CanvasRenderingContext2d, DeviceOrientationEvent, Document, HtmlCanvasElement, HtmlElement,
    ImageData, PointerEvent, Window,
};

use crate::config::HeroConfig;
use crate::consts::{CONFIG_ATTRIBUTE, CONTAINER_ID};
use crate::error::{Error, Result};
use crate::sim::{HeroScene, RapierEngine, ScreenRotation, Viewport};
use crate::texture::{SpriteImage, SpriteKind};

fn dom_err(value: JsValue) -> Error {
    Error::Dom(format!("{:?}", value))
}

struct App {
    scene: HeroScene<RapierEngine>,
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Offscreen canvases, indexed by `SpriteKind::index`
    sprites: Vec<HtmlCanvasElement>,
    dpr: f64,
    last_time: f64,
}

impl App {
    fn container_viewport(&self) -> Viewport {
        container_viewport(&self.container)
    }

    fn on_resize(&mut self) {
        let viewport = self.container_viewport();
        if self.scene.on_resize(viewport) {
            size_canvas(&self.canvas, viewport, self.dpr);
        }
    }

    fn frame(&mut self, time: f64) {
        let frame_ms = if self.last_time > 0.0 {
            (time - self.last_time) as f32
        } else {
            0.0
        };
        self.last_time = time;

        self.scene.advance(frame_ms);
        self.render();
    }

    fn render(&self) {
        let viewport = self.scene.viewport();
        let ctx = &self.ctx;
        let _ = ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
        ctx.clear_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);

        for body in self.scene.bodies() {
            let Some(sprite) = body.sprite else {
                continue;
            };
            let Some(image) = self.sprites.get(sprite.kind.index()) else {
                continue;
            };
            let size = sprite.kind.canvas_size() as f64 * sprite.scale as f64;

            ctx.save();
            let _ = ctx.translate(body.position.x as f64, body.position.y as f64);
            let _ = ctx.rotate(body.angle as f64);
            let _ = ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
                image,
                -size / 2.0,
                -size / 2.0,
                size,
                size,
            );
            ctx.restore();
        }
    }
}

/// The container's client size is the viewport: its width drives the
/// breakpoint and resize gate, matching `innerWidth` for a full-width hero
fn container_viewport(container: &HtmlElement) -> Viewport {
    Viewport::new(container.client_width() as f32, container.client_height() as f32)
}

fn size_canvas(canvas: &HtmlCanvasElement, viewport: Viewport, dpr: f64) {
    canvas.set_width((viewport.width as f64 * dpr) as u32);
    canvas.set_height((viewport.height as f64 * dpr) as u32);
}

fn create_canvas(document: &Document) -> Result<HtmlCanvasElement> {
    document
        .create_element("canvas")
        .map_err(dom_err)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| Error::Dom("created element is not a canvas".into()))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(dom_err)?
        .ok_or_else(|| Error::Dom("2d context unavailable".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| Error::Dom("not a 2d context".into()))
}

/// Upload a generated sprite into its own offscreen canvas
fn sprite_canvas(document: &Document, image: &SpriteImage) -> Result<HtmlCanvasElement> {
    let canvas = create_canvas(document)?;
    canvas.set_width(image.width);
    canvas.set_height(image.height);
    let data = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(image.rgba.as_slice()),
        image.width,
        image.height,
    )
    .map_err(dom_err)?;
    context_2d(&canvas)?
        .put_image_data(&data, 0.0, 0.0)
        .map_err(dom_err)?;
    Ok(canvas)
}

fn screen_rotation(window: &Window) -> Option<ScreenRotation> {
    let screen_angle = window
        .screen()
        .ok()
        .and_then(|screen| screen.orientation().angle().ok())
        .map(i32::from);
    // Legacy `window.orientation` (older iOS Safari), already in ±90
    let legacy_angle = Some(window.orientation() as i32);
    ScreenRotation::from_host(screen_angle, legacy_angle)
}

fn pointer_point(event: &PointerEvent) -> Vec2 {
    Vec2::new(event.offset_x() as f32, event.offset_y() as f32)
}

/// Entry point: set up logging, then mount if the page has a hero container
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    if let Err(e) = mount() {
        log::warn!("Hero physics disabled: {}", e);
    }
}

fn mount() -> Result<()> {
    let window = web_sys::window().ok_or_else(|| Error::Dom("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| Error::Dom("no document".into()))?;

    let container: HtmlElement = document
        .get_element_by_id(CONTAINER_ID)
        .ok_or_else(|| Error::MissingContainer(CONTAINER_ID.into()))?
        .dyn_into()
        .map_err(|_| Error::Dom(format!("#{} is not an HTML element", CONTAINER_ID)))?;

    let overrides = container.get_attribute(CONFIG_ATTRIBUTE);
    let config = HeroConfig::from_json_or_default(overrides.as_deref());

    let canvas = create_canvas(&document)?;
    let style = canvas.style();
    style.set_property("width", "100%").map_err(dom_err)?;
    style.set_property("height", "100%").map_err(dom_err)?;
    style.set_property("display", "block").map_err(dom_err)?;
    container.append_child(&canvas).map_err(dom_err)?;
    let ctx = context_2d(&canvas)?;

    let dpr = window.device_pixel_ratio();
    let viewport = container_viewport(&container);
    size_canvas(&canvas, viewport, dpr);

    let scroll = window.scroll_y().unwrap_or(0.0) as f32;
    let seed = js_sys::Date::now() as u64;
    let mut scene = HeroScene::new(
        RapierEngine::new(config.drag_stiffness),
        config,
        viewport,
        scroll,
        seed,
    );
    log::info!("Hero scene seeded with {}", seed);

    let mut sprites = Vec::with_capacity(SpriteKind::ALL.len());
    for kind in SpriteKind::ALL {
        let image = scene.textures_mut().get(kind);
        sprites.push(sprite_canvas(&document, &image)?);
    }

    let app = Rc::new(RefCell::new(App {
        scene,
        container,
        canvas,
        ctx,
        sprites,
        dpr,
        last_time: 0.0,
    }));

    setup_event_handlers(&window, app.clone())?;
    request_animation_frame(app);
    Ok(())
}

fn setup_event_handlers(window: &Window, app: Rc<RefCell<App>>) -> Result<()> {
    // Resize
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().on_resize();
        });
        window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(dom_err)?;
        closure.forget();
    }

    // Scroll
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(offset) = web_sys::window().and_then(|w| w.scroll_y().ok()) else {
                return;
            };
            app.borrow_mut().scene.on_scroll(offset as f32);
        });
        window
            .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
            .map_err(dom_err)?;
        closure.forget();
    }

    // Device tilt
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceOrientationEvent| {
            let rotation = web_sys::window().as_ref().and_then(screen_rotation);
            let beta = event.beta().map(|v| v as f32);
            let gamma = event.gamma().map(|v| v as f32);
            app.borrow_mut().scene.on_orientation(rotation, beta, gamma);
        });
        window
            .add_event_listener_with_callback("deviceorientation", closure.as_ref().unchecked_ref())
            .map_err(dom_err)?;
        closure.forget();
    }

    // Pointer drag; wheel is left alone so the page keeps scrolling
    let canvas = app.borrow().canvas.clone();
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            app.borrow_mut().scene.pointer_down(pointer_point(&event));
        });
        canvas
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())
            .map_err(dom_err)?;
        closure.forget();
    }
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            app.borrow_mut().scene.pointer_move(pointer_point(&event));
        });
        canvas
            .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())
            .map_err(dom_err)?;
        closure.forget();
    }
    for name in ["pointerup", "pointercancel"] {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
            app.borrow_mut().scene.pointer_up();
        });
        canvas
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .map_err(dom_err)?;
        closure.forget();
    }

    Ok(())
}

fn request_animation_frame(app: Rc<RefCell<App>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        frame_loop(app, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
    app.borrow_mut().frame(time);
    request_animation_frame(app);
}
