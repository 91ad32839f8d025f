//! The four hero sprites
//!
//! Every sprite is a pure function of the style table below: same input,
//! same pixels. `TextureCache` makes sure each one is drawn once per page.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::canvas::{Canvas, Color, SpriteImage};

/// Sprite kinds, one texture each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpriteKind {
    /// Top-down quadcopter
    Drone,
    /// Grey DSLR with a red pro-lens ring
    CameraModern,
    /// Platinum cinema box camera
    CameraCinema,
    /// Silver and leather rangefinder
    CameraVintage,
}

impl SpriteKind {
    pub const ALL: [SpriteKind; 4] = [
        SpriteKind::Drone,
        SpriteKind::CameraModern,
        SpriteKind::CameraCinema,
        SpriteKind::CameraVintage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpriteKind::Drone => "drone",
            SpriteKind::CameraModern => "camera_modern",
            SpriteKind::CameraCinema => "camera_cinema",
            SpriteKind::CameraVintage => "camera_vintage",
        }
    }

    /// Stable index into per-kind tables
    pub fn index(&self) -> usize {
        match self {
            SpriteKind::Drone => 0,
            SpriteKind::CameraModern => 1,
            SpriteKind::CameraCinema => 2,
            SpriteKind::CameraVintage => 3,
        }
    }

    /// Canvas edge length in pixels
    pub fn canvas_size(&self) -> u32 {
        match self {
            SpriteKind::Drone => 120,
            _ => 100,
        }
    }

    pub fn is_camera(&self) -> bool {
        !matches!(self, SpriteKind::Drone)
    }
}

/// Style table
mod style {
    use super::Color;

    pub const DRONE_BODY: Color = Color::hex(0xE5E5E5);
    pub const DRONE_STRIPE_FRONT: Color = Color::hex(0xD35400);
    pub const DRONE_STRIPE_BACK: Color = Color::hex(0x7F8C8D);
    pub const DRONE_BLADE: Color = Color::hex(0xFFFFFF);
    pub const DRONE_MOTOR: Color = Color::hex(0x555555);
    pub const DRONE_GUARD: Color = Color::hex(0xD35400);
    pub const DRONE_HUB_CAP: Color = Color::hex(0xE67E22);
    pub const DRONE_CORE: Color = Color::hex(0xBDC3C7);

    pub const CONCRETE: Color = Color::hex(0x7F8C8D);
    pub const GRIP: Color = Color::hex(0x555555);
    pub const SILVER_RING: Color = Color::hex(0xECF0F1);
    pub const DARK_GLASS: Color = Color::hex(0x2C3E50);
    pub const SKY_REFLECTION: Color = Color::hex(0x85C1E9);
    pub const PRO_RED: Color = Color::hex(0xE74C3C);

    pub const PLATINUM: Color = Color::hex(0xECF0F1);
    pub const SIDE_PLATE: Color = Color::hex(0xBDC3C7);
    pub const BLACK_GLASS: Color = Color::hex(0x000000);
    pub const SOFT_REFLECTION: Color = Color::rgba(255, 255, 255, 0.4);
    pub const VENTS: Color = Color::hex(0x95A5A6);

    pub const SILVER: Color = Color::hex(0xBDC3C7);
    pub const LEATHER: Color = Color::hex(0x8D6E63);
}

/// Render one sprite
pub fn generate(kind: SpriteKind) -> SpriteImage {
    let mut canvas = Canvas::new(kind.canvas_size());
    match kind {
        SpriteKind::Drone => draw_drone(&mut canvas),
        SpriteKind::CameraModern => draw_camera_modern(&mut canvas),
        SpriteKind::CameraCinema => draw_camera_cinema(&mut canvas),
        SpriteKind::CameraVintage => draw_camera_vintage(&mut canvas),
    }
    canvas.into_image()
}

fn draw_drone(ctx: &mut Canvas) {
    let size = ctx.size() as f32;

    // Arms, front pair striped orange
    let arm_w = size * 0.12;
    let arm_l = size * 0.45;
    let arms = [
        (FRAC_PI_4, style::DRONE_STRIPE_FRONT),
        (-FRAC_PI_4, style::DRONE_STRIPE_FRONT),
        (3.0 * FRAC_PI_4, style::DRONE_STRIPE_BACK),
        (-3.0 * FRAC_PI_4, style::DRONE_STRIPE_BACK),
    ];
    for (angle, stripe) in arms {
        ctx.save();
        ctx.rotate(angle);
        ctx.set_fill(style::DRONE_BODY);
        ctx.fill_round_rect(-arm_w / 2.0, 0.0, arm_w, arm_l, 5.0);
        ctx.set_fill(stripe);
        ctx.fill_round_rect(-arm_w / 2.0, arm_l * 0.5, arm_w, arm_l * 0.3, 2.0);
        ctx.restore();
    }

    // Propellers
    let dist = size * 0.35;
    for (x, y) in [(dist, dist), (-dist, dist), (dist, -dist), (-dist, -dist)] {
        draw_propeller(ctx, size, x, y);
    }

    // Body
    ctx.set_fill(style::DRONE_BODY);
    ctx.fill_circle(0.0, 0.0, size * 0.16);
    ctx.set_fill(style::DRONE_CORE);
    ctx.fill_circle(0.0, 0.0, size * 0.08);
    ctx.set_fill(style::DRONE_STRIPE_FRONT);
    ctx.fill_circle(0.0, 0.0, size * 0.04);
}

fn draw_propeller(ctx: &mut Canvas, size: f32, x: f32, y: f32) {
    ctx.save();
    ctx.translate(x, y);

    ctx.set_fill(style::DRONE_MOTOR);
    ctx.fill_circle(0.0, 0.0, size * 0.08);

    let blade_len = size * 0.25;
    let blade_w = size * 0.08;
    ctx.set_fill(style::DRONE_BLADE);
    for _ in 0..4 {
        ctx.rotate(FRAC_PI_2);
        ctx.fill_round_rect(-blade_w / 2.0, 0.0, blade_w, blade_len, 5.0);
    }

    // Prop guards
    ctx.set_stroke(style::DRONE_GUARD, 1.5);
    ctx.stroke_arc(0.0, 0.0, blade_len + 4.0, PI * 0.1, PI * 0.9);
    ctx.stroke_arc(0.0, 0.0, blade_len + 4.0, PI * 1.1, PI * 1.9);

    ctx.set_fill(style::DRONE_HUB_CAP);
    ctx.fill_circle(0.0, 0.0, 5.0);

    ctx.restore();
}

fn draw_camera_modern(ctx: &mut Canvas) {
    let s = ctx.size() as f32 * 0.8;

    ctx.set_fill(style::CONCRETE);
    ctx.fill_round_rect(-s * 0.5, -s * 0.35, s, s * 0.7, 8.0);

    ctx.set_fill(style::GRIP);
    ctx.fill_round_rect(-s * 0.55, -s * 0.3, s * 0.2, s * 0.6, 5.0);

    // Prism hump
    ctx.set_fill(style::CONCRETE);
    ctx.fill_polygon(&[
        Vec2::new(-s * 0.2, -s * 0.35),
        Vec2::new(-s * 0.1, -s * 0.48),
        Vec2::new(s * 0.1, -s * 0.48),
        Vec2::new(s * 0.2, -s * 0.35),
    ]);

    ctx.set_fill(style::SILVER_RING);
    ctx.fill_circle(0.0, 0.0, s * 0.32);
    ctx.set_fill(style::DARK_GLASS);
    ctx.fill_circle(0.0, 0.0, s * 0.28);
    ctx.set_fill(style::SKY_REFLECTION);
    ctx.fill_circle(s * 0.1, -s * 0.1, s * 0.06);

    ctx.set_stroke(style::PRO_RED, 2.0);
    ctx.stroke_arc(0.0, 0.0, s * 0.3, 0.0, TAU);
}

fn draw_camera_cinema(ctx: &mut Canvas) {
    let s = ctx.size() as f32 * 0.8;

    ctx.set_fill(style::PLATINUM);
    ctx.fill_round_rect(-s * 0.4, -s * 0.4, s * 0.8, s * 0.8, 4.0);

    ctx.set_fill(style::SIDE_PLATE);
    ctx.fill_round_rect(-s * 0.3, -s * 0.3, s * 0.6, s * 0.6, 2.0);

    // Lens mount and glass
    ctx.set_fill(style::DARK_GLASS);
    ctx.fill_circle(s * 0.1, 0.0, s * 0.25);
    ctx.set_fill(style::BLACK_GLASS);
    ctx.fill_circle(s * 0.1, 0.0, s * 0.2);
    ctx.set_fill(style::SOFT_REFLECTION);
    ctx.fill_circle(s * 0.15, -s * 0.05, s * 0.08);

    // Record button
    ctx.set_fill(style::PRO_RED);
    ctx.fill_circle(-s * 0.25, -s * 0.25, s * 0.05);

    ctx.set_fill(style::VENTS);
    ctx.fill_rect(-s * 0.35, s * 0.25, s * 0.7, s * 0.05);
}

fn draw_camera_vintage(ctx: &mut Canvas) {
    let s = ctx.size() as f32 * 0.8;
    let width = s;
    let height = s * 0.6;

    ctx.set_fill(style::SILVER);
    ctx.fill_round_rect(-width / 2.0, -height / 2.0, width, height, 6.0);

    ctx.set_fill(style::LEATHER);
    ctx.fill_round_rect(
        -width / 2.0,
        -height / 2.0 + height * 0.35,
        width,
        height * 0.65,
        6.0,
    );

    // Offset lens
    ctx.set_fill(style::SILVER_RING);
    ctx.fill_circle(width * 0.1, 0.0, height * 0.35);
    ctx.set_fill(style::DARK_GLASS);
    ctx.fill_circle(width * 0.1, 0.0, height * 0.25);

    // Viewfinder window
    ctx.fill_rect(-width * 0.35, -height * 0.4, width * 0.15, height * 0.15);
}

/// Lazily generated sprites, shared by reference
#[derive(Debug, Default)]
pub struct TextureCache {
    images: [Option<Rc<SpriteImage>>; 4],
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a sprite, drawing it on first use
    pub fn get(&mut self, kind: SpriteKind) -> Rc<SpriteImage> {
        self.images[kind.index()]
            .get_or_insert_with(|| {
                log::debug!("Generating {} texture", kind.as_str());
                Rc::new(generate(kind))
            })
            .clone()
    }

    /// Draw every sprite up front
    pub fn warm(&mut self) {
        for kind in SpriteKind::ALL {
            self.get(kind);
        }
    }

    /// Number of sprites drawn so far
    pub fn generated_count(&self) -> usize {
        self.images.iter().filter(|i| i.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_dimensions() {
        for kind in SpriteKind::ALL {
            let image = generate(kind);
            assert_eq!(image.width, kind.canvas_size());
            assert_eq!(image.height, kind.canvas_size());
            assert_eq!(image.rgba.len(), (image.width * image.height * 4) as usize);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        for kind in SpriteKind::ALL {
            assert_eq!(generate(kind), generate(kind), "{} differs", kind.as_str());
        }
    }

    #[test]
    fn test_sprites_are_distinct() {
        let images: Vec<_> = SpriteKind::ALL.iter().map(|k| generate(*k)).collect();
        assert_ne!(images[1], images[2]);
        assert_ne!(images[2], images[3]);
        assert_ne!(images[1], images[3]);
    }

    #[test]
    fn test_drone_center_and_corners() {
        let image = generate(SpriteKind::Drone);
        // Orange core dot
        assert_eq!(image.pixel(60, 60), [211, 84, 0, 255]);
        // Canvas corners stay clear of the rotors
        assert_eq!(image.pixel(0, 0)[3], 0);
        assert_eq!(image.pixel(119, 119)[3], 0);
    }

    #[test]
    fn test_camera_modern_lens() {
        let image = generate(SpriteKind::CameraModern);
        // Dark glass just off center (reflection sits up and right)
        assert_eq!(image.pixel(45, 55), [44, 62, 80, 255]);
        // Transparent outside the body
        assert_eq!(image.pixel(50, 2)[3], 0);
    }

    #[test]
    fn test_cinema_reflection_is_translucent_over_glass() {
        let image = generate(SpriteKind::CameraCinema);
        // Reflection center at (50 + 12, 50 - 4): white at 40% over black
        let px = image.pixel(62, 46);
        assert_eq!(px[3], 255);
        assert_eq!(px[0], 102);
    }

    #[test]
    fn test_vintage_has_leather() {
        let image = generate(SpriteKind::CameraVintage);
        // Bottom left of the body is leather
        assert_eq!(image.pixel(15, 68), [141, 110, 99, 255]);
    }

    #[test]
    fn test_cache_shares_images() {
        let mut cache = TextureCache::new();
        assert_eq!(cache.generated_count(), 0);
        let a = cache.get(SpriteKind::CameraCinema);
        let b = cache.get(SpriteKind::CameraCinema);
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(cache.generated_count(), 1);
        cache.warm();
        assert_eq!(cache.generated_count(), 4);
    }
}
