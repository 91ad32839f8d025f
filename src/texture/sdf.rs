//! Signed distance functions for sprite rasterization
//!
//! All functions take the sample point in the shape's local frame. Negative
//! means inside.

use glam::Vec2;
use std::f32::consts::TAU;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to an axis-aligned rectangle with rounded corners
///
/// The corner radius is clamped to half the shorter side, like `roundRect`.
pub fn sd_round_rect(p: Vec2, min: Vec2, size: Vec2, radius: f32) -> f32 {
    let half = size.abs() * 0.5;
    let center = min + size * 0.5;
    let r = radius.clamp(0.0, half.min_element());
    let q = (p - center).abs() - half + Vec2::splat(r);
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0) - r
}

/// Signed distance to a simple polygon (any winding)
pub fn sd_polygon(p: Vec2, points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return f32::MAX;
    }

    let mut d = (p - points[0]).length_squared();
    let mut sign = 1.0;
    let mut j = points.len() - 1;

    for i in 0..points.len() {
        let a = points[i];
        let b = points[j];
        let e = b - a;
        let w = p - a;
        let t = (w.dot(e) / e.length_squared().max(f32::EPSILON)).clamp(0.0, 1.0);
        let closest = w - e * t;
        d = d.min(closest.length_squared());

        // Crossing test for inside/outside
        let c1 = p.y >= a.y;
        let c2 = p.y < b.y;
        let c3 = e.x * w.y > e.y * w.x;
        if (c1 && c2 && c3) || (!c1 && !c2 && !c3) {
            sign = -sign;
        }
        j = i;
    }

    sign * d.sqrt()
}

/// Signed distance to an arc band (a stroked arc)
///
/// The arc runs from `theta_start` towards increasing angles to `theta_end`,
/// which on a y-down surface is clockwise, matching canvas `arc()`.
pub fn sd_arc(
    p: Vec2,
    center: Vec2,
    radius: f32,
    theta_start: f32,
    theta_end: f32,
    thickness: f32,
) -> f32 {
    let p = p - center;
    let r = p.length();
    let angle = p.y.atan2(p.x);

    // Normalize angle difference
    let mut angle_diff = angle - theta_start;
    angle_diff -= (angle_diff / TAU).floor() * TAU;

    // Arc span (a full turn stays a full turn)
    let mut span = theta_end - theta_start;
    if span.abs() < TAU {
        span -= (span / TAU).floor() * TAU;
    } else {
        span = TAU;
    }

    let half_thick = thickness * 0.5;

    if angle_diff <= span {
        (r - radius).abs() - half_thick
    } else {
        // Distance to arc endpoints
        let p1 = Vec2::new(theta_start.cos(), theta_start.sin()) * radius;
        let p2 = Vec2::new(theta_end.cos(), theta_end.sin()) * radius;
        let d1 = (p - p1).length() - half_thick;
        let d2 = (p - p2).length() - half_thick;
        d1.min(d2)
    }
}

/// Anti-aliased coverage of a pixel whose center is `distance` from an edge
#[inline]
pub fn coverage(distance: f32) -> f32 {
    (0.5 - distance).clamp(0.0, 1.0)
}
