// Centralized tolerances and helpers for viewport and edge geometry

pub const EPS_LEN: f32 = 1e-6;            // zero-length vector threshold

// Zoom clamp defaults
pub const K_MIN: f32 = 0.2;
pub const K_MAX: f32 = 4.0;

// Edge trimming defaults (px, world space)
pub const NODE_RADIUS: f32 = 16.0;
pub const ARROW_PAD: f32 = 6.0;

#[inline] pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 { x.max(lo).min(hi) }

/// Unit direction of (x,y) with its length. Zero-length vectors fall back to a
/// length of 1 so callers never divide by zero.
#[inline]
pub fn unit_or_fallback(x: f32, y: f32) -> ((f32, f32), f32) {
    let len = (x * x + y * y).sqrt();
    let l = if len > EPS_LEN { len } else { 1.0 };
    ((x / l, y / l), len)
}
