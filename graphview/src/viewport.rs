use crate::geometry::tolerance::{clamp, K_MAX, K_MIN};
use crate::model::{Vec2, WorldRect};
use serde::Serialize;

/// Pan offset and zoom scale of the canvas.
///
/// `screen = world * scale + pan`. The scale is kept inside `[k_min, k_max]`
/// by every mutation; pan is unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportTransform {
    pub pan_x: f32,
    pub pan_y: f32,
    pub scale: f32,
    #[serde(skip)]
    k_min: f32,
    #[serde(skip)]
    k_max: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self { Self::new() }
}

impl ViewportTransform {
    pub fn new() -> ViewportTransform {
        ViewportTransform { pan_x: 0.0, pan_y: 0.0, scale: 1.0, k_min: K_MIN, k_max: K_MAX }
    }

    pub fn limits(&self) -> (f32, f32) { (self.k_min, self.k_max) }

    /// Replace the zoom limits and re-clamp the current scale. Callers validate
    /// `0 < k_min <= k_max` beforehand.
    pub fn set_limits(&mut self, k_min: f32, k_max: f32) {
        self.k_min = k_min;
        self.k_max = k_max;
        self.scale = clamp(self.scale, k_min, k_max);
    }

    pub fn screen_to_world(&self, sx: f32, sy: f32) -> Vec2 {
        Vec2::new((sx - self.pan_x) / self.scale, (sy - self.pan_y) / self.scale)
    }

    pub fn world_to_screen(&self, wx: f32, wy: f32) -> Vec2 {
        Vec2::new(wx * self.scale + self.pan_x, wy * self.scale + self.pan_y)
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn set_pan(&mut self, x: f32, y: f32) {
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Scale by `factor` keeping the world point under (sx,sy) fixed on screen.
    pub fn zoom_at(&mut self, sx: f32, sy: f32, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let w = self.screen_to_world(sx, sy);
        let k = self.scale;
        let nk = clamp(k * factor, self.k_min, self.k_max);
        self.pan_x -= w.x * (nk - k);
        self.pan_y -= w.y * (nk - k);
        self.scale = nk;
    }

    /// Center the canvas on a world point. Never zooms out.
    pub fn focus_on(&mut self, wx: f32, wy: f32, target_scale: f32, canvas_w: f32, canvas_h: f32) {
        let nk = clamp(target_scale.max(self.scale), self.k_min, self.k_max);
        self.scale = nk;
        self.pan_x = canvas_w * 0.5 - wx * nk;
        self.pan_y = canvas_h * 0.5 - wy * nk;
    }

    pub fn visible_world_rect(&self, canvas_w: f32, canvas_h: f32) -> WorldRect {
        WorldRect {
            x: -self.pan_x / self.scale,
            y: -self.pan_y / self.scale,
            width: canvas_w / self.scale,
            height: canvas_h / self.scale,
        }
    }

    pub fn transform_attr(&self) -> String {
        format!("translate({},{}) scale({})", self.pan_x, self.pan_y, self.scale)
    }
}
