use crate::geometry::tolerance::{ARROW_PAD, K_MAX, K_MIN};
use serde::{Deserialize, Serialize};

/// Tunables for the explorer. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub k_min: f32,
    pub k_max: f32,
    pub arrow_pad: f32,
    /// Screen pixels a press may wander and still count as a click.
    pub click_slop: f32,
    pub wheel_sensitivity: f32,
    pub minimap_delay_ms: u32,
    pub focus_scale: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub tooltip_pad: f32,
    pub tooltip_margin: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            k_min: K_MIN,
            k_max: K_MAX,
            arrow_pad: ARROW_PAD,
            click_slop: 3.0,
            wheel_sensitivity: 0.0015,
            minimap_delay_ms: 120,
            focus_scale: 1.5,
            canvas_width: 1000.0,
            canvas_height: 620.0,
            tooltip_pad: 10.0,
            tooltip_margin: 6.0,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), (&'static str, String)> {
        let finite = [
            ("kMin", self.k_min),
            ("kMax", self.k_max),
            ("arrowPad", self.arrow_pad),
            ("clickSlop", self.click_slop),
            ("wheelSensitivity", self.wheel_sensitivity),
            ("focusScale", self.focus_scale),
            ("canvasWidth", self.canvas_width),
            ("canvasHeight", self.canvas_height),
            ("tooltipPad", self.tooltip_pad),
            ("tooltipMargin", self.tooltip_margin),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(("invalid_settings", format!("{} must be finite", name)));
            }
        }
        if self.k_min <= 0.0 || self.k_min > self.k_max {
            return Err(("invalid_settings", "zoom limits must satisfy 0 < kMin <= kMax".into()));
        }
        if self.k_min < K_MIN || self.k_max > K_MAX {
            return Err(("invalid_settings", format!("zoom limits must stay within {}..{}", K_MIN, K_MAX)));
        }
        if self.arrow_pad < 0.0 || self.click_slop < 0.0 {
            return Err(("invalid_settings", "arrowPad and clickSlop must not be negative".into()));
        }
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(("invalid_settings", "canvas size must be positive".into()));
        }
        Ok(())
    }

    pub fn from_json_value(v: serde_json::Value) -> Result<Settings, (&'static str, String)> {
        let s: Settings = serde_json::from_value(v).map_err(|e| ("invalid_settings", format!("{}", e)))?;
        s.validate()?;
        Ok(s)
    }
}
