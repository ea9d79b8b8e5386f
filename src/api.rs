use crate::Explorer;
use crate::{error, interop};
use graphview::model::{PointerTarget, WorldRect};
use graphview::selection::SelectSource;
use graphview::settings::Settings;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn target(node_id: Option<String>) -> PointerTarget {
    match node_id {
        Some(id) => PointerTarget::NodeHandle(id),
        None => PointerTarget::Background,
    }
}

// Sequence numbers and tokens cross the boundary as plain numbers.
fn as_u64(param: &str, v: f64) -> Result<u64, JsValue> {
    if !v.is_finite() {
        return Err(error::non_finite(param));
    }
    if v < 0.0 || v > 9_007_199_254_740_991.0 || v.fract() != 0.0 {
        return Err(error::out_of_range(param, 0.0, 9_007_199_254_740_991.0, v));
    }
    Ok(v as u64)
}

fn finite(params: &[(&str, f32)]) -> Result<(), JsValue> {
    match params.iter().find(|(_, v)| !v.is_finite()) {
        Some((name, _)) => Err(error::non_finite(name)),
        None => Ok(()),
    }
}

#[wasm_bindgen]
impl Explorer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Explorer {
        crate::Explorer::rs_new()
    }

    // Settings
    pub fn get_settings(&self) -> JsValue {
        interop::to_js(self.inner.settings()).unwrap_or(JsValue::NULL)
    }
    pub fn set_settings_res(&mut self, v: JsValue) -> JsValue {
        let value = match serde_wasm_bindgen::from_value::<serde_json::Value>(v) {
            Ok(value) => value,
            Err(e) => return error::err("invalid_settings", e.to_string(), None),
        };
        let settings = match Settings::from_json_value(value) {
            Ok(s) => s,
            Err(e) => return error::core(e),
        };
        match self.inner.set_settings(settings) {
            Ok(fx) => error::ok(interop::effects(&fx)),
            Err(e) => error::core(e),
        }
    }
    pub fn set_canvas_size_res(&mut self, width: f32, height: f32) -> JsValue {
        if let Err(e) = finite(&[("width", width), ("height", height)]) {
            return e;
        }
        match self.inner.set_canvas_size(width, height) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(e) => error::core(e),
        }
    }

    pub fn set_arrow_pad_res(&mut self, pad: f32) -> JsValue {
        if !pad.is_finite() {
            return error::non_finite("pad");
        }
        match self.inner.set_arrow_pad(pad) {
            Ok(fx) => error::ok(interop::effects(&fx)),
            Err(e) => error::core(e),
        }
    }

    // Mounting
    pub fn mount(&mut self, html: &str, mode: &str) -> JsValue {
        match self.inner.mount(html, mode) {
            Ok(fx) => interop::effects(&fx),
            Err((code, msg)) => {
                interop::console(graphview::effects::LogLevel::Error, &format!("mount failed: {}: {}", code, msg));
                interop::effects(&[])
            }
        }
    }
    pub fn mount_res(&mut self, html: &str, mode: &str) -> JsValue {
        match self.inner.mount(html, mode) {
            Ok(fx) => error::ok(interop::effects(&fx)),
            Err(e) => error::core(e),
        }
    }
    pub fn render_all(&self) -> JsValue {
        interop::effects(&self.inner.render_all())
    }

    // Pointer input. `node_id` is the node whose drag handle was pressed, or
    // undefined for the canvas background.
    pub fn pick(&self, sx: f32, sy: f32) -> Option<String> {
        match self.inner.target_at(sx, sy) {
            PointerTarget::NodeHandle(id) => Some(id),
            _ => None,
        }
    }
    pub fn pointer_down(&mut self, pointer: i32, sx: f32, sy: f32, node_id: Option<String>) -> JsValue {
        interop::effects(&self.inner.pointer_down(pointer, sx, sy, &target(node_id)))
    }
    pub fn pointer_down_res(&mut self, pointer: i32, sx: f32, sy: f32, node_id: Option<String>) -> JsValue {
        if let Err(e) = finite(&[("sx", sx), ("sy", sy)]) {
            return e;
        }
        if let Some(id) = node_id.as_deref() {
            if !self.inner.store().contains(id) {
                return error::invalid_id("node", id);
            }
        }
        error::ok(self.pointer_down(pointer, sx, sy, node_id))
    }
    pub fn pointer_move(&mut self, pointer: i32, sx: f32, sy: f32) -> JsValue {
        if finite(&[("sx", sx), ("sy", sy)]).is_err() {
            return interop::effects(&[]);
        }
        interop::effects(&self.inner.pointer_move(pointer, sx, sy))
    }
    pub fn pointer_up(&mut self, pointer: i32) -> JsValue {
        interop::effects(&self.inner.pointer_up(pointer))
    }
    pub fn pointer_cancel(&mut self, pointer: i32) -> JsValue {
        interop::effects(&self.inner.pointer_cancel(pointer))
    }
    pub fn wheel(&mut self, sx: f32, sy: f32, delta_y: f32) -> JsValue {
        interop::effects(&self.inner.wheel(sx, sy, delta_y))
    }
    pub fn wheel_res(&mut self, sx: f32, sy: f32, delta_y: f32) -> JsValue {
        if let Err(e) = finite(&[("sx", sx), ("sy", sy), ("deltaY", delta_y)]) {
            return e;
        }
        error::ok(self.wheel(sx, sy, delta_y))
    }
    pub fn zoom_at_res(&mut self, sx: f32, sy: f32, factor: f32) -> JsValue {
        if let Err(e) = finite(&[("sx", sx), ("sy", sy), ("factor", factor)]) {
            return e;
        }
        if factor <= 0.0 {
            return error::out_of_range("factor", 0.0, f64::MAX, factor as f64);
        }
        error::ok(interop::effects(&self.inner.zoom_at(sx, sy, factor)))
    }
    pub fn pan_by(&mut self, dx: f32, dy: f32) -> JsValue {
        interop::effects(&self.inner.pan_by(dx, dy))
    }

    // Tooltip
    pub fn hover(&mut self, node_id: Option<String>, client_x: f32, client_y: f32) -> JsValue {
        interop::effects(&self.inner.hover(node_id.as_deref(), client_x, client_y))
    }
    /// `[left, top]` for a tooltip box of the measured size.
    pub fn place_tooltip(&self, client_x: f32, client_y: f32, w: f32, h: f32, win_w: f32, win_h: f32) -> js_sys::Float32Array {
        let p = self.inner.place_tooltip(client_x, client_y, w, h, win_w, win_h);
        interop::arr_f32(&[p.x, p.y])
    }

    // Selection and tree
    pub fn select(&mut self, node_id: Option<String>) -> JsValue {
        interop::effects(&self.inner.select(node_id.as_deref(), SelectSource::Canvas))
    }
    pub fn select_res(&mut self, node_id: Option<String>) -> JsValue {
        if let Some(id) = node_id.as_deref() {
            if !self.inner.store().contains(id) {
                return error::invalid_id("node", id);
            }
        }
        error::ok(self.select(node_id))
    }
    pub fn select_from_tree(&mut self, node_id: &str) -> JsValue {
        interop::effects(&self.inner.select_from_tree(node_id))
    }
    pub fn toggle_tree_row(&mut self, node_id: &str) -> JsValue {
        interop::effects(&self.inner.toggle_tree_row(node_id))
    }
    pub fn focus_node(&mut self, node_id: &str) -> JsValue {
        interop::effects(&self.inner.focus_node(node_id))
    }
    pub fn selected(&self) -> Option<String> {
        self.inner.selected().map(str::to_string)
    }
    pub fn node_mark(&self, node_id: &str) -> JsValue {
        interop::to_js(&self.inner.selection().node_mark(node_id)).unwrap_or(JsValue::NULL)
    }
    pub fn edge_mark(&self, index: u32) -> JsValue {
        interop::to_js(&self.inner.selection().edge_mark(index as usize)).unwrap_or(JsValue::NULL)
    }

    // Minimap
    pub fn minimap_due(&mut self, token: f64) -> JsValue {
        match as_u64("token", token) {
            Ok(t) => interop::effects(&self.inner.minimap_due(t)),
            Err(_) => interop::effects(&[]),
        }
    }
    pub fn refresh_minimap(&mut self) -> JsValue {
        interop::effects(&self.inner.refresh_minimap())
    }
    pub fn visible_world_rect(&self) -> JsValue {
        let s = self.inner.settings();
        let r: WorldRect = self.inner.viewport().visible_world_rect(s.canvas_width, s.canvas_height);
        interop::to_js(&r).unwrap_or(JsValue::NULL)
    }

    // Mode switching and commands
    pub fn mode(&self) -> String {
        self.inner.mode().to_string()
    }
    /// CSS selector of the element inside a node group that starts a drag.
    pub fn drag_handle(&self) -> String {
        self.inner.mode_descriptor().handle.to_string()
    }
    pub fn dragging_node(&self) -> Option<String> {
        self.inner.gesture().active_node().map(str::to_string)
    }
    pub fn switch_mode(&mut self, mode: &str) -> JsValue {
        match self.inner.switch_mode(mode) {
            Ok(fx) => interop::effects(&fx),
            Err((code, msg)) => {
                interop::console(graphview::effects::LogLevel::Error, &format!("{}: {}", code, msg));
                interop::effects(&[])
            }
        }
    }
    pub fn switch_mode_res(&mut self, mode: &str) -> JsValue {
        match self.inner.switch_mode(mode) {
            Ok(fx) => error::ok(interop::effects(&fx)),
            Err(e) => error::core(e),
        }
    }
    pub fn submit_command_res(&mut self, text: &str) -> JsValue {
        match self.inner.submit_command(text) {
            Ok(fx) => error::ok(interop::effects(&fx)),
            Err(e) => error::core(e),
        }
    }

    // Network. `body` is the parsed JSON response.
    pub fn deliver(&mut self, seq: f64, status: u16, body: JsValue) -> JsValue {
        let Ok(seq) = as_u64("seq", seq) else { return interop::effects(&[]) };
        let body = serde_wasm_bindgen::from_value::<serde_json::Value>(body).unwrap_or(serde_json::Value::Null);
        interop::effects(&self.inner.deliver(seq, status, body))
    }
    pub fn deliver_res(&mut self, seq: f64, status: u16, body: JsValue) -> JsValue {
        let n = match as_u64("seq", seq) {
            Ok(n) => n,
            Err(e) => return e,
        };
        if !self.inner.was_issued(n) {
            return error::unknown_request(seq);
        }
        let body = match serde_wasm_bindgen::from_value::<serde_json::Value>(body) {
            Ok(b) => b,
            Err(e) => return error::err("json_parse", e.to_string(), None),
        };
        error::ok(interop::effects(&self.inner.deliver(n, status, body)))
    }
    pub fn fail(&mut self, seq: f64, message: &str) -> JsValue {
        match as_u64("seq", seq) {
            Ok(n) => interop::effects(&self.inner.fail(n, message)),
            Err(_) => interop::effects(&[]),
        }
    }

    // Read back
    pub fn viewport(&self) -> JsValue {
        interop::to_js(self.inner.viewport()).unwrap_or(JsValue::NULL)
    }
    pub fn node_count(&self) -> u32 {
        self.inner.store().node_count() as u32
    }
    pub fn edge_count(&self) -> u32 {
        self.inner.store().edge_count() as u32
    }
    pub fn get_position(&self, node_id: &str) -> JsValue {
        match self.inner.position(node_id) {
            Some(p) => interop::arr_f32(&[p.x, p.y]).into(),
            None => JsValue::NULL,
        }
    }
    pub fn get_position_res(&self, node_id: &str) -> JsValue {
        match self.inner.position(node_id) {
            Some(p) => error::ok(interop::arr_f32(&[p.x, p.y]).into()),
            None => error::invalid_id("node", node_id),
        }
    }
    /// `{ ids: string[], positions: Float32Array }` with positions interleaved x,y.
    pub fn get_node_data(&self) -> JsValue {
        let store = self.inner.store();
        let ids = interop::arr_str(store.positions().map(|(id, _)| id));
        let pos: Vec<f32> = store.positions().flat_map(|(_, p)| [p.x, p.y]).collect();
        let obj = interop::new_obj();
        interop::set_kv(&obj, "ids", &ids.into());
        interop::set_kv(&obj, "positions", &interop::arr_f32(&pos).into());
        obj.into()
    }
    /// Rendered edge endpoints, four floats per edge.
    pub fn get_edge_segments(&self) -> js_sys::Float32Array {
        let segs: Vec<f32> =
            self.inner.store().edges().iter().flat_map(|e| [e.rendered.x1, e.rendered.y1, e.rendered.x2, e.rendered.y2]).collect();
        interop::arr_f32(&segs)
    }
}
