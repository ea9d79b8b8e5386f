use graphview::effects::{Effect, LogLevel};
use js_sys::{Array, Float32Array, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_f32(slice: &[f32]) -> Float32Array {
    let arr = Float32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
pub fn arr_str<'a>(items: impl IntoIterator<Item = &'a str>) -> Array {
    items.into_iter().map(JsValue::from_str).collect()
}

/// Plain JSON-shaped JS value (objects, not `Map`s).
pub fn to_js<T: Serialize + ?Sized>(v: &T) -> Result<JsValue, String> {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible()).map_err(|e| e.to_string())
}

/// Effects batch for the host. Log effects are echoed to the console too.
pub fn effects(fx: &[Effect]) -> JsValue {
    for e in fx {
        if let Effect::Log { level, message } = e {
            console(*level, message);
        }
    }
    match to_js(fx) {
        Ok(v) => v,
        Err(e) => {
            console(LogLevel::Error, &format!("effect serialization failed: {}", e));
            Array::new().into()
        }
    }
}

pub fn console(level: LogLevel, message: &str) {
    let m = JsValue::from_str(message);
    match level {
        LogLevel::Info => web_sys::console::log_1(&m),
        LogLevel::Warn => web_sys::console::warn_1(&m),
        LogLevel::Error => web_sys::console::error_1(&m),
    }
}
