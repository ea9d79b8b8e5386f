use graphview_wasm::Explorer;
use js_sys::Reflect;
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}

fn is_ok(v: &JsValue) -> bool {
    Reflect::get(v, &JsValue::from_str("ok")).ok().and_then(|x| x.as_bool()) == Some(true)
}

fn js(v: &serde_json::Value) -> JsValue {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible()).unwrap()
}

const CANVAS: &str = r#"<g class="node" data-id="a" transform="translate(0,0)"><circle r="16"></circle></g>"#;

#[wasm_bindgen_test]
fn input_errors_are_typed() {
    let mut g = Explorer::new();
    assert!(is_ok(&g.mount_res(CANVAS, "simple")));
    assert!(is_err(&g.mount_res(CANVAS, "fancy"), "unknown_mode"));
    assert!(is_err(&g.mount_res("<g class=\"node\" data-id=\"x\" transform=\"translate(q)\"></g>", "simple"), "markup_parse"));
    assert!(is_err(&g.wheel_res(0.0, f32::NAN, 1.0), "non_finite"));
    assert!(is_err(&g.zoom_at_res(0.0, 0.0, -1.0), "out_of_range"));
    assert!(is_err(&g.select_res(Some("zz".into())), "invalid_id"));
    assert!(is_err(&g.pointer_down_res(1, 0.0, 0.0, Some("zz".into())), "invalid_id"));
    assert!(is_err(&g.get_position_res("zz"), "invalid_id"));
    assert!(is_err(&g.switch_mode_res("fancy"), "unknown_mode"));
    assert!(is_err(&g.submit_command_res("frobnicate"), "command_parse"));
    assert!(is_err(&g.deliver_res(99.0, 200, JsValue::NULL), "unknown_request"));
    assert!(is_err(&g.deliver_res(-1.0, 200, JsValue::NULL), "out_of_range"));
    assert!(is_err(&g.set_canvas_size_res(0.0, 10.0), "invalid_settings"));
    assert!(is_err(&g.set_canvas_size_res(f32::NAN, 10.0), "non_finite"));
    // Nothing above disturbed the mounted graph.
    assert_eq!(g.node_count(), 1);
    assert_eq!(g.selected(), None);
}

#[wasm_bindgen_test]
fn settings_validate_as_a_whole() {
    let mut g = Explorer::new();
    let bad = js(&serde_json::json!({ "kMin": 3.0, "kMax": 2.0 }));
    assert!(is_err(&g.set_settings_res(bad), "invalid_settings"));
    let outside = js(&serde_json::json!({ "kMin": 0.01, "kMax": 8.0 }));
    assert!(is_err(&g.set_settings_res(outside), "invalid_settings"));
    let good = js(&serde_json::json!({ "kMax": 3.0 }));
    assert!(is_ok(&g.set_settings_res(good)));
    let s: serde_json::Value = serde_wasm_bindgen::from_value(g.get_settings()).unwrap();
    assert_eq!(s["kMax"].as_f64(), Some(3.0));
    assert_eq!(s["clickSlop"].as_f64(), Some(3.0));
}

#[wasm_bindgen_test]
fn settled_requests_are_not_unknown() {
    let mut g = Explorer::new();
    assert!(is_ok(&g.mount_res(CANVAS, "simple")));
    let seq_of = |v: JsValue| -> f64 {
        let fx: serde_json::Value = serde_wasm_bindgen::from_value(v).unwrap();
        fx[0]["seq"].as_f64().unwrap()
    };
    let s1 = seq_of(g.refresh_minimap());
    let s2 = seq_of(g.refresh_minimap());
    let body = || js(&serde_json::json!({ "html": "<svg/>" }));
    assert!(is_ok(&g.deliver_res(s2, 200, body())));
    // s1 was dropped when s2 landed; a late answer is quietly ignored.
    assert!(is_ok(&g.deliver_res(s1, 200, body())));
    assert!(is_err(&g.deliver_res(s2 + 10.0, 200, body()), "unknown_request"));
}
