use crate::model::WorldRect;
use crate::store::NodePositionStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize)]
struct XY {
    x: f32,
    y: f32,
}

/// `{ positions: { id: {x,y} } }` for `/switch-visualizer/{mode}/`.
pub fn switch_body(store: &NodePositionStore) -> Value {
    let mut positions = Map::new();
    for (id, p) in store.positions() {
        positions.insert(id.to_string(), to_value(&XY { x: p.x, y: p.y }));
    }
    let mut root = Map::new();
    root.insert("positions".into(), Value::Object(positions));
    Value::Object(root)
}

/// `{ viewport, positions: { id: [x,y] }, visualizer }` for `/bird-render/`.
pub fn bird_body(store: &NodePositionStore, viewport: WorldRect, visualizer: &str) -> Value {
    #[derive(Serialize)]
    struct BirdSer<'a> {
        viewport: WorldRect,
        positions: Map<String, Value>,
        visualizer: &'a str,
    }
    let positions = store
        .positions()
        .map(|(id, p)| (id.to_string(), to_value(&[p.x, p.y])))
        .collect();
    to_value(&BirdSer { viewport, positions, visualizer })
}

#[derive(Clone, Debug, Deserialize)]
pub struct SwitchResponse {
    pub html: String,
    pub visualizer: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BirdResponse {
    pub html: String,
}

pub fn decode<T: for<'de> Deserialize<'de>>(body: Value) -> Result<T, (&'static str, String)> {
    serde_json::from_value(body).map_err(|e| ("json_parse", format!("{}", e)))
}

// Serializing these plain structs cannot fail; Null keeps the signature total.
fn to_value<T: Serialize + ?Sized>(v: &T) -> Value {
    serde_json::to_value(v).unwrap_or(Value::Null)
}
