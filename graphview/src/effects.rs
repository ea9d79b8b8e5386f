use crate::model::{EdgeMark, NodeMark};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// An HTTP request the host performs on the core's behalf. The response is
/// handed back through `Explorer::deliver` with the same `seq`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Request {
    pub seq: u64,
    pub method: &'static str,
    pub url: String,
    pub body: Value,
}

/// A side effect for the host to apply, in order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    ApplyTransform {
        transform: String,
        #[serde(rename = "panX")]
        pan_x: f32,
        #[serde(rename = "panY")]
        pan_y: f32,
        scale: f32,
    },
    MoveNode { id: String, transform: String, x: f32, y: f32 },
    SetEdge { index: usize, from: String, to: String, x1: f32, y1: f32, x2: f32, y2: f32 },
    MarkNode { id: String, mark: NodeMark },
    MarkEdge { index: usize, mark: EdgeMark },
    SetDragging { id: String, active: bool },
    SetPanning { active: bool },
    TreeHighlight { id: Option<String>, scroll: bool },
    TreeExpand { id: String, rows: Vec<TreeRow> },
    TreeCollapse { id: String },
    BirdSelect { id: Option<String> },
    ShowTooltip {
        id: String,
        title: String,
        rows: Vec<(String, String)>,
        #[serde(rename = "clientX")]
        client_x: f32,
        #[serde(rename = "clientY")]
        client_y: f32,
    },
    HideTooltip,
    ScheduleMinimap {
        token: u64,
        #[serde(rename = "delayMs")]
        delay_ms: u32,
    },
    Request(Request),
    ReplaceMain { html: String },
    ReplaceMinimap { html: String },
    GraphChanged { graph: Value },
    Log { level: LogLevel, message: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TreeRow {
    pub id: String,
    pub label: String,
}

impl Effect {
    pub fn log(level: LogLevel, message: impl Into<String>) -> Effect {
        Effect::Log { level, message: message.into() }
    }

    pub fn node_translate(id: &str, x: f32, y: f32) -> Effect {
        Effect::MoveNode { id: id.to_string(), transform: format!("translate({},{})", x, y), x, y }
    }
}
