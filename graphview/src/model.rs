use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Vec2 { Vec2 { x, y } }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeShape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

impl NodeShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            NodeShape::Circle { .. } => ShapeKind::Circle,
            NodeShape::Rect { .. } => ShapeKind::Rect,
        }
    }

    /// Whether a point given relative to the node center lies inside the shape.
    pub fn contains(&self, dx: f32, dy: f32) -> bool {
        match *self {
            NodeShape::Circle { radius } => dx * dx + dy * dy <= radius * radius,
            NodeShape::Rect { width, height } => dx.abs() <= width * 0.5 && dy.abs() <= height * 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Rect,
}

/// Rendered line endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
    pub id: String,
    pub name: Option<String>,
    // Raw `data-attrs` text; decoded lazily for tooltips.
    pub attrs: Option<String>,
    pub shape: NodeShape,
    pub position: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeVisual {
    pub from: String,
    pub to: String,
    pub directed: bool,
    pub rendered: Segment,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeMark {
    #[default]
    None,
    Selected,
    Dimmed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMark {
    #[default]
    None,
    Active,
    Dimmed,
}

/// What the pointer went down on, as reported by the host's event target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    Background,
    NodeHandle(String),
    Unclaimed,
}
