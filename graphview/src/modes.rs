use crate::geometry::tolerance::NODE_RADIUS;
use crate::model::{NodeShape, ShapeKind};

/// How a render style draws nodes and where its drag handles are.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeDescriptor {
    pub tag: &'static str,
    pub shape_kind: ShapeKind,
    /// Shape used when the markup omits explicit dimensions.
    pub default_shape: NodeShape,
    /// Element inside a node group that starts a drag.
    pub handle: &'static str,
}

pub const SIMPLE: ModeDescriptor = ModeDescriptor {
    tag: "simple",
    shape_kind: ShapeKind::Circle,
    default_shape: NodeShape::Circle { radius: NODE_RADIUS },
    handle: "circle",
};

// Block height grows with the attribute count (20 + 16 per line); the default
// covers a title-only block.
pub const BLOCK: ModeDescriptor = ModeDescriptor {
    tag: "block",
    shape_kind: ShapeKind::Rect,
    default_shape: NodeShape::Rect { width: 120.0, height: 36.0 },
    handle: "rect.block-rect",
};

pub const MODES: [ModeDescriptor; 2] = [SIMPLE, BLOCK];

pub fn lookup(tag: &str) -> Option<&'static ModeDescriptor> {
    MODES.iter().find(|m| m.tag == tag)
}

pub fn lookup_res(tag: &str) -> Result<&'static ModeDescriptor, (&'static str, String)> {
    lookup(tag).ok_or_else(|| ("unknown_mode", format!("unknown visualizer '{}'", tag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_tag() {
        assert_eq!(lookup("simple").map(|m| m.shape_kind), Some(ShapeKind::Circle));
        assert_eq!(lookup("block").map(|m| m.shape_kind), Some(ShapeKind::Rect));
        assert!(lookup("blockInit").is_none());
        assert_eq!(lookup_res("radial").unwrap_err().0, "unknown_mode");
    }
}
