use super::tolerance::unit_or_fallback;
use crate::model::{NodeShape, Segment, Vec2};

/// Shorten the segment a→b so that each end stops at its node's boundary plus
/// `arrow_pad`.
///
/// Circles trim by distance (`radius + pad` along the unit direction).
/// Rectangles trim per axis (`half_width + pad` along x, `half_height + pad`
/// along y, each scaled by the direction's component), which keeps the line
/// ending on the axis-aligned box instead of an inscribed circle.
pub fn trim(a: Vec2, shape_a: NodeShape, b: Vec2, shape_b: NodeShape, arrow_pad: f32) -> Segment {
    let ((ux, uy), _) = unit_or_fallback(b.x - a.x, b.y - a.y);
    let (ax, ay) = end_offset(shape_a, ux, uy, arrow_pad);
    let (bx, by) = end_offset(shape_b, ux, uy, arrow_pad);
    Segment {
        x1: a.x + ax,
        y1: a.y + ay,
        x2: b.x - bx,
        y2: b.y - by,
    }
}

// Offset applied along (ux,uy) at one end of the segment.
fn end_offset(shape: NodeShape, ux: f32, uy: f32, pad: f32) -> (f32, f32) {
    match shape {
        NodeShape::Circle { radius } => {
            let off = radius + pad;
            (ux * off, uy * off)
        }
        NodeShape::Rect { width, height } => {
            let ox = width * 0.5 + pad;
            let oy = height * 0.5 + pad;
            (ux * ox, uy * oy)
        }
    }
}
