use crate::geometry::limits;
use crate::model::{NodeShape, NodeVisual, ShapeKind, Vec2};
use crate::modes::ModeDescriptor;
use roxmltree::{Document, Node, ParsingOptions};

/// What the core needs from a server-rendered canvas fragment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fragment {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub nodes: Vec<NodeVisual>,
    pub edges: Vec<(String, String, bool)>, // (from, to, directed)
}

/// Read a canvas fragment for nodes, edges and the canvas size.
///
/// Node positions come from the `translate(x,y)` transform; this is the only
/// time a transform is read. Shapes are taken from the mode's handle element
/// when it carries dimensions and fall back to the mode's default shape.
pub fn parse_fragment(html: &str, mode: &ModeDescriptor) -> Result<Fragment, (&'static str, String)> {
    if html.len() > limits::MAX_FRAGMENT_BYTES {
        return Err(("limit_exceeded", format!("fragment exceeds {} bytes", limits::MAX_FRAGMENT_BYTES)));
    }
    let opts = ParsingOptions { allow_dtd: true, ..ParsingOptions::default() };
    let doc = Document::parse_with_options(html, opts).map_err(|e| ("markup_parse", format!("{}", e)))?;
    let mut out = Fragment::default();

    if let Some(svg) = doc.descendants().find(|n| n.has_tag_name("svg")) {
        out.width = svg.attribute("width").and_then(parse_len);
        out.height = svg.attribute("height").and_then(parse_len);
    }

    for n in doc.descendants().filter(|n| n.is_element()) {
        match n.tag_name().name() {
            "g" if is_node_group(n) && !n.ancestors().skip(1).any(is_node_group) => {
                let Some(id) = n.attribute("data-id") else { continue };
                if out.nodes.len() >= limits::MAX_NODES {
                    return Err(("limit_exceeded", format!("more than {} nodes", limits::MAX_NODES)));
                }
                let position = match n.attribute("transform") {
                    Some(t) => parse_translate(t)
                        .ok_or_else(|| ("markup_parse", format!("node '{}' has an unreadable transform", id)))?,
                    None => Vec2::default(),
                };
                if !limits::in_coord_bounds(position.x) || !limits::in_coord_bounds(position.y) {
                    return Err(("out_of_range", format!("node '{}' position out of range", id)));
                }
                out.nodes.push(NodeVisual {
                    id: id.to_string(),
                    name: n.attribute("data-name").map(str::to_string),
                    attrs: n.attribute("data-attrs").map(str::to_string),
                    shape: node_shape(n, mode),
                    position,
                });
            }
            "line" => {
                let (Some(from), Some(to)) = (n.attribute("data-from"), n.attribute("data-to")) else { continue };
                if out.edges.len() >= limits::MAX_EDGES {
                    return Err(("limit_exceeded", format!("more than {} edges", limits::MAX_EDGES)));
                }
                out.edges.push((from.to_string(), to.to_string(), has_class(n, "directed")));
            }
            _ => {}
        }
    }
    Ok(out)
}

fn has_class(n: Node, class: &str) -> bool {
    n.attribute("class").map_or(false, |c| c.split_ascii_whitespace().any(|t| t == class))
}

fn is_node_group(n: Node) -> bool {
    n.has_tag_name("g") && has_class(n, "node")
}

// `tag` or `tag.class`, as written in a mode's handle.
fn matches_handle(n: Node, handle: &str) -> bool {
    let (tag, class) = match handle.split_once('.') {
        Some((t, c)) => (t, Some(c)),
        None => (handle, None),
    };
    n.has_tag_name(tag) && class.map_or(true, |c| has_class(n, c))
}

fn node_shape(group: Node, mode: &ModeDescriptor) -> NodeShape {
    group
        .descendants()
        .filter(|d| d.is_element() && matches_handle(*d, mode.handle))
        .find_map(|d| match mode.shape_kind {
            ShapeKind::Circle => d.attribute("r").and_then(parse_len).map(|radius| NodeShape::Circle { radius }),
            ShapeKind::Rect => {
                let width = d.attribute("width").and_then(parse_len)?;
                let height = d.attribute("height").and_then(parse_len)?;
                Some(NodeShape::Rect { width, height })
            }
        })
        .unwrap_or(mode.default_shape)
}

/// Read `translate(x,y)` or `translate(x y)`; a missing y is 0.
pub fn parse_translate(t: &str) -> Option<Vec2> {
    let p = t.find("translate")?;
    let rest = &t[p + "translate".len()..];
    let open = rest.find('(')?;
    let close = rest.find(')')?;
    if close < open {
        return None;
    }
    let mut nums = rest[open + 1..close]
        .split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f32>());
    let x = nums.next()?.ok()?;
    let y = match nums.next() {
        Some(v) => v.ok()?,
        None => 0.0,
    };
    if x.is_finite() && y.is_finite() {
        Some(Vec2::new(x, y))
    } else {
        None
    }
}

fn parse_len(s: &str) -> Option<f32> {
    let s = s.trim().trim_end_matches("px");
    let v = s.parse::<f32>().ok()?;
    if limits::in_extent_bounds(v) {
        Some(v)
    } else {
        None
    }
}
