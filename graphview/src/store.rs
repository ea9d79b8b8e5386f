use crate::geometry::tolerance::ARROW_PAD;
use crate::geometry::trim::trim;
use crate::model::{EdgeVisual, NodeShape, NodeVisual, Segment, Vec2};
use std::collections::HashMap;

/// World-space node positions plus the edges derived from them.
///
/// This is the only place positions live. Edge endpoints are recomputed from
/// here whenever a node moves, so they can never drift from their nodes.
#[derive(Clone, Debug)]
pub struct NodePositionStore {
    nodes: Vec<NodeVisual>,
    index: HashMap<String, usize>,
    edges: Vec<EdgeVisual>,
    by_node: HashMap<String, Vec<usize>>, // node id -> incident edge indices
    arrow_pad: f32,
}

impl Default for NodePositionStore {
    fn default() -> Self { Self::new() }
}

impl NodePositionStore {
    pub fn new() -> NodePositionStore {
        NodePositionStore {
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            by_node: HashMap::new(),
            arrow_pad: ARROW_PAD,
        }
    }

    /// Replace all nodes and edges. Duplicate node ids keep the first
    /// occurrence; edges naming unknown nodes are dropped.
    pub fn load(&mut self, nodes: Vec<NodeVisual>, edges: Vec<(String, String, bool)>) {
        self.clear();
        for n in nodes {
            if self.index.contains_key(&n.id) {
                continue;
            }
            self.index.insert(n.id.clone(), self.nodes.len());
            self.nodes.push(n);
        }
        for (from, to, directed) in edges {
            if !self.index.contains_key(&from) || !self.index.contains_key(&to) {
                continue;
            }
            let i = self.edges.len();
            self.by_node.entry(from.clone()).or_default().push(i);
            if to != from {
                self.by_node.entry(to.clone()).or_default().push(i);
            }
            self.edges.push(EdgeVisual { from, to, directed, rendered: Segment::default() });
        }
        self.recompute_all();
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.edges.clear();
        self.by_node.clear();
    }

    pub fn arrow_pad(&self) -> f32 { self.arrow_pad }

    pub fn set_arrow_pad(&mut self, pad: f32) {
        self.arrow_pad = pad;
        self.recompute_all();
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }
    pub fn nodes(&self) -> &[NodeVisual] { &self.nodes }
    pub fn edges(&self) -> &[EdgeVisual] { &self.edges }
    pub fn contains(&self, id: &str) -> bool { self.index.contains_key(id) }

    pub fn node(&self, id: &str) -> Option<&NodeVisual> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn position(&self, id: &str) -> Option<Vec2> {
        self.node(id).map(|n| n.position)
    }

    pub fn edge(&self, index: usize) -> Option<&EdgeVisual> { self.edges.get(index) }

    /// Overwrite a node's position and recompute every edge touching it.
    /// Returns the affected edge indices, or `None` for an unknown id.
    pub fn set_position(&mut self, id: &str, x: f32, y: f32) -> Option<Vec<usize>> {
        let &i = self.index.get(id)?;
        self.nodes[i].position = Vec2::new(x, y);
        let touched = self.edges_touching(id).to_vec();
        for &e in &touched {
            self.recompute_edge(e);
        }
        Some(touched)
    }

    pub fn edges_touching(&self, id: &str) -> &[usize] {
        self.by_node.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Ids at the other end of each edge touching `id`, in edge order, without
    /// repeats.
    pub fn neighbors(&self, id: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for &e in self.edges_touching(id) {
            let edge = &self.edges[e];
            let other = if edge.from == id { &edge.to } else { &edge.from };
            if other != id && !out.iter().any(|o| o == other) {
                out.push(other.clone());
            }
        }
        out
    }

    /// Trimmed endpoints for an edge from the current positions.
    pub fn trimmed(&self, index: usize) -> Option<Segment> {
        let e = self.edges.get(index)?;
        let a = self.node(&e.from)?;
        let b = self.node(&e.to)?;
        Some(trim(a.position, a.shape, b.position, b.shape, self.arrow_pad))
    }

    pub fn recompute_edge(&mut self, index: usize) -> Option<Segment> {
        let seg = self.trimmed(index)?;
        self.edges[index].rendered = seg;
        Some(seg)
    }

    pub fn recompute_all(&mut self) {
        for i in 0..self.edges.len() {
            self.recompute_edge(i);
        }
    }

    /// Topmost node whose shape contains the world point. Later nodes paint
    /// over earlier ones, so the scan runs back to front.
    pub fn pick(&self, p: Vec2) -> Option<&str> {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.shape.contains(p.x - n.position.x, p.y - n.position.y))
            .map(|n| n.id.as_str())
    }

    pub fn positions(&self) -> impl Iterator<Item = (&str, Vec2)> + '_ {
        self.nodes.iter().map(|n| (n.id.as_str(), n.position))
    }

    pub fn shape(&self, id: &str) -> Option<NodeShape> {
        self.node(id).map(|n| n.shape)
    }
}
