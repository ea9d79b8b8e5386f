use crate::effects::Effect;
use crate::model::{EdgeMark, NodeMark};
use crate::store::NodePositionStore;
use std::collections::{HashMap, HashSet};

/// Which surface asked for the selection change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectSource {
    Canvas,
    Tree,
    // Re-applied after a subtree swap.
    Restore,
}

/// Single-node selection with edge highlighting.
///
/// Marks are tracked here so a later `select(None)` can clear exactly what was
/// set, and so tests can observe the visual state without a DOM.
#[derive(Clone, Debug, Default)]
pub struct SelectionController {
    selected: Option<String>,
    node_marks: HashMap<String, NodeMark>,
    edge_marks: HashMap<usize, EdgeMark>,
}

impl SelectionController {
    pub fn new() -> SelectionController { SelectionController::default() }

    pub fn selected(&self) -> Option<&str> { self.selected.as_deref() }

    pub fn node_mark(&self, id: &str) -> NodeMark {
        self.node_marks.get(id).copied().unwrap_or_default()
    }

    pub fn edge_mark(&self, index: usize) -> EdgeMark {
        self.edge_marks.get(&index).copied().unwrap_or_default()
    }

    /// True when no node or edge carries a mark.
    pub fn is_unmarked(&self) -> bool {
        self.node_marks.values().all(|m| *m == NodeMark::None)
            && self.edge_marks.values().all(|m| *m == EdgeMark::None)
    }

    /// Apply a selection. Returns `None` when `id` names a node that is not in
    /// the store; nothing changes in that case.
    pub fn select(&mut self, store: &NodePositionStore, id: Option<&str>) -> Option<Vec<Effect>> {
        match id {
            None => Some(self.clear()),
            Some(id) if !store.contains(id) => None,
            Some(id) => Some(self.highlight(store, id)),
        }
    }

    /// Forget selection and marks without emitting anything; used when the
    /// marked subtree has been replaced wholesale.
    pub fn forget(&mut self) -> Option<String> {
        self.node_marks.clear();
        self.edge_marks.clear();
        self.selected.take()
    }

    fn clear(&mut self) -> Vec<Effect> {
        let mut fx = Vec::new();
        let mut ids: Vec<_> = self.node_marks.drain().filter(|(_, m)| *m != NodeMark::None).collect();
        ids.sort_by(|a, b| a.0.cmp(&b.0));
        for (id, _) in ids {
            fx.push(Effect::MarkNode { id, mark: NodeMark::None });
        }
        let mut edges: Vec<_> = self.edge_marks.drain().filter(|(_, m)| *m != EdgeMark::None).collect();
        edges.sort_by_key(|e| e.0);
        for (index, _) in edges {
            fx.push(Effect::MarkEdge { index, mark: EdgeMark::None });
        }
        self.selected = None;
        fx
    }

    fn highlight(&mut self, store: &NodePositionStore, id: &str) -> Vec<Effect> {
        let active: HashSet<usize> = store.edges_touching(id).iter().copied().collect();
        let mut fx = Vec::with_capacity(store.node_count() + store.edge_count());

        for n in store.nodes() {
            let mark = if n.id == id { NodeMark::Selected } else { NodeMark::Dimmed };
            if self.node_mark(&n.id) != mark {
                fx.push(Effect::MarkNode { id: n.id.clone(), mark });
            }
            self.node_marks.insert(n.id.clone(), mark);
        }
        for i in 0..store.edge_count() {
            let mark = if active.contains(&i) { EdgeMark::Active } else { EdgeMark::Dimmed };
            if self.edge_mark(i) != mark {
                fx.push(Effect::MarkEdge { index: i, mark });
            }
            self.edge_marks.insert(i, mark);
        }
        self.selected = Some(id.to_string());
        fx
    }
}
