use crate::effects::{Effect, TreeRow};
use crate::store::NodePositionStore;
use std::collections::HashSet;

/// Sidebar tree state: the highlighted row and which rows are expanded to
/// show their neighbors.
#[derive(Clone, Debug, Default)]
pub struct TreeView {
    highlighted: Option<String>,
    expanded: HashSet<String>,
}

impl TreeView {
    pub fn new() -> TreeView { TreeView::default() }

    pub fn highlighted(&self) -> Option<&str> { self.highlighted.as_deref() }
    pub fn is_expanded(&self, id: &str) -> bool { self.expanded.contains(id) }

    pub fn highlight(&mut self, id: Option<&str>, scroll: bool) -> Effect {
        self.highlighted = id.map(str::to_string);
        Effect::TreeHighlight { id: self.highlighted.clone(), scroll: scroll && id.is_some() }
    }

    /// Expand or collapse a row. Expanding lists the node's neighbors from the
    /// current edge set. Unknown ids do nothing.
    pub fn toggle(&mut self, store: &NodePositionStore, id: &str) -> Option<Effect> {
        if !store.contains(id) {
            return None;
        }
        if self.expanded.remove(id) {
            return Some(Effect::TreeCollapse { id: id.to_string() });
        }
        let rows = store
            .neighbors(id)
            .into_iter()
            .map(|n| {
                let label = store.node(&n).and_then(|v| v.name.clone()).unwrap_or_else(|| n.clone());
                TreeRow { id: n, label }
            })
            .collect();
        self.expanded.insert(id.to_string());
        Some(Effect::TreeExpand { id: id.to_string(), rows })
    }

    /// Drop state for nodes that no longer exist after a re-render.
    pub fn retain(&mut self, store: &NodePositionStore) {
        self.expanded.retain(|id| store.contains(id));
        if self.highlighted.as_deref().map_or(false, |h| !store.contains(h)) {
            self.highlighted = None;
        }
    }
}
