use graphview::effects::{Effect, LogLevel};
use graphview::model::{EdgeMark, NodeMark, PointerTarget, Segment};
use graphview::selection::SelectSource;
use graphview::Explorer;

const CANVAS: &str = r#"<svg width="1000" height="620">
<g id="viewport">
  <line data-from="a" data-to="b" class="edge directed" x1="100" y1="100" x2="300" y2="100"></line>
  <line data-from="a" data-to="c" class="edge" x1="100" y1="100" x2="100" y2="300"></line>
  <g class="node" data-id="a" data-name="Alpha" data-attrs="{&quot;role&quot;: &quot;lead&quot;, &quot;age&quot;: 41}" transform="translate(100,100)">
    <circle r="16"></circle><text>Alpha</text>
  </g>
  <g class="node" data-id="b" data-name="Beta" transform="translate(300,100)"><circle r="16"></circle></g>
  <g class="node" data-id="c" data-attrs="not json" transform="translate(100,300)"><circle r="16"></circle></g>
  <g class="node" data-id="d" transform="translate(700,500)"><circle r="16"></circle></g>
</g>
</svg>"#;

fn mounted() -> Explorer {
    let mut e = Explorer::new();
    e.mount(CANVAS, "simple").unwrap();
    e
}

fn node(id: &str) -> PointerTarget {
    PointerTarget::NodeHandle(id.to_string())
}

fn tokens(fx: &[Effect]) -> Vec<u64> {
    fx.iter()
        .filter_map(|e| match e {
            Effect::ScheduleMinimap { token, .. } => Some(*token),
            _ => None,
        })
        .collect()
}

fn assert_edges_consistent(e: &Explorer) {
    let store = e.store();
    for i in 0..store.edge_count() {
        assert_eq!(store.edge(i).unwrap().rendered, store.trimmed(i).unwrap(), "edge {} is stale", i);
    }
}

#[test]
fn mount_reads_positions_edges_and_canvas() {
    let e = mounted();
    assert_eq!(e.store().node_count(), 4);
    assert_eq!(e.store().edge_count(), 2);
    assert!(e.store().edge(0).unwrap().directed);
    assert_eq!(e.settings().canvas_width, 1000.0);
    assert_eq!(e.settings().canvas_height, 620.0);
    assert_eq!(e.mode(), "simple");
    assert!(e.selection().is_unmarked());
}

#[test]
fn edges_are_trimmed_to_node_borders() {
    let mut e = Explorer::new();
    let html = r#"<svg width="400" height="200">
      <line data-from="l" data-to="r" class="directed"></line>
      <g class="node" data-id="l" transform="translate(100,0)"><circle r="16"/></g>
      <g class="node" data-id="r" transform="translate(300,0)"><circle r="16"/></g></svg>"#;
    let fx = e.mount(html, "simple").unwrap();
    let seg = Segment { x1: 122.0, y1: 0.0, x2: 278.0, y2: 0.0 };
    assert_eq!(e.store().edge(0).unwrap().rendered, seg);
    assert!(fx.contains(&Effect::SetEdge {
        index: 0,
        from: "l".into(),
        to: "r".into(),
        x1: 122.0,
        y1: 0.0,
        x2: 278.0,
        y2: 0.0
    }));
}

#[test]
fn wheel_zoom_keeps_point_under_cursor() {
    let mut e = mounted();
    e.pan_by(37.0, -12.0);
    let before = e.viewport().screen_to_world(400.0, 300.0);
    let fx = e.wheel(400.0, 300.0, -100.0);
    assert!(e.viewport().scale > 1.0);
    let after = e.viewport().screen_to_world(400.0, 300.0);
    assert!((before.x - after.x).abs() < 1e-3 && (before.y - after.y).abs() < 1e-3);
    assert!(matches!(fx[0], Effect::ApplyTransform { .. }));
    assert_eq!(tokens(&fx).len(), 1);
}

#[test]
fn wheel_at_limit_is_a_no_op() {
    let mut e = mounted();
    for _ in 0..50 {
        e.wheel(0.0, 0.0, -500.0);
    }
    assert_eq!(e.viewport().scale, 4.0);
    assert!(e.wheel(0.0, 0.0, -500.0).is_empty());
    assert!(e.wheel(0.0, 0.0, f32::NAN).is_empty());
}

#[test]
fn press_and_release_in_place_selects() {
    let mut e = mounted();
    let fx = e.pointer_down(1, 100.0, 100.0, &node("a"));
    assert_eq!(fx, vec![Effect::SetDragging { id: "a".into(), active: true }]);
    // Jitter inside the click slop.
    assert!(e.pointer_move(1, 102.0, 100.0).is_empty());
    let fx = e.pointer_up(1);
    assert_eq!(e.selected(), Some("a"));
    assert!(fx.contains(&Effect::SetDragging { id: "a".into(), active: false }));
    assert!(fx.contains(&Effect::TreeHighlight { id: Some("a".into()), scroll: true }));
    assert!(fx.contains(&Effect::BirdSelect { id: Some("a".into()) }));
    assert_eq!(e.position("a").unwrap().x, 100.0, "a click never moves the node");

    let sel = e.selection();
    assert_eq!(sel.node_mark("a"), NodeMark::Selected);
    assert_eq!(sel.node_mark("b"), NodeMark::Dimmed);
    assert_eq!(sel.node_mark("c"), NodeMark::Dimmed);
    assert_eq!(sel.node_mark("d"), NodeMark::Dimmed);
    assert_eq!(sel.edge_mark(0), EdgeMark::Active);
    assert_eq!(sel.edge_mark(1), EdgeMark::Active);
}

#[test]
fn drag_moves_node_and_its_edges_only() {
    let mut e = mounted();
    e.pointer_down(7, 304.0, 98.0, &node("b"));
    let fx = e.pointer_move(7, 314.0, 103.0);
    // Grab offset (4,-2) is preserved.
    assert_eq!(e.position("b").unwrap().x, 310.0);
    assert_eq!(e.position("b").unwrap().y, 105.0);
    assert_eq!(fx[0], Effect::node_translate("b", 310.0, 105.0));
    let edge_updates: Vec<usize> = fx
        .iter()
        .filter_map(|f| match f {
            Effect::SetEdge { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(edge_updates, vec![0]);
    assert_edges_consistent(&e);

    let fx = e.pointer_up(7);
    assert_eq!(fx, vec![Effect::SetDragging { id: "b".into(), active: false }]);
    assert_eq!(e.selected(), None, "a drag is not a click");
}

#[test]
fn drag_is_in_world_units_when_zoomed() {
    let mut e = mounted();
    e.zoom_at(0.0, 0.0, 2.0);
    e.pointer_down(1, 200.0, 200.0, &node("a"));
    e.pointer_move(1, 240.0, 200.0);
    assert_eq!(e.position("a").unwrap().x, 120.0);
}

#[test]
fn background_press_without_motion_deselects() {
    let mut e = mounted();
    e.select(Some("a"), SelectSource::Canvas);
    assert_eq!(e.pointer_down(1, 900.0, 50.0, &PointerTarget::Background)[0], Effect::SetPanning { active: true });
    let fx = e.pointer_up(1);
    assert_eq!(fx[0], Effect::SetPanning { active: false });
    assert_eq!(e.selected(), None);
    assert!(e.selection().is_unmarked());
    assert!(fx.contains(&Effect::MarkNode { id: "d".into(), mark: NodeMark::None }));
    assert!(fx.contains(&Effect::TreeHighlight { id: None, scroll: false }));
}

#[test]
fn panning_keeps_selection() {
    let mut e = mounted();
    e.select(Some("a"), SelectSource::Canvas);
    e.pointer_down(1, 900.0, 50.0, &PointerTarget::Background);
    e.pointer_move(1, 950.0, 70.0);
    assert_eq!(e.viewport().pan_x, 50.0);
    assert_eq!(e.viewport().pan_y, 20.0);
    assert_eq!(e.pointer_up(1), vec![Effect::SetPanning { active: false }]);
    assert_eq!(e.selected(), Some("a"));
}

#[test]
fn other_pointers_and_unclaimed_presses_are_ignored() {
    let mut e = mounted();
    assert!(e.pointer_down(1, 10.0, 10.0, &PointerTarget::Unclaimed).is_empty());
    e.pointer_down(1, 100.0, 100.0, &node("a"));
    assert!(e.pointer_down(2, 900.0, 50.0, &PointerTarget::Background).is_empty());
    assert!(e.pointer_move(2, 500.0, 500.0).is_empty());
    assert!(e.pointer_up(2).is_empty());
    assert!(!e.gesture().is_idle());
}

#[test]
fn cancel_never_selects() {
    let mut e = mounted();
    e.pointer_down(3, 100.0, 100.0, &node("a"));
    let fx = e.pointer_cancel(3);
    assert_eq!(fx, vec![Effect::SetDragging { id: "a".into(), active: false }]);
    assert_eq!(e.selected(), None);
    assert!(e.gesture().is_idle());
}

#[test]
fn select_then_deselect_leaves_nothing_marked() {
    let mut e = mounted();
    e.select(Some("d"), SelectSource::Canvas);
    assert_eq!(e.selection().node_mark("a"), NodeMark::Dimmed);
    e.select(Some("b"), SelectSource::Canvas);
    assert_eq!(e.selection().node_mark("d"), NodeMark::Dimmed);
    assert_eq!(e.selection().edge_mark(1), EdgeMark::Dimmed);
    e.deselect();
    assert!(e.selection().is_unmarked());
}

#[test]
fn reselecting_is_idempotent() {
    let mut e = mounted();
    e.select(Some("a"), SelectSource::Canvas);
    let fx = e.select(Some("a"), SelectSource::Canvas);
    assert!(!fx.iter().any(|f| matches!(f, Effect::MarkNode { .. } | Effect::MarkEdge { .. })));
    assert_eq!(e.selection().node_mark("a"), NodeMark::Selected);
}

#[test]
fn unknown_node_selection_changes_nothing() {
    let mut e = mounted();
    e.select(Some("a"), SelectSource::Canvas);
    assert!(e.select(Some("zzz"), SelectSource::Canvas).is_empty());
    assert_eq!(e.selected(), Some("a"));
}

#[test]
fn tree_selection_focuses_canvas() {
    let mut e = mounted();
    let fx = e.select_from_tree("c");
    assert!(fx.contains(&Effect::TreeHighlight { id: Some("c".into()), scroll: false }));
    assert_eq!(e.viewport().scale, 1.5);
    let center = e.viewport().world_to_screen(100.0, 300.0);
    assert!((center.x - 500.0).abs() < 1e-3 && (center.y - 310.0).abs() < 1e-3);
}

#[test]
fn tree_rows_list_neighbors() {
    let mut e = mounted();
    match e.toggle_tree_row("a").as_slice() {
        [Effect::TreeExpand { id, rows }] => {
            assert_eq!(id, "a");
            assert_eq!(rows.iter().map(|r| r.label.as_str()).collect::<Vec<_>>(), vec!["Beta", "c"]);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(e.toggle_tree_row("a"), vec![Effect::TreeCollapse { id: "a".into() }]);
}

#[test]
fn tooltip_rows_and_malformed_attrs() {
    let mut e = mounted();
    match e.hover(Some("a"), 10.0, 20.0).as_slice() {
        [Effect::ShowTooltip { title, rows, .. }] => {
            assert_eq!(title, "Alpha");
            assert_eq!(rows, &vec![("role".to_string(), "lead".to_string()), ("age".to_string(), "41".to_string())]);
        }
        other => panic!("unexpected {:?}", other),
    }
    match e.hover(Some("c"), 10.0, 20.0).as_slice() {
        [Effect::ShowTooltip { rows, .. }] => assert!(rows.is_empty()),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(e.hover(None, 0.0, 0.0), vec![Effect::HideTooltip]);
}

#[test]
fn no_tooltip_while_panning() {
    let mut e = mounted();
    e.pointer_down(1, 900.0, 50.0, &PointerTarget::Background);
    assert_eq!(e.hover(Some("a"), 0.0, 0.0), vec![Effect::HideTooltip]);
}

#[test]
fn target_at_picks_topmost_node() {
    let e = mounted();
    assert_eq!(e.target_at(105.0, 95.0), node("a"));
    assert_eq!(e.target_at(200.0, 200.0), PointerTarget::Background);
}

#[test]
fn minimap_debounce_fires_latest_token_only() {
    let mut e = mounted();
    let mut all = Vec::new();
    for dx in [5.0, 5.0, 5.0] {
        all.extend(tokens(&e.pan_by(dx, 0.0)));
    }
    assert_eq!(all.len(), 3);
    assert!(e.minimap_due(all[0]).is_empty());
    assert!(e.minimap_due(all[1]).is_empty());
    match e.minimap_due(all[2]).as_slice() {
        [Effect::Request(r)] => {
            assert_eq!(r.url, "/bird-render/");
            assert_eq!(r.body["visualizer"], "simple");
            assert_eq!(r.body["positions"]["a"], serde_json::json!([100.0, 100.0]));
            assert_eq!(r.body["viewport"]["x"], serde_json::json!(-15.0));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(e.minimap_due(all[2]).is_empty(), "a token fires once");
}

#[test]
fn settings_change_retrims_edges() {
    let mut e = mounted();
    let mut s = e.settings().clone();
    s.arrow_pad = 0.0;
    let fx = e.set_settings(s).unwrap();
    assert_eq!(e.store().edge(0).unwrap().rendered.x1, 116.0);
    assert!(fx.iter().any(|f| matches!(f, Effect::SetEdge { index: 0, .. })));

    let mut bad = e.settings().clone();
    bad.k_min = 0.0;
    assert_eq!(e.set_settings(bad).unwrap_err().0, "invalid_settings");
    assert_eq!(e.settings().arrow_pad, 0.0);
}

#[test]
fn failed_requests_only_log() {
    let mut e = mounted();
    let seq = match e.refresh_minimap().as_slice() {
        [Effect::Request(r)] => r.seq,
        other => panic!("unexpected {:?}", other),
    };
    match e.fail(seq, "network down").as_slice() {
        [Effect::Log { level: LogLevel::Error, message }] => assert!(message.contains("network down")),
        other => panic!("unexpected {:?}", other),
    }
    assert!(e.fail(seq, "again").is_empty());
}
