pub mod command;
pub mod effects;
pub mod gesture;
pub mod markup;
pub mod minimap;
pub mod model;
pub mod modes;
pub mod selection;
pub mod settings;
pub mod store;
pub mod tooltip;
pub mod tree;
pub mod viewport;
pub mod geometry {
    pub mod limits;
    pub mod tolerance;
    pub mod trim;
}
mod json;

use effects::{Effect, LogLevel};
use gesture::{GestureArbiter, GestureStep};
use minimap::MinimapSync;
use model::{PointerTarget, Vec2};
use modes::ModeDescriptor;
use selection::{SelectSource, SelectionController};
use settings::Settings;
use std::collections::HashMap;
use store::NodePositionStore;
use tree::TreeView;
use viewport::ViewportTransform;

pub use effects::Request;
pub use json::{BirdResponse, SwitchResponse};

#[derive(Clone, Copy, Debug, PartialEq)]
enum InFlight {
    Switch(&'static ModeDescriptor),
    Bird,
    Command,
}

/// The canvas controller.
///
/// Owns one instance of every component and is the only thing that mutates
/// them. Input handlers and network deliveries return the effects the host
/// must apply, in order; position writes are always followed by their edge
/// updates within the same batch.
pub struct Explorer {
    viewport: ViewportTransform,
    store: NodePositionStore,
    selection: SelectionController,
    gesture: GestureArbiter,
    minimap: MinimapSync,
    tree: TreeView,
    settings: Settings,
    mode: &'static ModeDescriptor,
    next_seq: u64,
    in_flight: HashMap<u64, InFlight>,
    latest_switch: u64,
    latest_command: u64,
}

impl Default for Explorer {
    fn default() -> Self { Self::new() }
}

impl Explorer {
    pub fn new() -> Explorer {
        let settings = Settings::default();
        Explorer {
            viewport: ViewportTransform::new(),
            store: NodePositionStore::new(),
            selection: SelectionController::new(),
            gesture: GestureArbiter::new(settings.click_slop),
            minimap: MinimapSync::new(settings.minimap_delay_ms),
            tree: TreeView::new(),
            mode: &modes::SIMPLE,
            next_seq: 0,
            in_flight: HashMap::new(),
            latest_switch: 0,
            latest_command: 0,
            settings,
        }
    }

    pub fn with_settings(settings: Settings) -> Result<Explorer, (&'static str, String)> {
        let mut e = Explorer::new();
        e.set_settings(settings)?;
        Ok(e)
    }

    pub fn viewport(&self) -> &ViewportTransform { &self.viewport }
    pub fn store(&self) -> &NodePositionStore { &self.store }
    pub fn selection(&self) -> &SelectionController { &self.selection }
    pub fn gesture(&self) -> &GestureArbiter { &self.gesture }
    pub fn tree(&self) -> &TreeView { &self.tree }
    pub fn settings(&self) -> &Settings { &self.settings }
    pub fn mode(&self) -> &'static str { self.mode.tag }
    pub fn mode_descriptor(&self) -> &'static ModeDescriptor { self.mode }
    pub fn selected(&self) -> Option<&str> { self.selection.selected() }
    pub fn position(&self, id: &str) -> Option<Vec2> { self.store.position(id) }

    // Settings

    /// Validate and apply settings. On error nothing changes.
    pub fn set_settings(&mut self, settings: Settings) -> Result<Vec<Effect>, (&'static str, String)> {
        settings.validate()?;
        let pad_changed = settings.arrow_pad != self.store.arrow_pad();
        self.viewport.set_limits(settings.k_min, settings.k_max);
        self.gesture.set_click_slop(settings.click_slop);
        self.minimap.set_delay_ms(settings.minimap_delay_ms);
        self.settings = settings;
        let mut fx = self.transform_changed();
        if pad_changed {
            self.store.set_arrow_pad(self.settings.arrow_pad);
            fx.extend(self.edge_effects(0..self.store.edge_count()));
        }
        Ok(fx)
    }

    pub fn set_canvas_size(&mut self, width: f32, height: f32) -> Result<(), (&'static str, String)> {
        let mut s = self.settings.clone();
        s.canvas_width = width;
        s.canvas_height = height;
        s.validate()?;
        self.settings = s;
        Ok(())
    }

    pub fn set_arrow_pad(&mut self, pad: f32) -> Result<Vec<Effect>, (&'static str, String)> {
        let mut s = self.settings.clone();
        s.arrow_pad = pad;
        self.set_settings(s)
    }

    // Mounting

    /// Bind to a freshly rendered canvas fragment. Selection and tree state
    /// from a previous fragment are dropped; the viewport is kept.
    pub fn mount(&mut self, html: &str, mode_tag: &str) -> Result<Vec<Effect>, (&'static str, String)> {
        let mode = modes::lookup_res(mode_tag)?;
        let frag = markup::parse_fragment(html, mode)?;
        self.gesture.reset();
        self.selection.forget();
        if let (Some(w), Some(h)) = (frag.width, frag.height) {
            if w > 0.0 && h > 0.0 {
                self.settings.canvas_width = w;
                self.settings.canvas_height = h;
            }
        }
        self.store.load(frag.nodes, frag.edges);
        self.mode = mode;
        self.tree.retain(&self.store);
        let mut fx = vec![self.apply_transform()];
        fx.extend(self.render_all());
        fx.push(self.schedule_minimap());
        Ok(fx)
    }

    /// Node transforms and edge endpoints for the whole canvas.
    pub fn render_all(&self) -> Vec<Effect> {
        let mut fx: Vec<Effect> = self
            .store
            .nodes()
            .iter()
            .map(|n| Effect::node_translate(&n.id, n.position.x, n.position.y))
            .collect();
        fx.extend(self.edge_effects(0..self.store.edge_count()));
        fx
    }

    // Pointer input

    /// What a press at this screen point would hit, for hosts that do not
    /// resolve targets from the DOM themselves.
    pub fn target_at(&self, sx: f32, sy: f32) -> PointerTarget {
        let w = self.viewport.screen_to_world(sx, sy);
        match self.store.pick(w) {
            Some(id) => PointerTarget::NodeHandle(id.to_string()),
            None => PointerTarget::Background,
        }
    }

    pub fn pointer_down(&mut self, pointer: i32, sx: f32, sy: f32, target: &PointerTarget) -> Vec<Effect> {
        let screen = Vec2::new(sx, sy);
        let world = self.viewport.screen_to_world(sx, sy);
        let pan = Vec2::new(self.viewport.pan_x, self.viewport.pan_y);
        let node_pos = match target {
            PointerTarget::NodeHandle(id) => self.store.position(id),
            _ => None,
        };
        let step = self.gesture.down(pointer, target, screen, world, pan, node_pos);
        self.apply_step(step)
    }

    pub fn pointer_move(&mut self, pointer: i32, sx: f32, sy: f32) -> Vec<Effect> {
        let world = self.viewport.screen_to_world(sx, sy);
        let step = self.gesture.moved(pointer, Vec2::new(sx, sy), world);
        self.apply_step(step)
    }

    pub fn pointer_up(&mut self, pointer: i32) -> Vec<Effect> {
        let step = self.gesture.up(pointer);
        self.apply_step(step)
    }

    pub fn pointer_cancel(&mut self, pointer: i32) -> Vec<Effect> {
        let step = self.gesture.cancel(pointer);
        self.apply_step(step)
    }

    /// Wheel zoom anchored at the pointer; negative `delta_y` zooms in.
    pub fn wheel(&mut self, sx: f32, sy: f32, delta_y: f32) -> Vec<Effect> {
        if !delta_y.is_finite() {
            return Vec::new();
        }
        let factor = (-delta_y * self.settings.wheel_sensitivity).exp();
        self.zoom_at(sx, sy, factor)
    }

    pub fn zoom_at(&mut self, sx: f32, sy: f32, factor: f32) -> Vec<Effect> {
        let before = self.viewport;
        self.viewport.zoom_at(sx, sy, factor);
        if self.viewport == before {
            return Vec::new();
        }
        self.transform_changed()
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) -> Vec<Effect> {
        if !dx.is_finite() || !dy.is_finite() {
            return Vec::new();
        }
        self.viewport.pan(dx, dy);
        self.transform_changed()
    }

    /// Hover over a node (`Some`) or off all nodes (`None`). No tooltip while
    /// the canvas is being panned.
    pub fn hover(&mut self, id: Option<&str>, client_x: f32, client_y: f32) -> Vec<Effect> {
        let node = id.and_then(|id| self.store.node(id));
        match node {
            Some(n) if !self.gesture.is_panning() => {
                let c = tooltip::content(n.name.as_deref(), n.attrs.as_deref());
                vec![Effect::ShowTooltip {
                    id: n.id.clone(),
                    title: c.title,
                    rows: c.rows,
                    client_x,
                    client_y,
                }]
            }
            _ => vec![Effect::HideTooltip],
        }
    }

    /// Tooltip top-left for a measured box; see [`tooltip::place`].
    pub fn place_tooltip(&self, client_x: f32, client_y: f32, w: f32, h: f32, win_w: f32, win_h: f32) -> Vec2 {
        tooltip::place(
            Vec2::new(client_x, client_y),
            Vec2::new(w, h),
            Vec2::new(win_w, win_h),
            self.settings.tooltip_pad,
            self.settings.tooltip_margin,
        )
    }

    // Selection

    /// The single selection entry point for canvas clicks, tree clicks and
    /// restores. Unknown ids change nothing.
    pub fn select(&mut self, id: Option<&str>, source: SelectSource) -> Vec<Effect> {
        let Some(mut fx) = self.selection.select(&self.store, id) else {
            return Vec::new();
        };
        let scroll = source != SelectSource::Tree;
        fx.push(self.tree.highlight(id, scroll));
        fx.push(Effect::BirdSelect { id: id.map(str::to_string) });
        if let (Some(id), SelectSource::Tree | SelectSource::Restore) = (id, source) {
            fx.extend(self.focus_node(id));
        }
        fx
    }

    pub fn select_from_tree(&mut self, id: &str) -> Vec<Effect> {
        self.select(Some(id), SelectSource::Tree)
    }

    pub fn deselect(&mut self) -> Vec<Effect> {
        self.select(None, SelectSource::Canvas)
    }

    pub fn toggle_tree_row(&mut self, id: &str) -> Vec<Effect> {
        self.tree.toggle(&self.store, id).into_iter().collect()
    }

    /// Center the canvas on a node, zooming in to the focus scale if needed.
    pub fn focus_node(&mut self, id: &str) -> Vec<Effect> {
        let Some(p) = self.store.position(id) else {
            return Vec::new();
        };
        let (w, h) = (self.settings.canvas_width, self.settings.canvas_height);
        self.viewport.focus_on(p.x, p.y, self.settings.focus_scale, w, h);
        self.transform_changed()
    }

    // Minimap

    /// The host's debounce timer for `token` fired.
    pub fn minimap_due(&mut self, token: u64) -> Vec<Effect> {
        if !self.minimap.fire(token) {
            return Vec::new();
        }
        vec![self.bird_request()]
    }

    /// Request a minimap render now, bypassing the debounce.
    pub fn refresh_minimap(&mut self) -> Vec<Effect> {
        vec![self.bird_request()]
    }

    // Mode switching

    pub fn switch_mode(&mut self, mode_tag: &str) -> Result<Vec<Effect>, (&'static str, String)> {
        let mode = modes::lookup_res(mode_tag)?;
        let body = json::switch_body(&self.store);
        let url = format!("/switch-visualizer/{}/", mode.tag);
        let req = self.request(url, body, InFlight::Switch(mode));
        self.latest_switch = self.next_seq;
        Ok(vec![req])
    }

    pub fn switch_pending(&self) -> bool { self.in_flight.contains_key(&self.latest_switch) }

    // Commands

    pub fn submit_command(&mut self, text: &str) -> Result<Vec<Effect>, (&'static str, String)> {
        let cmd = command::parse(text)?;
        let body = serde_json::to_value(&cmd).map_err(|e| ("json_parse", format!("{}", e)))?;
        let req = self.request("/api/graph-command/".to_string(), body, InFlight::Command);
        self.latest_command = self.next_seq;
        Ok(vec![req])
    }

    // Network

    /// Hand back the response to request `seq`. Unknown, superseded and
    /// failed responses leave the view untouched.
    pub fn deliver(&mut self, seq: u64, status: u16, body: serde_json::Value) -> Vec<Effect> {
        let Some(kind) = self.in_flight.remove(&seq) else {
            return Vec::new();
        };
        let ok = (200..300).contains(&status);
        match kind {
            InFlight::Switch(_) if seq != self.latest_switch => {
                vec![Effect::log(LogLevel::Info, format!("discarded superseded mode switch #{}", seq))]
            }
            InFlight::Switch(_) if !ok => {
                vec![Effect::log(LogLevel::Error, format!("switch failed: HTTP {}", status))]
            }
            InFlight::Switch(requested) => match self.finish_switch(body, requested) {
                Ok(fx) => fx,
                Err((code, msg)) => vec![Effect::log(LogLevel::Error, format!("switch failed: {}: {}", code, msg))],
            },
            InFlight::Bird if !ok => {
                vec![Effect::log(LogLevel::Warn, format!("minimap render failed: HTTP {}", status))]
            }
            InFlight::Bird => match json::decode::<BirdResponse>(body) {
                Ok(r) if self.minimap.accept(seq) => {
                    self.drop_stale_birds(seq);
                    vec![
                        Effect::ReplaceMinimap { html: r.html },
                        Effect::BirdSelect { id: self.selection.selected().map(str::to_string) },
                    ]
                }
                Ok(_) => Vec::new(),
                Err((_, msg)) => vec![Effect::log(LogLevel::Warn, format!("minimap render failed: {}", msg))],
            },
            // An older command's graph would overwrite the newer one's.
            InFlight::Command if seq != self.latest_command => match command::classify(status, &body) {
                Ok(_) => vec![Effect::log(LogLevel::Info, format!("discarded superseded command #{}", seq))],
                Err(msg) => vec![Effect::log(LogLevel::Error, format!("command failed: {}", msg))],
            },
            InFlight::Command => match command::classify(status, &body) {
                Ok(graph) => vec![
                    Effect::log(LogLevel::Info, "command applied"),
                    Effect::GraphChanged { graph },
                ],
                Err(msg) => vec![Effect::log(LogLevel::Error, format!("command failed: {}", msg))],
            },
        }
    }

    pub fn is_in_flight(&self, seq: u64) -> bool { self.in_flight.contains_key(&seq) }

    /// `seq` names a request this explorer handed out, settled or not.
    pub fn was_issued(&self, seq: u64) -> bool { seq > 0 && seq <= self.next_seq }

    /// The request never produced a response (network error, abort).
    pub fn fail(&mut self, seq: u64, message: &str) -> Vec<Effect> {
        let what = match self.in_flight.remove(&seq) {
            Some(InFlight::Switch(_)) => "switch",
            Some(InFlight::Bird) => "minimap render",
            Some(InFlight::Command) => "command",
            None => return Vec::new(),
        };
        vec![Effect::log(LogLevel::Error, format!("{} failed: {}", what, message))]
    }

    fn finish_switch(
        &mut self,
        body: serde_json::Value,
        requested: &'static ModeDescriptor,
    ) -> Result<Vec<Effect>, (&'static str, String)> {
        let resp: SwitchResponse = json::decode(body)?;
        let mode = modes::lookup_res(&resp.visualizer)?;
        if mode.tag != requested.tag {
            return Err(("unknown_mode", format!("asked for '{}', got '{}'", requested.tag, mode.tag)));
        }
        let mut frag = markup::parse_fragment(&resp.html, mode)?;

        // Everything below mutates; parsing is done.
        let kept: HashMap<String, Vec2> = self.store.positions().map(|(id, p)| (id.to_string(), p)).collect();
        for n in frag.nodes.iter_mut() {
            if let Some(p) = kept.get(&n.id) {
                n.position = *p;
            }
        }
        let previous = self.selection.forget();
        self.gesture.reset();
        self.store.load(frag.nodes, frag.edges);
        self.mode = mode;
        self.tree.retain(&self.store);

        let mut fx = vec![Effect::ReplaceMain { html: resp.html }, Effect::HideTooltip, self.apply_transform()];
        fx.extend(self.render_all());
        match previous {
            Some(id) if self.store.contains(&id) => fx.extend(self.select(Some(&id), SelectSource::Restore)),
            Some(_) => fx.extend(self.select(None, SelectSource::Canvas)),
            None => {}
        }
        // Bird renders issued for the old mode are stale now.
        self.minimap.supersede(self.next_seq);
        self.drop_stale_birds(self.next_seq);
        fx.push(self.bird_request());
        Ok(fx)
    }

    fn apply_step(&mut self, step: GestureStep) -> Vec<Effect> {
        match step {
            GestureStep::None => Vec::new(),
            GestureStep::BeginPan => vec![Effect::SetPanning { active: true }, Effect::HideTooltip],
            GestureStep::EndPan => vec![Effect::SetPanning { active: false }],
            GestureStep::BackgroundClick => {
                let mut fx = vec![Effect::SetPanning { active: false }];
                fx.extend(self.select(None, SelectSource::Canvas));
                fx
            }
            GestureStep::Pan { pan_x, pan_y } => {
                self.viewport.set_pan(pan_x, pan_y);
                self.transform_changed()
            }
            GestureStep::BeginPress(id) => vec![Effect::SetDragging { id, active: true }],
            GestureStep::Drag { id, x, y } => {
                let Some(touched) = self.store.set_position(&id, x, y) else {
                    return Vec::new();
                };
                let mut fx = vec![Effect::node_translate(&id, x, y)];
                fx.extend(self.edge_effects(touched));
                fx.push(self.schedule_minimap());
                fx
            }
            GestureStep::Click(id) => {
                let mut fx = vec![Effect::SetDragging { id: id.clone(), active: false }];
                fx.extend(self.select(Some(&id), SelectSource::Canvas));
                fx
            }
            GestureStep::EndDrag(id) => vec![Effect::SetDragging { id, active: false }],
        }
    }

    fn edge_effects(&self, indices: impl IntoIterator<Item = usize>) -> Vec<Effect> {
        indices
            .into_iter()
            .filter_map(|i| {
                let e = self.store.edge(i)?;
                let s = e.rendered;
                Some(Effect::SetEdge {
                    index: i,
                    from: e.from.clone(),
                    to: e.to.clone(),
                    x1: s.x1,
                    y1: s.y1,
                    x2: s.x2,
                    y2: s.y2,
                })
            })
            .collect()
    }

    fn apply_transform(&self) -> Effect {
        Effect::ApplyTransform {
            transform: self.viewport.transform_attr(),
            pan_x: self.viewport.pan_x,
            pan_y: self.viewport.pan_y,
            scale: self.viewport.scale,
        }
    }

    fn transform_changed(&mut self) -> Vec<Effect> {
        vec![self.apply_transform(), self.schedule_minimap()]
    }

    fn schedule_minimap(&mut self) -> Effect {
        let token = self.minimap.touch();
        Effect::ScheduleMinimap { token, delay_ms: self.minimap.delay_ms() }
    }

    fn bird_request(&mut self) -> Effect {
        let rect = self.viewport.visible_world_rect(self.settings.canvas_width, self.settings.canvas_height);
        let body = json::bird_body(&self.store, rect, self.mode.tag);
        self.request("/bird-render/".to_string(), body, InFlight::Bird)
    }

    /// Forget minimap requests numbered `upto` or lower; their responses
    /// would be dropped anyway.
    fn drop_stale_birds(&mut self, upto: u64) {
        self.in_flight.retain(|&s, kind| !(*kind == InFlight::Bird && s <= upto));
    }

    fn request(&mut self, url: String, body: serde_json::Value, kind: InFlight) -> Effect {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.in_flight.insert(seq, kind);
        Effect::Request(Request { seq, method: "POST", url, body })
    }
}
