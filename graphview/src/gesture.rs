use crate::model::{PointerTarget, Vec2};

#[derive(Clone, Debug, PartialEq)]
pub enum GesturePhase {
    Idle,
    Panning {
        start: Vec2,  // screen
        pan_at: Vec2, // pan when the gesture began
        moved: bool,
    },
    DraggingNode {
        id: String,
        grab: Vec2, // pointer(world) - node position
    },
    PendingClick {
        id: String,
        grab: Vec2,
        start: Vec2, // screen
    },
}

/// What the controller should do in response to a pointer event.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureStep {
    None,
    BeginPan,
    BeginPress(String),
    Pan { pan_x: f32, pan_y: f32 },
    Drag { id: String, x: f32, y: f32 },
    Click(String),
    EndDrag(String),
    EndPan,
    BackgroundClick,
}

/// Pointer state machine deciding between pan, node drag and click.
///
/// One gesture at a time: events from another pointer while a gesture is
/// active are ignored.
#[derive(Clone, Debug)]
pub struct GestureArbiter {
    phase: GesturePhase,
    pointer: Option<i32>,
    click_slop: f32,
}

impl Default for GestureArbiter {
    fn default() -> Self { Self::new(3.0) }
}

impl GestureArbiter {
    pub fn new(click_slop: f32) -> GestureArbiter {
        GestureArbiter { phase: GesturePhase::Idle, pointer: None, click_slop }
    }

    pub fn phase(&self) -> &GesturePhase { &self.phase }
    pub fn is_idle(&self) -> bool { self.phase == GesturePhase::Idle }
    pub fn set_click_slop(&mut self, slop: f32) { self.click_slop = slop; }

    pub fn is_panning(&self) -> bool { matches!(self.phase, GesturePhase::Panning { .. }) }

    /// Id of the node under an active press or drag.
    pub fn active_node(&self) -> Option<&str> {
        match &self.phase {
            GesturePhase::DraggingNode { id, .. } | GesturePhase::PendingClick { id, .. } => Some(id),
            _ => None,
        }
    }

    /// `node_pos` is the target node's committed world position, when the
    /// target is a node handle known to the store.
    pub fn down(
        &mut self,
        pointer: i32,
        target: &PointerTarget,
        screen: Vec2,
        world: Vec2,
        pan: Vec2,
        node_pos: Option<Vec2>,
    ) -> GestureStep {
        if !self.is_idle() {
            return GestureStep::None;
        }
        match target {
            PointerTarget::Background => {
                self.pointer = Some(pointer);
                self.phase = GesturePhase::Panning { start: screen, pan_at: pan, moved: false };
                GestureStep::BeginPan
            }
            PointerTarget::NodeHandle(id) => {
                let Some(p) = node_pos else { return GestureStep::None };
                self.pointer = Some(pointer);
                self.phase = GesturePhase::PendingClick {
                    id: id.clone(),
                    grab: Vec2::new(world.x - p.x, world.y - p.y),
                    start: screen,
                };
                GestureStep::BeginPress(id.clone())
            }
            PointerTarget::Unclaimed => GestureStep::None,
        }
    }

    pub fn moved(&mut self, pointer: i32, screen: Vec2, world: Vec2) -> GestureStep {
        if self.pointer != Some(pointer) {
            return GestureStep::None;
        }
        let slop2 = self.click_slop * self.click_slop;
        match &mut self.phase {
            GesturePhase::Idle => GestureStep::None,
            GesturePhase::Panning { start, pan_at, moved } => {
                let dx = screen.x - start.x;
                let dy = screen.y - start.y;
                if dx * dx + dy * dy > slop2 {
                    *moved = true;
                }
                GestureStep::Pan { pan_x: pan_at.x + dx, pan_y: pan_at.y + dy }
            }
            GesturePhase::PendingClick { id, grab, start } => {
                let dx = screen.x - start.x;
                let dy = screen.y - start.y;
                if dx * dx + dy * dy <= slop2 {
                    return GestureStep::None;
                }
                let (id, grab) = (id.clone(), *grab);
                self.phase = GesturePhase::DraggingNode { id: id.clone(), grab };
                GestureStep::Drag { id, x: world.x - grab.x, y: world.y - grab.y }
            }
            GesturePhase::DraggingNode { id, grab } => GestureStep::Drag {
                id: id.clone(),
                x: world.x - grab.x,
                y: world.y - grab.y,
            },
        }
    }

    pub fn up(&mut self, pointer: i32) -> GestureStep {
        if self.pointer != Some(pointer) {
            return GestureStep::None;
        }
        self.pointer = None;
        match std::mem::replace(&mut self.phase, GesturePhase::Idle) {
            GesturePhase::Idle => GestureStep::None,
            GesturePhase::Panning { moved: false, .. } => GestureStep::BackgroundClick,
            GesturePhase::Panning { .. } => GestureStep::EndPan,
            GesturePhase::PendingClick { id, .. } => GestureStep::Click(id),
            GesturePhase::DraggingNode { id, .. } => GestureStep::EndDrag(id),
        }
    }

    /// Abort the active gesture; never selects.
    pub fn cancel(&mut self, pointer: i32) -> GestureStep {
        if self.pointer != Some(pointer) {
            return GestureStep::None;
        }
        self.pointer = None;
        match std::mem::replace(&mut self.phase, GesturePhase::Idle) {
            GesturePhase::Panning { .. } => GestureStep::EndPan,
            GesturePhase::DraggingNode { id, .. } | GesturePhase::PendingClick { id, .. } => {
                GestureStep::EndDrag(id)
            }
            GesturePhase::Idle => GestureStep::None,
        }
    }

    /// Drop any gesture without emitting a step (the subtree was replaced).
    pub fn reset(&mut self) {
        self.phase = GesturePhase::Idle;
        self.pointer = None;
    }
}
