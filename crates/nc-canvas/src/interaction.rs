//! The pointer-driven interaction state machine.
//!
//! `CanvasEngine` owns the graph, the view transform, the settings, and
//! the transient selection. Input arrives as normalized `InputEvent`s with
//! a timestamp; timed behavior (the marquee debounce) runs through the
//! deferred queue and `tick`, so the whole machine is testable without an
//! event loop. States are mutually exclusive; entering a gesture cancels
//! whatever was in flight.

use crate::clipboard::ClipboardManager;
use crate::commands::DeferredQueue;
use crate::gesture::ShakeDetector;
use crate::input::{InputEvent, Modifiers, PointerButton};
use nc_core::model::{Node, NodeKind, Point, Rect};
use nc_core::{
    CanvasSettings, EdgeId, GraphEvent, GraphModel, HandleSide, NodeId, ViewTransform,
};
use nc_geom::curve::{EdgePath, EndOrient, two_point_curve};
use nc_geom::handle::handle_position;
use nc_geom::hit::{
    ResizeEdge, edge_at_point, edge_polyline, edges_in_rect, handle_at_point, node_at_point,
    nodes_in_rect, resize_edge_at, routing_insert_index, routing_point_at, smallest_group_at,
};
use nc_geom::intersect::{polyline_distance, polyline_segment_intersection};
use nc_geom::snap::{Guide, grid_snap_point, snap_position, snap_resize};

/// Two presses within this window (and radius) on empty canvas create a
/// node at the pointer.
const DOUBLE_PRESS_MS: f64 = 300.0;
const DOUBLE_PRESS_RADIUS: f32 = 8.0;

/// Default geometry for nodes created by double-press.
const DEFAULT_NODE_WIDTH: f32 = 200.0;
const DEFAULT_NODE_HEIGHT: f32 = 100.0;

/// Side length of the routing node spliced in by a routing cut.
const ROUTING_NODE_SIZE: f32 = 16.0;

/// Keyboard-toggled pointer mode. While a mode is on, pointer-down starts
/// the corresponding cut gesture instead of the hit-test dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutMode {
    #[default]
    None,
    /// Cut line deletes the first edge it crosses.
    Cut,
    /// Cut line splices a routing node into the first edge it crosses.
    Route,
}

/// Transient selection. Cleared and rebuilt by gestures, never persisted.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// The active gesture. Exactly one variant at a time.
#[derive(Debug)]
pub enum InteractionState {
    Idle,
    Dragging {
        /// The node under the pointer; snapping and shake follow it.
        primary: NodeId,
        /// Origin snapshots for the full move set, in each node's stored
        /// coordinate space.
        originals: Vec<(NodeId, Point)>,
        pointer_start: Point,
        moved: bool,
    },
    Resizing {
        node: NodeId,
        edge: ResizeEdge,
        start_rect: Rect,
        start_pointer: Point,
    },
    DrawingEdge {
        from: NodeId,
        handle: HandleSide,
        current: Point,
    },
    /// Pointer down on empty canvas, marquee not yet started. Promoted to
    /// `Selecting` by the debounce timer unless the press resolves into a
    /// click or a double-press first.
    SelectPending { start: Point },
    Selecting { start: Point, current: Point },
    CuttingEdge { start: Point, current: Point },
    RoutingCut { start: Point, current: Point },
    RoutingPointEdit {
        edge: EdgeId,
        index: usize,
        origin: Point,
    },
    Panning { last_screen: Point },
}

/// Commands scheduled against the deferred queue.
#[derive(Debug, Clone, Copy)]
enum Deferred {
    BeginMarquee { start: Point },
}

/// The interaction engine: single owner of all canvas state.
pub struct CanvasEngine {
    pub model: GraphModel,
    pub view: ViewTransform,
    pub settings: CanvasSettings,

    selection: Selection,
    state: InteractionState,
    cut_mode: CutMode,
    /// Alignment guides from the last drag/resize tick.
    guides: Vec<Guide>,
    shake: ShakeDetector,
    clipboard: ClipboardManager,
    deferred: DeferredQueue<Deferred>,

    /// Last primary press on empty canvas, for double-press detection.
    last_press: Option<(f64, Point)>,
    /// Last known pointer position in world space (paste target).
    pointer_world: Point,
}

impl Default for CanvasEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasEngine {
    pub fn new() -> Self {
        Self {
            model: GraphModel::new(),
            view: ViewTransform::default(),
            settings: CanvasSettings::default(),
            selection: Selection::default(),
            state: InteractionState::Idle,
            cut_mode: CutMode::None,
            guides: Vec::new(),
            shake: ShakeDetector::new(),
            clipboard: ClipboardManager::new(),
            deferred: DeferredQueue::new(),
            last_press: None,
            pointer_world: Point::default(),
        }
    }

    // ─── Read accessors for the host/renderer ────────────────────────────

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    pub fn cut_mode(&self) -> CutMode {
        self.cut_mode
    }

    /// The temporary path shown while an edge is being drawn. The end is
    /// `Auto`-oriented so the arrowhead follows the pointer.
    pub fn edge_preview(&self) -> Option<EdgePath> {
        let InteractionState::DrawingEdge {
            from,
            handle,
            current,
        } = &self.state
        else {
            return None;
        };
        let node = self.model.node(*from)?;
        let start = handle_position(
            self.view.node_world_rect(node),
            *handle,
            &self.settings.handle_offsets,
        );
        Some(two_point_curve(
            start,
            *handle,
            *current,
            EndOrient::Auto,
            self.settings.max_curve_padding,
        ))
    }

    /// The straight cut line, while a cut or routing-cut is in flight.
    pub fn cut_line(&self) -> Option<(Point, Point)> {
        match self.state {
            InteractionState::CuttingEdge { start, current }
            | InteractionState::RoutingCut { start, current } => Some((start, current)),
            _ => None,
        }
    }

    /// The marquee rectangle, while one is active.
    pub fn marquee(&self) -> Option<Rect> {
        match self.state {
            InteractionState::Selecting { start, current } => {
                Some(Rect::from_corners(start, current))
            }
            _ => None,
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Drive time-based behavior. The host calls this from its frame or
    /// timer loop; stale deferred commands drop out silently.
    pub fn tick(&mut self, now_ms: f64) {
        for command in self.deferred.due(now_ms) {
            match command {
                Deferred::BeginMarquee { start } => {
                    if matches!(self.state, InteractionState::SelectPending { .. }) {
                        log::trace!("marquee debounce elapsed, selecting");
                        self.state = InteractionState::Selecting {
                            start,
                            current: start,
                        };
                    }
                }
            }
        }
    }

    /// Full reset: cancel the gesture, clear the selection, and invalidate
    /// every deferred command (teardown guard).
    pub fn reset(&mut self) {
        self.cancel_gesture();
        self.cut_mode = CutMode::None;
        self.deferred.bump_epoch();
        if !self.selection.is_empty() {
            self.selection = Selection::default();
            self.emit_selection();
        }
    }

    /// Abort the in-flight gesture. Temporary artifacts disappear and any
    /// half-applied geometry is restored; the graph is otherwise untouched.
    pub fn cancel_gesture(&mut self) {
        let state = std::mem::replace(&mut self.state, InteractionState::Idle);
        match state {
            InteractionState::Dragging { originals, .. } => {
                for (id, origin) in originals {
                    let _ = self.model.move_node(id, origin.x, origin.y);
                }
            }
            InteractionState::Resizing {
                node, start_rect, ..
            } => {
                let _ = self.model.move_node(node, start_rect.x, start_rect.y);
                let _ = self
                    .model
                    .resize_node(node, start_rect.width, start_rect.height);
            }
            InteractionState::RoutingPointEdit {
                edge,
                index,
                origin,
            } => {
                let _ = self.model.move_routing_point(edge, index, origin);
            }
            // Drawing/cut/marquee/pan states carry no model mutation.
            _ => {}
        }
        self.guides.clear();
        self.deferred.next_gesture();
    }

    /// Mutate a setting and publish `setting:update`.
    pub fn update_settings(&mut self, key: &'static str, apply: impl FnOnce(&mut CanvasSettings)) {
        apply(&mut self.settings);
        self.model.emit(GraphEvent::SettingUpdated { key });
    }

    // ─── Event entry point ───────────────────────────────────────────────

    pub fn handle_event(&mut self, event: &InputEvent, now_ms: f64) {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => self.pointer_down(Point::new(*x, *y), *button, *modifiers, now_ms),
            InputEvent::PointerMove { x, y, .. } => {
                self.pointer_move(Point::new(*x, *y), now_ms);
            }
            InputEvent::PointerUp { x, y, .. } => {
                self.pointer_up(Point::new(*x, *y));
            }
            InputEvent::Scroll { x, y, dx, dy, zoom } => {
                let cursor = Point::new(*x, *y);
                if (*zoom - 1.0).abs() > f32::EPSILON {
                    let scale = self.view.scale * zoom;
                    self.view.zoom_at(cursor, scale);
                } else {
                    self.view.pan_by(-dx, -dy);
                }
            }
            InputEvent::Key { key, modifiers } => self.key(key, *modifiers, now_ms),
            InputEvent::Cancel => self.cancel_gesture(),
        }
    }

    // ─── Pointer down ────────────────────────────────────────────────────

    fn pointer_down(&mut self, screen: Point, button: PointerButton, mods: Modifiers, now: f64) {
        // A new press supersedes whatever gesture was in flight.
        if !matches!(self.state, InteractionState::Idle) {
            self.cancel_gesture();
        }
        self.deferred.next_gesture();

        let world = self.view.screen_to_world(screen);
        self.pointer_world = world;

        if button == PointerButton::Middle {
            self.state = InteractionState::Panning {
                last_screen: screen,
            };
            return;
        }

        // Secondary is reserved for the host's context menu over content;
        // it only pans when the press lands on empty canvas.
        if button == PointerButton::Secondary {
            if node_at_point(&self.model, &self.view, world).is_none()
                && edge_at_point(&self.model, &self.view, &self.settings, world).is_none()
            {
                self.state = InteractionState::Panning {
                    last_screen: screen,
                };
            }
            return;
        }

        match self.cut_mode {
            CutMode::Cut => {
                self.state = InteractionState::CuttingEdge {
                    start: world,
                    current: world,
                };
                return;
            }
            CutMode::Route => {
                self.state = InteractionState::RoutingCut {
                    start: world,
                    current: world,
                };
                return;
            }
            CutMode::None => {}
        }

        if let Some((edge, index)) = routing_point_at(&self.model, &self.settings, world) {
            let origin = self
                .model
                .edge(edge)
                .and_then(|e| e.routing_points.get(index).copied())
                .unwrap_or(world);
            self.state = InteractionState::RoutingPointEdit {
                edge,
                index,
                origin,
            };
            return;
        }

        if let Some((node, handle)) = handle_at_point(&self.model, &self.view, &self.settings, world)
        {
            log::trace!("drawing edge from {node} {handle:?}");
            self.state = InteractionState::DrawingEdge {
                from: node,
                handle,
                current: world,
            };
            return;
        }

        if let Some((node, edge)) = resize_edge_at(&self.model, &self.view, &self.settings, world)
        {
            if let Some(n) = self.model.node(node) {
                self.state = InteractionState::Resizing {
                    node,
                    edge,
                    start_rect: n.rect(),
                    start_pointer: world,
                };
            }
            return;
        }

        // Alt-click on an edge inserts a routing point and starts editing it.
        if mods.alt
            && let Some(edge_id) = edge_at_point(&self.model, &self.view, &self.settings, world)
            && let Some(edge) = self.model.edge(edge_id)
            && let Some(index) =
                routing_insert_index(&self.model, &self.view, &self.settings, edge, world)
            && self.model.insert_routing_point(edge_id, index, world).is_ok()
        {
            self.state = InteractionState::RoutingPointEdit {
                edge: edge_id,
                index,
                origin: world,
            };
            return;
        }

        if let Some(node) = node_at_point(&self.model, &self.view, world) {
            self.start_drag(node, mods, world, now);
            return;
        }

        if let Some(edge) = edge_at_point(&self.model, &self.view, &self.settings, world) {
            self.select_edge(edge, mods);
            return;
        }

        // Empty canvas.
        if let Some((t, p)) = self.last_press
            && now - t <= DOUBLE_PRESS_MS
            && p.distance_to(screen) <= DOUBLE_PRESS_RADIUS
        {
            self.last_press = None;
            self.create_node_at(world);
            return;
        }
        self.last_press = Some((now, screen));
        self.state = InteractionState::SelectPending { start: world };
        self.deferred.schedule(
            now + self.settings.select_debounce_ms,
            Deferred::BeginMarquee { start: world },
        );
    }

    fn start_drag(&mut self, node: NodeId, mods: Modifiers, world: Point, now: f64) {
        // The move set: the whole selection when the clicked node belongs
        // to it, else just the node (replacing or extending the selection).
        let roots: Vec<NodeId> = if self.selection.nodes.contains(&node) {
            self.selection.nodes.clone()
        } else {
            if mods.shift {
                self.selection.nodes.push(node);
            } else {
                self.selection.nodes = vec![node];
                self.selection.edges.clear();
            }
            self.emit_selection();
            vec![node]
        };

        let mut move_set: Vec<NodeId> = Vec::new();
        for id in &roots {
            if !move_set.contains(id) {
                move_set.push(*id);
            }
            for d in self.model.descendants(*id) {
                if !move_set.contains(&d) {
                    move_set.push(d);
                }
            }
        }
        let originals: Vec<(NodeId, Point)> = move_set
            .iter()
            .filter_map(|id| self.model.node(*id).map(|n| (*id, Point::new(n.x, n.y))))
            .collect();

        self.model.bring_to_front(&roots);
        self.shake.begin(now, world);
        log::trace!("drag start on {node}, {} nodes in set", originals.len());
        self.state = InteractionState::Dragging {
            primary: node,
            originals,
            pointer_start: world,
            moved: false,
        };
    }

    fn select_edge(&mut self, edge: EdgeId, mods: Modifiers) {
        if mods.shift {
            if !self.selection.edges.contains(&edge) {
                self.selection.edges.push(edge);
            }
        } else {
            self.selection.nodes.clear();
            self.selection.edges = vec![edge];
        }
        self.model.emit(GraphEvent::EdgeSelected { id: edge });
        self.emit_selection();
    }

    fn create_node_at(&mut self, world: Point) {
        let id = self.model.create_card(
            world.x - DEFAULT_NODE_WIDTH / 2.0,
            world.y - DEFAULT_NODE_HEIGHT / 2.0,
            DEFAULT_NODE_WIDTH,
            DEFAULT_NODE_HEIGHT,
        );
        self.selection.nodes = vec![id];
        self.selection.edges.clear();
        self.emit_selection();
    }

    // ─── Pointer move ────────────────────────────────────────────────────

    fn pointer_move(&mut self, screen: Point, now: f64) {
        let world = self.view.screen_to_world(screen);
        self.pointer_world = world;

        match &mut self.state {
            InteractionState::Panning { last_screen } => {
                let (dx, dy) = (screen.x - last_screen.x, screen.y - last_screen.y);
                *last_screen = screen;
                self.view.pan_by(dx, dy);
            }
            InteractionState::Dragging { .. } => self.drag_move(world, now),
            InteractionState::Resizing { .. } => self.resize_move(world),
            InteractionState::DrawingEdge { current, .. }
            | InteractionState::Selecting { current, .. }
            | InteractionState::CuttingEdge { current, .. }
            | InteractionState::RoutingCut { current, .. } => {
                *current = world;
            }
            InteractionState::RoutingPointEdit { edge, index, .. } => {
                let (edge, index) = (*edge, *index);
                // Stale ids degrade to a no-op.
                let _ = self.model.move_routing_point(edge, index, world);
            }
            InteractionState::SelectPending { .. } | InteractionState::Idle => {}
        }
    }

    fn drag_move(&mut self, world: Point, now: f64) {
        let (primary, pointer_start, originals) = match &mut self.state {
            InteractionState::Dragging {
                primary,
                pointer_start,
                originals,
                moved,
            } => {
                *moved = true;
                (*primary, *pointer_start, originals.clone())
            }
            _ => return,
        };
        let Some(primary_origin) = originals
            .iter()
            .find(|(id, _)| *id == primary)
            .map(|(_, p)| *p)
        else {
            return;
        };
        let Some(primary_node) = self.model.node(primary) else {
            return;
        };
        let (pw, ph, pinned) = (primary_node.width, primary_node.height, primary_node.pinned);

        let delta = Point::new(world.x - pointer_start.x, world.y - pointer_start.y);
        let mut target = Point::new(primary_origin.x + delta.x, primary_origin.y + delta.y);
        let mut guides = Vec::new();

        // Pinned nodes live in screen space and skip world-space snapping.
        if !pinned {
            if self.settings.grid_size > 0.0 {
                target = grid_snap_point(target, self.settings.grid_size);
            }
            let moving = Rect::new(target.x, target.y, pw, ph);
            let others: Vec<(NodeId, Rect)> = self
                .model
                .nodes()
                .filter(|n| !originals.iter().any(|(id, _)| *id == n.id))
                .map(|n| (n.id, self.view.node_world_rect(n)))
                .collect();
            let snap = snap_position(&moving, &others, self.settings.snap_threshold);
            if let Some(x) = snap.x {
                target.x = x;
            }
            if let Some(y) = snap.y {
                target.y = y;
            }
            guides = snap.guides;
        }

        let adjusted = Point::new(target.x - primary_origin.x, target.y - primary_origin.y);
        for (id, origin) in &originals {
            let Some(node) = self.model.node(*id) else {
                continue;
            };
            let d = if node.pinned {
                // Screen-space delta for pinned members of the move set.
                Point::new(adjusted.x * self.view.scale, adjusted.y * self.view.scale)
            } else {
                adjusted
            };
            let _ = self.model.move_node(*id, origin.x + d.x, origin.y + d.y);
        }
        self.guides = guides;

        if self.shake.sample(now, world, self.settings.shake_sample_ms)
            && self.shake.should_trigger(self.settings.shake_sensitivity)
        {
            let removed = self.model.disconnect_node(primary);
            log::debug!("shake disconnect on {primary}: {removed} edges");
        }
    }

    fn resize_move(&mut self, world: Point) {
        let InteractionState::Resizing {
            node,
            edge,
            start_rect,
            start_pointer,
        } = self.state
        else {
            return;
        };
        let Some(n) = self.model.node(node) else {
            return;
        };
        let pinned = n.pinned;
        let delta = if pinned {
            Point::new(
                (world.x - start_pointer.x) * self.view.scale,
                (world.y - start_pointer.y) * self.view.scale,
            )
        } else {
            Point::new(world.x - start_pointer.x, world.y - start_pointer.y)
        };
        let mut rect = edge.apply(start_rect, delta.x, delta.y);
        let mut guides = Vec::new();

        if !pinned {
            let others: Vec<(NodeId, Rect)> = self
                .model
                .nodes()
                .filter(|other| other.id != node)
                .map(|other| (other.id, self.view.node_world_rect(other)))
                .collect();
            let snap = snap_resize(&rect, &others, self.settings.snap_threshold);
            if edge.moves_right()
                && let Some(w) = snap.width
            {
                rect.width = w;
            }
            if edge.moves_bottom()
                && let Some(h) = snap.height
            {
                rect.height = h;
            }
            guides = snap.guides;
        }

        let _ = self.model.move_node(node, rect.x, rect.y);
        let _ = self.model.resize_node(node, rect.width, rect.height);
        self.guides = guides;
    }

    // ─── Pointer up ──────────────────────────────────────────────────────

    fn pointer_up(&mut self, screen: Point) {
        let world = self.view.screen_to_world(screen);
        self.pointer_world = world;
        let state = std::mem::replace(&mut self.state, InteractionState::Idle);

        match state {
            InteractionState::RoutingCut { start, .. } => {
                self.finish_routing_cut(start, world);
            }
            InteractionState::DrawingEdge { from, handle, .. } => {
                self.finish_edge_draw(from, handle, world);
            }
            InteractionState::CuttingEdge { start, .. } => {
                self.finish_cut(start, world);
            }
            InteractionState::Resizing { .. } => {
                // Geometry was committed per move tick.
                self.guides.clear();
            }
            InteractionState::Selecting { start, .. } => {
                let rect = Rect::from_corners(start, world);
                self.selection.nodes = nodes_in_rect(&self.model, &self.view, &rect);
                self.selection.edges =
                    edges_in_rect(&self.model, &self.view, &self.settings, &rect);
                self.emit_selection();
            }
            InteractionState::SelectPending { .. } => {
                // A plain click on empty canvas clears the selection.
                self.deferred.next_gesture();
                if !self.selection.is_empty() {
                    self.selection = Selection::default();
                    self.emit_selection();
                }
            }
            InteractionState::Dragging {
                primary,
                originals,
                moved,
                ..
            } => {
                if moved {
                    self.finish_drag(primary, &originals);
                }
                self.guides.clear();
            }
            InteractionState::RoutingPointEdit { .. }
            | InteractionState::Panning { .. }
            | InteractionState::Idle => {}
        }
    }

    fn finish_routing_cut(&mut self, start: Point, end: Point) {
        for id in self.model.edge_ids_ordered() {
            let Some(edge) = self.model.edge(id) else {
                continue;
            };
            let samples = edge_polyline(&self.model, &self.view, &self.settings, edge);
            if let Some(hit) = polyline_segment_intersection(&samples, start, end) {
                let via = self.model.insert_node(Node::new(
                    NodeKind::Routing,
                    hit.x - ROUTING_NODE_SIZE / 2.0,
                    hit.y - ROUTING_NODE_SIZE / 2.0,
                    ROUTING_NODE_SIZE,
                    ROUTING_NODE_SIZE,
                ));
                let _ = self.model.split_edge_with_node(id, via);
                log::debug!("routing cut spliced {via} into {id}");
                return;
            }
        }
    }

    fn finish_cut(&mut self, start: Point, end: Point) {
        for id in self.model.edge_ids_ordered() {
            let Some(edge) = self.model.edge(id) else {
                continue;
            };
            let samples = edge_polyline(&self.model, &self.view, &self.settings, edge);
            if polyline_segment_intersection(&samples, start, end).is_some() {
                let _ = self.model.delete_edge(id);
                log::debug!("cut deleted {id}");
                return;
            }
        }
    }

    fn finish_edge_draw(&mut self, from: NodeId, handle: HandleSide, world: Point) {
        if let Some(target) = node_at_point(&self.model, &self.view, world) {
            if target == from {
                return; // dropped back on the source: cancel
            }
            let Some(node) = self.model.node(target) else {
                return;
            };
            let rect = self.view.node_world_rect(node);
            let offsets = self.settings.handle_offsets;
            let side = HandleSide::ALL
                .into_iter()
                .min_by(|a, b| {
                    handle_position(rect, *a, &offsets)
                        .distance_to(world)
                        .total_cmp(&handle_position(rect, *b, &offsets).distance_to(world))
                })
                .unwrap_or(HandleSide::Left);
            let _ = self.model.create_edge(from, handle, target, side);
        } else {
            // The host may offer a create-and-connect flow from here.
            self.model.emit(GraphEvent::EdgeDroppedOnEmpty {
                from,
                handle,
                x: world.x,
                y: world.y,
            });
        }
    }

    fn finish_drag(&mut self, primary: NodeId, originals: &[(NodeId, Point)]) {
        let moved_ids: Vec<NodeId> = originals.iter().map(|(id, _)| *id).collect();

        // Recompute membership for the roots of the move set. Members of a
        // moved group travel with it and keep their parent.
        let roots: Vec<NodeId> = moved_ids
            .iter()
            .copied()
            .filter(|id| {
                self.model
                    .group_of(*id)
                    .is_none_or(|g| !moved_ids.contains(&g))
            })
            .collect();
        for root in roots {
            let Some(node) = self.model.node(root) else {
                continue;
            };
            let center = self.view.node_world_rect(node).center();
            let target = smallest_group_at(&self.model, &self.view, center, &moved_ids);
            if target != self.model.group_of(root) {
                let _ = self.model.reparent_node(root, target);
            }
        }

        // Dropping the primary onto an edge it does not touch splices it
        // between the endpoints. Groups never splice.
        let splices = self
            .model
            .node(primary)
            .is_some_and(|n| !n.kind.is_container());
        if splices {
            let Some(node) = self.model.node(primary) else {
                return;
            };
            let center = self.view.node_world_rect(node).center();
            for id in self.model.edge_ids_ordered() {
                let Some(edge) = self.model.edge(id) else {
                    continue;
                };
                if moved_ids.iter().any(|m| edge.touches(*m)) {
                    continue;
                }
                let samples = edge_polyline(&self.model, &self.view, &self.settings, edge);
                if polyline_distance(&samples, center) <= self.settings.edge_drop_tolerance {
                    let _ = self.model.split_edge_with_node(id, primary);
                    break;
                }
            }
        }
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    fn key(&mut self, key: &str, mods: Modifiers, _now: f64) {
        let command = mods.ctrl || mods.meta;
        match key {
            "Escape" => self.cancel_gesture(),
            "Delete" | "Backspace" => self.delete_selection(),
            "c" if command => {
                self.clipboard.copy(&mut self.model, &self.selection.nodes);
            }
            "x" if command => {
                self.clipboard.cut(&mut self.model, &self.selection.nodes);
                self.selection = Selection::default();
                self.emit_selection();
            }
            "v" if command => {
                let pasted = self.clipboard.paste(&mut self.model, self.pointer_world);
                if !pasted.is_empty() {
                    self.selection.nodes = pasted;
                    self.selection.edges.clear();
                    self.emit_selection();
                }
            }
            "g" if command => {
                if let Some(group) = self
                    .model
                    .group_nodes(&self.selection.nodes, self.settings.group_padding)
                {
                    self.selection.nodes = vec![group];
                    self.selection.edges.clear();
                    self.emit_selection();
                }
            }
            "a" if command => {
                self.selection.nodes = self.model.node_ids_ordered();
                self.selection.edges = self.model.edge_ids_ordered();
                self.emit_selection();
            }
            "x" => {
                self.cut_mode = if self.cut_mode == CutMode::Cut {
                    CutMode::None
                } else {
                    CutMode::Cut
                };
            }
            "r" => {
                self.cut_mode = if self.cut_mode == CutMode::Route {
                    CutMode::None
                } else {
                    CutMode::Route
                };
            }
            _ => {}
        }
    }

    fn delete_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let Selection { nodes, edges } = std::mem::take(&mut self.selection);
        for edge in edges {
            let _ = self.model.delete_edge(edge);
        }
        for node in nodes {
            let _ = self.model.delete_node(node);
        }
        self.emit_selection();
    }

    fn emit_selection(&mut self) {
        self.model.emit(GraphEvent::SelectionChanged {
            nodes: self.selection.nodes.clone(),
            edges: self.selection.edges.clone(),
        });
    }
}
