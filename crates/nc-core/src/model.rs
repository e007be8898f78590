//! Graph data model for the canvas.
//!
//! Nodes, edges, and groups live in a flat arena keyed by interned ids.
//! Group containment is a forest: each group owns an ordered set of member
//! ids, and a derived child→parent index supports the ancestor walk that
//! makes containment cycles structurally impossible. All mutations go
//! through `GraphModel` operations, which validate before touching state
//! and push change events onto a drainable queue.

use crate::error::GraphError;
use crate::events::GraphEvent;
use crate::id::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Points & Rects ──────────────────────────────────────────────────────

/// A 2D point. World or screen space depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// AABB overlap test.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Normalize a drag rectangle from two corner points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Smallest rect enclosing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let r = (self.x + self.width).max(other.x + other.width);
        let b = (self.y + self.height).max(other.y + other.height);
        Rect::new(x, y, r - x, b - y)
    }
}

// ─── Color ───────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let r = byte(0)? as f32 / 255.0;
        let g = byte(2)? as f32 / 255.0;
        let b = byte(4)? as f32 / 255.0;
        let a = if hex.len() == 8 {
            byte(6)? as f32 / 255.0
        } else {
            1.0
        };
        Some(Self::rgba(r, g, b, a))
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let r = (self.r * 255.0).round() as u8;
        let g = (self.g * 255.0).round() as u8;
        let b = (self.b * 255.0).round() as u8;
        let a = (self.a * 255.0).round() as u8;
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

// ─── Handles & Connections ───────────────────────────────────────────────

/// One of the four connection points on a node where edges attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl HandleSide {
    pub const ALL: [HandleSide; 4] = [
        HandleSide::Top,
        HandleSide::Right,
        HandleSide::Bottom,
        HandleSide::Left,
    ];

    /// Unit vector pointing outward from the node edge.
    pub fn outward(&self) -> (f32, f32) {
        match self {
            HandleSide::Top => (0.0, -1.0),
            HandleSide::Right => (1.0, 0.0),
            HandleSide::Bottom => (0.0, 1.0),
            HandleSide::Left => (-1.0, 0.0),
        }
    }

    pub fn opposite(&self) -> HandleSide {
        match self {
            HandleSide::Top => HandleSide::Bottom,
            HandleSide::Right => HandleSide::Left,
            HandleSide::Bottom => HandleSide::Top,
            HandleSide::Left => HandleSide::Right,
        }
    }
}

/// Per-side ordered sets of attached edge ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Connections {
    pub top: SmallVec<[EdgeId; 2]>,
    pub right: SmallVec<[EdgeId; 2]>,
    pub bottom: SmallVec<[EdgeId; 2]>,
    pub left: SmallVec<[EdgeId; 2]>,
}

impl Connections {
    pub fn side(&self, side: HandleSide) -> &SmallVec<[EdgeId; 2]> {
        match side {
            HandleSide::Top => &self.top,
            HandleSide::Right => &self.right,
            HandleSide::Bottom => &self.bottom,
            HandleSide::Left => &self.left,
        }
    }

    fn side_mut(&mut self, side: HandleSide) -> &mut SmallVec<[EdgeId; 2]> {
        match side {
            HandleSide::Top => &mut self.top,
            HandleSide::Right => &mut self.right,
            HandleSide::Bottom => &mut self.bottom,
            HandleSide::Left => &mut self.left,
        }
    }

    /// Attach an edge id to a side (idempotent).
    pub fn attach(&mut self, side: HandleSide, edge: EdgeId) {
        let set = self.side_mut(side);
        if !set.contains(&edge) {
            set.push(edge);
        }
    }

    /// Detach an edge id from every side.
    pub fn detach(&mut self, edge: EdgeId) {
        for side in HandleSide::ALL {
            self.side_mut(side).retain(|e| *e != edge);
        }
    }

    /// All attached edge ids, top/right/bottom/left order.
    pub fn all(&self) -> impl Iterator<Item = EdgeId> + '_ {
        HandleSide::ALL
            .into_iter()
            .flat_map(|s| self.side(s).iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        HandleSide::ALL.iter().all(|s| self.side(*s).is_empty())
    }
}

// ─── Node kinds ──────────────────────────────────────────────────────────

/// Tagged node kind with a small capability table, consulted by generic
/// algorithms instead of downcasting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind {
    /// Content-bearing card. `renderer` names the `NodeContent`
    /// implementation (e.g. "markdown", "image"); the payload lives in
    /// `Node::content`.
    Card { renderer: String },

    /// Container that logically owns a set of member nodes.
    Group { members: Vec<NodeId> },

    /// Minimal, content-less node used purely to bend an edge.
    Routing,
}

impl NodeKind {
    pub fn card(renderer: &str) -> Self {
        NodeKind::Card {
            renderer: renderer.to_string(),
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Group { .. })
    }

    pub fn has_content(&self) -> bool {
        matches!(self, NodeKind::Card { .. })
    }

    /// Every kind currently exposes connection handles; routing nodes in
    /// particular exist only to be connected.
    pub fn is_connectable(&self) -> bool {
        true
    }

    fn id_prefix(&self) -> &'static str {
        match self {
            NodeKind::Card { .. } => "node",
            NodeKind::Group { .. } => "group",
            NodeKind::Routing => "route",
        }
    }
}

// ─── Node & Edge ─────────────────────────────────────────────────────────

/// A single node on the canvas. Owned exclusively by `GraphModel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,

    /// World-space position, or screen-space when `pinned`.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,

    pub title: String,
    /// Serialized content payload, interpreted by the node's renderer.
    pub content: Option<String>,
    pub color: Option<Color>,

    /// Pinned nodes live in screen space, unaffected by pan/zoom.
    pub pinned: bool,

    /// Edges attached to each handle side. Kept consistent with the
    /// edge arena by the model operations.
    pub connections: Connections,

    /// Z-order counter value. Groups and regular nodes draw from separate
    /// counters; groups always render beneath regular nodes.
    pub z: u64,
}

impl Node {
    /// Build a node with a fresh id. Not yet part of any model.
    pub fn new(kind: NodeKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        let id = NodeId::fresh(kind.id_prefix());
        Self {
            id,
            kind,
            x,
            y,
            width,
            height,
            title: String::new(),
            content: None,
            color: None,
            pinned: false,
            connections: Connections::default(),
            z: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }

    /// Member ids when this node is a group.
    pub fn members(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Group { members } => members,
            _ => &[],
        }
    }
}

/// A routable connection between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from_node: NodeId,
    pub from_handle: HandleSide,
    pub to_node: NodeId,
    pub to_handle: HandleSide,
    /// User-added bend points, in path order.
    pub routing_points: Vec<Point>,
    pub label: Option<String>,
}

impl Edge {
    pub fn touches(&self, node: NodeId) -> bool {
        self.from_node == node || self.to_node == node
    }

    /// The endpoint opposite `node`, if `node` is an endpoint.
    pub fn other_endpoint(&self, node: NodeId) -> Option<NodeId> {
        if self.from_node == node {
            Some(self.to_node)
        } else if self.to_node == node {
            Some(self.from_node)
        } else {
            None
        }
    }
}

// ─── Graph model ─────────────────────────────────────────────────────────

/// Flat-arena storage for the whole canvas graph plus the containment
/// forest, z-order counters, and the outbound event queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphModel {
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,

    /// Derived child → parent-group index, rebuilt from group membership
    /// after deserialization.
    #[serde(skip)]
    parent: HashMap<NodeId, NodeId>,

    group_z: u64,
    node_z: u64,

    #[serde(skip)]
    events: Vec<GraphEvent>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edge ids sorted by id string — the deterministic iteration order
    /// used by cut tests and similar "first match wins" scans.
    pub fn edge_ids_ordered(&self) -> Vec<EdgeId> {
        let mut ids: Vec<EdgeId> = self.edges.keys().copied().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }

    /// Node ids sorted by id string.
    pub fn node_ids_ordered(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }

    /// All edges touching a node, in id order.
    pub fn edges_touching(&self, node: NodeId) -> Vec<EdgeId> {
        let mut ids: Vec<EdgeId> = self
            .edges
            .values()
            .filter(|e| e.touches(node))
            .map(|e| e.id)
            .collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }

    /// The group directly containing `node`, if any.
    pub fn group_of(&self, node: NodeId) -> Option<NodeId> {
        self.parent.get(&node).copied()
    }

    /// Walk the parent chain: is `ancestor` above `node` in the forest?
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        if ancestor == node {
            return false;
        }
        let mut current = node;
        while let Some(parent) = self.parent.get(&current).copied() {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// All nodes transitively contained by `group` (depth-first).
    pub fn descendants(&self, group: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .node(group)
            .map(|n| n.members().to_vec())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(n) = self.node(id) {
                stack.extend(n.members().iter().copied());
            }
        }
        out
    }

    /// Bounding box of a set of nodes. `None` when the set is empty or all
    /// ids are stale (degenerate input short-circuits, per the error model).
    pub fn bounds_of(&self, ids: &[NodeId]) -> Option<Rect> {
        let mut rects = ids.iter().filter_map(|id| self.node(*id)).map(Node::rect);
        let first = rects.next()?;
        Some(rects.fold(first, |acc, r| acc.union(&r)))
    }

    // ── Events ───────────────────────────────────────────────────────────

    /// Push an event onto the outbound queue. The interaction layer also
    /// publishes through here so the host drains one stream.
    pub fn emit(&mut self, event: GraphEvent) {
        self.events.push(event);
    }

    /// Drain all pending change events.
    pub fn take_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Node operations ──────────────────────────────────────────────────

    /// Insert a node built with `Node::new`, assign its z value, and
    /// return its id.
    pub fn insert_node(&mut self, mut node: Node) -> NodeId {
        let id = node.id;
        node.z = if node.kind.is_container() {
            self.next_group_z()
        } else {
            self.next_node_z()
        };
        // A group arriving with members claims them in the parent index.
        let members = node.members().to_vec();
        self.nodes.insert(id, node);
        for m in members {
            self.parent.insert(m, id);
        }
        log::debug!("create node {id}");
        self.emit(GraphEvent::NodeCreated { id });
        id
    }

    /// Create a content card at a position. Convenience over `insert_node`.
    pub fn create_card(&mut self, x: f32, y: f32, width: f32, height: f32) -> NodeId {
        self.insert_node(Node::new(NodeKind::card("markdown"), x, y, width, height))
    }

    /// Delete a node, cascading to every edge that touches it and clearing
    /// containment references in both directions.
    pub fn delete_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::NotFound);
        }
        for edge_id in self.edges_touching(id) {
            // Endpoints are known to exist here.
            let _ = self.delete_edge(edge_id);
        }
        // Orphan members if this was a group (members survive).
        let Some(removed) = self.nodes.remove(&id) else {
            return Err(GraphError::NotFound);
        };
        for m in removed.members() {
            self.parent.remove(m);
        }
        // Detach from the containing group, if any.
        if let Some(group_id) = self.parent.remove(&id)
            && let Some(group) = self.nodes.get_mut(&group_id)
            && let NodeKind::Group { members } = &mut group.kind
        {
            members.retain(|m| *m != id);
        }
        log::debug!("delete node {id}");
        self.emit(GraphEvent::NodeDeleted { id });
        Ok(())
    }

    /// Move a node to an absolute position (space depends on `pinned`).
    pub fn move_node(&mut self, id: NodeId, x: f32, y: f32) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NotFound)?;
        node.x = x;
        node.y = y;
        self.emit(GraphEvent::NodeMoved { id, x, y });
        Ok(())
    }

    /// Move a node and everything it transitively contains by a delta.
    pub fn move_node_by(&mut self, id: NodeId, dx: f32, dy: f32) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::NotFound);
        }
        let mut ids = vec![id];
        ids.extend(self.descendants(id));
        for nid in ids {
            if let Some(node) = self.nodes.get_mut(&nid) {
                node.x += dx;
                node.y += dy;
                let (x, y) = (node.x, node.y);
                self.emit(GraphEvent::NodeMoved { id: nid, x, y });
            }
        }
        Ok(())
    }

    /// Resize a node. Dimensions are clamped to a small positive minimum so
    /// degenerate geometry can never produce NaN curve math downstream.
    pub fn resize_node(&mut self, id: NodeId, width: f32, height: f32) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NotFound)?;
        node.width = width.max(1.0);
        node.height = height.max(1.0);
        let (width, height) = (node.width, node.height);
        self.emit(GraphEvent::NodeResized { id, width, height });
        Ok(())
    }

    /// Update title/content/color/pinned in one call (used by property
    /// panels). Emits a single `NodeUpdated`.
    pub fn update_node(
        &mut self,
        id: NodeId,
        apply: impl FnOnce(&mut Node),
    ) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NotFound)?;
        apply(node);
        // Geometry and identity stay model-owned.
        self.emit(GraphEvent::NodeUpdated { id });
        Ok(())
    }

    // ── Containment ──────────────────────────────────────────────────────

    /// Move `node` into `new_group` (or out of any group when `None`).
    ///
    /// Rejects with `CycleDetected` — and changes nothing — when the target
    /// group is the node itself or one of its descendants.
    pub fn reparent_node(
        &mut self,
        node: NodeId,
        new_group: Option<NodeId>,
    ) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&node) {
            return Err(GraphError::NotFound);
        }
        if let Some(group) = new_group {
            let target = self.nodes.get(&group).ok_or(GraphError::NotFound)?;
            if !target.kind.is_container() {
                return Err(GraphError::NotFound);
            }
            if group == node || self.is_ancestor_of(node, group) {
                return Err(GraphError::CycleDetected);
            }
        }
        if self.group_of(node) == new_group {
            return Ok(());
        }

        // Validated — now mutate.
        if let Some(old) = self.parent.remove(&node)
            && let Some(old_group) = self.nodes.get_mut(&old)
            && let NodeKind::Group { members } = &mut old_group.kind
        {
            members.retain(|m| *m != node);
        }
        if let Some(group) = new_group {
            if let Some(target) = self.nodes.get_mut(&group)
                && let NodeKind::Group { members } = &mut target.kind
                && !members.contains(&node)
            {
                members.push(node);
            }
            self.parent.insert(node, group);
        }
        log::debug!("reparent {node} -> {new_group:?}");
        self.emit(GraphEvent::NodeUpdated { id: node });
        Ok(())
    }

    /// Create a group around a set of nodes, sized to their bounding box
    /// plus `padding` on every side. Degenerate input (empty or all-stale
    /// selection) is a no-op returning `None`.
    pub fn group_nodes(&mut self, ids: &[NodeId], padding: f32) -> Option<NodeId> {
        let live: Vec<NodeId> = ids
            .iter()
            .copied()
            .filter(|id| self.nodes.contains_key(id))
            .collect();
        let bounds = self.bounds_of(&live)?;
        let group = Node::new(
            NodeKind::Group {
                members: Vec::new(),
            },
            bounds.x - padding,
            bounds.y - padding,
            bounds.width + padding * 2.0,
            bounds.height + padding * 2.0,
        );
        let group_id = self.insert_node(group);
        for id in live {
            // Cycle-safe by construction: the group is brand new.
            let _ = self.reparent_node(id, Some(group_id));
        }
        Some(group_id)
    }

    // ── Edge operations ──────────────────────────────────────────────────

    /// Create an edge between two handles. Rejects self-loops and missing
    /// endpoints with `InvalidEdge`; on success both endpoints' connection
    /// sets are updated.
    pub fn create_edge(
        &mut self,
        from_node: NodeId,
        from_handle: HandleSide,
        to_node: NodeId,
        to_handle: HandleSide,
    ) -> Result<EdgeId, GraphError> {
        if from_node == to_node {
            return Err(GraphError::InvalidEdge);
        }
        if !self.nodes.contains_key(&from_node) || !self.nodes.contains_key(&to_node) {
            return Err(GraphError::InvalidEdge);
        }
        let id = EdgeId::fresh();
        self.edges.insert(
            id,
            Edge {
                id,
                from_node,
                from_handle,
                to_node,
                to_handle,
                routing_points: Vec::new(),
                label: None,
            },
        );
        self.attach_edge(id);
        log::debug!("create edge {id}: {from_node} -> {to_node}");
        self.emit(GraphEvent::EdgeCreated { id });
        Ok(id)
    }

    fn attach_edge(&mut self, id: EdgeId) {
        let Some(edge) = self.edges.get(&id) else {
            return;
        };
        let (from, fh, to, th) = (edge.from_node, edge.from_handle, edge.to_node, edge.to_handle);
        if let Some(node) = self.nodes.get_mut(&from) {
            node.connections.attach(fh, id);
        }
        if let Some(node) = self.nodes.get_mut(&to) {
            node.connections.attach(th, id);
        }
    }

    /// Delete an edge, detaching it from both endpoints' connection sets.
    pub fn delete_edge(&mut self, id: EdgeId) -> Result<Edge, GraphError> {
        let edge = self.edges.remove(&id).ok_or(GraphError::NotFound)?;
        for endpoint in [edge.from_node, edge.to_node] {
            if let Some(node) = self.nodes.get_mut(&endpoint) {
                node.connections.detach(id);
            }
        }
        log::debug!("delete edge {id}");
        self.emit(GraphEvent::EdgeDeleted { id });
        Ok(edge)
    }

    /// Delete every edge touching a node (shake-to-disconnect). Returns the
    /// number of edges removed.
    pub fn disconnect_node(&mut self, id: NodeId) -> usize {
        let touching = self.edges_touching(id);
        let count = touching.len();
        for edge_id in touching {
            let _ = self.delete_edge(edge_id);
        }
        count
    }

    /// Replace `edge` with two edges routed through `via`, preserving the
    /// original handles on the outer endpoints. Used when a node is dropped
    /// onto an edge and when a routing cut inserts a routing node.
    pub fn split_edge_with_node(
        &mut self,
        edge_id: EdgeId,
        via: NodeId,
    ) -> Result<(EdgeId, EdgeId), GraphError> {
        let edge = self.edges.get(&edge_id).ok_or(GraphError::NotFound)?;
        if !self.nodes.contains_key(&via) || edge.touches(via) {
            return Err(GraphError::InvalidEdge);
        }
        let (from, fh, to, th, label) = (
            edge.from_node,
            edge.from_handle,
            edge.to_node,
            edge.to_handle,
            edge.label.clone(),
        );
        self.delete_edge(edge_id)?;
        // Incoming enters the left handle, outgoing leaves the right — the
        // default flow orientation for spliced nodes.
        let first = self.create_edge(from, fh, via, HandleSide::Left)?;
        let second = self.create_edge(via, HandleSide::Right, to, th)?;
        if let Some(label) = label
            && let Some(e) = self.edges.get_mut(&first)
        {
            e.label = Some(label);
        }
        Ok((first, second))
    }

    // ── Routing points ───────────────────────────────────────────────────

    pub fn insert_routing_point(
        &mut self,
        edge_id: EdgeId,
        index: usize,
        p: Point,
    ) -> Result<(), GraphError> {
        let edge = self.edges.get_mut(&edge_id).ok_or(GraphError::NotFound)?;
        if index > edge.routing_points.len() {
            return Err(GraphError::NotFound);
        }
        edge.routing_points.insert(index, p);
        self.emit(GraphEvent::EdgeUpdated { id: edge_id });
        Ok(())
    }

    pub fn move_routing_point(
        &mut self,
        edge_id: EdgeId,
        index: usize,
        p: Point,
    ) -> Result<(), GraphError> {
        let edge = self.edges.get_mut(&edge_id).ok_or(GraphError::NotFound)?;
        let point = edge
            .routing_points
            .get_mut(index)
            .ok_or(GraphError::NotFound)?;
        *point = p;
        self.emit(GraphEvent::EdgeUpdated { id: edge_id });
        Ok(())
    }

    pub fn remove_routing_point(&mut self, edge_id: EdgeId, index: usize) -> Result<(), GraphError> {
        let edge = self.edges.get_mut(&edge_id).ok_or(GraphError::NotFound)?;
        if index >= edge.routing_points.len() {
            return Err(GraphError::NotFound);
        }
        edge.routing_points.remove(index);
        self.emit(GraphEvent::EdgeUpdated { id: edge_id });
        Ok(())
    }

    /// Set an edge label (property panel path).
    pub fn set_edge_label(&mut self, edge_id: EdgeId, label: Option<String>) -> Result<(), GraphError> {
        let edge = self.edges.get_mut(&edge_id).ok_or(GraphError::NotFound)?;
        edge.label = label;
        self.emit(GraphEvent::EdgeUpdated { id: edge_id });
        Ok(())
    }

    // ── Z-order ──────────────────────────────────────────────────────────

    fn next_group_z(&mut self) -> u64 {
        self.group_z += 1;
        self.group_z
    }

    fn next_node_z(&mut self) -> u64 {
        self.node_z += 1;
        self.node_z
    }

    /// Bring a set of nodes to the front. Groups and regular nodes draw
    /// fresh values from their own counters; when groups are involved,
    /// ancestors receive lower values than descendants so nesting stays
    /// visually consistent.
    pub fn bring_to_front(&mut self, ids: &[NodeId]) {
        // Expand to include ancestor groups of everything in the set.
        let mut involved: Vec<NodeId> = Vec::new();
        for &id in ids {
            let mut chain = Vec::new();
            let mut current = id;
            while let Some(parent) = self.parent.get(&current).copied() {
                chain.push(parent);
                current = parent;
            }
            // Outermost ancestor first.
            for anc in chain.into_iter().rev() {
                if !involved.contains(&anc) {
                    involved.push(anc);
                }
            }
            if !involved.contains(&id) {
                involved.push(id);
            }
        }

        // Groups in ancestor→descendant order (containment depth).
        let mut groups: Vec<NodeId> = involved
            .iter()
            .copied()
            .filter(|id| self.node(*id).is_some_and(|n| n.kind.is_container()))
            .collect();
        groups.sort_by_key(|id| self.depth_of(*id));
        for gid in groups {
            let z = self.next_group_z();
            if let Some(node) = self.nodes.get_mut(&gid) {
                node.z = z;
            }
        }

        for id in involved {
            if self.node(id).is_some_and(|n| !n.kind.is_container()) {
                let z = self.next_node_z();
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.z = z;
                }
            }
        }
    }

    fn depth_of(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent.get(&current).copied() {
            depth += 1;
            current = parent;
        }
        depth
    }

    // ── Index maintenance ────────────────────────────────────────────────

    /// Rebuild the child→parent index from group membership (needed after
    /// deserialization).
    pub fn rebuild_index(&mut self) {
        self.parent.clear();
        let pairs: Vec<(NodeId, NodeId)> = self
            .nodes
            .values()
            .flat_map(|n| n.members().iter().map(move |m| (*m, n.id)))
            .collect();
        for (child, group) in pairs {
            self.parent.insert(child, group);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(model: &mut GraphModel, x: f32, y: f32) -> NodeId {
        model.create_card(x, y, 100.0, 60.0)
    }

    #[test]
    fn create_edge_rejects_self_loop_and_missing_endpoints() {
        let mut model = GraphModel::new();
        let a = card(&mut model, 0.0, 0.0);
        assert_eq!(
            model.create_edge(a, HandleSide::Right, a, HandleSide::Left),
            Err(GraphError::InvalidEdge)
        );
        let ghost = NodeId::intern("ghost");
        assert_eq!(
            model.create_edge(a, HandleSide::Right, ghost, HandleSide::Left),
            Err(GraphError::InvalidEdge)
        );
        assert_eq!(model.edge_count(), 0);
    }

    #[test]
    fn edge_ids_live_in_both_endpoint_connection_sets() {
        let mut model = GraphModel::new();
        let a = card(&mut model, 0.0, 0.0);
        let b = card(&mut model, 300.0, 0.0);
        let e = model
            .create_edge(a, HandleSide::Right, b, HandleSide::Left)
            .unwrap();

        assert!(model.node(a).unwrap().connections.right.contains(&e));
        assert!(model.node(b).unwrap().connections.left.contains(&e));
    }

    #[test]
    fn delete_node_cascades_to_touching_edges() {
        let mut model = GraphModel::new();
        let a = card(&mut model, 0.0, 0.0);
        let b = card(&mut model, 300.0, 0.0);
        let c = card(&mut model, 600.0, 0.0);
        model
            .create_edge(a, HandleSide::Right, b, HandleSide::Left)
            .unwrap();
        model
            .create_edge(b, HandleSide::Right, c, HandleSide::Left)
            .unwrap();
        let surviving = model
            .create_edge(a, HandleSide::Bottom, c, HandleSide::Top)
            .unwrap();

        model.delete_node(b).unwrap();

        assert_eq!(model.edge_count(), 1);
        assert!(model.edge(surviving).is_some());
        // The other endpoints no longer reference the cascaded edges.
        assert_eq!(model.node(a).unwrap().connections.right.len(), 0);
        assert_eq!(model.node(c).unwrap().connections.left.len(), 0);
    }

    #[test]
    fn reparent_rejects_cycles_without_state_change() {
        let mut model = GraphModel::new();
        let inner = card(&mut model, 10.0, 10.0);
        let outer_group = model.group_nodes(&[inner], 40.0).unwrap();
        let nested_group = model.group_nodes(&[outer_group], 40.0).unwrap();

        let before: Vec<NodeId> = model.node(outer_group).unwrap().members().to_vec();
        // outer_group is a descendant of nested_group... moving nested_group
        // inside outer_group would close a cycle.
        assert_eq!(
            model.reparent_node(nested_group, Some(outer_group)),
            Err(GraphError::CycleDetected)
        );
        assert_eq!(model.node(outer_group).unwrap().members(), &before[..]);
        assert_eq!(model.group_of(nested_group), None);

        // Self-containment is also a cycle.
        assert_eq!(
            model.reparent_node(outer_group, Some(outer_group)),
            Err(GraphError::CycleDetected)
        );
    }

    #[test]
    fn group_nodes_pads_bounding_box() {
        let mut model = GraphModel::new();
        let a = card(&mut model, 100.0, 50.0); // 100x60
        let b = card(&mut model, 400.0, 200.0);
        let group = model.group_nodes(&[a, b], 40.0).unwrap();

        let g = model.node(group).unwrap();
        assert_eq!(g.x, 60.0);
        assert_eq!(g.y, 10.0);
        assert_eq!(g.width, (500.0 - 100.0) + 80.0);
        assert_eq!(g.height, (260.0 - 50.0) + 80.0);
        let mut members = g.members().to_vec();
        members.sort_by(|x, y| x.as_str().cmp(y.as_str()));
        let mut expected = vec![a, b];
        expected.sort_by(|x, y| x.as_str().cmp(y.as_str()));
        assert_eq!(members, expected);
    }

    #[test]
    fn group_nodes_empty_selection_is_noop() {
        let mut model = GraphModel::new();
        assert_eq!(model.group_nodes(&[], 40.0), None);
        assert_eq!(model.node_count(), 0);
    }

    #[test]
    fn move_group_carries_recursive_members() {
        let mut model = GraphModel::new();
        let a = card(&mut model, 0.0, 0.0);
        let inner = model.group_nodes(&[a], 40.0).unwrap();
        let outer = model.group_nodes(&[inner], 40.0).unwrap();

        model.move_node_by(outer, 10.0, 20.0).unwrap();
        assert_eq!(model.node(a).unwrap().x, 10.0);
        assert_eq!(model.node(a).unwrap().y, 20.0);
        assert_eq!(model.node(inner).unwrap().x, -40.0 + 10.0);
    }

    #[test]
    fn split_edge_with_node_replaces_original() {
        let mut model = GraphModel::new();
        let a = card(&mut model, 0.0, 0.0);
        let b = card(&mut model, 600.0, 0.0);
        let mid = card(&mut model, 300.0, 0.0);
        let e = model
            .create_edge(a, HandleSide::Right, b, HandleSide::Left)
            .unwrap();

        let (first, second) = model.split_edge_with_node(e, mid).unwrap();
        assert!(model.edge(e).is_none());
        assert_eq!(model.edge(first).unwrap().from_node, a);
        assert_eq!(model.edge(first).unwrap().to_node, mid);
        assert_eq!(model.edge(second).unwrap().from_node, mid);
        assert_eq!(model.edge(second).unwrap().to_node, b);
        assert_eq!(model.edge_count(), 2);
    }

    #[test]
    fn bring_to_front_orders_ancestors_below_descendants() {
        let mut model = GraphModel::new();
        let a = card(&mut model, 0.0, 0.0);
        let inner = model.group_nodes(&[a], 40.0).unwrap();
        let outer = model.group_nodes(&[inner], 40.0).unwrap();
        let distraction = card(&mut model, 900.0, 900.0);
        model.bring_to_front(&[distraction]);

        model.bring_to_front(&[a]);
        let outer_z = model.node(outer).unwrap().z;
        let inner_z = model.node(inner).unwrap().z;
        let a_z = model.node(a).unwrap().z;
        assert!(outer_z < inner_z, "ancestor group below descendant group");
        assert!(a_z > model.node(distraction).unwrap().z);
    }

    #[test]
    fn disconnect_node_removes_every_touching_edge() {
        let mut model = GraphModel::new();
        let a = card(&mut model, 0.0, 0.0);
        let b = card(&mut model, 300.0, 0.0);
        let c = card(&mut model, 0.0, 300.0);
        model
            .create_edge(a, HandleSide::Right, b, HandleSide::Left)
            .unwrap();
        model
            .create_edge(c, HandleSide::Top, a, HandleSide::Bottom)
            .unwrap();

        assert_eq!(model.disconnect_node(a), 2);
        assert_eq!(model.edge_count(), 0);
        assert!(model.node(b).unwrap().connections.is_empty());
        assert!(model.node(c).unwrap().connections.is_empty());
    }

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#6C5CE7").unwrap();
        assert_eq!(c.to_hex(), "#6C5CE7");
        let translucent = Color::from_hex("FF000080").unwrap();
        assert!((translucent.a - 128.0 / 255.0).abs() < 0.01);
        assert_eq!(translucent.to_hex().len(), 9);
        assert_eq!(Color::from_hex("#xyz"), None);
    }

    #[test]
    fn routing_point_edit() {
        let mut model = GraphModel::new();
        let a = card(&mut model, 0.0, 0.0);
        let b = card(&mut model, 300.0, 0.0);
        let e = model
            .create_edge(a, HandleSide::Right, b, HandleSide::Left)
            .unwrap();

        model
            .insert_routing_point(e, 0, Point::new(150.0, 80.0))
            .unwrap();
        model
            .move_routing_point(e, 0, Point::new(150.0, -80.0))
            .unwrap();
        assert_eq!(model.edge(e).unwrap().routing_points[0].y, -80.0);
        assert_eq!(
            model.move_routing_point(e, 5, Point::new(0.0, 0.0)),
            Err(GraphError::NotFound)
        );
        model.remove_routing_point(e, 0).unwrap();
        assert!(model.edge(e).unwrap().routing_points.is_empty());
    }
}
