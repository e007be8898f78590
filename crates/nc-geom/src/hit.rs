//! Hit testing: world point → node / handle / resize zone / edge lookup.
//!
//! Everything here is a pure read of the model through the view transform,
//! so pinned (screen-space) nodes hit-test the same as world-space ones.

use crate::curve::{EndOrient, edge_path};
use crate::handle::handle_position;
use crate::intersect::{nearest_segment_index, polyline_distance};
use crate::sample::sample_path;
use nc_core::model::{Edge, HandleSide, Point, Rect};
use nc_core::settings::CanvasSettings;
use nc_core::{EdgeId, GraphModel, NodeId, ViewTransform};

/// Which border of a node a resize gesture grabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl ResizeEdge {
    pub fn moves_left(&self) -> bool {
        matches!(self, ResizeEdge::W | ResizeEdge::Nw | ResizeEdge::Sw)
    }

    pub fn moves_right(&self) -> bool {
        matches!(self, ResizeEdge::E | ResizeEdge::Ne | ResizeEdge::Se)
    }

    pub fn moves_top(&self) -> bool {
        matches!(self, ResizeEdge::N | ResizeEdge::Ne | ResizeEdge::Nw)
    }

    pub fn moves_bottom(&self) -> bool {
        matches!(self, ResizeEdge::S | ResizeEdge::Se | ResizeEdge::Sw)
    }

    /// Apply a pointer delta to the original rect for this edge.
    /// Dimensions never collapse below 1.0.
    pub fn apply(&self, start: Rect, dx: f32, dy: f32) -> Rect {
        let mut rect = start;
        if self.moves_right() {
            rect.width = (start.width + dx).max(1.0);
        }
        if self.moves_bottom() {
            rect.height = (start.height + dy).max(1.0);
        }
        if self.moves_left() {
            let width = (start.width - dx).max(1.0);
            rect.x = start.x + (start.width - width);
            rect.width = width;
        }
        if self.moves_top() {
            let height = (start.height - dy).max(1.0);
            rect.y = start.y + (start.height - height);
            rect.height = height;
        }
        rect
    }
}

/// Z-sorting key: groups render beneath regular nodes, higher counters on
/// top, id string as the final deterministic tiebreak.
fn z_key<'a>(model: &'a GraphModel, id: NodeId) -> (u8, u64, &'a str) {
    let Some(node) = model.node(id) else {
        return (0, 0, "");
    };
    let class = if node.kind.is_container() { 0 } else { 1 };
    (class, node.z, id.as_str())
}

/// The topmost node whose body contains the world point.
pub fn node_at_point(model: &GraphModel, view: &ViewTransform, p: Point) -> Option<NodeId> {
    model
        .nodes()
        .filter(|n| view.node_world_rect(n).contains(p))
        .map(|n| n.id)
        .max_by(|a, b| z_key(model, *a).cmp(&z_key(model, *b)))
}

/// The smallest-area, topmost group whose bounds contain the point,
/// skipping every id in `exclude`. Used to recompute membership after a
/// drag (the exclude set carries the moved nodes and their descendants).
pub fn smallest_group_at(
    model: &GraphModel,
    view: &ViewTransform,
    p: Point,
    exclude: &[NodeId],
) -> Option<NodeId> {
    model
        .nodes()
        .filter(|n| n.kind.is_container() && !exclude.contains(&n.id))
        .filter(|n| view.node_world_rect(n).contains(p))
        .min_by(|a, b| {
            let area = view
                .node_world_rect(a)
                .area()
                .total_cmp(&view.node_world_rect(b).area());
            // Smaller area first; equal areas prefer the topmost (higher z).
            area.then_with(|| b.z.cmp(&a.z))
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        })
        .map(|n| n.id)
}

/// The connection handle zone under the point, if any. Topmost node wins
/// when handle zones overlap.
pub fn handle_at_point(
    model: &GraphModel,
    view: &ViewTransform,
    settings: &CanvasSettings,
    p: Point,
) -> Option<(NodeId, HandleSide)> {
    let mut hits: Vec<(NodeId, HandleSide)> = Vec::new();
    for node in model.nodes() {
        if !node.kind.is_connectable() {
            continue;
        }
        let rect = view.node_world_rect(node);
        for side in HandleSide::ALL {
            let hp = handle_position(rect, side, &settings.handle_offsets);
            if hp.distance_to(p) <= settings.handle_hit_radius {
                hits.push((node.id, side));
            }
        }
    }
    hits.into_iter()
        .max_by(|a, b| z_key(model, a.0).cmp(&z_key(model, b.0)))
}

/// The resize zone under the point on the topmost node whose border band
/// contains it.
pub fn resize_edge_at(
    model: &GraphModel,
    view: &ViewTransform,
    settings: &CanvasSettings,
    p: Point,
) -> Option<(NodeId, ResizeEdge)> {
    let zone = settings.resize_zone;
    let mut hits: Vec<(NodeId, ResizeEdge)> = Vec::new();
    for node in model.nodes() {
        let rect = view.node_world_rect(node);
        let outer = Rect::new(
            rect.x - zone,
            rect.y - zone,
            rect.width + zone * 2.0,
            rect.height + zone * 2.0,
        );
        if !outer.contains(p) {
            continue;
        }
        let near_left = (p.x - rect.x).abs() <= zone;
        let near_right = (p.x - (rect.x + rect.width)).abs() <= zone;
        let near_top = (p.y - rect.y).abs() <= zone;
        let near_bottom = (p.y - (rect.y + rect.height)).abs() <= zone;

        let edge = match (near_left, near_right, near_top, near_bottom) {
            (true, _, true, _) => Some(ResizeEdge::Nw),
            (_, true, true, _) => Some(ResizeEdge::Ne),
            (true, _, _, true) => Some(ResizeEdge::Sw),
            (_, true, _, true) => Some(ResizeEdge::Se),
            (true, _, _, _) => Some(ResizeEdge::W),
            (_, true, _, _) => Some(ResizeEdge::E),
            (_, _, true, _) => Some(ResizeEdge::N),
            (_, _, _, true) => Some(ResizeEdge::S),
            _ => None,
        };
        if let Some(edge) = edge {
            hits.push((node.id, edge));
        }
    }
    hits.into_iter()
        .max_by(|a, b| z_key(model, a.0).cmp(&z_key(model, b.0)))
}

/// Build and sample the rendered path of an edge. Returns an empty
/// polyline when either endpoint is stale.
pub fn edge_polyline(
    model: &GraphModel,
    view: &ViewTransform,
    settings: &CanvasSettings,
    edge: &Edge,
) -> Vec<Point> {
    let (Some(from), Some(to)) = (model.node(edge.from_node), model.node(edge.to_node)) else {
        return Vec::new();
    };
    let start = handle_position(
        view.node_world_rect(from),
        edge.from_handle,
        &settings.handle_offsets,
    );
    let end = handle_position(
        view.node_world_rect(to),
        edge.to_handle,
        &settings.handle_offsets,
    );
    let path = edge_path(
        start,
        edge.from_handle,
        &edge.routing_points,
        end,
        EndOrient::Side(edge.to_handle),
        settings.max_curve_padding,
    );
    sample_path(&path, settings.sample_step)
}

/// The nearest edge within the click tolerance.
pub fn edge_at_point(
    model: &GraphModel,
    view: &ViewTransform,
    settings: &CanvasSettings,
    p: Point,
) -> Option<EdgeId> {
    let mut best: Option<(f32, EdgeId)> = None;
    for id in model.edge_ids_ordered() {
        let Some(edge) = model.edge(id) else { continue };
        let samples = edge_polyline(model, view, settings, edge);
        let d = polyline_distance(&samples, p);
        if d <= settings.edge_hit_tolerance && best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, id));
        }
    }
    best.map(|(_, id)| id)
}

/// The routing-point handle under the point, across all edges.
pub fn routing_point_at(
    model: &GraphModel,
    settings: &CanvasSettings,
    p: Point,
) -> Option<(EdgeId, usize)> {
    for id in model.edge_ids_ordered() {
        let Some(edge) = model.edge(id) else { continue };
        for (i, rp) in edge.routing_points.iter().enumerate() {
            if rp.distance_to(p) <= settings.routing_hit_radius {
                return Some((id, i));
            }
        }
    }
    None
}

/// Nodes overlapping a world-space marquee rectangle (AABB test).
pub fn nodes_in_rect(model: &GraphModel, view: &ViewTransform, rect: &Rect) -> Vec<NodeId> {
    let mut ids: Vec<NodeId> = model
        .nodes()
        .filter(|n| view.node_world_rect(n).intersects(rect))
        .map(|n| n.id)
        .collect();
    ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    ids
}

/// Edges whose sampled path enters the marquee rectangle.
pub fn edges_in_rect(
    model: &GraphModel,
    view: &ViewTransform,
    settings: &CanvasSettings,
    rect: &Rect,
) -> Vec<EdgeId> {
    model
        .edge_ids_ordered()
        .into_iter()
        .filter(|id| {
            model.edge(*id).is_some_and(|edge| {
                let samples = edge_polyline(model, view, settings, edge);
                crate::intersect::polyline_in_rect(&samples, rect)
            })
        })
        .collect()
}

/// Insertion index for a routing point nearest to a click on the edge's
/// control polyline `[start, routing…, end]`.
pub fn routing_insert_index(
    model: &GraphModel,
    view: &ViewTransform,
    settings: &CanvasSettings,
    edge: &Edge,
    p: Point,
) -> Option<usize> {
    let (Some(from), Some(to)) = (model.node(edge.from_node), model.node(edge.to_node)) else {
        return None;
    };
    let mut polyline = Vec::with_capacity(edge.routing_points.len() + 2);
    polyline.push(handle_position(
        view.node_world_rect(from),
        edge.from_handle,
        &settings.handle_offsets,
    ));
    polyline.extend_from_slice(&edge.routing_points);
    polyline.push(handle_position(
        view.node_world_rect(to),
        edge.to_handle,
        &settings.handle_offsets,
    ));
    nearest_segment_index(&polyline, p)
}
