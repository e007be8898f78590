//! Copy / cut / paste with id remapping.
//!
//! Copy snapshots the selected nodes plus every edge touching the
//! selection, intentionally including "dangling" connections to nodes
//! that were not copied. Paste mints fresh ids, translates the set so its
//! centroid lands at the pointer, and recreates an edge only when at
//! least one endpoint was copied.

use nc_core::GraphEvent;
use nc_core::id::{EdgeId, NodeId};
use nc_core::model::{Edge, GraphModel, Node, NodeKind, Point};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ClipboardManager {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl ClipboardManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Snapshot the selection. Edges are captured when they touch any
    /// selected node, not only when both endpoints are selected.
    pub fn copy(&mut self, model: &mut GraphModel, selection: &[NodeId]) {
        self.nodes = selection
            .iter()
            .filter_map(|id| model.node(*id))
            .cloned()
            .collect();

        let mut edge_ids: Vec<EdgeId> = Vec::new();
        for node in &self.nodes {
            for edge_id in model.edges_touching(node.id) {
                if !edge_ids.contains(&edge_id) {
                    edge_ids.push(edge_id);
                }
            }
        }
        self.edges = edge_ids
            .iter()
            .filter_map(|id| model.edge(*id))
            .cloned()
            .collect();

        let nodes = self.nodes.len();
        log::debug!("clipboard: copied {nodes} nodes, {} edges", self.edges.len());
        model.emit(GraphEvent::ClipboardChanged { nodes });
    }

    /// Copy, then delete the originals.
    pub fn cut(&mut self, model: &mut GraphModel, selection: &[NodeId]) {
        self.copy(model, selection);
        for node in selection {
            // Already-cascaded ids are silent no-ops.
            let _ = model.delete_node(*node);
        }
    }

    /// Recreate the clipboard contents with the set centroid at `at`
    /// (world space). Returns the newly created node ids, which become the
    /// new selection. Empty clipboard is a no-op.
    pub fn paste(&self, model: &mut GraphModel, at: Point) -> Vec<NodeId> {
        if self.nodes.is_empty() {
            return Vec::new();
        }

        let mut cx = 0.0;
        let mut cy = 0.0;
        for node in &self.nodes {
            let c = node.center();
            cx += c.x;
            cy += c.y;
        }
        let n = self.nodes.len() as f32;
        let dx = at.x - cx / n;
        let dy = at.y - cy / n;

        // First pass: mint ids and create the nodes.
        let mut id_map: HashMap<NodeId, NodeId> = HashMap::new();
        let mut created = Vec::with_capacity(self.nodes.len());
        for snapshot in &self.nodes {
            let mut node = snapshot.clone();
            node.id = NodeId::fresh(match node.kind {
                NodeKind::Group { .. } => "group",
                NodeKind::Routing => "route",
                NodeKind::Card { .. } => "node",
            });
            node.x += dx;
            node.y += dy;
            // Connections are rebuilt by edge recreation below; membership
            // is remapped in the second pass.
            node.connections = Default::default();
            if let NodeKind::Group { members } = &mut node.kind {
                members.clear();
            }
            id_map.insert(snapshot.id, node.id);
            created.push(model.insert_node(node));
        }

        // Second pass: remap group membership through the id map. Members
        // that were not copied stay with their original group.
        for snapshot in &self.nodes {
            if let NodeKind::Group { members } = &snapshot.kind {
                let new_group = id_map[&snapshot.id];
                for member in members {
                    if let Some(new_member) = id_map.get(member) {
                        let _ = model.reparent_node(*new_member, Some(new_group));
                    }
                }
            }
        }

        // Edges: recreate when at least one endpoint was copied. A
        // dangling endpoint keeps its original id if it still exists;
        // otherwise the recreation is skipped (stale id, silent no-op).
        for edge in &self.edges {
            let from = id_map.get(&edge.from_node).copied();
            let to = id_map.get(&edge.to_node).copied();
            if from.is_none() && to.is_none() {
                continue;
            }
            let from = from.unwrap_or(edge.from_node);
            let to = to.unwrap_or(edge.to_node);
            // Recreation can fail when the dangling endpoint has since been
            // deleted; that degrades to a silent skip.
            if let Ok(new_edge) = model.create_edge(from, edge.from_handle, to, edge.to_handle) {
                // Bend points only make sense when the whole span moved.
                if id_map.contains_key(&edge.from_node) && id_map.contains_key(&edge.to_node) {
                    for (i, rp) in edge.routing_points.iter().enumerate() {
                        let _ = model.insert_routing_point(
                            new_edge,
                            i,
                            Point::new(rp.x + dx, rp.y + dy),
                        );
                    }
                }
                if let Some(label) = &edge.label {
                    let _ = model.set_edge_label(new_edge, Some(label.clone()));
                }
            }
        }

        created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nc_core::model::HandleSide;
    use pretty_assertions::assert_eq;

    fn world() -> (GraphModel, ClipboardManager) {
        (GraphModel::new(), ClipboardManager::new())
    }

    #[test]
    fn paste_preserves_relative_offsets_with_fresh_ids() {
        let (mut model, mut clipboard) = world();
        let a = model.create_card(0.0, 0.0, 100.0, 60.0);
        let b = model.create_card(200.0, 100.0, 100.0, 60.0);

        clipboard.copy(&mut model, &[a, b]);
        let pasted = clipboard.paste(&mut model, Point::new(1000.0, 1000.0));
        assert_eq!(pasted.len(), 2);

        let na = model.node(pasted[0]).unwrap();
        let nb = model.node(pasted[1]).unwrap();
        assert!((nb.x - na.x - 200.0).abs() < 1e-3);
        assert!((nb.y - na.y - 100.0).abs() < 1e-3);

        // Centroid of the pasted pair sits at the pointer.
        let centroid = Point::new(
            (na.center().x + nb.center().x) / 2.0,
            (na.center().y + nb.center().y) / 2.0,
        );
        assert!((centroid.x - 1000.0).abs() < 1e-3);
        assert!((centroid.y - 1000.0).abs() < 1e-3);

        // All ids distinct from the originals and from each other.
        assert_ne!(pasted[0], a);
        assert_ne!(pasted[1], b);
        assert_ne!(pasted[0], pasted[1]);
    }

    #[test]
    fn edges_between_copied_nodes_are_recreated() {
        let (mut model, mut clipboard) = world();
        let a = model.create_card(0.0, 0.0, 100.0, 60.0);
        let b = model.create_card(300.0, 0.0, 100.0, 60.0);
        model
            .create_edge(a, HandleSide::Right, b, HandleSide::Left)
            .unwrap();

        clipboard.copy(&mut model, &[a, b]);
        let pasted = clipboard.paste(&mut model, Point::new(0.0, 500.0));

        assert_eq!(model.edge_count(), 2);
        let new_edge = model
            .edges()
            .find(|e| e.from_node == pasted[0] && e.to_node == pasted[1]);
        assert!(new_edge.is_some());
    }

    #[test]
    fn dangling_edges_reconnect_to_the_uncopied_original() {
        let (mut model, mut clipboard) = world();
        let a = model.create_card(0.0, 0.0, 100.0, 60.0);
        let b = model.create_card(300.0, 0.0, 100.0, 60.0);
        model
            .create_edge(a, HandleSide::Right, b, HandleSide::Left)
            .unwrap();

        clipboard.copy(&mut model, &[a]); // only one endpoint copied
        let pasted = clipboard.paste(&mut model, Point::new(0.0, 500.0));

        assert_eq!(model.edge_count(), 2);
        assert!(
            model
                .edges()
                .any(|e| e.from_node == pasted[0] && e.to_node == b)
        );
    }

    #[test]
    fn group_membership_remaps_through_the_id_map() {
        let (mut model, mut clipboard) = world();
        let a = model.create_card(0.0, 0.0, 100.0, 60.0);
        let group = model.group_nodes(&[a], 40.0).unwrap();

        clipboard.copy(&mut model, &[group, a]);
        let pasted = clipboard.paste(&mut model, Point::new(800.0, 800.0));

        let new_group = pasted
            .iter()
            .find(|id| model.node(**id).unwrap().kind.is_container())
            .copied()
            .unwrap();
        let new_member = pasted
            .iter()
            .find(|id| !model.node(**id).unwrap().kind.is_container())
            .copied()
            .unwrap();
        assert_eq!(model.node(new_group).unwrap().members(), &[new_member][..]);
        assert_eq!(model.group_of(new_member), Some(new_group));
        // The original group is untouched.
        assert_eq!(model.node(group).unwrap().members(), &[a][..]);
    }

    #[test]
    fn cut_removes_originals_after_copying() {
        let (mut model, mut clipboard) = world();
        let a = model.create_card(0.0, 0.0, 100.0, 60.0);
        clipboard.cut(&mut model, &[a]);
        assert!(model.node(a).is_none());
        assert_eq!(clipboard.node_count(), 1);

        let pasted = clipboard.paste(&mut model, Point::new(50.0, 30.0));
        assert_eq!(pasted.len(), 1);
        assert_eq!(model.node_count(), 1);
    }
}
