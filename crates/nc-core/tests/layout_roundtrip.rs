//! Persisted layout round-trip: everything the file-I/O collaborator
//! stores must survive serialize → deserialize unchanged.

use nc_core::model::{Color, HandleSide, Point};
use nc_core::{GraphModel, NodeId};
use pretty_assertions::assert_eq;

#[test]
fn graph_layout_roundtrips_through_json() {
    let mut model = GraphModel::new();

    let a = model.create_card(100.0, 50.0, 200.0, 120.0);
    let b = model.create_card(500.0, 300.0, 160.0, 90.0);
    model
        .update_node(a, |n| {
            n.title = "Reader".to_string();
            n.content = Some("# notes".to_string());
            n.color = Color::from_hex("#6C5CE7");
        })
        .unwrap();
    model
        .update_node(b, |n| {
            n.title = "Log".to_string();
            n.pinned = true;
        })
        .unwrap();

    let group = model.group_nodes(&[a], 40.0).unwrap();

    let edge = model
        .create_edge(a, HandleSide::Right, b, HandleSide::Left)
        .unwrap();
    model
        .insert_routing_point(edge, 0, Point::new(350.0, 80.0))
        .unwrap();
    model
        .set_edge_label(edge, Some("feeds".to_string()))
        .unwrap();

    let json = serde_json::to_string(&model).expect("serialize");
    let mut restored: GraphModel = serde_json::from_str(&json).expect("deserialize");
    restored.rebuild_index();

    let ra = restored.node(a).unwrap();
    assert_eq!(ra.title, "Reader");
    assert_eq!(ra.content.as_deref(), Some("# notes"));
    assert_eq!(ra.color.map(|c| c.to_hex()).as_deref(), Some("#6C5CE7"));
    assert_eq!((ra.x, ra.y, ra.width, ra.height), (100.0, 50.0, 200.0, 120.0));

    let rb = restored.node(b).unwrap();
    assert!(rb.pinned);

    // Containment survives by id, including the derived parent index.
    assert_eq!(restored.group_of(a), Some(group));
    assert_eq!(restored.node(group).unwrap().members(), &[a][..]);

    let re = restored.edge(edge).unwrap();
    assert_eq!(re.from_node, a);
    assert_eq!(re.to_node, b);
    assert_eq!(re.from_handle, HandleSide::Right);
    assert_eq!(re.to_handle, HandleSide::Left);
    assert_eq!(re.routing_points, vec![Point::new(350.0, 80.0)]);
    assert_eq!(re.label.as_deref(), Some("feeds"));

    // Connection sets were persisted consistently on both endpoints.
    assert!(restored.node(a).unwrap().connections.right.contains(&edge));
    assert!(restored.node(b).unwrap().connections.left.contains(&edge));
}

#[test]
fn stale_ids_after_restore_are_silent_noops_at_query_level() {
    let mut model = GraphModel::new();
    let a = model.create_card(0.0, 0.0, 100.0, 60.0);
    model.delete_node(a).unwrap();

    let ghost = NodeId::intern("never_created");
    assert!(model.node(ghost).is_none());
    assert!(model.node(a).is_none());
    assert!(model.edges_touching(a).is_empty());
}
