//! NC (NodeCanvas) geometry engine: handle placement, curve generation,
//! path sampling, intersection tests, hit-testing, and snapping.

pub mod curve;
pub mod handle;
pub mod hit;
pub mod intersect;
pub mod sample;
pub mod snap;

pub use curve::{EdgePath, EndOrient, PathCmd, catmull_rom_spline, edge_path, two_point_curve};
pub use handle::handle_position;
pub use hit::{
    ResizeEdge, edge_at_point, edge_polyline, edges_in_rect, handle_at_point, node_at_point,
    nodes_in_rect, resize_edge_at, routing_insert_index, routing_point_at, smallest_group_at,
};
pub use intersect::{
    nearest_segment_index, point_segment_distance, polyline_distance, polyline_in_rect,
    polyline_segment_intersection, segment_intersection,
};
pub use sample::{path_length, sample_path};
pub use snap::{
    Guide, GuideAxis, PositionSnap, ResizeSnap, grid_snap, grid_snap_point, snap_position,
    snap_resize,
};
